//! Heading extraction and anchoring.
//!
//! Works on template source text, before markdown conversion. Lines are
//! matched with regexes, so `##` lines inside fenced code blocks are treated as
//! headings too.

use std::sync::LazyLock;

use regex::{Captures, Regex};

use crate::slug::slugify;

/// CSS class of anchored `<h2>` elements.
pub const HEADING_CLASS: &str = "Docs__heading";

/// CSS class of the self-link inside anchored headings.
pub const HEADING_ANCHOR_CLASS: &str = "Docs__heading__anchor";

static HEADING_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?mR)^## (.+)$").unwrap());

static TITLE_PATTERN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?mR)^# (.+)$").unwrap());

/// Collect the text of every level-2 heading line, in document order.
///
/// Only lines of the exact form `## text` match; `###` and deeper are ignored.
/// Duplicates are kept.
///
/// # Examples
///
/// ```
/// use dp_renderer::extract_headings;
///
/// let headings = extract_headings("# Title\n## First\n### Nested\n## Second\n");
/// assert_eq!(headings, vec!["First", "Second"]);
/// ```
#[must_use]
pub fn extract_headings(text: &str) -> Vec<String> {
    HEADING_PATTERN
        .captures_iter(text)
        .map(|caps| caps[1].to_owned())
        .collect()
}

/// Text of the first `# Title` line, if any.
#[must_use]
pub fn extract_title(text: &str) -> Option<String> {
    TITLE_PATTERN.captures(text).map(|caps| caps[1].to_owned())
}

/// Replace every `## text` line with an anchored `<h2>` element.
///
/// Each element is followed by an empty line so the markdown stage ends the
/// raw HTML block there and still parses whatever sits directly below.
///
/// The element id is [`slugify`] of the heading text, the same slug the table
/// of contents links to. Heading text is inserted as-is; it is template output
/// and may already contain markup.
///
/// # Examples
///
/// ```
/// use dp_renderer::annotate_headings;
///
/// assert_eq!(
///     annotate_headings("## Getting started"),
///     "<h2 class=\"Docs__heading\" id=\"getting-started\">Getting started<a href=\"#getting-started\" aria-hidden=\"true\" class=\"Docs__heading__anchor\"></a></h2>\n"
/// );
/// ```
#[must_use]
pub fn annotate_headings(text: &str) -> String {
    HEADING_PATTERN
        .replace_all(text, |caps: &Captures| {
            let text = &caps[1];
            let anchor = slugify(text);
            let mut html = format!(
                r##"<h2 class="{HEADING_CLASS}" id="{anchor}">{text}<a href="#{anchor}" aria-hidden="true" class="{HEADING_ANCHOR_CLASS}"></a></h2>"##
            );
            html.push('\n');
            html
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_extract_headings_empty() {
        assert!(extract_headings("").is_empty());
    }

    #[test]
    fn test_extract_headings_document_order() {
        let text = "## Install\n\nText\n\n## Configure\n\n## Run\n";
        assert_eq!(extract_headings(text), vec!["Install", "Configure", "Run"]);
    }

    #[test]
    fn test_extract_headings_ignores_other_levels() {
        let text = "# Title\n### Deep\n#### Deeper\n##NoSpace\n ## Indented\n";
        assert!(extract_headings(text).is_empty());
    }

    #[test]
    fn test_extract_headings_keeps_duplicates() {
        let text = "## Example\n## Example\n";
        assert_eq!(extract_headings(text), vec!["Example", "Example"]);
    }

    #[test]
    fn test_extract_headings_crlf() {
        let text = "## One\r\n## Two\r\n";
        assert_eq!(extract_headings(text), vec!["One", "Two"]);
    }

    #[test]
    fn test_extract_headings_inside_code_fence() {
        // Fenced code is not special-cased.
        let text = "```\n## not a heading\n```\n";
        assert_eq!(extract_headings(text), vec!["not a heading"]);
    }

    #[test]
    fn test_extract_title() {
        assert_eq!(extract_title("# Hello\n## World"), Some("Hello".to_owned()));
    }

    #[test]
    fn test_extract_title_first_wins() {
        assert_eq!(
            extract_title("intro\n# First\n# Second\n"),
            Some("First".to_owned())
        );
    }

    #[test]
    fn test_extract_title_missing() {
        assert_eq!(extract_title("## Only sections\n"), None);
    }

    #[test]
    fn test_annotate_headings_keeps_other_lines() {
        let text = "# Title\n\n## Set up\n\nBody text.\n\n### Detail\n";
        let expected = concat!(
            "# Title\n\n",
            r##"<h2 class="Docs__heading" id="set-up">Set up<a href="#set-up" aria-hidden="true" class="Docs__heading__anchor"></a></h2>"##,
            "\n\n\nBody text.\n\n### Detail\n"
        );
        assert_eq!(annotate_headings(text), expected);
    }

    #[test]
    fn test_annotate_headings_separates_following_line() {
        let annotated = annotate_headings("## Setup\nRun this.\n");
        assert!(annotated.ends_with("</h2>\n\nRun this.\n"), "{annotated}");
    }

    #[test]
    fn test_annotate_headings_id_matches_slug() {
        let annotated = annotate_headings("## Agent & Hooks");
        let slug = slugify("Agent & Hooks");
        assert!(annotated.contains(&format!(r#"id="{slug}""#)));
        assert!(annotated.contains(&format!(r##"href="#{slug}""##)));
    }
}
