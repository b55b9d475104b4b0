//! URI template highlighting for `curl` examples.

use std::sync::LazyLock;

use regex::{Captures, Regex};

/// A `<code>` element (attributes allowed) whose content starts with `curl`.
static CURL_BLOCK: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?is)(<code(?:\s[^>]*)?>)(curl.*?)(</code>)").unwrap());

/// A `{...}` token, shortest match, may span lines.
static URI_TEMPLATE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"(?s)\{.*?\}").unwrap());

/// Wrap every `{placeholder}` inside `curl` code blocks in a highlighting span.
///
/// Code blocks that do not start with `curl` (case-insensitive) are left
/// untouched. Braces are not balanced: in `{a{b}}` the span closes at the first
/// `}`.
///
/// # Examples
///
/// ```
/// use dp_renderer::highlight_curl;
///
/// assert_eq!(
///     highlight_curl("<code>curl https://x/{id}</code>"),
///     r#"<code>curl https://x/<span class="o">{id}</span></code>"#
/// );
/// assert_eq!(highlight_curl("<code>echo {id}</code>"), "<code>echo {id}</code>");
/// ```
#[must_use]
pub fn highlight_curl(html: &str) -> String {
    CURL_BLOCK
        .replace_all(html, |caps: &Captures| {
            let body = URI_TEMPLATE.replace_all(&caps[2], r#"<span class="o">$0</span>"#);
            format!("{}{body}{}", &caps[1], &caps[3])
        })
        .into_owned()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_highlight_single_placeholder() {
        assert_eq!(
            highlight_curl("<code>curl https://x/{id}</code>"),
            r#"<code>curl https://x/<span class="o">{id}</span></code>"#
        );
    }

    #[test]
    fn test_non_curl_block_untouched() {
        let html = "<code>echo {id}</code>";
        assert_eq!(highlight_curl(html), html);
    }

    #[test]
    fn test_multiple_placeholders() {
        let html = "<pre><code>curl -X POST https://api/v2/organizations/{org.slug}/pipelines/{pipeline.slug}/builds\n</code></pre>";
        assert_eq!(
            highlight_curl(html),
            "<pre><code>curl -X POST https://api/v2/organizations/<span class=\"o\">{org.slug}</span>/pipelines/<span class=\"o\">{pipeline.slug}</span>/builds\n</code></pre>"
        );
    }

    #[test]
    fn test_case_insensitive() {
        assert_eq!(
            highlight_curl("<CODE>CURL https://x/{id}</CODE>"),
            r#"<CODE>CURL https://x/<span class="o">{id}</span></CODE>"#
        );
    }

    #[test]
    fn test_code_with_language_class() {
        assert_eq!(
            highlight_curl(r#"<code class="language-bash">curl https://x/{id}</code>"#),
            r#"<code class="language-bash">curl https://x/<span class="o">{id}</span></code>"#
        );
    }

    #[test]
    fn test_placeholder_spans_lines() {
        assert_eq!(
            highlight_curl("<code>curl -d '{\n  \"a\": 1\n}'</code>"),
            "<code>curl -d '<span class=\"o\">{\n  \"a\": 1\n}</span>'</code>"
        );
    }

    #[test]
    fn test_only_curl_blocks_change() {
        let html = "<code>curl https://x/{a}</code><p>{b}</p><code>wget {c}</code>";
        assert_eq!(
            highlight_curl(html),
            r#"<code>curl https://x/<span class="o">{a}</span></code><p>{b}</p><code>wget {c}</code>"#
        );
    }

    #[test]
    fn test_leading_whitespace_is_not_curl() {
        let html = "<code> curl {id}</code>";
        assert_eq!(highlight_curl(html), html);
    }

    #[test]
    fn test_nested_braces_close_early() {
        assert_eq!(
            highlight_curl("<code>curl {a{b}}</code>"),
            r#"<code>curl <span class="o">{a{b}</span>}</code>"#
        );
    }
}
