//! Markdown to HTML conversion.

use pulldown_cmark::{Options, Parser, html};

/// Markdown renderer backed by pulldown-cmark.
///
/// Raw HTML in the input (anchored headings, helper output such as the table
/// of contents) passes through unchanged. pulldown-cmark accepts every input,
/// so rendering cannot fail.
///
/// # Example
///
/// ```
/// use dp_renderer::MarkdownRenderer;
///
/// let html = MarkdownRenderer::new().render("**Bold** text");
/// assert_eq!(html, "<p><strong>Bold</strong> text</p>\n");
/// ```
#[derive(Clone, Debug)]
pub struct MarkdownRenderer {
    gfm: bool,
    footnotes: bool,
    smart_punctuation: bool,
}

impl Default for MarkdownRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl MarkdownRenderer {
    /// Create a renderer with GitHub Flavored Markdown enabled.
    #[must_use]
    pub fn new() -> Self {
        Self {
            gfm: true,
            footnotes: false,
            smart_punctuation: false,
        }
    }

    /// Enable GitHub Flavored Markdown extensions.
    ///
    /// When enabled:
    /// - Tables
    /// - Strikethrough (`~~text~~`)
    /// - Task lists (`- [ ] item`)
    #[must_use]
    pub fn with_gfm(mut self, enabled: bool) -> Self {
        self.gfm = enabled;
        self
    }

    /// Enable footnote references and definitions.
    #[must_use]
    pub fn with_footnotes(mut self, enabled: bool) -> Self {
        self.footnotes = enabled;
        self
    }

    /// Enable typographic quotes and dashes.
    #[must_use]
    pub fn with_smart_punctuation(mut self, enabled: bool) -> Self {
        self.smart_punctuation = enabled;
        self
    }

    /// Get parser options based on configuration.
    #[must_use]
    pub fn parser_options(&self) -> Options {
        let mut options = if self.gfm {
            Options::ENABLE_TABLES
                | Options::ENABLE_STRIKETHROUGH
                | Options::ENABLE_TASKLISTS
                | Options::ENABLE_GFM
        } else {
            Options::empty()
        };
        if self.footnotes {
            options |= Options::ENABLE_FOOTNOTES;
        }
        if self.smart_punctuation {
            options |= Options::ENABLE_SMART_PUNCTUATION;
        }
        options
    }

    /// Create a configured parser for the given markdown text.
    #[must_use]
    pub fn create_parser<'a>(&self, markdown: &'a str) -> Parser<'a> {
        Parser::new_ext(markdown, self.parser_options())
    }

    /// Render markdown text to HTML.
    #[must_use]
    pub fn render(&self, markdown: &str) -> String {
        let mut out = String::with_capacity(markdown.len() + markdown.len() / 2);
        html::push_html(&mut out, self.create_parser(markdown));
        out
    }
}
