//! Markdown rendering and HTML post-processing for documentation pages.
//!
//! This crate holds the text-level stages of the page pipeline:
//!
//! - [`extract_headings`] / [`extract_title`]: scan template source for `##`
//!   and `#` lines
//! - [`slugify`]: convert heading text into a URL fragment
//! - [`annotate_headings`]: rewrite `## text` lines into anchored `<h2>` elements
//! - [`MarkdownRenderer`]: convert markdown to HTML via pulldown-cmark
//! - [`highlight_curl`]: mark URI template tokens inside `curl` code blocks
//!
//! Heading anchors and table of contents links both go through [`slugify`],
//! so a TOC link always resolves to the annotated heading with the same text.
//!
//! # Example
//!
//! ```
//! use dp_renderer::{MarkdownRenderer, annotate_headings, highlight_curl};
//!
//! let annotated = annotate_headings("## Get a build\n\n    curl https://api/builds/{id}\n");
//! let html = highlight_curl(&MarkdownRenderer::new().render(&annotated));
//!
//! assert!(html.contains(r#"id="get-a-build""#));
//! assert!(html.contains(r#"<span class="o">{id}</span>"#));
//! ```

mod curl;
mod headings;
mod markdown;
mod slug;
mod util;

pub use curl::highlight_curl;
pub use headings::{
    HEADING_ANCHOR_CLASS, HEADING_CLASS, annotate_headings, extract_headings, extract_title,
};
pub use markdown::MarkdownRenderer;
pub use slug::slugify;
pub use util::escape_html;
