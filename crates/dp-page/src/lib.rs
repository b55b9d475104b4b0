//! Documentation page rendering.
//!
//! A [`Page`] is a requested name plus the template source the host found
//! for it. [`PageRenderer`] turns it into HTML in three stages:
//!
//! 1. The template is expanded against a fixed table of helpers (`toc`,
//!    `image`, `render`, `t`, ...). Headings are collected first so the table
//!    of contents knows about all of them.
//! 2. `## ` lines become anchored `<h2>` elements and the result is converted
//!    from markdown to HTML.
//! 3. `{placeholder}` tokens inside `curl` code blocks are highlighted.
//!
//! Asset URLs, translations and partial sources come from the host through
//! [`Collaborators`].
//!
//! # Example
//!
//! ```
//! use dp_page::{
//!     Collaborators, MapTranslator, MemoryPartials, Page, PageRenderer, StaticAssets,
//! };
//!
//! let source = "# Agent hooks\n\n<%= toc %>\n\n## Setup\n\n## Usage\n";
//! let page = Page::new("agent/v3/hooks", Some(source.to_owned()));
//!
//! let assets = StaticAssets::new("/assets");
//! let translator = MapTranslator::new();
//! let partials = MemoryPartials::new();
//! let rendered = PageRenderer::default()
//!     .render(&page, Collaborators::new(&assets, &translator, &partials))
//!     .unwrap();
//!
//! assert_eq!(rendered.title, "Agent hooks (v3)");
//! assert!(rendered.html.contains(r##"<a href="#setup">Setup</a>"##));
//! assert!(rendered.html.contains(r#"id="setup""#));
//! ```

mod binding;
mod collaborators;
mod error;
mod image;
mod page;
mod renderer;
mod webhooks;

pub use collaborators::{
    AssetResolver, Collaborators, MapTranslator, MemoryPartials, PartialSource, StaticAssets,
    Translator,
};
pub use error::PageError;
pub use page::Page;
pub use renderer::{PageRenderer, PageRendererConfig, RenderedPage};
