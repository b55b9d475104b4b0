//! Page rendering pipeline.
//!
//! [`PageRenderer`] runs a [`Page`] through template expansion, heading
//! anchoring, markdown conversion and curl highlighting.

use dp_config::Config;
use dp_renderer::{MarkdownRenderer, annotate_headings, highlight_curl};
use dp_template::Evaluator;

use crate::binding::Binding;
use crate::collaborators::Collaborators;
use crate::error::PageError;
use crate::page::Page;

/// Everything a render produces for one page.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct RenderedPage {
    /// Final HTML body.
    pub html: String,
    pub title: String,
    pub canonical_url: String,
    /// Whether the page was requested by its canonical URL.
    pub is_canonical: bool,
    /// Link to the page source in the docs repository.
    pub open_source_url: String,
}

/// Configuration for [`PageRenderer`].
#[derive(Clone, Debug)]
pub struct PageRendererConfig {
    /// URL prefix of the documentation pages.
    pub docs_path: String,
    /// Repository URL that page sources are browsable under.
    pub source_repo_url: String,
    /// Extension of page source files in that repository.
    pub source_extension: String,
    /// Extension appended to partial paths before lookup.
    pub partial_extension: String,
    /// How deep partials may include other partials.
    pub max_partial_depth: usize,
    /// Enable tables, strikethrough and task lists.
    pub gfm: bool,
    pub footnotes: bool,
    pub smart_punctuation: bool,
}

impl Default for PageRendererConfig {
    fn default() -> Self {
        Self::from(&Config::default())
    }
}

impl From<&Config> for PageRendererConfig {
    fn from(config: &Config) -> Self {
        Self {
            docs_path: config.site.docs_path.clone(),
            source_repo_url: config.site.source_repo_url.clone(),
            source_extension: config.site.source_extension.clone(),
            partial_extension: config.partials.extension.clone(),
            max_partial_depth: config.partials.max_depth,
            gfm: config.markdown.gfm,
            footnotes: config.markdown.footnotes,
            smart_punctuation: config.markdown.smart_punctuation,
        }
    }
}

/// Renders pages to HTML.
///
/// The renderer holds configuration only. Each call builds its own template
/// binding, so one renderer can serve many pages, including from several
/// threads at once.
///
/// # Example
///
/// ```
/// use dp_page::{
///     Collaborators, MapTranslator, MemoryPartials, Page, PageRenderer, PageRendererConfig,
///     StaticAssets,
/// };
///
/// let assets = StaticAssets::new("/assets");
/// let translator = MapTranslator::new();
/// let partials = MemoryPartials::new();
/// let collaborators = Collaborators::new(&assets, &translator, &partials);
///
/// let page = Page::new("tutorials/hello", Some("# Hello\n\n<%= estimated_time \"1 minute\" %>\n".to_owned()));
/// let renderer = PageRenderer::new(PageRendererConfig::default());
/// let rendered = renderer.render(&page, collaborators).unwrap();
///
/// assert_eq!(rendered.title, "Hello");
/// assert!(rendered.html.contains("Estimated time: 1 minute"));
/// ```
#[derive(Clone, Debug)]
pub struct PageRenderer {
    config: PageRendererConfig,
    markdown: MarkdownRenderer,
}

impl PageRenderer {
    #[must_use]
    pub fn new(config: PageRendererConfig) -> Self {
        let markdown = MarkdownRenderer::new()
            .with_gfm(config.gfm)
            .with_footnotes(config.footnotes)
            .with_smart_punctuation(config.smart_punctuation);
        Self { config, markdown }
    }

    /// Render the page body to HTML.
    ///
    /// Headings are collected before the template runs so the table of
    /// contents can see all of them.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] for pages without source and
    /// [`PageError::Template`] when template expansion fails.
    pub fn body(&self, page: &Page, collaborators: Collaborators<'_>) -> Result<String, PageError> {
        let source = page.source()?;
        let headings = page.headings()?;
        tracing::debug!(
            page = page.name(),
            headings = headings.len(),
            "Rendering page"
        );

        let binding = Binding::new(
            &headings,
            collaborators,
            page.basename(),
            &self.config,
            &self.markdown,
        );
        let helpers = binding.helper_table();
        let expanded = Evaluator::new(&helpers)
            .evaluate(source)
            .map_err(|source| {
                tracing::warn!(page = page.name(), error = %source, "Template evaluation failed");
                PageError::Template {
                    page: page.name().to_owned(),
                    source,
                }
            })?;

        let html = highlight_curl(&self.markdown.render(&annotate_headings(&expanded)));
        tracing::debug!(page = page.name(), bytes = html.len(), "Rendered page");
        Ok(html)
    }

    /// Link to the page's template in the docs repository.
    #[must_use]
    pub fn open_source_url(&self, page: &Page) -> String {
        format!(
            "{}/{}{}",
            self.config.source_repo_url.trim_end_matches('/'),
            page.basename(),
            self.config.source_extension
        )
    }

    /// Render the body and collect the page's derived values.
    ///
    /// # Errors
    ///
    /// Fails the same way as [`PageRenderer::body`].
    pub fn render(
        &self,
        page: &Page,
        collaborators: Collaborators<'_>,
    ) -> Result<RenderedPage, PageError> {
        Ok(RenderedPage {
            html: self.body(page, collaborators)?,
            title: page.title()?,
            canonical_url: page.canonical_url(),
            is_canonical: page.is_canonical(),
            open_source_url: self.open_source_url(page),
        })
    }
}

impl Default for PageRenderer {
    fn default() -> Self {
        Self::new(PageRendererConfig::default())
    }
}
