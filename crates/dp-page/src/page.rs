//! Documentation pages.

use std::sync::LazyLock;

use dp_renderer::{extract_headings, extract_title};
use regex::Regex;

use crate::error::PageError;

/// Characters outside this set are dropped from page names.
static UNSAFE_NAME_CHARS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[^0-9A-Za-z\-_/]").unwrap());

/// `HTTPServer` -> `HTTP_Server`
static ACRONYM_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([A-Z\d]+)([A-Z][a-z])").unwrap());

/// `pageName` -> `page_Name`
static CAMEL_BOUNDARY: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([a-z\d])([A-Z])").unwrap());

/// Agent documentation lives under `agent/v<version>`.
static AGENT_VERSION: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^agent/v([^/]+)").unwrap());

/// A documentation page requested by name.
///
/// `source` is whatever the host's lookup found for the name; `None` means
/// the page does not exist, and [`title`](Self::title) and rendering fail
/// with [`PageError::NotFound`].
///
/// # Example
///
/// ```
/// use dp_page::Page;
///
/// let page = Page::new("agent/v3/Hooks", Some("# Hooks\n".to_owned()));
///
/// assert_eq!(page.basename(), "agent/v3/hooks");
/// assert_eq!(page.title().unwrap(), "Hooks (v3)");
/// assert!(!page.is_canonical());
/// ```
#[derive(Clone, Debug)]
pub struct Page {
    name: String,
    source: Option<String>,
    basename: String,
}

impl Page {
    /// Create a page from its requested name and source, if one was found.
    #[must_use]
    pub fn new(name: impl Into<String>, source: Option<String>) -> Self {
        let name = name.into();
        let basename = basename(&name);
        Self {
            name,
            source,
            basename,
        }
    }

    /// The name the page was requested by.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Normalized page path: unsafe characters stripped, then snake case
    /// (`Agent/V3/HTTPHooks` becomes `agent/v3/http_hooks`).
    #[must_use]
    pub fn basename(&self) -> &str {
        &self.basename
    }

    #[must_use]
    pub fn exists(&self) -> bool {
        self.source.is_some()
    }

    /// Raw template source.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] when the page has no source.
    pub fn source(&self) -> Result<&str, PageError> {
        self.source
            .as_deref()
            .ok_or_else(|| PageError::NotFound(self.name.clone()))
    }

    /// Labels of the `## ` headings in the source, in document order.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] when the page has no source.
    pub fn headings(&self) -> Result<Vec<String>, PageError> {
        Ok(extract_headings(self.source()?))
    }

    /// Text of the first `# ` heading, empty when there is none.
    ///
    /// Agent pages get their version appended: `Hooks` on `agent/v3/hooks`
    /// becomes `Hooks (v3)`.
    ///
    /// # Errors
    ///
    /// Returns [`PageError::NotFound`] when the page has no source.
    pub fn title(&self) -> Result<String, PageError> {
        let title = extract_title(self.source()?).unwrap_or_default();
        Ok(match AGENT_VERSION.captures(&self.basename) {
            Some(caps) => format!("{title} (v{})", &caps[1]),
            None => title,
        })
    }

    /// The basename with underscores turned into hyphens.
    #[must_use]
    pub fn canonical_url(&self) -> String {
        self.basename.replace('_', "-")
    }

    /// Whether the page was requested by its canonical URL.
    #[must_use]
    pub fn is_canonical(&self) -> bool {
        self.name == self.canonical_url()
    }
}

fn basename(name: &str) -> String {
    let stripped = UNSAFE_NAME_CHARS.replace_all(name, "");
    let word = ACRONYM_BOUNDARY.replace_all(&stripped, "${1}_${2}");
    let word = CAMEL_BOUNDARY.replace_all(&word, "${1}_${2}");
    word.replace('-', "_").to_lowercase()
}
