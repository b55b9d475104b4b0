//! Page errors.

use dp_template::TemplateError;

/// Error returned when a page cannot be rendered.
#[derive(Debug, thiserror::Error)]
pub enum PageError {
    /// No source was found for the requested page.
    #[error("Page not found: {0}")]
    NotFound(String),
    /// Template expansion failed.
    #[error("Failed to render page {page}: {source}")]
    Template {
        /// Requested page name.
        page: String,
        #[source]
        source: TemplateError,
    },
}
