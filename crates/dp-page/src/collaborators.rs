//! Services a page render borrows from its host.
//!
//! Asset URLs, translations and partial sources all live outside the
//! pipeline. Each is a trait so hosts can plug in their own lookups; the
//! in-memory implementations here cover tests and static setups.

use std::collections::HashMap;

/// Resolves a logical asset path (e.g. `agent/v3/diagram.png`) to a URL.
pub trait AssetResolver {
    fn asset_url(&self, logical_path: &str) -> String;
}

/// Looks up translated strings by key.
pub trait Translator {
    fn translate(&self, key: &str) -> String;
}

/// Fetches partial template source by logical path, extension included.
pub trait PartialSource {
    /// Returns `None` when no partial exists at `logical_path`.
    fn partial_source(&self, logical_path: &str) -> Option<String>;
}

/// Collaborators borrowed for one render call.
///
/// # Example
///
/// ```
/// use dp_page::{Collaborators, MapTranslator, MemoryPartials, StaticAssets};
///
/// let assets = StaticAssets::new("/assets");
/// let translator = MapTranslator::new().with("nav.next", "Next");
/// let partials = MemoryPartials::new();
/// let collaborators = Collaborators::new(&assets, &translator, &partials);
///
/// assert_eq!(collaborators.assets.asset_url("logo.png"), "/assets/logo.png");
/// ```
#[derive(Clone, Copy)]
pub struct Collaborators<'a> {
    pub assets: &'a dyn AssetResolver,
    pub translator: &'a dyn Translator,
    pub partials: &'a dyn PartialSource,
}

impl<'a> Collaborators<'a> {
    #[must_use]
    pub fn new(
        assets: &'a dyn AssetResolver,
        translator: &'a dyn Translator,
        partials: &'a dyn PartialSource,
    ) -> Self {
        Self {
            assets,
            translator,
            partials,
        }
    }
}

/// Asset resolver that joins logical paths onto a fixed URL prefix.
#[derive(Clone, Debug)]
pub struct StaticAssets {
    prefix: String,
}

impl StaticAssets {
    #[must_use]
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl AssetResolver for StaticAssets {
    fn asset_url(&self, logical_path: &str) -> String {
        format!(
            "{}/{}",
            self.prefix.trim_end_matches('/'),
            logical_path.trim_start_matches('/')
        )
    }
}

/// Translator backed by a map.
///
/// Missing keys render as `translation missing: <key>` so gaps are visible
/// on the page instead of silently empty.
#[derive(Clone, Debug, Default)]
pub struct MapTranslator {
    strings: HashMap<String, String>,
}

impl MapTranslator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a translation (builder form).
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.strings.insert(key.into(), value.into());
        self
    }
}

impl Translator for MapTranslator {
    fn translate(&self, key: &str) -> String {
        match self.strings.get(key) {
            Some(value) => value.clone(),
            None => format!("translation missing: {key}"),
        }
    }
}

/// Partial source backed by a map of logical path to template source.
#[derive(Clone, Debug, Default)]
pub struct MemoryPartials {
    partials: HashMap<String, String>,
}

impl MemoryPartials {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a partial (builder form). `path` includes the extension.
    #[must_use]
    pub fn with(mut self, path: impl Into<String>, source: impl Into<String>) -> Self {
        self.partials.insert(path.into(), source.into());
        self
    }
}

impl PartialSource for MemoryPartials {
    fn partial_source(&self, logical_path: &str) -> Option<String> {
        self.partials.get(logical_path).cloned()
    }
}
