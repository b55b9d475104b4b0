//! Configuration for docpage.
//!
//! Parses `docpage.toml` with serde. Without an explicit path the file is
//! searched for in the current directory and its parents; when none is found
//! the defaults apply.
//!
//! ```toml
//! [site]
//! docs_path = "/docs"
//! source_repo_url = "https://github.com/buildkite/docs/tree/master/pages"
//! source_extension = ".md.erb"
//!
//! [markdown]
//! gfm = true
//! footnotes = false
//! smart_punctuation = false
//!
//! [partials]
//! extension = ".md"
//! max_depth = 10
//! ```
//!
//! ## Environment Variable Expansion
//!
//! - `${VAR}` - expands to the value of VAR, errors if unset
//! - `${VAR:-default}` - expands to VAR if set, otherwise uses default
//!
//! Expanded fields:
//! - `site.docs_path`
//! - `site.source_repo_url`

mod expand;

use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Configuration filename to search for.
const CONFIG_FILENAME: &str = "docpage.toml";

/// Deepest partial nesting a config file may allow.
const MAX_PARTIAL_DEPTH: usize = 64;

/// Application configuration.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Site URLs and source locations.
    pub site: SiteConfig,
    /// Markdown extensions.
    pub markdown: MarkdownConfig,
    /// Partial template lookup.
    pub partials: PartialsConfig,

    /// Path to the config file (set after loading).
    #[serde(skip)]
    pub config_path: Option<PathBuf>,
}

/// Site configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct SiteConfig {
    /// URL prefix of the documentation pages.
    pub docs_path: String,
    /// Repository URL that page sources are browsable under.
    pub source_repo_url: String,
    /// Extension of page source files in that repository.
    pub source_extension: String,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            docs_path: "/docs".to_owned(),
            source_repo_url: "https://github.com/buildkite/docs/tree/master/pages".to_owned(),
            source_extension: ".md.erb".to_owned(),
        }
    }
}

/// Markdown rendering configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct MarkdownConfig {
    /// Tables, strikethrough and task lists.
    pub gfm: bool,
    pub footnotes: bool,
    pub smart_punctuation: bool,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            gfm: true,
            footnotes: false,
            smart_punctuation: false,
        }
    }
}

/// Partial template configuration.
#[derive(Debug, Deserialize)]
#[serde(default)]
pub struct PartialsConfig {
    /// Extension appended to partial paths before lookup.
    pub extension: String,
    /// How deep partials may include other partials.
    pub max_depth: usize,
}

impl Default for PartialsConfig {
    fn default() -> Self {
        Self {
            extension: ".md".to_owned(),
            max_depth: 10,
        }
    }
}

/// Configuration error.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// File not found.
    #[error("Configuration file not found: {}", .0.display())]
    NotFound(PathBuf),
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Parse(#[from] toml::de::Error),
    /// Validation error.
    #[error("Configuration error: {0}")]
    Validation(String),
    /// Environment variable error during expansion.
    #[error("Environment variable error in {field}: {message}")]
    EnvVar {
        /// Config field path (e.g., "`site.docs_path`").
        field: String,
        /// Error message (e.g., "${`DOCS_PREFIX`} not set").
        message: String,
    },
}

fn require_non_empty(value: &str, field: &str) -> Result<(), ConfigError> {
    if value.is_empty() {
        return Err(ConfigError::Validation(format!("{field} cannot be empty")));
    }
    Ok(())
}

fn require_http_url(url: &str, field: &str) -> Result<(), ConfigError> {
    if !url.starts_with("http://") && !url.starts_with("https://") {
        return Err(ConfigError::Validation(format!(
            "{field} must start with http:// or https://"
        )));
    }
    Ok(())
}

impl Config {
    /// Load configuration.
    ///
    /// If `config_path` is provided, loads from that file. Otherwise, searches
    /// for `docpage.toml` in the current directory and parents, falling back
    /// to defaults.
    ///
    /// # Errors
    ///
    /// Returns error if explicit `config_path` doesn't exist, or if reading,
    /// parsing, expansion or validation of the file fails.
    pub fn load(config_path: Option<&Path>) -> Result<Self, ConfigError> {
        if let Some(path) = config_path {
            if !path.exists() {
                return Err(ConfigError::NotFound(path.to_path_buf()));
            }
            return Self::load_from_file(path);
        }

        let discovered = std::env::current_dir()
            .ok()
            .and_then(|cwd| Self::discover_from(&cwd));
        match discovered {
            Some(path) => Self::load_from_file(&path),
            None => Ok(Self::default()),
        }
    }

    /// Search for the config file in `start` and its parents.
    fn discover_from(start: &Path) -> Option<PathBuf> {
        start
            .ancestors()
            .map(|dir| dir.join(CONFIG_FILENAME))
            .find(|candidate| candidate.is_file())
    }

    /// Load configuration from a specific file.
    fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let mut config: Self = toml::from_str(&content)?;

        config.expand_env_vars()?;
        config.config_path = Some(path.to_path_buf());
        config.validate()?;

        Ok(config)
    }

    /// Validate configuration values.
    ///
    /// Called automatically after loading from file.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` if any validation fails.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_empty(&self.site.source_repo_url, "site.source_repo_url")?;
        require_http_url(&self.site.source_repo_url, "site.source_repo_url")?;
        require_non_empty(&self.partials.extension, "partials.extension")?;

        let depth = self.partials.max_depth;
        if depth == 0 {
            return Err(ConfigError::Validation(
                "partials.max_depth must be greater than 0".to_owned(),
            ));
        }
        if depth > MAX_PARTIAL_DEPTH {
            return Err(ConfigError::Validation(format!(
                "partials.max_depth cannot exceed {MAX_PARTIAL_DEPTH}"
            )));
        }

        Ok(())
    }

    fn expand_env_vars(&mut self) -> Result<(), ConfigError> {
        self.site.docs_path = expand::expand_env(&self.site.docs_path, "site.docs_path")?;
        self.site.source_repo_url =
            expand::expand_env(&self.site.source_repo_url, "site.source_repo_url")?;
        Ok(())
    }
}
