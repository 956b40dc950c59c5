//! Site configuration management.

use std::path::{Path, PathBuf};

use indexmap::IndexMap;
use serde::Deserialize;

use crate::{
    error::{CoreError, Result},
    route::RouteConfig,
};

/// Main configuration structure for Routeforge.
#[derive(Debug, Clone, Deserialize)]
pub struct SiteConfig {
    /// Languages in declaration order. The first one is the default.
    #[serde(default)]
    pub languages: IndexMap<String, LanguageConfig>,

    /// File name written inside each page directory, without extension.
    #[serde(default = "default_file_index")]
    pub file_index: String,

    /// Extension appended to `file_index`.
    #[serde(default = "default_file_extension")]
    pub file_extension: String,

    /// Root of the generated site.
    #[serde(default = "default_target_directory")]
    pub target_directory: PathBuf,

    /// Page template used by the built-in renderer.
    #[serde(default)]
    pub template: Option<PathBuf>,
}

/// Per-language configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LanguageConfig {
    /// Title handed to the renderer for every page of this language.
    #[serde(default)]
    pub default_title: String,

    /// Root routes.
    #[serde(default)]
    pub routes: Vec<RouteConfig>,
}

// Default value functions
fn default_file_index() -> String {
    "index".to_string()
}

fn default_file_extension() -> String {
    ".html".to_string()
}

fn default_target_directory() -> PathBuf {
    PathBuf::from("./dist")
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            languages: IndexMap::new(),
            file_index: default_file_index(),
            file_extension: default_file_extension(),
            target_directory: default_target_directory(),
            template: None,
        }
    }
}

impl LanguageConfig {
    /// Create a language with a default title and no routes.
    #[must_use]
    pub fn new(default_title: impl Into<String>) -> Self {
        Self {
            default_title: default_title.into(),
            routes: Vec::new(),
        }
    }

    /// Append a root route.
    #[must_use]
    pub fn with_route(mut self, route: RouteConfig) -> Self {
        self.routes.push(route);
        self
    }
}

impl SiteConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(CoreError::config(format!(
                "Configuration file not found: {}",
                path.display()
            )));
        }

        let content = std::fs::read_to_string(path)?;
        let config: SiteConfig = toml::from_str(&content).map_err(|e| {
            CoreError::config_with_source(
                format!("Failed to parse config file: {}", path.display()),
                e,
            )
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load configuration using the config crate, with `ROUTEFORGE__*`
    /// environment overrides.
    pub fn load_with_env(path: &Path) -> Result<Self> {
        let settings = config::Config::builder()
            .add_source(config::File::from(path))
            .add_source(config::Environment::with_prefix("ROUTEFORGE").separator("__"))
            .build()?;

        let config: SiteConfig = settings.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<()> {
        if self.languages.is_empty() {
            return Err(CoreError::config(
                "You must define at least one language to use",
            ));
        }

        if self.file_index.is_empty() {
            return Err(CoreError::config("file_index cannot be empty"));
        }

        for (language, settings) in &self.languages {
            if settings.routes.is_empty() {
                tracing::warn!(language = %language, "no routes defined for language");
            }
        }

        Ok(())
    }

    /// Add a language, keeping declaration order.
    #[must_use]
    pub fn with_language(mut self, code: impl Into<String>, language: LanguageConfig) -> Self {
        self.languages.insert(code.into(), language);
        self
    }

    /// Set the output root.
    #[must_use]
    pub fn with_target_directory(mut self, dir: impl Into<PathBuf>) -> Self {
        self.target_directory = dir.into();
        self
    }

    /// The language used when a call names none.
    #[must_use]
    pub fn default_language(&self) -> Option<&str> {
        self.languages.keys().next().map(String::as_str)
    }

    /// Whether `code` is a configured language.
    #[must_use]
    pub fn has_language(&self, code: &str) -> bool {
        self.languages.contains_key(code)
    }

    /// Output directory for one language.
    #[must_use]
    pub fn language_dir(&self, code: &str) -> PathBuf {
        self.target_directory.join(code)
    }
}
