//! Error types for the Routeforge core library.

use thiserror::Error;

/// Result type alias using `CoreError`.
pub type Result<T> = std::result::Result<T, CoreError>;

/// Core error types for Routeforge.
#[derive(Error, Debug)]
pub enum CoreError {
    /// Configuration loading or validation error.
    #[error("Configuration error: {message}")]
    Config {
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// Two routes of the same language declare the same type tag.
    #[error("type '{type_name}' is declared by both '{first}' and '{second}'")]
    DuplicateType {
        type_name: String,
        first: String,
        second: String,
    },

    /// Two routes of the same language flatten to the same path.
    #[error("route '{0}' is declared more than once")]
    DuplicateRoute(String),

    /// A path template references a field the data item does not carry.
    #[error("placeholder ':{name}' in '{template}' has no matching field in data item")]
    Placeholder { template: String, name: String },

    /// File system I/O error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// TOML parsing error.
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// Generic configuration crate error.
    #[error("Config crate error: {0}")]
    ConfigCrate(#[from] config::ConfigError),
}

impl CoreError {
    /// Create a new configuration error with a message.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
            source: None,
        }
    }

    /// Create a new configuration error with source.
    pub fn config_with_source(
        message: impl Into<String>,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Config {
            message: message.into(),
            source: Some(Box::new(source)),
        }
    }

    /// Create a new placeholder error.
    pub fn placeholder(template: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Placeholder {
            template: template.into(),
            name: name.into(),
        }
    }
}
