// src/error.rs

//! Unified error handling for the converter.

use std::fmt;
use std::path::Path;

use thiserror::Error;

/// Result type alias for converter operations.
pub type Result<T> = std::result::Result<T, AppError>;

/// Unified application error type.
///
/// Every variant is fatal for the operation that produced it; recoverable
/// conditions are reported as warnings through the [`Reporter`](crate::report::Reporter)
/// and never surface here.
#[derive(Error, Debug)]
pub enum AppError {
    /// I/O operation failed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization/deserialization failed
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// YAML serialization/deserialization failed
    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    /// TOML parsing failed
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    /// TOML serialization failed
    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    /// problem.xml is not well-formed
    #[error("XML parse error: {0}")]
    Xml(#[from] roxmltree::Error),

    /// Zip archive error
    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("URL parse error: {0}")]
    Url(#[from] url::ParseError),

    /// Structural defect in a Polygon package
    #[error("Invalid package at '{path}': {message}")]
    Package { path: String, message: String },

    /// Malformed markup region in free-text notes
    #[error("Markup error: {0}")]
    Markup(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Document rendering failed
    #[error("Render error: {0}")]
    Render(String),

    /// Remote API returned a non-success response
    #[error("API error from {service}: {message}")]
    Api { service: String, message: String },

    /// One or more problems failed during a pipeline run
    #[error("Run failed: {0}")]
    Run(String),
}

impl AppError {
    /// Create a package error pointing at the offending path.
    pub fn package(path: impl AsRef<Path>, message: impl fmt::Display) -> Self {
        Self::Package {
            path: path.as_ref().display().to_string(),
            message: message.to_string(),
        }
    }

    /// Create a markup error.
    pub fn markup(message: impl Into<String>) -> Self {
        Self::Markup(message.into())
    }

    /// Create a configuration error.
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Create a render error.
    pub fn render(message: impl Into<String>) -> Self {
        Self::Render(message.into())
    }

    /// Create an API error with the service name as context.
    pub fn api(service: impl Into<String>, message: impl fmt::Display) -> Self {
        Self::Api {
            service: service.into(),
            message: message.to_string(),
        }
    }
}
