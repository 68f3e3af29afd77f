//! Error types for vocabot.
//!
//! Generation itself never fails: every tier either produces lines or falls
//! through. These errors cover the edges around it (external backends, content
//! files and configuration).

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by an external generation backend.
#[derive(Error, Debug)]
pub enum GenerationError {
    /// Backend is not configured or cannot be reached
    #[error("external generator unavailable: {0}")]
    Unavailable(String),

    /// Backend answered with an error
    #[error("external generator failed: {0}")]
    Backend(String),

    /// Backend answered but nothing usable could be parsed out of it
    #[error("external generator returned no dialogue")]
    EmptyResponse,
}

/// Failure while loading the lexicon, dialogue or template tables.
#[derive(Error, Debug)]
pub enum ContentError {
    #[error("failed to read content file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse content table '{table}': {source}")]
    Parse {
        table: &'static str,
        #[source]
        source: serde_json::Error,
    },

    #[error("invalid content: {0}")]
    Invalid(String),
}

/// Failure while loading `vocabot.toml`.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("failed to read config file {path:?}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("content_dir '{0}' is not a directory")]
    InvalidContentDir(String),

    #[error("invalid setting: {0}")]
    InvalidSetting(String),
}
