// src/errors.rs

//! Crate-wide error aliases and helpers.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum LaunchError {
    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("JSON parsing error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// A hook subscriber rejected an event. Never retried or swallowed.
    #[error("hook `{event}` failed: {source}")]
    HookFailed {
        event: &'static str,
        source: anyhow::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl LaunchError {
    pub fn hook(event: &'static str, source: anyhow::Error) -> Self {
        LaunchError::HookFailed { event, source }
    }
}

pub use anyhow::Error;
pub type Result<T> = std::result::Result<T, LaunchError>;
