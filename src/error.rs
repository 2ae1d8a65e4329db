//! Crate-wide error type.
//!
//! The error model is deliberately two-tier: anything returned as `Err` here
//! aborts the current operation; everything softer is a `tracing::warn!` at
//! the call site and the pipeline carries on.

use std::path::PathBuf;

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// Configuration loading or validation error.
    #[error("configuration error: {0}")]
    Config(String),

    /// Error from the `config` crate while merging sources.
    #[error("configuration error: {0}")]
    ConfigMerge(#[from] config::ConfigError),

    /// Metadata file is structurally invalid (missing required fields).
    #[error("invalid metadata: {0}")]
    Metadata(String),

    /// Metadata failed a business rule (format of a field value).
    #[error("validation failed: {0}")]
    Validation(String),

    /// A required external tool could not be found on PATH.
    #[error("{tool} not found on PATH (install it or set an explicit executable path)")]
    ToolMissing { tool: String },

    /// The external ripper exited non-zero.
    #[error("{tool} failed with {status} after {elapsed_secs:.1}s")]
    RipperFailed {
        tool: String,
        status: String,
        elapsed_secs: f64,
    },

    /// Refusing to overwrite an existing generated file.
    #[error("{0} already exists (use --overwrite to replace)")]
    AlreadyExists(PathBuf),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
