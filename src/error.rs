//! Error handling module for kkm-patch
//!
//! Provides centralized error handling with proper error types using thiserror.
//! The library returns these; the binary wraps them in `anyhow` with context.

use std::path::PathBuf;

use thiserror::Error;

/// Main error type for kkm-patch
#[derive(Error, Debug)]
pub enum PatchError {
    /// IO errors (reading or writing the target file)
    #[error("IO error on {path:?}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Target file is not valid UTF-8
    #[error("File {0:?} is not valid UTF-8")]
    Encoding(PathBuf),

    /// A rule's regular expression failed to compile
    #[error("Invalid pattern for rule '{label}': {source}")]
    Pattern {
        label: String,
        #[source]
        source: regex::Error,
    },

    /// Patch plan failed validation
    #[error("Plan error: {0}")]
    Plan(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// One or more rules matched nothing (strict mode)
    #[error("Rules matched nothing in {path:?}: {}", .labels.join(", "))]
    Unmatched { path: PathBuf, labels: Vec<String> },
}

/// Result type alias for kkm-patch operations
pub type Result<T> = std::result::Result<T, PatchError>;

impl PatchError {
    /// Create an IO error tied to a path
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    /// Create a plan validation error
    pub fn plan(msg: impl Into<String>) -> Self {
        Self::Plan(msg.into())
    }
}
