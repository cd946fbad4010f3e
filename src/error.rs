//! Error types for dotlayer
//!
//! Reads never fail: typed accessors coerce instead of erroring. Only two
//! things surface as errors, a failed validation and a layer file that
//! exists but cannot be read.

use std::path::PathBuf;
use thiserror::Error;

/// Errors produced while loading or validating a [`ConfigStore`](crate::ConfigStore)
#[derive(Error, Debug)]
pub enum EnvError {
    /// One or more required keys are absent or empty
    #[error("Missing required env vars: {}", .missing.join(", "))]
    MissingRequired { missing: Vec<String> },

    /// A layer file exists but could not be read
    #[error("Failed to read {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl EnvError {
    /// Create a validation error from the keys that failed
    pub fn missing(keys: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self::MissingRequired {
            missing: keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Keys reported by a validation failure, in the order they were requested.
    ///
    /// Empty for I/O errors.
    pub fn missing_keys(&self) -> &[String] {
        match self {
            EnvError::MissingRequired { missing } => missing,
            EnvError::Io { .. } => &[],
        }
    }
}

/// Result type alias for dotlayer operations
pub type Result<T> = std::result::Result<T, EnvError>;
