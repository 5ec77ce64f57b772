//! Error types for the varna tokenizer libraries.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tokenizer libraries.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Requested vocabulary cannot hold a single merge
    #[error("Invalid vocabulary size {requested}: must be greater than 256")]
    InvalidVocabSize { requested: usize },

    /// Token ID not present in the model's token table
    #[error("Unknown token ID: {0}")]
    UnknownToken(u32),

    /// A loaded model violates the token table / merge rule invariants
    #[error("Malformed model: {0}")]
    MalformedModel(String),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },

    /// JSON serialization/deserialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Invalid configuration
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),
}

impl TokenizerError {
    /// Wrap an I/O error together with the path that produced it.
    pub fn io(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            err,
        }
    }

    pub(crate) fn malformed(msg: impl Into<String>) -> Self {
        Self::MalformedModel(msg.into())
    }
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
