//! Error types for label export operations.

use thiserror::Error;

/// Errors that can occur while exporting labels.
#[derive(Error, Debug)]
pub enum FormatError {
    /// I/O error during file operations
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON serialization error
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// ZIP archive read or write error
    #[error("ZIP error: {0}")]
    Zip(#[from] zip::result::ZipError),

    /// The bytes behind an item source could not be read
    #[error("Source unavailable for '{name}': {message}")]
    SourceUnavailable {
        /// Item name
        name: String,
        /// What went wrong
        message: String,
    },

    /// Operation not supported for this session
    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}

impl FormatError {
    /// Create a source-unavailable error.
    pub fn source_unavailable(name: impl Into<String>, message: impl ToString) -> Self {
        Self::SourceUnavailable {
            name: name.into(),
            message: message.to_string(),
        }
    }
}
