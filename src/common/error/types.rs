//! Error type definitions.
use thiserror::Error;

/// Failure to encode a document package.
///
/// Raised only for system-level problems (the XML writer or the ZIP archive
/// could not encode a part). Document content never produces this error.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("failed to serialize document package: {cause}")]
pub struct SerializationError {
    cause: String,
}

impl SerializationError {
    /// Create a new serialization error with a human-readable cause.
    pub fn new(cause: impl Into<String>) -> Self {
        Self {
            cause: cause.into(),
        }
    }

    /// Human-readable description of what failed.
    #[inline]
    pub fn cause(&self) -> &str {
        &self.cause
    }
}

/// Error type for file-level conversions.
#[derive(Error, Debug)]
pub enum Error {
    /// The document package could not be produced
    #[error(transparent)]
    Serialization(#[from] SerializationError),

    /// IO error while acquiring input or delivering output
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// The input name does not carry a Markdown extension
    #[error("Unsupported input: {0} is not a Markdown file (.md or .markdown)")]
    UnsupportedInput(String),

    /// The input exceeds the configured size limit
    #[error("Input too large: {size} bytes exceeds the limit of {limit} bytes")]
    InputTooLarge { size: usize, limit: usize },
}

/// Result type for file-level conversions.
pub type Result<T> = std::result::Result<T, Error>;
