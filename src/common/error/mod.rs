//! Error types for md2docx.
//!
//! The conversion core has exactly one failure mode, [`SerializationError`],
//! raised when a package part cannot be encoded or the archive cannot be
//! written. Malformed Markdown is never an error. The broader [`Error`] type
//! is used by the file-level API and the command-line adapter.

// Submodule declarations
pub mod types;
pub mod conversions;

// Re-exports
pub use types::{Error, Result, SerializationError};
