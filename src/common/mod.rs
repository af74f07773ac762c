//! Common types and utilities shared by the parser and the package writer.
//!
//! This module holds the crate-wide error types and the XML escaping helpers
//! used wherever user text is embedded in a document part.

// Submodule declarations
pub mod error;
pub mod xml;

// Re-exports for convenience
pub use error::{Error, Result, SerializationError};
