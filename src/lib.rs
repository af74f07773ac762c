//! md2docx - Markdown to Word (.docx) conversion
//!
//! The crate has two halves that run in sequence:
//!
//! - **Markdown parser** ([`markdown`]): a total function from text to a
//!   [`markdown::Document`]. Malformed syntax degrades to literal text and
//!   never produces an error.
//! - **Package generator** ([`ooxml`]): a WordprocessingML writer on top of
//!   an Open Packaging Conventions layer, producing the `.docx` ZIP archive.
//!
//! [`convert`] connects them and is the usual entry point.
//!
//! # Features
//!
//! - ATX headings, paragraphs, bold, italic, code spans and hard breaks
//! - Ordered and bulleted lists with nesting and start numbers
//! - Fenced code blocks, block quotes, thematic breaks
//! - Pipe tables with column alignment
//! - Hyperlinks, and images embedded from `data:` URIs or local files
//! - Deterministic output: identical input yields identical bytes
//!
//! # Example - Converting text
//!
//! ```rust
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let bytes = md2docx::markdown_to_docx("# Title\n\nSome **bold** text.")?;
//! assert!(bytes.starts_with(b"PK"));
//! # Ok(())
//! # }
//! ```
//!
//! # Example - Inspecting the parsed document
//!
//! ```rust
//! use md2docx::markdown::{self, Block};
//!
//! let doc = markdown::parse("- item1\n- item2");
//! match &doc.blocks[0] {
//!     Block::List(list) => assert_eq!(list.items.len(), 2),
//!     other => panic!("unexpected block {other:?}"),
//! }
//! ```
//!
//! # Example - Converting a file with local images
//!
//! ```no_run
//! use md2docx::convert::{ConvertOptions, Converter, FsResolver};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let text = std::fs::read_to_string("docs/guide.md")?;
//! let converter = Converter::new(ConvertOptions::default()).with_resolver(FsResolver::new("docs"));
//! let out = converter.convert_file("guide.md", &text)?;
//! std::fs::write(&out.filename, &out.bytes)?;
//! # Ok(())
//! # }
//! ```

/// Error types and XML helpers shared across the crate
pub mod common;

/// Markdown to DOCX conversion API
pub mod convert;

/// Markdown parser and document model
pub mod markdown;

/// Office Open XML package generation
pub mod ooxml;

pub use common::{Error, Result, SerializationError};
pub use convert::{
    ConvertOptions, ConvertedFile, Converter, convert_file, markdown_to_docx,
    markdown_to_docx_with_options, output_file_name,
};
