//! Office Open XML (OOXML) package generation.
//!
//! # Architecture
//!
//! 1. **OPC layer** (`opc`): package model, relationships, content types
//!    and the zip container
//! 2. **Error types** (`error`)
//! 3. **WordprocessingML** (`docx`): the document writer and package
//!    assembly for `.docx` files
//!
//! # Example
//!
//! ```rust
//! use md2docx::ooxml::docx::{DocxPackage, PackageSettings};
//! use md2docx::ooxml::docx::writer::MutableDocument;
//! use md2docx::ooxml::opc::verify_package;
//!
//! let mut doc = MutableDocument::new();
//! doc.add_paragraph_with_text("Hello, World!");
//! let bytes = DocxPackage::new(doc, PackageSettings::default()).to_bytes()?;
//!
//! let report = verify_package(&bytes)?;
//! assert!(report.is_valid());
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
pub mod docx;
pub mod error;
pub mod opc;

pub use opc::{OpcPackage, PackURI};

pub use error::{OoxmlError, Result};
