//! Markdown to DOCX conversion.
//!
//! This module joins the two halves of the crate: [`crate::markdown::parse`]
//! builds a [`Document`], and the lowering pass walks it once to fill a
//! [`MutableDocument`] that [`DocxPackage`] serializes.
//!
//! # Example
//!
//! ```rust
//! use md2docx::convert::{ConvertOptions, convert_file};
//!
//! let out = convert_file("notes.md", "# Notes\n\n- one\n- two", &ConvertOptions::default())?;
//! assert_eq!(out.filename, "notes.docx");
//! assert_eq!(&out.bytes[..2], b"PK");
//! # Ok::<(), md2docx::common::Error>(())
//! ```
mod lower;
mod options;
mod resolver;

pub use options::ConvertOptions;
pub use resolver::{
    DataUriResolver, FsResolver, ImageResolver, PLACEHOLDER_HEIGHT_EMU, PLACEHOLDER_WIDTH_EMU,
};

use log::debug;

use crate::common::{Error, Result, SerializationError};
use crate::markdown::{self, Document};
use crate::ooxml::docx::DocxPackage;
use crate::ooxml::docx::writer::MutableDocument;
use lower::Lowering;

/// File extensions recognized as Markdown, compared case-insensitively.
const MARKDOWN_EXTENSIONS: [&str; 2] = ["md", "markdown"];

/// A converted file: the derived output name and the package bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedFile {
    pub filename: String,
    pub bytes: Vec<u8>,
}

/// Converts Markdown with a fixed set of options and an image resolver.
///
/// A converter holds no mutable state, so one instance can serve any number
/// of conversions, including concurrent ones when `R` is `Sync`.
#[derive(Debug, Clone, Default)]
pub struct Converter<R = DataUriResolver> {
    options: ConvertOptions,
    resolver: R,
}

impl Converter<DataUriResolver> {
    /// Create a converter that only embeds `data:` URI images.
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            resolver: DataUriResolver,
        }
    }
}

impl<R: ImageResolver> Converter<R> {
    /// Replace the image resolver.
    pub fn with_resolver<S: ImageResolver>(self, resolver: S) -> Converter<S> {
        Converter {
            options: self.options,
            resolver,
        }
    }

    #[inline]
    pub fn options(&self) -> &ConvertOptions {
        &self.options
    }

    /// Lower a parsed document onto the DOCX writer model.
    pub fn lower(&self, document: &Document) -> MutableDocument {
        Lowering::new(&self.options, &self.resolver).lower(document)
    }

    /// Serialize a parsed document into `.docx` bytes.
    pub fn create_package(
        &self,
        document: &Document,
    ) -> std::result::Result<Vec<u8>, SerializationError> {
        let title = document.first_heading_text(1);
        let package = DocxPackage::new(self.lower(document), self.options.package_settings(title));
        let bytes = package.to_bytes()?;
        debug!("wrote package of {} bytes", bytes.len());
        Ok(bytes)
    }

    /// Parse `markdown` and serialize it into `.docx` bytes.
    pub fn convert(&self, markdown: &str) -> std::result::Result<Vec<u8>, SerializationError> {
        let document = markdown::parse(markdown);
        debug!("parsed {} top-level blocks", document.len());
        self.create_package(&document)
    }

    /// Convert a named Markdown file held in memory.
    ///
    /// Fails with [`Error::UnsupportedInput`] unless `name` ends in `.md` or
    /// `.markdown`.
    pub fn convert_file(&self, name: &str, markdown: &str) -> Result<ConvertedFile> {
        if !is_markdown_file_name(name) {
            return Err(Error::UnsupportedInput(name.to_string()));
        }
        Ok(ConvertedFile {
            filename: output_file_name(name),
            bytes: self.convert(markdown)?,
        })
    }
}

/// Convert Markdown to `.docx` bytes with default options.
///
/// # Examples
///
/// ```rust
/// let bytes = md2docx::markdown_to_docx("Some **bold** text.")?;
/// assert!(bytes.starts_with(b"PK"));
/// # Ok::<(), md2docx::SerializationError>(())
/// ```
pub fn markdown_to_docx(markdown: &str) -> std::result::Result<Vec<u8>, SerializationError> {
    Converter::new(ConvertOptions::default()).convert(markdown)
}

/// Convert Markdown to `.docx` bytes with the given options.
pub fn markdown_to_docx_with_options(
    markdown: &str,
    options: &ConvertOptions,
) -> std::result::Result<Vec<u8>, SerializationError> {
    Converter::new(options.clone()).convert(markdown)
}

/// Convert a named Markdown file held in memory, embedding only `data:` URI images.
pub fn convert_file(name: &str, markdown: &str, options: &ConvertOptions) -> Result<ConvertedFile> {
    Converter::new(options.clone()).convert_file(name, markdown)
}

/// Whether `name` carries a Markdown extension.
pub fn is_markdown_file_name(name: &str) -> bool {
    markdown_stem(name).is_some()
}

/// Derive the output name: `<stem>.md` becomes `<stem>.docx`; other names
/// get `.docx` appended.
pub fn output_file_name(name: &str) -> String {
    format!("{}.docx", markdown_stem(name).unwrap_or(name))
}

fn markdown_stem(name: &str) -> Option<&str> {
    let (stem, ext) = name.rsplit_once('.')?;
    let is_markdown = MARKDOWN_EXTENSIONS
        .iter()
        .any(|known| ext.eq_ignore_ascii_case(known));
    (is_markdown && !stem.is_empty()).then_some(stem)
}
