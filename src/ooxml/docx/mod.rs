/// Word (.docx) document generation.
///
/// # Architecture
///
/// - [`writer`]: the mutable document model (paragraphs, runs, tables,
///   pictures, styles and list numbering) and its WordprocessingML output
/// - [`DocxPackage`]: assembles the model into OPC parts and writes the
///   zip container
/// - [`format`]: formatting enums shared by the writer
///
/// # Example
///
/// ```rust
/// use md2docx::ooxml::docx::{DocxPackage, PackageSettings};
/// use md2docx::ooxml::docx::writer::MutableDocument;
///
/// let mut doc = MutableDocument::new();
/// doc.add_heading("Report", 1);
/// doc.add_paragraph().add_run_with_text("Done.").bold(true);
///
/// let settings = PackageSettings {
///     title: Some("Report".to_string()),
///     ..PackageSettings::default()
/// };
/// let bytes = DocxPackage::new(doc, settings).to_bytes()?;
/// assert!(!bytes.is_empty());
/// # Ok::<(), md2docx::ooxml::OoxmlError>(())
/// ```
pub mod format;
pub mod package;
pub mod writer;

pub use format::{ImageFormat, ParagraphAlignment};
pub use package::{DocxPackage, PackageSettings};
