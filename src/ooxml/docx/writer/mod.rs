//! Mutable document writer components for DOCX.
//!
//! Documents are assembled bottom-up: runs into paragraphs, paragraphs into
//! table cells or the body. Relationship IDs for hyperlinks and pictures are
//! allocated by the package before serialization and consumed in document
//! order.

pub mod doc;
pub mod hyperlink;
pub mod image;
pub mod numbering;
pub mod paragraph;
pub(crate) mod relmap;
pub mod run;
pub mod style;
pub mod table;

pub use doc::MutableDocument;
pub use hyperlink::{HYPERLINK_STYLE, MutableHyperlink};
pub use image::{EMU_PER_INCH, ImageFormat, ImageSource, MutableInlineImage};
pub use numbering::MutableNumbering;
pub use paragraph::{MutableParagraph, ParagraphAlignment};
pub use run::{MutableRun, RunContent};
pub use style::{
    CODE_BLOCK_STYLE, LIST_PARAGRAPH_STYLE, MutableStyle, NORMAL_STYLE, QUOTE_STYLE, StyleType,
    generate_styles_xml, heading_style_id,
};
pub use table::{CellProperties, MutableCell, MutableRow, MutableTable, TABLE_GRID_STYLE};
