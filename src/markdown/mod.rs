/// Markdown parsing into a lightweight document model.
///
/// The parser is a total function: every input, however malformed, yields a
/// [`Document`]. Unrecognized or unbalanced syntax degrades to literal text.
///
/// # Supported syntax
///
/// - ATX headings (`#` through `######`)
/// - Paragraphs with lazy continuation and hard line breaks
/// - Bold (`**`, `__`), italic (`*`, `_`), code spans, links and images
/// - Ordered and unordered lists, nested by indentation
/// - Fenced code blocks (backtick or tilde fences)
/// - Pipe tables with column alignment
/// - Thematic breaks and nested block quotes
///
/// # Quick Start
///
/// ```rust
/// use md2docx::markdown::{self, Block};
///
/// let doc = markdown::parse("# Title\n\nSome **bold** text.");
/// assert_eq!(doc.len(), 2);
/// assert!(matches!(doc.blocks[0], Block::Heading { level: 1, .. }));
/// ```
///
/// # Architecture
///
/// - [`document`]: the block and inline model
/// - `scanner`: single-line classification
/// - `block`: grouping lines into blocks
/// - [`inline`]: span-level parsing within a block
pub mod document;
pub mod inline;

mod block;
mod scanner;

pub use block::parse;
pub use document::{
    Alignment, Block, Cell, Document, Inline, List, ListItem, MAX_NESTING_DEPTH, Table, plain_text,
};
pub use inline::parse_inlines;
