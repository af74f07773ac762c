/// Document model produced by the Markdown parser.
///
/// A [`Document`] is an ordered sequence of [`Block`]s in reading order.
/// Blocks and inlines are closed sum types: the package writer matches on
/// them exhaustively, so adding a variant forces every lowering site to be
/// updated.

/// Deepest nesting the parser builds for block quotes, lists and emphasis.
///
/// Markers past this depth are kept as literal text, which bounds recursion
/// in the parser and in every consumer that walks the model.
pub const MAX_NESTING_DEPTH: usize = 64;

/// A parsed Markdown document.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Document {
    /// Top-level blocks in reading order
    pub blocks: Vec<Block>,
}

impl Document {
    /// Create a document from a block sequence.
    #[inline]
    pub fn new(blocks: Vec<Block>) -> Self {
        Self { blocks }
    }

    /// Number of top-level blocks.
    #[inline]
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    /// Whether the document has no blocks.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    /// Iterate over top-level blocks.
    #[inline]
    pub fn iter(&self) -> std::slice::Iter<'_, Block> {
        self.blocks.iter()
    }

    /// Plain text of the first top-level heading with the given level.
    pub fn first_heading_text(&self, level: u8) -> Option<String> {
        self.blocks.iter().find_map(|block| match block {
            Block::Heading { level: l, content } if *l == level => Some(plain_text(content)),
            _ => None,
        })
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Block;
    type IntoIter = std::slice::Iter<'a, Block>;

    fn into_iter(self) -> Self::IntoIter {
        self.blocks.iter()
    }
}

/// Block-level elements.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Block {
    /// ATX heading, `level` is 1..=6
    Heading { level: u8, content: Vec<Inline> },
    Paragraph { content: Vec<Inline> },
    List(List),
    /// Fenced code, `text` is kept verbatim
    CodeBlock {
        language: Option<String>,
        text: String,
    },
    Table(Table),
    ThematicBreak,
    BlockQuote { blocks: Vec<Block> },
}

/// A list (ordered or unordered).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct List {
    pub ordered: bool,
    /// Number of the first item; always 1 for unordered lists
    pub start: u32,
    pub items: Vec<ListItem>,
}

impl List {
    /// Maximum nesting depth below and including this list.
    pub fn depth(&self) -> usize {
        1 + self
            .items
            .iter()
            .filter_map(|item| item.nested.as_ref())
            .map(List::depth)
            .max()
            .unwrap_or(0)
    }
}

/// A single list item, which may own a more-indented list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListItem {
    pub content: Vec<Inline>,
    pub nested: Option<List>,
}

/// Column alignment taken from a table's separator row.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Alignment {
    #[default]
    None,
    Left,
    Center,
    Right,
}

/// A pipe table. Every row has exactly `header.len()` cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    pub header: Vec<Cell>,
    pub rows: Vec<Vec<Cell>>,
    /// One entry per column
    pub alignments: Vec<Alignment>,
}

impl Table {
    /// Number of columns.
    #[inline]
    pub fn column_count(&self) -> usize {
        self.header.len()
    }
}

/// A table cell.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cell {
    pub content: Vec<Inline>,
}

/// Inline text spans with formatting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Inline {
    Text(String),
    Bold(Vec<Inline>),
    Italic(Vec<Inline>),
    /// Code span, verbatim
    Code(String),
    Link { text: String, url: String },
    Image { alt: String, url: String },
    /// Hard line break (trailing backslash or two trailing spaces)
    LineBreak,
}

/// Concatenate the visible text of a span sequence, dropping formatting.
pub fn plain_text(spans: &[Inline]) -> String {
    let mut out = String::new();
    push_plain_text(spans, &mut out);
    out
}

fn push_plain_text(spans: &[Inline], out: &mut String) {
    for span in spans {
        match span {
            Inline::Text(s) | Inline::Code(s) => out.push_str(s),
            Inline::Bold(children) | Inline::Italic(children) => push_plain_text(children, out),
            Inline::Link { text, .. } => out.push_str(text),
            Inline::Image { alt, .. } => out.push_str(alt),
            Inline::LineBreak => out.push(' '),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text(s: &str) -> Inline {
        Inline::Text(s.to_string())
    }

    #[test]
    fn test_plain_text_flattens_nesting() {
        let spans = vec![
            text("a "),
            Inline::Bold(vec![Inline::Italic(vec![text("b")])]),
            Inline::Code(" c".to_string()),
        ];
        assert_eq!(plain_text(&spans), "a b c");
    }

    #[test]
    fn test_first_heading_text() {
        let doc = Document::new(vec![
            Block::Heading {
                level: 2,
                content: vec![text("Sub")],
            },
            Block::Heading {
                level: 1,
                content: vec![text("Main")],
            },
        ]);
        assert_eq!(doc.first_heading_text(1).as_deref(), Some("Main"));
        assert_eq!(doc.first_heading_text(3), None);
    }

    #[test]
    fn test_list_depth() {
        let inner = List {
            ordered: false,
            start: 1,
            items: vec![ListItem {
                content: vec![text("b")],
                nested: None,
            }],
        };
        let outer = List {
            ordered: true,
            start: 1,
            items: vec![ListItem {
                content: vec![text("a")],
                nested: Some(inner),
            }],
        };
        assert_eq!(outer.depth(), 2);
    }
}
