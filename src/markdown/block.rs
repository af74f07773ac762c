/// Block parser.
///
/// Walks the source line by line, classifying each line with the scanner
/// and grouping lines into blocks. Every malformed construct has a
/// deterministic fallback, so parsing never fails.
use log::{debug, trace, warn};

use super::document::{Alignment, Block, Cell, Document, List, ListItem, MAX_NESTING_DEPTH, Table};
use super::inline::parse_inlines;
use super::scanner::{
    self, LineKind, ListMarker, closes_fence, fence_language, is_table_start, separator_row,
    split_cells,
};

/// Indentation increase that opens a nested list.
const NESTING_STEP: usize = 2;

/// Parse Markdown text into a document.
///
/// Non-empty input always yields at least one block.
pub fn parse(markdown: &str) -> Document {
    let lines: Vec<&str> = markdown.lines().collect();
    let mut blocks = BlockParser::new(&lines).parse();
    if blocks.is_empty() && !markdown.is_empty() {
        blocks.push(Block::Paragraph {
            content: Vec::new(),
        });
    }
    trace!("parsed {} top-level blocks", blocks.len());
    Document::new(blocks)
}

struct BlockParser<'a, 'l> {
    lines: &'l [&'a str],
    pos: usize,
    /// Block quote nesting of these lines
    depth: usize,
}

impl<'a, 'l> BlockParser<'a, 'l> {
    fn new(lines: &'l [&'a str]) -> Self {
        Self::nested(lines, 0)
    }

    fn nested(lines: &'l [&'a str], depth: usize) -> Self {
        Self {
            lines,
            pos: 0,
            depth,
        }
    }

    #[inline]
    fn peek(&self, offset: usize) -> Option<&'a str> {
        self.lines.get(self.pos + offset).copied()
    }

    fn parse(mut self) -> Vec<Block> {
        let mut blocks = Vec::new();
        while let Some(line) = self.peek(0) {
            if is_table_start(line, self.peek(1)) && !opens_other_block(line) {
                blocks.push(self.table());
                continue;
            }
            match scanner::classify(line) {
                LineKind::Blank => self.pos += 1,
                LineKind::Heading { level, text } => {
                    blocks.push(Block::Heading {
                        level,
                        content: parse_inlines(text),
                    });
                    self.pos += 1;
                },
                LineKind::ThematicBreak => {
                    blocks.push(Block::ThematicBreak);
                    self.pos += 1;
                },
                LineKind::Fence { marker, len, info } => {
                    blocks.push(self.code_block(marker, len, info));
                },
                LineKind::ListItem(marker) => {
                    blocks.push(Block::List(self.list(marker.indent, 1)));
                },
                LineKind::Quote { .. } => blocks.push(self.block_quote()),
                LineKind::Text(_) => blocks.push(self.paragraph()),
            }
        }
        blocks
    }

    /// Whether the line at `pos` begins a block and so ends a paragraph or item.
    fn starts_block(&self) -> bool {
        let Some(line) = self.peek(0) else {
            return true;
        };
        if is_table_start(line, self.peek(1)) {
            return true;
        }
        !matches!(scanner::classify(line), LineKind::Text(_))
    }

    fn paragraph(&mut self) -> Block {
        let mut text = String::new();
        while let Some(line) = self.peek(0) {
            if !text.is_empty() && self.starts_block() {
                break;
            }
            if !text.is_empty() {
                text.push('\n');
            }
            text.push_str(line.trim_start());
            self.pos += 1;
        }
        Block::Paragraph {
            content: parse_inlines(&text),
        }
    }

    fn code_block(&mut self, marker: u8, len: usize, info: &str) -> Block {
        let language = fence_language(info);
        self.pos += 1;

        let mut body: Vec<&str> = Vec::new();
        let mut closed = false;
        while let Some(line) = self.peek(0) {
            self.pos += 1;
            if closes_fence(line, marker, len) {
                closed = true;
                break;
            }
            body.push(line);
        }
        if !closed {
            warn!(
                "unterminated code fence, treating the remaining {} lines as code",
                body.len()
            );
        }

        Block::CodeBlock {
            language,
            text: body.join("\n"),
        }
    }

    fn block_quote(&mut self) -> Block {
        let mut inner: Vec<&'a str> = Vec::new();
        while let Some(line) = self.peek(0) {
            match scanner::classify(line) {
                LineKind::Quote { text } => inner.push(text),
                _ => break,
            }
            self.pos += 1;
        }
        let depth = self.depth + 1;
        if depth >= MAX_NESTING_DEPTH {
            // Too deep: remaining quote markers stay in the text
            debug!("block quote nesting capped at depth {}", depth);
            return Block::BlockQuote {
                blocks: vec![Block::Paragraph {
                    content: parse_inlines(&inner.join("\n")),
                }],
            };
        }
        Block::BlockQuote {
            blocks: BlockParser::nested(&inner, depth).parse(),
        }
    }

    fn table(&mut self) -> Block {
        let header_line = self.lines[self.pos];
        let separator = self.lines[self.pos + 1];
        self.pos += 2;

        let header: Vec<Cell> = split_cells(header_line).into_iter().map(cell).collect();
        let columns = header.len();
        let mut alignments = separator_row(separator).unwrap_or_default();
        alignments.resize(columns, Alignment::None);

        let mut rows = Vec::new();
        while let Some(line) = self.peek(0) {
            if line.trim().is_empty() || !scanner::has_pipe(line) {
                break;
            }
            let mut row: Vec<Cell> = split_cells(line).into_iter().map(cell).collect();
            if row.len() != columns {
                warn!(
                    "table row has {} cells but the header has {}, normalizing",
                    row.len(),
                    columns
                );
                row.resize_with(columns, Cell::default);
            }
            rows.push(row);
            self.pos += 1;
        }

        Block::Table(Table {
            header,
            rows,
            alignments,
        })
    }

    /// Parse a list whose items sit at `indent`, `depth` lists deep.
    ///
    /// Items indented at least [`NESTING_STEP`] further open a nested list on
    /// the preceding item; items indented less end this list. Once `depth`
    /// reaches [`MAX_NESTING_DEPTH`], deeper items join this list instead.
    fn list(&mut self, indent: usize, depth: usize) -> List {
        let mut list: Option<List> = None;
        let mut current: Option<(String, Option<List>)> = None;

        while let Some(line) = self.peek(0) {
            match scanner::classify(line) {
                LineKind::ListItem(marker) if marker.indent < indent => break,
                LineKind::ListItem(marker)
                    if marker.indent >= indent + NESTING_STEP && depth < MAX_NESTING_DEPTH =>
                {
                    let nested = self.list(marker.indent, depth + 1);
                    // The first line of a list is always an item, so `current` is set
                    let mut sibling = None;
                    match current.as_mut() {
                        Some((_, Some(existing))) if existing.ordered == nested.ordered => {
                            existing.items.extend(nested.items);
                        },
                        Some((_, slot @ None)) => *slot = Some(nested),
                        Some((_, Some(_))) => sibling = Some(nested),
                        None => {},
                    }
                    // A sibling list of the other kind goes on a contentless item
                    if let Some(nested) = sibling {
                        if let (Some(list), Some(item)) = (list.as_mut(), current.take()) {
                            list.items.push(finish_item(item));
                        }
                        current = Some((String::new(), Some(nested)));
                    }
                },
                LineKind::ListItem(marker) => {
                    let list = list.get_or_insert_with(|| new_list(&marker));
                    if let Some(item) = current.take() {
                        list.items.push(finish_item(item));
                    }
                    current = Some((marker.text.to_string(), None));
                    self.pos += 1;
                },
                LineKind::Blank => {
                    if !self.list_continues_after_blank(indent) {
                        break;
                    }
                    self.pos += 1;
                },
                LineKind::Text(text)
                    if !is_table_start(line, self.peek(1)) && current.is_some() =>
                {
                    if let Some((content, _)) = current.as_mut() {
                        if !content.is_empty() {
                            content.push('\n');
                        }
                        content.push_str(text.trim());
                    }
                    self.pos += 1;
                },
                _ => break,
            }
        }

        let mut list = list.unwrap_or(List {
            ordered: false,
            start: 1,
            items: Vec::new(),
        });
        if let Some(item) = current.take() {
            list.items.push(finish_item(item));
        }
        list
    }

    /// After a blank line, a list goes on only if the next non-blank line is
    /// an item at this list's level or deeper.
    fn list_continues_after_blank(&self, indent: usize) -> bool {
        self.lines[self.pos..]
            .iter()
            .find(|line| !line.trim().is_empty())
            .is_some_and(|line| {
                matches!(scanner::classify(line), LineKind::ListItem(m) if m.indent >= indent)
            })
    }
}

/// Headings, thematic breaks and fences win over a table reading of the same line.
fn opens_other_block(line: &str) -> bool {
    matches!(
        scanner::classify(line),
        LineKind::Heading { .. } | LineKind::ThematicBreak | LineKind::Fence { .. }
    )
}

fn new_list(marker: &ListMarker<'_>) -> List {
    List {
        ordered: marker.ordered,
        start: if marker.ordered { marker.number } else { 1 },
        items: Vec::new(),
    }
}

fn finish_item((content, nested): (String, Option<List>)) -> ListItem {
    ListItem {
        content: parse_inlines(&content),
        nested,
    }
}

fn cell(raw: &str) -> Cell {
    Cell {
        content: parse_inlines(raw.trim()),
    }
}
