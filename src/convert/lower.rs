/// Lowering of the Markdown document model onto the DOCX writer.
///
/// A single pass over the block sequence. Every block and inline variant
/// has an encoding, so lowering cannot fail.
use log::{debug, warn};

use super::options::ConvertOptions;
use super::resolver::{
    ImageResolver, PLACEHOLDER_HEIGHT_EMU, PLACEHOLDER_WIDTH_EMU, embedded_image,
};
use crate::markdown::{Alignment, Block, Document, Inline, List, Table};
use crate::ooxml::docx::writer::numbering::level_indent;
use crate::ooxml::docx::writer::{
    CODE_BLOCK_STYLE, LIST_PARAGRAPH_STYLE, MutableDocument, MutableInlineImage,
    MutableParagraph, MutableRun, ParagraphAlignment, QUOTE_STYLE, heading_style_id,
};

/// Indent added per block quote level, in twips.
const QUOTE_INDENT_TWIPS: u32 = 720;

/// Header row cell fill.
const HEADER_FILL: &str = "F2F2F2";

/// Deepest list level the numbering part defines.
const MAX_LIST_LEVEL: u32 = 8;

/// Run formatting inherited from enclosing emphasis.
#[derive(Debug, Clone, Copy, Default)]
struct RunFormat {
    bold: bool,
    italic: bool,
}

impl RunFormat {
    fn apply(self, run: &mut MutableRun) {
        if self.bold {
            run.bold(true);
        }
        if self.italic {
            run.italic(true);
        }
    }
}

pub(crate) struct Lowering<'a, R: ?Sized> {
    options: &'a ConvertOptions,
    resolver: &'a R,
}

impl<'a, R: ImageResolver + ?Sized> Lowering<'a, R> {
    pub(crate) fn new(options: &'a ConvertOptions, resolver: &'a R) -> Self {
        Self { options, resolver }
    }

    pub(crate) fn lower(&self, document: &Document) -> MutableDocument {
        let mut out = MutableDocument::new();
        self.lower_blocks(&mut out, &document.blocks, 0);

        // Word expects at least one paragraph in the body
        if out.paragraph_count() == 0 && out.table_count() == 0 {
            out.add_paragraph();
        }

        debug!(
            "lowered {} blocks into {} paragraphs and {} tables",
            document.len(),
            out.paragraph_count(),
            out.table_count()
        );
        out
    }

    fn lower_blocks(&self, out: &mut MutableDocument, blocks: &[Block], quote_depth: u32) {
        for block in blocks {
            self.lower_block(out, block, quote_depth);
        }
    }

    fn lower_block(&self, out: &mut MutableDocument, block: &Block, quote_depth: u32) {
        match block {
            Block::Heading { level, content } => {
                let para = out.add_paragraph();
                para.set_style(&heading_style_id(*level));
                quote_indent(para, quote_depth);
                self.lower_inlines(para, content, RunFormat::default());
            },
            Block::Paragraph { content } => {
                let para = out.add_paragraph();
                if quote_depth > 0 {
                    para.set_style(QUOTE_STYLE);
                    quote_indent(para, quote_depth);
                }
                self.lower_inlines(para, content, RunFormat::default());
            },
            Block::List(list) => self.lower_list(out, list, 0, quote_depth),
            Block::CodeBlock { text, .. } => {
                let para = out.add_paragraph();
                para.set_style(CODE_BLOCK_STYLE);
                quote_indent(para, quote_depth);
                if !text.is_empty() {
                    let run = para.add_run();
                    for (i, line) in text.split('\n').enumerate() {
                        if i > 0 {
                            run.add_break();
                        }
                        run.add_text(line);
                    }
                }
            },
            Block::Table(table) => self.lower_table(out, table, quote_depth),
            Block::ThematicBreak => {
                let para = out.add_paragraph();
                para.set_bottom_border(true);
                quote_indent(para, quote_depth);
            },
            Block::BlockQuote { blocks } => {
                if blocks.is_empty() {
                    let para = out.add_paragraph();
                    para.set_style(QUOTE_STYLE);
                    quote_indent(para, quote_depth + 1);
                } else {
                    self.lower_blocks(out, blocks, quote_depth + 1);
                }
            },
        }
    }

    fn lower_list(&self, out: &mut MutableDocument, list: &List, level: u32, quote_depth: u32) {
        let level = level.min(MAX_LIST_LEVEL);
        let num_id = if list.ordered {
            out.numbering_mut().add_ordered_list(list.start, level)
        } else {
            out.numbering().bullet()
        };

        for item in &list.items {
            // A contentless item only carries a sibling nested list
            if !(item.content.is_empty() && item.nested.is_some()) {
                let para = out.add_paragraph();
                para.set_numbering(num_id, level);
                if quote_depth > 0 {
                    para.set_style(QUOTE_STYLE);
                    // Paragraph indent replaces the numbering level's own indent
                    para.set_indent_left(quote_twips(quote_depth) + level_indent(level));
                } else {
                    para.set_style(LIST_PARAGRAPH_STYLE);
                }
                self.lower_inlines(para, &item.content, RunFormat::default());
            }

            if let Some(nested) = &item.nested {
                self.lower_list(out, nested, level + 1, quote_depth);
            }
        }
    }

    fn lower_table(&self, out: &mut MutableDocument, table: &Table, quote_depth: u32) {
        let cols = table.column_count();
        let alignments: Vec<Option<ParagraphAlignment>> = (0..cols)
            .map(|col| {
                table
                    .alignments
                    .get(col)
                    .copied()
                    .and_then(paragraph_alignment)
            })
            .collect();

        let rows = std::iter::once((true, &table.header)).chain(table.rows.iter().map(|r| (false, r)));
        let out_table = out.add_table(0, cols);
        if quote_depth > 0 {
            out_table.set_indent_left(quote_twips(quote_depth));
        }
        for (is_header, cells) in rows {
            let row = out_table.add_row();
            row.set_header(is_header);
            let format = RunFormat {
                bold: is_header,
                italic: false,
            };
            for (col, cell) in cells.iter().take(cols).enumerate() {
                let Some(out_cell) = row.cell(col) else {
                    break;
                };
                if is_header {
                    out_cell.set_background_color(HEADER_FILL);
                }
                let para = out_cell.first_paragraph();
                if let Some(alignment) = alignments[col] {
                    para.set_alignment(alignment);
                }
                self.lower_inlines(para, &cell.content, format);
            }
        }
    }

    fn lower_inlines(&self, para: &mut MutableParagraph, spans: &[Inline], format: RunFormat) {
        for span in spans {
            match span {
                Inline::Text(text) => {
                    if !text.is_empty() {
                        format.apply(para.add_run_with_text(text));
                    }
                },
                Inline::Bold(children) => self.lower_inlines(
                    para,
                    children,
                    RunFormat {
                        bold: true,
                        ..format
                    },
                ),
                Inline::Italic(children) => self.lower_inlines(
                    para,
                    children,
                    RunFormat {
                        italic: true,
                        ..format
                    },
                ),
                Inline::Code(code) => {
                    let run = para.add_run_with_text(code);
                    run.font_name(&self.options.code_font)
                        .font_size(self.options.code_font_size);
                    format.apply(run);
                },
                Inline::Link { text, url } => {
                    if url.trim().is_empty() {
                        format.apply(para.add_run_with_text(text));
                    } else {
                        let link = para.add_hyperlink(text, url.trim());
                        format.apply(link.run_mut());
                    }
                },
                Inline::Image { alt, url } => self.lower_image(para, alt, url.trim()),
                Inline::LineBreak => {
                    para.add_run().add_break();
                },
            }
        }
    }

    fn lower_image(&self, para: &mut MutableParagraph, alt: &str, url: &str) {
        if url.is_empty() {
            if !alt.is_empty() {
                para.add_run_with_text(alt);
            }
            return;
        }

        let resolved = self
            .resolver
            .resolve(url)
            .and_then(|data| embedded_image(data, self.options.max_image_width_emu));
        let mut image = match resolved {
            Some(image) => image,
            None => {
                warn!("image {} is not locally resolvable, writing a linked picture", url);
                MutableInlineImage::linked(url, PLACEHOLDER_WIDTH_EMU, PLACEHOLDER_HEIGHT_EMU)
            },
        };
        image.set_description(alt);
        para.add_image(image);
    }
}

fn quote_indent(para: &mut MutableParagraph, quote_depth: u32) {
    if quote_depth > 0 {
        para.set_indent_left(quote_twips(quote_depth));
    }
}

#[inline]
fn quote_twips(quote_depth: u32) -> u32 {
    QUOTE_INDENT_TWIPS.saturating_mul(quote_depth)
}

fn paragraph_alignment(alignment: Alignment) -> Option<ParagraphAlignment> {
    match alignment {
        Alignment::None => None,
        Alignment::Left => Some(ParagraphAlignment::Left),
        Alignment::Center => Some(ParagraphAlignment::Center),
        Alignment::Right => Some(ParagraphAlignment::Right),
    }
}
