/// Table types and implementation for DOCX documents.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use std::fmt::Write as FmtWrite;

use super::paragraph::MutableParagraph;
use super::relmap::RelCursor;

/// Style ID of the bordered grid table style.
pub const TABLE_GRID_STYLE: &str = "TableGrid";

/// Text width of a letter page with one-inch margins, in twips.
pub(crate) const TEXT_WIDTH_TWIPS: u32 = 9360;

/// Table properties.
#[derive(Debug)]
pub(crate) struct TableProperties {
    pub(crate) style: Option<String>,
    /// Width in fiftieths of a percent
    pub(crate) width_pct: u32,
    /// Left indent in twips
    pub(crate) indent_left: Option<u32>,
}

impl Default for TableProperties {
    fn default() -> Self {
        Self {
            style: Some(TABLE_GRID_STYLE.to_string()),
            width_pct: 5000,
            indent_left: None,
        }
    }
}

/// Cell properties.
#[derive(Debug, Default, Clone)]
pub struct CellProperties {
    /// Cell background color in hex RGB format
    pub background_color: Option<String>,
}

/// A mutable table.
#[derive(Debug)]
pub struct MutableTable {
    pub(crate) rows: Vec<MutableRow>,
    /// Grid column count; every row is padded to it on output
    pub(crate) column_count: usize,
    pub(crate) properties: TableProperties,
}

impl MutableTable {
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        let mut table = Self {
            rows: Vec::with_capacity(rows),
            column_count: cols,
            properties: TableProperties::default(),
        };
        for _ in 0..rows {
            table.add_row();
        }
        table
    }

    /// Add a new row with one empty cell per column.
    pub fn add_row(&mut self) -> &mut MutableRow {
        self.rows.push(MutableRow::new(self.column_count));
        let last = self.rows.len() - 1;
        &mut self.rows[last]
    }

    /// Indent the table from the left margin, in twips.
    pub fn set_indent_left(&mut self, twips: u32) {
        self.properties.indent_left = Some(twips);
    }

    /// Get a cell by row and column index.
    pub fn cell(&mut self, row: usize, col: usize) -> Option<&mut MutableCell> {
        self.rows.get_mut(row)?.cell(col)
    }

    #[inline]
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    #[inline]
    pub fn column_count(&self) -> usize {
        self.column_count
    }

    /// Get a row by index.
    pub fn row(&mut self, index: usize) -> Option<&mut MutableRow> {
        self.rows.get_mut(index)
    }

    /// Paragraphs of every cell, row by row.
    pub(crate) fn paragraphs(&self) -> impl Iterator<Item = &MutableParagraph> {
        self.rows
            .iter()
            .flat_map(|row| row.cells.iter())
            .flat_map(|cell| cell.paragraphs.iter())
    }

    pub(crate) fn to_xml(&self, xml: &mut String, rels: &mut RelCursor<'_>) -> Result<()> {
        xml.push_str("<w:tbl><w:tblPr>");

        if let Some(ref style) = self.properties.style {
            write!(xml, "<w:tblStyle w:val=\"{}\"/>", escape_xml(style))
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        }
        write!(
            xml,
            "<w:tblW w:w=\"{}\" w:type=\"pct\"/>",
            self.properties.width_pct
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        if let Some(indent) = self.properties.indent_left {
            write!(xml, "<w:tblInd w:w=\"{}\" w:type=\"dxa\"/>", indent)
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        }
        xml.push_str("<w:tblLook w:val=\"04A0\" w:firstRow=\"1\" w:lastRow=\"0\" w:firstColumn=\"1\" w:lastColumn=\"0\" w:noHBand=\"0\" w:noVBand=\"1\"/>");
        xml.push_str("</w:tblPr>");

        let cols = self.column_count.max(1);
        let col_width = TEXT_WIDTH_TWIPS / cols as u32;
        xml.push_str("<w:tblGrid>");
        for _ in 0..cols {
            write!(xml, "<w:gridCol w:w=\"{}\"/>", col_width)
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        }
        xml.push_str("</w:tblGrid>");

        for row in &self.rows {
            row.to_xml(xml, cols, rels)?;
        }

        xml.push_str("</w:tbl>");
        Ok(())
    }
}

/// A mutable table row.
#[derive(Debug)]
pub struct MutableRow {
    pub(crate) cells: Vec<MutableCell>,
    /// Repeat this row at the top of each page
    pub(crate) is_header: bool,
}

impl MutableRow {
    pub(crate) fn new(cols: usize) -> Self {
        Self {
            cells: (0..cols).map(|_| MutableCell::new()).collect(),
            is_header: false,
        }
    }

    /// Get a cell by index.
    pub fn cell(&mut self, index: usize) -> Option<&mut MutableCell> {
        self.cells.get_mut(index)
    }

    /// Mark the row as a header row.
    pub fn set_header(&mut self, is_header: bool) {
        self.is_header = is_header;
    }

    fn to_xml(&self, xml: &mut String, cols: usize, rels: &mut RelCursor<'_>) -> Result<()> {
        xml.push_str("<w:tr>");
        if self.is_header {
            xml.push_str("<w:trPr><w:tblHeader/></w:trPr>");
        }

        for cell in self.cells.iter().take(cols) {
            cell.to_xml(xml, rels)?;
        }
        // A w:tc must hold at least one paragraph
        for _ in self.cells.len()..cols {
            xml.push_str("<w:tc><w:p/></w:tc>");
        }

        xml.push_str("</w:tr>");
        Ok(())
    }
}

/// A mutable table cell.
#[derive(Debug)]
pub struct MutableCell {
    pub(crate) paragraphs: Vec<MutableParagraph>,
    pub(crate) properties: CellProperties,
}

impl MutableCell {
    pub(crate) fn new() -> Self {
        Self {
            paragraphs: vec![MutableParagraph::new()],
            properties: CellProperties::default(),
        }
    }

    /// The first paragraph, which every cell has.
    pub fn first_paragraph(&mut self) -> &mut MutableParagraph {
        if self.paragraphs.is_empty() {
            self.paragraphs.push(MutableParagraph::new());
        }
        &mut self.paragraphs[0]
    }

    /// Add a new paragraph to the cell.
    pub fn add_paragraph(&mut self) -> &mut MutableParagraph {
        self.paragraphs.push(MutableParagraph::new());
        let last = self.paragraphs.len() - 1;
        &mut self.paragraphs[last]
    }

    /// Replace the cell content with a single run of text.
    pub fn set_text(&mut self, text: &str) {
        self.paragraphs.clear();
        self.add_paragraph().add_run_with_text(text);
    }

    /// Set cell background color in hex RGB format (e.g., "F2F2F2").
    pub fn set_background_color(&mut self, color: &str) {
        self.properties.background_color = Some(color.to_string());
    }

    fn to_xml(&self, xml: &mut String, rels: &mut RelCursor<'_>) -> Result<()> {
        xml.push_str("<w:tc>");

        if let Some(ref bg_color) = self.properties.background_color {
            write!(
                xml,
                "<w:tcPr><w:shd w:val=\"clear\" w:color=\"auto\" w:fill=\"{}\"/></w:tcPr>",
                escape_xml(bg_color)
            )
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        }

        if self.paragraphs.is_empty() {
            xml.push_str("<w:p/>");
        }
        for para in &self.paragraphs {
            para.to_xml(xml, rels)?;
        }

        xml.push_str("</w:tc>");
        Ok(())
    }
}
