/// Document writer implementation for DOCX.
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

use super::hyperlink::MutableHyperlink;
use super::image::MutableInlineImage;
use super::numbering::MutableNumbering;
use super::paragraph::MutableParagraph;
use super::relmap::RelationshipMapper;
use super::style::heading_style_id;
use super::table::MutableTable;

const DOCUMENT_NAMESPACES: &str = concat!(
    r#"xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships" "#,
    r#"xmlns:wp="http://schemas.openxmlformats.org/drawingml/2006/wordprocessingDrawing" "#,
    r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" "#,
    r#"xmlns:pic="http://schemas.openxmlformats.org/drawingml/2006/picture""#,
);

/// Letter paper, portrait, in twips.
const PAGE_WIDTH: u32 = 12240;
const PAGE_HEIGHT: u32 = 15840;
/// One inch on every side.
const PAGE_MARGIN: u32 = 1440;

/// Top-level body elements.
#[derive(Debug)]
pub(crate) enum BodyElement {
    Paragraph(MutableParagraph),
    Table(MutableTable),
}

/// A mutable Word document body for writing.
///
/// Content is appended in reading order. Lists draw their numbering
/// instances from the document's [`MutableNumbering`].
#[derive(Debug, Default)]
pub struct MutableDocument {
    /// Content elements in document order
    pub(crate) elements: Vec<BodyElement>,
    numbering: MutableNumbering,
}

impl MutableDocument {
    /// Create a new empty document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append an empty paragraph.
    pub fn add_paragraph(&mut self) -> &mut MutableParagraph {
        self.elements
            .push(BodyElement::Paragraph(MutableParagraph::new()));
        match self.elements.last_mut() {
            Some(BodyElement::Paragraph(p)) => p,
            _ => unreachable!(),
        }
    }

    /// Append a paragraph holding one run of text.
    pub fn add_paragraph_with_text(&mut self, text: &str) -> &mut MutableParagraph {
        let para = self.add_paragraph();
        para.add_run_with_text(text);
        para
    }

    /// Append a heading paragraph; `level` is clamped to 1..=6.
    pub fn add_heading(&mut self, text: &str, level: u8) -> &mut MutableParagraph {
        let para = self.add_paragraph_with_text(text);
        para.set_style(&heading_style_id(level));
        para
    }

    /// Append a table of empty cells.
    pub fn add_table(&mut self, rows: usize, cols: usize) -> &mut MutableTable {
        self.elements
            .push(BodyElement::Table(MutableTable::new(rows, cols)));
        match self.elements.last_mut() {
            Some(BodyElement::Table(t)) => t,
            _ => unreachable!(),
        }
    }

    /// Number of top-level paragraphs.
    pub fn paragraph_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, BodyElement::Paragraph(_)))
            .count()
    }

    /// Number of top-level tables.
    pub fn table_count(&self) -> usize {
        self.elements
            .iter()
            .filter(|e| matches!(e, BodyElement::Table(_)))
            .count()
    }

    /// Get a top-level paragraph by index.
    pub fn paragraph(&mut self, index: usize) -> Option<&mut MutableParagraph> {
        self.elements
            .iter_mut()
            .filter_map(|e| match e {
                BodyElement::Paragraph(p) => Some(p),
                _ => None,
            })
            .nth(index)
    }

    /// Get a top-level table by index.
    pub fn table(&mut self, index: usize) -> Option<&mut MutableTable> {
        self.elements
            .iter_mut()
            .filter_map(|e| match e {
                BodyElement::Table(t) => Some(t),
                _ => None,
            })
            .nth(index)
    }

    #[inline]
    pub fn numbering(&self) -> &MutableNumbering {
        &self.numbering
    }

    #[inline]
    pub fn numbering_mut(&mut self) -> &mut MutableNumbering {
        &mut self.numbering
    }

    /// Every paragraph in serialization order, table cells included.
    pub(crate) fn all_paragraphs(&self) -> impl Iterator<Item = &MutableParagraph> {
        self.elements.iter().flat_map(|element| {
            let (para, table) = match element {
                BodyElement::Paragraph(p) => (Some(p), None),
                BodyElement::Table(t) => (None, Some(t)),
            };
            para.into_iter()
                .chain(table.into_iter().flat_map(MutableTable::paragraphs))
        })
    }

    /// All hyperlinks in document order.
    pub(crate) fn collect_hyperlinks(&self) -> Vec<&MutableHyperlink> {
        self.all_paragraphs()
            .flat_map(MutableParagraph::hyperlinks)
            .collect()
    }

    /// All inline pictures in document order.
    pub(crate) fn collect_images(&self) -> Vec<&MutableInlineImage> {
        self.all_paragraphs()
            .flat_map(MutableParagraph::images)
            .collect()
    }

    /// Generate document.xml with relationship IDs from the mapper.
    ///
    /// The mapper must hold one ID per hyperlink and per image, in the
    /// order returned by `collect_hyperlinks` and `collect_images`.
    pub(crate) fn to_xml_with_rels(&self, rel_mapper: &RelationshipMapper) -> Result<String> {
        let mut xml = String::with_capacity(4096);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(xml, "<w:document {}><w:body>", DOCUMENT_NAMESPACES)?;

        let mut cursor = rel_mapper.cursor();
        for element in &self.elements {
            match element {
                BodyElement::Paragraph(para) => para.to_xml(&mut xml, &mut cursor)?,
                BodyElement::Table(table) => table.to_xml(&mut xml, &mut cursor)?,
            }
        }

        // sectPr must be the last child of the body
        write!(
            xml,
            r#"<w:sectPr><w:pgSz w:w="{}" w:h="{}"/><w:pgMar w:top="{m}" w:right="{m}" w:bottom="{m}" w:left="{m}" w:header="720" w:footer="720" w:gutter="0"/></w:sectPr>"#,
            PAGE_WIDTH,
            PAGE_HEIGHT,
            m = PAGE_MARGIN
        )?;

        xml.push_str("</w:body></w:document>");
        Ok(xml)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_empty_document() {
        let doc = MutableDocument::new();
        assert_eq!(doc.paragraph_count(), 0);
        assert_eq!(doc.table_count(), 0);
        let xml = doc.to_xml_with_rels(&RelationshipMapper::new()).unwrap();
        assert!(xml.contains("<w:body><w:sectPr>"));
    }

    #[test]
    fn test_add_table() {
        let mut doc = MutableDocument::new();
        let table = doc.add_table(2, 3);
        assert_eq!(table.row_count(), 2);
        table.cell(0, 0).unwrap().set_text("Cell 1");
        assert_eq!(doc.table_count(), 1);
        assert!(doc.table(0).is_some());
        assert!(doc.paragraph(0).is_none());
    }

    #[test]
    fn test_xml_generation() {
        let mut doc = MutableDocument::new();
        doc.add_heading("Title", 1);
        doc.add_paragraph_with_text("Test paragraph");

        let xml = doc.to_xml_with_rels(&RelationshipMapper::new()).unwrap();
        assert!(xml.contains(r#"xmlns:pic="#));
        assert!(xml.contains(r#"<w:pStyle w:val="Heading1"/>"#));
        assert!(xml.contains("Test paragraph"));
        assert!(xml.ends_with("</w:sectPr></w:body></w:document>"));
    }

    #[test]
    fn test_run_formatting() {
        let mut doc = MutableDocument::new();
        let para = doc.add_paragraph();
        para.add_run_with_text("Bold text").bold(true);
        para.add_run_with_text("Italic text").italic(true);

        let xml = doc.to_xml_with_rels(&RelationshipMapper::new()).unwrap();
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains("<w:i/>"));
    }

    #[test]
    fn test_collection_follows_serialization_order() {
        let mut doc = MutableDocument::new();
        doc.add_paragraph().add_hyperlink("one", "https://one.example");
        doc.add_table(1, 1)
            .cell(0, 0)
            .unwrap()
            .first_paragraph()
            .add_hyperlink("two", "https://two.example");
        doc.add_paragraph().add_hyperlink("three", "https://three.example");

        let urls: Vec<&str> = doc.collect_hyperlinks().iter().map(|h| h.url()).collect();
        assert_eq!(
            urls,
            ["https://one.example", "https://two.example", "https://three.example"]
        );

        let mut mapper = RelationshipMapper::new();
        for id in ["rId10", "rId11", "rId12"] {
            mapper.add_hyperlink(id.to_string());
        }
        let xml = doc.to_xml_with_rels(&mapper).unwrap();
        let pos = |s: &str| xml.find(s).unwrap();
        assert!(pos("rId10") < pos("two") && pos("rId11") < pos("three"));
        assert!(pos("rId12") > pos("two"));
    }
}
