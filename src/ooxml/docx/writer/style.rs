/// Style writer support for DOCX documents.
///
/// Every paragraph and character style the converter references is
/// defined here, so `word/styles.xml` never points at a missing style.
use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

use super::hyperlink::HYPERLINK_STYLE;
use super::table::TABLE_GRID_STYLE;

/// Style ID of the default paragraph style.
pub const NORMAL_STYLE: &str = "Normal";
/// Style ID of block quotes.
pub const QUOTE_STYLE: &str = "Quote";
/// Style ID of fenced code blocks.
pub const CODE_BLOCK_STYLE: &str = "CodeBlock";
/// Style ID of list paragraphs.
pub const LIST_PARAGRAPH_STYLE: &str = "ListParagraph";

/// Highest heading level with a dedicated style.
pub const MAX_HEADING_LEVEL: u8 = 6;

/// Style ID of the heading style for `level` (clamped to 1..=6).
pub fn heading_style_id(level: u8) -> String {
    format!("Heading{}", level.clamp(1, MAX_HEADING_LEVEL))
}

/// Kind of element a style applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StyleType {
    Paragraph,
    Character,
    Table,
}

impl StyleType {
    fn to_xml(self) -> &'static str {
        match self {
            Self::Paragraph => "paragraph",
            Self::Character => "character",
            Self::Table => "table",
        }
    }
}

/// A mutable style definition for writing.
///
/// # Examples
///
/// ```rust
/// use md2docx::ooxml::docx::writer::{MutableStyle, StyleType};
///
/// let mut style = MutableStyle::new("Note", "Note", StyleType::Paragraph);
/// style.set_based_on(Some("Normal".to_string()));
/// style.set_italic(true);
/// assert_eq!(style.style_id(), "Note");
/// ```
#[derive(Debug, Clone)]
pub struct MutableStyle {
    /// Style identifier (e.g., "Heading1")
    style_id: String,
    /// UI-visible name (e.g., "heading 1")
    name: String,
    style_type: StyleType,
    is_default: bool,
    is_custom: bool,
    based_on: Option<String>,
    /// Style applied to the following paragraph
    next: Option<String>,
    /// UI priority (lower = higher priority)
    priority: Option<i32>,
    is_quick_style: bool,
    /// Keep with next paragraph
    keep_next: bool,
    /// Outline level, 0-based; drives the navigation pane
    outline_level: Option<u8>,
    font_name: Option<String>,
    /// Font size in half-points (e.g., 24 = 12pt)
    font_size: Option<u32>,
    bold: bool,
    italic: bool,
    underline: bool,
    /// Font color (RGB hex format)
    color: Option<String>,
    /// Paragraph background fill (RGB hex format)
    shading: Option<String>,
    /// Left paragraph border color (RGB hex format)
    left_border: Option<String>,
    /// Single borders on every edge of a table style
    table_borders: bool,
    /// Space before paragraph in twips
    space_before: Option<u32>,
    /// Space after paragraph in twips
    space_after: Option<u32>,
    /// Line spacing in 240ths of a line
    line_spacing: Option<u32>,
    /// Left indent in twips
    indent_left: Option<i32>,
}

impl MutableStyle {
    /// Create a new custom style with the given ID, name, and type.
    pub fn new(style_id: impl Into<String>, name: impl Into<String>, style_type: StyleType) -> Self {
        Self {
            style_id: style_id.into(),
            name: name.into(),
            style_type,
            is_default: false,
            is_custom: true,
            based_on: None,
            next: None,
            priority: None,
            is_quick_style: false,
            keep_next: false,
            outline_level: None,
            font_name: None,
            font_size: None,
            bold: false,
            italic: false,
            underline: false,
            color: None,
            shading: None,
            left_border: None,
            table_borders: false,
            space_before: None,
            space_after: None,
            line_spacing: None,
            indent_left: None,
        }
    }

    #[inline]
    pub fn style_id(&self) -> &str {
        &self.style_id
    }

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn style_type(&self) -> StyleType {
        self.style_type
    }

    pub fn set_default(&mut self, is_default: bool) {
        self.is_default = is_default;
    }

    #[inline]
    pub fn is_default(&self) -> bool {
        self.is_default
    }

    pub fn set_custom(&mut self, is_custom: bool) {
        self.is_custom = is_custom;
    }

    #[inline]
    pub fn is_custom(&self) -> bool {
        self.is_custom
    }

    /// Set the base style ID.
    pub fn set_based_on(&mut self, based_on: Option<String>) {
        self.based_on = based_on;
    }

    #[inline]
    pub fn based_on(&self) -> Option<&str> {
        self.based_on.as_deref()
    }

    pub fn set_next(&mut self, next: Option<String>) {
        self.next = next;
    }

    pub fn set_priority(&mut self, priority: Option<i32>) {
        self.priority = priority;
    }

    pub fn set_quick_style(&mut self, is_quick_style: bool) {
        self.is_quick_style = is_quick_style;
    }

    pub fn set_keep_next(&mut self, keep_next: bool) {
        self.keep_next = keep_next;
    }

    pub fn set_outline_level(&mut self, level: Option<u8>) {
        self.outline_level = level;
    }

    pub fn set_font_name(&mut self, font_name: Option<String>) {
        self.font_name = font_name;
    }

    /// Set the font size in half-points (e.g., 24 = 12pt).
    pub fn set_font_size(&mut self, font_size: Option<u32>) {
        self.font_size = font_size;
    }

    #[inline]
    pub fn font_size(&self) -> Option<u32> {
        self.font_size
    }

    pub fn set_bold(&mut self, bold: bool) {
        self.bold = bold;
    }

    pub fn set_italic(&mut self, italic: bool) {
        self.italic = italic;
    }

    pub fn set_underline(&mut self, underline: bool) {
        self.underline = underline;
    }

    pub fn set_color(&mut self, color: Option<String>) {
        self.color = color;
    }

    /// Set a paragraph background fill (RGB hex format, e.g., "F2F2F2").
    pub fn set_shading(&mut self, fill: Option<String>) {
        self.shading = fill;
    }

    /// Draw a rule down the left edge of the paragraph.
    pub fn set_left_border(&mut self, color: Option<String>) {
        self.left_border = color;
    }

    /// Give a table style single borders on all edges and between cells.
    pub fn set_table_borders(&mut self, enabled: bool) {
        self.table_borders = enabled;
    }

    pub fn set_space_before(&mut self, space_before: Option<u32>) {
        self.space_before = space_before;
    }

    pub fn set_space_after(&mut self, space_after: Option<u32>) {
        self.space_after = space_after;
    }

    pub fn set_line_spacing(&mut self, line_spacing: Option<u32>) {
        self.line_spacing = line_spacing;
    }

    pub fn set_indent_left(&mut self, indent_left: Option<i32>) {
        self.indent_left = indent_left;
    }

    fn has_paragraph_properties(&self) -> bool {
        self.keep_next
            || self.outline_level.is_some()
            || self.shading.is_some()
            || self.left_border.is_some()
            || self.space_before.is_some()
            || self.space_after.is_some()
            || self.line_spacing.is_some()
            || self.indent_left.is_some()
    }

    fn has_run_properties(&self) -> bool {
        self.font_name.is_some()
            || self.font_size.is_some()
            || self.bold
            || self.italic
            || self.underline
            || self.color.is_some()
    }

    /// Generate XML for this style.
    pub(crate) fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(512);

        write!(
            &mut xml,
            r#"<w:style w:type="{}" w:styleId="{}""#,
            self.style_type.to_xml(),
            escape_xml(&self.style_id)
        )?;
        if self.is_default {
            xml.push_str(r#" w:default="1""#);
        }
        if self.is_custom {
            xml.push_str(r#" w:customStyle="1""#);
        }
        xml.push('>');

        write!(&mut xml, r#"<w:name w:val="{}"/>"#, escape_xml(&self.name))?;
        if let Some(ref based_on) = self.based_on {
            write!(&mut xml, r#"<w:basedOn w:val="{}"/>"#, escape_xml(based_on))?;
        }
        if let Some(ref next) = self.next {
            write!(&mut xml, r#"<w:next w:val="{}"/>"#, escape_xml(next))?;
        }
        if let Some(priority) = self.priority {
            write!(&mut xml, r#"<w:uiPriority w:val="{}"/>"#, priority)?;
        }
        if self.is_quick_style {
            xml.push_str("<w:qFormat/>");
        }

        if matches!(self.style_type, StyleType::Paragraph) && self.has_paragraph_properties() {
            xml.push_str("<w:pPr>");
            if self.keep_next {
                xml.push_str("<w:keepNext/>");
            }
            if let Some(ref color) = self.left_border {
                write!(
                    &mut xml,
                    r#"<w:pBdr><w:left w:val="single" w:sz="18" w:space="8" w:color="{}"/></w:pBdr>"#,
                    escape_xml(color)
                )?;
            }
            if let Some(ref fill) = self.shading {
                write!(
                    &mut xml,
                    r#"<w:shd w:val="clear" w:color="auto" w:fill="{}"/>"#,
                    escape_xml(fill)
                )?;
            }
            if self.space_before.is_some()
                || self.space_after.is_some()
                || self.line_spacing.is_some()
            {
                xml.push_str("<w:spacing");
                if let Some(before) = self.space_before {
                    write!(&mut xml, r#" w:before="{}""#, before)?;
                }
                if let Some(after) = self.space_after {
                    write!(&mut xml, r#" w:after="{}""#, after)?;
                }
                if let Some(line) = self.line_spacing {
                    write!(&mut xml, r#" w:line="{}" w:lineRule="auto""#, line)?;
                }
                xml.push_str("/>");
            }
            if let Some(left) = self.indent_left {
                write!(&mut xml, r#"<w:ind w:left="{}"/>"#, left)?;
            }
            if let Some(level) = self.outline_level {
                write!(&mut xml, r#"<w:outlineLvl w:val="{}"/>"#, level)?;
            }
            xml.push_str("</w:pPr>");
        }

        if self.has_run_properties() {
            xml.push_str("<w:rPr>");
            if let Some(ref font_name) = self.font_name {
                let font = escape_xml(font_name);
                write!(
                    &mut xml,
                    r#"<w:rFonts w:ascii="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
                    font
                )?;
            }
            if self.bold {
                xml.push_str("<w:b/>");
            }
            if self.italic {
                xml.push_str("<w:i/>");
            }
            if let Some(ref color) = self.color {
                write!(&mut xml, r#"<w:color w:val="{}"/>"#, escape_xml(color))?;
            }
            if let Some(size) = self.font_size {
                write!(&mut xml, r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#, size)?;
            }
            if self.underline {
                xml.push_str(r#"<w:u w:val="single"/>"#);
            }
            xml.push_str("</w:rPr>");
        }

        if matches!(self.style_type, StyleType::Table) {
            xml.push_str("<w:tblPr>");
            if self.table_borders {
                xml.push_str("<w:tblBorders>");
                for edge in ["top", "left", "bottom", "right", "insideH", "insideV"] {
                    write!(
                        &mut xml,
                        r#"<w:{} w:val="single" w:sz="4" w:space="0" w:color="auto"/>"#,
                        edge
                    )?;
                }
                xml.push_str("</w:tblBorders>");
            }
            xml.push_str(r#"<w:tblCellMar><w:left w:w="108" w:type="dxa"/><w:right w:w="108" w:type="dxa"/></w:tblCellMar>"#);
            xml.push_str("</w:tblPr>");
        }

        xml.push_str("</w:style>");
        Ok(xml)
    }

    /// Create the "Normal" paragraph style in the given body font.
    pub fn normal(font: &str, size: u32) -> Self {
        let mut style = Self::new(NORMAL_STYLE, "Normal", StyleType::Paragraph);
        style.set_default(true);
        style.set_custom(false);
        style.set_quick_style(true);
        style.set_font_name(Some(font.to_string()));
        style.set_font_size(Some(size));
        style.set_space_after(Some(160));
        style.set_line_spacing(Some(259));
        style
    }

    /// Create a "Heading N" style; `level` is clamped to 1..=6.
    pub fn heading(level: u8) -> Self {
        let level = level.clamp(1, MAX_HEADING_LEVEL);
        let mut style = Self::new(
            heading_style_id(level),
            format!("heading {}", level),
            StyleType::Paragraph,
        );
        style.set_based_on(Some(NORMAL_STYLE.to_string()));
        style.set_next(Some(NORMAL_STYLE.to_string()));
        style.set_custom(false);
        style.set_priority(Some(9));
        style.set_quick_style(true);
        style.set_keep_next(true);
        style.set_outline_level(Some(level - 1));
        style.set_space_before(Some(if level == 1 { 240 } else { 40 }));
        style.set_space_after(Some(0));
        style.set_color(Some(
            if level == 3 { "1F3763" } else { "2F5496" }.to_string(),
        ));
        match level {
            1 => style.set_font_size(Some(32)),
            2 => style.set_font_size(Some(26)),
            3 => style.set_font_size(Some(24)),
            4 => style.set_italic(true),
            5 => {},
            _ => style.set_color(Some("1F3763".to_string())),
        }
        style.set_bold(matches!(level, 3 | 4));
        style
    }

    /// Create the block quote paragraph style.
    pub fn quote() -> Self {
        let mut style = Self::new(QUOTE_STYLE, "Quote", StyleType::Paragraph);
        style.set_based_on(Some(NORMAL_STYLE.to_string()));
        style.set_next(Some(NORMAL_STYLE.to_string()));
        style.set_custom(false);
        style.set_priority(Some(29));
        style.set_quick_style(true);
        style.set_italic(true);
        style.set_color(Some("404040".to_string()));
        style.set_left_border(Some("BFBFBF".to_string()));
        style.set_indent_left(Some(720));
        style
    }

    /// Create the code block paragraph style in the given monospace font.
    pub fn code_block(font: &str, size: u32) -> Self {
        let mut style = Self::new(CODE_BLOCK_STYLE, "Code Block", StyleType::Paragraph);
        style.set_based_on(Some(NORMAL_STYLE.to_string()));
        style.set_next(Some(NORMAL_STYLE.to_string()));
        style.set_priority(Some(99));
        style.set_font_name(Some(font.to_string()));
        style.set_font_size(Some(size));
        style.set_shading(Some("F2F2F2".to_string()));
        style.set_space_after(Some(160));
        style.set_line_spacing(Some(240));
        style
    }

    /// Create the list paragraph style.
    pub fn list_paragraph() -> Self {
        let mut style = Self::new(LIST_PARAGRAPH_STYLE, "List Paragraph", StyleType::Paragraph);
        style.set_based_on(Some(NORMAL_STYLE.to_string()));
        style.set_custom(false);
        style.set_priority(Some(34));
        style.set_quick_style(true);
        style.set_space_after(Some(0));
        style.set_indent_left(Some(720));
        style
    }

    /// Create the default character style.
    pub fn default_paragraph_font() -> Self {
        let mut style = Self::new(
            "DefaultParagraphFont",
            "Default Paragraph Font",
            StyleType::Character,
        );
        style.set_default(true);
        style.set_custom(false);
        style.set_priority(Some(1));
        style
    }

    /// Create the hyperlink character style.
    pub fn hyperlink() -> Self {
        let mut style = Self::new(HYPERLINK_STYLE, "Hyperlink", StyleType::Character);
        style.set_based_on(Some("DefaultParagraphFont".to_string()));
        style.set_custom(false);
        style.set_priority(Some(99));
        style.set_color(Some("0563C1".to_string()));
        style.set_underline(true);
        style
    }

    /// Create the bordered grid table style.
    pub fn table_grid() -> Self {
        let mut style = Self::new(TABLE_GRID_STYLE, "Table Grid", StyleType::Table);
        style.set_custom(false);
        style.set_priority(Some(39));
        style.set_table_borders(true);
        style
    }

    /// The full style set used by converted documents.
    pub fn document_set(body_font: &str, body_size: u32, code_font: &str, code_size: u32) -> Vec<Self> {
        let mut styles = vec![
            Self::normal(body_font, body_size),
            Self::default_paragraph_font(),
        ];
        styles.extend((1..=MAX_HEADING_LEVEL).map(Self::heading));
        styles.push(Self::quote());
        styles.push(Self::code_block(code_font, code_size));
        styles.push(Self::list_paragraph());
        styles.push(Self::hyperlink());
        styles.push(Self::table_grid());
        styles
    }
}

/// Generate a complete styles.xml document from a list of styles.
///
/// `font` and `size` (half-points) become the document defaults.
pub fn generate_styles_xml(styles: &[MutableStyle], font: &str, size: u32) -> Result<String> {
    let mut xml = String::with_capacity(4096);

    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    xml.push_str(
        r#"<w:styles xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main" "#,
    );
    xml.push_str(
        r#"xmlns:r="http://schemas.openxmlformats.org/officeDocument/2006/relationships">"#,
    );

    let font = escape_xml(font);
    xml.push_str("<w:docDefaults><w:rPrDefault><w:rPr>");
    write!(
        &mut xml,
        r#"<w:rFonts w:ascii="{0}" w:eastAsia="{0}" w:hAnsi="{0}" w:cs="{0}"/>"#,
        font
    )?;
    write!(&mut xml, r#"<w:sz w:val="{0}"/><w:szCs w:val="{0}"/>"#, size)?;
    xml.push_str(r#"<w:lang w:val="en-US" w:eastAsia="en-US" w:bidi="ar-SA"/>"#);
    xml.push_str("</w:rPr></w:rPrDefault><w:pPrDefault/></w:docDefaults>");

    for style in styles {
        xml.push_str(&style.to_xml()?);
    }

    xml.push_str("</w:styles>");
    Ok(xml)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_basic_style() {
        let style = MutableStyle::new("MyStyle", "My Custom Style", StyleType::Paragraph);
        assert_eq!(style.style_id(), "MyStyle");
        assert_eq!(style.name(), "My Custom Style");
        assert_eq!(style.style_type(), StyleType::Paragraph);
        assert!(style.is_custom());
    }

    #[test]
    fn test_heading_levels() {
        for level in 1..=6u8 {
            let style = MutableStyle::heading(level);
            assert_eq!(style.style_id(), format!("Heading{}", level));
            let xml = style.to_xml().unwrap();
            assert!(xml.contains(&format!(r#"<w:outlineLvl w:val="{}"/>"#, level - 1)));
            assert!(xml.contains("<w:keepNext/>"));
        }
        assert_eq!(MutableStyle::heading(9).style_id(), "Heading6");
        assert_eq!(heading_style_id(0), "Heading1");
        assert!(MutableStyle::heading(1).font_size() > MutableStyle::heading(2).font_size());
    }

    #[test]
    fn test_code_block_shading_and_font() {
        let xml = MutableStyle::code_block("Consolas", 20).to_xml().unwrap();
        assert!(xml.contains(r#"w:fill="F2F2F2""#));
        assert!(xml.contains(r#"w:ascii="Consolas""#));
        assert!(xml.contains(r#"<w:sz w:val="20"/>"#));
    }

    #[test]
    fn test_table_grid_has_borders() {
        let xml = MutableStyle::table_grid().to_xml().unwrap();
        assert!(xml.contains(r#"w:type="table""#));
        assert!(xml.contains("<w:insideV"));
    }

    #[test]
    fn test_generate_styles_xml() {
        let styles = MutableStyle::document_set("Calibri", 22, "Consolas", 20);
        let xml = generate_styles_xml(&styles, "Calibri", 22).unwrap();
        assert!(xml.starts_with("<?xml version"));
        assert!(xml.contains("<w:docDefaults>"));
        for id in [
            NORMAL_STYLE,
            QUOTE_STYLE,
            CODE_BLOCK_STYLE,
            LIST_PARAGRAPH_STYLE,
            HYPERLINK_STYLE,
            TABLE_GRID_STYLE,
            "Heading6",
        ] {
            assert!(
                xml.contains(&format!(r#"w:styleId="{}""#, id)),
                "missing {}",
                id
            );
        }
        assert!(xml.ends_with("</w:styles>"));
    }

    #[test]
    fn test_xml_escaping() {
        let mut style = MutableStyle::new("Test<>&\"'", "Name<>&\"'", StyleType::Paragraph);
        style.set_based_on(Some("Base<>&\"'".to_string()));

        let xml = style.to_xml().unwrap();
        assert!(xml.contains("&lt;"));
        assert!(xml.contains("&amp;"));
        assert!(xml.contains("&apos;"));
        assert!(!xml.contains("Test<"));
    }
}
