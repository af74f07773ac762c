/// List numbering definitions for DOCX documents.
///
/// Two abstract definitions are emitted: one bulleted, one numbered. Every
/// bulleted list shares a single numbering instance. Each ordered list gets
/// its own instance so that its count restarts at the list's start value.
use crate::common::xml::escape_xml;
use crate::ooxml::error::Result;
use std::fmt::Write as FmtWrite;

/// Levels defined per abstract numbering (`w:ilvl` 0..=8).
pub const LEVEL_COUNT: u32 = 9;

/// Numbering instance shared by all bulleted lists.
pub const BULLET_NUM_ID: u32 = 1;

const BULLET_ABSTRACT_ID: u32 = 0;
const ORDERED_ABSTRACT_ID: u32 = 1;

/// Indentation step per level in twips.
const INDENT_STEP: u32 = 720;
const HANGING_INDENT: u32 = 360;

const BULLET_CHARS: [&str; 3] = ["\u{2022}", "\u{25E6}", "\u{25AA}"];
const ORDERED_FORMATS: [&str; 3] = ["decimal", "lowerLetter", "lowerRoman"];

/// A numbering instance (`w:num`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Num {
    id: u32,
    abstract_num_id: u32,
    /// Level and start value to override, for ordered lists
    start_override: Option<(u32, u32)>,
}

/// Numbering part builder.
#[derive(Debug, Clone)]
pub struct MutableNumbering {
    nums: Vec<Num>,
}

impl Default for MutableNumbering {
    fn default() -> Self {
        Self::new()
    }
}

impl MutableNumbering {
    pub fn new() -> Self {
        Self {
            nums: vec![Num {
                id: BULLET_NUM_ID,
                abstract_num_id: BULLET_ABSTRACT_ID,
                start_override: None,
            }],
        }
    }

    /// Numbering instance for bulleted lists.
    #[inline]
    pub fn bullet(&self) -> u32 {
        BULLET_NUM_ID
    }

    /// Allocate an instance for an ordered list starting at `start` on `level`.
    pub fn add_ordered_list(&mut self, start: u32, level: u32) -> u32 {
        let id = self.nums.last().map_or(BULLET_NUM_ID, |n| n.id) + 1;
        self.nums.push(Num {
            id,
            abstract_num_id: ORDERED_ABSTRACT_ID,
            start_override: Some((level.min(LEVEL_COUNT - 1), start)),
        });
        id
    }

    /// Number of numbering instances.
    #[inline]
    pub fn num_count(&self) -> usize {
        self.nums.len()
    }

    /// Generate the complete numbering.xml content.
    pub fn to_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(8192);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push_str(
            r#"<w:numbering xmlns:w="http://schemas.openxmlformats.org/wordprocessingml/2006/main">"#,
        );

        write!(
            &mut xml,
            r#"<w:abstractNum w:abstractNumId="{}"><w:multiLevelType w:val="hybridMultilevel"/>"#,
            BULLET_ABSTRACT_ID
        )?;
        for ilvl in 0..LEVEL_COUNT {
            let bullet = BULLET_CHARS[ilvl as usize % BULLET_CHARS.len()];
            write_level(&mut xml, ilvl, "bullet", bullet)?;
        }
        xml.push_str("</w:abstractNum>");

        write!(
            &mut xml,
            r#"<w:abstractNum w:abstractNumId="{}"><w:multiLevelType w:val="hybridMultilevel"/>"#,
            ORDERED_ABSTRACT_ID
        )?;
        for ilvl in 0..LEVEL_COUNT {
            let format = ORDERED_FORMATS[ilvl as usize % ORDERED_FORMATS.len()];
            write_level(&mut xml, ilvl, format, &format!("%{}.", ilvl + 1))?;
        }
        xml.push_str("</w:abstractNum>");

        for num in &self.nums {
            write!(
                &mut xml,
                r#"<w:num w:numId="{}"><w:abstractNumId w:val="{}"/>"#,
                num.id, num.abstract_num_id
            )?;
            if let Some((ilvl, start)) = num.start_override {
                write!(
                    &mut xml,
                    r#"<w:lvlOverride w:ilvl="{}"><w:startOverride w:val="{}"/></w:lvlOverride>"#,
                    ilvl, start
                )?;
            }
            xml.push_str("</w:num>");
        }

        xml.push_str("</w:numbering>");
        Ok(xml)
    }
}

/// Left indent of list level `ilvl`, in twips.
pub fn level_indent(ilvl: u32) -> u32 {
    INDENT_STEP * (ilvl.min(LEVEL_COUNT - 1) + 1)
}

fn write_level(xml: &mut String, ilvl: u32, format: &str, text: &str) -> Result<()> {
    write!(
        xml,
        r#"<w:lvl w:ilvl="{}"><w:start w:val="1"/><w:numFmt w:val="{}"/><w:lvlText w:val="{}"/><w:lvlJc w:val="left"/>"#,
        ilvl,
        format,
        escape_xml(text)
    )?;
    write!(
        xml,
        r#"<w:pPr><w:ind w:left="{}" w:hanging="{}"/></w:pPr>"#,
        level_indent(ilvl),
        HANGING_INDENT
    )?;
    if format == "bullet" {
        xml.push_str(r#"<w:rPr><w:rFonts w:ascii="Calibri" w:hAnsi="Calibri" w:hint="default"/></w:rPr>"#);
    }
    xml.push_str("</w:lvl>");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_has_bullet_instance() {
        let numbering = MutableNumbering::new();
        assert_eq!(numbering.num_count(), 1);
        let xml = numbering.to_xml().unwrap();
        assert!(xml.contains(r#"<w:num w:numId="1"><w:abstractNumId w:val="0"/></w:num>"#));
        assert_eq!(xml.matches("<w:lvl ").count(), 2 * LEVEL_COUNT as usize);
    }

    #[test]
    fn test_ordered_lists_get_fresh_instances() {
        let mut numbering = MutableNumbering::new();
        let first = numbering.add_ordered_list(1, 0);
        let second = numbering.add_ordered_list(5, 2);
        assert_eq!((first, second), (2, 3));

        let xml = numbering.to_xml().unwrap();
        assert!(xml.contains(
            r#"<w:num w:numId="3"><w:abstractNumId w:val="1"/><w:lvlOverride w:ilvl="2"><w:startOverride w:val="5"/></w:lvlOverride></w:num>"#
        ));
    }

    #[test]
    fn test_level_formats_cycle() {
        let xml = MutableNumbering::new().to_xml().unwrap();
        assert!(xml.contains(r#"<w:numFmt w:val="lowerRoman"/><w:lvlText w:val="%3."/>"#));
        assert!(xml.contains(r#"<w:ind w:left="6480" w:hanging="360"/>"#));
    }
}
