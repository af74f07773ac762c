/// Paragraph types and implementation for DOCX documents.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use std::fmt::Write as FmtWrite;

pub use super::super::format::ParagraphAlignment;
use super::hyperlink::MutableHyperlink;
use super::image::MutableInlineImage;
use super::relmap::RelCursor;
use super::run::MutableRun;

/// Twips per inch.

/// Elements that can appear in a paragraph.
#[derive(Debug, Clone)]
pub(crate) enum ParagraphElement {
    Run(MutableRun),
    Hyperlink(MutableHyperlink),
    InlineImage(MutableInlineImage),
}

/// List membership of a paragraph.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct NumberingProperties {
    /// Numbering instance (`w:num`) ID
    pub(crate) num_id: u32,
    /// Indent level, 0-based
    pub(crate) ilvl: u32,
}

#[derive(Debug, Clone, Default)]
pub(crate) struct ParagraphProperties {
    pub(crate) alignment: Option<ParagraphAlignment>,
    pub(crate) numbering: Option<NumberingProperties>,
    /// Left indentation in twips
    pub(crate) indent_left: Option<u32>,
    /// Draw a rule under the paragraph
    pub(crate) bottom_border: bool,
}

impl ParagraphProperties {
    fn has_properties(&self) -> bool {
        self.alignment.is_some()
            || self.numbering.is_some()
            || self.indent_left.is_some()
            || self.bottom_border
    }
}

/// A mutable paragraph in a document.
#[derive(Debug, Clone, Default)]
pub struct MutableParagraph {
    /// Runs, hyperlinks and pictures in reading order
    pub(crate) elements: Vec<ParagraphElement>,
    /// Paragraph style ID
    pub(crate) style: Option<String>,
    pub(crate) properties: ParagraphProperties,
}

impl MutableParagraph {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Add a new run to the paragraph.
    pub fn add_run(&mut self) -> &mut MutableRun {
        self.elements.push(ParagraphElement::Run(MutableRun::new()));
        match self.elements.last_mut() {
            Some(ParagraphElement::Run(r)) => r,
            _ => unreachable!(),
        }
    }

    /// Add a run with text.
    pub fn add_run_with_text(&mut self, text: &str) -> &mut MutableRun {
        let run = self.add_run();
        run.set_text(text);
        run
    }

    /// Add a hyperlink to the paragraph.
    pub fn add_hyperlink(&mut self, text: &str, url: &str) -> &mut MutableHyperlink {
        self.elements
            .push(ParagraphElement::Hyperlink(MutableHyperlink::new(url, text)));
        match self.elements.last_mut() {
            Some(ParagraphElement::Hyperlink(h)) => h,
            _ => unreachable!(),
        }
    }

    /// Add an inline picture to the paragraph.
    pub fn add_image(&mut self, image: MutableInlineImage) -> &mut MutableInlineImage {
        self.elements.push(ParagraphElement::InlineImage(image));
        match self.elements.last_mut() {
            Some(ParagraphElement::InlineImage(img)) => img,
            _ => unreachable!(),
        }
    }

    /// Set the paragraph style.
    pub fn set_style(&mut self, style_id: &str) {
        self.style = Some(style_id.to_string());
    }

    #[inline]
    pub fn style(&self) -> Option<&str> {
        self.style.as_deref()
    }

    pub fn set_alignment(&mut self, alignment: ParagraphAlignment) {
        self.properties.alignment = Some(alignment);
    }

    /// Set left indentation, in twips.
    pub fn set_indent_left(&mut self, twips: u32) {
        self.properties.indent_left = Some(twips);
    }

    /// Make this paragraph a list item of numbering instance `num_id`.
    pub fn set_numbering(&mut self, num_id: u32, level: u32) {
        self.properties.numbering = Some(NumberingProperties {
            num_id,
            ilvl: level,
        });
    }

    /// Numbering instance and level, if this is a list item.
    pub fn numbering(&self) -> Option<(u32, u32)> {
        self.properties.numbering.map(|n| (n.num_id, n.ilvl))
    }

    /// Draw a horizontal rule below the paragraph.
    pub fn set_bottom_border(&mut self, enabled: bool) {
        self.properties.bottom_border = enabled;
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Runs directly in the paragraph, excluding hyperlink runs.
    pub fn runs(&self) -> impl Iterator<Item = &MutableRun> {
        self.elements.iter().filter_map(|e| match e {
            ParagraphElement::Run(r) => Some(r),
            _ => None,
        })
    }

    /// Visible text of runs and hyperlinks.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for element in &self.elements {
            match element {
                ParagraphElement::Run(r) => out.push_str(&r.text()),
                ParagraphElement::Hyperlink(h) => out.push_str(&h.run.text()),
                ParagraphElement::InlineImage(_) => {},
            }
        }
        out
    }

    pub(crate) fn hyperlinks(&self) -> impl Iterator<Item = &MutableHyperlink> {
        self.elements.iter().filter_map(|e| match e {
            ParagraphElement::Hyperlink(h) => Some(h),
            _ => None,
        })
    }

    pub(crate) fn images(&self) -> impl Iterator<Item = &MutableInlineImage> {
        self.elements.iter().filter_map(|e| match e {
            ParagraphElement::InlineImage(i) => Some(i),
            _ => None,
        })
    }

    /// Serialize with relationship IDs taken from `rels` in document order.
    pub(crate) fn to_xml(&self, xml: &mut String, rels: &mut RelCursor<'_>) -> Result<()> {
        xml.push_str("<w:p>");

        if self.style.is_some() || self.properties.has_properties() {
            xml.push_str("<w:pPr>");

            if let Some(ref style) = self.style {
                write!(xml, "<w:pStyle w:val=\"{}\"/>", escape_xml(style))
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }

            if let Some(numbering) = self.properties.numbering {
                write!(
                    xml,
                    "<w:numPr><w:ilvl w:val=\"{}\"/><w:numId w:val=\"{}\"/></w:numPr>",
                    numbering.ilvl, numbering.num_id
                )
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }

            if self.properties.bottom_border {
                xml.push_str(
                    "<w:pBdr><w:bottom w:val=\"single\" w:sz=\"6\" w:space=\"1\" w:color=\"auto\"/></w:pBdr>",
                );
            }

            if let Some(left) = self.properties.indent_left {
                write!(xml, "<w:ind w:left=\"{}\"/>", left)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }

            if let Some(alignment) = self.properties.alignment {
                write!(xml, "<w:jc w:val=\"{}\"/>", alignment.as_str())
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }

            xml.push_str("</w:pPr>");
        }

        for element in &self.elements {
            match element {
                ParagraphElement::Run(run) => run.to_xml(xml)?,
                ParagraphElement::Hyperlink(hyperlink) => {
                    hyperlink.to_xml(xml, rels.next_hyperlink()?)?;
                },
                ParagraphElement::InlineImage(image) => {
                    let (r_id, drawing_id) = rels.next_image()?;
                    xml.push_str("<w:r>");
                    image.to_xml(xml, r_id, drawing_id)?;
                    xml.push_str("</w:r>");
                },
            }
        }

        xml.push_str("</w:p>");
        Ok(())
    }
}
