/// Run types and implementation for DOCX documents.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use std::fmt::Write as FmtWrite;

/// One piece of run content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RunContent {
    /// Plain text
    Text(String),
    /// Line break within the paragraph
    Break,
}

/// Character formatting for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub(crate) struct RunProperties {
    /// Character style ID (`w:rStyle`)
    pub(crate) style: Option<String>,
    pub(crate) bold: bool,
    pub(crate) italic: bool,
    /// Font size in half-points
    pub(crate) font_size: Option<u32>,
    pub(crate) font_name: Option<String>,
}

impl RunProperties {
    fn has_properties(&self) -> bool {
        self.style.is_some()
            || self.bold
            || self.italic
            || self.font_size.is_some()
            || self.font_name.is_some()
    }
}

/// A mutable run.
///
/// Runs contain text and character formatting.
#[derive(Debug, Clone, Default)]
pub struct MutableRun {
    pub(crate) content: Vec<RunContent>,
    pub(crate) properties: RunProperties,
}

impl MutableRun {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    /// Replace the run's content with `text`.
    pub fn set_text(&mut self, text: &str) -> &mut Self {
        self.content.clear();
        self.add_text(text)
    }

    /// Append text.
    pub fn add_text(&mut self, text: &str) -> &mut Self {
        if let Some(RunContent::Text(existing)) = self.content.last_mut() {
            existing.push_str(text);
        } else if !text.is_empty() {
            self.content.push(RunContent::Text(text.to_string()));
        }
        self
    }

    /// Append a line break.
    pub fn add_break(&mut self) -> &mut Self {
        self.content.push(RunContent::Break);
        self
    }

    /// Concatenated text, with breaks as newlines.
    pub fn text(&self) -> String {
        let mut out = String::new();
        for item in &self.content {
            match item {
                RunContent::Text(s) => out.push_str(s),
                RunContent::Break => out.push('\n'),
            }
        }
        out
    }

    pub fn bold(&mut self, bold: bool) -> &mut Self {
        self.properties.bold = bold;
        self
    }

    pub fn italic(&mut self, italic: bool) -> &mut Self {
        self.properties.italic = italic;
        self
    }

    /// Set font size in half-points (e.g., 24 = 12pt).
    pub fn font_size(&mut self, size: u32) -> &mut Self {
        self.properties.font_size = Some(size);
        self
    }

    pub fn font_name(&mut self, name: &str) -> &mut Self {
        self.properties.font_name = Some(name.to_string());
        self
    }

    /// Apply a character style.
    pub fn style(&mut self, style_id: &str) -> &mut Self {
        self.properties.style = Some(style_id.to_string());
        self
    }

    #[inline]
    pub fn is_bold(&self) -> bool {
        self.properties.bold
    }

    #[inline]
    pub fn is_italic(&self) -> bool {
        self.properties.italic
    }

    pub(crate) fn to_xml(&self, xml: &mut String) -> Result<()> {
        xml.push_str("<w:r>");

        if self.properties.has_properties() {
            xml.push_str("<w:rPr>");

            if let Some(ref style) = self.properties.style {
                write!(xml, "<w:rStyle w:val=\"{}\"/>", escape_xml(style))
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }

            if let Some(ref font_name) = self.properties.font_name {
                let font_name = escape_xml(font_name);
                write!(
                    xml,
                    "<w:rFonts w:ascii=\"{0}\" w:hAnsi=\"{0}\" w:cs=\"{0}\"/>",
                    font_name
                )
                .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }

            if self.properties.bold {
                xml.push_str("<w:b/>");
            }

            if self.properties.italic {
                xml.push_str("<w:i/>");
            }

            if let Some(size) = self.properties.font_size {
                write!(xml, "<w:sz w:val=\"{0}\"/><w:szCs w:val=\"{0}\"/>", size)
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
            }

            xml.push_str("</w:rPr>");
        }

        for item in &self.content {
            match item {
                RunContent::Text(text) => {
                    write!(
                        xml,
                        "<w:t xml:space=\"preserve\">{}</w:t>",
                        escape_xml(text)
                    )
                    .map_err(|e| OoxmlError::Xml(e.to_string()))?;
                },
                RunContent::Break => xml.push_str("<w:br/>"),
            }
        }

        xml.push_str("</w:r>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(run: &MutableRun) -> String {
        let mut xml = String::new();
        run.to_xml(&mut xml).unwrap();
        xml
    }

    #[test]
    fn test_plain_run_has_no_properties() {
        let mut run = MutableRun::new();
        run.set_text("hello");
        assert_eq!(
            render(&run),
            r#"<w:r><w:t xml:space="preserve">hello</w:t></w:r>"#
        );
    }

    #[test]
    fn test_bold_and_italic_share_one_run() {
        let mut run = MutableRun::new();
        run.set_text("both").bold(true).italic(true);
        let xml = render(&run);
        assert!(xml.contains("<w:rPr><w:b/><w:i/></w:rPr>"));
        assert_eq!(xml.matches("<w:r>").count(), 1);
    }

    #[test]
    fn test_text_is_escaped() {
        let mut run = MutableRun::new();
        run.set_text("a < b & \"c\"");
        assert!(render(&run).contains("a &lt; b &amp; &quot;c&quot;"));
    }

    #[test]
    fn test_breaks_between_lines() {
        let mut run = MutableRun::new();
        run.add_text("one").add_break().add_text("two");
        run.font_name("Consolas").font_size(20);
        let xml = render(&run);
        assert!(xml.contains(r#"one</w:t><w:br/><w:t xml:space="preserve">two"#));
        assert!(xml.contains(r#"<w:rFonts w:ascii="Consolas""#));
        assert!(xml.contains(r#"<w:sz w:val="20"/>"#));
        assert_eq!(run.text(), "one\ntwo");
    }
}
