/// Hyperlink support for DOCX documents.
use super::run::MutableRun;
use crate::ooxml::error::{OoxmlError, Result};
use std::fmt::Write as FmtWrite;

/// Character style applied to hyperlink text.
pub const HYPERLINK_STYLE: &str = "Hyperlink";

/// A hyperlink to an external URL.
///
/// The URL itself lives in the document part's relationships; the body
/// references it by relationship ID.
#[derive(Debug, Clone)]
pub struct MutableHyperlink {
    pub(crate) url: String,
    /// Display run, styled with [`HYPERLINK_STYLE`]
    pub(crate) run: MutableRun,
}

impl MutableHyperlink {
    /// Create a new hyperlink.
    pub fn new(url: impl Into<String>, text: &str) -> Self {
        let mut run = MutableRun::new();
        run.set_text(text).style(HYPERLINK_STYLE);
        Self {
            url: url.into(),
            run,
        }
    }

    #[inline]
    pub fn url(&self) -> &str {
        &self.url
    }

    /// The display run, for adding formatting.
    #[inline]
    pub fn run_mut(&mut self) -> &mut MutableRun {
        &mut self.run
    }

    /// Serialize the hyperlink to XML.
    pub(crate) fn to_xml(&self, xml: &mut String, r_id: &str) -> Result<()> {
        write!(xml, r#"<w:hyperlink r:id="{}" w:history="1">"#, r_id)
            .map_err(|e| OoxmlError::Xml(e.to_string()))?;
        self.run.to_xml(xml)?;
        xml.push_str("</w:hyperlink>");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hyperlink_references_relationship() {
        let mut link = MutableHyperlink::new("https://example.com", "site");
        link.run_mut().bold(true);

        let mut xml = String::new();
        link.to_xml(&mut xml, "rId7").unwrap();

        assert!(xml.starts_with(r#"<w:hyperlink r:id="rId7""#));
        assert!(xml.contains(r#"<w:rStyle w:val="Hyperlink"/>"#));
        assert!(xml.contains("<w:b/>"));
        assert!(xml.contains(">site</w:t>"));
        assert!(!xml.contains("example.com"));
    }
}
