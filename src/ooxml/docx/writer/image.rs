/// Inline picture support for DOCX documents.
///
/// A picture is either embedded, with its bytes stored as a media part, or
/// linked, referencing an external URL that the word processor resolves when
/// the document is opened.
use crate::common::xml::escape_xml;
use crate::ooxml::error::{OoxmlError, Result};
use std::fmt::Write as FmtWrite;

pub use super::super::format::ImageFormat;

/// EMUs per inch.
pub const EMU_PER_INCH: i64 = 914_400;

/// Where the picture's bytes come from.
#[derive(Debug, Clone)]
pub enum ImageSource {
    /// Bytes stored in the package
    Embedded { data: Vec<u8>, format: ImageFormat },
    /// External URL, referenced through a `TargetMode="External"` relationship
    Linked { url: String },
}

/// A mutable inline image in a document.
#[derive(Debug, Clone)]
pub struct MutableInlineImage {
    pub(crate) source: ImageSource,
    /// Width in EMUs (English Metric Units, 1 inch = 914400 EMUs)
    pub(crate) width_emu: i64,
    pub(crate) height_emu: i64,
    /// Alt text
    pub(crate) description: String,
}

impl MutableInlineImage {
    /// Create an embedded image from bytes.
    ///
    /// Fails unless the bytes carry a recognized raster signature.
    pub fn from_bytes(data: Vec<u8>, width_emu: i64, height_emu: i64) -> Result<Self> {
        let format = ImageFormat::detect_from_bytes(&data)
            .ok_or_else(|| OoxmlError::InvalidFormat("Unknown image format".to_string()))?;

        Ok(Self {
            source: ImageSource::Embedded { data, format },
            width_emu,
            height_emu,
            description: String::new(),
        })
    }

    /// Create a picture that links to an external URL.
    pub fn linked(url: impl Into<String>, width_emu: i64, height_emu: i64) -> Self {
        Self {
            source: ImageSource::Linked { url: url.into() },
            width_emu,
            height_emu,
            description: String::new(),
        }
    }

    /// Set the image description/alt text.
    pub fn set_description(&mut self, description: impl Into<String>) -> &mut Self {
        self.description = description.into();
        self
    }

    #[inline]
    pub fn source(&self) -> &ImageSource {
        &self.source
    }

    #[inline]
    pub fn is_embedded(&self) -> bool {
        matches!(self.source, ImageSource::Embedded { .. })
    }

    /// Convert pixels to EMUs (assuming 96 DPI).
    pub fn px_to_emu(px: u32) -> i64 {
        i64::from(px) * EMU_PER_INCH / 96
    }

    /// Serialize as a `w:drawing`.
    ///
    /// `doc_pr_id` must be unique among drawings in the document.
    pub(crate) fn to_xml(&self, xml: &mut String, r_id: &str, doc_pr_id: usize) -> Result<()> {
        let desc = escape_xml(&self.description);
        let blip_attr = if self.is_embedded() { "r:embed" } else { "r:link" };
        let (width, height) = (self.width_emu, self.height_emu);

        write!(
            xml,
            r#"<w:drawing><wp:inline distT="0" distB="0" distL="0" distR="0"><wp:extent cx="{width}" cy="{height}"/><wp:effectExtent l="0" t="0" r="0" b="0"/><wp:docPr id="{doc_pr_id}" name="Picture {doc_pr_id}" descr="{desc}"/><wp:cNvGraphicFramePr><a:graphicFrameLocks noChangeAspect="1"/></wp:cNvGraphicFramePr><a:graphic><a:graphicData uri="http://schemas.openxmlformats.org/drawingml/2006/picture"><pic:pic><pic:nvPicPr><pic:cNvPr id="{doc_pr_id}" name="Picture {doc_pr_id}" descr="{desc}"/><pic:cNvPicPr/></pic:nvPicPr><pic:blipFill><a:blip {blip_attr}="{r_id}"/><a:stretch><a:fillRect/></a:stretch></pic:blipFill><pic:spPr><a:xfrm><a:off x="0" y="0"/><a:ext cx="{width}" cy="{height}"/></a:xfrm><a:prstGeom prst="rect"><a:avLst/></a:prstGeom></pic:spPr></pic:pic></a:graphicData></a:graphic></wp:inline></w:drawing>"#
        )
        .map_err(|e| OoxmlError::Xml(e.to_string()))?;

        Ok(())
    }
}
