/// Package assembly for generated Word documents.
///
/// A [`DocxPackage`] turns a [`MutableDocument`] into the parts of a
/// `.docx` file: the main document with its relationships, styles,
/// numbering, media, and the two document property parts.
use crate::common::xml::escape_xml;
use crate::ooxml::docx::writer::relmap::RelationshipMapper;
use crate::ooxml::docx::writer::{
    ImageSource, MutableDocument, MutableStyle, generate_styles_xml,
};
use crate::ooxml::error::{OoxmlError, Result};
use crate::ooxml::opc::constants::content_type as ct;
use crate::ooxml::opc::constants::namespace as ns;
use crate::ooxml::opc::constants::relationship_type as rt;
use crate::ooxml::opc::error::OpcError;
use crate::ooxml::opc::{OpcPackage, PackURI, PackageWriter, Part, Relationships};
use log::debug;
use std::fmt::Write as FmtWrite;

const DOCUMENT_PARTNAME: &str = "/word/document.xml";
const STYLES_PARTNAME: &str = "/word/styles.xml";
const NUMBERING_PARTNAME: &str = "/word/numbering.xml";
const CORE_PROPS_PARTNAME: &str = "/docProps/core.xml";
const APP_PROPS_PARTNAME: &str = "/docProps/app.xml";
const MEDIA_TEMPLATE: &str = "/word/media/image%d";

/// Application name recorded in the extended properties.
const APPLICATION: &str = concat!("md2docx ", env!("CARGO_PKG_VERSION"));

/// Fonts and document metadata applied when the package is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageSettings {
    /// `dc:title` in the core properties
    pub title: Option<String>,
    /// `dc:creator` in the core properties
    pub creator: Option<String>,
    pub body_font: String,
    /// Body size in half-points
    pub body_size: u32,
    pub code_font: String,
    /// Code size in half-points
    pub code_size: u32,
}

impl Default for PackageSettings {
    fn default() -> Self {
        Self {
            title: None,
            creator: None,
            body_font: "Calibri".to_string(),
            body_size: 22,
            code_font: "Consolas".to_string(),
            code_size: 20,
        }
    }
}

/// A Word package ready to be written.
///
/// # Examples
///
/// ```rust
/// use md2docx::ooxml::docx::{DocxPackage, PackageSettings};
/// use md2docx::ooxml::docx::writer::MutableDocument;
///
/// let mut doc = MutableDocument::new();
/// doc.add_paragraph_with_text("Hello");
///
/// let bytes = DocxPackage::new(doc, PackageSettings::default()).to_bytes()?;
/// assert_eq!(&bytes[..2], b"PK");
/// # Ok::<(), md2docx::ooxml::OoxmlError>(())
/// ```
#[derive(Debug)]
pub struct DocxPackage {
    document: MutableDocument,
    settings: PackageSettings,
}

impl DocxPackage {
    pub fn new(document: MutableDocument, settings: PackageSettings) -> Self {
        Self { document, settings }
    }

    #[inline]
    pub fn document(&self) -> &MutableDocument {
        &self.document
    }

    #[inline]
    pub fn settings(&self) -> &PackageSettings {
        &self.settings
    }

    /// Assemble the OPC package.
    pub fn build(&self) -> Result<OpcPackage> {
        let mut package = OpcPackage::new();
        let document_uri = partname(DOCUMENT_PARTNAME)?;
        let mut doc_rels = Relationships::new(document_uri.base_uri());

        // Styles and numbering first so they take rId1 and rId2
        let styles_uri = partname(STYLES_PARTNAME)?;
        let styles = MutableStyle::document_set(
            &self.settings.body_font,
            self.settings.body_size,
            &self.settings.code_font,
            self.settings.code_size,
        );
        let styles_xml =
            generate_styles_xml(&styles, &self.settings.body_font, self.settings.body_size)?;
        package.add_part(Part::from_xml(styles_uri.clone(), ct::WML_STYLES, styles_xml));
        doc_rels.get_or_add(rt::STYLES, &styles_uri);

        let numbering_uri = partname(NUMBERING_PARTNAME)?;
        package.add_part(Part::from_xml(
            numbering_uri.clone(),
            ct::WML_NUMBERING,
            self.document.numbering().to_xml()?,
        ));
        doc_rels.get_or_add(rt::NUMBERING, &numbering_uri);

        let mut mapper = RelationshipMapper::new();

        let hyperlinks = self.document.collect_hyperlinks();
        for hyperlink in &hyperlinks {
            mapper.add_hyperlink(doc_rels.get_or_add_ext_rel(rt::HYPERLINK, hyperlink.url()));
        }

        let images = self.document.collect_images();
        let mut embedded = 0;
        for image in &images {
            let r_id = match image.source() {
                ImageSource::Embedded { data, format } => {
                    let template = format!("{}.{}", MEDIA_TEMPLATE, format.extension());
                    let media_uri = package.next_partname(&template)?;
                    package.add_part(Part::new(media_uri.clone(), format.mime_type(), data.clone()));
                    embedded += 1;
                    doc_rels.get_or_add(rt::IMAGE, &media_uri)
                },
                ImageSource::Linked { url } => doc_rels.get_or_add_ext_rel(rt::IMAGE, url),
            };
            mapper.add_image(r_id);
        }

        debug!(
            "document has {} hyperlinks, {} images ({} embedded)",
            hyperlinks.len(),
            images.len(),
            embedded
        );

        let document_xml = self.document.to_xml_with_rels(&mapper)?;
        package.add_part(
            Part::from_xml(document_uri.clone(), ct::WML_DOCUMENT_MAIN, document_xml)
                .with_rels(doc_rels),
        );
        package.relate_to(&document_uri, rt::OFFICE_DOCUMENT);

        let core_uri = partname(CORE_PROPS_PARTNAME)?;
        package.add_part(Part::from_xml(
            core_uri.clone(),
            ct::OPC_CORE_PROPERTIES,
            self.core_properties_xml()?,
        ));
        package.relate_to(&core_uri, rt::CORE_PROPERTIES);

        let app_uri = partname(APP_PROPS_PARTNAME)?;
        package.add_part(Part::from_xml(
            app_uri.clone(),
            ct::OFC_EXTENDED_PROPERTIES,
            app_properties_xml()?,
        ));
        package.relate_to(&app_uri, rt::EXTENDED_PROPERTIES);

        debug!("assembled package with {} parts", package.part_count());
        Ok(package)
    }

    /// Assemble and serialize the package to `.docx` bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        let package = self.build()?;
        Ok(PackageWriter::to_bytes(&package)?)
    }

    /// Core properties. Timestamps are omitted so output depends only on input.
    fn core_properties_xml(&self) -> Result<String> {
        let mut xml = String::with_capacity(512);
        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        write!(
            xml,
            r#"<cp:coreProperties xmlns:cp="{}" xmlns:dc="{}" xmlns:dcterms="{}" xmlns:xsi="{}">"#,
            ns::OPC_CORE_PROPERTIES,
            ns::DC,
            ns::DC_TERMS,
            ns::XSI
        )?;
        if let Some(ref title) = self.settings.title {
            write!(xml, "<dc:title>{}</dc:title>", escape_xml(title))?;
        }
        if let Some(ref creator) = self.settings.creator {
            write!(xml, "<dc:creator>{}</dc:creator>", escape_xml(creator))?;
        }
        xml.push_str("</cp:coreProperties>");
        Ok(xml)
    }
}

fn app_properties_xml() -> Result<String> {
    let mut xml = String::with_capacity(256);
    xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
    write!(
        xml,
        r#"<Properties xmlns="{}"><Application>{}</Application><DocSecurity>0</DocSecurity></Properties>"#,
        ns::OFC_EXTENDED_PROPERTIES,
        escape_xml(APPLICATION)
    )?;
    Ok(xml)
}

fn partname(uri: &str) -> Result<PackURI> {
    PackURI::new(uri).map_err(|e| OoxmlError::Opc(OpcError::InvalidPackUri(e)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::docx::writer::MutableInlineImage;
    use crate::ooxml::opc::verify_package;

    const PNG_1X1: &[u8] = &[
        0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A, 0x00, 0x00, 0x00, 0x0D, 0x49, 0x48, 0x44,
        0x52,
    ];

    fn part<'a>(package: &'a OpcPackage, name: &str) -> &'a Part {
        package
            .iter_parts()
            .find(|p| p.partname().as_str() == name)
            .unwrap()
    }

    #[test]
    fn test_minimal_package_parts() {
        let mut doc = MutableDocument::new();
        doc.add_paragraph_with_text("Hello");
        let package = DocxPackage::new(doc, PackageSettings::default())
            .build()
            .unwrap();

        assert_eq!(package.part_count(), 5);
        let document = part(&package, DOCUMENT_PARTNAME);
        assert_eq!(document.rels().get("rId1").unwrap().reltype(), rt::STYLES);
        assert_eq!(document.rels().get("rId2").unwrap().reltype(), rt::NUMBERING);
        assert_eq!(package.rels().len(), 3);
    }

    #[test]
    fn test_hyperlinks_share_relationship_per_url() {
        let mut doc = MutableDocument::new();
        let para = doc.add_paragraph();
        para.add_hyperlink("a", "https://same.example");
        para.add_hyperlink("b", "https://same.example");
        para.add_hyperlink("c", "https://other.example");

        let package = DocxPackage::new(doc, PackageSettings::default())
            .build()
            .unwrap();
        let document = part(&package, DOCUMENT_PARTNAME);
        let xml = std::str::from_utf8(document.blob()).unwrap();
        assert_eq!(xml.matches(r#"r:id="rId3""#).count(), 2);
        assert_eq!(xml.matches(r#"r:id="rId4""#).count(), 1);
        assert_eq!(document.rels().len(), 4);
    }

    #[test]
    fn test_embedded_and_linked_images() {
        let mut doc = MutableDocument::new();
        let para = doc.add_paragraph();
        para.add_image(MutableInlineImage::from_bytes(PNG_1X1.to_vec(), 9525, 9525).unwrap());
        para.add_image(MutableInlineImage::linked("https://img.example/a.png", 9525, 9525));

        let package = DocxPackage::new(doc, PackageSettings::default())
            .build()
            .unwrap();
        assert!(package.contains_part(&PackURI::new("/word/media/image1.png").unwrap()));

        let document = part(&package, DOCUMENT_PARTNAME);
        let xml = std::str::from_utf8(document.blob()).unwrap();
        assert!(xml.contains(r#"<a:blip r:embed="rId3"/>"#));
        assert!(xml.contains(r#"<a:blip r:link="rId4"/>"#));
        assert!(document.rels().get("rId4").unwrap().is_external());
    }

    #[test]
    fn test_core_properties_escape_title() {
        let settings = PackageSettings {
            title: Some("R&D <notes>".to_string()),
            ..PackageSettings::default()
        };
        let package = DocxPackage::new(MutableDocument::new(), settings)
            .build()
            .unwrap();
        let core = std::str::from_utf8(part(&package, CORE_PROPS_PARTNAME).blob()).unwrap();
        assert!(core.contains("<dc:title>R&amp;D &lt;notes&gt;</dc:title>"));
    }

    #[test]
    fn test_written_package_verifies() {
        let mut doc = MutableDocument::new();
        doc.add_paragraph().add_hyperlink("x", "https://x.example");
        doc.add_paragraph()
            .add_image(MutableInlineImage::from_bytes(PNG_1X1.to_vec(), 9525, 9525).unwrap());
        let bytes = DocxPackage::new(doc, PackageSettings::default())
            .to_bytes()
            .unwrap();
        let report = verify_package(&bytes).unwrap();
        assert!(report.is_valid(), "{:?}", report.violations);
    }
}
