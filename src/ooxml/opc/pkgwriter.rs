//! Package writer for OPC packages.
//!
//! Serializes an [`OpcPackage`] into ZIP bytes: `[Content_Types].xml` first,
//! then `_rels/.rels`, then every part followed by its own `.rels` part.

use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::{content_type as ct, namespace};
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::package::OpcPackage;
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PACKAGE_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgWriter;
use std::collections::BTreeMap;
use std::fmt::Write as _;

/// Package writer that serializes an OPC package to a ZIP archive.
///
/// # Example
///
/// ```
/// use md2docx::ooxml::opc::{OpcPackage, PackURI, Part, PackageWriter};
/// use md2docx::ooxml::opc::constants::{content_type as ct, relationship_type as rt};
///
/// let mut pkg = OpcPackage::new();
/// let partname = PackURI::new("/word/document.xml").unwrap();
/// pkg.relate_to(&partname, rt::OFFICE_DOCUMENT);
/// pkg.add_part(Part::from_xml(partname, ct::WML_DOCUMENT_MAIN, "<w:document/>".into()));
///
/// let bytes = PackageWriter::to_bytes(&pkg).unwrap();
/// assert_eq!(&bytes[..2], b"PK");
/// ```
pub struct PackageWriter;

impl PackageWriter {
    /// Write an OPC package to a stream.
    pub fn write_to_stream<W: std::io::Write>(mut writer: W, package: &OpcPackage) -> Result<()> {
        let bytes = Self::to_bytes(package)?;
        writer.write_all(&bytes)?;
        Ok(())
    }

    /// Serialize an OPC package to bytes.
    pub fn to_bytes(package: &OpcPackage) -> Result<Vec<u8>> {
        let mut phys_writer = PhysPkgWriter::new();

        Self::write_content_types(&mut phys_writer, package)?;
        Self::write_pkg_rels(&mut phys_writer, package)?;
        Self::write_parts(&mut phys_writer, package)?;

        phys_writer.finish()
    }

    fn write_content_types(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        let cti = ContentTypesItem::from_package(package);
        let content_types_uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
        phys_writer.write(&content_types_uri, cti.to_xml().as_bytes())
    }

    fn write_pkg_rels(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        let package_uri = PackURI::new(PACKAGE_URI).map_err(OpcError::InvalidPackUri)?;
        phys_writer.write(&package_uri.rels_uri(), package.rels().to_xml().as_bytes())
    }

    fn write_parts(phys_writer: &mut PhysPkgWriter, package: &OpcPackage) -> Result<()> {
        for part in package.iter_parts() {
            phys_writer.write(part.partname(), part.blob())?;

            if !part.rels().is_empty() {
                let rels_xml = part.rels().to_xml();
                phys_writer.write(&part.partname().rels_uri(), rels_xml.as_bytes())?;
            }
        }
        Ok(())
    }
}

/// Builder for `[Content_Types].xml`.
///
/// Well-known extensions get a `Default` entry; every other part gets an
/// `Override` naming it explicitly.
struct ContentTypesItem {
    /// Default content types by extension
    defaults: BTreeMap<String, String>,

    /// Override content types by partname
    overrides: BTreeMap<String, String>,
}

impl ContentTypesItem {
    fn new() -> Self {
        let mut defaults = BTreeMap::new();
        defaults.insert("rels".to_string(), ct::OPC_RELATIONSHIPS.to_string());
        defaults.insert("xml".to_string(), ct::XML.to_string());

        Self {
            defaults,
            overrides: BTreeMap::new(),
        }
    }

    fn from_package(package: &OpcPackage) -> Self {
        let mut cti = Self::new();
        for part in package.iter_parts() {
            cti.add_content_type(part.partname(), part.content_type());
        }
        cti
    }

    fn add_content_type(&mut self, partname: &PackURI, content_type: &str) {
        let ext = partname.ext().to_ascii_lowercase();
        if Self::is_default_content_type(&ext, content_type) {
            self.defaults.insert(ext, content_type.to_string());
        } else {
            self.overrides
                .insert(partname.to_string(), content_type.to_string());
        }
    }

    fn is_default_content_type(ext: &str, content_type: &str) -> bool {
        matches!(
            (ext, content_type),
            ("rels", ct::OPC_RELATIONSHIPS)
                | ("xml", ct::XML)
                | ("png", ct::PNG)
                | ("jpg", ct::JPEG)
                | ("jpeg", ct::JPEG)
                | ("gif", ct::GIF)
                | ("bmp", ct::BMP)
                | ("tif", ct::TIFF)
                | ("tiff", ct::TIFF)
        )
    }

    fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(1024);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        let _ = write!(xml, r#"<Types xmlns="{}">"#, namespace::OPC_CONTENT_TYPES);

        for (ext, content_type) in &self.defaults {
            let _ = write!(
                xml,
                r#"<Default Extension="{}" ContentType="{}"/>"#,
                escape_xml(ext),
                escape_xml(content_type)
            );
        }
        for (partname, content_type) in &self.overrides {
            let _ = write!(
                xml,
                r#"<Override PartName="{}" ContentType="{}"/>"#,
                escape_xml(partname),
                escape_xml(content_type)
            );
        }

        xml.push_str("</Types>");
        xml
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::part::Part;
    use crate::ooxml::opc::phys_pkg::PhysPkgReader;

    #[test]
    fn test_content_types_xml() {
        let mut cti = ContentTypesItem::new();
        cti.add_content_type(&PackURI::new("/word/media/image1.png").unwrap(), ct::PNG);
        cti.add_content_type(
            &PackURI::new("/word/document.xml").unwrap(),
            ct::WML_DOCUMENT_MAIN,
        );

        let xml = cti.to_xml();

        assert!(xml.contains(r#"<Default Extension="png" ContentType="image/png"/>"#));
        assert!(xml.contains(r#"<Override PartName="/word/document.xml""#));
        assert!(!xml.contains(r#"PartName="/word/media/image1.png""#));
    }

    #[test]
    fn test_part_rels_are_written_after_part() {
        let mut pkg = OpcPackage::new();
        let doc_uri = PackURI::new("/word/document.xml").unwrap();
        let mut doc = Part::from_xml(doc_uri.clone(), ct::WML_DOCUMENT_MAIN, "<d/>".to_string());
        doc.rels_mut()
            .get_or_add_ext_rel(crate::ooxml::opc::constants::relationship_type::HYPERLINK, "https://x.test");
        pkg.add_part(doc);

        let bytes = PackageWriter::to_bytes(&pkg).unwrap();
        let reader = PhysPkgReader::new(&bytes).unwrap();
        let names: Vec<&str> = reader.member_names().collect();

        assert!(names.contains(&"[Content_Types].xml"));
        assert!(names.contains(&"_rels/.rels"));
        assert!(names.contains(&"word/_rels/document.xml.rels"));
        assert!(reader.contains(&doc_uri));
    }
}
