/// Parts of an OPC package.
///
/// A part is the unit of content in a package: a partname, a content type,
/// the serialized bytes, and the relationships it owns.
use crate::ooxml::opc::packuri::PackURI;
use crate::ooxml::opc::rel::Relationships;

/// A serialized part ready to be written into a package.
#[derive(Debug, Clone)]
pub struct Part {
    partname: PackURI,
    content_type: String,
    blob: Vec<u8>,
    /// Relationships from this part to other parts or external targets
    rels: Relationships,
}

impl Part {
    /// Create a part with no relationships.
    pub fn new(partname: PackURI, content_type: impl Into<String>, blob: Vec<u8>) -> Self {
        let rels = Relationships::new(partname.base_uri());
        Self {
            partname,
            content_type: content_type.into(),
            blob,
            rels,
        }
    }

    /// Create a part from an XML string.
    pub fn from_xml(partname: PackURI, content_type: impl Into<String>, xml: String) -> Self {
        Self::new(partname, content_type, xml.into_bytes())
    }

    /// Attach an already-built relationship collection.
    pub fn with_rels(mut self, rels: Relationships) -> Self {
        self.rels = rels;
        self
    }

    #[inline]
    pub fn partname(&self) -> &PackURI {
        &self.partname
    }

    #[inline]
    pub fn content_type(&self) -> &str {
        &self.content_type
    }

    #[inline]
    pub fn blob(&self) -> &[u8] {
        &self.blob
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    #[inline]
    pub fn rels_mut(&mut self) -> &mut Relationships {
        &mut self.rels
    }

    /// Add or get a relationship to another part, returning its rId.
    pub fn relate_to(&mut self, target: &PackURI, reltype: &str) -> String {
        self.rels.get_or_add(reltype, target)
    }
}
