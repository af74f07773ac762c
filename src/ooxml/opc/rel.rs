/// Relationship-related objects for OPC packages.
///
/// A [`Relationships`] collection belongs to one source (the package or a
/// part) and serializes to that source's `.rels` part. Relationship IDs are
/// allocated sequentially and the collection keeps insertion order, so the
/// serialized XML is identical for identical input.
use crate::common::xml::escape_xml;
use crate::ooxml::opc::constants::{namespace, target_mode};
use crate::ooxml::opc::packuri::PackURI;
use std::fmt::Write as _;

/// A single relationship from a source to a target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Relationship {
    /// Relationship ID (e.g., "rId1", "rId2")
    r_id: String,

    /// Relationship type URI
    reltype: String,

    /// Target reference: a part reference relative to the source, or a URL
    target_ref: String,

    /// Whether this is an external relationship
    is_external: bool,
}

impl Relationship {
    pub fn new(r_id: String, reltype: String, target_ref: String, is_external: bool) -> Self {
        Self {
            r_id,
            reltype,
            target_ref,
            is_external,
        }
    }

    #[inline]
    pub fn r_id(&self) -> &str {
        &self.r_id
    }

    #[inline]
    pub fn reltype(&self) -> &str {
        &self.reltype
    }

    /// Target reference.
    ///
    /// For internal relationships, this is a relative part reference.
    /// For external relationships, this is an absolute URL.
    #[inline]
    pub fn target_ref(&self) -> &str {
        &self.target_ref
    }

    #[inline]
    pub fn is_external(&self) -> bool {
        self.is_external
    }
}

/// Collection of relationships from a single source.
#[derive(Debug, Clone)]
pub struct Relationships {
    /// Directory of the source, used to resolve internal targets
    base_uri: String,

    rels: Vec<Relationship>,
}

impl Relationships {
    /// Create an empty collection for a source living in `base_uri`.
    pub fn new(base_uri: impl Into<String>) -> Self {
        Self {
            base_uri: base_uri.into(),
            rels: Vec::new(),
        }
    }

    /// Directory of the source.
    #[inline]
    pub fn base_uri(&self) -> &str {
        &self.base_uri
    }

    /// Get a relationship by its ID.
    pub fn get(&self, r_id: &str) -> Option<&Relationship> {
        self.rels.iter().find(|rel| rel.r_id() == r_id)
    }

    /// Get or add an internal relationship to `target`, returning its rId.
    ///
    /// The target is written relative to this collection's base URI.
    pub fn get_or_add(&mut self, reltype: &str, target: &PackURI) -> String {
        let target_ref = target.relative_ref(&self.base_uri);
        self.find_or_push(reltype, target_ref, false)
    }

    /// Get or add an external relationship, returning its rId.
    pub fn get_or_add_ext_rel(&mut self, reltype: &str, target_url: &str) -> String {
        self.find_or_push(reltype, target_url.to_string(), true)
    }

    fn find_or_push(&mut self, reltype: &str, target_ref: String, is_external: bool) -> String {
        if let Some(rel) = self.rels.iter().find(|rel| {
            rel.reltype() == reltype
                && rel.target_ref() == target_ref
                && rel.is_external() == is_external
        }) {
            return rel.r_id().to_string();
        }

        let r_id = self.next_r_id();
        self.rels.push(Relationship::new(
            r_id.clone(),
            reltype.to_string(),
            target_ref,
            is_external,
        ));
        r_id
    }

    /// Next unused ID of the form "rIdN".
    fn next_r_id(&self) -> String {
        let highest = self
            .rels
            .iter()
            .filter_map(|rel| rel.r_id().strip_prefix("rId")?.parse::<u32>().ok())
            .max()
            .unwrap_or(0);
        format!("rId{}", highest + 1)
    }

    /// Absolute partname of an internal relationship's target.
    pub fn target_partname(&self, rel: &Relationship) -> Option<PackURI> {
        if rel.is_external() {
            return None;
        }
        PackURI::from_rel_ref(&self.base_uri, rel.target_ref()).ok()
    }

    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Relationship> {
        self.rels.iter()
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.rels.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.rels.is_empty()
    }

    /// Serialize to the XML of a `.rels` part.
    pub fn to_xml(&self) -> String {
        let mut xml = String::with_capacity(256 + self.rels.len() * 160);

        xml.push_str(r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>"#);
        xml.push('\n');
        // Writing into a String cannot fail
        let _ = write!(xml, r#"<Relationships xmlns="{}">"#, namespace::OPC_RELATIONSHIPS);

        for rel in &self.rels {
            let _ = write!(
                xml,
                r#"<Relationship Id="{}" Type="{}" Target="{}""#,
                escape_xml(rel.r_id()),
                escape_xml(rel.reltype()),
                escape_xml(rel.target_ref())
            );
            if rel.is_external() {
                let _ = write!(xml, r#" TargetMode="{}""#, target_mode::EXTERNAL);
            }
            xml.push_str("/>");
        }

        xml.push_str("</Relationships>");
        xml
    }
}
