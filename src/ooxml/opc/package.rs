/// In-memory OPC package.
///
/// An [`OpcPackage`] holds the package-level relationships and every part,
/// keyed by partname. Parts are kept in a sorted map so iteration order, and
/// therefore the archive layout, does not depend on insertion order.
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{PACKAGE_URI, PackURI};
use crate::ooxml::opc::part::Part;
use crate::ooxml::opc::rel::Relationships;
use std::collections::BTreeMap;

/// An OPC package under construction.
pub struct OpcPackage {
    /// Package-level relationships (`_rels/.rels`)
    rels: Relationships,

    parts: BTreeMap<PackURI, Part>,
}

impl OpcPackage {
    pub fn new() -> Self {
        Self {
            rels: Relationships::new(PACKAGE_URI),
            parts: BTreeMap::new(),
        }
    }

    /// Add a part, replacing any part with the same partname.
    pub fn add_part(&mut self, part: Part) {
        self.parts.insert(part.partname().clone(), part);
    }

    /// Iterate over parts in partname order.
    pub fn iter_parts(&self) -> impl Iterator<Item = &Part> {
        self.parts.values()
    }

    #[inline]
    pub fn part_count(&self) -> usize {
        self.parts.len()
    }

    #[inline]
    pub fn rels(&self) -> &Relationships {
        &self.rels
    }

    /// Relate the package to a part, returning the rId.
    pub fn relate_to(&mut self, partname: &PackURI, reltype: &str) -> String {
        self.rels.get_or_add(reltype, partname)
    }

    /// Find the next free partname for a template with a `%d` placeholder.
    ///
    /// `"/word/media/image%d.png"` yields `/word/media/image1.png`, then
    /// `image2.png` once the first is taken.
    pub fn next_partname(&self, template: &str) -> Result<PackURI> {
        (1..=self.parts.len() + 1)
            .map(|n| template.replace("%d", &n.to_string()))
            .find(|candidate| {
                !self
                    .parts
                    .keys()
                    .any(|partname| partname.as_str() == candidate)
            })
            .ok_or_else(|| OpcError::InvalidPackUri(template.to_string()))
            .and_then(|candidate| PackURI::new(candidate).map_err(OpcError::InvalidPackUri))
    }

    #[inline]
    pub fn contains_part(&self, partname: &PackURI) -> bool {
        self.parts.contains_key(partname)
    }
}

impl Default for OpcPackage {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ooxml::opc::constants::{content_type as ct, relationship_type as rt};

    #[test]
    fn test_next_partname_skips_taken_names() {
        let mut pkg = OpcPackage::new();
        let first = pkg.next_partname("/word/media/image%d.png").unwrap();
        assert_eq!(first.as_str(), "/word/media/image1.png");

        pkg.add_part(Part::new(first, ct::PNG, vec![0x89]));
        let second = pkg.next_partname("/word/media/image%d.png").unwrap();
        assert_eq!(second.as_str(), "/word/media/image2.png");
        assert!(pkg.next_partname("word/no-slash%d").is_err());
    }

    #[test]
    fn test_parts_iterate_in_partname_order() {
        let mut pkg = OpcPackage::new();
        for name in ["/word/styles.xml", "/docProps/app.xml", "/word/document.xml"] {
            pkg.add_part(Part::new(PackURI::new(name).unwrap(), ct::XML, Vec::new()));
        }
        let names: Vec<&str> = pkg.iter_parts().map(|p| p.partname().as_str()).collect();
        assert_eq!(
            names,
            ["/docProps/app.xml", "/word/document.xml", "/word/styles.xml"]
        );
    }

    #[test]
    fn test_package_rels_use_member_names() {
        let mut pkg = OpcPackage::new();
        let doc = PackURI::new("/word/document.xml").unwrap();
        assert_eq!(pkg.relate_to(&doc, rt::OFFICE_DOCUMENT), "rId1");
        assert_eq!(
            pkg.rels().get("rId1").unwrap().target_ref(),
            "word/document.xml"
        );
        assert!(!pkg.contains_part(&doc));
    }
}
