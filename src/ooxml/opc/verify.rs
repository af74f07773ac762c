//! Package verification.
//!
//! Reads a package back and checks that its manifests describe exactly the
//! parts present: every member is covered by `[Content_Types].xml`, every
//! `Override` names a member, and every internal relationship targets one.

use crate::common::xml::unescape_xml;
use crate::ooxml::opc::constants::target_mode;
use crate::ooxml::opc::error::{OpcError, Result};
use crate::ooxml::opc::packuri::{CONTENT_TYPES_URI, PackURI};
use crate::ooxml::opc::phys_pkg::PhysPkgReader;
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A packaging defect found by [`verify_package`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Violation {
    /// `[Content_Types].xml` is absent
    MissingContentTypes,
    /// A member has neither an `Override` nor a `Default` for its extension
    UncoveredPart(String),
    /// An `Override` names a part that is not in the archive
    DanglingOverride(String),
    /// An internal relationship targets a part that is not in the archive
    DanglingRelationship {
        source: String,
        r_id: String,
        target: String,
    },
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Violation::MissingContentTypes => write!(f, "missing {}", CONTENT_TYPES_URI),
            Violation::UncoveredPart(part) => write!(f, "{} has no content type", part),
            Violation::DanglingOverride(part) => {
                write!(f, "content type override for missing part {}", part)
            },
            Violation::DanglingRelationship {
                source,
                r_id,
                target,
            } => write!(f, "{} {} targets missing part {}", source, r_id, target),
        }
    }
}

/// Result of verifying a package.
#[derive(Debug, Clone, Default)]
pub struct PackageReport {
    /// Partnames of every member, in name order
    pub parts: Vec<String>,
    pub violations: Vec<Violation>,
}

impl PackageReport {
    /// Whether the package satisfies every manifest invariant.
    #[inline]
    pub fn is_valid(&self) -> bool {
        self.violations.is_empty()
    }
}

/// Verify the manifests of a package.
///
/// Fails only when the bytes are not a readable archive or a manifest is
/// not well-formed XML; manifest defects are reported as [`Violation`]s.
pub fn verify_package(bytes: &[u8]) -> Result<PackageReport> {
    let reader = PhysPkgReader::new(bytes)?;
    let members: BTreeSet<PackURI> = reader.member_names().map(PackURI::from_membername).collect();
    let mut report = PackageReport {
        parts: members.iter().map(|uri| uri.to_string()).collect(),
        violations: Vec::new(),
    };

    let content_types_uri = PackURI::new(CONTENT_TYPES_URI).map_err(OpcError::InvalidPackUri)?;
    if !reader.contains(&content_types_uri) {
        report.violations.push(Violation::MissingContentTypes);
    } else {
        let types = ContentTypes::parse(reader.blob_for(&content_types_uri)?)?;
        for part in members.iter().filter(|uri| **uri != content_types_uri) {
            if !types.covers(part) {
                report
                    .violations
                    .push(Violation::UncoveredPart(part.to_string()));
            }
        }
        for partname in types.overrides.keys() {
            if !members.iter().any(|uri| uri.as_str() == partname) {
                report
                    .violations
                    .push(Violation::DanglingOverride(partname.clone()));
            }
        }
    }

    for rels_uri in &members {
        let Some(source) = rels_uri.rels_source() else {
            continue;
        };
        for rel in parse_relationships(reader.blob_for(rels_uri)?)? {
            if rel.external {
                continue;
            }
            let target = PackURI::from_rel_ref(source.base_uri(), &rel.target)
                .map_err(OpcError::InvalidPackUri)?;
            if !members.contains(&target) {
                report.violations.push(Violation::DanglingRelationship {
                    source: source.to_string(),
                    r_id: rel.id,
                    target: target.to_string(),
                });
            }
        }
    }

    log::debug!(
        "verified package: {} parts, {} violations",
        report.parts.len(),
        report.violations.len()
    );
    Ok(report)
}

/// Parsed `[Content_Types].xml`.
struct ContentTypes {
    /// Lowercased extension to content type
    defaults: BTreeMap<String, String>,
    overrides: BTreeMap<String, String>,
}

impl ContentTypes {
    fn parse(xml: &[u8]) -> Result<Self> {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        let mut types = ContentTypes {
            defaults: BTreeMap::new(),
            overrides: BTreeMap::new(),
        };

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(ref e) | Event::Empty(ref e) => match e.local_name().as_ref() {
                    b"Default" => {
                        let attrs = attributes(e)?;
                        if let (Some(ext), Some(ct)) = (attrs.get("Extension"), attrs.get("ContentType")) {
                            types.defaults.insert(ext.to_ascii_lowercase(), ct.clone());
                        }
                    },
                    b"Override" => {
                        let attrs = attributes(e)?;
                        if let (Some(part), Some(ct)) = (attrs.get("PartName"), attrs.get("ContentType")) {
                            types.overrides.insert(part.clone(), ct.clone());
                        }
                    },
                    _ => {},
                },
                Event::Eof => break,
                _ => {},
            }
            buf.clear();
        }

        Ok(types)
    }

    fn covers(&self, part: &PackURI) -> bool {
        self.overrides.contains_key(part.as_str())
            || self.defaults.contains_key(&part.ext().to_ascii_lowercase())
    }
}

/// One `<Relationship>` element as written in a `.rels` part.
struct RawRelationship {
    id: String,
    target: String,
    external: bool,
}

fn parse_relationships(xml: &[u8]) -> Result<Vec<RawRelationship>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut rels = Vec::new();

    loop {
        match reader.read_event_into(&mut buf)? {
            Event::Start(ref e) | Event::Empty(ref e)
                if e.local_name().as_ref() == b"Relationship" =>
            {
                let attrs = attributes(e)?;
                let Some(target) = attrs.get("Target") else {
                    return Err(OpcError::XmlError(
                        "relationship without Target".to_string(),
                    ));
                };
                rels.push(RawRelationship {
                    id: attrs.get("Id").cloned().unwrap_or_default(),
                    target: target.clone(),
                    external: attrs
                        .get("TargetMode")
                        .is_some_and(|mode| mode == target_mode::EXTERNAL),
                });
            },
            Event::Eof => break,
            _ => {},
        }
        buf.clear();
    }

    Ok(rels)
}

/// Collect an element's attributes by local name, unescaped.
fn attributes(e: &BytesStart<'_>) -> Result<BTreeMap<String, String>> {
    let mut attrs = BTreeMap::new();
    for attr in e.attributes() {
        let attr = attr?;
        let key = String::from_utf8_lossy(attr.key.local_name().as_ref()).into_owned();
        let value = unescape_xml(&String::from_utf8_lossy(&attr.value));
        attrs.insert(key, value);
    }
    Ok(attrs)
}
