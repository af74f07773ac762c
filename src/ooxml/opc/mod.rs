/// Open Packaging Conventions (OPC) support for writing packages.
///
/// An OPC package is a ZIP archive of parts, a `[Content_Types].xml`
/// manifest mapping each part to a content type, and `.rels` parts
/// recording the relationships between parts.
///
/// - [`OpcPackage`] collects parts and package-level relationships
/// - [`PackageWriter`] serializes a package to deterministic ZIP bytes
/// - [`verify::verify_package`] reads a package back and checks its manifests
pub mod constants;
pub mod error;
pub mod package;
pub mod packuri;
pub mod part;
pub mod phys_pkg;
pub mod pkgwriter;
pub mod rel;
pub mod verify;

pub use package::OpcPackage;
pub use packuri::PackURI;
pub use part::Part;
pub use pkgwriter::PackageWriter;
pub use rel::{Relationship, Relationships};
pub use verify::{PackageReport, Violation, verify_package};
