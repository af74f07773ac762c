/// The PackURI value type.
///
/// A PackURI is a part name within an OPC package: it begins with a forward
/// slash and uses forward slashes as separators. The ZIP member name is the
/// same string without the leading slash.
use std::fmt;

/// The package pseudo-partname, representing the package itself
pub const PACKAGE_URI: &str = "/";

/// The partname of the content types item
pub const CONTENT_TYPES_URI: &str = "/[Content_Types].xml";

/// A partname within an OPC package, e.g. `/word/document.xml`.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PackURI {
    uri: String,
}

impl PackURI {
    /// Create a PackURI. Fails unless `uri` begins with a slash.
    pub fn new<S: Into<String>>(uri: S) -> Result<Self, String> {
        let uri = uri.into();
        if !uri.starts_with('/') {
            return Err(format!("PackURI must begin with slash, got '{}'", uri));
        }
        Ok(PackURI { uri })
    }

    /// Create a PackURI from a ZIP member name such as `word/document.xml`.
    pub fn from_membername(name: &str) -> Self {
        PackURI {
            uri: format!("/{}", name.trim_start_matches('/')),
        }
    }

    /// Resolve a relationship target against the source's directory.
    ///
    /// `("/word", "media/image1.png")` gives `/word/media/image1.png`;
    /// `("/word", "../docProps/app.xml")` gives `/docProps/app.xml`.
    pub fn from_rel_ref(base_uri: &str, relative_ref: &str) -> Result<Self, String> {
        let joined = if relative_ref.starts_with('/') {
            relative_ref.to_string()
        } else if base_uri.ends_with('/') {
            format!("{}{}", base_uri, relative_ref)
        } else {
            format!("{}/{}", base_uri, relative_ref)
        };
        Self::new(normalize_path(&joined))
    }

    /// Directory portion, e.g. `/word` for `/word/document.xml`.
    pub fn base_uri(&self) -> &str {
        match self.uri.rfind('/') {
            Some(0) | None => "/",
            Some(pos) => &self.uri[..pos],
        }
    }

    /// Filename portion, e.g. `document.xml`.
    pub fn filename(&self) -> &str {
        match self.uri.rfind('/') {
            Some(pos) => &self.uri[pos + 1..],
            None => "",
        }
    }

    /// Extension without the leading period.
    pub fn ext(&self) -> &str {
        let filename = self.filename();
        match filename.rfind('.') {
            Some(pos) => &filename[pos + 1..],
            None => "",
        }
    }

    /// The ZIP member name: the URI with its leading slash stripped.
    pub fn membername(&self) -> &str {
        &self.uri[1..]
    }

    /// Reference to this part relative to `base_uri`, as written in a
    /// relationship `Target`.
    pub fn relative_ref(&self, base_uri: &str) -> String {
        if base_uri == PACKAGE_URI {
            return self.membername().to_string();
        }

        let from: Vec<&str> = base_uri.split('/').filter(|s| !s.is_empty()).collect();
        let to: Vec<&str> = self.uri.split('/').filter(|s| !s.is_empty()).collect();
        let common = from
            .iter()
            .zip(to.iter())
            .take_while(|(a, b)| a == b)
            .count();

        let mut parts: Vec<&str> = vec![".."; from.len() - common];
        parts.extend_from_slice(&to[common..]);
        parts.join("/")
    }

    /// The `.rels` part for this source, e.g. `/word/_rels/document.xml.rels`.
    pub fn rels_uri(&self) -> PackURI {
        let rels_filename = format!("{}.rels", self.filename());
        let uri = match self.base_uri() {
            "/" => format!("/_rels/{}", rels_filename),
            base => format!("{}/_rels/{}", base, rels_filename),
        };
        PackURI { uri }
    }

    /// The source a `.rels` part describes, the inverse of [`PackURI::rels_uri`].
    ///
    /// Returns `None` when this is not a relationships part.
    pub fn rels_source(&self) -> Option<PackURI> {
        let source_name = self.filename().strip_suffix(".rels")?;
        let dir = self.base_uri().strip_suffix("_rels")?;
        Some(PackURI {
            uri: format!("{}{}", dir, source_name),
        })
    }

    /// The full URI string.
    #[inline]
    pub fn as_str(&self) -> &str {
        &self.uri
    }
}

/// Resolve `.` and `..` segments.
fn normalize_path(path: &str) -> String {
    let mut parts: Vec<&str> = Vec::new();
    for part in path.split('/') {
        match part {
            "" | "." => {},
            ".." => {
                parts.pop();
            },
            _ => parts.push(part),
        }
    }
    format!("/{}", parts.join("/"))
}

impl fmt::Display for PackURI {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.uri)
    }
}

impl AsRef<str> for PackURI {
    fn as_ref(&self) -> &str {
        &self.uri
    }
}
