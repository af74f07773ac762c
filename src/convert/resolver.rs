/// Image resolution for Markdown image references.
///
/// A resolver decides whether `![alt](url)` can be embedded: it returns the
/// picture's bytes when the URL is locally resolvable, and `None` otherwise.
/// Unresolved pictures are written as external links.
use base64::Engine;
use log::{debug, trace};
use std::io::Cursor;
use std::path::{Path, PathBuf};

use crate::ooxml::docx::ImageFormat;
use crate::ooxml::docx::writer::{EMU_PER_INCH, MutableInlineImage};

/// Size of a linked picture, whose pixels are unknown.
pub const PLACEHOLDER_WIDTH_EMU: i64 = 3 * EMU_PER_INCH;
pub const PLACEHOLDER_HEIGHT_EMU: i64 = 2 * EMU_PER_INCH;

/// Source of image bytes for Markdown image URLs.
pub trait ImageResolver {
    /// Bytes of the image at `url`, or `None` if it cannot be resolved locally.
    fn resolve(&self, url: &str) -> Option<Vec<u8>>;
}

impl<R: ImageResolver + ?Sized> ImageResolver for &R {
    fn resolve(&self, url: &str) -> Option<Vec<u8>> {
        (**self).resolve(url)
    }
}

/// Resolves `data:<mime>;base64,<payload>` URIs only.
#[derive(Debug, Clone, Copy, Default)]
pub struct DataUriResolver;

impl ImageResolver for DataUriResolver {
    fn resolve(&self, url: &str) -> Option<Vec<u8>> {
        let rest = url.trim().strip_prefix("data:")?;
        let (header, payload) = rest.split_once(',')?;
        if !header.ends_with(";base64") {
            trace!("data URI without base64 encoding");
            return None;
        }
        let payload: String = payload.chars().filter(|c| !c.is_whitespace()).collect();
        base64::engine::general_purpose::STANDARD
            .decode(payload)
            .inspect_err(|e| debug!("invalid base64 image payload: {}", e))
            .ok()
    }
}

/// Resolves paths relative to a base directory, plus data URIs.
///
/// URLs with a scheme (`https:`, `file:`, ...) are never read.
#[derive(Debug, Clone)]
pub struct FsResolver {
    base_dir: PathBuf,
}

impl FsResolver {
    pub fn new(base_dir: impl Into<PathBuf>) -> Self {
        Self {
            base_dir: base_dir.into(),
        }
    }

    #[inline]
    pub fn base_dir(&self) -> &Path {
        &self.base_dir
    }
}

impl ImageResolver for FsResolver {
    fn resolve(&self, url: &str) -> Option<Vec<u8>> {
        let url = url.trim();
        if url.starts_with("data:") {
            return DataUriResolver.resolve(url);
        }
        if has_scheme(url) {
            return None;
        }
        let path = self.base_dir.join(url);
        std::fs::read(&path)
            .inspect_err(|e| debug!("cannot read image {}: {}", path.display(), e))
            .ok()
    }
}

/// Whether `url` starts with an RFC 3986 scheme such as `https:`.
///
/// Single letters are not treated as schemes so `C:\img.png` stays a path.
fn has_scheme(url: &str) -> bool {
    let Some((scheme, _)) = url.split_once(':') else {
        return false;
    };
    scheme.len() > 1
        && scheme.starts_with(|c: char| c.is_ascii_alphabetic())
        && scheme
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Turn resolved bytes into an embedded picture no wider than `max_width_emu`.
///
/// Returns `None` for bytes that are not a supported raster image.
pub(crate) fn embedded_image(data: Vec<u8>, max_width_emu: i64) -> Option<MutableInlineImage> {
    ImageFormat::detect_from_bytes(&data)?;
    let (width_px, height_px) = image::ImageReader::new(Cursor::new(&data))
        .with_guessed_format()
        .ok()?
        .into_dimensions()
        .inspect_err(|e| debug!("cannot read image dimensions: {}", e))
        .ok()?;

    let (width, height) = scale_to_width(
        MutableInlineImage::px_to_emu(width_px),
        MutableInlineImage::px_to_emu(height_px),
        max_width_emu,
    );
    MutableInlineImage::from_bytes(data, width, height).ok()
}

/// Shrink `(width, height)` to `max_width`, keeping the aspect ratio.
fn scale_to_width(width: i64, height: i64, max_width: i64) -> (i64, i64) {
    if width <= max_width || width == 0 {
        return (width, height);
    }
    let height = (i128::from(height) * i128::from(max_width) / i128::from(width)) as i64;
    (max_width, height.max(1))
}
