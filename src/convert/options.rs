/// Configuration options for Markdown to DOCX conversion.
use crate::ooxml::docx::PackageSettings;
use crate::ooxml::docx::writer::EMU_PER_INCH;

/// Configuration options for conversion.
///
/// # Examples
///
/// ```rust
/// use md2docx::convert::ConvertOptions;
///
/// let options = ConvertOptions::new()
///     .with_body_font("Georgia", 24)
///     .with_title("Release notes");
/// assert_eq!(options.body_font_size, 24);
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertOptions {
    /// Font family of body text
    pub body_font: String,
    /// Body font size in half-points (22 = 11pt)
    pub body_font_size: u32,
    /// Monospace font for code spans and code blocks
    pub code_font: String,
    /// Code font size in half-points
    pub code_font_size: u32,
    /// Widest an embedded picture may be, in EMUs
    pub max_image_width_emu: i64,
    /// Document title; defaults to the first level-1 heading
    pub title: Option<String>,
    /// Document author
    pub creator: Option<String>,
}

impl Default for ConvertOptions {
    fn default() -> Self {
        Self {
            body_font: "Calibri".to_string(),
            body_font_size: 22,
            code_font: "Consolas".to_string(),
            code_font_size: 20,
            max_image_width_emu: 6 * EMU_PER_INCH,
            title: None,
            creator: None,
        }
    }
}

impl ConvertOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the body font and its size in half-points.
    #[inline]
    pub fn with_body_font(mut self, name: impl Into<String>, size: u32) -> Self {
        self.body_font = name.into();
        self.body_font_size = size;
        self
    }

    /// Set the code font and its size in half-points.
    #[inline]
    pub fn with_code_font(mut self, name: impl Into<String>, size: u32) -> Self {
        self.code_font = name.into();
        self.code_font_size = size;
        self
    }

    /// Set the maximum picture width in inches.
    #[inline]
    pub fn with_max_image_width_inches(mut self, inches: f64) -> Self {
        self.max_image_width_emu = (inches * EMU_PER_INCH as f64).round() as i64;
        self
    }

    #[inline]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    #[inline]
    pub fn with_creator(mut self, creator: impl Into<String>) -> Self {
        self.creator = Some(creator.into());
        self
    }

    /// Package settings for a document whose fallback title is `title`.
    pub(crate) fn package_settings(&self, title: Option<String>) -> PackageSettings {
        PackageSettings {
            title: self.title.clone().or(title),
            creator: self.creator.clone(),
            body_font: self.body_font.clone(),
            body_size: self.body_font_size,
            code_font: self.code_font.clone(),
            code_size: self.code_font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let options = ConvertOptions::new();
        assert_eq!(options.body_font, "Calibri");
        assert_eq!(options.code_font, "Consolas");
        assert_eq!(options.max_image_width_emu, 5_486_400);
        assert!(options.title.is_none());
    }

    #[test]
    fn test_explicit_title_wins() {
        let settings = ConvertOptions::new()
            .with_title("Given")
            .package_settings(Some("Heading".to_string()));
        assert_eq!(settings.title.as_deref(), Some("Given"));

        let settings = ConvertOptions::new().package_settings(Some("Heading".to_string()));
        assert_eq!(settings.title.as_deref(), Some("Heading"));
    }

    #[test]
    fn test_image_width_in_inches() {
        let options = ConvertOptions::new().with_max_image_width_inches(2.5);
        assert_eq!(options.max_image_width_emu, 2_286_000);
    }
}
