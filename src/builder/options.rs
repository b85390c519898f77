//! Build options and configuration.

/// Font applied when nothing in the document sets one (ECMA-376 default).
pub const FALLBACK_FONT: &str = "Times New Roman";

/// Size in points applied when nothing in the document sets one.
pub const FALLBACK_FONT_SIZE: f32 = 10.0;

/// Options for building a document model.
#[derive(Debug, Clone)]
pub struct BuildOptions {
    /// Error handling mode
    pub error_mode: ErrorMode,

    /// Whether to read header and footer parts
    pub include_headers_footers: bool,

    /// Whether to normalize run text to Unicode NFC
    pub normalize_text: bool,

    /// Font name used when no level of the inheritance chain sets one
    pub fallback_font: String,

    /// Font size used when no level of the inheritance chain sets one
    pub fallback_font_size: f32,
}

impl BuildOptions {
    /// Create new build options with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set error mode.
    pub fn with_error_mode(mut self, mode: ErrorMode) -> Self {
        self.error_mode = mode;
        self
    }

    /// Enable lenient mode (missing style references become warnings).
    pub fn lenient(mut self) -> Self {
        self.error_mode = ErrorMode::Lenient;
        self
    }

    /// Enable or disable header/footer extraction.
    pub fn with_headers_footers(mut self, include: bool) -> Self {
        self.include_headers_footers = include;
        self
    }

    /// Enable or disable NFC normalization of text.
    pub fn with_normalization(mut self, normalize: bool) -> Self {
        self.normalize_text = normalize;
        self
    }

    /// Set the fallback font applied when nothing sets one.
    pub fn with_fallback_font(mut self, name: impl Into<String>, size: f32) -> Self {
        self.fallback_font = name.into();
        self.fallback_font_size = size;
        self
    }

    pub(crate) fn is_lenient(&self) -> bool {
        self.error_mode == ErrorMode::Lenient
    }
}

impl Default for BuildOptions {
    fn default() -> Self {
        Self {
            error_mode: ErrorMode::Strict,
            include_headers_footers: true,
            normalize_text: true,
            fallback_font: FALLBACK_FONT.to_string(),
            fallback_font_size: FALLBACK_FONT_SIZE,
        }
    }
}

/// Error handling mode during building.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ErrorMode {
    /// Fail on any unresolved reference
    #[default]
    Strict,
    /// Record unresolved style references as warnings and continue
    Lenient,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_options_builder() {
        let options = BuildOptions::new()
            .lenient()
            .with_headers_footers(false)
            .with_normalization(false)
            .with_fallback_font("Calibri", 11.0);

        assert_eq!(options.error_mode, ErrorMode::Lenient);
        assert!(!options.include_headers_footers);
        assert!(!options.normalize_text);
        assert_eq!(options.fallback_font, "Calibri");
        assert_eq!(options.fallback_font_size, 11.0);
    }

    #[test]
    fn test_default_options() {
        let options = BuildOptions::default();
        assert_eq!(options.error_mode, ErrorMode::Strict);
        assert!(options.include_headers_footers);
        assert_eq!(options.fallback_font, "Times New Roman");
        assert_eq!(options.fallback_font_size, 10.0);
    }
}
