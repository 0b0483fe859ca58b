//! Replacement-text sources.
//!
//! The annotation loop never decides what to write into a box; it asks a
//! [`Translator`]. Shipping implementations are deliberately trivial:
//! [`PlaceholderTranslator`] writes one fixed string everywhere and
//! [`IdentityTranslator`] writes back what OCR read. A real machine
//! translation backend only has to implement the trait.

use crate::error::TranslateError;

/// Placeholder written into every region by default.
pub const DEFAULT_PLACEHOLDER: &str = "企鹅";

/// Produces the text that replaces one OCR region.
///
/// Called once per annotated region, on the pipeline thread, in draw order.
pub trait Translator: Send + Sync {
    /// Translate `text` from `source_lang` into `target_lang`.
    ///
    /// Language tags are passed through from
    /// [`crate::config::TranslationConfig`] untouched.
    fn translate(
        &self,
        text: &str,
        source_lang: &str,
        target_lang: &str,
    ) -> Result<String, TranslateError>;
}

/// Returns the same string for every input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlaceholderTranslator {
    text: String,
}

impl PlaceholderTranslator {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}

impl Default for PlaceholderTranslator {
    fn default() -> Self {
        Self::new(DEFAULT_PLACEHOLDER)
    }
}

impl Translator for PlaceholderTranslator {
    fn translate(&self, _text: &str, _source: &str, _target: &str) -> Result<String, TranslateError> {
        Ok(self.text.clone())
    }
}

/// Returns the recognised text, trimmed.
///
/// Useful to check OCR boxes and font fitting visually: the output page shows
/// exactly what tesseract read, redrawn in the configured font.
#[derive(Debug, Clone, Copy, Default)]
pub struct IdentityTranslator;

impl Translator for IdentityTranslator {
    fn translate(&self, text: &str, _source: &str, _target: &str) -> Result<String, TranslateError> {
        Ok(text.trim().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn placeholder_ignores_input() {
        let t = PlaceholderTranslator::default();
        assert_eq!(t.translate("HINGE-A12", "en", "zh-CN").unwrap(), "企鹅");
        assert_eq!(t.translate("Ø12 H7", "en", "de").unwrap(), "企鹅");
    }

    #[test]
    fn custom_placeholder() {
        let t = PlaceholderTranslator::new("XX");
        assert_eq!(t.text(), "XX");
        assert_eq!(t.translate("anything", "en", "fr").unwrap(), "XX");
    }

    #[test]
    fn identity_trims() {
        let t = IdentityTranslator;
        assert_eq!(t.translate("  R5  ", "en", "en").unwrap(), "R5");
    }

    #[test]
    fn usable_as_trait_object() {
        let t: std::sync::Arc<dyn Translator> = std::sync::Arc::new(IdentityTranslator);
        assert_eq!(t.translate("M8", "en", "en").unwrap(), "M8");
    }
}
