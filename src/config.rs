//! Configuration types for PDF page translation.
//!
//! All run behaviour is controlled through [`TranslationConfig`], built via
//! its [`TranslationConfigBuilder`]. Input path, output directory, font, DPI,
//! confidence threshold and the replacement-text source all live here, so a
//! test can override any of them without touching process-wide state.

use crate::error::TranslateError;
use crate::pipeline::ocr::TextDetector;
use crate::progress::ProgressCallback;
use crate::translator::{PlaceholderTranslator, Translator};
use image::Rgb;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

/// Lowest accepted rendering density.
pub const MIN_DPI: u32 = 72;
/// Highest accepted rendering density. A Letter page at 2400 DPI is already
/// ~20 000 × 26 000 px.
pub const MAX_DPI: u32 = 2400;

/// Configuration for one translation run.
///
/// Built via [`TranslationConfig::builder()`] or using
/// [`TranslationConfig::default()`].
///
/// # Example
/// ```rust
/// use blueprint_translate::TranslationConfig;
///
/// let config = TranslationConfig::builder()
///     .input("hinge.pdf")
///     .output_dir("out")
///     .dpi(300)
///     .min_confidence(20)
///     .build()
///     .unwrap();
/// assert_eq!(config.dpi, 300);
/// ```
#[derive(Clone)]
pub struct TranslationConfig {
    /// Source PDF. Default: `./data/aluminum_hinge.pdf`.
    pub input: PathBuf,

    /// Directory receiving one PNG per page. Created (with parents) on demand.
    /// Default: `./translated_specs`.
    pub output_dir: PathBuf,

    /// TrueType/OpenType font used for replacement text.
    /// Default: `./NotoSansSC-Regular.ttf`.
    ///
    /// The default placeholder is CJK, so the font must cover CJK glyphs. If
    /// the file cannot be loaded the fitter falls back to a small built-in
    /// Latin face and logs a warning.
    pub font_path: PathBuf,

    /// Rendering DPI used when rasterising each page. Range: 72–2400. Default: 1200.
    ///
    /// Engineering drawings carry tiny annotations (tolerances, part numbers)
    /// that only survive OCR at very high density. The price is memory and
    /// time: an A4 page at 1200 DPI is ~9 900 × 14 000 px.
    pub dpi: u32,

    /// Optional cap on the longest rendered edge, in pixels. Default: `None`.
    ///
    /// When set, pdfium scales the page down so neither dimension exceeds
    /// the cap, overriding the DPI for oversized sheets (A0 plots).
    pub max_rendered_pixels: Option<u32>,

    /// Regions whose confidence, truncated to an integer, is at or below
    /// this value are left untouched. Default: 10.
    pub min_confidence: i32,

    /// Language of the drawing's text, handed to the [`Translator`]. Default: `"en"`.
    pub source_language: String,

    /// Language the [`Translator`] should produce. Default: `"zh-CN"`.
    pub target_language: String,

    /// Source of replacement text. Default: [`PlaceholderTranslator`].
    pub translator: Arc<dyn Translator>,

    /// Pre-constructed text detector. Takes precedence over [`Self::ocr`].
    pub detector: Option<Arc<dyn TextDetector>>,

    /// Settings for the default tesseract-backed detector.
    pub ocr: OcrSettings,

    /// Order in which regions are drawn. Default: [`RegionOrder::TopLeft`].
    pub region_order: RegionOrder,

    /// Fill used to erase a region. Default: white.
    pub erase_color: Rgb<u8>,

    /// Colour of replacement text. Default: black.
    pub text_color: Rgb<u8>,

    /// Page selection. Default: All pages.
    pub pages: PageSelection,

    /// PDF user password for encrypted documents.
    pub password: Option<String>,

    /// Explicit path to the pdfium shared library. If None, `PDFIUM_LIB_PATH`,
    /// the working directory and the system library are tried in that order.
    pub pdfium_library: Option<PathBuf>,

    /// Optional per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for TranslationConfig {
    fn default() -> Self {
        Self {
            input: PathBuf::from("./data/aluminum_hinge.pdf"),
            output_dir: PathBuf::from("./translated_specs"),
            font_path: PathBuf::from("./NotoSansSC-Regular.ttf"),
            dpi: 1200,
            max_rendered_pixels: None,
            min_confidence: 10,
            source_language: "en".to_string(),
            target_language: "zh-CN".to_string(),
            translator: Arc::new(PlaceholderTranslator::default()),
            detector: None,
            ocr: OcrSettings::default(),
            region_order: RegionOrder::default(),
            erase_color: Rgb([255, 255, 255]),
            text_color: Rgb([0, 0, 0]),
            pages: PageSelection::default(),
            password: None,
            pdfium_library: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for TranslationConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfig")
            .field("input", &self.input)
            .field("output_dir", &self.output_dir)
            .field("font_path", &self.font_path)
            .field("dpi", &self.dpi)
            .field("max_rendered_pixels", &self.max_rendered_pixels)
            .field("min_confidence", &self.min_confidence)
            .field("source_language", &self.source_language)
            .field("target_language", &self.target_language)
            .field("translator", &"<dyn Translator>")
            .field("detector", &self.detector.as_ref().map(|_| "<dyn TextDetector>"))
            .field("ocr", &self.ocr)
            .field("region_order", &self.region_order)
            .field("pages", &self.pages)
            .field("pdfium_library", &self.pdfium_library)
            .finish()
    }
}

impl TranslationConfig {
    /// Create a new builder for `TranslationConfig`.
    pub fn builder() -> TranslationConfigBuilder {
        TranslationConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`TranslationConfig`].
pub struct TranslationConfigBuilder {
    config: TranslationConfig,
}

impl fmt::Debug for TranslationConfigBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TranslationConfigBuilder")
            .field("config", &self.config)
            .finish()
    }
}

impl TranslationConfigBuilder {
    pub fn input(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.input = path.into();
        self
    }

    pub fn output_dir(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.output_dir = path.into();
        self
    }

    pub fn font_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.font_path = path.into();
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi.clamp(MIN_DPI, MAX_DPI);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = Some(px.max(100));
        self
    }

    pub fn min_confidence(mut self, threshold: i32) -> Self {
        self.config.min_confidence = threshold.clamp(-1, 100);
        self
    }

    pub fn source_language(mut self, lang: impl Into<String>) -> Self {
        self.config.source_language = lang.into();
        self
    }

    pub fn target_language(mut self, lang: impl Into<String>) -> Self {
        self.config.target_language = lang.into();
        self
    }

    pub fn translator(mut self, translator: Arc<dyn Translator>) -> Self {
        self.config.translator = translator;
        self
    }

    pub fn detector(mut self, detector: Arc<dyn TextDetector>) -> Self {
        self.config.detector = Some(detector);
        self
    }

    pub fn ocr(mut self, settings: OcrSettings) -> Self {
        self.config.ocr = settings;
        self
    }

    pub fn region_order(mut self, order: RegionOrder) -> Self {
        self.config.region_order = order;
        self
    }

    pub fn erase_color(mut self, color: Rgb<u8>) -> Self {
        self.config.erase_color = color;
        self
    }

    pub fn text_color(mut self, color: Rgb<u8>) -> Self {
        self.config.text_color = color;
        self
    }

    pub fn pages(mut self, selection: PageSelection) -> Self {
        self.config.pages = selection;
        self
    }

    pub fn password(mut self, pwd: impl Into<String>) -> Self {
        self.config.password = Some(pwd.into());
        self
    }

    pub fn pdfium_library(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_library = Some(path.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<TranslationConfig, TranslateError> {
        let c = &self.config;
        if c.dpi < MIN_DPI || c.dpi > MAX_DPI {
            return Err(TranslateError::InvalidConfig(format!(
                "DPI must be {MIN_DPI}–{MAX_DPI}, got {}",
                c.dpi
            )));
        }
        if c.input.as_os_str().is_empty() {
            return Err(TranslateError::InvalidConfig(
                "Input path must not be empty".into(),
            ));
        }
        if c.output_dir.as_os_str().is_empty() {
            return Err(TranslateError::InvalidConfig(
                "Output directory must not be empty".into(),
            ));
        }
        if c.detector.is_none() && c.ocr.program.trim().is_empty() {
            return Err(TranslateError::InvalidConfig(
                "OCR program must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

// ── OCR settings ─────────────────────────────────────────────────────────

/// How the default tesseract detector is invoked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OcrSettings {
    /// Executable name or path. Default: `tesseract`.
    pub program: String,
    /// Tesseract language model. Default: `eng`.
    pub language: String,
    /// `--oem`. Default: 1 (LSTM only).
    pub engine_mode: u8,
    /// `--psm`. Default: 3 (fully automatic page segmentation).
    pub page_segmentation_mode: u8,
}

impl Default for OcrSettings {
    fn default() -> Self {
        Self {
            program: "tesseract".to_string(),
            language: "eng".to_string(),
            engine_mode: 1,
            page_segmentation_mode: 3,
        }
    }
}

// ── Enums ────────────────────────────────────────────────────────────────

/// Order in which a page's regions are drawn.
///
/// Regions are never merged or clipped against each other: where two boxes
/// overlap, the one drawn last wins. This enum makes "last" well-defined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum RegionOrder {
    /// Sort by `top`, then `left`. Ties keep detector order. (default)
    #[default]
    TopLeft,
    /// Keep the order the detector returned.
    Detector,
}

/// Specifies which pages of the PDF to translate.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum PageSelection {
    /// Translate all pages (default).
    #[default]
    All,
    /// Translate a single page (1-indexed).
    Single(usize),
    /// Translate a contiguous range of pages (1-indexed, inclusive).
    Range(usize, usize),
    /// Translate specific pages (1-indexed, deduplicated).
    Set(Vec<usize>),
}

impl PageSelection {
    /// Expand the selection into a sorted, deduplicated list of 0-indexed page numbers.
    pub fn to_indices(&self, total_pages: usize) -> Vec<usize> {
        let mut indices: Vec<usize> = match self {
            PageSelection::All => (0..total_pages).collect(),
            PageSelection::Single(p) => {
                if *p >= 1 && *p <= total_pages {
                    vec![p - 1]
                } else {
                    vec![]
                }
            }
            PageSelection::Range(start, end) => {
                let s = (*start).max(1) - 1;
                let e = (*end).min(total_pages);
                (s..e).collect()
            }
            PageSelection::Set(pages) => pages
                .iter()
                .filter(|&&p| p >= 1 && p <= total_pages)
                .map(|p| p - 1)
                .collect(),
        };
        indices.sort_unstable();
        indices.dedup();
        indices
    }

    /// First page the selection asks for, used when reporting an empty match.
    pub fn first_requested(&self) -> usize {
        match self {
            PageSelection::All => 1,
            PageSelection::Single(p) => *p,
            PageSelection::Range(start, _) => *start,
            PageSelection::Set(pages) => pages.iter().copied().min().unwrap_or(0),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_documented_values() {
        let c = TranslationConfig::default();
        assert_eq!(c.dpi, 1200);
        assert_eq!(c.min_confidence, 10);
        assert_eq!(c.output_dir, PathBuf::from("./translated_specs"));
        assert_eq!(c.font_path, PathBuf::from("./NotoSansSC-Regular.ttf"));
        assert_eq!(c.erase_color, Rgb([255, 255, 255]));
        assert_eq!(c.text_color, Rgb([0, 0, 0]));
        assert_eq!(c.region_order, RegionOrder::TopLeft);
        assert_eq!(c.ocr.language, "eng");
        assert_eq!(c.ocr.engine_mode, 1);
        assert_eq!(c.ocr.page_segmentation_mode, 3);
    }

    #[test]
    fn builder_clamps_dpi() {
        let c = TranslationConfig::builder().dpi(10).build().unwrap();
        assert_eq!(c.dpi, MIN_DPI);
        let c = TranslationConfig::builder().dpi(100_000).build().unwrap();
        assert_eq!(c.dpi, MAX_DPI);
    }

    #[test]
    fn build_rejects_out_of_range_dpi_set_directly() {
        let mut builder = TranslationConfig::builder();
        builder.config.dpi = 5;
        assert!(matches!(
            builder.build(),
            Err(TranslateError::InvalidConfig(_))
        ));
    }

    #[test]
    fn build_rejects_empty_paths() {
        let err = TranslationConfig::builder().input("").build().unwrap_err();
        assert!(err.to_string().contains("Input path"));
        let err = TranslationConfig::builder()
            .output_dir("")
            .build()
            .unwrap_err();
        assert!(err.to_string().contains("Output directory"));
    }

    #[test]
    fn build_rejects_empty_ocr_program_without_detector() {
        let err = TranslationConfig::builder()
            .ocr(OcrSettings {
                program: "  ".into(),
                ..OcrSettings::default()
            })
            .build()
            .unwrap_err();
        assert!(matches!(err, TranslateError::InvalidConfig(_)));
    }

    #[test]
    fn debug_hides_trait_objects() {
        let dbg = format!("{:?}", TranslationConfig::default());
        assert!(dbg.contains("<dyn Translator>"));
        assert!(dbg.contains("dpi: 1200"));
    }

    #[test]
    fn page_selection_to_indices() {
        assert_eq!(PageSelection::All.to_indices(3), vec![0, 1, 2]);
        assert_eq!(PageSelection::Single(2).to_indices(3), vec![1]);
        assert_eq!(PageSelection::Single(4).to_indices(3), Vec::<usize>::new());
        assert_eq!(PageSelection::Range(2, 9).to_indices(3), vec![1, 2]);
        assert_eq!(
            PageSelection::Set(vec![3, 1, 3, 0]).to_indices(3),
            vec![0, 2]
        );
        assert_eq!(PageSelection::All.to_indices(0), Vec::<usize>::new());
    }

    #[test]
    fn first_requested_page() {
        assert_eq!(PageSelection::Set(vec![7, 4]).first_requested(), 4);
        assert_eq!(PageSelection::Range(5, 9).first_requested(), 5);
    }
}
