//! Result types returned by [`crate::convert::translate_pdf`].
//!
//! The images themselves are on disk; these records say where, and how many
//! regions each page had. Recognised text and confidences are deliberately
//! absent.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of one translated page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageResult {
    /// 1-indexed page number.
    pub page_num: usize,
    /// Where the annotated PNG was written.
    pub output_path: PathBuf,
    /// Rendered width in pixels.
    pub width: u32,
    /// Rendered height in pixels.
    pub height: u32,
    /// Regions returned by the detector.
    pub regions_detected: usize,
    /// Regions erased and overdrawn.
    pub regions_annotated: usize,
    /// Regions at or below the confidence threshold.
    pub skipped_low_confidence: usize,
    /// Regions whose text was empty or whitespace.
    pub skipped_blank: usize,
    /// Regions drawn with the built-in fallback face.
    pub font_fallbacks: usize,
}

/// Aggregate statistics for a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationStats {
    /// Pages in the document.
    pub total_pages: usize,
    /// Pages written to disk.
    pub processed_pages: usize,
    /// Sum of `regions_detected` over pages.
    pub regions_detected: usize,
    /// Sum of `regions_annotated` over pages.
    pub regions_annotated: usize,
    /// Wall-clock time for the whole run.
    pub total_duration_ms: u64,
    /// Time spent in pdfium.
    pub render_duration_ms: u64,
    /// Time spent in the detector.
    pub ocr_duration_ms: u64,
}

/// Everything a run produced.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranslationOutput {
    /// Source PDF.
    pub input: PathBuf,
    /// Directory holding the PNGs.
    pub output_dir: PathBuf,
    /// One entry per processed page, in page order.
    pub pages: Vec<PageResult>,
    pub stats: TranslationStats,
}

impl TranslationOutput {
    /// Paths of every written PNG, in page order.
    pub fn output_paths(&self) -> Vec<&PathBuf> {
        self.pages.iter().map(|p| &p.output_path).collect()
    }
}
