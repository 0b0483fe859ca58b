//! Text detection: run OCR on a rendered page and rebuild per-region records.
//!
//! The default [`TesseractDetector`] shells out to the `tesseract` binary with
//! TSV output. The TSV is read column-wise into [`OcrData`] (one array per
//! field, as tesseract reports it) and regions are rebuilt by taking index `i`
//! from every array.
//!
//! No filtering happens here. Rows for blocks, paragraphs and lines come back
//! with confidence `-1` and empty text; the annotator skips them along with
//! low-confidence words.

use crate::config::OcrSettings;
use crate::error::TranslateError;
use image::RgbImage;
use std::ffi::OsString;
use std::io::Write;
use std::path::Path;
use std::process::Command;
use tracing::debug;

/// One OCR detection: a box, the recognised string and its confidence.
#[derive(Debug, Clone, PartialEq)]
pub struct TextRegion {
    /// Left edge in pixels.
    pub left: u32,
    /// Top edge in pixels.
    pub top: u32,
    pub width: u32,
    pub height: u32,
    /// Recognised text, possibly empty.
    pub text: String,
    /// Engine confidence, 0–100. Tesseract reports `-1` for non-word rows.
    pub confidence: f32,
}

impl TextRegion {
    pub fn new(left: u32, top: u32, width: u32, height: u32, text: impl Into<String>, confidence: f32) -> Self {
        Self {
            left,
            top,
            width,
            height,
            text: text.into(),
            confidence,
        }
    }
}

/// Finds text regions on a rendered page.
pub trait TextDetector: Send + Sync {
    /// Detect regions on `image`. `page_num` (1-indexed) is for error context only.
    fn detect(&self, page_num: usize, image: &RgbImage) -> Result<Vec<TextRegion>, TranslateError>;
}

/// Column-wise OCR output, one entry per TSV row.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct OcrData {
    pub level: Vec<u32>,
    pub conf: Vec<f32>,
    pub left: Vec<u32>,
    pub top: Vec<u32>,
    pub width: Vec<u32>,
    pub height: Vec<u32>,
    pub text: Vec<String>,
}

impl OcrData {
    pub fn len(&self) -> usize {
        self.level.len()
    }

    pub fn is_empty(&self) -> bool {
        self.level.is_empty()
    }

    /// Parse tesseract's TSV output.
    ///
    /// Expected columns: `level page_num block_num par_num line_num word_num
    /// left top width height conf text`. The header row is skipped; a missing
    /// trailing `text` column reads as empty text.
    pub fn from_tsv(tsv: &str) -> Result<Self, String> {
        let mut data = OcrData::default();

        for (idx, row) in tsv.lines().enumerate() {
            if row.trim().is_empty() || row.starts_with("level") {
                continue;
            }
            let cols = row.split('\t').collect::<Vec<_>>();
            if cols.len() < 11 {
                return Err(format!(
                    "row {}: expected at least 11 columns, got {}",
                    idx + 1,
                    cols.len()
                ));
            }

            let num = |col: usize| -> Result<u32, String> {
                cols[col]
                    .trim()
                    .parse::<u32>()
                    .map_err(|e| format!("row {}, column {}: {e}", idx + 1, col + 1))
            };

            data.level.push(num(0)?);
            data.left.push(num(6)?);
            data.top.push(num(7)?);
            data.width.push(num(8)?);
            data.height.push(num(9)?);
            data.conf.push(
                cols[10]
                    .trim()
                    .parse::<f32>()
                    .map_err(|e| format!("row {}, column 11: {e}", idx + 1))?,
            );
            data.text.push(cols.get(11).copied().unwrap_or("").to_string());
        }

        Ok(data)
    }

    /// Rebuild per-region records by index across the parallel arrays.
    pub fn into_regions(self) -> Vec<TextRegion> {
        (0..self.len())
            .map(|i| TextRegion {
                left: self.left[i],
                top: self.top[i],
                width: self.width[i],
                height: self.height[i],
                text: self.text[i].clone(),
                confidence: self.conf[i],
            })
            .collect()
    }
}

/// Detector backed by the `tesseract` command-line tool.
#[derive(Debug, Clone)]
pub struct TesseractDetector {
    settings: OcrSettings,
    dpi: u32,
}

impl TesseractDetector {
    /// `dpi` is passed to tesseract so its size heuristics see the real density.
    pub fn new(settings: OcrSettings, dpi: u32) -> Self {
        Self { settings, dpi }
    }

    pub fn settings(&self) -> &OcrSettings {
        &self.settings
    }

    /// Arguments for one run on `image_path`, writing TSV to stdout.
    pub fn args(&self, image_path: &Path) -> Vec<OsString> {
        vec![
            image_path.as_os_str().to_owned(),
            "stdout".into(),
            "-l".into(),
            self.settings.language.clone().into(),
            "--oem".into(),
            self.settings.engine_mode.to_string().into(),
            "--psm".into(),
            self.settings.page_segmentation_mode.to_string().into(),
            "--dpi".into(),
            self.dpi.to_string().into(),
            "tsv".into(),
        ]
    }
}

impl TextDetector for TesseractDetector {
    fn detect(&self, page_num: usize, image: &RgbImage) -> Result<Vec<TextRegion>, TranslateError> {
        let mut tmp = tempfile::Builder::new()
            .prefix("bpt-page-")
            .suffix(".png")
            .tempfile()
            .map_err(|e| TranslateError::Internal(format!("tempfile: {e}")))?;
        image
            .write_to(&mut tmp, image::ImageFormat::Png)
            .map_err(|e| TranslateError::OcrFailed {
                page: page_num,
                detail: format!("failed to write temp image: {e}"),
            })?;
        tmp.flush().map_err(|e| TranslateError::OcrFailed {
            page: page_num,
            detail: format!("failed to flush temp image: {e}"),
        })?;

        let output = Command::new(&self.settings.program)
            .args(self.args(tmp.path()))
            .output()
            .map_err(|e| TranslateError::OcrUnavailable {
                program: self.settings.program.clone(),
                detail: e.to_string(),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(TranslateError::OcrFailed {
                page: page_num,
                detail: format!("{}: {}", output.status, stderr.trim()),
            });
        }

        let tsv = String::from_utf8_lossy(&output.stdout);
        let data = OcrData::from_tsv(&tsv).map_err(|detail| TranslateError::OcrFailed {
            page: page_num,
            detail,
        })?;
        debug!("Page {}: tesseract returned {} rows", page_num, data.len());

        Ok(data.into_regions())
    }
}
