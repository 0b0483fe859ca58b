//! PNG output for annotated pages.
//!
//! Each page is written to a sibling temp file and renamed into place, so an
//! interrupted run never leaves a truncated `page_N_translated.png` behind.
//! Re-running overwrites existing outputs.

use crate::error::TranslateError;
use image::{ImageFormat, RgbImage};
use std::path::{Path, PathBuf};
use tracing::debug;

/// `<dir>/page_<page_num>_translated.png`, with `page_num` 1-indexed.
pub fn page_output_path(dir: &Path, page_num: usize) -> PathBuf {
    dir.join(format!("page_{}_translated.png", page_num))
}

/// Encode `image` as PNG at `path`, replacing any existing file.
pub fn write_png(image: &RgbImage, path: &Path) -> Result<(), TranslateError> {
    let tmp_path = path.with_extension("png.tmp");

    image
        .save_with_format(&tmp_path, ImageFormat::Png)
        .map_err(|e| TranslateError::OutputWriteFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        })?;

    std::fs::rename(&tmp_path, path).map_err(|e| {
        let _ = std::fs::remove_file(&tmp_path);
        TranslateError::OutputWriteFailed {
            path: path.to_path_buf(),
            detail: e.to_string(),
        }
    })?;

    debug!(
        "Wrote {}x{} PNG → {}",
        image.width(),
        image.height(),
        path.display()
    );
    Ok(())
}
