//! Input validation: make sure the user-supplied path is a readable PDF.
//!
//! This runs before pdfium is bound and before the output directory exists,
//! so a wrong path leaves the file system untouched. We check the `%PDF`
//! magic bytes here so callers get a meaningful error rather than a pdfium
//! failure.

use crate::error::TranslateError;
use std::io::Read;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Validate `path` and return it as an owned path.
///
/// # Errors
/// * [`TranslateError::FileNotFound`] — nothing at `path`, or it is a directory
/// * [`TranslateError::PermissionDenied`] — the file cannot be opened for reading
/// * [`TranslateError::NotAPdf`] — the first four bytes are not `%PDF`
pub fn resolve_input(path: &Path) -> Result<PathBuf, TranslateError> {
    let path = path.to_path_buf();

    if !path.is_file() {
        return Err(TranslateError::FileNotFound { path });
    }

    let mut file = match std::fs::File::open(&path) {
        Ok(f) => f,
        Err(e) if e.kind() == std::io::ErrorKind::PermissionDenied => {
            return Err(TranslateError::PermissionDenied { path });
        }
        Err(_) => return Err(TranslateError::FileNotFound { path }),
    };

    let mut magic = [0u8; 4];
    let mut filled = 0;
    while filled < magic.len() {
        match file.read(&mut magic[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(e) if e.kind() == std::io::ErrorKind::Interrupted => continue,
            Err(_) => break,
        }
    }
    if &magic != b"%PDF" {
        return Err(TranslateError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
