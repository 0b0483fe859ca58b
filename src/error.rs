//! Error types for the blueprint-translate library.
//!
//! Every failure that stops a run is a [`TranslateError`], returned from
//! [`crate::convert::translate_pdf`]. There is no per-page error type: a page
//! that fails to rasterise, OCR or save aborts the whole run, and the PDF
//! document handle is still released on the way out.
//!
//! The one recoverable failure, a font file that cannot be loaded, never
//! surfaces here. [`FontLoadError`] stays inside the font fitter, which logs a
//! warning and substitutes the built-in face.

use std::path::PathBuf;
use thiserror::Error;

/// All fatal errors returned by the blueprint-translate library.
#[derive(Debug, Error)]
pub enum TranslateError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("Input PDF file not found at '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// Process does not have read permission on the file.
    #[error("Permission denied reading '{path}'\nTry: chmod +r {path:?}")]
    PermissionDenied { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}'\nFirst bytes: {magic:?}")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// PDF header/trailer/xref is corrupt and cannot be parsed.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// PDF requires a password but none was provided.
    #[error("PDF '{path}' is encrypted and requires a password.\nProvide it with --password <PASSWORD>.")]
    PasswordRequired { path: PathBuf },

    /// A password was provided but it is wrong.
    #[error("Wrong password for PDF '{path}'")]
    WrongPassword { path: PathBuf },

    /// The document opened but contains no pages.
    #[error("PDF '{path}' has no pages")]
    EmptyDocument { path: PathBuf },

    /// The page selection matched none of the document's pages.
    #[error("Page {page} is out of range (document has {total} pages)")]
    PageOutOfRange { page: usize, total: usize },

    /// pdfium-render returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    // ── OCR errors ────────────────────────────────────────────────────────
    /// The OCR engine could not be started at all.
    #[error("OCR engine '{program}' could not be started: {detail}\nInstall tesseract or point --tesseract at the binary.")]
    OcrUnavailable { program: String, detail: String },

    /// The OCR engine ran but failed on a page.
    #[error("OCR failed for page {page}: {detail}")]
    OcrFailed { page: usize, detail: String },

    // ── Translation errors ────────────────────────────────────────────────
    /// The translation backend rejected a region's text.
    #[error("Translation of '{text}' failed: {detail}")]
    TranslationFailed { text: String, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create the output directory.
    #[error("Failed to create output directory '{path}': {source}")]
    OutputDirFailed {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Could not encode or write a translated page.
    #[error("Failed to write translated page '{path}': {detail}")]
    OutputWriteFailed { path: PathBuf, detail: String },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Pdfium binding errors ─────────────────────────────────────────────
    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
You can:\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Pass --pdfium-lib /path/to/libpdfium.\n\
  • Place libpdfium next to the working directory.\n"
    )]
    PdfiumBindingFailed(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

/// A font resource could not be opened or parsed.
///
/// Recovered inside [`crate::pipeline::fit::fit_font`]; never returned to
/// callers of the pipeline.
#[derive(Debug, Error)]
pub enum FontLoadError {
    #[error("could not read font '{path}': {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("could not parse font '{path}': {detail}")]
    Parse { path: PathBuf, detail: String },
}
