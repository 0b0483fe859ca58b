//! Progress-callback trait for per-page events.
//!
//! Inject an [`Arc<dyn TranslationProgressCallback>`] via
//! [`crate::config::TranslationConfigBuilder::progress_callback`] to receive
//! events as the pipeline walks the document. The CLI uses this to drive its
//! progress bar and print the per-page console lines.
//!
//! # Example
//!
//! ```rust
//! use blueprint_translate::{PageResult, TranslationConfig, TranslationProgressCallback};
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     saved: AtomicUsize,
//! }
//!
//! impl TranslationProgressCallback for CountingCallback {
//!     fn on_page_complete(&self, page: &PageResult, total_pages: usize) {
//!         let done = self.saved.fetch_add(1, Ordering::SeqCst) + 1;
//!         eprintln!("{done}/{total_pages}: {}", page.output_path.display());
//!     }
//! }
//!
//! let config = TranslationConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { saved: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use crate::output::PageResult;
use std::path::Path;
use std::sync::Arc;

/// Called by the pipeline as it processes each page.
///
/// Events arrive on the pipeline thread, strictly in page order. All methods
/// have default no-op implementations so callers only override what they
/// care about.
pub trait TranslationProgressCallback: Send + Sync {
    /// Called once after the document is opened, before any page is rendered.
    ///
    /// # Arguments
    /// * `total_pages` — number of pages that will be processed
    /// * `input`       — the source PDF
    fn on_conversion_start(&self, total_pages: usize, input: &Path) {
        let _ = (total_pages, input);
    }

    /// Called after a page is rasterised, just before OCR runs on it.
    ///
    /// # Arguments
    /// * `page_num`    — 1-indexed page number
    /// * `total_pages` — number of pages being processed
    fn on_page_start(&self, page_num: usize, total_pages: usize) {
        let _ = (page_num, total_pages);
    }

    /// Called once the page's PNG has been written.
    fn on_page_complete(&self, page: &PageResult, total_pages: usize) {
        let _ = (page, total_pages);
    }

    /// Called once after the last page is saved.
    ///
    /// # Arguments
    /// * `total_pages`     — number of pages that were selected
    /// * `processed_pages` — pages written to disk
    fn on_conversion_complete(&self, total_pages: usize, processed_pages: usize) {
        let _ = (total_pages, processed_pages);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl TranslationProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in [`crate::config::TranslationConfig`].
pub type ProgressCallback = Arc<dyn TranslationProgressCallback>;
