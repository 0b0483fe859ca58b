//! # blueprint-translate
//!
//! Turn the pages of a technical-drawing PDF into annotated PNG images: every
//! OCR-detected label is erased and replaced by text sized to fit the
//! original box.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF
//!  │
//!  ├─ 1. Input     validate the local path and the %PDF magic bytes
//!  ├─ 2. Render    rasterise one page at a time via pdfium (default 1200 DPI)
//!  ├─ 3. OCR       tesseract TSV → TextRegion records
//!  ├─ 4. Annotate  filter → translate → fit font → erase → draw, per region
//!  └─ 5. Encode    one PNG per page: page_{n}_translated.png
//! ```
//!
//! Everything runs on the calling thread. A page is saved and dropped before
//! the next one is rasterised, so peak memory is one page buffer.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use blueprint_translate::{translate_pdf, TranslationConfig};
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = TranslationConfig::builder()
//!         .input("drawings/hinge.pdf")
//!         .output_dir("out")
//!         .dpi(600)
//!         .build()?;
//!     let output = translate_pdf(&config)?;
//!     for page in &output.pages {
//!         println!("{} ({} regions)", page.output_path.display(), page.regions_annotated);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Replacement text
//!
//! The text written into each box comes from a [`Translator`]. The default
//! [`PlaceholderTranslator`] writes the same string everywhere; plug a real
//! backend in through [`TranslationConfigBuilder::translator`].
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `bptranslate` binary (clap + anyhow + tracing-subscriber + indicatif) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod translator;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    OcrSettings, PageSelection, RegionOrder, TranslationConfig, TranslationConfigBuilder,
};
pub use convert::translate_pdf;
pub use error::TranslateError;
pub use output::{PageResult, TranslationOutput, TranslationStats};
pub use pipeline::annotate::{annotate_page, AnnotationOutcome, RegionCounts};
pub use pipeline::encode::page_output_path;
pub use pipeline::fit::{fit_font, FittedFont, FontSource};
pub use pipeline::ocr::{TesseractDetector, TextDetector, TextRegion};
pub use progress::{NoopProgressCallback, ProgressCallback, TranslationProgressCallback};
pub use translator::{IdentityTranslator, PlaceholderTranslator, Translator};
