//! Pipeline stages for PDF page translation.
//!
//! Each submodule implements exactly one transformation step, so each can be
//! tested without the others and swapped (a different OCR engine, a different
//! raster backend) without touching the rest.
//!
//! ## Data Flow
//!
//! ```text
//! input ──▶ render ──▶ ocr ──▶ annotate (fit) ──▶ encode
//! (path)    (pdfium)  (tesseract) (erase+draw)     (PNG)
//! ```
//!
//! 1. [`input`]    — validate the user-supplied path before any side effect
//! 2. [`render`]   — bind pdfium, open the document, rasterise one page
//! 3. [`ocr`]      — run the detector and rebuild `TextRegion` records
//! 4. [`annotate`] — filter, translate, erase and redraw each region in place;
//!    [`fit`] picks the font size
//! 5. [`encode`]   — write the finished page as a PNG

pub mod annotate;
pub mod encode;
pub mod fit;
pub mod input;
pub mod ocr;
pub mod render;
