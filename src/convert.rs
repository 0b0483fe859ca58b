//! Whole-document entry point.
//!
//! Pages are handled strictly one after another: render, detect, annotate,
//! save, drop. Any failure aborts the run; pages already saved stay on disk.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use crate::output::{PageResult, TranslationOutput, TranslationStats};
use crate::pipeline::annotate::annotate_page;
use crate::pipeline::encode::{page_output_path, write_png};
use crate::pipeline::ocr::{TesseractDetector, TextDetector};
use crate::pipeline::{input, render};
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Translate every selected page of `config.input` into
/// `config.output_dir/page_{n}_translated.png`.
///
/// # Errors
/// Input, pdfium, and page-selection problems are reported before the output
/// directory is created. After that the first failing page aborts the run.
pub fn translate_pdf(config: &TranslationConfig) -> Result<TranslationOutput, TranslateError> {
    let total_start = Instant::now();

    // ── Step 1: Validate input ───────────────────────────────────────────
    let pdf_path = input::resolve_input(&config.input)?;

    // ── Step 2: Open the document ────────────────────────────────────────
    let pdfium = render::bind_pdfium(config)?;
    let rasterizer = render::PageRasterizer::open(&pdfium, &pdf_path, config)?;
    let total_pages = rasterizer.page_count();
    if total_pages == 0 {
        return Err(TranslateError::EmptyDocument { path: pdf_path });
    }

    // ── Step 3: Compute page indices ─────────────────────────────────────
    let page_indices = config.pages.to_indices(total_pages);
    if page_indices.is_empty() {
        return Err(TranslateError::PageOutOfRange {
            page: config.pages.first_requested(),
            total: total_pages,
        });
    }
    debug!("Selected {} of {} pages", page_indices.len(), total_pages);

    // ── Step 4: Prepare output directory ─────────────────────────────────
    std::fs::create_dir_all(&config.output_dir).map_err(|e| TranslateError::OutputDirFailed {
        path: config.output_dir.clone(),
        source: e,
    })?;

    let detector: Arc<dyn TextDetector> = match &config.detector {
        Some(d) => Arc::clone(d),
        None => Arc::new(TesseractDetector::new(config.ocr.clone(), config.dpi)),
    };

    info!(
        "Processing {} pages from '{}'...",
        page_indices.len(),
        pdf_path.display()
    );
    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_start(page_indices.len(), &pdf_path);
    }

    // ── Step 5: Page loop ────────────────────────────────────────────────
    let mut pages = Vec::with_capacity(page_indices.len());
    let mut render_duration_ms = 0u64;
    let mut ocr_duration_ms = 0u64;

    for idx in page_indices.iter().copied() {
        let page_num = idx + 1;

        let render_start = Instant::now();
        let mut image = rasterizer.render_page(idx)?;
        render_duration_ms += render_start.elapsed().as_millis() as u64;

        info!("Page {}: Performing OCR...", page_num);
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_start(page_num, page_indices.len());
        }

        let ocr_start = Instant::now();
        let regions = detector.detect(page_num, &image)?;
        ocr_duration_ms += ocr_start.elapsed().as_millis() as u64;

        let counts = annotate_page(&mut image, regions, config)?;

        let output_path = page_output_path(&config.output_dir, page_num);
        write_png(&image, &output_path)?;
        info!("Saved translated page to '{}'", output_path.display());

        let result = PageResult {
            page_num,
            output_path,
            width: image.width(),
            height: image.height(),
            regions_detected: counts.detected,
            regions_annotated: counts.annotated,
            skipped_low_confidence: counts.skipped_low_confidence,
            skipped_blank: counts.skipped_blank,
            font_fallbacks: counts.font_fallbacks,
        };
        if let Some(ref cb) = config.progress_callback {
            cb.on_page_complete(&result, page_indices.len());
        }
        pages.push(result);
    }

    drop(rasterizer);
    info!("Processing complete.");

    let stats = TranslationStats {
        total_pages,
        processed_pages: pages.len(),
        regions_detected: pages.iter().map(|p| p.regions_detected).sum(),
        regions_annotated: pages.iter().map(|p| p.regions_annotated).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
        render_duration_ms,
        ocr_duration_ms,
    };

    if let Some(ref cb) = config.progress_callback {
        cb.on_conversion_complete(page_indices.len(), pages.len());
    }

    Ok(TranslationOutput {
        input: pdf_path,
        output_dir: config.output_dir.clone(),
        pages,
        stats,
    })
}
