//! Region annotation: erase each OCR box and redraw it with replacement text.
//!
//! For every region, in draw order:
//!
//! 1. skip it if its confidence (truncated) is at or below the threshold, or
//!    its text is blank;
//! 2. ask the [`Translator`] for replacement text;
//! 3. fit a font to the box ([`crate::pipeline::fit`]);
//! 4. fill the box, boundary included, with the erase colour;
//! 5. draw the text at the box's left edge, centred vertically.
//!
//! Boxes are never clipped against each other. Where two overlap, the one
//! drawn later wins, and [`RegionOrder`] fixes what "later" means.

use crate::config::{RegionOrder, TranslationConfig};
use crate::error::TranslateError;
use crate::pipeline::fit::fit_font;
use crate::pipeline::ocr::TextRegion;
use crate::translator::Translator;
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_filled_rect_mut;
use imageproc::rect::Rect;
use std::path::Path;
use tracing::debug;

/// What happened to one region.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnnotationOutcome {
    /// Erased and redrawn. `fallback_font` is set when the built-in face was used.
    Annotated { fallback_font: bool },
    /// Confidence at or below the threshold; pixels untouched.
    SkippedLowConfidence,
    /// Empty or whitespace-only text; pixels untouched.
    SkippedBlank,
}

/// Per-page region tallies.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RegionCounts {
    pub detected: usize,
    pub annotated: usize,
    pub skipped_low_confidence: usize,
    pub skipped_blank: usize,
    pub font_fallbacks: usize,
}

impl RegionCounts {
    fn record(&mut self, outcome: AnnotationOutcome) {
        match outcome {
            AnnotationOutcome::Annotated { fallback_font } => {
                self.annotated += 1;
                if fallback_font {
                    self.font_fallbacks += 1;
                }
            }
            AnnotationOutcome::SkippedLowConfidence => self.skipped_low_confidence += 1,
            AnnotationOutcome::SkippedBlank => self.skipped_blank += 1,
        }
    }
}

/// Put regions in draw order. The sort is stable, so equal keys keep the
/// detector's order.
pub fn order_regions(regions: &mut [TextRegion], order: RegionOrder) {
    match order {
        RegionOrder::TopLeft => regions.sort_by_key(|r| (r.top, r.left)),
        RegionOrder::Detector => {}
    }
}

/// Everything needed to annotate regions, borrowed from the run config.
pub struct Annotator<'a> {
    translator: &'a dyn Translator,
    font_path: &'a Path,
    min_confidence: i32,
    source_language: &'a str,
    target_language: &'a str,
    erase_color: Rgb<u8>,
    text_color: Rgb<u8>,
}

impl<'a> Annotator<'a> {
    pub fn new(config: &'a TranslationConfig) -> Self {
        Self {
            translator: config.translator.as_ref(),
            font_path: &config.font_path,
            min_confidence: config.min_confidence,
            source_language: &config.source_language,
            target_language: &config.target_language,
            erase_color: config.erase_color,
            text_color: config.text_color,
        }
    }

    /// Why `region` would be skipped, if it would.
    pub fn skip_reason(&self, region: &TextRegion) -> Option<AnnotationOutcome> {
        if (region.confidence as i32) <= self.min_confidence {
            Some(AnnotationOutcome::SkippedLowConfidence)
        } else if region.text.trim().is_empty() {
            Some(AnnotationOutcome::SkippedBlank)
        } else {
            None
        }
    }

    /// Erase `region` on `image` and draw its replacement text.
    pub fn annotate_region(
        &self,
        image: &mut RgbImage,
        region: &TextRegion,
    ) -> Result<AnnotationOutcome, TranslateError> {
        if let Some(skip) = self.skip_reason(region) {
            return Ok(skip);
        }

        let replacement =
            self.translator
                .translate(&region.text, self.source_language, self.target_language)?;

        let font = fit_font(&replacement, self.font_path, region.width, region.height);

        let (x, y) = (region.left as i32, region.top as i32);
        let erase = Rect::at(x, y).of_size(region.width + 1, region.height + 1);
        draw_filled_rect_mut(image, erase, self.erase_color);

        let text_box = font.measure(&replacement);
        let offset = (region.height as i32 - text_box.height() as i32) / 2;
        font.draw(image, x, y + offset, self.text_color, &replacement);

        debug!(
            "'{}' → '{}' at ({}, {}) {}x{}, size {}",
            region.text, replacement, region.left, region.top, region.width, region.height, font.size
        );

        Ok(AnnotationOutcome::Annotated {
            fallback_font: font.is_fallback(),
        })
    }
}

/// Order `regions` per `config.region_order` and annotate each on `image`.
pub fn annotate_page(
    image: &mut RgbImage,
    mut regions: Vec<TextRegion>,
    config: &TranslationConfig,
) -> Result<RegionCounts, TranslateError> {
    let annotator = Annotator::new(config);
    order_regions(&mut regions, config.region_order);

    let mut counts = RegionCounts {
        detected: regions.len(),
        ..RegionCounts::default()
    };
    for region in &regions {
        counts.record(annotator.annotate_region(image, region)?);
    }
    Ok(counts)
}
