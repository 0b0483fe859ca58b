//! Font fitting: choose the largest size, from a height-based seed downwards,
//! at which a string fits a box.
//!
//! ## The search
//!
//! 1. Seed at `floor(0.9 × box height)` (at least 1).
//! 2. Width phase: shrink by one while the text is wider than the box.
//! 3. Height phase: keep shrinking by one while it is taller than the box.
//!
//! Both phases stop at size 1. If size 1 still overflows (a box smaller than
//! one glyph), size 1 is returned anyway and the text spills over the box.
//!
//! ## Coordinate space
//!
//! [`measure`] lays glyphs out exactly as `imageproc::drawing::draw_text_mut`
//! does (pen starting at `(0, ascent)`, advances plus kerning), so the tight
//! box it reports is the box [`FittedFont::draw`] will ink, relative to the
//! draw position.
//!
//! Sizes are em sizes in pixels, the convention of most raster text APIs.

use crate::error::FontLoadError;
use ab_glyph::{point, Font, FontArc, GlyphId, PxScale, ScaleFont};
use image::{Rgb, RgbImage};
use imageproc::drawing::draw_text_mut;
use std::fmt;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Size of the built-in face used when the configured font cannot be loaded.
pub const FALLBACK_FONT_SIZE: u32 = 10;

static FALLBACK_FONT_BYTES: &[u8] = include_bytes!("../../assets/DejaVuSansMono.ttf");

/// Where a fitted font's glyphs came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FontSource {
    /// A font file on disk.
    File(PathBuf),
    /// The DejaVu Sans Mono face compiled into the binary.
    Builtin,
}

/// Tight bounding box of rendered text, relative to the draw position.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TextBox {
    pub left: i32,
    pub top: i32,
    pub right: i32,
    pub bottom: i32,
}

impl TextBox {
    /// Horizontal extent from the draw position to the right edge of the ink.
    pub fn extent_width(&self) -> u32 {
        self.right.max(0) as u32
    }

    /// `bottom - top` of the ink.
    pub fn height(&self) -> u32 {
        (self.bottom - self.top).max(0) as u32
    }
}

/// A font face at a chosen size.
#[derive(Clone)]
pub struct FittedFont {
    pub font: FontArc,
    pub size: u32,
    pub source: FontSource,
}

impl fmt::Debug for FittedFont {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FittedFont")
            .field("size", &self.size)
            .field("source", &self.source)
            .finish()
    }
}

impl FittedFont {
    /// The built-in face at [`FALLBACK_FONT_SIZE`].
    pub fn fallback() -> Self {
        Self {
            font: builtin_font(),
            size: FALLBACK_FONT_SIZE,
            source: FontSource::Builtin,
        }
    }

    pub fn is_fallback(&self) -> bool {
        self.source == FontSource::Builtin
    }

    pub fn scale(&self) -> PxScale {
        em_scale(&self.font, self.size)
    }

    /// Tight box of `text` at this font and size.
    pub fn measure(&self, text: &str) -> TextBox {
        measure(&self.font, self.size, text)
    }

    /// Draw `text` with its pen origin at `(x, y)`; `y` is the ascender line.
    pub fn draw(&self, canvas: &mut RgbImage, x: i32, y: i32, color: Rgb<u8>, text: &str) {
        draw_text_mut(canvas, color, x, y, self.scale(), &self.font, text);
    }
}

/// The embedded DejaVu Sans Mono face.
pub fn builtin_font() -> FontArc {
    FontArc::try_from_slice(FALLBACK_FONT_BYTES)
        .expect("embedded DejaVu Sans Mono is a valid TrueType font")
}

/// Read and parse a font file.
pub fn load_font(path: &Path) -> Result<FontArc, FontLoadError> {
    let bytes = std::fs::read(path).map_err(|source| FontLoadError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    FontArc::try_from_vec(bytes).map_err(|e| FontLoadError::Parse {
        path: path.to_path_buf(),
        detail: e.to_string(),
    })
}

/// Scale at which one em of `font` spans `size` pixels.
pub fn em_scale(font: &FontArc, size: u32) -> PxScale {
    let size = size as f32;
    match font.units_per_em() {
        Some(upem) if upem > 0.0 => PxScale::from(size * font.height_unscaled() / upem),
        _ => PxScale::from(size),
    }
}

/// Tight box of `text` rendered with `font` at `size`.
///
/// An empty string, or one made only of glyphs without outlines (spaces),
/// yields an all-zero box.
pub fn measure(font: &FontArc, size: u32, text: &str) -> TextBox {
    let scale = em_scale(font, size);
    let scaled = font.as_scaled(scale);

    let mut caret = 0.0f32;
    let mut last: Option<GlyphId> = None;
    let mut bounds: Option<TextBox> = None;

    for c in text.chars() {
        let glyph_id = scaled.glyph_id(c);
        let glyph = glyph_id.with_scale_and_position(scale, point(caret, scaled.ascent()));
        caret += scaled.h_advance(glyph_id);
        if let Some(outlined) = scaled.outline_glyph(glyph) {
            if let Some(last) = last {
                caret += scaled.kern(glyph_id, last);
            }
            last = Some(glyph_id);

            let bb = outlined.px_bounds();
            let glyph_box = TextBox {
                left: bb.min.x.round() as i32,
                top: bb.min.y.round() as i32,
                right: bb.min.x.round() as i32 + bb.width().round() as i32,
                bottom: bb.min.y.round() as i32 + bb.height().round() as i32,
            };
            bounds = Some(match bounds {
                None => glyph_box,
                Some(b) => TextBox {
                    left: b.left.min(glyph_box.left),
                    top: b.top.min(glyph_box.top),
                    right: b.right.max(glyph_box.right),
                    bottom: b.bottom.max(glyph_box.bottom),
                },
            });
        }
    }

    bounds.unwrap_or_default()
}

/// Starting size for a box of height `box_height`.
pub fn seed_size(box_height: u32) -> u32 {
    (box_height * 9 / 10).max(1)
}

/// Two-phase greedy shrink of the font size for `text` in a `box_width` ×
/// `box_height` box. Never returns 0 or anything above [`seed_size`].
pub fn fit_size(font: &FontArc, text: &str, box_width: u32, box_height: u32) -> u32 {
    let mut size = seed_size(box_height);
    let mut bbox = measure(font, size, text);

    while bbox.extent_width() > box_width && size > 1 {
        size -= 1;
        bbox = measure(font, size, text);
    }

    while bbox.height() > box_height && size > 1 {
        size -= 1;
        bbox = measure(font, size, text);
    }

    size
}

/// Load the font at `font_path` and fit `text` into the box.
///
/// If the font cannot be loaded this logs a warning and returns
/// [`FittedFont::fallback`] without measuring it; the result may overflow.
pub fn fit_font(text: &str, font_path: &Path, box_width: u32, box_height: u32) -> FittedFont {
    match load_font(font_path) {
        Ok(font) => {
            let size = fit_size(&font, text, box_width, box_height);
            debug!(
                "Fitted '{}' into {}x{} at size {}",
                text, box_width, box_height, size
            );
            FittedFont {
                font,
                size,
                source: FontSource::File(font_path.to_path_buf()),
            }
        }
        Err(e) => {
            warn!(
                "Warning: Could not load font '{}'. Using default. ({})",
                font_path.display(),
                e
            );
            FittedFont::fallback()
        }
    }
}
