//! PDF rasterisation: render one page at a time to an `RgbImage` via pdfium.
//!
//! The document handle is owned by [`PageRasterizer`]. It is opened once per
//! run and closed when the rasterizer is dropped, which also happens when a
//! later page fails and the error propagates out of the run loop.
//!
//! Pages are rendered on demand rather than all up front: at 1200 DPI a
//! single Letter page is ~10 200 × 13 200 px (≈400 MB as RGBA), so holding
//! more than one at a time is not an option.

use crate::config::TranslationConfig;
use crate::error::TranslateError;
use image::RgbImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// PDF user space is 72 points per inch.
const POINTS_PER_INCH: f32 = 72.0;

/// Bind to a pdfium library.
///
/// Resolution order: `config.pdfium_library`, then `PDFIUM_LIB_PATH`, then the
/// platform library name in the working directory, then the system library.
pub fn bind_pdfium(config: &TranslationConfig) -> Result<Pdfium, TranslateError> {
    let explicit = config
        .pdfium_library
        .clone()
        .or_else(|| std::env::var_os("PDFIUM_LIB_PATH").map(PathBuf::from));

    let bindings = match explicit {
        Some(path) => Pdfium::bind_to_library(&path).map_err(|e| {
            TranslateError::PdfiumBindingFailed(format!("{}: {:?}", path.display(), e))
        })?,
        None => Pdfium::bind_to_library(Pdfium::pdfium_platform_library_name_at_path("./"))
            .or_else(|_| Pdfium::bind_to_system_library())
            .map_err(|e| TranslateError::PdfiumBindingFailed(format!("{:?}", e)))?,
    };

    Ok(Pdfium::new(bindings))
}

/// Density in pixels per PDF point.
pub fn scale_for_dpi(dpi: u32) -> f32 {
    dpi as f32 / POINTS_PER_INCH
}

/// An open document plus the render settings for its pages.
///
/// Dropping the rasterizer closes the document.
pub struct PageRasterizer<'a> {
    document: PdfDocument<'a>,
    path: PathBuf,
    render_config: PdfRenderConfig,
}

impl<'a> PageRasterizer<'a> {
    /// Open `pdf_path` and prepare to render its pages at `config.dpi`.
    pub fn open(
        pdfium: &'a Pdfium,
        pdf_path: &Path,
        config: &'a TranslationConfig,
    ) -> Result<Self, TranslateError> {
        let password = config.password.as_deref();
        let document = pdfium.load_pdf_from_file(pdf_path, password).map_err(|e| {
            let err_str = format!("{:?}", e);
            if err_str.contains("Password") || err_str.contains("password") {
                if password.is_some() {
                    TranslateError::WrongPassword {
                        path: pdf_path.to_path_buf(),
                    }
                } else {
                    TranslateError::PasswordRequired {
                        path: pdf_path.to_path_buf(),
                    }
                }
            } else {
                TranslateError::CorruptPdf {
                    path: pdf_path.to_path_buf(),
                    detail: err_str,
                }
            }
        })?;

        let mut render_config = PdfRenderConfig::new().scale_page_by_factor(scale_for_dpi(config.dpi));
        if let Some(max_pixels) = config.max_rendered_pixels {
            render_config = render_config
                .set_maximum_width(max_pixels as i32)
                .set_maximum_height(max_pixels as i32);
        }

        info!("Opened '{}' ({} DPI)", pdf_path.display(), config.dpi);

        Ok(Self {
            document,
            path: pdf_path.to_path_buf(),
            render_config,
        })
    }

    /// Number of pages in the document.
    pub fn page_count(&self) -> usize {
        self.document.pages().len() as usize
    }

    /// Render the page at 0-based `index` to an 8-bit RGB buffer.
    pub fn render_page(&self, index: usize) -> Result<RgbImage, TranslateError> {
        let total = self.page_count();
        if index >= total {
            return Err(TranslateError::PageOutOfRange {
                page: index + 1,
                total,
            });
        }

        let page = self
            .document
            .pages()
            .get(index as u16)
            .map_err(|e| TranslateError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            })?;

        let bitmap = page.render_with_config(&self.render_config).map_err(|e| {
            TranslateError::RasterisationFailed {
                page: index + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image().into_rgb8();
        debug!(
            "Rendered page {} → {}x{} px",
            index + 1,
            image.width(),
            image.height()
        );

        Ok(image)
    }
}

impl Drop for PageRasterizer<'_> {
    fn drop(&mut self) {
        debug!("Closing '{}'", self.path.display());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scale_follows_dpi() {
        assert_eq!(scale_for_dpi(72), 1.0);
        assert_eq!(scale_for_dpi(144), 2.0);
        assert!((scale_for_dpi(1200) - 16.666_666).abs() < 1e-4);
    }

    #[test]
    fn letter_page_size_at_default_dpi() {
        // 8.5 × 11 in at 1200 DPI
        let w = (612.0 * scale_for_dpi(1200)).round() as u32;
        let h = (792.0 * scale_for_dpi(1200)).round() as u32;
        assert_eq!((w, h), (10_200, 13_200));
    }

    #[test]
    fn bind_fails_cleanly_on_bogus_library_path() {
        let config = TranslationConfig::builder()
            .pdfium_library("/definitely/not/libpdfium.so")
            .build()
            .unwrap();
        match bind_pdfium(&config) {
            Err(TranslateError::PdfiumBindingFailed(msg)) => {
                assert!(msg.contains("/definitely/not/libpdfium.so"))
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("binding to a missing library must fail"),
        }
    }

    /// Opens with the password borrowed from `config`; the returned
    /// rasterizer holds the document past this call.
    fn open_with<'a>(
        pdfium: &'a Pdfium,
        path: &Path,
        config: &'a TranslationConfig,
    ) -> Result<PageRasterizer<'a>, TranslateError> {
        PageRasterizer::open(pdfium, path, config)
    }

    #[test]
    fn open_keeps_document_with_borrowed_password() {
        if std::env::var("E2E_ENABLED").is_err() {
            println!("SKIP — set E2E_ENABLED=1 to run pdfium tests");
            return;
        }
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("broken.pdf");
        std::fs::write(&path, b"%PDF-1.7\ntruncated").unwrap();

        let config = TranslationConfig::builder()
            .password("s3cret")
            .build()
            .unwrap();
        let pdfium = bind_pdfium(&config).unwrap();
        match open_with(&pdfium, &path, &config) {
            Err(TranslateError::CorruptPdf { path: p, .. })
            | Err(TranslateError::WrongPassword { path: p }) => assert_eq!(p, path),
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("a truncated file must not open"),
        };
    }
}
