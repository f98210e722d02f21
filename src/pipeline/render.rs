//! PDF rasterisation: render every page to a `DynamicImage` via pdfium.
//!
//! pdfium is a C++ library loaded at runtime. It is bound either from an
//! explicit path (`PDFIUM_LIB_PATH`) or from the system library search path;
//! when neither works the caller gets [`QuizCraftError::PdfiumUnavailable`]
//! and switches to text-layer extraction. pdfium keeps thread-local state and
//! blocks on CPU, so all work runs inside `spawn_blocking`.
//!
//! The longest edge is capped at `max_rendered_pixels` regardless of the
//! physical page size, which keeps memory bounded for poster-sized pages.

use crate::config::AppConfig;
use crate::error::QuizCraftError;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Rasterise all pages of a PDF, in page order.
pub async fn render_pages(
    pdf_path: &Path,
    config: &AppConfig,
) -> Result<Vec<DynamicImage>, QuizCraftError> {
    let path = pdf_path.to_path_buf();
    let max_pixels = config.max_rendered_pixels;
    let lib_path = config.pdfium_lib_path.clone();

    tokio::task::spawn_blocking(move || render_pages_blocking(&path, max_pixels, lib_path.as_deref()))
        .await
        .map_err(|e| QuizCraftError::Internal(format!("Render task panicked: {}", e)))?
}

/// Bind to pdfium without panicking when the library is missing.
///
/// `Pdfium::default()` panics on a failed bind, which would take the request
/// down instead of letting extraction fall back.
pub fn bind_pdfium(lib_path: Option<&Path>) -> Result<Pdfium, QuizCraftError> {
    let bindings = match lib_path {
        Some(path) => Pdfium::bind_to_library(resolve_library_path(path)),
        None => Pdfium::bind_to_system_library(),
    }
    .map_err(|e| QuizCraftError::PdfiumUnavailable(format!("{:?}", e)))?;

    Ok(Pdfium::new(bindings))
}

/// Accept either the library file itself or the directory containing it.
fn resolve_library_path(path: &Path) -> PathBuf {
    if path.is_dir() {
        Pdfium::pdfium_platform_library_name_at_path(path)
    } else {
        path.to_path_buf()
    }
}

fn render_pages_blocking(
    pdf_path: &Path,
    max_pixels: u32,
    lib_path: Option<&Path>,
) -> Result<Vec<DynamicImage>, QuizCraftError> {
    let pdfium = bind_pdfium(lib_path)?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| QuizCraftError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    let total_pages = pages.len() as usize;
    info!("PDF loaded: {} pages", total_pages);

    if total_pages == 0 {
        return Err(QuizCraftError::RenderFailed {
            page: 0,
            detail: "document has no pages".to_string(),
        });
    }

    let render_config = PdfRenderConfig::new()
        .set_target_width(max_pixels as i32)
        .set_maximum_height(max_pixels as i32);

    let mut images = Vec::with_capacity(total_pages);
    for (idx, page) in pages.iter().enumerate() {
        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            QuizCraftError::RenderFailed {
                page: idx + 1,
                detail: format!("{:?}", e),
            }
        })?;

        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            idx + 1,
            image.width(),
            image.height()
        );
        images.push(image);
    }

    Ok(images)
}
