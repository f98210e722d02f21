//! PDF to plain text: vision extraction first, text layer as the fallback.
//!
//! ```text
//! PDF ─┬─ render (pdfium) ─ encode (JPEG) ─ OCR every page (primary backend)
//!      │                                          │
//!      │                    any failure ──────────┤
//!      │                                          ▼
//!      └──────────────────────────────── text layer (pdf-extract)
//! ```
//!
//! Vision failures are logged and absorbed here. Only a failure of the text
//! layer itself reaches the caller.

use crate::config::AppConfig;
use crate::error::{LlmError, QuizCraftError};
use crate::pipeline::text_layer::{self, PAGE_SEPARATOR};
use crate::pipeline::{encode, ocr, render};
use crate::provider::{ImageData, ProviderGateway};
use std::path::Path;
use std::time::Instant;
use tracing::{info, warn};

/// Extract the text of the PDF at `pdf_path`.
pub async fn extract_text(
    pdf_path: &Path,
    gateway: &ProviderGateway,
    config: &AppConfig,
) -> Result<String, QuizCraftError> {
    info!("Attempting vision extraction: {}", pdf_path.display());

    match vision_extract(pdf_path, gateway, config).await {
        Ok(text) => {
            info!("Vision extraction successful");
            Ok(text)
        }
        Err(e) => {
            warn!("Vision extraction failed ({}), falling back to text layer", e);
            text_layer::extract_text_layer(pdf_path).await
        }
    }
}

/// Render, encode and OCR every page, joining the page texts in order.
pub async fn vision_extract(
    pdf_path: &Path,
    gateway: &ProviderGateway,
    config: &AppConfig,
) -> Result<String, QuizCraftError> {
    let backend = gateway.primary().ok_or(LlmError::NoBackends)?;

    let start = Instant::now();
    let rendered = render::render_pages(pdf_path, config).await?;

    let images = rendered
        .iter()
        .enumerate()
        .map(|(idx, img)| {
            encode::encode_page(img).map_err(|e| QuizCraftError::RenderFailed {
                page: idx + 1,
                detail: format!("Image encoding failed: {}", e),
            })
        })
        .collect::<Result<Vec<ImageData>, _>>()?;
    drop(rendered);

    let pages = ocr::ocr_pages(backend.as_ref(), &images, config).await?;
    info!("OCR'd {} pages in {:?}", pages.len(), start.elapsed());

    Ok(pages.join(PAGE_SEPARATOR))
}
