//! Standard extraction: read the PDF's embedded text layer with `pdf-extract`.
//!
//! This is the fallback for environments without pdfium and for any vision
//! failure. It cannot see text in scanned pages, but it never talks to the
//! network. A page without a text layer contributes an empty string.

use crate::error::QuizCraftError;
use std::path::Path;
use tracing::{debug, info};

/// Separator placed between consecutive pages.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Read every page's text layer and join them in page order.
pub async fn extract_text_layer(pdf_path: &Path) -> Result<String, QuizCraftError> {
    let path = pdf_path.to_path_buf();

    let pages = tokio::task::spawn_blocking(move || {
        pdf_extract::extract_text_by_pages(&path).map_err(|e| QuizCraftError::TextExtraction {
            path: path.clone(),
            detail: e.to_string(),
        })
    })
    .await
    .map_err(|e| QuizCraftError::TextExtraction {
        path: pdf_path.to_path_buf(),
        detail: format!("text extraction panicked: {e}"),
    })??;

    info!("Text layer read: {} pages", pages.len());
    let text = join_page_texts(&pages);
    debug!("Text layer: {} chars", text.len());
    Ok(text)
}

/// Join page texts with blank lines and trim the whole result.
pub fn join_page_texts<S: AsRef<str>>(pages: &[S]) -> String {
    pages
        .iter()
        .map(AsRef::as_ref)
        .collect::<Vec<_>>()
        .join(PAGE_SEPARATOR)
        .trim()
        .to_string()
}
