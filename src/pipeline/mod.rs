//! Pipeline stages for turning a PDF into plain text.
//!
//! ```text
//! input ──▶ render ──▶ encode ──▶ ocr            (vision extraction)
//!   │          ✗ (no pdfium, bad page, OCR error)
//!   └──────▶ text_layer                          (standard extraction)
//! ```
//!
//! 1. [`input`]: persist an upload to a temp file or validate a local path
//! 2. [`render`]: rasterise pages via pdfium inside `spawn_blocking`
//! 3. [`encode`]: JPEG-encode and base64-wrap each page image
//! 4. [`ocr`]: concurrent vision-model calls, results in page order
//! 5. [`text_layer`]: pdf-extract fallback, no network
//! 6. [`postprocess`]: fence stripping before JSON parsing of model output

pub mod encode;
pub mod input;
pub mod ocr;
pub mod postprocess;
pub mod render;
pub mod text_layer;
