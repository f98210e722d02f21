//! Error types for the quizcraft library.
//!
//! Two distinct error types reflect two distinct failure modes:
//!
//! * [`QuizCraftError`]: **Fatal** for the request: the upload is missing,
//!   the temp file cannot be written, or the PDF cannot be read even by the
//!   text-layer fallback. Handlers turn it into a 4xx/5xx JSON response.
//!
//! * [`LlmError`]: **Non-fatal**: one backend call failed. The gateway moves
//!   on to the next backend, generators substitute an empty default, and the
//!   chat endpoint answers with a fixed apology. It only becomes fatal when
//!   it has nowhere left to go.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use std::path::PathBuf;
use thiserror::Error;

/// Fatal errors returned by the extraction and study pipeline.
#[derive(Debug, Error)]
pub enum QuizCraftError {
    // ── Client errors ─────────────────────────────────────────────────────
    /// The multipart form had no `pdf` field.
    #[error("No file uploaded")]
    MissingUpload,

    /// The request body could not be read as a multipart form.
    #[error("Invalid upload: {0}")]
    InvalidUpload(String),

    /// The chat body had no non-blank `question` or `message`.
    #[error("No question provided")]
    MissingQuestion,

    /// A JSON request body was malformed or had wrongly typed fields.
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file was not found at the given path.
    #[error("PDF file not found: '{path}'")]
    FileNotFound { path: PathBuf },

    /// The file exists and was read, but is not a PDF.
    #[error("File is not a valid PDF: '{path}' (first bytes: {magic:?})")]
    NotAPdf { path: PathBuf, magic: [u8; 4] },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// No pdfium library could be bound; page rendering is unavailable.
    #[error("Page rendering unavailable: {0}")]
    PdfiumUnavailable(String),

    /// pdfium could not open the document.
    #[error("PDF '{path}' is corrupt: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error for a specific page.
    #[error("Rendering failed for page {page}: {detail}")]
    RenderFailed { page: usize, detail: String },

    /// A page OCR call failed. Absorbed by the text-layer fallback.
    #[error("Vision OCR failed: {0}")]
    VisionOcr(#[from] LlmError),

    /// The text-layer fallback could not read the document.
    #[error("Could not extract text from '{path}': {detail}")]
    TextExtraction { path: PathBuf, detail: String },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Could not create or write the temporary upload file.
    #[error("Failed to store upload: {0}")]
    TempFile(#[source] std::io::Error),

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl QuizCraftError {
    /// HTTP status this error maps to when it escapes a handler.
    pub fn status_code(&self) -> StatusCode {
        match self {
            QuizCraftError::MissingUpload
            | QuizCraftError::InvalidUpload(_)
            | QuizCraftError::MissingQuestion
            | QuizCraftError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for QuizCraftError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        if status.is_server_error() {
            tracing::error!("Processing error: {}", self);
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

/// A non-fatal failure of a single chat-completion backend call.
#[derive(Debug, Error)]
pub enum LlmError {
    /// The backend has no API key.
    #[error("Backend '{backend}' is not configured: set {env_var}")]
    NotConfigured { backend: String, env_var: String },

    /// Transport-level failure (DNS, TLS, connection reset, timeout).
    #[error("Request to '{backend}' failed: {source}")]
    Http {
        backend: String,
        #[source]
        source: reqwest::Error,
    },

    /// HTTP 429 from the backend.
    #[error("Rate limit exceeded for backend '{backend}'")]
    RateLimited { backend: String },

    /// Any other non-2xx status.
    #[error("Backend '{backend}' returned {status}: {body}")]
    Api {
        backend: String,
        status: u16,
        body: String,
    },

    /// The response parsed but carried no message content.
    #[error("Backend '{backend}' returned no choices")]
    EmptyResponse { backend: String },

    /// The response body was not the expected JSON shape.
    #[error("Backend '{backend}' returned an unreadable response: {detail}")]
    InvalidResponse { backend: String, detail: String },

    /// The gateway was built without any backend.
    #[error("No chat backends configured")]
    NoBackends,
}
