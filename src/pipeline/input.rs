//! Input handling: get the PDF onto the local file system.
//!
//! pdfium and pdf-extract both want a file path, so uploaded bytes are
//! written to a uniquely named `.pdf` file in the configured temp directory.
//! The returned `NamedTempFile` owns the file and removes it when dropped,
//! which covers success, generator failure, extraction failure and panics
//! alike. Local paths given on the command line are only validated.

use crate::error::QuizCraftError;
use std::io::{Read, Write};
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::debug;

/// Write an uploaded PDF to a fresh temp file and return its guard.
///
/// Uploads can be tens of megabytes, so the write runs on the blocking pool.
pub async fn persist_upload(
    bytes: Vec<u8>,
    dir: Option<PathBuf>,
) -> Result<NamedTempFile, QuizCraftError> {
    tokio::task::spawn_blocking(move || write_upload(&bytes, dir.as_deref()))
        .await
        .map_err(|e| QuizCraftError::Internal(format!("Upload write task panicked: {}", e)))?
}

fn write_upload(bytes: &[u8], dir: Option<&Path>) -> Result<NamedTempFile, QuizCraftError> {
    let mut builder = tempfile::Builder::new();
    builder.prefix("upload-").suffix(".pdf");

    let mut file = match dir {
        Some(dir) => builder.tempfile_in(dir),
        None => builder.tempfile(),
    }
    .map_err(QuizCraftError::TempFile)?;

    file.write_all(bytes).map_err(QuizCraftError::TempFile)?;
    file.flush().map_err(QuizCraftError::TempFile)?;

    debug!("Stored upload ({} bytes) at {}", bytes.len(), file.path().display());
    Ok(file)
}

/// Resolve a local file path, validating existence and PDF magic bytes.
pub fn resolve_local(path_str: &str) -> Result<PathBuf, QuizCraftError> {
    let path = PathBuf::from(path_str);

    let mut f = std::fs::File::open(&path).map_err(|_| QuizCraftError::FileNotFound {
        path: path.clone(),
    })?;

    let mut magic = [0u8; 4];
    if f.read_exact(&mut magic).is_ok() && &magic != b"%PDF" {
        return Err(QuizCraftError::NotAPdf { path, magic });
    }

    debug!("Resolved local PDF: {}", path.display());
    Ok(path)
}
