//! # quizcraft
//!
//! Turn a PDF into study material: a summary, a multiple-choice quiz,
//! flashcards and a cheat sheet, plus a chat endpoint that answers questions
//! from the document's text.
//!
//! ## Pipeline Overview
//!
//! ```text
//! PDF upload
//!  │
//!  ├─ 1. Persist   bytes to a temp file, removed when the request ends
//!  ├─ 2. Extract   vision OCR per page, or the embedded text layer
//!  ├─ 3. Generate  summary / quiz / flashcards / notes, concurrently,
//!  │               each bounded and defaulted on failure
//!  └─ 4. Respond   StudyPack JSON with a source_text prefix for chat
//! ```
//!
//! Every text generation call goes through a [`ProviderGateway`] that tries
//! Groq first and NVIDIA NIM second. Page OCR uses the primary backend only.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use quizcraft::{build_study_pack, AppConfig, ProviderGateway};
//! use std::path::Path;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Keys come from GROQ_API_KEY / NVIDIA_API_KEY
//!     let config = AppConfig::from_env()?;
//!     let gateway = Arc::new(ProviderGateway::from_config(&config)?);
//!     let pack = build_study_pack(Path::new("lecture.pdf"), 5, "Medium", gateway, &config).await?;
//!     println!("{}", pack.summary);
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the `quizcraft` binary (clap + anyhow + tracing-subscriber + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

pub mod config;
pub mod error;
pub mod extract;
pub mod generate;
pub mod output;
pub mod pipeline;
pub mod prompts;
pub mod provider;
pub mod server;
pub mod study;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{AppConfig, AppConfigBuilder, BackendConfig};
pub use error::{LlmError, QuizCraftError};
pub use extract::extract_text;
pub use output::{Flashcard, QuizQuestion, StudyNotes, StudyPack};
pub use provider::{ChatBackend, ProviderGateway};
pub use server::{create_router, serve, AppState};
pub use study::{build_study_pack, generate_study_pack};
