//! Study-pack orchestration: extract once, then fan out to four generators.
//!
//! Each generator runs as its own task and is awaited with its own bound.
//! A generator that errors, panics or overruns is replaced by its default;
//! the pack is always complete. A timed-out task is detached rather than
//! aborted, so its late reply is simply discarded.

use crate::config::AppConfig;
use crate::error::QuizCraftError;
use crate::extract::extract_text;
use crate::generate::{self, truncate_chars, SOURCE_TEXT_CHARS};
use crate::output::StudyPack;
use crate::prompts::SUMMARY_UNAVAILABLE;
use crate::provider::ProviderGateway;
use std::future::Future;
use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::time::timeout;
use tracing::{error, info};

pub const DEFAULT_NUM_QUESTIONS: u32 = 5;
pub const DEFAULT_DIFFICULTY: &str = "Medium";

/// Parse a form-supplied question count, falling back to the default for
/// anything that is not a positive integer.
pub fn parse_num_questions(raw: Option<&str>) -> u32 {
    raw.and_then(|s| s.trim().parse::<u32>().ok())
        .filter(|n| *n > 0)
        .unwrap_or(DEFAULT_NUM_QUESTIONS)
}

/// Blank or missing difficulty becomes `"Medium"`; other labels pass through.
pub fn normalize_difficulty(raw: Option<&str>) -> String {
    match raw.map(str::trim) {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => DEFAULT_DIFFICULTY.to_string(),
    }
}

/// Extract the PDF at `pdf_path` and build the full study pack from it.
pub async fn build_study_pack(
    pdf_path: &Path,
    num_questions: u32,
    difficulty: &str,
    gateway: Arc<ProviderGateway>,
    config: &AppConfig,
) -> Result<StudyPack, QuizCraftError> {
    let start = Instant::now();
    let text = extract_text(pdf_path, &gateway, config).await?;
    info!("Extracted {} chars, generating study material", text.chars().count());

    let bound = Duration::from_secs(config.generator_timeout_secs);
    let pack = generate_study_pack(text, num_questions, difficulty, gateway, bound).await;

    info!("Study pack ready in {:?}", start.elapsed());
    Ok(pack)
}

/// Run the four generators concurrently over already-extracted `text`.
pub async fn generate_study_pack(
    text: String,
    num_questions: u32,
    difficulty: &str,
    gateway: Arc<ProviderGateway>,
    bound: Duration,
) -> StudyPack {
    let text = Arc::new(text);

    let summary = {
        let (gw, text) = (gateway.clone(), text.clone());
        tokio::spawn(async move {
            match generate::generate_summary(&gw, &text).await {
                Ok(s) => s,
                Err(e) => {
                    error!("Summary generation failed: {}", e);
                    SUMMARY_UNAVAILABLE.to_string()
                }
            }
        })
    };
    let quiz = {
        let (gw, text) = (gateway.clone(), text.clone());
        let difficulty = difficulty.to_string();
        tokio::spawn(async move {
            generate::generate_quiz(&gw, &text, num_questions, &difficulty).await
        })
    };
    let flashcards = {
        let (gw, text) = (gateway.clone(), text.clone());
        tokio::spawn(async move { generate::generate_flashcards(&gw, &text).await })
    };
    let notes = {
        let (gw, text) = (gateway.clone(), text.clone());
        tokio::spawn(async move { generate::generate_notes(&gw, &text).await })
    };

    let summary = bounded("Summary", summary, bound)
        .await
        .unwrap_or_else(|| SUMMARY_UNAVAILABLE.to_string());
    let quiz = bounded("Quiz", quiz, bound).await.unwrap_or_default();
    let flashcards = bounded("Flashcard", flashcards, bound)
        .await
        .unwrap_or_default();
    let notes = bounded("Notes", notes, bound).await.unwrap_or_default();

    StudyPack {
        summary,
        quiz,
        flashcards,
        notes,
        source_text: truncate_chars(&text, SOURCE_TEXT_CHARS).to_string(),
    }
}

/// Await a generator task for at most `bound`. `None` on timeout or panic.
async fn bounded<T, F>(what: &str, task: F, bound: Duration) -> Option<T>
where
    F: Future<Output = Result<T, tokio::task::JoinError>>,
{
    match timeout(bound, task).await {
        Ok(Ok(value)) => Some(value),
        Ok(Err(e)) => {
            error!("{} task failed: {}", what, e);
            None
        }
        Err(_) => {
            error!("{} generation timed out after {:?}", what, bound);
            None
        }
    }
}
