//! Request handlers for the QuizCraft API.

use axum::{
    extract::{multipart::MultipartRejection, rejection::JsonRejection, Multipart, State},
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use serde_json::json;
use tracing::{debug, error, info};

use super::AppState;
use crate::error::QuizCraftError;
use crate::generate::answer_question;
use crate::output::StudyPack;
use crate::pipeline::input::persist_upload;
use crate::prompts::{CHAT_APOLOGY, EXPLANATION_PREGENERATED};
use crate::study::{self, build_study_pack};

/// Liveness probe.
pub async fn index() -> impl IntoResponse {
    Json(json!({
        "status": "ok",
        "message": "QuizCraft API is running",
    }))
}

/// Fields of the upload form. Unknown fields are ignored.
#[derive(Default)]
struct UploadForm {
    pdf: Option<Vec<u8>>,
    num_questions: Option<String>,
    difficulty: Option<String>,
}

async fn read_upload_form(mut multipart: Multipart) -> Result<UploadForm, QuizCraftError> {
    let mut form = UploadForm::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| QuizCraftError::InvalidUpload(e.to_string()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "pdf" => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| QuizCraftError::InvalidUpload(e.to_string()))?;
                form.pdf = Some(bytes.to_vec());
            }
            "num_questions" | "difficulty" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| QuizCraftError::InvalidUpload(e.to_string()))?;
                if name == "num_questions" {
                    form.num_questions = Some(value);
                } else {
                    form.difficulty = Some(value);
                }
            }
            other => debug!("Ignoring form field '{}'", other),
        }
    }

    Ok(form)
}

/// Upload a PDF and get back summary, quiz, flashcards and notes.
pub async fn upload(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<StudyPack>, QuizCraftError> {
    let multipart = multipart.map_err(|e| QuizCraftError::InvalidUpload(e.body_text()))?;
    let form = read_upload_form(multipart).await?;
    let pdf = form.pdf.ok_or(QuizCraftError::MissingUpload)?;

    let num_questions = study::parse_num_questions(form.num_questions.as_deref());
    let difficulty = study::normalize_difficulty(form.difficulty.as_deref());
    info!(
        "Upload received: {} bytes, {} questions, difficulty {}",
        pdf.len(),
        num_questions,
        difficulty
    );

    // Dropping the guard deletes the file on every path out of this handler.
    let upload = persist_upload(pdf, state.config.temp_dir.clone()).await?;

    let pack = build_study_pack(
        upload.path(),
        num_questions,
        &difficulty,
        state.gateway.clone(),
        &state.config,
    )
    .await?;

    Ok(Json(pack))
}

/// Retired endpoint; explanations now ship inside each quiz question.
pub async fn explain() -> impl IntoResponse {
    Json(json!({ "explanation": EXPLANATION_PREGENERATED }))
}

/// Chat request body. `message` is the older name for `question`; any field
/// may be absent or null.
#[derive(Debug, Deserialize)]
pub struct ChatRequest {
    pub question: Option<String>,
    pub message: Option<String>,
    pub context: Option<String>,
}

impl ChatRequest {
    fn question(&self) -> &str {
        [&self.question, &self.message]
            .into_iter()
            .filter_map(|q| q.as_deref().map(str::trim))
            .find(|q| !q.is_empty())
            .unwrap_or_default()
    }

    fn context(&self) -> &str {
        self.context.as_deref().unwrap_or_default()
    }
}

/// Answer a question about previously extracted text.
pub async fn chat(
    State(state): State<AppState>,
    body: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<serde_json::Value>, QuizCraftError> {
    let Json(request) = body.map_err(|e| QuizCraftError::InvalidRequest(e.body_text()))?;

    let question = request.question();
    if question.is_empty() {
        return Err(QuizCraftError::MissingQuestion);
    }

    let answer = match answer_question(&state.gateway, question, request.context()).await {
        Ok(answer) => answer,
        Err(e) => {
            error!("Chat error: {}", e);
            CHAT_APOLOGY.to_string()
        }
    };

    Ok(Json(json!({ "answer": answer })))
}
