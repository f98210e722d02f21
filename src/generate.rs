//! Content generators: summary, quiz, flashcards, study notes and chat.
//!
//! Each generator embeds a bounded prefix of the extracted text in a prompt,
//! makes one gateway call and post-processes the reply. The JSON generators
//! never fail: a backend error or unparsable reply is logged and replaced by
//! an empty value, so one bad generator costs the user one section of the
//! study pack rather than the whole request. The summary and chat calls
//! return their error so callers can pick the user-facing replacement.

use crate::error::LlmError;
use crate::output::{Flashcard, QuizQuestion, StudyNotes};
use crate::pipeline::postprocess::parse_model_json;
use crate::prompts;
use crate::provider::{ChatMessage, ProviderGateway};
use serde::de::DeserializeOwned;
use serde_json::Value;
use tracing::{debug, error, warn};

/// Characters of extracted text given to the summary generator.
pub const SUMMARY_INPUT_CHARS: usize = 20_000;
/// Characters of extracted text given to the quiz, flashcard and notes generators.
pub const GENERATOR_INPUT_CHARS: usize = 15_000;
/// Characters of caller-supplied context used by the chat endpoint.
pub const CHAT_CONTEXT_CHARS: usize = 20_000;
/// Characters of extracted text echoed back as `source_text`.
pub const SOURCE_TEXT_CHARS: usize = 25_000;

/// The first `max_chars` characters of `text`, never splitting a character.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_idx, _)) => &text[..byte_idx],
        None => text,
    }
}

/// Prose summary, returned exactly as the model wrote it.
pub async fn generate_summary(gateway: &ProviderGateway, text: &str) -> Result<String, LlmError> {
    let messages = [
        ChatMessage::system(prompts::SUMMARY_SYSTEM_PROMPT),
        ChatMessage::user(truncate_chars(text, SUMMARY_INPUT_CHARS)),
    ];
    gateway.chat(&messages, 0.3).await
}

/// `num_questions` multiple-choice questions at `difficulty`; empty on failure.
pub async fn generate_quiz(
    gateway: &ProviderGateway,
    text: &str,
    num_questions: u32,
    difficulty: &str,
) -> Vec<QuizQuestion> {
    let prompt = prompts::quiz_prompt(
        truncate_chars(text, GENERATOR_INPUT_CHARS),
        num_questions,
        difficulty,
    );
    let messages = [
        ChatMessage::system(prompts::QUIZ_SYSTEM_PROMPT),
        ChatMessage::user(prompt),
    ];
    let items = generate_json(gateway, &messages, 0.5, "Quiz")
        .await
        .unwrap_or_default();

    let mut quiz: Vec<QuizQuestion> = keep_valid_items(items, "Quiz");
    for (idx, question) in quiz.iter_mut().enumerate() {
        if question.id == 0 {
            question.id = idx as u32 + 1;
        }
    }
    quiz
}

/// Term/definition pairs; empty on failure.
pub async fn generate_flashcards(gateway: &ProviderGateway, text: &str) -> Vec<Flashcard> {
    let messages = [ChatMessage::user(prompts::flashcards_prompt(truncate_chars(
        text,
        GENERATOR_INPUT_CHARS,
    )))];
    let items = generate_json(gateway, &messages, 0.3, "Flashcard")
        .await
        .unwrap_or_default();
    keep_valid_items(items, "Flashcard")
}

/// Key concepts, formulas and dated events; all empty on failure.
pub async fn generate_notes(gateway: &ProviderGateway, text: &str) -> StudyNotes {
    let messages = [ChatMessage::user(prompts::notes_prompt(truncate_chars(
        text,
        GENERATOR_INPUT_CHARS,
    )))];
    generate_json(gateway, &messages, 0.3, "Notes")
        .await
        .unwrap_or_default()
}

/// Answer `question` strictly from `context`.
pub async fn answer_question(
    gateway: &ProviderGateway,
    question: &str,
    context: &str,
) -> Result<String, LlmError> {
    let messages = [
        ChatMessage::system(prompts::CHAT_SYSTEM_PROMPT),
        ChatMessage::user(prompts::chat_prompt(
            truncate_chars(context, CHAT_CONTEXT_CHARS),
            question,
        )),
    ];
    gateway.chat(&messages, 0.3).await
}

/// One gateway call whose reply should be JSON of type `T`.
async fn generate_json<T: DeserializeOwned>(
    gateway: &ProviderGateway,
    messages: &[ChatMessage],
    temperature: f32,
    what: &str,
) -> Option<T> {
    let raw = match gateway.chat(messages, temperature).await {
        Ok(raw) => raw,
        Err(e) => {
            error!("{} generation failed: {}", what, e);
            return None;
        }
    };

    match parse_model_json(&raw) {
        Ok(value) => Some(value),
        Err(e) => {
            error!("{} generation failed: {}", what, e);
            debug!("{} raw reply: {:.200}", what, raw);
            None
        }
    }
}

/// Deserialize each array element on its own, dropping the malformed ones.
fn keep_valid_items<T: DeserializeOwned>(items: Vec<Value>, what: &str) -> Vec<T> {
    let total = items.len();
    let kept: Vec<T> = items
        .into_iter()
        .enumerate()
        .filter_map(|(idx, item)| match serde_json::from_value(item) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!("{} item {} dropped: {}", what, idx + 1, e);
                None
            }
        })
        .collect();

    if kept.len() < total {
        warn!("{}: kept {}/{} items", what, kept.len(), total);
    }
    kept
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::provider::gateway::tests::FakeBackend;
    use std::sync::atomic::Ordering;

    fn gateway_replying(reply: &str) -> (ProviderGateway, std::sync::Arc<FakeBackend>) {
        let backend = FakeBackend::ok("groq", reply);
        (
            ProviderGateway::new().with_backend(backend.clone(), None),
            backend,
        )
    }

    fn failing_gateway() -> ProviderGateway {
        ProviderGateway::new()
            .with_backend(FakeBackend::failing("groq"), None)
            .with_backend(FakeBackend::failing("nvidia"), Some(4096))
    }

    const QUIZ_JSON: &str = r#"[
        {
            "id": 1,
            "question": "What organelle produces ATP?",
            "options": ["Nucleus", "Mitochondria", "Ribosome", "Golgi"],
            "correct_answer": "Mitochondria",
            "explanation": "Mitochondria run cellular respiration."
        }
    ]"#;

    #[test]
    fn truncate_counts_chars_not_bytes() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("abc", 10), "abc");
        assert_eq!(truncate_chars("", 3), "");
        assert_eq!(truncate_chars("abc", 0), "");
    }

    #[tokio::test]
    async fn summary_is_returned_verbatim() {
        let reply = "## Overview\n\nCells are the unit of life.  ";
        let (gw, _) = gateway_replying(reply);
        assert_eq!(generate_summary(&gw, "text").await.unwrap(), reply);
    }

    #[tokio::test]
    async fn summary_uses_twenty_thousand_char_prefix() {
        let (gw, backend) = gateway_replying("ok");
        let text = "a".repeat(SUMMARY_INPUT_CHARS + 500);
        generate_summary(&gw, &text).await.unwrap();

        let sent = backend.prompts.lock().unwrap();
        let user = sent[0][1].text();
        assert_eq!(user.chars().count(), SUMMARY_INPUT_CHARS);
    }

    #[tokio::test]
    async fn summary_failure_propagates() {
        assert!(generate_summary(&failing_gateway(), "text").await.is_err());
    }

    #[tokio::test]
    async fn fenced_quiz_parses_like_unfenced() {
        let (plain_gw, _) = gateway_replying(QUIZ_JSON);
        let fenced = format!("```json\n{QUIZ_JSON}\n```");
        let (fenced_gw, _) = gateway_replying(&fenced);

        let plain = generate_quiz(&plain_gw, "text", 1, "Easy").await;
        let wrapped = generate_quiz(&fenced_gw, "text", 1, "Easy").await;

        assert_eq!(plain.len(), 1);
        assert_eq!(plain, wrapped);
        assert_eq!(plain[0].correct_answer, "Mitochondria");
    }

    #[tokio::test]
    async fn malformed_quiz_item_does_not_discard_the_rest() {
        let reply = r#"[
            {"id": "1", "question": "Quoted id?", "options": ["a","b","c","d"], "correct_answer": "a"},
            {"id": 2, "question": "Broken", "options": "not a list", "correct_answer": "a"},
            {"id": 3, "question": "Fine?", "options": ["w","x","y","z"], "correct_answer": "z", "explanation": "z"}
        ]"#;
        let (gw, _) = gateway_replying(reply);

        let quiz = generate_quiz(&gw, "text", 3, "Medium").await;

        assert_eq!(quiz.len(), 2);
        assert_eq!(quiz[0].id, 1);
        assert_eq!(quiz[0].question, "Quoted id?");
        assert_eq!(quiz[1].id, 3);
        assert_eq!(quiz[1].correct_answer, "z");
    }

    #[tokio::test]
    async fn quiz_without_ids_is_numbered_in_order() {
        let reply = r#"[
            {"question": "First?", "options": ["a","b","c","d"], "correct_answer": "a"},
            {"question": "Second?", "options": ["a","b","c","d"], "correct_answer": "b"}
        ]"#;
        let (gw, _) = gateway_replying(reply);

        let ids: Vec<u32> = generate_quiz(&gw, "text", 2, "Easy")
            .await
            .iter()
            .map(|q| q.id)
            .collect();
        assert_eq!(ids, vec![1, 2]);
    }

    #[tokio::test]
    async fn quiz_prompt_carries_count_difficulty_and_temperature() {
        let (gw, backend) = gateway_replying("[]");
        generate_quiz(&gw, "Photosynthesis text", 8, "Hard").await;

        let sent = backend.prompts.lock().unwrap();
        assert_eq!(sent[0][0].text(), prompts::QUIZ_SYSTEM_PROMPT);
        let user = sent[0][1].text();
        assert!(user.contains("Generate 8 multiple-choice"));
        assert!(user.contains("Difficulty Level: Hard."));
        assert_eq!(backend.seen.lock().unwrap()[0].temperature, 0.5);
    }

    #[tokio::test]
    async fn quiz_garbage_or_failure_is_empty() {
        let (gw, _) = gateway_replying("Sure! Here are your questions: 1) ...");
        assert!(generate_quiz(&gw, "text", 5, "Medium").await.is_empty());
        assert!(generate_quiz(&failing_gateway(), "text", 5, "Medium")
            .await
            .is_empty());
    }

    #[tokio::test]
    async fn flashcards_parse_and_degrade() {
        let (gw, backend) = gateway_replying(
            "```json\n[{\"term\": \"Mitosis\", \"definition\": \"Cell division\"}]\n```",
        );
        let cards = generate_flashcards(&gw, "text").await;
        assert_eq!(
            cards,
            vec![Flashcard {
                term: "Mitosis".into(),
                definition: "Cell division".into()
            }]
        );
        assert_eq!(backend.calls.load(Ordering::SeqCst), 1);

        let (gw, _) = gateway_replying("{\"term\": \"not an array\"}");
        assert!(generate_flashcards(&gw, "text").await.is_empty());

        let (gw, _) = gateway_replying(
            r#"[{"term": "Osmosis"}, {"term": "Diffusion", "definition": "Net movement of particles"}]"#,
        );
        let cards = generate_flashcards(&gw, "text").await;
        assert_eq!(cards.len(), 1);
        assert_eq!(cards[0].term, "Diffusion");
    }

    #[tokio::test]
    async fn notes_parse_and_degrade() {
        let (gw, _) = gateway_replying(
            r#"{"key_concepts": ["Entropy"], "formulas": ["dS = dQ/T"], "dates_events": ["1824: Carnot"]}"#,
        );
        let notes = generate_notes(&gw, "text").await;
        assert_eq!(notes.key_concepts, vec!["Entropy"]);
        assert_eq!(notes.formulas, vec!["dS = dQ/T"]);
        assert_eq!(notes.dates_events, vec!["1824: Carnot"]);

        let notes = generate_notes(&failing_gateway(), "text").await;
        assert_eq!(notes, StudyNotes::default());
    }

    #[tokio::test]
    async fn generators_use_fifteen_thousand_char_prefix() {
        let text = "§".repeat(GENERATOR_INPUT_CHARS * 2);
        let (gw, backend) = gateway_replying("{}");
        generate_notes(&gw, &text).await;

        let sent = backend.prompts.lock().unwrap();
        let user = sent[0][0].text();
        let run = user.chars().filter(|c| *c == '§').count();
        assert_eq!(run, GENERATOR_INPUT_CHARS);
    }

    #[tokio::test]
    async fn chat_truncates_context_and_keeps_question() {
        let (gw, backend) = gateway_replying("42");
        let context = "¤".repeat(CHAT_CONTEXT_CHARS + 10);
        let answer = answer_question(&gw, "What is the answer?", &context)
            .await
            .unwrap();
        assert_eq!(answer, "42");

        let sent = backend.prompts.lock().unwrap();
        assert_eq!(sent[0][0].text(), prompts::CHAT_SYSTEM_PROMPT);
        let user = sent[0][1].text();
        assert_eq!(user.chars().filter(|c| *c == '¤').count(), CHAT_CONTEXT_CHARS);
        assert!(user.contains("User Question: What is the answer?"));
    }
}
