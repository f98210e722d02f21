//! Output types: the artifacts generated from one uploaded document.

use serde::{Deserialize, Deserializer, Serialize};

/// One multiple-choice question.
///
/// `correct_answer` is expected to equal one of `options` verbatim, but that
/// is a property of the model's output and is passed through unchecked.
/// An `id` that is missing or not a positive integer reads as 0; the quiz
/// generator renumbers those by position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizQuestion {
    #[serde(default, deserialize_with = "id_from_number_or_string")]
    pub id: u32,
    pub question: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default)]
    pub explanation: String,
}

/// Models sometimes quote the id (`"id": "1"`) or send null.
fn id_from_number_or_string<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawId {
        Number(u64),
        Text(String),
        Other(serde_json::Value),
    }

    Ok(match RawId::deserialize(deserializer)? {
        RawId::Number(n) => u32::try_from(n).unwrap_or(0),
        RawId::Text(s) => s.trim().parse().unwrap_or(0),
        RawId::Other(_) => 0,
    })
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Flashcard {
    pub term: String,
    pub definition: String,
}

/// A cheat sheet of the document. Missing lists deserialize as empty.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct StudyNotes {
    #[serde(default)]
    pub key_concepts: Vec<String>,
    #[serde(default)]
    pub formulas: Vec<String>,
    #[serde(default)]
    pub dates_events: Vec<String>,
}

/// Everything the upload endpoint returns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudyPack {
    pub summary: String,
    pub quiz: Vec<QuizQuestion>,
    pub flashcards: Vec<Flashcard>,
    pub notes: StudyNotes,
    /// Prefix of the extracted text, sent back by the client as chat context.
    pub source_text: String,
}
