//! Prompts and fixed user-facing strings.
//!
//! Every instruction sent to a model lives here so generators stay focused on
//! truncation, calling and parsing, and unit tests can inspect prompts
//! without a backend.

/// Instruction sent with every page image during vision extraction.
pub const OCR_INSTRUCTION: &str =
    "Extract all text from this page content verbatim. Preserve layout where possible.";

/// System prompt for the summary generator.
pub const SUMMARY_SYSTEM_PROMPT: &str = "You are an expert summarizer. Summarize the following text into structured, easy-to-read paragraphs. Keep it comprehensive but concise.";

/// System prompt for the quiz generator.
pub const QUIZ_SYSTEM_PROMPT: &str = "You are a quiz generator. Return ONLY valid JSON.";

/// System prompt for the chat endpoint.
pub const CHAT_SYSTEM_PROMPT: &str = "You are a helpful study assistant.";

/// Summary returned when the summary generator fails or times out.
pub const SUMMARY_UNAVAILABLE: &str = "Summary unavailable due to an error.";

/// Chat answer returned when every backend fails.
pub const CHAT_APOLOGY: &str = "Sorry, I could not process that question right now.";

/// Static body of the retired explain endpoint.
pub const EXPLANATION_PREGENERATED: &str = "Explanation now pre-generated in quiz data.";

/// Number of flashcards requested from the model.
pub const FLASHCARD_COUNT: usize = 10;

/// User prompt for the quiz generator.
pub fn quiz_prompt(text: &str, num_questions: u32, difficulty: &str) -> String {
    format!(
        r#"Generate {num_questions} multiple-choice questions based on the text below.
Difficulty Level: {difficulty}.

Return ONLY a raw JSON array. Do not wrap in markdown code blocks.
Format:
[
    {{
        "id": 1,
        "question": "Question text here?",
        "options": ["Option A", "Option B", "Option C", "Option D"],
        "correct_answer": "Option A",
        "explanation": "Brief explanation of why Option A is correct and why others might be wrong."
    }},
    ...
]

Text:
{text}"#
    )
}

/// User prompt for the flashcard generator.
pub fn flashcards_prompt(text: &str) -> String {
    format!(
        r#"Generate {FLASHCARD_COUNT} key flashcards from the text.
Return ONLY raw JSON. Format:
[
    {{"term": "Mitochondria", "definition": "Powerhouse of the cell..."}},
    ...
]

Text: {text}"#
    )
}

/// User prompt for the study-notes generator.
pub fn notes_prompt(text: &str) -> String {
    format!(
        r#"Create a structured cheat sheet from the text.
Return ONLY raw JSON. Format:
{{
    "key_concepts": ["Concept 1", "Concept 2"],
    "formulas": ["E=mc^2", "a^2+b^2=c^2"],
    "dates_events": ["1945: WWII End"]
}}

Text: {text}"#
    )
}

/// User prompt for the chat endpoint. The model is told to stay inside
/// `context`.
pub fn chat_prompt(context: &str, question: &str) -> String {
    format!(
        r#"Context from PDF:
{context}

User Question: {question}

Answer the question based strictly on the context above. Keep it concise and helpful."#
    )
}
