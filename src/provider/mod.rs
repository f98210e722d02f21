//! Chat-completion providers and the fallback gateway in front of them.
//!
//! ```text
//! generators / chat ──▶ ProviderGateway ──▶ [primary, fallback, …]
//! page OCR          ──▶ gateway.primary() (no fallback)
//! ```
//!
//! 1. [`message`]: role-tagged messages in the OpenAI wire format
//! 2. [`openai`]: the `reqwest` client for OpenAI-compatible endpoints
//! 3. [`gateway`]: ordered fallback across backends

pub mod gateway;
pub mod message;
pub mod openai;

pub use gateway::ProviderGateway;
pub use message::{ChatMessage, ChatOptions, ChatRole, ImageData};
pub use openai::OpenAiCompatBackend;

use crate::error::LlmError;
use async_trait::async_trait;

/// One chat-completion service.
///
/// Implemented by [`OpenAiCompatBackend`] for real endpoints and by test
/// doubles elsewhere in the crate.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Short name for logs, e.g. "groq".
    fn name(&self) -> &str;

    /// Send `messages` and return the assistant's reply text.
    async fn chat(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<String, LlmError>;
}
