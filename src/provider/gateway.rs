//! Ordered fallback across capability-equivalent chat backends.
//!
//! The gateway is a list of slots tried front to back: the first success
//! wins and the last error is returned when every slot fails. Each attempt is
//! made exactly once; there is no retry, backoff or circuit breaking here.
//! A slot may carry its own output cap, which is how the fallback backend
//! gets `max_tokens = 4096` while the primary runs uncapped.

use super::message::{ChatMessage, ChatOptions};
use super::openai::OpenAiCompatBackend;
use super::ChatBackend;
use crate::config::AppConfig;
use crate::error::{LlmError, QuizCraftError};
use std::sync::Arc;
use std::time::Duration;
use tracing::{error, info, warn};

struct BackendSlot {
    backend: Arc<dyn ChatBackend>,
    max_tokens: Option<u32>,
}

/// Front door for every text chat call in the service.
#[derive(Default)]
pub struct ProviderGateway {
    slots: Vec<BackendSlot>,
}

impl ProviderGateway {
    /// An empty gateway. Add backends with [`ProviderGateway::with_backend`].
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a backend to the end of the fallback order.
    pub fn with_backend(mut self, backend: Arc<dyn ChatBackend>, max_tokens: Option<u32>) -> Self {
        self.slots.push(BackendSlot { backend, max_tokens });
        self
    }

    /// Primary then fallback, both OpenAI-compatible, from `config`.
    pub fn from_config(config: &AppConfig) -> Result<Self, QuizCraftError> {
        let timeout = Duration::from_secs(config.request_timeout_secs);
        let primary = OpenAiCompatBackend::from_config(&config.primary, timeout)?;
        let fallback = OpenAiCompatBackend::from_config(&config.fallback, timeout)?;

        info!(
            "Gateway: {} ({}) → {} ({})",
            config.primary.name, config.primary.model, config.fallback.name, config.fallback.model
        );

        Ok(Self::new()
            .with_backend(Arc::new(primary), config.primary.max_tokens)
            .with_backend(Arc::new(fallback), config.fallback.max_tokens))
    }

    /// The first backend, used alone for page OCR.
    pub fn primary(&self) -> Option<&Arc<dyn ChatBackend>> {
        self.slots.first().map(|s| &s.backend)
    }

    /// Send `messages` to each backend in order until one answers.
    pub async fn chat(&self, messages: &[ChatMessage], temperature: f32) -> Result<String, LlmError> {
        let mut last_err: Option<LlmError> = None;

        for (idx, slot) in self.slots.iter().enumerate() {
            let options = ChatOptions {
                model: None,
                temperature,
                max_tokens: slot.max_tokens,
            };

            match slot.backend.chat(messages, &options).await {
                Ok(content) => return Ok(content),
                Err(e) => {
                    match self.slots.get(idx + 1) {
                        Some(next) => warn!(
                            "{} failed ({}), falling back to {}...",
                            slot.backend.name(),
                            e,
                            next.backend.name()
                        ),
                        None if idx > 0 => {
                            error!("{} also failed: {}", slot.backend.name(), e)
                        }
                        None => error!("{} failed: {}", slot.backend.name(), e),
                    }
                    last_err = Some(e);
                }
            }
        }

        Err(last_err.unwrap_or(LlmError::NoBackends))
    }
}
