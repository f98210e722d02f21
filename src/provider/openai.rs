//! OpenAI-compatible chat-completions backend over `reqwest`.
//!
//! Groq and NVIDIA NIM both expose `POST {base}/chat/completions` with bearer
//! auth and the OpenAI request/response shapes, so one implementation covers
//! both slots of the gateway. No retry happens here: a failed call is
//! reported once and the gateway decides what to do next.

use super::message::{ChatMessage, ChatOptions};
use super::ChatBackend;
use crate::config::BackendConfig;
use crate::error::{LlmError, QuizCraftError};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};
use tracing::debug;

/// A chat backend reachable at an OpenAI-compatible endpoint.
pub struct OpenAiCompatBackend {
    name: String,
    endpoint: String,
    api_key: Option<String>,
    api_key_env: String,
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    choices: Option<Vec<CompletionChoice>>,
    error: Option<CompletionError>,
}

#[derive(Debug, Deserialize)]
struct CompletionChoice {
    message: ResponseMessage,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

#[derive(Debug, Deserialize)]
struct CompletionError {
    message: String,
}

impl OpenAiCompatBackend {
    /// Build a backend from its config with a per-request timeout.
    pub fn from_config(config: &BackendConfig, timeout: Duration) -> Result<Self, QuizCraftError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| QuizCraftError::Internal(format!("HTTP client: {e}")))?;

        Ok(Self {
            name: config.name.clone(),
            endpoint: format!("{}/chat/completions", config.base_url.trim_end_matches('/')),
            api_key: config.api_key.clone(),
            api_key_env: config.api_key_env.clone(),
            model: config.model.clone(),
            client,
        })
    }
}

#[async_trait]
impl ChatBackend for OpenAiCompatBackend {
    fn name(&self) -> &str {
        &self.name
    }

    async fn chat(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<String, LlmError> {
        let api_key = self.api_key.as_deref().ok_or_else(|| LlmError::NotConfigured {
            backend: self.name.clone(),
            env_var: self.api_key_env.clone(),
        })?;

        let request = CompletionRequest {
            model: options.model.as_deref().unwrap_or(&self.model),
            messages,
            temperature: options.temperature,
            max_tokens: options.max_tokens,
        };

        let start = Instant::now();
        let response = self
            .client
            .post(&self.endpoint)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|source| LlmError::Http {
                backend: self.name.clone(),
                source,
            })?;

        let status = response.status();
        let body = response.text().await.map_err(|source| LlmError::Http {
            backend: self.name.clone(),
            source,
        })?;

        if status.as_u16() == 429 {
            return Err(LlmError::RateLimited {
                backend: self.name.clone(),
            });
        }
        if !status.is_success() {
            return Err(LlmError::Api {
                backend: self.name.clone(),
                status: status.as_u16(),
                body,
            });
        }

        let content = parse_completion(&self.name, &body)?;
        debug!(
            "{}: {} chars from {} in {:?}",
            self.name,
            content.len(),
            request.model,
            start.elapsed()
        );
        Ok(content)
    }
}

/// Pull `choices[0].message.content` out of a 2xx response body.
fn parse_completion(backend: &str, body: &str) -> Result<String, LlmError> {
    let parsed: CompletionResponse =
        serde_json::from_str(body).map_err(|e| LlmError::InvalidResponse {
            backend: backend.to_string(),
            detail: e.to_string(),
        })?;

    if let Some(err) = parsed.error {
        return Err(LlmError::InvalidResponse {
            backend: backend.to_string(),
            detail: err.message,
        });
    }

    parsed
        .choices
        .and_then(|c| c.into_iter().next())
        .and_then(|c| c.message.content)
        .ok_or_else(|| LlmError::EmptyResponse {
            backend: backend.to_string(),
        })
}
