//! Vision OCR: send each rendered page to a vision model and collect text.
//!
//! All page calls are issued at once and awaited together with
//! `join_all`, which yields results positionally. Page 2 finishing before
//! page 1 therefore never reorders the document. There is no concurrency cap
//! beyond the page count, no retry and no fallback backend at this layer: the
//! first failed page fails the whole vision path and the caller switches to
//! the text layer.

use crate::config::AppConfig;
use crate::error::LlmError;
use crate::prompts::OCR_INSTRUCTION;
use crate::provider::{ChatBackend, ChatMessage, ChatOptions, ImageData};
use futures::future::join_all;
use std::time::Instant;
use tracing::{debug, warn};

/// Transcribe one page image.
pub async fn ocr_page(
    backend: &dyn ChatBackend,
    page_num: usize,
    image: &ImageData,
    config: &AppConfig,
) -> Result<String, LlmError> {
    let start = Instant::now();
    let messages = [ChatMessage::user_with_image(OCR_INSTRUCTION, image)];
    let options = ChatOptions {
        model: Some(config.vision_model.clone()),
        temperature: config.ocr_temperature,
        max_tokens: None,
    };

    match backend.chat(&messages, &options).await {
        Ok(text) => {
            debug!("Page {}: {} chars in {:?}", page_num, text.len(), start.elapsed());
            Ok(text)
        }
        Err(e) => {
            warn!("Page {}: OCR failed: {}", page_num, e);
            Err(e)
        }
    }
}

/// Transcribe every page concurrently, returning texts in page order.
pub async fn ocr_pages(
    backend: &dyn ChatBackend,
    images: &[ImageData],
    config: &AppConfig,
) -> Result<Vec<String>, LlmError> {
    let calls = images
        .iter()
        .enumerate()
        .map(|(idx, image)| ocr_page(backend, idx + 1, image, config));

    join_all(calls).await.into_iter().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use std::sync::Mutex;
    use std::time::Duration;

    /// Answers with the image payload after a per-page delay, recording the
    /// order in which calls complete.
    struct SlowFirstPage {
        finished: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatBackend for SlowFirstPage {
        fn name(&self) -> &str {
            "slow-first"
        }

        async fn chat(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<String, LlmError> {
            assert_eq!(options.model.as_deref(), Some("vision-test"));
            let url = messages[0].image_url().unwrap_or_default().to_string();
            let payload = url.rsplit(',').next().unwrap_or_default().to_string();

            let delay = if payload == "page-1" { 80 } else { 5 };
            tokio::time::sleep(Duration::from_millis(delay)).await;

            self.finished.lock().unwrap().push(payload.clone());
            Ok(format!("text of {payload}"))
        }
    }

    struct FailsOnPage(&'static str);

    #[async_trait]
    impl ChatBackend for FailsOnPage {
        fn name(&self) -> &str {
            "flaky"
        }

        async fn chat(&self, messages: &[ChatMessage], _options: &ChatOptions) -> Result<String, LlmError> {
            let url = messages[0].image_url().unwrap_or_default();
            if url.ends_with(self.0) {
                Err(LlmError::EmptyResponse {
                    backend: "flaky".into(),
                })
            } else {
                Ok("fine".into())
            }
        }
    }

    fn config() -> AppConfig {
        AppConfig::builder().vision_model("vision-test").build().unwrap()
    }

    fn pages(n: usize) -> Vec<ImageData> {
        (1..=n)
            .map(|i| ImageData::new(format!("page-{i}"), "image/jpeg"))
            .collect()
    }

    #[tokio::test]
    async fn results_keep_page_order_when_later_page_finishes_first() {
        let backend = SlowFirstPage {
            finished: Mutex::new(Vec::new()),
        };

        let texts = ocr_pages(&backend, &pages(2), &config()).await.unwrap();

        assert_eq!(
            *backend.finished.lock().unwrap(),
            vec!["page-2".to_string(), "page-1".to_string()],
            "page 2 should have completed first"
        );
        assert_eq!(texts, vec!["text of page-1", "text of page-2"]);
    }

    #[tokio::test]
    async fn any_failed_page_fails_the_batch() {
        let backend = FailsOnPage("page-3");
        let err = ocr_pages(&backend, &pages(4), &config()).await.unwrap_err();
        assert!(matches!(err, LlmError::EmptyResponse { .. }));
    }

    #[tokio::test]
    async fn sends_instruction_with_each_image() {
        struct Inspect;

        #[async_trait]
        impl ChatBackend for Inspect {
            fn name(&self) -> &str {
                "inspect"
            }

            async fn chat(&self, messages: &[ChatMessage], options: &ChatOptions) -> Result<String, LlmError> {
                assert_eq!(messages.len(), 1);
                assert_eq!(messages[0].text(), OCR_INSTRUCTION);
                assert!((options.temperature - 0.1).abs() < f32::EPSILON);
                Ok(String::new())
            }
        }

        let texts = ocr_pages(&Inspect, &pages(1), &config()).await.unwrap();
        assert_eq!(texts, vec![String::new()]);
    }
}
