//! Configuration for the backends, the extractor and the HTTP server.
//!
//! Everything tunable lives in [`AppConfig`], built via its
//! [`AppConfigBuilder`] or read from the environment with
//! [`AppConfig::from_env`]. The config is constructed once at startup and
//! shared read-only with every request through `Arc`.

use crate::error::QuizCraftError;
use std::fmt;
use std::path::PathBuf;

/// Default primary endpoint (Groq, OpenAI-compatible).
pub const DEFAULT_PRIMARY_BASE_URL: &str = "https://api.groq.com/openai/v1";
/// Default fallback endpoint (NVIDIA NIM, OpenAI-compatible).
pub const DEFAULT_FALLBACK_BASE_URL: &str = "https://integrate.api.nvidia.com/v1";
/// Default text model on the primary backend.
pub const DEFAULT_TEXT_MODEL: &str = "llama-3.3-70b-versatile";
/// Default vision model on the primary backend, used for page OCR.
pub const DEFAULT_VISION_MODEL: &str = "llama-3.2-11b-vision-preview";
/// Default text model on the fallback backend.
pub const DEFAULT_FALLBACK_MODEL: &str = "meta/llama-3.3-70b-instruct";

/// Connection settings for one OpenAI-compatible chat backend.
#[derive(Clone)]
pub struct BackendConfig {
    /// Short name used in logs and errors, e.g. "groq".
    pub name: String,
    /// Base URL; `/chat/completions` is appended.
    pub base_url: String,
    /// Bearer key. `None` is not rejected here; calls fail with
    /// [`crate::error::LlmError::NotConfigured`] instead.
    pub api_key: Option<String>,
    /// Environment variable the key is read from, for error messages.
    pub api_key_env: String,
    /// Model used for text chat.
    pub model: String,
    /// Output cap sent with every call through this backend.
    pub max_tokens: Option<u32>,
}

impl BackendConfig {
    /// Primary backend defaults, key read from `GROQ_API_KEY`.
    pub fn groq() -> Self {
        Self {
            name: "groq".to_string(),
            base_url: DEFAULT_PRIMARY_BASE_URL.to_string(),
            api_key: None,
            api_key_env: "GROQ_API_KEY".to_string(),
            model: DEFAULT_TEXT_MODEL.to_string(),
            max_tokens: None,
        }
    }

    /// Fallback backend defaults, key read from `NVIDIA_API_KEY`.
    pub fn nvidia() -> Self {
        Self {
            name: "nvidia".to_string(),
            base_url: DEFAULT_FALLBACK_BASE_URL.to_string(),
            api_key: None,
            api_key_env: "NVIDIA_API_KEY".to_string(),
            model: DEFAULT_FALLBACK_MODEL.to_string(),
            max_tokens: Some(4096),
        }
    }
}

impl fmt::Debug for BackendConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BackendConfig")
            .field("name", &self.name)
            .field("base_url", &self.base_url)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("max_tokens", &self.max_tokens)
            .finish()
    }
}

/// Configuration for the whole service.
///
/// # Example
/// ```rust
/// use quizcraft::AppConfig;
///
/// let config = AppConfig::builder()
///     .generator_timeout_secs(30)
///     .vision_model("llama-3.2-90b-vision-preview")
///     .build()
///     .unwrap();
/// assert_eq!(config.generator_timeout_secs, 30);
/// ```
#[derive(Debug, Clone)]
pub struct AppConfig {
    /// Tried first for every chat call and the only backend used for OCR.
    pub primary: BackendConfig,

    /// Tried once when the primary fails. Not used for OCR.
    pub fallback: BackendConfig,

    /// Vision model for page OCR on the primary backend.
    pub vision_model: String,

    /// Sampling temperature for page OCR. Default: 0.1.
    pub ocr_temperature: f32,

    /// Longest rendered page edge in pixels. Default: 2000.
    pub max_rendered_pixels: u32,

    /// Explicit libpdfium location. `None` searches the system library path.
    pub pdfium_lib_path: Option<PathBuf>,

    /// Where uploads are written. `None` uses the OS temp dir.
    pub temp_dir: Option<PathBuf>,

    /// Bound on each content generator in the upload flow. Default: 60.
    pub generator_timeout_secs: u64,

    /// HTTP timeout for a single backend request. Default: 120.
    pub request_timeout_secs: u64,

    /// Largest accepted request body in bytes. Default: 50 MiB.
    pub max_upload_bytes: usize,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            primary: BackendConfig::groq(),
            fallback: BackendConfig::nvidia(),
            vision_model: DEFAULT_VISION_MODEL.to_string(),
            ocr_temperature: 0.1,
            max_rendered_pixels: 2000,
            pdfium_lib_path: None,
            temp_dir: None,
            generator_timeout_secs: 60,
            request_timeout_secs: 120,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl AppConfig {
    /// Create a new builder starting from the defaults.
    pub fn builder() -> AppConfigBuilder {
        AppConfigBuilder {
            config: Self::default(),
        }
    }

    /// Read the configuration from process environment variables.
    ///
    /// Unset or unparsable variables keep their defaults. API keys are not
    /// validated.
    pub fn from_env() -> Result<Self, QuizCraftError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`AppConfig::from_env`] with an injectable lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, QuizCraftError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let mut b = Self::builder();

        if let Some(key) = get("GROQ_API_KEY") {
            b = b.primary_api_key(key);
        }
        if let Some(key) = get("NVIDIA_API_KEY") {
            b = b.fallback_api_key(key);
        }
        if let Some(url) = get("QUIZCRAFT_PRIMARY_BASE_URL") {
            b = b.primary_base_url(url);
        }
        if let Some(url) = get("QUIZCRAFT_FALLBACK_BASE_URL") {
            b = b.fallback_base_url(url);
        }
        if let Some(model) = get("QUIZCRAFT_TEXT_MODEL") {
            b = b.text_model(model);
        }
        if let Some(model) = get("QUIZCRAFT_VISION_MODEL") {
            b = b.vision_model(model);
        }
        if let Some(model) = get("QUIZCRAFT_FALLBACK_MODEL") {
            b = b.fallback_model(model);
        }
        if let Some(path) = get("PDFIUM_LIB_PATH") {
            b = b.pdfium_lib_path(path);
        }
        if let Some(dir) = get("QUIZCRAFT_TEMP_DIR") {
            b = b.temp_dir(dir);
        }
        if let Some(secs) = get("QUIZCRAFT_GENERATOR_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            b = b.generator_timeout_secs(secs);
        }
        if let Some(secs) = get("QUIZCRAFT_REQUEST_TIMEOUT_SECS").and_then(|v| v.parse().ok()) {
            b = b.request_timeout_secs(secs);
        }
        if let Some(bytes) = get("QUIZCRAFT_MAX_UPLOAD_BYTES").and_then(|v| v.parse().ok()) {
            b = b.max_upload_bytes(bytes);
        }
        if let Some(t) = get("QUIZCRAFT_OCR_TEMPERATURE").and_then(|v| v.parse().ok()) {
            b = b.ocr_temperature(t);
        }
        if let Some(px) = get("QUIZCRAFT_MAX_RENDERED_PIXELS").and_then(|v| v.parse().ok()) {
            b = b.max_rendered_pixels(px);
        }

        b.build()
    }
}

/// Builder for [`AppConfig`].
#[derive(Debug)]
pub struct AppConfigBuilder {
    config: AppConfig,
}

impl AppConfigBuilder {
    pub fn primary_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.primary.api_key = Some(key.into());
        self
    }

    pub fn fallback_api_key(mut self, key: impl Into<String>) -> Self {
        self.config.fallback.api_key = Some(key.into());
        self
    }

    pub fn primary_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.primary.base_url = url.into();
        self
    }

    pub fn fallback_base_url(mut self, url: impl Into<String>) -> Self {
        self.config.fallback.base_url = url.into();
        self
    }

    pub fn text_model(mut self, model: impl Into<String>) -> Self {
        self.config.primary.model = model.into();
        self
    }

    pub fn fallback_model(mut self, model: impl Into<String>) -> Self {
        self.config.fallback.model = model.into();
        self
    }

    pub fn vision_model(mut self, model: impl Into<String>) -> Self {
        self.config.vision_model = model.into();
        self
    }

    pub fn ocr_temperature(mut self, t: f32) -> Self {
        self.config.ocr_temperature = t.clamp(0.0, 2.0);
        self
    }

    pub fn max_rendered_pixels(mut self, px: u32) -> Self {
        self.config.max_rendered_pixels = px.max(100);
        self
    }

    pub fn pdfium_lib_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.pdfium_lib_path = Some(path.into());
        self
    }

    pub fn temp_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.temp_dir = Some(dir.into());
        self
    }

    pub fn generator_timeout_secs(mut self, secs: u64) -> Self {
        self.config.generator_timeout_secs = secs;
        self
    }

    pub fn request_timeout_secs(mut self, secs: u64) -> Self {
        self.config.request_timeout_secs = secs;
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<AppConfig, QuizCraftError> {
        let c = &self.config;
        for backend in [&c.primary, &c.fallback] {
            if !backend.base_url.starts_with("http://") && !backend.base_url.starts_with("https://") {
                return Err(QuizCraftError::InvalidConfig(format!(
                    "base URL for '{}' must be http(s), got '{}'",
                    backend.name, backend.base_url
                )));
            }
        }
        if c.generator_timeout_secs == 0 {
            return Err(QuizCraftError::InvalidConfig(
                "generator timeout must be at least 1 second".into(),
            ));
        }
        if c.request_timeout_secs == 0 {
            return Err(QuizCraftError::InvalidConfig(
                "request timeout must be at least 1 second".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    #[test]
    fn defaults_match_documented_values() {
        let c = AppConfig::default();
        assert_eq!(c.primary.base_url, DEFAULT_PRIMARY_BASE_URL);
        assert_eq!(c.fallback.base_url, DEFAULT_FALLBACK_BASE_URL);
        assert_eq!(c.primary.max_tokens, None);
        assert_eq!(c.fallback.max_tokens, Some(4096));
        assert_eq!(c.generator_timeout_secs, 60);
        assert!((c.ocr_temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn from_lookup_reads_keys_and_overrides() {
        let env: HashMap<&str, &str> = [
            ("GROQ_API_KEY", "gsk-test"),
            ("NVIDIA_API_KEY", "nv-test"),
            ("QUIZCRAFT_TEXT_MODEL", "llama-3.1-8b-instant"),
            ("QUIZCRAFT_GENERATOR_TIMEOUT_SECS", "15"),
            ("PDFIUM_LIB_PATH", "/opt/pdfium/lib/libpdfium.so"),
        ]
        .into_iter()
        .collect();

        let c = AppConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(c.primary.api_key.as_deref(), Some("gsk-test"));
        assert_eq!(c.fallback.api_key.as_deref(), Some("nv-test"));
        assert_eq!(c.primary.model, "llama-3.1-8b-instant");
        assert_eq!(c.generator_timeout_secs, 15);
        assert_eq!(
            c.pdfium_lib_path,
            Some(PathBuf::from("/opt/pdfium/lib/libpdfium.so"))
        );
    }

    #[test]
    fn from_lookup_reads_tuning_knobs() {
        let env: HashMap<&str, &str> = [
            ("QUIZCRAFT_REQUEST_TIMEOUT_SECS", "30"),
            ("QUIZCRAFT_MAX_UPLOAD_BYTES", "1048576"),
            ("QUIZCRAFT_OCR_TEMPERATURE", "0.4"),
            ("QUIZCRAFT_MAX_RENDERED_PIXELS", "1200"),
        ]
        .into_iter()
        .collect();

        let c = AppConfig::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(c.request_timeout_secs, 30);
        assert_eq!(c.max_upload_bytes, 1_048_576);
        assert!((c.ocr_temperature - 0.4).abs() < f32::EPSILON);
        assert_eq!(c.max_rendered_pixels, 1200);
    }

    #[test]
    fn unparsable_tuning_values_keep_defaults() {
        let c = AppConfig::from_lookup(|k| {
            (k == "QUIZCRAFT_MAX_UPLOAD_BYTES" || k == "QUIZCRAFT_OCR_TEMPERATURE")
                .then(|| "lots".to_string())
        })
        .unwrap();
        assert_eq!(c.max_upload_bytes, AppConfig::default().max_upload_bytes);
        assert!((c.ocr_temperature - 0.1).abs() < f32::EPSILON);
    }

    #[test]
    fn missing_keys_are_not_an_error() {
        let c = AppConfig::from_lookup(|_| None).unwrap();
        assert!(c.primary.api_key.is_none());
        assert!(c.fallback.api_key.is_none());
    }

    #[test]
    fn blank_values_are_ignored() {
        let c = AppConfig::from_lookup(|k| (k == "GROQ_API_KEY").then(|| "  ".to_string())).unwrap();
        assert!(c.primary.api_key.is_none());
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = AppConfig::builder()
            .primary_base_url("ftp://example.com")
            .build()
            .unwrap_err();
        assert!(matches!(err, QuizCraftError::InvalidConfig(_)));
    }

    #[test]
    fn rejects_zero_generator_timeout() {
        assert!(AppConfig::builder().generator_timeout_secs(0).build().is_err());
    }

    #[test]
    fn debug_redacts_keys() {
        let c = AppConfig::builder().primary_api_key("secret-key").build().unwrap();
        let dbg = format!("{:?}", c);
        assert!(!dbg.contains("secret-key"));
        assert!(dbg.contains("<redacted>"));
    }
}
