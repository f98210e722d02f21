//! Post-processing of model output that is supposed to be JSON.
//!
//! Even when told to return raw JSON, models often wrap it in
//! ` ```json ... ``` ` fences. Every fence marker is removed before parsing;
//! whatever is left either parses into the expected shape or the caller falls
//! back to an empty default.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::de::DeserializeOwned;

static RE_FENCE: Lazy<Regex> = Lazy::new(|| Regex::new(r"```(?i:json)?").unwrap());

/// Remove all markdown code-fence markers and surrounding whitespace.
pub fn strip_code_fences(input: &str) -> String {
    RE_FENCE.replace_all(input, "").trim().to_string()
}

/// Strip fences, then parse as `T`.
pub fn parse_model_json<T: DeserializeOwned>(raw: &str) -> Result<T, serde_json::Error> {
    serde_json::from_str(&strip_code_fences(raw))
}
