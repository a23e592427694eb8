//! Language-model capability seam.
//!
//! The workflow only ever talks to [`LanguageModel`]: prompt and target
//! schema in, populated JSON value or typed failure out. Providers live
//! behind this trait so the orchestration logic is testable with
//! deterministic stubs.

pub mod math;
pub mod openai;

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use thiserror::Error;

pub use math::{MathTool, MathToolError};
pub use openai::{OpenAiConfig, OpenAiModel};

/// A prompt constrained to a named structured-output schema.
#[derive(Debug, Clone)]
pub struct StructuredRequest {
    /// Optional system instructions.
    pub system_prompt: Option<String>,
    /// User prompt, fully rendered.
    pub prompt: String,
    /// Provider-visible schema name.
    pub schema_name: String,
    /// JSON schema the response must conform to.
    pub schema: Value,
}

impl StructuredRequest {
    pub fn new(schema_name: impl Into<String>, schema: Value, prompt: impl Into<String>) -> Self {
        Self {
            system_prompt: None,
            prompt: prompt.into(),
            schema_name: schema_name.into(),
            schema,
        }
    }

    pub fn with_system_prompt(mut self, system_prompt: impl Into<String>) -> Self {
        self.system_prompt = Some(system_prompt.into());
        self
    }
}

/// Failures the capability can surface.
#[derive(Debug, Error)]
pub enum ModelError {
    /// Output did not conform to the requested schema. Never coerced
    /// into a default; callers decide whether to retry.
    #[error("model output did not conform to schema '{schema}': {detail}")]
    SchemaMismatch { schema: String, detail: String },

    /// Transport-level failure: unreachable endpoint, rate limit,
    /// timeout, non-2xx status.
    #[error("upstream model error: {0}")]
    Upstream(String),
}

impl ModelError {
    pub fn is_upstream(&self) -> bool {
        matches!(self, ModelError::Upstream(_))
    }
}

/// An opaque structured-generation capability.
#[async_trait]
pub trait LanguageModel: Send + Sync {
    /// Provider/model identifier, for logging.
    fn name(&self) -> &str;

    /// Produce an instance of the requested schema.
    async fn generate_structured(&self, request: &StructuredRequest) -> Result<Value, ModelError>;
}

/// Typed front door over [`LanguageModel::generate_structured`].
///
/// Deserialization failure is a [`ModelError::SchemaMismatch`]: the
/// provider claimed conformance but the payload does not match.
pub async fn generate<T: DeserializeOwned>(
    model: &dyn LanguageModel,
    request: &StructuredRequest,
) -> Result<T, ModelError> {
    let value = model.generate_structured(request).await?;
    serde_json::from_value(value).map_err(|e| ModelError::SchemaMismatch {
        schema: request.schema_name.clone(),
        detail: e.to_string(),
    })
}

/// Parse raw model text into a JSON value.
///
/// Strict parse first; if the model wrapped the payload in prose, a
/// deterministic first-object extraction pass is attempted before
/// giving up with `SchemaMismatch`.
pub fn parse_structured_text(schema_name: &str, raw: &str) -> Result<Value, ModelError> {
    if let Ok(value) = serde_json::from_str::<Value>(raw.trim()) {
        return Ok(value);
    }

    if let Some(extracted) = extract_first_json_object(raw) {
        if let Ok(value) = serde_json::from_str::<Value>(&extracted) {
            return Ok(value);
        }
    }

    Err(ModelError::SchemaMismatch {
        schema: schema_name.to_string(),
        detail: format!("response is not JSON: {}", truncate(raw, 160)),
    })
}

fn extract_first_json_object(raw: &str) -> Option<String> {
    let start = raw.find('{')?;
    let mut depth = 0i32;
    let mut end = None;

    for (idx, ch) in raw[start..].char_indices() {
        match ch {
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    end = Some(start + idx + 1);
                    break;
                }
            }
            _ => {}
        }
    }

    end.map(|end_idx| raw[start..end_idx].to_string())
}

pub(crate) fn truncate(value: &str, max_chars: usize) -> String {
    let mut chars = value.chars();
    let truncated: String = chars.by_ref().take(max_chars).collect();
    if chars.next().is_some() {
        format!("{}...", truncated)
    } else {
        truncated
    }
}
