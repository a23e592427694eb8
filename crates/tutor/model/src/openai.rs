//! OpenAI chat-completions adapter.
//!
//! The transport is pluggable so tests can script raw completions
//! without a network; the default transport is a reqwest client posting
//! to the chat-completions endpoint with a `json_schema` response
//! format.

use crate::{parse_structured_text, truncate, LanguageModel, ModelError, StructuredRequest};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gpt-4o";
pub const AUTH_ENV_VAR: &str = "OPENAI_API_KEY";
const DEFAULT_ENDPOINT: &str = "https://api.openai.com/v1/chat/completions";
const DEFAULT_TEMPERATURE: f64 = 0.0;
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Provider configuration.
#[derive(Debug, Clone)]
pub struct OpenAiConfig {
    pub model: String,
    pub endpoint: Option<String>,
    pub api_key: Option<String>,
    pub temperature: f64,
    pub timeout_secs: u64,
}

impl Default for OpenAiConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            endpoint: None,
            api_key: std::env::var(AUTH_ENV_VAR).ok(),
            temperature: DEFAULT_TEMPERATURE,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Raw completion transport.
#[async_trait]
pub trait ChatTransport: Send + Sync {
    async fn complete(&self, payload: &Value, config: &OpenAiConfig)
        -> Result<String, ModelError>;
}

#[derive(Debug, Deserialize)]
struct ChatMessage {
    content: Value,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// reqwest-backed transport.
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    pub fn new(timeout_secs: u64) -> Result<Self, ModelError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .no_proxy()
            .build()
            .map_err(|e| ModelError::Upstream(format!("failed to build HTTP client: {}", e)))?;
        Ok(Self { client })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn complete(
        &self,
        payload: &Value,
        config: &OpenAiConfig,
    ) -> Result<String, ModelError> {
        let api_key = config
            .api_key
            .as_deref()
            .ok_or_else(|| ModelError::Upstream(format!("missing {}", AUTH_ENV_VAR)))?;
        let endpoint = config.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT);

        let response = self
            .client
            .post(endpoint)
            .bearer_auth(api_key)
            .json(payload)
            .send()
            .await
            .map_err(|e| ModelError::Upstream(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(ModelError::Upstream(format!(
                "openai error {}: {}",
                status,
                truncate(&body, 320)
            )));
        }

        let body: ChatResponse = response
            .json()
            .await
            .map_err(|e| ModelError::Upstream(format!("invalid openai response: {}", e)))?;

        let choice = body
            .choices
            .first()
            .ok_or_else(|| ModelError::Upstream("response did not include choices".to_string()))?;

        Ok(extract_text(&choice.message.content))
    }
}

/// OpenAI-backed [`LanguageModel`].
pub struct OpenAiModel {
    config: OpenAiConfig,
    transport: Arc<dyn ChatTransport>,
}

impl OpenAiModel {
    pub fn new(config: OpenAiConfig) -> Result<Self, ModelError> {
        let transport = Arc::new(HttpTransport::new(config.timeout_secs)?);
        Ok(Self::with_transport(config, transport))
    }

    pub fn with_transport(config: OpenAiConfig, transport: Arc<dyn ChatTransport>) -> Self {
        Self { config, transport }
    }

    fn build_payload(&self, request: &StructuredRequest) -> Value {
        let mut messages = Vec::new();
        if let Some(system_prompt) = request.system_prompt.as_deref() {
            if !system_prompt.trim().is_empty() {
                messages.push(json!({"role": "system", "content": system_prompt}));
            }
        }
        messages.push(json!({"role": "user", "content": request.prompt}));

        json!({
            "model": self.config.model,
            "temperature": self.config.temperature,
            "messages": messages,
            "response_format": {
                "type": "json_schema",
                "json_schema": {
                    "name": request.schema_name,
                    "schema": request.schema,
                    "strict": true,
                },
            },
        })
    }
}

#[async_trait]
impl LanguageModel for OpenAiModel {
    fn name(&self) -> &str {
        &self.config.model
    }

    async fn generate_structured(&self, request: &StructuredRequest) -> Result<Value, ModelError> {
        let payload = self.build_payload(request);
        tracing::debug!(schema = %request.schema_name, model = %self.config.model, "structured completion");
        let raw = self.transport.complete(&payload, &self.config).await?;
        parse_structured_text(&request.schema_name, &raw)
    }
}

fn extract_text(content: &Value) -> String {
    match content {
        Value::String(text) => text.clone(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(|part| part.get("text").and_then(Value::as_str))
            .collect::<Vec<_>>()
            .join("\n"),
        _ => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct ScriptedTransport {
        raw: String,
        captured: std::sync::Mutex<Option<Value>>,
    }

    #[async_trait]
    impl ChatTransport for ScriptedTransport {
        async fn complete(
            &self,
            payload: &Value,
            _config: &OpenAiConfig,
        ) -> Result<String, ModelError> {
            *self.captured.lock().unwrap() = Some(payload.clone());
            Ok(self.raw.clone())
        }
    }

    fn model_with(raw: &str) -> (OpenAiModel, Arc<ScriptedTransport>) {
        let transport = Arc::new(ScriptedTransport {
            raw: raw.to_string(),
            captured: std::sync::Mutex::new(None),
        });
        let model = OpenAiModel::with_transport(OpenAiConfig::default(), transport.clone());
        (model, transport)
    }

    #[tokio::test]
    async fn payload_carries_schema_and_system_prompt() {
        let (model, transport) = model_with(r#"{"ok": true}"#);
        let request = StructuredRequest::new(
            "math_problem",
            json!({"type": "object"}),
            "generate a problem",
        )
        .with_system_prompt("You are a math teacher");

        let value = model.generate_structured(&request).await.unwrap();
        assert_eq!(value["ok"], true);

        let payload = transport.captured.lock().unwrap().clone().unwrap();
        assert_eq!(payload["response_format"]["json_schema"]["name"], "math_problem");
        assert_eq!(payload["messages"][0]["role"], "system");
        assert_eq!(payload["messages"][1]["content"], "generate a problem");
        assert_eq!(payload["temperature"], 0.0);
    }

    #[tokio::test]
    async fn prose_wrapped_completion_is_repaired() {
        let (model, _) = model_with(r#"Sure! {"answer": "B"}"#);
        let request = StructuredRequest::new("t", json!({}), "p");
        let value = model.generate_structured(&request).await.unwrap();
        assert_eq!(value["answer"], "B");
    }

    #[tokio::test]
    async fn garbage_completion_is_schema_mismatch() {
        let (model, _) = model_with("I cannot help with that");
        let request = StructuredRequest::new("t", json!({}), "p");
        let result = model.generate_structured(&request).await;
        assert!(matches!(result, Err(ModelError::SchemaMismatch { .. })));
    }
}
