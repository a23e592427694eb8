//! Deterministic scripted model used by workflow tests.

use async_trait::async_trait;
use serde_json::{json, Value};
use std::collections::VecDeque;
use std::sync::Mutex;
use tutor_model::{LanguageModel, ModelError, StructuredRequest};

/// Replays a fixed sequence of responses and records every request so
/// tests can assert on constructed prompts.
pub(crate) struct ScriptedModel {
    responses: Mutex<VecDeque<Result<Value, ModelError>>>,
    pub(crate) requests: Mutex<Vec<StructuredRequest>>,
}

impl ScriptedModel {
    pub(crate) fn new(responses: Vec<Result<Value, ModelError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            requests: Mutex::new(Vec::new()),
        }
    }

    pub(crate) fn prompts_for(&self, schema_name: &str) -> Vec<String> {
        self.requests
            .lock()
            .unwrap()
            .iter()
            .filter(|request| request.schema_name == schema_name)
            .map(|request| request.prompt.clone())
            .collect()
    }
}

#[async_trait]
impl LanguageModel for ScriptedModel {
    fn name(&self) -> &str {
        "scripted"
    }

    async fn generate_structured(&self, request: &StructuredRequest) -> Result<Value, ModelError> {
        self.requests.lock().unwrap().push(request.clone());
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ModelError::Upstream("script exhausted".to_string())))
    }
}

pub(crate) fn problem(text: &str, choices: [&str; 4], answer: &str) -> Result<Value, ModelError> {
    Ok(json!({
        "problem": text,
        "hints": ["read the problem twice"],
        "choices": choices,
        "answer": answer,
    }))
}

pub(crate) fn question_approved() -> Result<Value, ModelError> {
    Ok(json!({"self_contained": true, "rationale": "all data present"}))
}

pub(crate) fn question_rejected(reason: &str) -> Result<Value, ModelError> {
    Ok(json!({"self_contained": false, "rationale": reason}))
}

pub(crate) fn answers(verdicts: [bool; 4], work: Option<&str>) -> Result<Value, ModelError> {
    let mut value = json!({"verdicts": verdicts, "rationale": "solved step by step"});
    if let Some(work) = work {
        value["work"] = json!(work);
    }
    Ok(value)
}
