//! Question generation handlers.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use tutor_types::FinalResult;
use tutor_workflow::WorkflowRequest;

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionRequest {
    pub grade: String,
    pub subject: String,
    #[serde(default)]
    pub prior_questions: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub struct GenerateQuestionParams {
    pub grade: String,
    pub subject: String,
}

fn validate(grade: &str, subject: &str) -> Result<(), ApiError> {
    if grade.trim().is_empty() {
        return Err(ApiError::Validation("grade must not be empty".to_string()));
    }
    if subject.trim().is_empty() {
        return Err(ApiError::Validation(
            "subject must not be empty".to_string(),
        ));
    }
    Ok(())
}

/// Generate a reviewed question for the given grade and subject.
///
/// Revision exhaustion is not an error: the response carries the last
/// candidate with `question_approved: false` and the full audit log.
pub async fn generate_question(
    State(state): State<AppState>,
    Json(payload): Json<GenerateQuestionRequest>,
) -> ApiResult<Json<FinalResult>> {
    validate(&payload.grade, &payload.subject)?;

    let request = WorkflowRequest {
        grade: payload.grade.trim().to_string(),
        subject: payload.subject.trim().to_string(),
        prior_questions: payload.prior_questions,
    };

    let result = state.workflow.run(request).await?;
    Ok(Json(result))
}

/// Query-string form of question generation, without prior history.
pub async fn generate_question_query(
    State(state): State<AppState>,
    Query(params): Query<GenerateQuestionParams>,
) -> ApiResult<Json<FinalResult>> {
    validate(&params.grade, &params.subject)?;

    let request = WorkflowRequest {
        grade: params.grade.trim().to_string(),
        subject: params.subject.trim().to_string(),
        prior_questions: Vec::new(),
    };

    let result = state.workflow.run(request).await?;
    Ok(Json(result))
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};
    use std::sync::Arc;
    use tutor_model::{LanguageModel, ModelError, StructuredRequest};
    use tutor_workflow::QuestionWorkflow;

    struct ScriptedModel {
        responses: std::sync::Mutex<std::collections::VecDeque<Value>>,
    }

    impl ScriptedModel {
        fn new(responses: Vec<Value>) -> Self {
            Self {
                responses: std::sync::Mutex::new(responses.into_iter().collect()),
            }
        }
    }

    #[async_trait]
    impl LanguageModel for ScriptedModel {
        fn name(&self) -> &str {
            "scripted"
        }

        async fn generate_structured(
            &self,
            _request: &StructuredRequest,
        ) -> Result<Value, ModelError> {
            let mut responses = self.responses.lock().unwrap();
            responses
                .pop_front()
                .ok_or_else(|| ModelError::Upstream("script exhausted".to_string()))
        }
    }

    fn state_with(responses: Vec<Value>) -> AppState {
        let model: Arc<dyn LanguageModel> = Arc::new(ScriptedModel::new(responses));
        let workflow = Arc::new(QuestionWorkflow::new(model.clone()));
        AppState::new(model, workflow)
    }

    fn approved_run() -> Vec<Value> {
        vec![
            json!({
                "problem": "Sam has 3 apples and buys 4 more. How many apples does Sam have?",
                "hints": ["Count the apples Sam starts with."],
                "choices": ["5", "6", "7", "8"],
                "answer": "7"
            }),
            json!({ "self_contained": true, "rationale": "Complete problem." }),
            json!({
                "verdicts": [false, false, true, false],
                "rationale": "Third choice matches.",
                "work": "3 + 4"
            }),
        ]
    }

    #[tokio::test]
    async fn post_returns_approved_result() {
        let state = state_with(approved_run());
        let payload = GenerateQuestionRequest {
            grade: "3rd".to_string(),
            subject: "addition".to_string(),
            prior_questions: Vec::new(),
        };

        let Json(result) = generate_question(State(state), Json(payload))
            .await
            .unwrap();
        assert!(result.question_approved);
        assert_eq!(result.final_correct_answer, "7");
        assert_eq!(result.revision_count, 0);
    }

    #[tokio::test]
    async fn query_form_works_without_history() {
        let state = state_with(approved_run());
        let params = GenerateQuestionParams {
            grade: "3rd".to_string(),
            subject: "addition".to_string(),
        };

        let Json(result) = generate_question_query(State(state), Query(params))
            .await
            .unwrap();
        assert!(result.answer_approved);
    }

    #[tokio::test]
    async fn blank_grade_is_rejected() {
        let state = state_with(Vec::new());
        let payload = GenerateQuestionRequest {
            grade: "  ".to_string(),
            subject: "addition".to_string(),
            prior_questions: Vec::new(),
        };

        let err = generate_question(State(state), Json(payload))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn upstream_failure_maps_to_api_error() {
        let state = state_with(Vec::new());
        let payload = GenerateQuestionRequest {
            grade: "3rd".to_string(),
            subject: "addition".to_string(),
            prior_questions: Vec::new(),
        };

        let err = generate_question(State(state), Json(payload))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Upstream(_)));
    }
}
