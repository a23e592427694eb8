//! Key concepts handler.

use crate::api::rest::state::AppState;
use crate::error::{ApiError, ApiResult};
use axum::{
    extract::{Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tutor_workflow::KeyConcept;

#[derive(Debug, Deserialize)]
pub struct ConceptParams {
    pub grade: String,
}

#[derive(Debug, Serialize)]
pub struct ConceptListResponse {
    pub grade: String,
    pub concepts: Vec<KeyConcept>,
}

/// List key math concepts for a grade level.
pub async fn key_concepts(
    State(state): State<AppState>,
    Query(params): Query<ConceptParams>,
) -> ApiResult<Json<ConceptListResponse>> {
    let grade = params.grade.trim();
    if grade.is_empty() {
        return Err(ApiError::Validation("grade must not be empty".to_string()));
    }

    let concepts = tutor_workflow::key_concepts(state.model.as_ref(), grade).await?;

    Ok(Json(ConceptListResponse {
        grade: grade.to_string(),
        concepts,
    }))
}
