//! Key learning concepts for a grade level.
//!
//! Single structured call, no revision loop: the concept list either
//! conforms or the operation fails.

use crate::machine::model_failure;
use crate::prompts;
use crate::schema::ConceptList;
use serde::{Deserialize, Serialize};
use tutor_model::{generate, LanguageModel, StructuredRequest};
use tutor_types::WorkflowError;

/// Number of concepts returned per grade.
pub const CONCEPT_COUNT: usize = 5;

/// One learning concept presented to the user.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeyConcept {
    pub name: String,
    pub description: String,
}

/// Fetch the key math concepts for a grade.
pub async fn key_concepts(
    model: &dyn LanguageModel,
    grade: &str,
) -> Result<Vec<KeyConcept>, WorkflowError> {
    let request = StructuredRequest::new(
        "math_concepts",
        ConceptList::json_schema(),
        prompts::concepts_prompt(grade),
    );
    let list: ConceptList = generate(model, &request).await.map_err(model_failure)?;

    if list.concept_name.len() != CONCEPT_COUNT || list.concept_description.len() != CONCEPT_COUNT {
        return Err(WorkflowError::GenerationFailed {
            attempts: 1,
            reason: format!(
                "expected {} concepts, got {} names and {} descriptions",
                CONCEPT_COUNT,
                list.concept_name.len(),
                list.concept_description.len()
            ),
        });
    }

    Ok(list
        .concept_name
        .into_iter()
        .zip(list.concept_description)
        .map(|(name, description)| KeyConcept { name, description })
        .collect())
}
