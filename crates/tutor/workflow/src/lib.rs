//! Question generation and validation workflow.
//!
//! A bounded-revision state machine over a language-model capability:
//! generate a candidate word problem, review it for completeness,
//! verify one of the four answers is correct, and retry on rejection
//! until a shared revision counter hits its cap. See
//! [`QuestionWorkflow`] for the entry point.

pub mod concepts;
mod machine;
pub mod prompts;
pub mod schema;

#[cfg(test)]
pub(crate) mod testing;

pub use concepts::{key_concepts, KeyConcept, CONCEPT_COUNT};
pub use machine::{QuestionWorkflow, Step, WorkflowRequest, DEFAULT_GENERATION_ATTEMPTS};
pub use tutor_types::{FinalResult, QuizSession, WorkflowError, DEFAULT_MAX_REVISIONS};
