//! The bounded-revision state machine.
//!
//! Control flow is an explicit dispatch loop over a tagged [`Step`]
//! value; each transition function takes the session by exclusive
//! reference and returns the next step. One synchronous-from-the
//! caller's-view model call per transition, strict sequential
//! progression, no shared state between runs.

use crate::prompts;
use crate::schema::{AnswerReview, GeneratedProblem, QuestionReview};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::sync::Arc;
use tutor_model::{generate, LanguageModel, MathTool, ModelError, StructuredRequest};
use tutor_types::{FinalResult, QuizSession, WorkflowError, ANSWER_CHOICES, DEFAULT_MAX_REVISIONS};

/// Retry budget for schema-invalid output at the generation sub-step,
/// distinct from the revision loop.
pub const DEFAULT_GENERATION_ATTEMPTS: u32 = 3;

/// Workflow steps. `Summarize` is terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Step {
    Generate,
    ReviewQuestion,
    ReviewAnswer,
    Summarize,
}

/// Caller-supplied inputs for one run.
#[derive(Debug, Clone, Deserialize)]
pub struct WorkflowRequest {
    pub grade: String,
    pub subject: String,
    #[serde(default)]
    pub prior_questions: Vec<String>,
}

/// The question generation and validation workflow.
pub struct QuestionWorkflow {
    model: Arc<dyn LanguageModel>,
    math: MathTool,
    max_revisions: u32,
    generation_attempts: u32,
}

impl QuestionWorkflow {
    pub fn new(model: Arc<dyn LanguageModel>) -> Self {
        Self {
            model,
            math: MathTool::new(),
            max_revisions: DEFAULT_MAX_REVISIONS,
            generation_attempts: DEFAULT_GENERATION_ATTEMPTS,
        }
    }

    pub fn with_max_revisions(mut self, max_revisions: u32) -> Self {
        self.max_revisions = max_revisions;
        self
    }

    pub fn with_generation_attempts(mut self, generation_attempts: u32) -> Self {
        self.generation_attempts = generation_attempts.max(1);
        self
    }

    /// Run the workflow to completion for one request.
    ///
    /// Revision exhaustion is not an error: the result then carries the
    /// most recent candidate with `answer_approved == false`. Hard
    /// failures are transport errors and schema non-conformance that
    /// survives the generation retry budget.
    pub async fn run(&self, request: WorkflowRequest) -> Result<FinalResult, WorkflowError> {
        let mut session =
            QuizSession::new(request.grade, request.subject, request.prior_questions);
        let mut step = Step::Generate;

        loop {
            tracing::debug!(?step, revisions = session.revision_count, "workflow transition");
            step = match step {
                Step::Generate => self.generate(&mut session).await?,
                Step::ReviewQuestion => self.review_question(&mut session).await?,
                Step::ReviewAnswer => self.review_answer(&mut session).await?,
                Step::Summarize => break,
            };
        }

        session.record("summarize", "workflow finished");
        Ok(session.into_final_result())
    }

    // ── Transition functions ─────────────────────────────────────────

    async fn generate(&self, session: &mut QuizSession) -> Result<Step, WorkflowError> {
        let mut last_reason = String::new();

        for attempt in 1..=self.generation_attempts {
            let request = StructuredRequest::new(
                "math_problem",
                GeneratedProblem::json_schema(),
                prompts::generation_prompt(
                    &session.grade,
                    &session.subject,
                    &session.question_history(),
                    &session.rejection_reasons,
                ),
            )
            .with_system_prompt(prompts::system_prompt(&session.grade));

            match generate::<GeneratedProblem>(self.model.as_ref(), &request).await {
                Ok(candidate) => match candidate.validate() {
                    Ok(()) => {
                        session.stage_candidate(
                            candidate.problem,
                            candidate.choices,
                            candidate.hints,
                        );
                        return Ok(Step::ReviewQuestion);
                    }
                    Err(reason) => {
                        tracing::warn!(attempt, %reason, "generated problem failed validation");
                        session.record(
                            "generate",
                            format!("attempt {} produced an invalid problem: {}", attempt, reason),
                        );
                        last_reason = reason;
                    }
                },
                Err(err) if err.is_upstream() => {
                    return Err(WorkflowError::Upstream(err.to_string()))
                }
                Err(err) => {
                    tracing::warn!(attempt, error = %err, "generation output did not match schema");
                    session.record(
                        "generate",
                        format!("attempt {} did not match the schema: {}", attempt, err),
                    );
                    last_reason = err.to_string();
                }
            }
        }

        Err(WorkflowError::GenerationFailed {
            attempts: self.generation_attempts,
            reason: last_reason,
        })
    }

    async fn review_question(&self, session: &mut QuizSession) -> Result<Step, WorkflowError> {
        if session.exhausted(self.max_revisions) {
            session.force_terminate();
            return Ok(Step::Summarize);
        }

        let question = session.candidate_question.clone().unwrap_or_default();
        let request = StructuredRequest::new(
            "question_review",
            QuestionReview::json_schema(),
            prompts::question_review_prompt(&question),
        );
        let review: QuestionReview = self.invoke(&request).await?;

        if review.self_contained {
            session.approve_question(&review.rationale);
            Ok(Step::ReviewAnswer)
        } else {
            session.reject_question(&review.rationale);
            Ok(self.after_rejection(session))
        }
    }

    async fn review_answer(&self, session: &mut QuizSession) -> Result<Step, WorkflowError> {
        let question = session.candidate_question.clone().unwrap_or_default();
        let answers = session.candidate_answers.clone();
        let request = StructuredRequest::new(
            "answer_review",
            AnswerReview::json_schema(),
            prompts::answer_review_prompt(&question, &answers),
        );
        let review: AnswerReview = self.invoke(&request).await?;

        if review.verdicts.len() != ANSWER_CHOICES {
            return Err(WorkflowError::GenerationFailed {
                attempts: 1,
                reason: format!(
                    "answer review returned {} verdicts, expected {}",
                    review.verdicts.len(),
                    ANSWER_CHOICES
                ),
            });
        }

        let Some(correct_index) = review.verdicts.iter().position(|flagged| *flagged) else {
            session.reject_answers(&review.rationale);
            return Ok(self.after_rejection(session));
        };

        let flagged = review.verdicts.iter().filter(|flagged| **flagged).count();
        if flagged > 1 {
            tracing::warn!(flagged, "reviewer flagged multiple answers correct");
            session.record(
                "review_answer",
                format!("reviewer flagged {} answers correct; first match wins", flagged),
            );
        }

        if let Some(work) = review.work.as_deref() {
            if let Err(reason) = self.cross_check(work, &answers[correct_index]) {
                session.reject_answers(&format!("calculator check failed: {}", reason));
                return Ok(self.after_rejection(session));
            }
            session.record(
                "review_answer",
                format!(
                    "calculator confirmed '{}' against choice {}",
                    work,
                    correct_index + 1
                ),
            );
        }

        session.approve_answers(correct_index, &review.rationale);
        Ok(Step::Summarize)
    }

    // ── Helpers ──────────────────────────────────────────────────────

    /// After a rejection the loop normally regenerates; once the cap is
    /// reached it routes through the review guard instead, which forces
    /// termination without consuming another generation.
    fn after_rejection(&self, session: &QuizSession) -> Step {
        if session.exhausted(self.max_revisions) {
            Step::ReviewQuestion
        } else {
            Step::Generate
        }
    }

    async fn invoke<T: DeserializeOwned>(
        &self,
        request: &StructuredRequest,
    ) -> Result<T, WorkflowError> {
        generate(self.model.as_ref(), request)
            .await
            .map_err(model_failure)
    }

    fn cross_check(&self, work: &str, answer: &str) -> Result<(), String> {
        let value = self.math.evaluate(work).map_err(|e| e.to_string())?;
        match extract_number(answer) {
            Some(expected) => {
                let tolerance = 1e-6_f64.max(expected.abs() * 1e-9);
                if (value - expected).abs() <= tolerance {
                    Ok(())
                } else {
                    Err(format!(
                        "expression '{}' evaluates to {}, but the flagged answer is {}",
                        work, value, expected
                    ))
                }
            }
            // Non-numeric answer text is outside the calculator's reach.
            None => Ok(()),
        }
    }
}

pub(crate) fn model_failure(err: ModelError) -> WorkflowError {
    match err {
        ModelError::Upstream(detail) => WorkflowError::Upstream(detail),
        other => WorkflowError::GenerationFailed {
            attempts: 1,
            reason: other.to_string(),
        },
    }
}

/// First numeric token in an answer string, tolerating currency symbols
/// and thousands separators ("$1,200 total" -> 1200.0).
fn extract_number(text: &str) -> Option<f64> {
    let mut token = String::new();
    let mut chars = text.chars().peekable();

    while let Some(ch) = chars.next() {
        if ch.is_ascii_digit() {
            token.push(ch);
            while let Some(&next) = chars.peek() {
                if next.is_ascii_digit() || next == '.' {
                    token.push(next);
                    chars.next();
                } else if next == ',' {
                    chars.next();
                } else {
                    break;
                }
            }
            return token.parse().ok();
        }
        if ch == '-' && matches!(chars.peek(), Some(c) if c.is_ascii_digit()) {
            token.push('-');
        } else {
            token.clear();
        }
    }

    None
}
