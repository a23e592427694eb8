//! Workflow session state.
//!
//! A `QuizSession` is created fresh per request, mutated exclusively by
//! the workflow's transition functions, and consumed at summarization.
//! Every mutation appends to the audit trail.

use crate::{AuditEntry, FinalResult, ANSWER_CHOICES};
use serde::{Deserialize, Serialize};

/// Mutable state for one question-generation run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuizSession {
    /// Target grade level (immutable after creation).
    pub grade: String,
    /// Math subject or concept (immutable after creation).
    pub subject: String,
    /// Questions already shown to the end user, newest last.
    pub prior_questions: Vec<String>,

    /// Current candidate question; overwritten on each regeneration.
    pub candidate_question: Option<String>,
    /// Current candidate answers; always `ANSWER_CHOICES` long when staged.
    pub candidate_answers: Vec<String>,
    /// Hints attached to the current candidate.
    pub candidate_hints: Vec<String>,

    /// Tri-state question review verdict; `None` until reviewed.
    pub question_approved: Option<bool>,
    /// Tri-state answer review verdict; `None` until reviewed.
    pub answer_approved: Option<bool>,

    /// Question text locked in by question approval.
    pub final_question: Option<String>,
    /// Answers locked in by answer approval.
    pub final_answers: Vec<String>,
    /// Verified correct answer, member of `final_answers`.
    pub final_correct_answer: Option<String>,
    /// Hints carried over with the approved answers.
    pub final_hints: Vec<String>,

    /// Shared rejection counter across both review steps.
    pub revision_count: u32,
    /// Candidates rejected during this run, fed back into generation.
    pub rejected_questions: Vec<String>,
    /// Reviewer rationales for those rejections, same order.
    pub rejection_reasons: Vec<String>,

    /// Append-only trace of every step decision.
    pub audit: Vec<AuditEntry>,
}

impl QuizSession {
    pub fn new(
        grade: impl Into<String>,
        subject: impl Into<String>,
        prior_questions: Vec<String>,
    ) -> Self {
        Self {
            grade: grade.into(),
            subject: subject.into(),
            prior_questions,
            candidate_question: None,
            candidate_answers: Vec::new(),
            candidate_hints: Vec::new(),
            question_approved: None,
            answer_approved: None,
            final_question: None,
            final_answers: Vec::new(),
            final_correct_answer: None,
            final_hints: Vec::new(),
            revision_count: 0,
            rejected_questions: Vec::new(),
            rejection_reasons: Vec::new(),
            audit: Vec::new(),
        }
    }

    /// Append an audit entry.
    pub fn record(&mut self, stage: &str, message: impl Into<String>) {
        self.audit.push(AuditEntry::new(stage, message));
    }

    /// Install a fresh candidate and reset both review verdicts.
    pub fn stage_candidate(&mut self, question: String, answers: Vec<String>, hints: Vec<String>) {
        debug_assert_eq!(answers.len(), ANSWER_CHOICES);
        self.record("generate", format!("candidate staged: {}", question));
        self.candidate_question = Some(question);
        self.candidate_answers = answers;
        self.candidate_hints = hints;
        self.question_approved = None;
        self.answer_approved = None;
    }

    /// Mark the candidate question self-contained and lock it in.
    pub fn approve_question(&mut self, rationale: &str) {
        self.question_approved = Some(true);
        self.final_question = self.candidate_question.clone();
        self.record("review_question", format!("approved: {}", rationale));
    }

    /// Reject the candidate question; consumes one revision.
    pub fn reject_question(&mut self, rationale: &str) {
        self.question_approved = Some(false);
        self.push_rejection(rationale);
        self.record("review_question", format!("rejected: {}", rationale));
    }

    /// Lock in the answers with the verified correct choice.
    ///
    /// The index has been produced by scanning the reviewer verdicts in
    /// original order, so the selected answer is by construction a
    /// member of the final answer set.
    pub fn approve_answers(&mut self, correct_index: usize, rationale: &str) {
        self.answer_approved = Some(true);
        self.final_answers = self.candidate_answers.clone();
        self.final_correct_answer = self.candidate_answers.get(correct_index).cloned();
        self.final_hints = self.candidate_hints.clone();
        self.record(
            "review_answer",
            format!("answer {} verified: {}", correct_index + 1, rationale),
        );
    }

    /// Reject the candidate answers; consumes one revision.
    pub fn reject_answers(&mut self, rationale: &str) {
        self.answer_approved = Some(false);
        self.push_rejection(rationale);
        self.record("review_answer", format!("rejected: {}", rationale));
    }

    /// Forced termination once the revision cap is reached.
    pub fn force_terminate(&mut self) {
        self.question_approved = Some(false);
        self.record(
            "review_question",
            "maximum revisions exhausted without full approval; returning best-effort candidate",
        );
    }

    /// Whether the shared rejection counter has hit the cap.
    pub fn exhausted(&self, max_revisions: u32) -> bool {
        self.revision_count >= max_revisions
    }

    /// Question history for the generation prompt: everything already
    /// asked plus everything rejected during this run.
    pub fn question_history(&self) -> Vec<&str> {
        self.prior_questions
            .iter()
            .chain(self.rejected_questions.iter())
            .map(String::as_str)
            .collect()
    }

    /// Assemble the response payload, falling back to the most recent
    /// candidate when full approval was never reached.
    pub fn into_final_result(self) -> FinalResult {
        let answer_approved = self.answer_approved == Some(true);
        let question_approved = self.question_approved == Some(true);

        let final_question = self
            .final_question
            .or(self.candidate_question)
            .unwrap_or_default();
        let final_answers = if self.final_answers.is_empty() {
            self.candidate_answers
        } else {
            self.final_answers
        };
        let hints = if self.final_hints.is_empty() {
            self.candidate_hints
        } else {
            self.final_hints
        };

        FinalResult {
            final_question,
            final_answers,
            final_correct_answer: self.final_correct_answer.unwrap_or_default(),
            hints,
            revision_count: self.revision_count,
            question_approved,
            answer_approved,
            audit_log: self.audit.iter().map(AuditEntry::to_string).collect(),
        }
    }

    fn push_rejection(&mut self, rationale: &str) {
        if let Some(question) = self.candidate_question.clone() {
            self.rejected_questions.push(question);
        }
        self.rejection_reasons.push(rationale.to_string());
        self.revision_count += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn answers() -> Vec<String> {
        vec!["1".into(), "2".into(), "3".into(), "4".into()]
    }

    fn staged_session() -> QuizSession {
        let mut session = QuizSession::new("5", "fractions", vec!["old question".to_string()]);
        session.stage_candidate("What is 1/2 + 1/4?".to_string(), answers(), vec![]);
        session
    }

    #[test]
    fn staging_resets_verdicts() {
        let mut session = staged_session();
        session.approve_question("complete");
        session.stage_candidate("another".to_string(), answers(), vec![]);
        assert_eq!(session.question_approved, None);
        assert_eq!(session.answer_approved, None);
    }

    #[test]
    fn rejection_increments_shared_counter_and_tracks_history() {
        let mut session = staged_session();
        session.reject_question("missing data");
        session.stage_candidate("retry".to_string(), answers(), vec![]);
        session.reject_answers("none correct");

        assert_eq!(session.revision_count, 2);
        assert_eq!(session.rejected_questions.len(), 2);
        let history = session.question_history();
        assert!(history.contains(&"old question"));
        assert!(history.contains(&"What is 1/2 + 1/4?"));
        assert!(history.contains(&"retry"));
    }

    #[test]
    fn approval_locks_in_correct_answer_membership() {
        let mut session = staged_session();
        session.approve_question("complete");
        session.approve_answers(2, "checked");

        let result = session.into_final_result();
        assert!(result.question_approved);
        assert!(result.answer_approved);
        assert_eq!(result.final_correct_answer, "3");
        assert!(result.final_answers.contains(&result.final_correct_answer));
        assert_eq!(result.final_answers.len(), ANSWER_CHOICES);
    }

    #[test]
    fn best_effort_result_uses_last_candidate() {
        let mut session = staged_session();
        session.reject_answers("none correct");
        session.force_terminate();

        let result = session.into_final_result();
        assert!(!result.answer_approved);
        assert_eq!(result.final_question, "What is 1/2 + 1/4?");
        assert_eq!(result.final_answers.len(), ANSWER_CHOICES);
        assert_eq!(result.final_correct_answer, "");
        assert!(result
            .audit_log
            .iter()
            .any(|entry| entry.contains("maximum revisions exhausted")));
    }

    #[test]
    fn empty_session_produces_empty_payload() {
        let session = QuizSession::new("3", "addition", vec![]);
        let result = session.into_final_result();
        assert_eq!(result.final_question, "");
        assert!(result.final_answers.is_empty());
        assert!(!result.question_approved);
    }
}
