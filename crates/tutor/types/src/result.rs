//! Final payload returned to the HTTP boundary.

use serde::{Deserialize, Serialize};

/// Outcome of one workflow run.
///
/// When the revision cap was exhausted before full approval, the
/// question/answer fields carry the most recent candidate as a
/// best-effort payload and `answer_approved` is `false`; the audit log
/// records the exhaustion explicitly.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FinalResult {
    /// The validated (or best-effort) word problem.
    pub final_question: String,
    /// The four multiple-choice answers, in presentation order.
    pub final_answers: Vec<String>,
    /// The verified correct answer; always a member of `final_answers`,
    /// or empty if no answer was ever verified.
    pub final_correct_answer: String,
    /// Optional hints for the frontend's hint expander.
    #[serde(default)]
    pub hints: Vec<String>,
    /// Combined count of question and answer rejections this run.
    pub revision_count: u32,
    /// Whether the final question passed self-containedness review.
    pub question_approved: bool,
    /// Whether at least one answer was verified correct.
    pub answer_approved: bool,
    /// Rendered audit trail, one entry per step decision.
    pub audit_log: Vec<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn round_trips_through_json() {
        let result = FinalResult {
            final_question: "A baker sells 3 pies for $4 each. How much in total?".to_string(),
            final_answers: vec!["$7".into(), "$12".into(), "$1".into(), "$3".into()],
            final_correct_answer: "$12".to_string(),
            hints: vec!["Multiply the count by the price".to_string()],
            revision_count: 1,
            question_approved: true,
            answer_approved: true,
            audit_log: vec!["[generate] candidate staged".to_string()],
        };

        let json = serde_json::to_string(&result).unwrap();
        let back: FinalResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.final_correct_answer, "$12");
        assert!(back.final_answers.contains(&back.final_correct_answer));
        assert_eq!(back.audit_log.len(), 1);
    }

    #[test]
    fn hints_default_to_empty() {
        let json = r#"{
            "final_question": "q",
            "final_answers": ["a", "b", "c", "d"],
            "final_correct_answer": "a",
            "revision_count": 0,
            "question_approved": true,
            "answer_approved": true,
            "audit_log": []
        }"#;
        let result: FinalResult = serde_json::from_str(json).unwrap();
        assert!(result.hints.is_empty());
    }
}
