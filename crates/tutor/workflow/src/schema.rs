//! Structured-output schemas exchanged with the model.

use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use tutor_types::ANSWER_CHOICES;

/// Generation step output: a word problem with four choices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratedProblem {
    /// The word problem, at least two sentences, single answer.
    pub problem: String,
    /// Hints toward the solution.
    #[serde(default)]
    pub hints: Vec<String>,
    /// Exactly four multiple choice answers.
    pub choices: Vec<String>,
    /// Which of the choices the model believes is correct.
    pub answer: String,
}

impl GeneratedProblem {
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "problem": {
                    "type": "string",
                    "description": "A long math word problem with all the inputs to solve it. This must be at least two sentences long."
                },
                "hints": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Hints to solve the math problem."
                },
                "choices": {
                    "type": "array",
                    "items": {"type": "string"},
                    "minItems": ANSWER_CHOICES,
                    "maxItems": ANSWER_CHOICES,
                    "description": "A list of four multiple choice answers."
                },
                "answer": {
                    "type": "string",
                    "description": "The multiple choice answer to the math problem."
                }
            },
            "required": ["problem", "choices", "answer"],
            "additionalProperties": false
        })
    }

    /// Structural validation beyond what deserialization enforces.
    pub fn validate(&self) -> Result<(), String> {
        if self.problem.trim().is_empty() {
            return Err("problem text is empty".to_string());
        }
        if self.choices.len() != ANSWER_CHOICES {
            return Err(format!(
                "expected {} choices, got {}",
                ANSWER_CHOICES,
                self.choices.len()
            ));
        }
        if self.choices.iter().any(|choice| choice.trim().is_empty()) {
            return Err("one of the choices is empty".to_string());
        }
        Ok(())
    }
}

/// Question-review step output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QuestionReview {
    /// Whether the problem provides all data needed to solve it.
    pub self_contained: bool,
    /// Reviewer rationale, replayed into regeneration prompts.
    pub rationale: String,
}

impl QuestionReview {
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "self_contained": {
                    "type": "boolean",
                    "description": "True when the problem contains every piece of data needed to solve it."
                },
                "rationale": {
                    "type": "string",
                    "description": "Short explanation of the verdict."
                }
            },
            "required": ["self_contained", "rationale"],
            "additionalProperties": false
        })
    }
}

/// Answer-review step output: one verdict per choice, in order.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnswerReview {
    /// Per-choice correctness, same order as presented.
    pub verdicts: Vec<bool>,
    /// Reviewer rationale.
    pub rationale: String,
    /// Arithmetic expression for the correct result, for the
    /// calculator cross-check.
    #[serde(default)]
    pub work: Option<String>,
}

impl AnswerReview {
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "verdicts": {
                    "type": "array",
                    "items": {"type": "boolean"},
                    "minItems": ANSWER_CHOICES,
                    "maxItems": ANSWER_CHOICES,
                    "description": "For each choice in order, whether it is the correct answer."
                },
                "rationale": {
                    "type": "string",
                    "description": "Short explanation of how the problem was solved."
                },
                "work": {
                    "type": ["string", "null"],
                    "description": "Plain arithmetic expression (numbers, + - * / and parentheses) evaluating to the correct result."
                }
            },
            "required": ["verdicts", "rationale"],
            "additionalProperties": false
        })
    }
}

/// Key-concepts output: parallel name/description lists.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConceptList {
    /// The names of the math learning concepts.
    pub concept_name: Vec<String>,
    /// Short descriptions of the math learning concepts.
    pub concept_description: Vec<String>,
}

impl ConceptList {
    pub fn json_schema() -> Value {
        json!({
            "type": "object",
            "properties": {
                "concept_name": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "The names of the math learning concepts."
                },
                "concept_description": {
                    "type": "array",
                    "items": {"type": "string"},
                    "description": "Short descriptions of the math learning concepts."
                }
            },
            "required": ["concept_name", "concept_description"],
            "additionalProperties": false
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn problem(choices: Vec<&str>) -> GeneratedProblem {
        GeneratedProblem {
            problem: "A farmer has 12 eggs. She sells 5. How many are left?".to_string(),
            hints: vec![],
            choices: choices.into_iter().map(String::from).collect(),
            answer: "7".to_string(),
        }
    }

    #[test]
    fn four_choices_are_required() {
        assert!(problem(vec!["5", "6", "7", "8"]).validate().is_ok());
        assert!(problem(vec!["5", "6", "7"]).validate().is_err());
        assert!(problem(vec!["5", "6", "7", ""]).validate().is_err());
    }

    #[test]
    fn schemas_pin_choice_cardinality() {
        let schema = GeneratedProblem::json_schema();
        assert_eq!(schema["properties"]["choices"]["minItems"], 4);
        assert_eq!(schema["properties"]["choices"]["maxItems"], 4);

        let schema = AnswerReview::json_schema();
        assert_eq!(schema["properties"]["verdicts"]["maxItems"], 4);
    }

    #[test]
    fn answer_review_tolerates_missing_work() {
        let review: AnswerReview = serde_json::from_value(json!({
            "verdicts": [false, true, false, false],
            "rationale": "choice 2 matches"
        }))
        .unwrap();
        assert!(review.work.is_none());
        assert_eq!(review.verdicts[1], true);
    }
}
