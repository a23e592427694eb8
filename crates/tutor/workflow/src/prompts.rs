//! Prompt construction.
//!
//! Kept as pure functions so prompt contents are directly testable.
//! Repetition avoidance is a property of the constructed prompt, not of
//! the model's creativity.

/// System prompt casting the model as a grade-level math teacher.
pub fn system_prompt(grade: &str) -> String {
    format!(
        "You are a math teacher for {} grade. Answer only with JSON conforming to the requested schema.",
        grade
    )
}

/// Generation prompt.
///
/// `history` must contain every question already asked to the user AND
/// every candidate rejected during this run; `rejection_reasons`
/// replays reviewer rationales so regeneration does not repeat the same
/// mistake.
pub fn generation_prompt(
    grade: &str,
    subject: &str,
    history: &[&str],
    rejection_reasons: &[String],
) -> String {
    let mut prompt = format!(
        "Your job is to provide a worded math problem for a {} grade student according to this concept: {}. \
         The question must be a word problem with a single answer, at least two sentences long, \
         containing every number needed to solve it. \
         Provide exactly four multiple choice answers, one of which is correct, and a few hints.",
        grade, subject
    );

    if !history.is_empty() {
        prompt.push_str(
            "\nRULES: These previous questions have been asked, so don't ask any questions like them:",
        );
        for question in history {
            prompt.push_str("\n- ");
            prompt.push_str(question);
        }
    }

    if !rejection_reasons.is_empty() {
        prompt.push_str("\nEarlier attempts this session were rejected for these reasons; avoid repeating them:");
        for reason in rejection_reasons {
            prompt.push_str("\n- ");
            prompt.push_str(reason);
        }
    }

    prompt
}

/// Question-review prompt: is the problem self-contained?
pub fn question_review_prompt(question: &str) -> String {
    format!(
        "Review this math word problem and decide whether it is self-contained: \
         it must provide every piece of data needed to solve it, and have a single answer.\n\
         Problem: {}\n\
         Report your verdict and a short rationale.",
        question
    )
}

/// Answer-review prompt: judge each choice independently.
pub fn answer_review_prompt(question: &str, answers: &[String]) -> String {
    let mut prompt = format!(
        "Solve this math word problem, then judge each multiple choice answer independently.\n\
         Problem: {}\nChoices:",
        question
    );
    for (idx, answer) in answers.iter().enumerate() {
        prompt.push_str(&format!("\n{}. {}", idx + 1, answer));
    }
    prompt.push_str(
        "\nReturn one verdict per choice, in order, a short rationale, and the arithmetic \
         expression for the correct result so it can be checked with a calculator.",
    );
    prompt
}

/// Key-concepts prompt, verbatim contract with the frontend.
pub fn concepts_prompt(grade: &str) -> String {
    format!(
        "List 5 key math concepts for {} grade student to understand.",
        grade
    )
}
