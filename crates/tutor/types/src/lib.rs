//! Domain types for the math tutor question service.
//!
//! The central type is [`QuizSession`]: the single-writer state record
//! threaded through the generation/validation workflow. A session lives
//! for exactly one workflow run and is consumed by
//! [`QuizSession::into_final_result`] at the terminal step.

mod audit;
mod error;
mod result;
mod session;

pub use audit::AuditEntry;
pub use error::WorkflowError;
pub use result::FinalResult;
pub use session::QuizSession;

/// Number of multiple-choice answers attached to every candidate question.
pub const ANSWER_CHOICES: usize = 4;

/// Default cap on the shared question/answer rejection counter.
pub const DEFAULT_MAX_REVISIONS: u32 = 5;
