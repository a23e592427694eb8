//! Workflow failure taxonomy.
//!
//! Revision exhaustion is deliberately absent here: reaching the
//! revision cap is an expected terminal outcome and produces a
//! best-effort [`crate::FinalResult`], never an error.

use thiserror::Error;

/// Hard failures a workflow run can surface to its caller.
#[derive(Debug, Error)]
pub enum WorkflowError {
    /// The model could not produce a schema-conforming question/answer
    /// set within the generation retry budget.
    #[error("generation failed after {attempts} attempt(s): {reason}")]
    GenerationFailed { attempts: u32, reason: String },

    /// The model capability was unreachable or failed at the transport
    /// layer. Surfaced immediately; the revision loop only retries
    /// semantic rejections.
    #[error("model capability unavailable: {0}")]
    Upstream(String),
}

impl WorkflowError {
    pub fn is_upstream(&self) -> bool {
        matches!(self, WorkflowError::Upstream(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_attempt_count() {
        let err = WorkflowError::GenerationFailed {
            attempts: 3,
            reason: "missing choices".to_string(),
        };
        assert!(err.to_string().contains("3 attempt(s)"));
        assert!(!err.is_upstream());
    }

    #[test]
    fn upstream_is_flagged() {
        assert!(WorkflowError::Upstream("timeout".to_string()).is_upstream());
    }
}
