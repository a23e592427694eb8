//! Append-only audit trail entries.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded workflow decision.
///
/// Entries are append-only: steps record what they decided and why, and
/// the collected rationales are replayed into later generation prompts
/// as rejection history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditEntry {
    /// Which step produced the entry (`generate`, `review_question`, ...).
    pub stage: String,
    /// Human-readable outcome or model rationale.
    pub message: String,
    /// When the entry was recorded.
    pub at: DateTime<Utc>,
}

impl AuditEntry {
    pub fn new(stage: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            stage: stage.into(),
            message: message.into(),
            at: Utc::now(),
        }
    }
}

impl std::fmt::Display for AuditEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}] {}", self.stage, self.message)
    }
}
