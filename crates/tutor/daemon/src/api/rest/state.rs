//! Application state for API handlers.

use std::sync::Arc;
use tutor_model::LanguageModel;
use tutor_workflow::QuestionWorkflow;

/// Shared application state.
///
/// The workflow itself is stateless between requests; every request
/// creates and discards its own session.
#[derive(Clone)]
pub struct AppState {
    /// Model capability, shared with the workflow
    pub model: Arc<dyn LanguageModel>,

    /// Question generation workflow
    pub workflow: Arc<QuestionWorkflow>,

    /// Daemon version
    pub version: String,

    /// Daemon start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    pub fn new(model: Arc<dyn LanguageModel>, workflow: Arc<QuestionWorkflow>) -> Self {
        Self {
            model,
            workflow,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Uptime as a human-readable string.
    pub fn uptime(&self) -> String {
        let secs = (chrono::Utc::now() - self.started_at).num_seconds();
        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        }
    }
}
