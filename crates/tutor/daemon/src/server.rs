//! Server setup and lifecycle management

use crate::api::create_router;
use crate::api::rest::state::AppState;
use crate::config::DaemonConfig;
use crate::error::{DaemonError, DaemonResult};
use std::sync::Arc;
use tokio::net::TcpListener;
use tutor_model::openai::OpenAiModel;
use tutor_model::LanguageModel;
use tutor_workflow::QuestionWorkflow;

/// Tutor daemon server.
pub struct Server {
    config: DaemonConfig,
    model: Arc<dyn LanguageModel>,
    workflow: Arc<QuestionWorkflow>,
}

impl Server {
    /// Create a new server with the given configuration.
    pub fn new(config: DaemonConfig) -> DaemonResult<Self> {
        let model: Arc<dyn LanguageModel> = Arc::new(
            OpenAiModel::new(config.model.to_openai())
                .map_err(|e| DaemonError::Config(e.to_string()))?,
        );

        let workflow = Arc::new(
            QuestionWorkflow::new(model.clone())
                .with_max_revisions(config.workflow.max_revisions)
                .with_generation_attempts(config.workflow.generation_attempts),
        );

        Ok(Self {
            config,
            model,
            workflow,
        })
    }

    /// Run the server until a shutdown signal arrives.
    pub async fn run(self) -> DaemonResult<()> {
        let addr = self.config.server.listen_addr;

        let state = AppState::new(self.model.clone(), self.workflow.clone());
        let app = create_router(state, self.config.server.enable_cors);

        let listener = TcpListener::bind(addr).await?;

        tracing::info!("Tutor daemon listening on {}", addr);
        tracing::info!("Model: {}", self.model.name());

        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| DaemonError::Server(e.to_string()))?;

        tracing::info!("Tutor daemon shutting down");

        Ok(())
    }
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received terminate signal, initiating graceful shutdown");
        }
    }
}
