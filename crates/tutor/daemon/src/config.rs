//! Configuration for tutor-daemon.

use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use tutor_model::openai;
use tutor_workflow::{DEFAULT_GENERATION_ATTEMPTS, DEFAULT_MAX_REVISIONS};

/// Main daemon configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DaemonConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Model provider configuration
    #[serde(default)]
    pub model: ModelConfig,

    /// Workflow limits
    #[serde(default)]
    pub workflow: WorkflowConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl Default for DaemonConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            model: ModelConfig::default(),
            workflow: WorkflowConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

/// Server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    pub listen_addr: SocketAddr,

    /// Enable CORS (the interactive frontend is served separately)
    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: "127.0.0.1:8080".parse().expect("static address"),
            enable_cors: true,
        }
    }
}

/// Model provider configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Provider model name
    #[serde(default = "default_model")]
    pub model: String,

    /// Override for the chat-completions endpoint
    #[serde(default)]
    pub endpoint: Option<String>,

    /// API key; falls back to the provider's environment variable
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sampling temperature
    #[serde(default)]
    pub temperature: f64,

    /// Per-call timeout in seconds
    #[serde(default = "default_model_timeout")]
    pub timeout_secs: u64,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            model: default_model(),
            endpoint: None,
            api_key: None,
            temperature: 0.0,
            timeout_secs: default_model_timeout(),
        }
    }
}

impl ModelConfig {
    /// Build the provider configuration, resolving the API key from the
    /// environment when not set explicitly.
    pub fn to_openai(&self) -> openai::OpenAiConfig {
        openai::OpenAiConfig {
            model: self.model.clone(),
            endpoint: self.endpoint.clone(),
            api_key: self
                .api_key
                .clone()
                .or_else(|| std::env::var(openai::AUTH_ENV_VAR).ok()),
            temperature: self.temperature,
            timeout_secs: self.timeout_secs,
        }
    }
}

/// Workflow limits.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkflowConfig {
    /// Cap on the shared question/answer rejection counter
    #[serde(default = "default_max_revisions")]
    pub max_revisions: u32,

    /// Retry budget for schema-invalid generation output
    #[serde(default = "default_generation_attempts")]
    pub generation_attempts: u32,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            max_revisions: default_max_revisions(),
            generation_attempts: default_generation_attempts(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json: false,
        }
    }
}

// Default value helpers
fn default_true() -> bool {
    true
}

fn default_model() -> String {
    openai::DEFAULT_MODEL.to_string()
}

fn default_model_timeout() -> u64 {
    60
}

fn default_max_revisions() -> u32 {
    DEFAULT_MAX_REVISIONS
}

fn default_generation_attempts() -> u32 {
    DEFAULT_GENERATION_ATTEMPTS
}

fn default_log_level() -> String {
    "info".to_string()
}

impl DaemonConfig {
    /// Load configuration: defaults, then file, then `TUTOR_` env vars.
    pub fn load(path: Option<&str>) -> Result<Self, config::ConfigError> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&DaemonConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(false));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("TUTOR")
                .separator("_")
                .try_parsing(true),
        );

        builder.build()?.try_deserialize()
    }
}
