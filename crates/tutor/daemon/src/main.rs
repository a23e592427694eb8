//! Tutor Daemon - Math word problem service
//!
//! The tutor daemon provides:
//! - REST API for generating reviewed, grade-appropriate math questions
//! - Key concept listing per grade level
//! - Bounded-revision review loop over a language model backend

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod api;
mod config;
mod error;
mod server;

use config::DaemonConfig;
use error::DaemonResult;
use server::Server;

/// Tutor Daemon CLI
#[derive(Parser)]
#[command(name = "tutord")]
#[command(about = "Tutor Daemon - Math word problem service", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "TUTOR_CONFIG")]
    config: Option<String>,

    /// Listen address
    #[arg(short, long, env = "TUTOR_LISTEN_ADDR")]
    listen: Option<String>,

    /// Model name
    #[arg(short, long, env = "TUTOR_MODEL")]
    model: Option<String>,

    /// Log level
    #[arg(long, env = "TUTOR_LOG_LEVEL", default_value = "info")]
    log_level: String,

    /// Enable JSON logging
    #[arg(long, env = "TUTOR_LOG_JSON")]
    json: bool,
}

#[tokio::main]
async fn main() -> DaemonResult<()> {
    let cli = Cli::parse();

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| cli.log_level.clone().into());

    if cli.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    // Load configuration
    let mut config = DaemonConfig::load(cli.config.as_deref())
        .map_err(|e| error::DaemonError::Config(e.to_string()))?;

    // Override with CLI args
    if let Some(listen) = cli.listen {
        config.server.listen_addr = listen
            .parse()
            .map_err(|e| error::DaemonError::Config(format!("Invalid listen address: {}", e)))?;
    }

    if let Some(model) = cli.model {
        config.model.model = model;
    }

    // Print startup banner
    println!(
        r#"
  _         _                _
 | |_ _   _| |_ ___  _ __ __| |
 | __| | | | __/ _ \| '__/ _` |
 | |_| |_| | || (_) | | | (_| |
  \__|\__,_|\__\___/|_|  \__,_|

  Math word problem service
  Version: {}
  Model: {}
  Listening: {}
"#,
        env!("CARGO_PKG_VERSION"),
        config.model.model,
        config.server.listen_addr
    );

    // Create and run server
    let server = Server::new(config)?;
    server.run().await
}
