use anyhow::{Context, Result};
use clap::Parser;
use eightball_core::{
    get_default_config_file, EightBallConfig, FixedAnswerSet, TracingRequestLog,
};
use eightball_daemon::http_server::{self, AppState};
use std::net::{SocketAddr, TcpListener};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Parser, Debug)]
#[command(
    name = "eightball-daemon",
    about = "Magic eight ball HTTP service",
    version
)]
struct Args {
    /// Path to config file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// HTTP server address
    #[arg(short, long, env = "EIGHTBALL_LISTEN")]
    listen: Option<SocketAddr>,

    /// Maximum number of questions answered at once per batch (0 = unbounded)
    #[arg(long, env = "EIGHTBALL_MAX_CONCURRENCY")]
    max_concurrency: Option<usize>,

    /// Per-question timeout in milliseconds (0 = none)
    #[arg(long, env = "EIGHTBALL_QUESTION_TIMEOUT_MS")]
    question_timeout_ms: Option<u64>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "EIGHTBALL_LOG_LEVEL")]
    log_level: Option<String>,
}

impl Args {
    fn overrides(&self) -> EightBallConfig {
        EightBallConfig {
            listen_addr: self.listen,
            max_concurrency: self.max_concurrency,
            question_timeout_ms: self.question_timeout_ms,
            log_level: self.log_level.clone(),
        }
    }
}

fn load_config(args: &Args) -> Result<(EightBallConfig, Option<PathBuf>)> {
    let path = match &args.config {
        Some(path) => Some(path.clone()),
        None => get_default_config_file("eightball").ok(),
    };

    let file_config = match &path {
        Some(path) => EightBallConfig::load_from_file(path)
            .with_context(|| format!("Failed to load configuration from {}", path.display()))?,
        None => EightBallConfig::default(),
    };

    Ok((file_config.merge(&args.overrides()), path))
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(e) => {
            error!(error = %e, "Failed to listen for shutdown signal");
            std::future::pending::<()>().await;
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();
    let (config, config_path) = load_config(&args)?;

    // Initialize logging
    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.resolved_log_level())),
        )
        .init();

    info!("Starting eight ball daemon");
    match &config_path {
        Some(path) if path.exists() => info!("Loaded configuration from {}", path.display()),
        Some(path) => warn!("No config file at {}, using defaults", path.display()),
        None => warn!("Could not determine config directory, using defaults"),
    }
    info!(
        max_concurrency = ?config.resolved_max_concurrency(),
        question_timeout = ?config.resolved_question_timeout(),
        "Dispatch limits configured"
    );

    let state = AppState::new(
        &config,
        Arc::new(FixedAnswerSet::standard()),
        Arc::new(TracingRequestLog),
    );

    let addr = config.resolved_listen_addr();
    let listener = TcpListener::bind(addr)
        .with_context(|| format!("Failed to bind HTTP listener on {}", addr))?;

    if let Err(e) = http_server::run_server(listener, state, shutdown_signal()).await {
        error!(error = %e, "HTTP server failed");
        return Err(e);
    }

    info!("Eight ball daemon shutting down");
    Ok(())
}
