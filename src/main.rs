//! Envoy ext-authz bypass server
//!
//! Serves bypass decisions over HTTP and reloads rules on SIGHUP.

use clap::Parser;
use envoy_authz_bypass::{
    bypass::{BypassConfig, BypassEngine, SharedBypassEngine},
    config::{AppConfig, LogFormat, load_config, load_rules},
    metrics::DecisionMetrics,
    transport::{AppState, HttpConfig, run_http},
};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

/// Envoy ext-authz bypass server - decides which requests skip authorization
#[derive(Parser, Debug)]
#[command(name = "envoy-authz-bypass")]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to configuration file
    #[arg(short, long, env = "AUTHZ_BYPASS_CONFIG")]
    config: Option<String>,

    /// Path to the JSON bypass rules file (overrides rules.path)
    #[arg(short, long, env = "AUTHZ_BYPASS_RULES")]
    rules: Option<String>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, env = "AUTHZ_BYPASS_LOG_LEVEL")]
    log_level: Option<String>,

    /// HTTP server host (overrides server.host)
    #[arg(long)]
    host: Option<String>,

    /// HTTP server port (overrides server.port)
    #[arg(long)]
    port: Option<u16>,
}

fn init_tracing(config: &AppConfig, level_override: Option<&str>) {
    let level = level_override.unwrap_or(&config.logging.level);
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));

    let registry = tracing_subscriber::registry().with(filter);
    match config.logging.format {
        LogFormat::Pretty => registry
            .with(fmt::layer().with_writer(std::io::stderr))
            .init(),
        LogFormat::Json => registry
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init(),
    }
}

#[cfg(unix)]
fn spawn_reload_on_sighup(engine: Arc<SharedBypassEngine>, rules_path: String) {
    use tokio::signal::unix::{SignalKind, signal};

    tokio::spawn(async move {
        let mut hangups = match signal(SignalKind::hangup()) {
            Ok(stream) => stream,
            Err(e) => {
                warn!(error = %e, "Cannot listen for SIGHUP, rule reload disabled");
                return;
            }
        };

        while hangups.recv().await.is_some() {
            info!(path = %rules_path, "SIGHUP received, reloading bypass rules");
            // Failures are logged inside and keep the current rules
            engine.reload_from_file(&rules_path).ok();
        }
    });
}

#[cfg(not(unix))]
fn spawn_reload_on_sighup(_engine: Arc<SharedBypassEngine>, _rules_path: String) {}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Parse CLI arguments
    let args = Args::parse();

    // Load configuration
    let mut config = load_config(args.config.as_deref())?;
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }

    init_tracing(&config, args.log_level.as_deref());

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "Starting Envoy authz bypass server"
    );

    // Build the initial engine
    let rules_path = args.rules.or_else(|| config.rules.path.clone());
    let bypass_config = match &rules_path {
        Some(path) => {
            let hosts = load_rules(path)
                .inspect_err(|e| error!(path = %path, error = %e, "Failed to load bypass rules"))?;
            BypassConfig::from_settings(&hosts)
        }
        None => {
            warn!("No bypass rules configured, every request will proceed to authorization");
            BypassConfig::empty()
        }
    };
    info!(hosts = bypass_config.len(), "Bypass rules loaded");

    let engine = Arc::new(SharedBypassEngine::new(BypassEngine::new(bypass_config)));
    if let Some(path) = rules_path {
        spawn_reload_on_sighup(engine.clone(), path);
    }

    let metrics = Arc::new(DecisionMetrics::new());
    let http_config = HttpConfig::from_server_config(&config.server)
        .inspect_err(|e| error!(error = %e, "Invalid server address"))?;

    run_http(AppState::new(engine, metrics), http_config).await?;

    Ok(())
}
