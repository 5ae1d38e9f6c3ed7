//! HTTP check adapter
//!
//! Exposes the bypass engine over plain HTTP/JSON:
//! - `POST /check`: decide on one request
//! - `GET /metrics`: decision counters
//! - `GET /healthz`: liveness

use crate::bypass::{BypassReason, HttpAttributes, RequestDescriptor, SharedBypassEngine};
use crate::config::{DEFAULT_MAX_BODY_BYTES, DEFAULT_PORT, ServerConfig};
use crate::error::TransportError;
use crate::metrics::{DecisionMetrics, MetricsSnapshot};
use axum::{
    Json, Router,
    extract::{DefaultBodyLimit, State},
    routing::{get, post},
};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

/// Configuration for the HTTP check server
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Address to bind to (e.g., "127.0.0.1:9191")
    pub bind: SocketAddr,
    /// Largest accepted request body, in bytes
    pub max_body_bytes: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind: SocketAddr::from(([127, 0, 0, 1], DEFAULT_PORT)),
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

impl HttpConfig {
    /// Create a new HTTP config with the specified bind address
    pub fn new(bind: SocketAddr) -> Self {
        Self {
            bind,
            ..Default::default()
        }
    }

    /// Create config from host and port strings
    pub fn from_host_port(host: &str, port: u16) -> Result<Self, TransportError> {
        let addr: SocketAddr = format!("{}:{}", host, port).parse()?;
        Ok(Self::new(addr))
    }

    /// Create config from the `[server]` section
    pub fn from_server_config(server: &ServerConfig) -> Result<Self, TransportError> {
        let mut config = Self::from_host_port(&server.host, server.port)?;
        config.max_body_bytes = server.max_body_bytes;
        Ok(config)
    }
}

/// Shared state for handlers
#[derive(Clone)]
pub struct AppState {
    pub engine: Arc<SharedBypassEngine>,
    pub metrics: Arc<DecisionMetrics>,
}

impl AppState {
    pub fn new(engine: Arc<SharedBypassEngine>, metrics: Arc<DecisionMetrics>) -> Self {
        Self { engine, metrics }
    }
}

/// Body of `POST /check`
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckRequest {
    pub host: String,
    pub method: String,
    pub path: String,
    #[serde(default)]
    pub body: Option<String>,
    /// Base64-encoded raw body bytes
    #[serde(default)]
    pub raw_body: Option<String>,
}

impl CheckRequest {
    /// Convert to transport attributes
    ///
    /// A raw body that is not valid base64 is dropped.
    pub fn into_attributes(self) -> HttpAttributes {
        let raw_body = match self.raw_body.as_deref() {
            None | Some("") => Vec::new(),
            Some(encoded) => STANDARD.decode(encoded).unwrap_or_else(|e| {
                warn!(host = %self.host, error = %e, "Ignoring raw body that is not valid base64");
                Vec::new()
            }),
        };

        HttpAttributes {
            host: self.host,
            method: self.method,
            path: self.path,
            body: self.body.unwrap_or_default(),
            raw_body,
        }
    }
}

/// Response of `POST /check`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CheckResponse {
    pub bypass: bool,
    pub reason: Option<String>,
}

impl CheckResponse {
    fn from_reason(reason: Option<BypassReason>) -> Self {
        Self {
            bypass: reason.is_some(),
            reason: reason.map(|r| r.as_str().to_string()),
        }
    }
}

/// Build the router
pub fn router(state: AppState, max_body_bytes: usize) -> Router {
    Router::new()
        .route("/check", post(check))
        .route("/metrics", get(metrics))
        .route("/healthz", get(healthz))
        .layer(DefaultBodyLimit::max(max_body_bytes))
        .layer(RequestBodyLimitLayer::new(max_body_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Run the HTTP check server until Ctrl+C
pub async fn run_http(state: AppState, config: HttpConfig) -> Result<(), TransportError> {
    let app = router(state, config.max_body_bytes);

    let listener = TcpListener::bind(config.bind).await?;
    info!("Bypass check server listening on http://{}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Bypass check server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

async fn check(
    State(state): State<AppState>,
    Json(request): Json<CheckRequest>,
) -> Json<CheckResponse> {
    let descriptor = RequestDescriptor::from(request.into_attributes());
    let decision = state.engine.evaluate(&descriptor);
    state.metrics.record(&decision);
    Json(CheckResponse::from_reason(decision.bypass_reason()))
}

async fn metrics(State(state): State<AppState>) -> Json<MetricsSnapshot> {
    Json(state.metrics.snapshot())
}

async fn healthz() -> &'static str {
    "ok"
}
