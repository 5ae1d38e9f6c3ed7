//! Envoy ext-authz bypass engine
//!
//! Decides whether an incoming HTTP request should skip authorization
//! entirely, before any credential check happens. The answer is binary:
//! bypass, or proceed to normal auth.
//!
//! ## Features
//!
//! - **Per-host rules** keyed by exact host name
//! - **OPTIONS bypass** for CORS preflight traffic
//! - **Ignore paths** with single-segment (`*`, `:name`) and trailing (`/*`) wildcards
//! - **GraphQL operation bypass** using a lightweight two-brace scan of the `query` field
//! - **Hot reload** by atomic replacement of the whole rule set
//!
//! ## Example Rules
//!
//! ```json
//! {
//!   "hostSettings": {
//!     "api.example.com": {
//!       "allowOptionsRequests": true,
//!       "ignorePaths": ["/health", "/public/*"],
//!       "ignoreGraphqlOperations": ["login"]
//!     }
//!   }
//! }
//! ```
//!
//! ## Usage
//!
//! ```
//! use envoy_authz_bypass::bypass::{BypassConfig, BypassEngine, RequestDescriptor};
//!
//! let config = BypassConfig::from_json(r#"{"api.example.com": {"ignorePaths": ["/health"]}}"#)?;
//! let engine = BypassEngine::new(config);
//!
//! let request = RequestDescriptor::new("api.example.com", "GET", "/health", "");
//! assert!(engine.decide(&request));
//! # Ok::<(), envoy_authz_bypass::error::ConfigError>(())
//! ```

pub mod bypass;
pub mod config;
pub mod error;
pub mod metrics;
pub mod transport;

// Re-export main types
pub use bypass::{BypassConfig, BypassDecision, BypassEngine, RequestDescriptor, SharedBypassEngine};
pub use config::{AppConfig, load_config};
pub use error::{AppError, ConfigError, Result};
pub use metrics::DecisionMetrics;
