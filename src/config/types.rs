//! Configuration types for envoy-authz-bypass
//!
//! Two documents are involved:
//! - the application config (TOML and/or environment variables): server,
//!   logging and where to find the bypass rules
//! - the bypass rules file (JSON): per-host [`HostSettings`]

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, HashMap};

/// Default port for the check adapter
pub const DEFAULT_PORT: u16 = 9191;

/// Default cap on inbound check request bodies (1 MiB)
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

/// Root configuration structure
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Check adapter settings
    pub server: ServerConfig,

    /// Where the bypass rules live
    pub rules: RulesConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

/// Check adapter configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// HTTP host
    pub host: String,

    /// HTTP port
    pub port: u16,

    /// Largest accepted check request body, in bytes
    pub max_body_bytes: usize,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: DEFAULT_PORT,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }
}

/// Bypass rules location
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct RulesConfig {
    /// Path to the JSON rules file. Without one, nothing is bypassed.
    pub path: Option<String>,
}

/// Per-host bypass settings, as written in the rules file
///
/// ```json
/// {
///   "allowOptionsRequests": true,
///   "ignorePaths": ["/health", "/public/*"],
///   "ignoreGraphqlOperations": ["login", "signup"]
/// }
/// ```
///
/// `null` reads as the default. Unrecognized keys are kept in
/// [`unknown`](Self::unknown) so they can be reported, not rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct HostSettings {
    /// Skip auth for every `OPTIONS` request to this host
    #[serde(deserialize_with = "null_as_default")]
    pub allow_options_requests: bool,

    /// Path patterns that skip auth
    #[serde(deserialize_with = "null_as_default")]
    pub ignore_paths: Vec<String>,

    /// GraphQL operation names that skip auth
    #[serde(deserialize_with = "null_as_default")]
    pub ignore_graphql_operations: Vec<String>,

    /// Keys this version does not recognize
    #[serde(flatten, skip_serializing_if = "BTreeMap::is_empty")]
    pub unknown: BTreeMap<String, Value>,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// Host name (exact, case-sensitive) to settings
pub type HostSettingsMap = HashMap<String, HostSettings>;

/// Logging configuration
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,

    /// Output format (pretty, json)
    pub format: LogFormat,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            format: LogFormat::Pretty,
        }
    }
}

/// Log output format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable output
    #[default]
    Pretty,
    /// JSON structured output
    Json,
}
