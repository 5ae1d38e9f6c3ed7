//! Configuration loader with layered sources
//!
//! Application settings are loaded with the following precedence
//! (highest to lowest):
//! 1. Environment variables (AUTHZ_BYPASS__*)
//! 2. Configuration file (TOML)
//! 3. Default values
//!
//! Bypass rules are a separate JSON document, read from `rules.path`.

use crate::config::types::{AppConfig, HostSettingsMap};
use crate::error::ConfigError;
use config::{Config, Environment, File, FileFormat};
use serde_json::Value;
use std::path::Path;
use tracing::{debug, warn};

/// Default configuration file paths to check (in order)
const DEFAULT_CONFIG_PATHS: &[&str] = &[
    "authz-bypass.toml",
    ".authz-bypass.toml",
    "~/.config/authz-bypass/config.toml",
    "/etc/authz-bypass/config.toml",
];

/// Environment variable prefix for application settings
const ENV_PREFIX: &str = "AUTHZ_BYPASS";

/// Wrapper key used by rules files that nest the host map
const HOST_SETTINGS_KEY: &str = "hostSettings";

/// Load configuration from a TOML string (useful for testing)
pub fn load_config_from_str(toml_str: &str) -> Result<AppConfig, ConfigError> {
    let config = Config::builder()
        .add_source(File::from_str(toml_str, FileFormat::Toml))
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Load configuration from files and environment
pub fn load_config(config_path: Option<&str>) -> Result<AppConfig, ConfigError> {
    let mut builder = Config::builder();

    if let Some(path) = config_path {
        // Explicit path provided - must exist
        if !Path::new(path).exists() {
            return Err(ConfigError::Load(format!(
                "Configuration file not found: {}",
                path
            )));
        }
        builder = builder.add_source(File::new(path, FileFormat::Toml));
    } else {
        // Try default paths (first existing one wins)
        for path in DEFAULT_CONFIG_PATHS {
            let expanded = shellexpand::tilde(path);
            if Path::new(expanded.as_ref()).exists() {
                debug!(path = %expanded, "Using configuration file");
                builder = builder.add_source(File::new(&expanded, FileFormat::Toml));
                break;
            }
        }
    }

    // e.g. AUTHZ_BYPASS__SERVER__PORT, AUTHZ_BYPASS__RULES__PATH
    builder = builder.add_source(
        Environment::with_prefix(ENV_PREFIX)
            .separator("__")
            .try_parsing(true),
    );

    let config = builder
        .build()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    let app_config: AppConfig = config
        .try_deserialize()
        .map_err(|e| ConfigError::Load(e.to_string()))?;

    validate_config(&app_config)?;

    Ok(app_config)
}

/// Validate configuration values
fn validate_config(config: &AppConfig) -> Result<(), ConfigError> {
    if config.server.port == 0 {
        return Err(ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        });
    }

    if config.server.max_body_bytes == 0 {
        return Err(ConfigError::Invalid {
            message: "server.max_body_bytes must be greater than 0".to_string(),
        });
    }

    if let Some(path) = &config.rules.path
        && path.trim().is_empty()
    {
        return Err(ConfigError::Invalid {
            message: "rules.path must not be empty when set".to_string(),
        });
    }

    Ok(())
}

/// Parse a bypass rules document
///
/// Accepts either `{"hostSettings": {<host>: {...}}}` or the bare host map.
/// `source_name` only labels errors.
pub fn parse_rules(json: &str, source_name: &str) -> Result<HostSettingsMap, ConfigError> {
    let mut document: serde_json::Map<String, Value> =
        serde_json::from_str(json).map_err(|e| ConfigError::parse(source_name, e))?;

    let hosts = if document.len() == 1 && document.contains_key(HOST_SETTINGS_KEY) {
        document
            .remove(HOST_SETTINGS_KEY)
            .unwrap_or_else(|| Value::Object(serde_json::Map::new()))
    } else {
        Value::Object(document)
    };

    let hosts: HostSettingsMap =
        serde_json::from_value(hosts).map_err(|e| ConfigError::parse(source_name, e))?;

    for issue in rule_warnings(&hosts) {
        warn!(source = source_name, "{}", issue);
    }

    Ok(hosts)
}

/// Read and parse a bypass rules file
pub fn load_rules(path: impl AsRef<Path>) -> Result<HostSettingsMap, ConfigError> {
    let path = path.as_ref();
    let content = std::fs::read_to_string(path)?;
    parse_rules(&content, &path.display().to_string())
}

/// Advisory checks on bypass rules
///
/// These never reject a configuration: patterns compile whatever they look
/// like and unrecognized keys are skipped. They flag entries that are
/// probably mistakes.
pub fn rule_warnings(hosts: &HostSettingsMap) -> Vec<String> {
    let mut issues = Vec::new();

    for (host, settings) in hosts {
        if host.is_empty() {
            issues.push("empty host name will never match a request".to_string());
        }

        for pattern in &settings.ignore_paths {
            if !pattern.starts_with('/') {
                issues.push(format!(
                    "host '{}': ignore path '{}' is not rooted, treating it as '/{}'",
                    host, pattern, pattern
                ));
            }
        }

        for key in settings.unknown.keys() {
            issues.push(format!(
                "host '{}': unrecognized setting '{}' is ignored",
                host, key
            ));
        }

        for operation in &settings.ignore_graphql_operations {
            if operation.is_empty() || operation.contains(' ') {
                issues.push(format!(
                    "host '{}': graphql operation '{}' can never be extracted from a query",
                    host, operation
                ));
            }
        }
    }

    issues.sort();
    issues
}
