//! Error types for envoy-authz-bypass
//!
//! Only configuration and transport can fail. Per-request decisions never
//! error: anything ambiguous resolves to "do not bypass".

use thiserror::Error;

/// Top-level application error
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("Transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Configuration-related errors
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration: {0}")]
    Load(String),

    #[error("Invalid configuration: {message}")]
    Invalid { message: String },

    #[error("Failed to parse bypass rules from {source_name}: {reason}")]
    Parse { source_name: String, reason: String },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl ConfigError {
    pub fn parse(source_name: impl Into<String>, reason: impl ToString) -> Self {
        Self::Parse {
            source_name: source_name.into(),
            reason: reason.to_string(),
        }
    }
}

/// Transport layer errors
#[derive(Error, Debug)]
pub enum TransportError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid bind address: {0}")]
    InvalidAddress(#[from] std::net::AddrParseError),
}

/// Result type alias for the application
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_error_message() {
        let err = ConfigError::parse("rules.json", "expected value at line 1 column 1");
        let msg = err.to_string();
        assert!(msg.contains("rules.json"));
        assert!(msg.contains("line 1"));
    }

    #[test]
    fn test_app_error_from_config() {
        let err: AppError = ConfigError::Invalid {
            message: "server.port must be greater than 0".to_string(),
        }
        .into();
        assert!(matches!(err, AppError::Config(ConfigError::Invalid { .. })));
        assert!(err.to_string().contains("server.port"));
    }
}
