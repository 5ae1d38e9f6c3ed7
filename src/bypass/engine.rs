//! Bypass decision engine
//!
//! Evaluates a request against its host's rules in this order, stopping at
//! the first that applies:
//! 1. Unknown host: never bypass
//! 2. `OPTIONS` request on a host with `allowOptionsRequests`
//! 3. Path matches an ignore pattern
//! 4. Body carries a GraphQL query whose extracted name is ignored
//!
//! Everything else proceeds to normal authorization.

use crate::bypass::operation::extract_operation_name;
use crate::bypass::request::RequestDescriptor;
use crate::bypass::rules::{BypassConfig, HostRuleSet};
use serde::Serialize;
use std::fmt;
use std::sync::Arc;
use tracing::{debug, trace};

/// HTTP method that `allowOptionsRequests` applies to (exact, case-sensitive)
const OPTIONS_METHOD: &str = "OPTIONS";

/// Why a request skipped authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BypassReason {
    OptionsRequest,
    IgnoredPath,
    IgnoredOperation,
}

impl BypassReason {
    pub const fn as_str(&self) -> &'static str {
        match self {
            BypassReason::OptionsRequest => "options_request",
            BypassReason::IgnoredPath => "ignored_path",
            BypassReason::IgnoredOperation => "ignored_operation",
        }
    }
}

impl fmt::Display for BypassReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Why a request proceeds to authorization
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum EnforceReason {
    /// No rules configured for the host
    UnknownHost,
    /// Host is configured but no rule applied
    NoRuleMatched,
}

/// Result of a bypass evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BypassDecision {
    /// Skip authorization
    Bypass(BypassReason),
    /// Continue to normal authorization
    Enforce(EnforceReason),
}

impl BypassDecision {
    pub fn is_bypass(&self) -> bool {
        matches!(self, BypassDecision::Bypass(_))
    }

    pub fn bypass_reason(&self) -> Option<BypassReason> {
        match self {
            BypassDecision::Bypass(reason) => Some(*reason),
            BypassDecision::Enforce(_) => None,
        }
    }
}

/// Decides whether requests skip authorization
///
/// Holds an immutable [`BypassConfig`]; evaluation takes `&self` and touches
/// no shared mutable state, so one engine serves any number of threads.
#[derive(Debug, Clone, Default)]
pub struct BypassEngine {
    config: Arc<BypassConfig>,
}

impl BypassEngine {
    pub fn new(config: BypassConfig) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Share an already-built configuration
    pub fn with_shared(config: Arc<BypassConfig>) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &BypassConfig {
        &self.config
    }

    /// Whether the request should skip authorization
    pub fn decide(&self, request: &RequestDescriptor) -> bool {
        self.evaluate(request).is_bypass()
    }

    /// Evaluate a request, returning which rule decided it
    pub fn evaluate(&self, request: &RequestDescriptor) -> BypassDecision {
        let Some(rules) = self.config.host(&request.host) else {
            debug!(host = %request.host, "No bypass rules for host");
            return BypassDecision::Enforce(EnforceReason::UnknownHost);
        };

        let decision = Self::evaluate_host(rules, request);
        debug!(
            host = %request.host,
            method = %request.method,
            path = %request.path,
            decision = ?decision,
            "Evaluated bypass rules"
        );
        decision
    }

    fn evaluate_host(rules: &HostRuleSet, request: &RequestDescriptor) -> BypassDecision {
        // 1. OPTIONS requests
        if rules.allows_options_requests() && request.method == OPTIONS_METHOD {
            trace!("Matched OPTIONS bypass");
            return BypassDecision::Bypass(BypassReason::OptionsRequest);
        }

        // 2. Ignore paths
        if let Some(pattern) = rules.ignore_paths().find_match(&request.path) {
            trace!(pattern, "Matched ignore path");
            return BypassDecision::Bypass(BypassReason::IgnoredPath);
        }

        // 3. GraphQL operations
        if rules.ignored_operations().is_empty() {
            return BypassDecision::Enforce(EnforceReason::NoRuleMatched);
        }
        let Some(operation) = extract_operation_name(&request.body) else {
            trace!("No GraphQL operation in body");
            return BypassDecision::Enforce(EnforceReason::NoRuleMatched);
        };
        if rules.ignores_operation(&operation) {
            trace!(operation = %operation, "Matched ignored GraphQL operation");
            return BypassDecision::Bypass(BypassReason::IgnoredOperation);
        }

        trace!(operation = %operation, "GraphQL operation not ignored");
        BypassDecision::Enforce(EnforceReason::NoRuleMatched)
    }
}
