//! Compiled bypass rules
//!
//! [`HostSettings`] is the plain deserialized form. [`HostRuleSet`] and
//! [`BypassConfig`] are built from it by pure functions: patterns compiled,
//! operation names collected into a set. Nothing here is mutated after
//! construction.

use crate::bypass::patterns::PathPatternSet;
use crate::config::{HostSettings, HostSettingsMap, parse_rules};
use crate::error::ConfigError;
use std::collections::{HashMap, HashSet};

/// Bypass rules for a single host
#[derive(Debug, Clone, Default)]
pub struct HostRuleSet {
    allow_options_requests: bool,
    ignore_paths: PathPatternSet,
    ignored_operations: HashSet<String>,
}

impl HostRuleSet {
    /// Build a rule set from host settings
    ///
    /// Never fails: every pattern string compiles, and duplicate operation
    /// names collapse silently.
    pub fn new(settings: &HostSettings) -> Self {
        Self {
            allow_options_requests: settings.allow_options_requests,
            ignore_paths: PathPatternSet::new(&settings.ignore_paths),
            ignored_operations: settings.ignore_graphql_operations.iter().cloned().collect(),
        }
    }

    pub fn allows_options_requests(&self) -> bool {
        self.allow_options_requests
    }

    pub fn ignore_paths(&self) -> &PathPatternSet {
        &self.ignore_paths
    }

    pub fn ignored_operations(&self) -> &HashSet<String> {
        &self.ignored_operations
    }

    /// Exact, case-sensitive membership check
    pub fn ignores_operation(&self, name: &str) -> bool {
        self.ignored_operations.contains(name)
    }
}

impl From<&HostSettings> for HostRuleSet {
    fn from(settings: &HostSettings) -> Self {
        Self::new(settings)
    }
}

/// Host name to compiled rules, for every configured host
#[derive(Debug, Clone, Default)]
pub struct BypassConfig {
    hosts: HashMap<String, HostRuleSet>,
}

impl BypassConfig {
    /// A configuration with no hosts (nothing is ever bypassed)
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build from deserialized host settings
    pub fn from_settings(hosts: &HostSettingsMap) -> Self {
        Self {
            hosts: hosts
                .iter()
                .map(|(host, settings)| (host.clone(), HostRuleSet::new(settings)))
                .collect(),
        }
    }

    /// Decode a JSON rules document and build from it
    ///
    /// Fails as a whole on malformed input; no partial configuration is built.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let hosts = parse_rules(json, "inline rules")?;
        Ok(Self::from_settings(&hosts))
    }

    /// Look up a host (exact, case-sensitive)
    pub fn host(&self, host: &str) -> Option<&HostRuleSet> {
        self.hosts.get(host)
    }

    pub fn hosts(&self) -> impl Iterator<Item = (&str, &HostRuleSet)> {
        self.hosts.iter().map(|(host, rules)| (host.as_str(), rules))
    }

    pub fn len(&self) -> usize {
        self.hosts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hosts.is_empty()
    }
}
