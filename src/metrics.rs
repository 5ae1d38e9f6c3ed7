//! Decision metrics
//!
//! Lock-free counters for bypass decisions, exposed as a serializable
//! snapshot.

use crate::bypass::{BypassDecision, BypassReason, EnforceReason};
use serde::Serialize;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{Duration, Instant, SystemTime};

/// Decision metrics collector
pub struct DecisionMetrics {
    /// Collector start time
    start_time: Instant,
    /// Start time as SystemTime (for display)
    start_system_time: SystemTime,
    total: AtomicU64,
    bypassed_options: AtomicU64,
    bypassed_paths: AtomicU64,
    bypassed_operations: AtomicU64,
    enforced_unknown_host: AtomicU64,
    enforced_no_match: AtomicU64,
}

/// Overall metrics snapshot for the API
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MetricsSnapshot {
    pub uptime_secs: u64,
    pub start_time: u64,
    pub total_decisions: u64,
    pub bypassed: u64,
    pub enforced: u64,
    pub by_reason: ReasonCounts,
}

/// Per-reason decision counts
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReasonCounts {
    pub options_request: u64,
    pub ignored_path: u64,
    pub ignored_operation: u64,
    pub unknown_host: u64,
    pub no_rule_matched: u64,
}

impl DecisionMetrics {
    pub fn new() -> Self {
        Self {
            start_time: Instant::now(),
            start_system_time: SystemTime::now(),
            total: AtomicU64::new(0),
            bypassed_options: AtomicU64::new(0),
            bypassed_paths: AtomicU64::new(0),
            bypassed_operations: AtomicU64::new(0),
            enforced_unknown_host: AtomicU64::new(0),
            enforced_no_match: AtomicU64::new(0),
        }
    }

    /// Record one decision
    pub fn record(&self, decision: &BypassDecision) {
        self.total.fetch_add(1, Ordering::Relaxed);

        let counter = match decision {
            BypassDecision::Bypass(BypassReason::OptionsRequest) => &self.bypassed_options,
            BypassDecision::Bypass(BypassReason::IgnoredPath) => &self.bypassed_paths,
            BypassDecision::Bypass(BypassReason::IgnoredOperation) => &self.bypassed_operations,
            BypassDecision::Enforce(EnforceReason::UnknownHost) => &self.enforced_unknown_host,
            BypassDecision::Enforce(EnforceReason::NoRuleMatched) => &self.enforced_no_match,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    /// Get a snapshot of all metrics
    pub fn snapshot(&self) -> MetricsSnapshot {
        let by_reason = ReasonCounts {
            options_request: self.bypassed_options.load(Ordering::Relaxed),
            ignored_path: self.bypassed_paths.load(Ordering::Relaxed),
            ignored_operation: self.bypassed_operations.load(Ordering::Relaxed),
            unknown_host: self.enforced_unknown_host.load(Ordering::Relaxed),
            no_rule_matched: self.enforced_no_match.load(Ordering::Relaxed),
        };

        let start_time = self
            .start_system_time
            .duration_since(SystemTime::UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or(0);

        MetricsSnapshot {
            uptime_secs: self.uptime().as_secs(),
            start_time,
            total_decisions: self.total.load(Ordering::Relaxed),
            bypassed: by_reason.options_request
                + by_reason.ignored_path
                + by_reason.ignored_operation,
            enforced: by_reason.unknown_host + by_reason.no_rule_matched,
            by_reason,
        }
    }

    pub fn uptime(&self) -> Duration {
        self.start_time.elapsed()
    }

    pub fn total_decisions(&self) -> u64 {
        self.total.load(Ordering::Relaxed)
    }
}

impl Default for DecisionMetrics {
    fn default() -> Self {
        Self::new()
    }
}
