//! Hot-swappable engine handle
//!
//! Readers load one complete [`BypassEngine`] snapshot per decision. Reloads
//! build a new engine off to the side and swap it in whole, so a reader sees
//! either the old rules or the new ones, never a mix.

use crate::bypass::engine::{BypassDecision, BypassEngine};
use crate::bypass::request::RequestDescriptor;
use crate::bypass::rules::BypassConfig;
use crate::config::load_rules;
use crate::error::ConfigError;
use arc_swap::ArcSwap;
use std::path::Path;
use std::sync::Arc;
use tracing::{error, info};

/// Shared, atomically replaceable bypass engine
#[derive(Debug)]
pub struct SharedBypassEngine {
    current: ArcSwap<BypassEngine>,
}

impl SharedBypassEngine {
    pub fn new(engine: BypassEngine) -> Self {
        Self {
            current: ArcSwap::from_pointee(engine),
        }
    }

    /// Current engine snapshot
    pub fn load(&self) -> Arc<BypassEngine> {
        self.current.load_full()
    }

    pub fn decide(&self, request: &RequestDescriptor) -> bool {
        self.current.load().decide(request)
    }

    pub fn evaluate(&self, request: &RequestDescriptor) -> BypassDecision {
        self.current.load().evaluate(request)
    }

    /// Replace the whole engine
    pub fn replace(&self, engine: BypassEngine) {
        self.current.store(Arc::new(engine));
    }

    /// Rebuild from a rules file and swap it in
    ///
    /// On failure the current engine stays in place. Returns the number of
    /// configured hosts on success.
    pub fn reload_from_file(&self, path: impl AsRef<Path>) -> Result<usize, ConfigError> {
        let path = path.as_ref();
        let hosts = load_rules(path).inspect_err(|e| {
            error!(path = %path.display(), error = %e, "Failed to reload bypass rules, keeping current rules");
        })?;

        let config = BypassConfig::from_settings(&hosts);
        let host_count = config.len();
        self.replace(BypassEngine::new(config));

        info!(path = %path.display(), hosts = host_count, "Bypass rules reloaded");
        Ok(host_count)
    }
}

impl Default for SharedBypassEngine {
    fn default() -> Self {
        Self::new(BypassEngine::default())
    }
}
