//! Readiness checks.
//!
//! Each check reports whether one dependency of journey planning is usable.
//! The registry combines them for the `/health` endpoint.

use std::sync::Arc;
use std::time::Duration;

use moka::sync::Cache as MokaCache;
use tracing::warn;

use crate::graph::GraphStore;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HealthStatus {
    Healthy,
    Unhealthy(String),
}

impl HealthStatus {
    pub fn is_healthy(&self) -> bool {
        matches!(self, HealthStatus::Healthy)
    }
}

pub trait HealthCheck: Send + Sync {
    fn name(&self) -> &str;

    fn check(&self) -> HealthStatus;
}

#[derive(Debug, Clone)]
pub struct HealthConfig {
    /// How long a check result is reused before the check runs again.
    pub ttl: Duration,
}

impl Default for HealthConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(30),
        }
    }
}

/// Healthy when a read transaction can be opened on the graph.
pub struct GraphHealthCheck {
    store: Arc<dyn GraphStore>,
}

impl GraphHealthCheck {
    pub fn new(store: Arc<dyn GraphStore>) -> Self {
        Self { store }
    }
}

impl HealthCheck for GraphHealthCheck {
    fn name(&self) -> &str {
        "graph"
    }

    fn check(&self) -> HealthStatus {
        match self.store.begin_read() {
            Ok(txn) if txn.node_count() > 0 => HealthStatus::Healthy,
            Ok(_) => HealthStatus::Unhealthy("graph is empty".to_string()),
            Err(err) => HealthStatus::Unhealthy(err.to_string()),
        }
    }
}

/// Reuses another check's result for the configured TTL.
pub struct CachedHealthCheck<C> {
    inner: C,
    results: MokaCache<(), HealthStatus>,
}

impl<C: HealthCheck> CachedHealthCheck<C> {
    pub fn new(inner: C, config: &HealthConfig) -> Self {
        let results = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(1)
            .build();
        Self { inner, results }
    }

    /// Forget the cached result so the next check runs again.
    pub fn invalidate(&self) {
        self.results.invalidate_all();
    }
}

impl<C: HealthCheck> HealthCheck for CachedHealthCheck<C> {
    fn name(&self) -> &str {
        self.inner.name()
    }

    fn check(&self) -> HealthStatus {
        self.results.get_with((), || self.inner.check())
    }
}

#[derive(Default)]
pub struct HealthRegistry {
    checks: Vec<Box<dyn HealthCheck>>,
}

impl HealthRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, check: impl HealthCheck + 'static) {
        self.checks.push(Box::new(check));
    }

    pub fn with(mut self, check: impl HealthCheck + 'static) -> Self {
        self.register(check);
        self
    }

    /// Run every check. `Ok` if all pass, otherwise the names of those
    /// that failed.
    pub fn overall(&self) -> Result<(), Vec<String>> {
        let failing: Vec<String> = self
            .checks
            .iter()
            .filter_map(|check| match check.check() {
                HealthStatus::Healthy => None,
                HealthStatus::Unhealthy(reason) => {
                    warn!(check = check.name(), %reason, "health check failed");
                    Some(check.name().to_string())
                }
            })
            .collect();
        if failing.is_empty() {
            Ok(())
        } else {
            Err(failing)
        }
    }
}
