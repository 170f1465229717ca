//! Caching of per-date search context.
//!
//! Working out which services run on a date, and restricting route
//! connectivity to them, is the same for every search on that date. The
//! result is cached per graph version and date, so a rebuilt graph never
//! sees a stale entry.

use std::sync::Arc;
use std::time::Duration;

use chrono::NaiveDate;
use moka::sync::Cache as MokaCache;

use crate::graph::{DataVersion, Graph};
use crate::planner::DayContext;

/// Cache key for day contexts: (graph version, date).
type DayKey = (DataVersion, NaiveDate);

/// Configuration for the cache.
#[derive(Debug, Clone)]
pub struct CacheConfig {
    /// TTL for cached entries.
    pub ttl: Duration,

    /// Maximum number of cached entries.
    pub max_capacity: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            ttl: Duration::from_secs(6 * 60 * 60),
            max_capacity: 64,
        }
    }
}

/// Day contexts shared between searches.
pub struct DayCache {
    days: MokaCache<DayKey, Arc<DayContext>>,

    /// Most changes the cached connectivity answers for.
    max_degree: usize,
}

impl DayCache {
    /// Create a new cache with the given configuration.
    pub fn new(config: &CacheConfig, max_degree: usize) -> Self {
        let days = MokaCache::builder()
            .time_to_live(config.ttl)
            .max_capacity(config.max_capacity)
            .build();

        Self { days, max_degree }
    }

    /// The context for `date` on `graph`, computing it on first use.
    ///
    /// Concurrent callers asking for the same key wait for a single
    /// computation.
    pub fn get(&self, graph: &Graph, date: NaiveDate) -> Arc<DayContext> {
        let key = (graph.version().clone(), date);
        self.days
            .get_with(key, || Arc::new(DayContext::new(graph, date, self.max_degree)))
    }

    /// Get cache statistics (for monitoring).
    pub fn entry_count(&self) -> u64 {
        self.days.run_pending_tasks();
        self.days.entry_count()
    }

    /// Invalidate all cached entries.
    pub fn invalidate_all(&self) {
        self.days.invalidate_all();
    }
}
