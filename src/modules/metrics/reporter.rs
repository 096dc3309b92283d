//! The metrics reporter.

use super::registry::PrometheusBridge;
use crate::modules::accounts::AccountStore;
use crate::modules::rate_limiting::LimiterRegistry;
use crate::modules::result_cache::ResultCache;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::sync::Arc;

/// A point-in-time view of the gateway's operational counters.
#[derive(Debug, Clone, Serialize)]
pub struct MetricsSnapshot {
    /// Total valid cache hits.
    pub cache_hits: u64,

    /// Total cache misses.
    pub cache_misses: u64,

    /// Hit rate as a percentage, one decimal.
    pub cache_hit_rate: f64,

    /// Physically present cache entries.
    pub cached_entries: usize,

    /// Known subscribers.
    pub active_subscribers: usize,

    /// Active limiter instances.
    pub active_limiters: usize,

    /// Total rate checks performed.
    pub limiter_checks: u64,

    /// Rate permits granted.
    pub limiter_allowed: u64,

    /// Rate permits denied.
    pub limiter_denied: u64,

    /// When the snapshot was taken.
    pub generated_at: DateTime<Utc>,
}

/// Aggregates live counters from the stores.
///
/// Purely observational: taking a snapshot mutates nothing in the
/// observed stores.
pub struct MetricsReporter {
    accounts: Arc<AccountStore>,
    cache: Arc<ResultCache>,
    limiters: Arc<LimiterRegistry>,
    bridge: PrometheusBridge,
}

impl std::fmt::Debug for MetricsReporter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsReporter").finish_non_exhaustive()
    }
}

impl MetricsReporter {
    /// Create a reporter over the given stores.
    #[must_use]
    pub fn new(
        accounts: Arc<AccountStore>,
        cache: Arc<ResultCache>,
        limiters: Arc<LimiterRegistry>,
    ) -> Self {
        Self {
            accounts,
            cache,
            limiters,
            bridge: PrometheusBridge::new(),
        }
    }

    /// Take a snapshot of the current counters.
    #[must_use]
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            cache_hits: self.cache.hits(),
            cache_misses: self.cache.misses(),
            cache_hit_rate: self.cache.hit_rate(),
            cached_entries: self.cache.len(),
            active_subscribers: self.accounts.len(),
            active_limiters: self.limiters.active_count(),
            limiter_checks: self.limiters.total_checks(),
            limiter_allowed: self.limiters.total_allowed(),
            limiter_denied: self.limiters.total_denied(),
            generated_at: Utc::now(),
        }
    }

    /// Render the current counters in Prometheus text format.
    ///
    /// # Errors
    ///
    /// Returns a formatting error if encoding fails.
    pub fn encode_prometheus(&self) -> Result<String, std::fmt::Error> {
        let snapshot = self.snapshot();
        self.bridge.sync(&snapshot);
        self.bridge.encode()
    }
}
