//! Prometheus registry bridge.

use super::reporter::MetricsSnapshot;
use prometheus_client::encoding::text::encode;
use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

/// Bridges gateway snapshots into a `prometheus_client` registry.
///
/// The stores keep their own live atomic counters; this bridge advances
/// the registered Prometheus counters by the delta observed between
/// snapshots, so repeated scrapes never double count.
pub struct PrometheusBridge {
    registry: Registry,
    cache_hits: Counter,
    cache_misses: Counter,
    limiter_checks: Counter,
    limiter_allowed: Counter,
    limiter_denied: Counter,
    cached_entries: Gauge,
    active_subscribers: Gauge,
    active_limiters: Gauge,
}

impl std::fmt::Debug for PrometheusBridge {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PrometheusBridge").finish_non_exhaustive()
    }
}

impl PrometheusBridge {
    /// Create a bridge with all gateway metrics registered.
    #[must_use]
    pub fn new() -> Self {
        let mut registry = Registry::with_prefix("tollgate");

        let cache_hits = Counter::default();
        registry.register("cache_hits", "Total valid cache hits", cache_hits.clone());

        let cache_misses = Counter::default();
        registry.register("cache_misses", "Total cache misses", cache_misses.clone());

        let limiter_checks = Counter::default();
        registry.register(
            "limiter_checks",
            "Total rate limit checks",
            limiter_checks.clone(),
        );

        let limiter_allowed = Counter::default();
        registry.register(
            "limiter_allowed",
            "Rate permits granted",
            limiter_allowed.clone(),
        );

        let limiter_denied = Counter::default();
        registry.register(
            "limiter_denied",
            "Rate permits denied",
            limiter_denied.clone(),
        );

        let cached_entries = Gauge::default();
        registry.register(
            "cached_entries",
            "Physically present cache entries",
            cached_entries.clone(),
        );

        let active_subscribers = Gauge::default();
        registry.register(
            "active_subscribers",
            "Known subscribers",
            active_subscribers.clone(),
        );

        let active_limiters = Gauge::default();
        registry.register(
            "active_limiters",
            "Active limiter instances",
            active_limiters.clone(),
        );

        Self {
            registry,
            cache_hits,
            cache_misses,
            limiter_checks,
            limiter_allowed,
            limiter_denied,
            cached_entries,
            active_subscribers,
            active_limiters,
        }
    }

    /// Sync a snapshot into the registry.
    pub fn sync(&self, snapshot: &MetricsSnapshot) {
        advance_to(&self.cache_hits, snapshot.cache_hits);
        advance_to(&self.cache_misses, snapshot.cache_misses);
        advance_to(&self.limiter_checks, snapshot.limiter_checks);
        advance_to(&self.limiter_allowed, snapshot.limiter_allowed);
        advance_to(&self.limiter_denied, snapshot.limiter_denied);

        self.cached_entries.set(snapshot.cached_entries as i64);
        self.active_subscribers
            .set(snapshot.active_subscribers as i64);
        self.active_limiters.set(snapshot.active_limiters as i64);
    }

    /// Encode the registry in Prometheus text format.
    ///
    /// # Errors
    ///
    /// Returns a formatting error if encoding fails.
    pub fn encode(&self) -> Result<String, std::fmt::Error> {
        let mut output = String::new();
        encode(&mut output, &self.registry)?;
        Ok(output)
    }
}

impl Default for PrometheusBridge {
    fn default() -> Self {
        Self::new()
    }
}

/// Advance a monotonic counter to an observed absolute value.
fn advance_to(counter: &Counter, observed: u64) {
    let current = counter.get();
    if observed > current {
        counter.inc_by(observed - current);
    }
}
