//! Per-subscriber limiter registry.

use super::bucket::TokenBucket;
use crate::config::PlanTable;
use crate::modules::accounts::Subscriber;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::Duration;
use tracing::debug;

/// Decision from a rate limit check.
#[derive(Debug, Clone)]
pub struct RateDecision {
    /// Whether the request is allowed.
    pub allowed: bool,

    /// Tokens remaining after this decision.
    pub remaining: u64,

    /// Burst capacity of the deciding bucket.
    pub limit: u64,

    /// Time until a token becomes available (zero when allowed).
    pub retry_after: Duration,
}

impl RateDecision {
    /// Create an "allowed" decision.
    #[inline]
    #[must_use]
    pub fn allowed(remaining: u64, limit: u64) -> Self {
        Self {
            allowed: true,
            remaining,
            limit,
            retry_after: Duration::ZERO,
        }
    }

    /// Create a "denied" decision.
    #[inline]
    #[must_use]
    pub fn denied(limit: u64, retry_after: Duration) -> Self {
        Self {
            allowed: false,
            remaining: 0,
            limit,
            retry_after,
        }
    }

    /// Get retry-after in whole seconds (for a Retry-After header).
    #[inline]
    #[must_use]
    pub fn retry_after_secs(&self) -> u64 {
        self.retry_after.as_secs().max(1)
    }
}

/// Registry of per-subscriber token buckets.
///
/// Buckets are created on a subscriber's first rate-gated request with the
/// rate and burst of the plan at that moment, and live for the process
/// lifetime. Creation is guarded against the check-then-insert race so a
/// subscriber's concurrent first requests resolve to exactly one bucket.
pub struct LimiterRegistry {
    /// Plan table, the source of per-tier rate parameters.
    plans: PlanTable,

    /// Buckets keyed by subscriber credential.
    buckets: RwLock<HashMap<String, Arc<TokenBucket>>>,

    /// Stats: total checks.
    total_checks: AtomicU64,

    /// Stats: total allowed.
    total_allowed: AtomicU64,

    /// Stats: total denied.
    total_denied: AtomicU64,
}

impl std::fmt::Debug for LimiterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LimiterRegistry")
            .field("active_buckets", &self.active_count())
            .field("total_checks", &self.total_checks)
            .field("total_allowed", &self.total_allowed)
            .field("total_denied", &self.total_denied)
            .finish()
    }
}

impl LimiterRegistry {
    /// Create a new registry over the given plan table.
    #[must_use]
    pub fn new(plans: PlanTable) -> Self {
        Self {
            plans,
            buckets: RwLock::new(HashMap::new()),
            total_checks: AtomicU64::new(0),
            total_allowed: AtomicU64::new(0),
            total_denied: AtomicU64::new(0),
        }
    }

    /// Check whether a request from this subscriber is within its rate budget.
    pub fn allow(&self, subscriber: &Subscriber) -> RateDecision {
        self.total_checks.fetch_add(1, Ordering::Relaxed);

        let bucket = self.get_or_create_bucket(subscriber);

        if bucket.try_acquire() {
            self.total_allowed.fetch_add(1, Ordering::Relaxed);
            RateDecision::allowed(
                bucket.available_tokens() as u64,
                u64::from(bucket.capacity()),
            )
        } else {
            self.total_denied.fetch_add(1, Ordering::Relaxed);
            debug!(
                credential = subscriber.credential(),
                "rate limit exceeded"
            );
            RateDecision::denied(u64::from(bucket.capacity()), bucket.time_until_ready())
        }
    }

    /// Get or create the bucket for a subscriber.
    fn get_or_create_bucket(&self, subscriber: &Subscriber) -> Arc<TokenBucket> {
        // Try read lock first
        {
            let buckets = self.buckets.read().unwrap();
            if let Some(bucket) = buckets.get(subscriber.credential()) {
                return Arc::clone(bucket);
            }
        }

        // Need to create - get write lock
        let mut buckets = self.buckets.write().unwrap();

        // Double-check after acquiring write lock
        if let Some(bucket) = buckets.get(subscriber.credential()) {
            return Arc::clone(bucket);
        }

        // Plan parameters are bound here, at creation time
        let plan = self.plans.get(subscriber.plan());
        let bucket = Arc::new(TokenBucket::new(plan.burst_capacity, plan.refill_rate));
        debug!(
            credential = subscriber.credential(),
            plan = %subscriber.plan(),
            burst = plan.burst_capacity,
            "limiter created"
        );
        buckets.insert(subscriber.credential().to_string(), Arc::clone(&bucket));

        bucket
    }

    /// Number of active limiter instances.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.buckets.read().unwrap().len()
    }

    /// Total checks performed.
    #[must_use]
    pub fn total_checks(&self) -> u64 {
        self.total_checks.load(Ordering::Relaxed)
    }

    /// Total permits granted.
    #[must_use]
    pub fn total_allowed(&self) -> u64 {
        self.total_allowed.load(Ordering::Relaxed)
    }

    /// Total permits denied.
    #[must_use]
    pub fn total_denied(&self) -> u64 {
        self.total_denied.load(Ordering::Relaxed)
    }
}
