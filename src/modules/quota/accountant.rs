//! The quota accountant.

use crate::config::{PlanTable, Quota};
use crate::modules::accounts::Subscriber;
use std::sync::Arc;
use tracing::debug;

/// Outcome of a quota check.
#[derive(Debug, Clone, Copy)]
pub struct QuotaDecision {
    /// Whether another billable operation is allowed.
    pub allowed: bool,

    /// Committed usage at decision time.
    pub used: u64,

    /// The plan ceiling the decision was made against.
    pub ceiling: Quota,
}

/// A reserved quota slot for one in-flight request.
///
/// Dropping the reservation releases the slot without billing it; call
/// [`commit`](Self::commit) once a billable computation actually
/// completed.
#[derive(Debug)]
pub struct QuotaReservation {
    subscriber: Arc<Subscriber>,
    committed: bool,
}

impl QuotaReservation {
    /// Convert the reservation into a committed usage increment.
    pub fn commit(mut self) {
        self.subscriber.commit_reservation();
        self.committed = true;
    }
}

impl Drop for QuotaReservation {
    fn drop(&mut self) {
        if !self.committed {
            self.subscriber.release_reservation();
        }
    }
}

/// Enforces monthly plan ceilings on billable operations.
#[derive(Debug)]
pub struct QuotaAccountant {
    /// Plan table, the source of per-tier ceilings.
    plans: PlanTable,
}

impl QuotaAccountant {
    /// Create an accountant over the given plan table.
    #[must_use]
    pub fn new(plans: PlanTable) -> Self {
        Self { plans }
    }

    /// The ceiling that applies to a subscriber.
    #[must_use]
    pub fn ceiling_for(&self, subscriber: &Subscriber) -> Quota {
        self.plans.get(subscriber.plan()).reports_per_month
    }

    /// Check whether the subscriber is under their ceiling.
    ///
    /// Read-only; live reservations count toward the ceiling.
    #[must_use]
    pub fn check(&self, subscriber: &Subscriber) -> QuotaDecision {
        let ceiling = self.ceiling_for(subscriber);
        QuotaDecision {
            allowed: ceiling.allows(subscriber.usage() + subscriber.in_flight()),
            used: subscriber.usage(),
            ceiling,
        }
    }

    /// Atomically reserve one slot for an in-flight request.
    ///
    /// # Errors
    ///
    /// Returns the denying decision when the ceiling is reached.
    pub fn reserve(&self, subscriber: &Arc<Subscriber>) -> Result<QuotaReservation, QuotaDecision> {
        let ceiling = self.ceiling_for(subscriber);

        match subscriber.try_reserve(ceiling) {
            Ok(()) => Ok(QuotaReservation {
                subscriber: Arc::clone(subscriber),
                committed: false,
            }),
            Err(used) => {
                debug!(
                    credential = subscriber.credential(),
                    used,
                    ceiling = %ceiling,
                    "quota exceeded"
                );
                Err(QuotaDecision {
                    allowed: false,
                    used,
                    ceiling,
                })
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::PlanTier;

    fn accountant() -> QuotaAccountant {
        QuotaAccountant::new(PlanTable::default())
    }

    #[test]
    fn test_check_under_ceiling() {
        let accountant = accountant();
        let sub = Subscriber::new("seo_k1", "a@b.com", PlanTier::Starter);

        let decision = accountant.check(&sub);
        assert!(decision.allowed);
        assert_eq!(decision.used, 0);
        assert_eq!(decision.ceiling, Quota::Limited(10));
    }

    #[test]
    fn test_reserve_to_ceiling() {
        let accountant = accountant();
        let sub = Arc::new(Subscriber::new("seo_k1", "a@b.com", PlanTier::Starter));

        // starter ceiling is 10
        for _ in 0..10 {
            accountant.reserve(&sub).unwrap().commit();
        }
        assert_eq!(sub.usage(), 10);

        let denied = accountant.reserve(&sub).unwrap_err();
        assert!(!denied.allowed);
        assert_eq!(denied.used, 10);
        assert_eq!(sub.usage(), 10);
    }

    #[test]
    fn test_dropped_reservation_is_not_billed() {
        let accountant = accountant();
        let sub = Arc::new(Subscriber::new("seo_k1", "a@b.com", PlanTier::Starter));

        {
            let _reservation = accountant.reserve(&sub).unwrap();
            assert_eq!(sub.in_flight(), 1);
        }

        assert_eq!(sub.usage(), 0);
        assert_eq!(sub.in_flight(), 0);
    }

    #[test]
    fn test_unlimited_plan_never_denied() {
        let accountant = accountant();
        let sub = Arc::new(Subscriber::new("seo_k1", "a@b.com", PlanTier::Agency));

        for _ in 0..1000 {
            accountant.reserve(&sub).unwrap().commit();
        }
        assert!(accountant.check(&sub).allowed);
        assert!(accountant.ceiling_for(&sub).is_unlimited());
    }

    #[test]
    fn test_live_reservations_count_toward_ceiling() {
        let accountant = accountant();
        let sub = Arc::new(Subscriber::new("seo_k1", "a@b.com", PlanTier::Starter));

        let reservations: Vec<_> = (0..10)
            .map(|_| accountant.reserve(&sub).unwrap())
            .collect();

        assert!(!accountant.check(&sub).allowed);
        assert!(accountant.reserve(&sub).is_err());

        drop(reservations);
        assert!(accountant.check(&sub).allowed);
    }
}
