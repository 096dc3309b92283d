//! Subscriber records and usage accounting state.

use crate::config::{PlanTier, Quota};
use chrono::{DateTime, Utc};
use std::sync::Mutex;

/// Current-period usage for one subscriber.
///
/// `committed` counts completed billable operations; `reserved` counts
/// operations that passed the quota gate but have not finished yet. The
/// ceiling check compares the ceiling against the sum of both, so two
/// concurrent requests cannot share the last remaining slot.
#[derive(Debug, Default, Clone, Copy)]
struct UsageState {
    committed: u64,
    reserved: u64,
}

/// An authenticated tenant of the service.
///
/// Identity fields are immutable after provisioning; the usage counter is
/// mutex-protected so quota accounting stays race-free across a
/// subscriber's own concurrent requests.
#[derive(Debug)]
pub struct Subscriber {
    /// Opaque unique credential (API key).
    credential: String,

    /// Contact email from the billing event.
    email: String,

    /// Subscription plan tier.
    plan: PlanTier,

    /// When the subscriber was provisioned.
    created_at: DateTime<Utc>,

    /// Current-period usage.
    usage: Mutex<UsageState>,
}

impl Subscriber {
    /// Create a new subscriber with zero usage.
    #[must_use]
    pub fn new(credential: impl Into<String>, email: impl Into<String>, plan: PlanTier) -> Self {
        Self {
            credential: credential.into(),
            email: email.into(),
            plan,
            created_at: Utc::now(),
            usage: Mutex::new(UsageState::default()),
        }
    }

    /// The subscriber's credential.
    #[must_use]
    pub fn credential(&self) -> &str {
        &self.credential
    }

    /// The subscriber's contact email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// The subscriber's plan tier.
    #[must_use]
    pub fn plan(&self) -> PlanTier {
        self.plan
    }

    /// When the subscriber was provisioned.
    #[must_use]
    pub fn created_at(&self) -> DateTime<Utc> {
        self.created_at
    }

    /// Completed billable operations this period.
    #[must_use]
    pub fn usage(&self) -> u64 {
        self.usage.lock().unwrap().committed
    }

    /// Operations currently holding a quota reservation.
    #[must_use]
    pub fn in_flight(&self) -> u64 {
        self.usage.lock().unwrap().reserved
    }

    /// Atomically reserve one quota slot against the given ceiling.
    ///
    /// # Errors
    ///
    /// Returns the committed usage at the time of denial.
    pub fn try_reserve(&self, ceiling: Quota) -> Result<(), u64> {
        let mut state = self.usage.lock().unwrap();
        if ceiling.allows(state.committed + state.reserved) {
            state.reserved += 1;
            Ok(())
        } else {
            Err(state.committed)
        }
    }

    /// Convert one reservation into a committed usage increment.
    pub fn commit_reservation(&self) {
        let mut state = self.usage.lock().unwrap();
        state.reserved = state.reserved.saturating_sub(1);
        state.committed += 1;
    }

    /// Release one reservation without billing it.
    pub fn release_reservation(&self) {
        let mut state = self.usage.lock().unwrap();
        state.reserved = state.reserved.saturating_sub(1);
    }

    /// Zero the committed usage counter.
    ///
    /// Called by the external period-reset scheduler at a billing period
    /// boundary; in-flight reservations are left untouched.
    pub fn reset_usage(&self) {
        self.usage.lock().unwrap().committed = 0;
    }
}
