//! Subscriber provisioning from billing events.

use super::error::{AccountError, AccountResult};
use super::store::AccountStore;
use super::subscriber::Subscriber;
use crate::config::PlanTier;
use rand::distr::{Alphanumeric, SampleString};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;

/// Length of the random portion of a generated credential.
const CREDENTIAL_TOKEN_LEN: usize = 43;

/// A completed-checkout event from the billing system.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BillingEvent {
    /// Customer email.
    pub email: String,

    /// Purchased plan tier.
    pub plan: PlanTier,
}

/// Turns billing events into subscriber records.
pub struct Provisioner {
    /// The account store new subscribers are registered in.
    store: Arc<AccountStore>,

    /// Prefix for generated credentials.
    prefix: String,

    /// Whether the billing integration is configured.
    enabled: bool,
}

impl std::fmt::Debug for Provisioner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Provisioner")
            .field("prefix", &self.prefix)
            .field("enabled", &self.enabled)
            .finish()
    }
}

impl Provisioner {
    /// Create a provisioner backed by the given store.
    #[must_use]
    pub fn new(store: Arc<AccountStore>, prefix: impl Into<String>, enabled: bool) -> Self {
        Self {
            store,
            prefix: prefix.into(),
            enabled,
        }
    }

    /// Provision a new subscriber from a billing event.
    ///
    /// Generates a unique credential with zero usage. Credential collisions
    /// are resolved by regenerating, so the returned subscriber's
    /// credential is always previously unseen.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::NotConfigured` when the billing integration
    /// is disabled.
    pub fn provision(&self, event: BillingEvent) -> AccountResult<Arc<Subscriber>> {
        if !self.enabled {
            return Err(AccountError::NotConfigured);
        }

        loop {
            let credential = self.generate_credential();
            let subscriber = Arc::new(Subscriber::new(&credential, &event.email, event.plan));

            match self.store.insert(Arc::clone(&subscriber)) {
                Ok(()) => {
                    info!(email = %event.email, plan = %event.plan, "new subscriber provisioned");
                    return Ok(subscriber);
                },
                Err(AccountError::DuplicateCredential(_)) => continue,
                Err(e) => return Err(e),
            }
        }
    }

    /// Generate a fresh `<prefix>_<token>` credential.
    fn generate_credential(&self) -> String {
        let token = Alphanumeric.sample_string(&mut rand::rng(), CREDENTIAL_TOKEN_LEN);
        format!("{}_{}", self.prefix, token)
    }
}
