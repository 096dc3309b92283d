//! The in-memory account store.

use super::error::{AccountError, AccountResult};
use super::subscriber::Subscriber;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use tracing::debug;

/// Owned, process-lifetime store of subscriber records.
///
/// Constructed once at process start and handed by `Arc` to whoever needs
/// credential resolution. Subscribers are never removed.
#[derive(Debug, Default)]
pub struct AccountStore {
    /// Subscribers keyed by credential.
    subscribers: RwLock<HashMap<String, Arc<Subscriber>>>,
}

impl AccountStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve a credential to its subscriber.
    #[must_use]
    pub fn resolve(&self, credential: &str) -> Option<Arc<Subscriber>> {
        self.subscribers
            .read()
            .unwrap()
            .get(credential)
            .map(Arc::clone)
    }

    /// Check whether a credential is known.
    #[must_use]
    pub fn contains(&self, credential: &str) -> bool {
        self.subscribers.read().unwrap().contains_key(credential)
    }

    /// Insert a freshly provisioned subscriber.
    ///
    /// # Errors
    ///
    /// Returns `AccountError::DuplicateCredential` if the credential is
    /// already taken; the caller regenerates and retries.
    pub fn insert(&self, subscriber: Arc<Subscriber>) -> AccountResult<()> {
        let mut subscribers = self.subscribers.write().unwrap();

        if subscribers.contains_key(subscriber.credential()) {
            return Err(AccountError::DuplicateCredential(
                subscriber.credential().to_string(),
            ));
        }

        debug!(
            credential = subscriber.credential(),
            plan = %subscriber.plan(),
            "subscriber registered"
        );
        subscribers.insert(subscriber.credential().to_string(), subscriber);
        Ok(())
    }

    /// Number of known subscribers.
    #[must_use]
    pub fn len(&self) -> usize {
        self.subscribers.read().unwrap().len()
    }

    /// Returns `true` if no subscribers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.subscribers.read().unwrap().is_empty()
    }

    /// Zero every subscriber's committed usage.
    ///
    /// The period-boundary hook for the external reset scheduler.
    pub fn reset_all_usage(&self) {
        let subscribers = self.subscribers.read().unwrap();
        for subscriber in subscribers.values() {
            subscriber.reset_usage();
        }
        debug!(count = subscribers.len(), "usage counters reset");
    }
}
