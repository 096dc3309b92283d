//! Per-subscriber report history.

use crate::modules::analysis::OperationKind;
use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::RwLock;

/// One completed billable operation.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryRecord {
    /// The operation kind.
    pub operation: OperationKind,

    /// The original query string.
    pub query: String,

    /// The report's headline score.
    pub score: u64,

    /// When the operation completed.
    pub at: DateTime<Utc>,
}

/// Append-only log of completed operations, keyed by credential.
///
/// Cache hits are not recorded; only fresh computation lands here. Growth
/// is unbounded for the process lifetime, reads return the most recent N.
#[derive(Debug, Default)]
pub struct HistoryStore {
    records: RwLock<HashMap<String, Vec<HistoryRecord>>>,
}

impl HistoryStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a record to a subscriber's log.
    pub fn append(&self, credential: &str, record: HistoryRecord) {
        self.records
            .write()
            .unwrap()
            .entry(credential.to_string())
            .or_default()
            .push(record);
    }

    /// The most recent `n` records for a subscriber, oldest first.
    #[must_use]
    pub fn recent(&self, credential: &str, n: usize) -> Vec<HistoryRecord> {
        let records = self.records.read().unwrap();
        match records.get(credential) {
            Some(log) => log[log.len().saturating_sub(n)..].to_vec(),
            None => Vec::new(),
        }
    }

    /// Total records held for a subscriber.
    #[must_use]
    pub fn count(&self, credential: &str) -> usize {
        self.records
            .read()
            .unwrap()
            .get(credential)
            .map_or(0, Vec::len)
    }
}
