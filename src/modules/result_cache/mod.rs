//! # Result Cache Module
//!
//! Time-bounded memoization of analysis results.
//!
//! Semantically identical requests map to one cache slot through a
//! normalized fingerprint, so `"Example.com"`, `"example.com "`, and
//! `"https://www.example.com/about"` all share an entry. Entries are valid
//! for the configured TTL (24 hours by default); a stale entry behaves as
//! a miss and stays in place until the next write overwrites it.
//!
//! Every lookup bumps a process-wide hit or miss counter for the metrics
//! reporter.

mod fingerprint;
mod store;

pub use fingerprint::Fingerprint;
pub use store::ResultCache;
