//! # Rate Limiting Module
//!
//! Token-bucket rate limiting keyed by subscriber credential.
//!
//! Each subscriber gets one bucket, created lazily on the first rate-gated
//! request with the rate and burst capacity of the plan held at that
//! moment. Buckets live for the process lifetime; a later plan change does
//! not resize an existing bucket.
//!
//! A denial is immediate and final for that request. The gateway surfaces
//! it as a rate-limit failure with a retry-after hint; nothing is queued.

mod bucket;
mod limiter;

pub use bucket::TokenBucket;
pub use limiter::{LimiterRegistry, RateDecision};
