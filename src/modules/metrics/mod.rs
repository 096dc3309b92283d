//! # Metrics Module
//!
//! Read-only operational visibility over the live stores: cache hit/miss
//! counters and hit rate, cached entry count, known subscribers, and
//! limiter activity. The reporter aggregates without side effects on the
//! observed counters, and bridges the snapshot into a Prometheus registry
//! for text exposition.

mod registry;
mod reporter;

pub use registry::PrometheusBridge;
pub use reporter::{MetricsReporter, MetricsSnapshot};
