//! # Gateway Modules
//!
//! The service modules that make up the tollgate admission core.
//!
//! ## Available Modules
//!
//! - [`accounts`] - Subscriber records and billing-driven provisioning
//! - [`quota`] - Monthly plan ceiling enforcement
//! - [`rate_limiting`] - Per-subscriber token-bucket rate limiting
//! - [`result_cache`] - TTL-bounded memoization of analysis results
//! - [`analysis`] - The external analysis collaborator seam
//! - [`admission`] - The per-request admission pipeline and its handler
//! - [`metrics`] - Read-only operational counters and Prometheus export

pub mod accounts;
pub mod admission;
pub mod analysis;
pub mod metrics;
pub mod quota;
pub mod rate_limiting;
pub mod result_cache;
