//! # Tollgate
//!
//! The admission-control core of a metered, multi-tenant SEO analysis
//! service. Every billable request passes one pipeline: resolve the
//! caller's credential, check the monthly plan quota, check the
//! instantaneous rate budget, consult the result cache, and only on a
//! miss pay for a fresh analysis.
//!
//! ## Features
//!
//! - Token-bucket rate limiting parameterized by plan tier
//! - Monthly quota accounting with race-free slot reservation
//! - 24-hour result cache keyed by normalized request fingerprints
//! - Billing-driven subscriber provisioning
//! - Live metrics with Prometheus exposition
//!
//! ## Architecture
//!
//! Stores are explicitly owned objects handed into the
//! [`modules::admission::AdmissionGateway`] at construction, so tests run
//! against isolated instances. Service modules implement the
//! [`module::ModuleContract`] trait for uniform lifecycle management; the
//! analysis functions themselves live behind the
//! [`modules::analysis::Analyzer`] seam and are out of scope here.

pub mod config;
pub mod module;
pub mod modules;
