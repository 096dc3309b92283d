//! # Quota Module
//!
//! Monthly ceiling enforcement for billable operations.
//!
//! The accountant gates requests before any rate or cache work and bills
//! only completed computation: the gateway takes a reservation up front,
//! commits it after a fresh analysis, and lets it lapse on a cache hit or
//! a downstream denial. Reservations count against the ceiling while they
//! are live, so two concurrent requests can never share the last slot.

mod accountant;

pub use accountant::{QuotaAccountant, QuotaDecision, QuotaReservation};
