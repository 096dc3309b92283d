//! # Accounts Module
//!
//! Subscriber records and billing-driven provisioning.
//!
//! The account store is the authority for credential resolution: every
//! admission decision starts by resolving the caller's credential here.
//! Subscribers are created exclusively by billing events and live for the
//! process lifetime.

mod error;
mod provisioning;
mod store;
mod subscriber;

pub use error::{AccountError, AccountResult};
pub use provisioning::{BillingEvent, Provisioner};
pub use store::AccountStore;
pub use subscriber::Subscriber;
