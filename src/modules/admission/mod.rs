//! # Admission Module
//!
//! The per-request decision pipeline in front of the analysis service:
//! authenticate, check quota, check rate, consult the cache, and only then
//! pay for a fresh analysis.
//!
//! Denials happen before any work. Collaborator-level failures are not
//! pipeline errors: they come back as degraded payloads and are billed
//! like any other completed computation.

mod error;
mod gateway;
mod handler;
mod history;

pub use error::{GatewayError, GatewayResult};
pub use gateway::{AdmissionGateway, AnalysisOutcome, HistoryView};
pub use handler::GatewayHandler;
pub use history::{HistoryRecord, HistoryStore};
