//! # Analysis Module
//!
//! The seam between the gateway and the actual SEO analysis functions.
//!
//! The gateway never looks inside an analysis; it admits the request,
//! hands it to an [`Analyzer`], and treats the returned report as an
//! opaque billable payload. Collaborator failures (unreachable targets,
//! malformed responses) are part of the report, not errors: the analyzer
//! contract is to return a zero-scored, annotated report instead.

mod analyzer;
mod report;
mod request;

pub use analyzer::Analyzer;
pub use report::{AnalysisReport, AuditReport, Competition, DomainReport, KeywordReport};
pub use request::{AnalysisRequest, OperationKind};
