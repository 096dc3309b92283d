//! The external analysis collaborator trait.

use super::report::AnalysisReport;
use super::request::AnalysisRequest;
use async_trait::async_trait;

/// The external collaborator that performs the actual SEO analysis.
///
/// Implementations are pure functions of the request from the gateway's
/// point of view. The contract is infallible: ordinary failures such as an
/// unreachable target or malformed markup must be folded into the report
/// as a zero-scored, annotated result (see
/// [`AnalysisReport::degraded_for`]), never returned as errors. The
/// gateway bounds each invocation with a timeout and bills the subscriber
/// for every completed call, degraded or not.
#[async_trait]
pub trait Analyzer: Send + Sync {
    /// Produce a report for the given request.
    async fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport;
}
