//! The admission pipeline.

use super::error::{GatewayError, GatewayResult};
use super::history::{HistoryRecord, HistoryStore};
use crate::config::{GatewayConfig, PlanTable, Quota};
use crate::modules::accounts::{AccountStore, BillingEvent, Provisioner, Subscriber};
use crate::modules::analysis::{AnalysisReport, AnalysisRequest, Analyzer};
use crate::modules::quota::QuotaAccountant;
use crate::modules::rate_limiting::LimiterRegistry;
use crate::modules::result_cache::{Fingerprint, ResultCache};
use chrono::Utc;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

/// A successfully admitted request's result.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisOutcome {
    /// The report payload.
    pub report: AnalysisReport,

    /// Whether the payload was served from cache.
    pub from_cache: bool,
}

/// The history listing returned to an authenticated subscriber.
#[derive(Debug, Clone, Serialize)]
pub struct HistoryView {
    /// Most recent records, oldest first.
    pub reports: Vec<HistoryRecord>,

    /// Committed usage this period.
    pub quota_used: u64,

    /// The plan ceiling.
    pub quota_limit: Quota,
}

/// Composes the stores into one per-request decision pipeline.
///
/// Owns nothing ambient: every store is passed in at construction and
/// torn down with the gateway, so tests run against isolated instances.
pub struct AdmissionGateway {
    accounts: Arc<AccountStore>,
    quota: QuotaAccountant,
    limiters: Arc<LimiterRegistry>,
    cache: Arc<ResultCache>,
    history: Arc<HistoryStore>,
    provisioner: Provisioner,
    analyzer: Arc<dyn Analyzer>,
    plans: PlanTable,
    analysis_timeout: Duration,
    cache_enabled: bool,
    history_depth: usize,
}

impl std::fmt::Debug for AdmissionGateway {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdmissionGateway")
            .field("analysis_timeout", &self.analysis_timeout)
            .field("cache_enabled", &self.cache_enabled)
            .field("history_depth", &self.history_depth)
            .finish()
    }
}

impl AdmissionGateway {
    /// Assemble a gateway from its collaborating stores.
    #[must_use]
    pub fn new(
        config: &GatewayConfig,
        accounts: Arc<AccountStore>,
        limiters: Arc<LimiterRegistry>,
        cache: Arc<ResultCache>,
        history: Arc<HistoryStore>,
        analyzer: Arc<dyn Analyzer>,
    ) -> Self {
        let provisioner = Provisioner::new(
            Arc::clone(&accounts),
            config.gateway.credential_prefix.clone(),
            config.provisioning.enabled,
        );

        Self {
            accounts,
            quota: QuotaAccountant::new(config.plans.clone()),
            limiters,
            cache,
            history,
            provisioner,
            analyzer,
            plans: config.plans.clone(),
            analysis_timeout: config.analysis.timeout(),
            cache_enabled: config.cache.enabled,
            history_depth: config.gateway.history_depth,
        }
    }

    /// Run one billable request through the admission pipeline.
    ///
    /// # Errors
    ///
    /// - `Unauthenticated` for an unknown credential, before anything else.
    /// - `QuotaExceeded` when usage reached the plan ceiling, before any
    ///   rate or cache consultation.
    /// - `RateLimited` when no token is available; transient.
    pub async fn handle(
        &self,
        credential: &str,
        request: AnalysisRequest,
    ) -> GatewayResult<AnalysisOutcome> {
        let subscriber = self
            .accounts
            .resolve(credential)
            .ok_or(GatewayError::Unauthenticated)?;

        // Reserve a quota slot; released on drop unless committed below.
        let reservation =
            self.quota
                .reserve(&subscriber)
                .map_err(|decision| GatewayError::QuotaExceeded {
                    used: decision.used,
                    limit: decision.ceiling,
                })?;

        let rate = self.limiters.allow(&subscriber);
        if !rate.allowed {
            return Err(GatewayError::RateLimited {
                retry_after_secs: rate.retry_after_secs(),
            });
        }

        let fingerprint = (self.cache_enabled && request.cacheable())
            .then(|| Fingerprint::for_request(&request));

        if let Some(ref fingerprint) = fingerprint {
            if let Some(report) = self.cache.get(fingerprint) {
                debug!(
                    credential,
                    operation = %request.operation(),
                    "served from cache"
                );
                // no usage commit, no history entry: nothing was computed
                return Ok(AnalysisOutcome {
                    report,
                    from_cache: true,
                });
            }
        }

        let report = self.run_analysis(&request).await;

        if let Some(ref fingerprint) = fingerprint {
            self.cache.put(fingerprint, report.clone());
        }

        reservation.commit();
        self.history.append(
            subscriber.credential(),
            HistoryRecord {
                operation: request.operation(),
                query: request.query().to_string(),
                score: report.headline_score(),
                at: Utc::now(),
            },
        );

        debug!(
            credential,
            operation = %request.operation(),
            score = report.headline_score(),
            degraded = report.is_degraded(),
            "analysis completed"
        );

        Ok(AnalysisOutcome {
            report,
            from_cache: false,
        })
    }

    /// Invoke the collaborator, bounded by the configured timeout.
    ///
    /// A timeout is a degraded result, not an error: the subscriber is
    /// billed for the attempted computation either way.
    async fn run_analysis(&self, request: &AnalysisRequest) -> AnalysisReport {
        match tokio::time::timeout(self.analysis_timeout, self.analyzer.analyze(request)).await {
            Ok(report) => report,
            Err(_) => {
                warn!(
                    operation = %request.operation(),
                    timeout_secs = self.analysis_timeout.as_secs(),
                    "analysis timed out"
                );
                AnalysisReport::degraded_for(
                    request,
                    format!(
                        "analysis timed out after {}s",
                        self.analysis_timeout.as_secs()
                    ),
                )
            },
        }
    }

    /// The static plan table, for the plans listing.
    #[must_use]
    pub fn plans(&self) -> &PlanTable {
        &self.plans
    }

    /// The history listing for an authenticated subscriber.
    ///
    /// # Errors
    ///
    /// Returns `Unauthenticated` for an unknown credential. History reads
    /// are not billable and pass no quota or rate gate.
    pub fn history(&self, credential: &str) -> GatewayResult<HistoryView> {
        let subscriber = self
            .accounts
            .resolve(credential)
            .ok_or(GatewayError::Unauthenticated)?;

        Ok(HistoryView {
            reports: self.history.recent(credential, self.history_depth),
            quota_used: subscriber.usage(),
            quota_limit: self.quota.ceiling_for(&subscriber),
        })
    }

    /// Provision a subscriber from a billing event.
    ///
    /// # Errors
    ///
    /// Returns `Configuration` when the billing integration is disabled.
    pub fn provision(&self, event: BillingEvent) -> GatewayResult<Arc<Subscriber>> {
        self.provisioner
            .provision(event)
            .map_err(|e| GatewayError::Configuration(e.to_string()))
    }
}
