//! End-to-end tests for the admission pipeline.

use async_trait::async_trait;
use chrono::Utc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tollgate::config::{GatewayConfig, PlanTier, Quota};
use tollgate::modules::accounts::{AccountStore, BillingEvent, Subscriber};
use tollgate::modules::admission::{AdmissionGateway, GatewayError, HistoryStore};
use tollgate::modules::analysis::{
    AnalysisReport, AnalysisRequest, Analyzer, Competition, DomainReport, KeywordReport,
};
use tollgate::modules::metrics::MetricsReporter;
use tollgate::modules::rate_limiting::LimiterRegistry;
use tollgate::modules::result_cache::ResultCache;

/// Scripted analyzer: deterministic reports, switchable failure mode,
/// invocation counting.
struct ScriptedAnalyzer {
    calls: AtomicU64,
    failing: AtomicBool,
}

impl ScriptedAnalyzer {
    fn new() -> Self {
        Self {
            calls: AtomicU64::new(0),
            failing: AtomicBool::new(false),
        }
    }

    fn calls(&self) -> u64 {
        self.calls.load(Ordering::Relaxed)
    }

    fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::Relaxed);
    }
}

#[async_trait]
impl Analyzer for ScriptedAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        self.calls.fetch_add(1, Ordering::Relaxed);

        if self.failing.load(Ordering::Relaxed) {
            // collaborator contract: network failures are folded into the
            // payload, never raised
            return AnalysisReport::degraded_for(request, "could not reach target");
        }

        match request {
            AnalysisRequest::Domain { domain } => AnalysisReport::Domain(DomainReport {
                domain: domain.trim().to_lowercase(),
                seo_score: 82,
                has_ssl: true,
                title: Some("Example Site".to_string()),
                word_count: 640,
                issues: vec![],
                recommendations: vec!["Add Schema.org structured data".to_string()],
                note: None,
                analyzed_at: Utc::now(),
            }),
            AnalysisRequest::Keyword { keyword, country } => {
                AnalysisReport::Keyword(KeywordReport {
                    keyword: keyword.clone(),
                    country: country.clone(),
                    monthly_volume: 12_000,
                    keyword_difficulty: 45,
                    cpc_usd: 2.4,
                    competition: Competition::Medium,
                    opportunity_score: 67,
                    note: None,
                    analyzed_at: Utc::now(),
                })
            },
            other => AnalysisReport::degraded_for(other, "audit unavailable in tests"),
        }
    }
}

struct Harness {
    gateway: AdmissionGateway,
    accounts: Arc<AccountStore>,
    cache: Arc<ResultCache>,
    limiters: Arc<LimiterRegistry>,
    history: Arc<HistoryStore>,
    analyzer: Arc<ScriptedAnalyzer>,
}

impl Harness {
    fn new() -> Self {
        Self::with_cache_ttl(Duration::from_secs(86_400))
    }

    fn with_cache_ttl(ttl: Duration) -> Self {
        let config = GatewayConfig::default();
        let accounts = Arc::new(AccountStore::new());
        let cache = Arc::new(ResultCache::new(ttl));
        let limiters = Arc::new(LimiterRegistry::new(config.plans.clone()));
        let history = Arc::new(HistoryStore::new());
        let analyzer = Arc::new(ScriptedAnalyzer::new());

        let gateway = AdmissionGateway::new(
            &config,
            Arc::clone(&accounts),
            Arc::clone(&limiters),
            Arc::clone(&cache),
            Arc::clone(&history),
            Arc::clone(&analyzer) as Arc<dyn Analyzer>,
        );

        Self {
            gateway,
            accounts,
            cache,
            limiters,
            history,
            analyzer,
        }
    }

    fn add_subscriber(&self, credential: &str, plan: PlanTier) -> Arc<Subscriber> {
        let subscriber = Arc::new(Subscriber::new(credential, "tester@example.com", plan));
        self.accounts.insert(Arc::clone(&subscriber)).unwrap();
        subscriber
    }
}

fn domain(domain: &str) -> AnalysisRequest {
    AnalysisRequest::Domain {
        domain: domain.to_string(),
    }
}

#[tokio::test]
async fn starter_burst_allows_three_then_rate_limits() {
    let harness = Harness::new();
    harness.add_subscriber("seo_starter", PlanTier::Starter);

    // 3 distinct domains force cache misses, draining the burst of 3
    for i in 0..3 {
        let outcome = harness
            .gateway
            .handle("seo_starter", domain(&format!("site{i}.com")))
            .await
            .unwrap();
        assert!(!outcome.from_cache);
    }

    let denied = harness
        .gateway
        .handle("seo_starter", domain("site3.com"))
        .await;
    match denied {
        Err(GatewayError::RateLimited { retry_after_secs }) => {
            assert!(retry_after_secs >= 1);
        },
        other => panic!("expected rate limit, got {other:?}"),
    }

    // exactly the three admitted calls were billed and recorded
    let view = harness.gateway.history("seo_starter").unwrap();
    assert_eq!(view.quota_used, 3);
    assert_eq!(view.reports.len(), 3);
}

#[tokio::test]
async fn quota_ceiling_rejects_before_any_work() {
    let harness = Harness::new();
    let subscriber = harness.add_subscriber("seo_capped", PlanTier::Starter);

    // drive usage to the starter ceiling of 10
    for _ in 0..10 {
        subscriber.try_reserve(Quota::Limited(10)).unwrap();
        subscriber.commit_reservation();
    }

    let result = harness.gateway.handle("seo_capped", domain("example.com")).await;
    match result {
        Err(GatewayError::QuotaExceeded { used, limit }) => {
            assert_eq!(used, 10);
            assert_eq!(limit, Quota::Limited(10));
        },
        other => panic!("expected quota denial, got {other:?}"),
    }

    // rejected before any rate or cache logic ran
    assert_eq!(subscriber.usage(), 10);
    assert_eq!(harness.analyzer.calls(), 0);
    assert_eq!(harness.limiters.total_checks(), 0);
    assert_eq!(harness.cache.misses(), 0);
}

#[tokio::test]
async fn identical_domains_share_one_computation() {
    let harness = Harness::new();
    let subscriber = harness.add_subscriber("seo_pro", PlanTier::Professional);

    let first = harness
        .gateway
        .handle("seo_pro", domain("Example.com"))
        .await
        .unwrap();
    assert!(!first.from_cache);

    // different casing and stray whitespace, same fingerprint
    let second = harness
        .gateway
        .handle("seo_pro", domain("example.com "))
        .await
        .unwrap();
    assert!(second.from_cache);
    assert_eq!(second.report.headline_score(), first.report.headline_score());

    // one computation, one billed report, one history entry
    assert_eq!(harness.analyzer.calls(), 1);
    assert_eq!(subscriber.usage(), 1);
    assert_eq!(harness.history.count("seo_pro"), 1);
    assert_eq!(harness.cache.hits(), 1);
    assert_eq!(harness.cache.misses(), 1);
}

#[tokio::test]
async fn expired_cache_entry_is_recomputed() {
    let harness = Harness::with_cache_ttl(Duration::from_millis(40));
    harness.add_subscriber("seo_agency", PlanTier::Agency);

    harness
        .gateway
        .handle("seo_agency", domain("example.com"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(60)).await;

    let outcome = harness
        .gateway
        .handle("seo_agency", domain("example.com"))
        .await
        .unwrap();

    // entry was still physically present but stale: recomputed, re-billed
    assert!(!outcome.from_cache);
    assert_eq!(harness.analyzer.calls(), 2);
}

#[tokio::test]
async fn billing_event_provisions_fresh_subscriber() {
    let harness = Harness::new();

    let subscriber = harness
        .gateway
        .provision(BillingEvent {
            email: "a@b.com".to_string(),
            plan: PlanTier::Agency,
        })
        .unwrap();

    assert!(subscriber.credential().starts_with("seo_"));
    assert_eq!(subscriber.plan(), PlanTier::Agency);
    assert_eq!(subscriber.usage(), 0);

    // credential is unique among all known subscribers
    let other = harness
        .gateway
        .provision(BillingEvent {
            email: "c@d.com".to_string(),
            plan: PlanTier::Starter,
        })
        .unwrap();
    assert_ne!(subscriber.credential(), other.credential());
    assert_eq!(harness.accounts.len(), 2);
}

#[tokio::test]
async fn degraded_collaborator_result_is_still_billed() {
    let harness = Harness::new();
    let subscriber = harness.add_subscriber("seo_pro", PlanTier::Professional);

    harness.analyzer.set_failing(true);

    let outcome = harness
        .gateway
        .handle("seo_pro", domain("unreachable.example"))
        .await
        .unwrap();

    // collaborator failure is a degraded payload, not a pipeline error
    assert!(outcome.report.is_degraded());
    assert_eq!(outcome.report.headline_score(), 0);

    // a real computation was attempted: charged and recorded
    assert_eq!(subscriber.usage(), 1);
    assert_eq!(harness.history.count("seo_pro"), 1);
}

#[tokio::test]
async fn unknown_and_missing_credentials_fail_closed() {
    let harness = Harness::new();

    let result = harness.gateway.handle("seo_ghost", domain("example.com")).await;
    match result {
        Err(err) => {
            assert_eq!(err.classification(), "unauthenticated");
            assert!(err.is_subscriber_fault());
            assert!(!err.is_transient());
        },
        Ok(_) => panic!("expected authentication failure"),
    }

    assert!(matches!(
        harness.gateway.handle("", domain("example.com")).await,
        Err(GatewayError::Unauthenticated)
    ));
}

#[tokio::test]
async fn plans_listing_exposes_static_table() {
    let harness = Harness::new();

    let plans = harness.gateway.plans();
    assert_eq!(plans.get(PlanTier::Starter).monthly_price_usd, 49);
    assert_eq!(plans.get(PlanTier::Professional).reports_per_month, Quota::Limited(50));
    assert!(plans.get(PlanTier::Agency).reports_per_month.is_unlimited());
}

#[tokio::test]
async fn metrics_reflect_pipeline_activity() {
    let harness = Harness::new();
    harness.add_subscriber("seo_pro", PlanTier::Professional);

    let reporter = MetricsReporter::new(
        Arc::clone(&harness.accounts),
        Arc::clone(&harness.cache),
        Arc::clone(&harness.limiters),
    );

    harness
        .gateway
        .handle("seo_pro", domain("example.com"))
        .await
        .unwrap();
    harness
        .gateway
        .handle("seo_pro", domain("example.com"))
        .await
        .unwrap();

    let snapshot = reporter.snapshot();
    assert_eq!(snapshot.cache_misses, 1);
    assert_eq!(snapshot.cache_hits, 1);
    assert_eq!(snapshot.cache_hit_rate, 50.0);
    assert_eq!(snapshot.cached_entries, 1);
    assert_eq!(snapshot.active_subscribers, 1);
    assert_eq!(snapshot.active_limiters, 1);
    assert_eq!(snapshot.limiter_checks, 2);
    assert_eq!(snapshot.limiter_allowed, 2);

    let text = reporter.encode_prometheus().unwrap();
    assert!(text.contains("tollgate_cache_hits_total 1"));
    assert!(text.contains("tollgate_active_subscribers 1"));
}

#[tokio::test]
async fn concurrent_requests_cannot_oversubscribe_rate_budget() {
    let harness = Harness::new();
    harness.add_subscriber("seo_starter", PlanTier::Starter);
    let gateway = Arc::new(harness.gateway);

    // 8 concurrent misses against a burst budget of 3
    let mut tasks = Vec::new();
    for i in 0..8 {
        let gateway = Arc::clone(&gateway);
        tasks.push(tokio::spawn(async move {
            gateway
                .handle("seo_starter", domain(&format!("concurrent{i}.com")))
                .await
                .is_ok()
        }));
    }

    let mut admitted = 0;
    for task in tasks {
        if task.await.unwrap() {
            admitted += 1;
        }
    }

    assert_eq!(admitted, 3);
    assert_eq!(harness.analyzer.calls(), 3);
}
