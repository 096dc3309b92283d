//! Integration tests for the module lifecycle contract.

use async_trait::async_trait;
use std::sync::Arc;
use tollgate::config::PlanTier;
use tollgate::module::{
    Capability, MetricsPayload, ModuleConfig, ModuleContract, ModuleError, ModuleManifest,
    ModuleResult, ModuleStatus,
};
use tollgate::modules::accounts::BillingEvent;
use tollgate::modules::admission::GatewayHandler;
use tollgate::modules::analysis::{AnalysisReport, AnalysisRequest, Analyzer};

/// A minimal module implementing the contract.
struct TestModule {
    name: String,
    status: ModuleStatus,
    start_count: u32,
    stop_count: u32,
}

impl TestModule {
    fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            status: ModuleStatus::Stopped,
            start_count: 0,
            stop_count: 0,
        }
    }
}

impl ModuleContract for TestModule {
    fn manifest(&self) -> ModuleManifest {
        ModuleManifest::builder(&self.name)
            .description("Test module for lifecycle tests")
            .version(1, 0, 0)
            .capability(Capability::Custom("test".to_string()))
            .build()
    }

    fn init(&mut self, _config: ModuleConfig) -> ModuleResult<()> {
        self.status = ModuleStatus::Initializing;
        Ok(())
    }

    fn start(&mut self) -> ModuleResult<()> {
        if !matches!(
            self.status,
            ModuleStatus::Initializing | ModuleStatus::Stopped
        ) {
            return Err(ModuleError::InvalidState {
                current: self.status.to_string(),
                expected: "initializing or stopped".to_string(),
            });
        }
        self.status = ModuleStatus::Running;
        self.start_count += 1;
        Ok(())
    }

    fn stop(&mut self) -> ModuleResult<()> {
        self.status = ModuleStatus::Stopped;
        self.stop_count += 1;
        Ok(())
    }

    fn status(&self) -> ModuleStatus {
        self.status.clone()
    }

    fn metrics(&self) -> MetricsPayload {
        let mut metrics = MetricsPayload::new();
        metrics.counter("start_count", u64::from(self.start_count));
        metrics.counter("stop_count", u64::from(self.stop_count));
        metrics
    }
}

struct StubAnalyzer;

#[async_trait]
impl Analyzer for StubAnalyzer {
    async fn analyze(&self, request: &AnalysisRequest) -> AnalysisReport {
        AnalysisReport::degraded_for(request, "stub analyzer")
    }
}

#[test]
fn test_module_lifecycle_roundtrip() {
    let mut module = TestModule::new("test-module");
    assert!(!module.heartbeat());

    module.init(ModuleConfig::new()).unwrap();
    module.start().unwrap();
    assert_eq!(module.status(), ModuleStatus::Running);
    assert!(module.heartbeat());

    module.stop().unwrap();
    assert_eq!(module.status(), ModuleStatus::Stopped);

    let metrics = module.metrics();
    assert_eq!(metrics.counters.get("start_count"), Some(&1));
    assert_eq!(metrics.counters.get("stop_count"), Some(&1));
}

#[test]
fn test_module_rejects_double_start() {
    let mut module = TestModule::new("test-module");
    module.init(ModuleConfig::new()).unwrap();
    module.start().unwrap();

    assert!(matches!(
        module.start(),
        Err(ModuleError::InvalidState { .. })
    ));
}

#[test]
fn test_modules_as_trait_objects() {
    let mut gateway = GatewayHandler::new();
    gateway.set_analyzer(Arc::new(StubAnalyzer));

    let mut modules: Vec<Box<dyn ModuleContract>> =
        vec![Box::new(TestModule::new("test-module")), Box::new(gateway)];

    for module in &mut modules {
        module.init(ModuleConfig::new()).unwrap();
        module.start().unwrap();
        assert!(module.heartbeat(), "{} not operational", module.manifest().name);
    }

    for module in &mut modules {
        module.stop().unwrap();
        assert!(module.status().is_stopped());
    }
}

#[tokio::test]
async fn test_gateway_handler_serves_requests_once_started() {
    let mut handler = GatewayHandler::new();

    let config = ModuleConfig::from_raw(
        r#"
        [gateway]
        credential_prefix = "demo"

        [analysis]
        timeout_secs = 2
        "#,
    );
    handler.init(config).unwrap();
    handler.set_analyzer(Arc::new(StubAnalyzer));
    handler.start().unwrap();

    let gateway = Arc::clone(handler.gateway().unwrap());

    let subscriber = gateway
        .provision(BillingEvent {
            email: "a@b.com".to_string(),
            plan: PlanTier::Professional,
        })
        .unwrap();
    assert!(subscriber.credential().starts_with("demo_"));

    let outcome = gateway
        .handle(
            subscriber.credential(),
            AnalysisRequest::Domain {
                domain: "example.com".to_string(),
            },
        )
        .await
        .unwrap();
    assert!(!outcome.from_cache);

    // handler metrics see the store activity
    let metrics = handler.metrics();
    assert_eq!(metrics.counters.get("cache_misses"), Some(&1));
    assert_eq!(metrics.counters.get("limiter_allowed"), Some(&1));
    assert_eq!(metrics.gauges.get("active_subscribers"), Some(&1.0));

    handler.stop().unwrap();
    assert!(handler.gateway().is_none());
}
