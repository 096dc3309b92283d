//! Admission gateway handler implementing ModuleContract.

use super::gateway::AdmissionGateway;
use super::history::HistoryStore;
use crate::config::{ConfigLoader, GatewayConfig};
use crate::module::{
    Capability, MetricsPayload, ModuleConfig, ModuleContract, ModuleError, ModuleManifest,
    ModuleResult, ModuleStatus,
};
use crate::modules::accounts::AccountStore;
use crate::modules::analysis::Analyzer;
use crate::modules::rate_limiting::LimiterRegistry;
use crate::modules::result_cache::ResultCache;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, info};

/// Admission gateway module.
///
/// Parses the gateway configuration, owns the stores, and assembles the
/// [`AdmissionGateway`] once an analyzer collaborator is attached.
pub struct GatewayHandler {
    /// Parsed configuration.
    config: GatewayConfig,

    /// The analyzer collaborator, attached before `start()`.
    analyzer: Option<Arc<dyn Analyzer>>,

    /// The assembled gateway, present while running.
    gateway: Option<Arc<AdmissionGateway>>,

    /// Account store.
    accounts: Option<Arc<AccountStore>>,

    /// Limiter registry.
    limiters: Option<Arc<LimiterRegistry>>,

    /// Result cache.
    cache: Option<Arc<ResultCache>>,

    /// History store.
    history: Option<Arc<HistoryStore>>,

    /// Current status.
    status: ModuleStatus,

    /// Start time for uptime calculation.
    started_at: Option<Instant>,
}

impl std::fmt::Debug for GatewayHandler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GatewayHandler")
            .field("status", &self.status)
            .field("has_analyzer", &self.analyzer.is_some())
            .field("started_at", &self.started_at)
            .finish()
    }
}

impl GatewayHandler {
    /// Create a new handler with default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self {
            config: GatewayConfig::default(),
            analyzer: None,
            gateway: None,
            accounts: None,
            limiters: None,
            cache: None,
            history: None,
            status: ModuleStatus::Stopped,
            started_at: None,
        }
    }

    /// Attach the analysis collaborator.
    ///
    /// Must happen before `start()`; the gateway cannot admit billable
    /// requests without somewhere to send them.
    pub fn set_analyzer(&mut self, analyzer: Arc<dyn Analyzer>) {
        self.analyzer = Some(analyzer);
    }

    /// The running gateway, if started.
    #[must_use]
    pub fn gateway(&self) -> Option<&Arc<AdmissionGateway>> {
        self.gateway.as_ref()
    }

    /// The account store, once initialized.
    #[must_use]
    pub fn accounts(&self) -> Option<&Arc<AccountStore>> {
        self.accounts.as_ref()
    }

    /// The limiter registry, once initialized.
    #[must_use]
    pub fn limiters(&self) -> Option<&Arc<LimiterRegistry>> {
        self.limiters.as_ref()
    }

    /// The result cache, once initialized.
    #[must_use]
    pub fn cache(&self) -> Option<&Arc<ResultCache>> {
        self.cache.as_ref()
    }

    /// Get uptime.
    #[must_use]
    pub fn uptime(&self) -> Option<Duration> {
        self.started_at.map(|t| t.elapsed())
    }
}

impl Default for GatewayHandler {
    fn default() -> Self {
        Self::new()
    }
}

impl ModuleContract for GatewayHandler {
    fn manifest(&self) -> ModuleManifest {
        ModuleManifest::builder("admission-gateway")
            .description("Per-request admission pipeline: auth, quota, rate limit, cache")
            .version(1, 0, 0)
            .capability(Capability::Authentication)
            .capability(Capability::QuotaAccounting)
            .capability(Capability::RateLimiting)
            .capability(Capability::ResultCaching)
            .capability(Capability::Provisioning)
            .build()
    }

    fn init(&mut self, config: ModuleConfig) -> ModuleResult<()> {
        if self.status != ModuleStatus::Stopped {
            return Err(ModuleError::InvalidState {
                current: self.status.to_string(),
                expected: "stopped".to_string(),
            });
        }

        debug!("initializing admission gateway");

        let gateway_config = if let Some(raw) = config.raw_config() {
            ConfigLoader::new()
                .load_str(raw)
                .map_err(|e| ModuleError::ConfigError(e.to_string()))?
        } else {
            GatewayConfig::default()
        };

        self.accounts = Some(Arc::new(AccountStore::new()));
        self.limiters = Some(Arc::new(LimiterRegistry::new(gateway_config.plans.clone())));
        self.cache = Some(Arc::new(ResultCache::new(gateway_config.cache.ttl())));
        self.history = Some(Arc::new(HistoryStore::new()));
        self.config = gateway_config;
        self.status = ModuleStatus::Initializing;

        info!("admission gateway initialized");
        Ok(())
    }

    fn start(&mut self) -> ModuleResult<()> {
        if self.status != ModuleStatus::Initializing {
            return Err(ModuleError::InvalidState {
                current: self.status.to_string(),
                expected: "initializing".to_string(),
            });
        }

        let analyzer = self
            .analyzer
            .as_ref()
            .ok_or_else(|| ModuleError::StartFailed("no analyzer attached".to_string()))?;

        // stores exist whenever status is Initializing
        self.gateway = Some(Arc::new(AdmissionGateway::new(
            &self.config,
            Arc::clone(self.accounts.as_ref().expect("stores built in init")),
            Arc::clone(self.limiters.as_ref().expect("stores built in init")),
            Arc::clone(self.cache.as_ref().expect("stores built in init")),
            Arc::clone(self.history.as_ref().expect("stores built in init")),
            Arc::clone(analyzer),
        )));
        self.started_at = Some(Instant::now());
        self.status = ModuleStatus::Running;

        info!(
            cache_enabled = self.config.cache.enabled,
            analysis_timeout_secs = self.config.analysis.timeout_secs,
            "admission gateway started"
        );

        Ok(())
    }

    fn stop(&mut self) -> ModuleResult<()> {
        debug!("stopping admission gateway");

        if let (Some(cache), Some(limiters)) = (&self.cache, &self.limiters) {
            info!(
                cache_hits = cache.hits(),
                cache_misses = cache.misses(),
                limiter_checks = limiters.total_checks(),
                "admission gateway stopping"
            );
        }

        self.gateway = None;
        self.status = ModuleStatus::Stopped;
        self.started_at = None;

        info!("admission gateway stopped");
        Ok(())
    }

    fn status(&self) -> ModuleStatus {
        self.status.clone()
    }

    fn metrics(&self) -> MetricsPayload {
        let mut metrics = MetricsPayload::new();

        if let Some(ref cache) = self.cache {
            metrics.counter("cache_hits", cache.hits());
            metrics.counter("cache_misses", cache.misses());
            metrics.gauge("cached_entries", cache.len() as f64);
            metrics.gauge("cache_hit_rate", cache.hit_rate());
        }

        if let Some(ref limiters) = self.limiters {
            metrics.counter("limiter_checks", limiters.total_checks());
            metrics.counter("limiter_allowed", limiters.total_allowed());
            metrics.counter("limiter_denied", limiters.total_denied());
            metrics.gauge("active_limiters", limiters.active_count() as f64);
        }

        if let Some(ref accounts) = self.accounts {
            metrics.gauge("active_subscribers", accounts.len() as f64);
        }

        if let Some(uptime) = self.uptime() {
            metrics.gauge("uptime_seconds", uptime.as_secs_f64());
        }

        metrics
    }
}
