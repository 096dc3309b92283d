//! The core module contract trait.

use super::{ModuleConfig, ModuleManifest, ModuleResult, ModuleStatus};
use std::collections::HashMap;
use std::fmt::Write;

/// Metrics payload containing module-specific metrics.
#[derive(Debug, Clone, Default)]
pub struct MetricsPayload {
    /// Counter metrics (monotonically increasing).
    pub counters: HashMap<String, u64>,

    /// Gauge metrics (can go up and down).
    pub gauges: HashMap<String, f64>,
}

impl MetricsPayload {
    /// Creates a new empty metrics payload.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a counter metric.
    pub fn counter(&mut self, name: impl Into<String>, value: u64) {
        self.counters.insert(name.into(), value);
    }

    /// Adds a gauge metric.
    pub fn gauge(&mut self, name: impl Into<String>, value: f64) {
        self.gauges.insert(name.into(), value);
    }

    /// Formats metrics in Prometheus text format.
    #[must_use]
    pub fn to_prometheus(&self, prefix: &str) -> String {
        let mut output = String::new();

        for (name, value) in &self.counters {
            let _ = writeln!(output, "{prefix}_{name} {value}");
        }

        for (name, value) in &self.gauges {
            let _ = writeln!(output, "{prefix}_{name} {value}");
        }

        output
    }
}

/// The contract that tollgate service modules implement.
///
/// # Lifecycle
///
/// 1. `manifest()` - Called to discover module capabilities
/// 2. `init()` - Initialize with configuration
/// 3. `start()` - Begin serving requests
/// 4. `status()` / `metrics()` - Ongoing monitoring
/// 5. `stop()` - Graceful shutdown
pub trait ModuleContract: Send + Sync {
    /// Returns the module's manifest describing its identity and capabilities.
    fn manifest(&self) -> ModuleManifest;

    /// Initializes the module with the provided configuration.
    ///
    /// The module should validate the configuration and build internal
    /// state, but should not serve requests until `start()` is called.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::ConfigError` if the configuration is invalid.
    /// Returns `ModuleError::InvalidState` if the module is already running.
    fn init(&mut self, config: ModuleConfig) -> ModuleResult<()>;

    /// Starts the module.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::StartFailed` if the module cannot start.
    /// Returns `ModuleError::InvalidState` if called before `init()`.
    fn start(&mut self) -> ModuleResult<()>;

    /// Stops the module gracefully.
    ///
    /// # Errors
    ///
    /// Returns `ModuleError::StopFailed` if graceful shutdown fails.
    fn stop(&mut self) -> ModuleResult<()>;

    /// Returns the current status of the module.
    fn status(&self) -> ModuleStatus;

    /// Returns the current metrics from the module.
    fn metrics(&self) -> MetricsPayload;

    /// Called periodically for liveness checks.
    ///
    /// The default implementation returns `true` if the module is operational.
    fn heartbeat(&self) -> bool {
        self.status().is_operational()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metrics_payload() {
        let mut payload = MetricsPayload::new();
        payload.counter("cache_hits", 42);
        payload.gauge("active_subscribers", 3.0);

        assert_eq!(payload.counters.get("cache_hits"), Some(&42));
        assert_eq!(payload.gauges.get("active_subscribers"), Some(&3.0));
    }

    #[test]
    fn test_to_prometheus() {
        let mut payload = MetricsPayload::new();
        payload.counter("requests_total", 7);

        let text = payload.to_prometheus("tollgate");
        assert!(text.contains("tollgate_requests_total 7"));
    }
}
