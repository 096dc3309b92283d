//! Configuration type definitions.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Root configuration structure for the tollgate gateway.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Gateway identity and request-handling configuration.
    pub gateway: GatewaySection,

    /// Subscription plan table.
    pub plans: PlanTable,

    /// Result cache configuration.
    pub cache: CacheSettings,

    /// Analysis collaborator configuration.
    pub analysis: AnalysisSettings,

    /// Subscriber provisioning configuration.
    pub provisioning: ProvisioningSettings,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

impl GatewayConfig {
    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns a message describing the first invalid field.
    pub fn validate(&self) -> Result<(), String> {
        self.gateway.validate()?;
        self.plans.validate()?;
        self.cache.validate()?;
        self.analysis.validate()?;
        Ok(())
    }
}

/// Gateway section configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GatewaySection {
    /// Gateway instance name.
    pub name: String,

    /// Prefix for generated subscriber credentials.
    pub credential_prefix: String,

    /// How many history records an admin listing returns.
    pub history_depth: usize,
}

impl GatewaySection {
    fn validate(&self) -> Result<(), String> {
        if self.credential_prefix.is_empty() {
            return Err("gateway.credential_prefix must not be empty".to_string());
        }
        if self.history_depth == 0 {
            return Err("gateway.history_depth must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for GatewaySection {
    fn default() -> Self {
        Self {
            name: "tollgate".to_string(),
            credential_prefix: "seo".to_string(),
            history_depth: 20,
        }
    }
}

/// A subscription plan tier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum PlanTier {
    /// Entry-level plan.
    #[default]
    Starter,
    /// Mid-level plan.
    Professional,
    /// Top plan with unlimited reports.
    Agency,
}

impl std::fmt::Display for PlanTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Starter => write!(f, "starter"),
            Self::Professional => write!(f, "professional"),
            Self::Agency => write!(f, "agency"),
        }
    }
}

impl std::str::FromStr for PlanTier {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "starter" => Ok(Self::Starter),
            "professional" => Ok(Self::Professional),
            "agency" => Ok(Self::Agency),
            other => Err(format!("unknown plan tier: {other}")),
        }
    }
}

/// A monthly operation ceiling.
///
/// Serialized as a signed integer where any negative value means
/// "unlimited", matching the billing system's `-1` sentinel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "i64", into = "i64")]
pub enum Quota {
    /// At most this many billable operations per period.
    Limited(u64),
    /// No ceiling.
    Unlimited,
}

impl Quota {
    /// Returns `true` if another operation is allowed at the given usage.
    #[must_use]
    pub fn allows(&self, used: u64) -> bool {
        match self {
            Self::Limited(ceiling) => used < *ceiling,
            Self::Unlimited => true,
        }
    }

    /// Returns `true` if this quota has no ceiling.
    #[must_use]
    pub fn is_unlimited(&self) -> bool {
        matches!(self, Self::Unlimited)
    }

    /// The ceiling as a signed integer (`-1` for unlimited).
    #[must_use]
    pub fn as_i64(&self) -> i64 {
        match self {
            Self::Limited(ceiling) => *ceiling as i64,
            Self::Unlimited => -1,
        }
    }
}

impl From<i64> for Quota {
    fn from(value: i64) -> Self {
        if value < 0 {
            Self::Unlimited
        } else {
            Self::Limited(value as u64)
        }
    }
}

impl From<Quota> for i64 {
    fn from(value: Quota) -> Self {
        value.as_i64()
    }
}

impl std::fmt::Display for Quota {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Limited(ceiling) => write!(f, "{ceiling}"),
            Self::Unlimited => write!(f, "unlimited"),
        }
    }
}

/// Static configuration for one subscription plan.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Plan {
    /// Display name.
    pub name: String,

    /// Monthly price in USD.
    pub monthly_price_usd: u32,

    /// Monthly report ceiling.
    pub reports_per_month: Quota,

    /// Token refill rate for the limiter (operations per second).
    pub refill_rate: f64,

    /// Burst capacity for the limiter (token ceiling).
    pub burst_capacity: u32,

    /// Marketing feature list, returned by the plans listing.
    #[serde(default)]
    pub features: Vec<String>,
}

impl Plan {
    fn validate(&self, tier: PlanTier) -> Result<(), String> {
        if self.refill_rate <= 0.0 {
            return Err(format!("plans.{tier}.refill_rate must be positive"));
        }
        if self.burst_capacity == 0 {
            return Err(format!("plans.{tier}.burst_capacity must be at least 1"));
        }
        Ok(())
    }
}

/// The full plan table, one entry per tier.
///
/// Every tier always resolves to a plan; partial TOML overrides fall back
/// to the defaults below.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PlanTable {
    /// Starter plan.
    pub starter: Plan,
    /// Professional plan.
    pub professional: Plan,
    /// Agency plan.
    pub agency: Plan,
}

impl PlanTable {
    /// Look up the plan for a tier.
    #[must_use]
    pub fn get(&self, tier: PlanTier) -> &Plan {
        match tier {
            PlanTier::Starter => &self.starter,
            PlanTier::Professional => &self.professional,
            PlanTier::Agency => &self.agency,
        }
    }

    /// Iterate over all `(tier, plan)` pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlanTier, &Plan)> {
        [
            (PlanTier::Starter, &self.starter),
            (PlanTier::Professional, &self.professional),
            (PlanTier::Agency, &self.agency),
        ]
        .into_iter()
    }

    fn validate(&self) -> Result<(), String> {
        for (tier, plan) in self.iter() {
            plan.validate(tier)?;
        }
        Ok(())
    }
}

impl Default for PlanTable {
    fn default() -> Self {
        Self {
            starter: Plan {
                name: "Starter".to_string(),
                monthly_price_usd: 49,
                reports_per_month: Quota::Limited(10),
                refill_rate: 0.05,
                burst_capacity: 3,
                features: vec![
                    "10 reports/month".to_string(),
                    "Domain overview".to_string(),
                    "Keyword research".to_string(),
                    "Email support".to_string(),
                ],
            },
            professional: Plan {
                name: "Professional".to_string(),
                monthly_price_usd: 149,
                reports_per_month: Quota::Limited(50),
                refill_rate: 0.2,
                burst_capacity: 10,
                features: vec![
                    "50 reports/month".to_string(),
                    "Site audit".to_string(),
                    "API access".to_string(),
                    "Priority support".to_string(),
                ],
            },
            agency: Plan {
                name: "Agency".to_string(),
                monthly_price_usd: 499,
                reports_per_month: Quota::Unlimited,
                refill_rate: 1.0,
                burst_capacity: 30,
                features: vec![
                    "Unlimited reports".to_string(),
                    "White-label".to_string(),
                    "Team seats (10)".to_string(),
                    "Dedicated support".to_string(),
                ],
            },
        }
    }
}

/// Result cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheSettings {
    /// Whether caching is enabled.
    pub enabled: bool,

    /// Entry time-to-live in seconds.
    pub ttl_secs: u64,
}

impl CacheSettings {
    /// The TTL as a `Duration`.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        Duration::from_secs(self.ttl_secs)
    }

    fn validate(&self) -> Result<(), String> {
        if self.ttl_secs == 0 {
            return Err("cache.ttl_secs must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for CacheSettings {
    fn default() -> Self {
        Self {
            enabled: true,
            ttl_secs: 86_400,
        }
    }
}

/// Analysis collaborator configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisSettings {
    /// Upper bound on one analysis invocation, in seconds.
    pub timeout_secs: u64,
}

impl AnalysisSettings {
    /// The timeout as a `Duration`.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    fn validate(&self) -> Result<(), String> {
        if self.timeout_secs == 0 {
            return Err("analysis.timeout_secs must be at least 1".to_string());
        }
        Ok(())
    }
}

impl Default for AnalysisSettings {
    fn default() -> Self {
        Self { timeout_secs: 15 }
    }
}

/// Subscriber provisioning configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ProvisioningSettings {
    /// Whether the billing integration is configured.
    pub enabled: bool,
}

impl Default for ProvisioningSettings {
    fn default() -> Self {
        Self { enabled: true }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error).
    pub level: LogLevel,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Trace level (most verbose).
    Trace,
    /// Debug level.
    Debug,
    /// Info level (default).
    #[default]
    Info,
    /// Warning level.
    Warn,
    /// Error level (least verbose).
    Error,
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Trace => write!(f, "trace"),
            Self::Debug => write!(f, "debug"),
            Self::Info => write!(f, "info"),
            Self::Warn => write!(f, "warn"),
            Self::Error => write!(f, "error"),
        }
    }
}
