//! # Configuration
//!
//! Typed TOML configuration for the gateway: plan table, cache TTL,
//! analysis timeout, provisioning, and logging. Loaded at process start;
//! every section has working defaults so an empty file is valid.

mod error;
mod loader;
mod types;

pub use error::{ConfigError, ConfigResult};
pub use loader::ConfigLoader;
pub use types::{
    AnalysisSettings, CacheSettings, GatewayConfig, GatewaySection, LogLevel, LoggingConfig, Plan,
    PlanTable, PlanTier, ProvisioningSettings, Quota,
};
