//! Tollgate binary entry point.

use tracing_subscriber::EnvFilter;

/// Entry point for the tollgate gateway.
///
/// Initializes logging and loads configuration. The transport layer that
/// feeds requests into the admission pipeline is wired up by the
/// embedding service.
fn main() {
    let default_level = tollgate::config::GatewayConfig::default()
        .logging
        .level
        .to_string();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    println!("tollgate v{}", env!("CARGO_PKG_VERSION"));
    println!("Starting admission gateway...");
}
