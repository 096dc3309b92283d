//! The gateway error taxonomy.

use crate::config::Quota;
use thiserror::Error;

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;

/// Errors the gateway returns instead of doing work.
///
/// Every variant rejects the request before any analysis runs; a failure
/// inside the analysis itself is folded into the result payload and is
/// not represented here.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Missing or unknown credential. Fatal, no retry.
    #[error("invalid or missing API credential")]
    Unauthenticated,

    /// Usage reached the plan ceiling. Recoverable only by upgrading or
    /// waiting for the period reset.
    #[error("monthly quota exceeded ({used}/{limit}); upgrade your plan")]
    QuotaExceeded {
        /// Committed usage at denial time.
        used: u64,
        /// The plan ceiling.
        limit: Quota,
    },

    /// No rate token available. Transient; the caller retries later.
    #[error("rate limit exceeded; retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until a token becomes available.
        retry_after_secs: u64,
    },

    /// Server-side misconfiguration, not subscriber-caused.
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl GatewayError {
    /// Stable classification label for the transport layer to map onto
    /// user-visible status.
    #[must_use]
    pub fn classification(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "unauthenticated",
            Self::QuotaExceeded { .. } => "quota_exceeded",
            Self::RateLimited { .. } => "rate_limited",
            Self::Configuration(_) => "configuration_error",
        }
    }

    /// Check if the error is attributable to the subscriber.
    #[must_use]
    pub fn is_subscriber_fault(&self) -> bool {
        !matches!(self, Self::Configuration(_))
    }

    /// Check if retrying later can succeed without any other change.
    #[must_use]
    pub fn is_transient(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }
}
