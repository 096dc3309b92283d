//! Typed analysis request payloads.

use serde::{Deserialize, Serialize};

fn default_country() -> String {
    "us".to_string()
}

/// The operation kinds the service offers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationKind {
    /// Domain SEO overview.
    Domain,
    /// Keyword research.
    Keyword,
    /// Full site audit.
    Audit,
}

impl std::fmt::Display for OperationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Domain => write!(f, "domain"),
            Self::Keyword => write!(f, "keyword"),
            Self::Audit => write!(f, "audit"),
        }
    }
}

/// An inbound analysis request, as decoded by the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum AnalysisRequest {
    /// Analyze a domain for SEO signals.
    Domain {
        /// Domain name, possibly with scheme/`www.` noise.
        domain: String,
    },

    /// Research a keyword.
    Keyword {
        /// The keyword phrase.
        keyword: String,
        /// Two-letter country code.
        #[serde(default = "default_country")]
        country: String,
    },

    /// Audit a site.
    Audit {
        /// Page URL to audit.
        url: String,
    },
}

impl AnalysisRequest {
    /// The operation kind of this request.
    #[must_use]
    pub fn operation(&self) -> OperationKind {
        match self {
            Self::Domain { .. } => OperationKind::Domain,
            Self::Keyword { .. } => OperationKind::Keyword,
            Self::Audit { .. } => OperationKind::Audit,
        }
    }

    /// Whether results for this operation may be served from cache.
    ///
    /// Only domain overviews are cached; keyword and audit results are
    /// considered time-sensitive and recomputed every time.
    #[must_use]
    pub fn cacheable(&self) -> bool {
        matches!(self, Self::Domain { .. })
    }

    /// The original query string, as recorded in history.
    #[must_use]
    pub fn query(&self) -> &str {
        match self {
            Self::Domain { domain } => domain,
            Self::Keyword { keyword, .. } => keyword,
            Self::Audit { url } => url,
        }
    }
}
