//! Request fingerprinting.

use crate::modules::analysis::AnalysisRequest;
use regex::Regex;
use sha2::{Digest, Sha256};
use std::fmt::Write;
use std::sync::OnceLock;

fn scheme_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^https?://").unwrap())
}

fn www_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^www\.").unwrap())
}

/// A deterministic cache key derived from normalized request content.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Fingerprint for a domain overview request.
    ///
    /// The domain is trimmed, lower-cased, and stripped of scheme, `www.`
    /// prefix, and any path before hashing.
    #[must_use]
    pub fn for_domain(raw: &str) -> Self {
        Self::digest(&normalize_domain(raw))
    }

    /// Fingerprint for a keyword research request.
    #[must_use]
    pub fn for_keyword(keyword: &str, country: &str) -> Self {
        let normalized = format!(
            "{}:{}",
            keyword.trim().to_lowercase(),
            country.trim().to_lowercase()
        );
        Self::digest(&normalized)
    }

    /// Fingerprint for a site audit request.
    #[must_use]
    pub fn for_url(raw: &str) -> Self {
        Self::digest(&raw.trim().to_lowercase())
    }

    /// Fingerprint for any request, by operation kind.
    #[must_use]
    pub fn for_request(request: &AnalysisRequest) -> Self {
        match request {
            AnalysisRequest::Domain { domain } => Self::for_domain(domain),
            AnalysisRequest::Keyword { keyword, country } => Self::for_keyword(keyword, country),
            AnalysisRequest::Audit { url } => Self::for_url(url),
        }
    }

    /// The hex digest as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    fn digest(normalized: &str) -> Self {
        let digest = Sha256::digest(normalized.as_bytes());

        let mut hex = String::with_capacity(64);
        for byte in digest {
            let _ = write!(hex, "{byte:02x}");
        }
        Self(hex)
    }
}

impl std::fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Reduce a raw domain input to its bare hostname.
fn normalize_domain(raw: &str) -> String {
    let domain = raw.trim().to_lowercase();
    let domain = scheme_re().replace(&domain, "");
    let domain = www_re().replace(&domain, "");
    domain
        .split('/')
        .next()
        .unwrap_or_default()
        .to_string()
}
