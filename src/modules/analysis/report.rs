//! Structured analysis result payloads.

use super::request::{AnalysisRequest, OperationKind};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Competition level for a keyword.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Competition {
    /// Low competition.
    Low,
    /// Medium competition.
    Medium,
    /// High competition.
    High,
}

/// SEO overview of a domain.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DomainReport {
    /// The cleaned domain name.
    pub domain: String,

    /// Overall SEO score, 0-100.
    pub seo_score: u32,

    /// Whether the site serves over HTTPS.
    pub has_ssl: bool,

    /// Page title, when one was found.
    pub title: Option<String>,

    /// Approximate word count of the homepage.
    pub word_count: u32,

    /// Problems found.
    pub issues: Vec<String>,

    /// Suggested improvements.
    pub recommendations: Vec<String>,

    /// Degradation note when the analysis could not complete normally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// When the analysis ran.
    pub analyzed_at: DateTime<Utc>,
}

impl DomainReport {
    /// A zero-scored report for a failed or timed-out analysis.
    #[must_use]
    pub fn degraded(domain: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            domain: domain.into(),
            seo_score: 0,
            has_ssl: false,
            title: None,
            word_count: 0,
            issues: Vec::new(),
            recommendations: Vec::new(),
            note: Some(note.into()),
            analyzed_at: Utc::now(),
        }
    }
}

/// Keyword research result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct KeywordReport {
    /// The researched keyword.
    pub keyword: String,

    /// Country code the volumes apply to.
    pub country: String,

    /// Estimated monthly search volume.
    pub monthly_volume: u64,

    /// Ranking difficulty, 0-100.
    pub keyword_difficulty: u32,

    /// Estimated cost per click in USD.
    pub cpc_usd: f64,

    /// Competition level.
    pub competition: Competition,

    /// Opportunity score, 0-100.
    pub opportunity_score: u32,

    /// Degradation note when the analysis could not complete normally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// When the analysis ran.
    pub analyzed_at: DateTime<Utc>,
}

impl KeywordReport {
    /// A zero-scored report for a failed or timed-out analysis.
    #[must_use]
    pub fn degraded(
        keyword: impl Into<String>,
        country: impl Into<String>,
        note: impl Into<String>,
    ) -> Self {
        Self {
            keyword: keyword.into(),
            country: country.into(),
            monthly_volume: 0,
            keyword_difficulty: 0,
            cpc_usd: 0.0,
            competition: Competition::Low,
            opportunity_score: 0,
            note: Some(note.into()),
            analyzed_at: Utc::now(),
        }
    }
}

/// Site audit result.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditReport {
    /// The audited URL.
    pub url: String,

    /// Overall health score, 0-100.
    pub health_score: u32,

    /// Checks that passed.
    pub passed: u32,

    /// Checks with warnings.
    pub warnings: u32,

    /// Checks that failed.
    pub issues: u32,

    /// Degradation note when the audit could not complete normally.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub note: Option<String>,

    /// When the audit ran.
    pub audited_at: DateTime<Utc>,
}

impl AuditReport {
    /// A zero-scored report for a failed or timed-out audit.
    #[must_use]
    pub fn degraded(url: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            health_score: 0,
            passed: 0,
            warnings: 0,
            issues: 0,
            note: Some(note.into()),
            audited_at: Utc::now(),
        }
    }
}

/// Any analysis result, as returned to the transport layer.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum AnalysisReport {
    /// Domain overview result.
    Domain(DomainReport),
    /// Keyword research result.
    Keyword(KeywordReport),
    /// Site audit result.
    Audit(AuditReport),
}

impl AnalysisReport {
    /// The operation kind that produced this report.
    #[must_use]
    pub fn operation(&self) -> OperationKind {
        match self {
            Self::Domain(_) => OperationKind::Domain,
            Self::Keyword(_) => OperationKind::Keyword,
            Self::Audit(_) => OperationKind::Audit,
        }
    }

    /// The headline metric recorded in history: SEO score, monthly
    /// volume, or health score depending on the operation.
    #[must_use]
    pub fn headline_score(&self) -> u64 {
        match self {
            Self::Domain(report) => u64::from(report.seo_score),
            Self::Keyword(report) => report.monthly_volume,
            Self::Audit(report) => u64::from(report.health_score),
        }
    }

    /// Whether this report carries a degradation note.
    #[must_use]
    pub fn is_degraded(&self) -> bool {
        match self {
            Self::Domain(report) => report.note.is_some(),
            Self::Keyword(report) => report.note.is_some(),
            Self::Audit(report) => report.note.is_some(),
        }
    }

    /// Build a zero-scored report matching the shape of a request.
    ///
    /// Used when the collaborator times out: the subscriber still gets a
    /// well-formed, annotated payload for the operation they asked for.
    #[must_use]
    pub fn degraded_for(request: &AnalysisRequest, note: impl Into<String>) -> Self {
        match request {
            AnalysisRequest::Domain { domain } => Self::Domain(DomainReport::degraded(domain, note)),
            AnalysisRequest::Keyword { keyword, country } => {
                Self::Keyword(KeywordReport::degraded(keyword, country, note))
            },
            AnalysisRequest::Audit { url } => Self::Audit(AuditReport::degraded(url, note)),
        }
    }
}
