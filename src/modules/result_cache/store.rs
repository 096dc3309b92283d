//! The TTL-bounded result store.

use super::fingerprint::Fingerprint;
use crate::modules::analysis::AnalysisReport;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::RwLock;
use std::time::{Duration, Instant};
use tracing::debug;

/// One cached result.
#[derive(Debug)]
struct CacheEntry {
    report: AnalysisReport,
    cached_at: Instant,
}

/// Time-bounded cache of analysis reports keyed by fingerprint.
///
/// Reads past the TTL behave as misses; the stale entry is left in place
/// until the next write for that fingerprint overwrites it. There is no
/// eviction policy beyond TTL staleness.
#[derive(Debug)]
pub struct ResultCache {
    /// Entries keyed by fingerprint digest.
    entries: RwLock<HashMap<String, CacheEntry>>,

    /// Entry time-to-live.
    ttl: Duration,

    /// Stats: valid hits.
    hits: AtomicU64,

    /// Stats: misses (absent or stale).
    misses: AtomicU64,
}

impl ResultCache {
    /// Create a cache with the given entry TTL.
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            ttl,
            hits: AtomicU64::new(0),
            misses: AtomicU64::new(0),
        }
    }

    /// Look up a fresh entry.
    ///
    /// Returns the cached report only while its age is below the TTL;
    /// anything else counts (and is counted) as a miss.
    #[must_use]
    pub fn get(&self, fingerprint: &Fingerprint) -> Option<AnalysisReport> {
        let entries = self.entries.read().unwrap();

        if let Some(entry) = entries.get(fingerprint.as_str()) {
            if entry.cached_at.elapsed() < self.ttl {
                self.hits.fetch_add(1, Ordering::Relaxed);
                return Some(entry.report.clone());
            }
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        None
    }

    /// Store a result, overwriting any existing entry for the fingerprint.
    pub fn put(&self, fingerprint: &Fingerprint, report: AnalysisReport) {
        let mut entries = self.entries.write().unwrap();
        debug!(fingerprint = %fingerprint, "result cached");
        entries.insert(
            fingerprint.as_str().to_string(),
            CacheEntry {
                report,
                cached_at: Instant::now(),
            },
        );
    }

    /// Total valid hits.
    #[must_use]
    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    /// Total misses.
    #[must_use]
    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    /// Hit rate as a percentage, rounded to one decimal.
    #[must_use]
    pub fn hit_rate(&self) -> f64 {
        let hits = self.hits() as f64;
        let total = hits + self.misses() as f64;
        ((hits / total.max(1.0)) * 1000.0).round() / 10.0
    }

    /// Number of physically present entries, stale ones included.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.read().unwrap().len()
    }

    /// Returns `true` if the cache holds no entries.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.read().unwrap().is_empty()
    }

    /// The configured TTL.
    #[must_use]
    pub fn ttl(&self) -> Duration {
        self.ttl
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::analysis::DomainReport;
    use chrono::Utc;

    fn sample_report(domain: &str, score: u32) -> AnalysisReport {
        AnalysisReport::Domain(DomainReport {
            domain: domain.to_string(),
            seo_score: score,
            has_ssl: true,
            title: None,
            word_count: 0,
            issues: vec![],
            recommendations: vec![],
            note: None,
            analyzed_at: Utc::now(),
        })
    }

    #[test]
    fn test_miss_then_hit() {
        let cache = ResultCache::new(Duration::from_secs(60));
        let fingerprint = Fingerprint::for_domain("example.com");

        assert!(cache.get(&fingerprint).is_none());
        assert_eq!(cache.misses(), 1);

        cache.put(&fingerprint, sample_report("example.com", 80));

        let hit = cache.get(&fingerprint).unwrap();
        assert_eq!(hit.headline_score(), 80);
        assert_eq!(cache.hits(), 1);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_expired_entry_is_a_miss() {
        let cache = ResultCache::new(Duration::from_millis(30));
        let fingerprint = Fingerprint::for_domain("example.com");

        cache.put(&fingerprint, sample_report("example.com", 80));
        assert!(cache.get(&fingerprint).is_some());

        std::thread::sleep(Duration::from_millis(40));

        // still physically present, but never returned as a hit
        assert_eq!(cache.len(), 1);
        assert!(cache.get(&fingerprint).is_none());
        assert_eq!(cache.misses(), 1);
    }

    #[test]
    fn test_put_overwrites() {
        let cache = ResultCache::new(Duration::from_secs(60));
        let fingerprint = Fingerprint::for_domain("example.com");

        cache.put(&fingerprint, sample_report("example.com", 40));
        cache.put(&fingerprint, sample_report("example.com", 90));

        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&fingerprint).unwrap().headline_score(), 90);
    }

    #[test]
    fn test_hit_rate() {
        let cache = ResultCache::new(Duration::from_secs(60));
        let fingerprint = Fingerprint::for_domain("example.com");

        assert_eq!(cache.hit_rate(), 0.0);

        cache.put(&fingerprint, sample_report("example.com", 80));
        cache.get(&fingerprint); // hit
        cache.get(&Fingerprint::for_domain("other.com")); // miss
        cache.get(&fingerprint); // hit

        // 2 hits / 3 lookups
        assert_eq!(cache.hit_rate(), 66.7);
    }
}
