use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use super::topics::EducationTopic;

/// Get the platform-appropriate cache directory for loan-check
pub fn get_cache_path() -> PathBuf {
    dirs::cache_dir()
        .map(|p| p.join("loan-check/education"))
        .unwrap_or_else(|| {
            PathBuf::from(format!(
                "{}/.cache/loan-check/education",
                std::env::var("HOME").unwrap_or_default()
            ))
        })
}

/// Cached educational text with the time it was fetched
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedEducation {
    pub content: String,
    pub fetched_at: DateTime<Utc>,
}

impl CachedEducation {
    pub fn is_fresh(&self, ttl: Duration, now: DateTime<Utc>) -> bool {
        let Ok(ttl) = chrono::Duration::from_std(ttl) else {
            return true; // Absurdly long TTL never expires
        };
        now.signed_duration_since(self.fetched_at) < ttl
    }
}

/// Disk cache for education responses. Advice is never cached: it depends
/// on the applicant.
#[derive(Debug, Clone)]
pub struct EducationCache {
    path: PathBuf,
    ttl: Duration,
}

impl EducationCache {
    pub fn new(path: PathBuf, ttl: Duration) -> Self {
        Self { path, ttl }
    }

    fn key(model: &str, topic: EducationTopic) -> String {
        format!("education:{}:{}", model, topic.slug())
    }

    fn read_entry(&self, model: &str, topic: EducationTopic) -> Option<CachedEducation> {
        let bytes = cacache::read_sync(&self.path, Self::key(model, topic)).ok()?;
        serde_json::from_slice(&bytes).ok()
    }

    /// Fresh cached content for `topic`, if any
    pub fn get(&self, model: &str, topic: EducationTopic) -> Option<String> {
        self.read_entry(model, topic)
            .filter(|entry| entry.is_fresh(self.ttl, Utc::now()))
            .map(|entry| entry.content)
    }

    pub fn put(&self, model: &str, topic: EducationTopic, content: &str) -> Result<()> {
        let entry = CachedEducation {
            content: content.to_string(),
            fetched_at: Utc::now(),
        };
        let json = serde_json::to_vec(&entry)?;
        cacache::write_sync(&self.path, Self::key(model, topic), json)?;
        Ok(())
    }
}

/// Remove every cached entry
pub fn clear_cache(path: &Path) -> Result<()> {
    match std::fs::remove_dir_all(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;

    #[test]
    fn test_freshness_window() {
        let now = Utc::now();
        let entry = CachedEducation {
            content: "x".to_string(),
            fetched_at: now - chrono::Duration::hours(2),
        };
        assert!(entry.is_fresh(Duration::from_secs(3 * 3600), now));
        assert!(!entry.is_fresh(Duration::from_secs(3600), now));
    }

    #[test]
    fn test_put_then_get() {
        let dir = env::temp_dir().join("loan_check_test_education_cache");
        let _ = clear_cache(&dir);

        let cache = EducationCache::new(dir.clone(), Duration::from_secs(3600));
        assert!(cache.get("gemini-2.0-flash", EducationTopic::CreditScores).is_none());

        cache
            .put("gemini-2.0-flash", EducationTopic::CreditScores, "Scores range from 300 to 850.")
            .unwrap();
        assert_eq!(
            cache.get("gemini-2.0-flash", EducationTopic::CreditScores).as_deref(),
            Some("Scores range from 300 to 850.")
        );
        // Keyed by model and topic
        assert!(cache.get("other-model", EducationTopic::CreditScores).is_none());
        assert!(cache.get("gemini-2.0-flash", EducationTopic::LoanTerms).is_none());

        let _ = clear_cache(&dir);
    }

    #[test]
    fn test_zero_ttl_is_always_stale() {
        let dir = env::temp_dir().join("loan_check_test_education_cache_stale");
        let _ = clear_cache(&dir);

        let cache = EducationCache::new(dir.clone(), Duration::ZERO);
        cache
            .put("m", EducationTopic::FinancialPlanning, "budget first")
            .unwrap();
        assert!(cache.get("m", EducationTopic::FinancialPlanning).is_none());

        let _ = clear_cache(&dir);
    }

    #[test]
    fn test_clear_missing_cache_is_ok() {
        let dir = env::temp_dir().join("loan_check_test_education_cache_missing");
        let _ = std::fs::remove_dir_all(&dir);
        assert!(clear_cache(&dir).is_ok());
    }
}
