use anyhow::{Context, Result};
use chrono::NaiveDate;
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant, SystemTime};

use crate::config;
use crate::data::models::Observation;

/// Directory holding cached JSON responses, created on first use
pub fn cache_dir() -> Result<PathBuf> {
    let dir = match config::cache_dir_override() {
        Some(custom) => PathBuf::from(custom),
        None => dirs::cache_dir()
            .context("No user cache directory on this platform")?
            .join("market-pages"),
    };
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("Failed to create cache dir {}", dir.display()))?;
    Ok(dir)
}

/// Whether `dir/file_name` exists and was written less than `max_age_hours` ago
pub fn is_cache_fresh(dir: &Path, file_name: &str, max_age_hours: u64) -> bool {
    let Ok(meta) = std::fs::metadata(dir.join(file_name)) else {
        return false;
    };
    let Ok(modified) = meta.modified() else {
        return false;
    };
    SystemTime::now()
        .duration_since(modified)
        .map(|age| age < Duration::from_secs(max_age_hours * 3600))
        .unwrap_or(true)
}

pub fn load_json<T: DeserializeOwned>(dir: &Path, file_name: &str) -> Result<T> {
    let path = dir.join(file_name);
    let text = std::fs::read_to_string(&path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    serde_json::from_str(&text).with_context(|| format!("Invalid JSON in {}", path.display()))
}

pub fn save_json<T: Serialize>(dir: &Path, file_name: &str, value: &T) -> Result<()> {
    let path = dir.join(file_name);
    let text = serde_json::to_string(value).context("Failed to serialize cache entry")?;
    std::fs::write(&path, text).with_context(|| format!("Failed to write {}", path.display()))
}

/// Memo key: series code plus the requested date range
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct FetchKey {
    pub code: String,
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl FetchKey {
    pub fn new(code: &str, start: NaiveDate, end: NaiveDate) -> Self {
        Self {
            code: code.to_string(),
            start,
            end,
        }
    }
}

struct Entry {
    stored_at: Instant,
    observations: Vec<Observation>,
}

/// In-memory memo table for fetch results, keyed by (code, start, end).
///
/// Entries expire after `ttl`. Empty results are never stored so that a failed
/// fetch is retried on the next request.
pub struct FetchCache {
    ttl: Duration,
    entries: HashMap<FetchKey, Entry>,
}

impl Default for FetchCache {
    fn default() -> Self {
        Self::new(Duration::from_secs(config::FETCH_TTL_SECS))
    }
}

impl FetchCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: HashMap::new(),
        }
    }

    pub fn get(&self, key: &FetchKey) -> Option<Vec<Observation>> {
        self.get_at(key, Instant::now())
    }

    pub fn get_at(&self, key: &FetchKey, now: Instant) -> Option<Vec<Observation>> {
        let entry = self.entries.get(key)?;
        if now.saturating_duration_since(entry.stored_at) >= self.ttl {
            return None;
        }
        Some(entry.observations.clone())
    }

    pub fn insert(&mut self, key: FetchKey, observations: Vec<Observation>) {
        self.insert_at(key, observations, Instant::now());
    }

    pub fn insert_at(&mut self, key: FetchKey, observations: Vec<Observation>, now: Instant) {
        if observations.is_empty() {
            return;
        }
        self.entries.insert(
            key,
            Entry {
                stored_at: now,
                observations,
            },
        );
    }

    /// Drop every entry whose code is in `codes`
    pub fn invalidate<S: AsRef<str>>(&mut self, codes: &[S]) {
        self.entries
            .retain(|k, _| !codes.iter().any(|c| c.as_ref() == k.code));
    }

    pub fn purge_expired(&mut self, now: Instant) {
        let ttl = self.ttl;
        self.entries
            .retain(|_, e| now.saturating_duration_since(e.stored_at) < ttl);
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    fn obs(v: f64) -> Vec<Observation> {
        vec![Observation { date: d(2024, 1, 2), value: v }]
    }

    #[test]
    fn test_memo_hit_within_ttl() {
        let mut cache = FetchCache::new(Duration::from_secs(60));
        let key = FetchKey::new("DGS10", d(1990, 1, 1), d(2024, 1, 2));
        let t0 = Instant::now();
        cache.insert_at(key.clone(), obs(4.0), t0);
        assert_eq!(cache.get_at(&key, t0 + Duration::from_secs(59)), Some(obs(4.0)));
    }

    #[test]
    fn test_memo_expires_after_ttl() {
        let mut cache = FetchCache::new(Duration::from_secs(60));
        let key = FetchKey::new("DGS10", d(1990, 1, 1), d(2024, 1, 2));
        let t0 = Instant::now();
        cache.insert_at(key.clone(), obs(4.0), t0);
        assert_eq!(cache.get_at(&key, t0 + Duration::from_secs(60)), None);
        cache.purge_expired(t0 + Duration::from_secs(61));
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_memo_key_includes_range() {
        let mut cache = FetchCache::new(Duration::from_secs(60));
        cache.insert(FetchKey::new("AAPL", d(2024, 1, 1), d(2024, 6, 1)), obs(1.0));
        assert!(cache
            .get(&FetchKey::new("AAPL", d(2024, 1, 2), d(2024, 6, 2)))
            .is_none());
    }

    #[test]
    fn test_empty_results_not_memoized() {
        let mut cache = FetchCache::default();
        let key = FetchKey::new("NOPE", d(2024, 1, 1), d(2024, 6, 1));
        cache.insert(key.clone(), vec![]);
        assert!(cache.get(&key).is_none());
        assert_eq!(cache.len(), 0);
    }

    #[test]
    fn test_invalidate_by_code() {
        let mut cache = FetchCache::default();
        cache.insert(FetchKey::new("VIXCLS", d(1990, 1, 1), d(2024, 1, 2)), obs(13.0));
        cache.insert(FetchKey::new("DGS2", d(1990, 1, 1), d(2024, 1, 2)), obs(4.3));
        cache.invalidate(&["VIXCLS"]);
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_json_roundtrip_and_freshness() {
        let dir = std::env::temp_dir().join(format!("market-pages-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        save_json(&dir, "vix.json", &obs(12.5)).unwrap();
        let back: Vec<Observation> = load_json(&dir, "vix.json").unwrap();
        assert_eq!(back, obs(12.5));
        assert!(is_cache_fresh(&dir, "vix.json", 1));
        assert!(!is_cache_fresh(&dir, "missing.json", 1));
        let _ = std::fs::remove_dir_all(&dir);
    }
}
