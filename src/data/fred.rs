use anyhow::{bail, Context, Result};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::io::Cursor;
use std::path::Path;

use crate::config;
use crate::data::cache;
use crate::data::models::Observation;

fn parse_date(s: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d").ok()
}

/// One file per series; each fetch overwrites it
fn cache_file_name(code: &str) -> String {
    format!("fred_{}.json", code)
}

/// On-disk copy of the last successful fetch of a series
#[derive(Debug, Serialize, Deserialize)]
struct CachedSeries {
    start: NaiveDate,
    end: NaiveDate,
    observations: Vec<Observation>,
}

impl CachedSeries {
    fn covers(&self, start: NaiveDate, end: NaiveDate) -> bool {
        self.start <= start && self.end >= end
    }

    fn within(self, start: NaiveDate, end: NaiveDate) -> Vec<Observation> {
        self.observations
            .into_iter()
            .filter(|o| o.date >= start && o.date <= end)
            .collect()
    }
}

/// Fetch a FRED series through the graph CSV endpoint (no API key required).
///
/// Responses are mirrored to the disk cache; a fresh file covering the range
/// skips the network and any cached file is used when the request fails.
pub async fn fetch_series(
    client: &reqwest::Client,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Observation>> {
    let dir = match cache::cache_dir() {
        Ok(dir) => Some(dir),
        Err(e) => {
            tracing::warn!("Disk cache unavailable: {:#}", e);
            None
        }
    };
    fetch_series_cached(client, dir.as_deref(), code, start, end).await
}

async fn fetch_series_cached(
    client: &reqwest::Client,
    dir: Option<&Path>,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<Vec<Observation>> {
    let cache_file = cache_file_name(code);
    let load_cached = || {
        dir.and_then(|dir| cache::load_json::<CachedSeries>(dir, &cache_file).ok())
    };

    let max_age = config::DISK_CACHE_AGE_HOURS;
    if dir.is_some_and(|dir| cache::is_cache_fresh(dir, &cache_file, max_age)) {
        if let Some(cached) = load_cached().filter(|c| c.covers(start, end)) {
            tracing::info!("Using cached FRED series {}", code);
            return Ok(cached.within(start, end));
        }
    }

    tracing::info!("Fetching FRED series {} ({} to {})", code, start, end);
    let text = match request_csv(client, code, start, end).await {
        Ok(text) => text,
        Err(e) => {
            tracing::warn!("Failed to fetch FRED series {}: {:#} - trying cache", code, e);
            if let Some(cached) = load_cached() {
                tracing::info!(
                    "Using stale FRED series {} ({} to {})",
                    code,
                    cached.start,
                    cached.end
                );
                return Ok(cached.within(start, end));
            }
            return Err(e);
        }
    };

    let observations = parse_fredgraph_csv(&text, code)?;

    if let Some(dir) = dir {
        let entry = CachedSeries {
            start,
            end,
            observations,
        };
        if let Err(e) = cache::save_json(dir, &cache_file, &entry) {
            tracing::warn!("Failed to cache FRED series {}: {}", code, e);
        }
        return Ok(entry.observations);
    }

    Ok(observations)
}

async fn request_csv(
    client: &reqwest::Client,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<String> {
    let start = start.format("%Y-%m-%d").to_string();
    let end = end.format("%Y-%m-%d").to_string();
    let resp = client
        .get(config::FRED_GRAPH_URL)
        .query(&[("id", code), ("cosd", start.as_str()), ("coed", end.as_str())])
        .send()
        .await
        .with_context(|| format!("FRED request for {} failed", code))?
        .error_for_status()
        .with_context(|| format!("FRED returned an error status for {}", code))?;
    resp.text()
        .await
        .with_context(|| format!("Failed to read FRED response for {}", code))
}

/// Parse `fredgraph.csv`: a date column (`observation_date` or `DATE`) and a
/// value column named after the series. Missing values (`.` or blank) are dropped.
pub fn parse_fredgraph_csv(text: &str, code: &str) -> Result<Vec<Observation>> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_reader(Cursor::new(text));

    let headers = reader.headers().context("Missing CSV headers")?.clone();

    let date_idx = headers
        .iter()
        .position(|h| {
            let h = h.trim();
            h.eq_ignore_ascii_case("observation_date") || h.eq_ignore_ascii_case("DATE")
        })
        .with_context(|| format!("No date column in FRED response for {}", code))?;

    let value_idx = headers
        .iter()
        .position(|h| h.trim().eq_ignore_ascii_case(code))
        .or_else(|| (headers.len() == 2).then_some(1 - date_idx))
        .with_context(|| format!("No {} column in FRED response", code))?;

    if date_idx == value_idx {
        bail!("FRED response for {} has no value column", code);
    }

    let mut observations = Vec::new();
    for result in reader.records() {
        let record = result.context("Invalid CSV row")?;
        let date_str = record.get(date_idx).unwrap_or("");
        let value_str = record.get(value_idx).unwrap_or("").trim();

        let Some(date) = parse_date(date_str) else {
            continue;
        };
        let Ok(value) = value_str.parse::<f64>() else {
            continue;
        };
        if !value.is_finite() {
            continue;
        }

        observations.push(Observation { date, value });
    }

    observations.sort_by_key(|o| o.date);
    Ok(observations)
}
