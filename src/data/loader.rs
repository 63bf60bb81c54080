//! Fetch entry points used by the pages.
//!
//! Every loader goes through the shared memo table first and never fails:
//! errors are logged and surface as an empty series.

use chrono::NaiveDate;
use std::sync::{Arc, Mutex};

use crate::config::{self, Maturity};
use crate::data::cache::{FetchCache, FetchKey};
use crate::data::models::{Observation, PriceHistory, PricePoint, VixReading};
use crate::data::{fred, yahoo};

pub type SharedFetchCache = Arc<Mutex<FetchCache>>;

fn memo_get(cache: &SharedFetchCache, key: &FetchKey) -> Option<Vec<Observation>> {
    let hit = cache.lock().ok()?.get(key);
    if hit.is_some() {
        tracing::debug!("Memo hit for {} ({} to {})", key.code, key.start, key.end);
    }
    hit
}

fn memo_put(cache: &SharedFetchCache, key: FetchKey, observations: &[Observation]) {
    if let Ok(mut guard) = cache.lock() {
        guard.insert(key, observations.to_vec());
    }
}

pub fn fred_start() -> NaiveDate {
    let (y, m, d) = config::FRED_START;
    NaiveDate::from_ymd_opt(y, m, d).unwrap_or(NaiveDate::MIN)
}

/// Daily closes for each symbol in `[start, end)`. Failed symbols come back empty.
pub async fn load_price_histories(
    client: &reqwest::Client,
    cache: &SharedFetchCache,
    symbols: &[String],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<PriceHistory> {
    let mut out = Vec::with_capacity(symbols.len());
    for symbol in symbols {
        let key = FetchKey::new(symbol, start, end);
        if let Some(obs) = memo_get(cache, &key) {
            out.push(PriceHistory {
                symbol: symbol.clone(),
                points: obs
                    .into_iter()
                    .map(|o| PricePoint { date: o.date, close: o.value })
                    .collect(),
            });
            continue;
        }

        match yahoo::fetch_price_history(client, symbol, start, end).await {
            Ok(history) => {
                let obs: Vec<Observation> = history
                    .points
                    .iter()
                    .map(|p| Observation { date: p.date, value: p.close })
                    .collect();
                memo_put(cache, key, &obs);
                if history.is_empty() {
                    tracing::warn!("No price data returned for {}", symbol);
                }
                out.push(history);
            }
            Err(e) => {
                tracing::warn!("Failed to fetch {}: {:#}", symbol, e);
                out.push(PriceHistory::empty(symbol));
            }
        }
    }
    out
}

async fn load_fred_series(
    client: &reqwest::Client,
    cache: &SharedFetchCache,
    code: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<Observation> {
    let key = FetchKey::new(code, start, end);
    if let Some(obs) = memo_get(cache, &key) {
        return obs;
    }
    match fred::fetch_series(client, code, start, end).await {
        Ok(obs) => {
            memo_put(cache, key, &obs);
            obs
        }
        Err(e) => {
            tracing::warn!("Failed to fetch FRED series {}: {:#}", code, e);
            vec![]
        }
    }
}

/// Every Treasury maturity series, in the order of `maturities`
pub async fn load_treasury_series(
    client: &reqwest::Client,
    cache: &SharedFetchCache,
    maturities: &[Maturity],
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<(Maturity, Vec<Observation>)> {
    let mut out = Vec::with_capacity(maturities.len());
    for m in maturities {
        let obs = load_fred_series(client, cache, m.code, start, end).await;
        out.push((*m, obs));
    }
    out
}

pub async fn load_vix(
    client: &reqwest::Client,
    cache: &SharedFetchCache,
    start: NaiveDate,
    end: NaiveDate,
) -> Vec<VixReading> {
    load_fred_series(client, cache, config::VIX_SERIES, start, end)
        .await
        .into_iter()
        .map(|o| VixReading { date: o.date, level: o.value })
        .collect()
}
