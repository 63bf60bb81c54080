use anyhow::{anyhow, bail, Context, Result};
use chrono::{DateTime, NaiveDate, NaiveTime};
use serde::Deserialize;

use crate::config;
use crate::data::models::{PriceHistory, PricePoint};

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<ChartError>,
}

#[derive(Debug, Deserialize)]
struct ChartError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    meta: ChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct ChartMeta {
    /// Exchange offset from UTC in seconds
    #[serde(default)]
    gmtoffset: i64,
}

#[derive(Debug, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Deserialize)]
struct Quote {
    #[serde(default)]
    close: Vec<Option<f64>>,
}

fn unix_seconds(date: NaiveDate) -> i64 {
    date.and_time(NaiveTime::MIN).and_utc().timestamp()
}

/// Chart endpoint for `symbol`, escaped as a single path segment
fn chart_url(symbol: &str) -> Result<reqwest::Url> {
    let mut url =
        reqwest::Url::parse(config::YAHOO_CHART_URL).context("Invalid Yahoo chart URL")?;
    url.path_segments_mut()
        .map_err(|_| anyhow!("Yahoo chart URL cannot take a path"))?
        .push(symbol);
    Ok(url)
}

/// Fetch daily closes for `symbol` in `[start, end)`
pub async fn fetch_price_history(
    client: &reqwest::Client,
    symbol: &str,
    start: NaiveDate,
    end: NaiveDate,
) -> Result<PriceHistory> {
    tracing::info!("Fetching {} daily closes ({} to {})", symbol, start, end);
    let url = chart_url(symbol)?;
    let period1 = unix_seconds(start).to_string();
    let period2 = unix_seconds(end).to_string();

    let text = client
        .get(url)
        .query(&[
            ("period1", period1.as_str()),
            ("period2", period2.as_str()),
            ("interval", "1d"),
            ("events", "history"),
        ])
        .send()
        .await
        .with_context(|| format!("Yahoo request for {} failed", symbol))?
        .text()
        .await
        .with_context(|| format!("Failed to read Yahoo response for {}", symbol))?;

    let points = parse_chart_response(&text)
        .with_context(|| format!("Invalid Yahoo chart payload for {}", symbol))?;

    Ok(PriceHistory {
        symbol: symbol.to_string(),
        points,
    })
}

/// Parse a v8 chart response into date-ordered closes.
///
/// Null closes are dropped. When the feed repeats a date (intraday snapshot of
/// the current session) the later value wins.
pub fn parse_chart_response(text: &str) -> Result<Vec<PricePoint>> {
    let envelope: ChartEnvelope = serde_json::from_str(text).context("Malformed chart JSON")?;

    if let Some(err) = envelope.chart.error {
        bail!("{}: {}", err.code, err.description);
    }

    let Some(result) = envelope.chart.result.and_then(|r| r.into_iter().next()) else {
        return Ok(vec![]);
    };
    let Some(quote) = result.indicators.quote.into_iter().next() else {
        return Ok(vec![]);
    };

    let mut points: Vec<PricePoint> = Vec::with_capacity(result.timestamp.len());
    for (ts, close) in result.timestamp.iter().zip(quote.close) {
        let Some(close) = close.filter(|c| c.is_finite()) else {
            continue;
        };
        let Some(dt) = DateTime::from_timestamp(ts + result.meta.gmtoffset, 0) else {
            continue;
        };
        let date = dt.date_naive();
        match points.last_mut() {
            Some(last) if last.date == date => last.close = close,
            _ => points.push(PricePoint { date, close }),
        }
    }

    points.sort_by_key(|p| p.date);
    Ok(points)
}
