//! "Big mover" detection: recent daily returns versus the trailing baseline.

use chrono::{Duration, NaiveDate};
use std::collections::BTreeMap;

use crate::analysis::stats::{exceeds, mean, sample_std};
use crate::config;
use crate::data::models::{DeviationReport, MoversScan, PriceHistory, ReturnPoint};

/// Which comparison decides that a symbol is off trend
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeviationRule {
    /// Any single recent return is more than k std away from the mean of the
    /// whole window (recent days included).
    #[default]
    PerObservation,
    /// The mean recent return is more than k std away from the mean of the
    /// window with the recent days excluded.
    WindowAggregate,
}

impl DeviationRule {
    pub const ALL: [DeviationRule; 2] = [
        DeviationRule::PerObservation,
        DeviationRule::WindowAggregate,
    ];

    pub fn label(self) -> &'static str {
        match self {
            DeviationRule::PerObservation => "Any recent day",
            DeviationRule::WindowAggregate => "Recent average",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            DeviationRule::PerObservation => {
                "Flag when any daily return in the recent window is beyond k std \
                 of the full-window mean"
            }
            DeviationRule::WindowAggregate => {
                "Flag when the mean recent return is beyond k std \
                 of the mean before the recent window"
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DeviationParams {
    pub history_days: i64,
    pub recent_days: i64,
    pub multiplier: f64,
    pub rule: DeviationRule,
}

impl Default for DeviationParams {
    fn default() -> Self {
        Self {
            history_days: config::HISTORY_DAYS,
            recent_days: config::RECENT_DAYS,
            multiplier: config::DEVIATION_MULTIPLIER,
            rule: DeviationRule::default(),
        }
    }
}

impl DeviationParams {
    pub fn with_rule(rule: DeviationRule) -> Self {
        Self {
            rule,
            ..Self::default()
        }
    }

    /// Fetch range `[start, end)` for a given as-of date
    pub fn fetch_range(&self, as_of: NaiveDate) -> (NaiveDate, NaiveDate) {
        (as_of - Duration::days(self.history_days), as_of)
    }

    /// Days strictly after this date belong to the recent window
    pub fn recent_boundary(&self, as_of: NaiveDate) -> NaiveDate {
        as_of - Duration::days(self.recent_days)
    }
}

fn defined_returns<'a>(points: impl Iterator<Item = &'a ReturnPoint>) -> Vec<f64> {
    points.filter_map(|p| p.ret).filter(|r| r.is_finite()).collect()
}

/// Evaluate one symbol. Returns `None` when the history has no points.
pub fn evaluate(
    history: &PriceHistory,
    as_of: NaiveDate,
    params: &DeviationParams,
) -> Option<DeviationReport> {
    if history.is_empty() {
        return None;
    }

    let window_start = as_of - Duration::days(params.history_days);
    let boundary = params.recent_boundary(as_of);

    // Returns are taken inside the window only, so the first windowed day has none
    let windowed = PriceHistory {
        symbol: history.symbol.clone(),
        points: history
            .points
            .iter()
            .filter(|p| p.date >= window_start && p.date <= as_of)
            .copied()
            .collect(),
    };
    if windowed.is_empty() {
        return None;
    }
    let points = windowed.with_returns();

    let (baseline, recent): (Vec<ReturnPoint>, Vec<ReturnPoint>) =
        points.iter().copied().partition(|p| p.date <= boundary);

    let recent_returns = defined_returns(recent.iter());
    let recent_mean = mean(&recent_returns);

    let baseline_returns = match params.rule {
        DeviationRule::PerObservation => defined_returns(points.iter()),
        DeviationRule::WindowAggregate => defined_returns(baseline.iter()),
    };
    let baseline_mean = mean(&baseline_returns);
    let baseline_std = sample_std(&baseline_returns);

    let max_recent_deviation = baseline_mean.and_then(|m| {
        recent_returns
            .iter()
            .map(|r| (r - m).abs())
            .fold(None, |acc: Option<f64>, d| Some(acc.map_or(d, |a| a.max(d))))
    });

    let flagged = match (baseline_mean, baseline_std) {
        (Some(m), Some(s)) => match params.rule {
            DeviationRule::PerObservation => recent_returns
                .iter()
                .any(|&r| exceeds(r, m, s, params.multiplier)),
            DeviationRule::WindowAggregate => {
                recent_mean.is_some_and(|rm| exceeds(rm, m, s, params.multiplier))
            }
        },
        _ => false,
    };

    Some(DeviationReport {
        symbol: history.symbol.clone(),
        flagged,
        baseline_mean,
        baseline_std,
        recent_mean,
        max_recent_deviation,
        recent,
    })
}

/// Evaluate every symbol in `symbols`, in order.
///
/// Symbols with no fetched history, or an empty one, are listed in `no_data`.
pub fn scan_watchlist(
    symbols: &[String],
    histories: &BTreeMap<String, PriceHistory>,
    as_of: NaiveDate,
    params: &DeviationParams,
) -> MoversScan {
    let mut scan = MoversScan::default();
    for symbol in symbols {
        let report = histories
            .get(symbol)
            .and_then(|h| evaluate(h, as_of, params));
        match report {
            Some(r) => scan.reports.push(r),
            None => scan.no_data.push(symbol.clone()),
        }
    }
    scan
}
