use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Daily close for a given date
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PricePoint {
    pub date: NaiveDate,
    pub close: f64,
}

/// Single dated observation of a FRED series
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observation {
    pub date: NaiveDate,
    pub value: f64,
}

/// Close price together with its simple return versus the previous close
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReturnPoint {
    pub date: NaiveDate,
    pub close: f64,
    /// `None` for the first point or when the previous close is unusable
    pub ret: Option<f64>,
}

/// Date-ordered closes for a single symbol over the trailing window
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceHistory {
    pub symbol: String,
    pub points: Vec<PricePoint>,
}

impl PriceHistory {
    pub fn empty(symbol: &str) -> Self {
        Self {
            symbol: symbol.to_string(),
            points: vec![],
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Simple returns `(close[t] - close[t-1]) / close[t-1]`, aligned with `points`
    pub fn with_returns(&self) -> Vec<ReturnPoint> {
        let mut out = Vec::with_capacity(self.points.len());
        let mut prev: Option<f64> = None;
        for p in &self.points {
            let ret = prev.and_then(|c0| {
                if c0 == 0.0 || !c0.is_finite() || !p.close.is_finite() {
                    None
                } else {
                    Some((p.close - c0) / c0)
                }
            });
            out.push(ReturnPoint {
                date: p.date,
                close: p.close,
                ret,
            });
            prev = Some(p.close);
        }
        out
    }
}

/// Outcome of comparing a symbol's recent returns with its baseline
#[derive(Debug, Clone, PartialEq)]
pub struct DeviationReport {
    pub symbol: String,
    pub flagged: bool,
    pub baseline_mean: Option<f64>,
    pub baseline_std: Option<f64>,
    pub recent_mean: Option<f64>,
    /// Largest |r - baseline mean| over the recent window
    pub max_recent_deviation: Option<f64>,
    pub recent: Vec<ReturnPoint>,
}

/// Result of evaluating every watchlist symbol
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MoversScan {
    pub reports: Vec<DeviationReport>,
    /// Symbols whose fetch came back empty
    pub no_data: Vec<String>,
}

impl MoversScan {
    pub fn flagged(&self) -> impl Iterator<Item = &DeviationReport> {
        self.reports.iter().filter(|r| r.flagged)
    }
}

/// One maturity on a yield curve
#[derive(Debug, Clone, PartialEq)]
pub struct YieldCurvePoint {
    pub label: &'static str,
    pub years: f64,
    pub yield_pct: f64,
}

/// Cross-section of Treasury yields on one date, shortest maturity first
#[derive(Debug, Clone, PartialEq)]
pub struct YieldCurveSnapshot {
    pub requested: NaiveDate,
    pub date: NaiveDate,
    pub points: Vec<YieldCurvePoint>,
}

impl YieldCurveSnapshot {
    pub fn yield_for(&self, label: &str) -> Option<f64> {
        self.points
            .iter()
            .find(|p| p.label == label)
            .map(|p| p.yield_pct)
    }

    /// 10Y minus 2Y, in percentage points
    pub fn spread_10y_2y(&self) -> Option<f64> {
        Some(self.yield_for("10Y")? - self.yield_for("2Y")?)
    }

    pub fn is_inverted(&self) -> bool {
        self.spread_10y_2y().is_some_and(|s| s < 0.0)
    }
}

/// Daily VIX closing level
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VixReading {
    pub date: NaiveDate,
    pub level: f64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    #[test]
    fn test_returns_first_point_undefined() {
        let h = PriceHistory {
            symbol: "AAPL".into(),
            points: vec![
                PricePoint { date: d(2024, 1, 2), close: 100.0 },
                PricePoint { date: d(2024, 1, 3), close: 110.0 },
                PricePoint { date: d(2024, 1, 4), close: 99.0 },
            ],
        };
        let r = h.with_returns();
        assert_eq!(r.len(), 3);
        assert_eq!(r[0].ret, None);
        assert!((r[1].ret.unwrap() - 0.10).abs() < 1e-12);
        assert!((r[2].ret.unwrap() + 0.10).abs() < 1e-12);
    }

    #[test]
    fn test_return_after_zero_close_is_undefined() {
        let h = PriceHistory {
            symbol: "X".into(),
            points: vec![
                PricePoint { date: d(2024, 1, 2), close: 0.0 },
                PricePoint { date: d(2024, 1, 3), close: 5.0 },
            ],
        };
        assert_eq!(h.with_returns()[1].ret, None);
    }

    #[test]
    fn test_inversion_flag() {
        let snap = YieldCurveSnapshot {
            requested: d(2023, 7, 3),
            date: d(2023, 7, 3),
            points: vec![
                YieldCurvePoint { label: "2Y", years: 2.0, yield_pct: 4.9 },
                YieldCurvePoint { label: "10Y", years: 10.0, yield_pct: 3.9 },
            ],
        };
        assert!((snap.spread_10y_2y().unwrap() + 1.0).abs() < 1e-12);
        assert!(snap.is_inverted());
    }
}
