use chrono::NaiveDate;
use std::collections::BTreeMap;

use crate::config::Maturity;
use crate::data::models::{Observation, YieldCurvePoint, YieldCurveSnapshot};

/// Treasury yields joined on date, shortest maturity first.
///
/// Only dates on which every maturity has an observation are kept.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct YieldTable {
    pub maturities: Vec<Maturity>,
    pub dates: Vec<NaiveDate>,
    /// `rows[i][j]` is the yield of `maturities[j]` on `dates[i]`
    pub rows: Vec<Vec<f64>>,
}

impl YieldTable {
    pub fn is_empty(&self) -> bool {
        self.dates.is_empty()
    }

    pub fn first_date(&self) -> Option<NaiveDate> {
        self.dates.first().copied()
    }

    pub fn last_date(&self) -> Option<NaiveDate> {
        self.dates.last().copied()
    }
}

/// Join per-maturity series into a table. A maturity with no data empties the table.
pub fn align_series(series: &[(Maturity, Vec<Observation>)]) -> YieldTable {
    let mut ordered: Vec<&(Maturity, Vec<Observation>)> = series.iter().collect();
    ordered.sort_by(|a, b| a.0.years.total_cmp(&b.0.years));

    let lookups: Vec<BTreeMap<NaiveDate, f64>> = ordered
        .iter()
        .map(|(_, obs)| obs.iter().map(|o| (o.date, o.value)).collect())
        .collect();

    let Some((first, rest)) = lookups.split_first() else {
        return YieldTable::default();
    };

    let mut dates = Vec::new();
    let mut rows = Vec::new();
    for (date, &v0) in first {
        let mut row = Vec::with_capacity(lookups.len());
        row.push(v0);
        for lookup in rest {
            match lookup.get(date) {
                Some(&v) => row.push(v),
                None => break,
            }
        }
        if row.len() == lookups.len() {
            dates.push(*date);
            rows.push(row);
        }
    }

    YieldTable {
        maturities: ordered.iter().map(|(m, _)| *m).collect(),
        dates,
        rows,
    }
}

/// Curve on the latest table date at or before `requested`.
///
/// `None` when the table is empty or `requested` precedes its first date.
pub fn snapshot_on(table: &YieldTable, requested: NaiveDate) -> Option<YieldCurveSnapshot> {
    let idx = table.dates.partition_point(|d| *d <= requested).checked_sub(1)?;
    let points = table
        .maturities
        .iter()
        .zip(&table.rows[idx])
        .map(|(m, &y)| YieldCurvePoint {
            label: m.label,
            years: m.years,
            yield_pct: y,
        })
        .collect();
    Some(YieldCurveSnapshot {
        requested,
        date: table.dates[idx],
        points,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::TREASURY_MATURITIES;

    fn d(y: i32, m: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, day).unwrap()
    }

    /// Weekday observations for the week of 2024-01-08, yield = base + years / 10
    fn sample_series() -> Vec<(Maturity, Vec<Observation>)> {
        let days = [d(2024, 1, 8), d(2024, 1, 9), d(2024, 1, 10), d(2024, 1, 11), d(2024, 1, 12)];
        TREASURY_MATURITIES
            .iter()
            .rev()
            .map(|m| {
                let obs = days
                    .iter()
                    .enumerate()
                    .map(|(i, &date)| Observation {
                        date,
                        value: 4.0 + i as f64 * 0.01 + m.years / 10.0,
                    })
                    .collect();
                (*m, obs)
            })
            .collect()
    }

    #[test]
    fn test_align_orders_by_maturity() {
        let table = align_series(&sample_series());
        assert_eq!(table.maturities.len(), 11);
        assert_eq!(table.maturities[0].label, "1M");
        assert_eq!(table.maturities[10].label, "30Y");
        assert_eq!(table.dates.len(), 5);
    }

    #[test]
    fn test_align_drops_incomplete_dates() {
        let mut series = sample_series();
        series[3].1.retain(|o| o.date != d(2024, 1, 10));
        let table = align_series(&series);
        assert_eq!(table.dates.len(), 4);
        assert!(!table.dates.contains(&d(2024, 1, 10)));
    }

    #[test]
    fn test_exact_date_match() {
        let table = align_series(&sample_series());
        let snap = snapshot_on(&table, d(2024, 1, 10)).unwrap();
        assert_eq!(snap.date, d(2024, 1, 10));
        assert_eq!(snap.points.len(), 11);
        assert!((snap.points[10].yield_pct - (4.02 + 3.0)).abs() < 1e-9);
    }

    #[test]
    fn test_weekend_resolves_to_prior_friday() {
        let table = align_series(&sample_series());
        let snap = snapshot_on(&table, d(2024, 1, 14)).unwrap();
        assert_eq!(snap.requested, d(2024, 1, 14));
        assert_eq!(snap.date, d(2024, 1, 12));
    }

    #[test]
    fn test_points_ascend_by_maturity() {
        let table = align_series(&sample_series());
        let snap = snapshot_on(&table, d(2024, 1, 9)).unwrap();
        assert!(snap.points.windows(2).all(|w| w[0].years < w[1].years));
    }

    #[test]
    fn test_before_first_date_is_none() {
        let table = align_series(&sample_series());
        assert!(snapshot_on(&table, d(2024, 1, 5)).is_none());
        assert!(snapshot_on(&YieldTable::default(), d(2024, 1, 9)).is_none());
    }

    #[test]
    fn test_missing_maturity_empties_table() {
        let mut series = sample_series();
        series[0].1.clear();
        assert!(align_series(&series).is_empty());
    }
}
