use crate::data::models::VixReading;

/// Most recent reading, if any
pub fn latest_reading(series: &[VixReading]) -> Option<VixReading> {
    series.iter().max_by_key(|r| r.date).copied()
}

/// Lowest and highest level over the series
pub fn level_range(series: &[VixReading]) -> Option<(VixReading, VixReading)> {
    let low = series.iter().min_by(|a, b| a.level.total_cmp(&b.level))?;
    let high = series.iter().max_by(|a, b| a.level.total_cmp(&b.level))?;
    Some((*low, *high))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn r(y: i32, m: u32, d: u32, level: f64) -> VixReading {
        VixReading {
            date: NaiveDate::from_ymd_opt(y, m, d).unwrap(),
            level,
        }
    }

    #[test]
    fn test_latest_reading() {
        let series = vec![r(2020, 3, 16, 82.69), r(2024, 7, 3, 12.22), r(2024, 7, 2, 12.03)];
        let latest = latest_reading(&series).unwrap();
        assert_eq!(latest, r(2024, 7, 3, 12.22));
    }

    #[test]
    fn test_empty_series() {
        assert!(latest_reading(&[]).is_none());
        assert!(level_range(&[]).is_none());
    }

    #[test]
    fn test_level_range() {
        let series = vec![r(2020, 3, 16, 82.69), r(2017, 11, 3, 9.14), r(2024, 7, 3, 12.22)];
        let (low, high) = level_range(&series).unwrap();
        assert_eq!(low.level, 9.14);
        assert_eq!(high.level, 82.69);
    }
}
