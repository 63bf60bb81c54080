/// Arithmetic mean, undefined for an empty slice
pub fn mean(data: &[f64]) -> Option<f64> {
    if data.is_empty() {
        return None;
    }
    Some(data.iter().sum::<f64>() / data.len() as f64)
}

/// Sample standard deviation (n - 1 denominator), undefined below two values
pub fn sample_std(data: &[f64]) -> Option<f64> {
    if data.len() < 2 {
        return None;
    }
    let m = mean(data)?;
    let variance = data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / (data.len() - 1) as f64;
    Some(variance.sqrt())
}

/// True when `|value - center| > k * std`.
///
/// A zero, negative or non-finite std never exceeds.
pub fn exceeds(value: f64, center: f64, std: f64, k: f64) -> bool {
    if !(std.is_finite() && std > 0.0) {
        return false;
    }
    (value - center).abs() > k * std
}
