//! Descriptive statistics used by region layout classification

/// Arithmetic mean, `None` for an empty sample
pub fn mean(values: &[f64]) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    Some(values.iter().sum::<f64>() / values.len() as f64)
}

/// Population standard deviation, `None` for an empty sample
pub fn standard_deviation(values: &[f64]) -> Option<f64> {
    let average = mean(values)?;
    let variance = values
        .iter()
        .map(|value| (value - average).powi(2))
        .sum::<f64>()
        / values.len() as f64;
    Some(variance.sqrt())
}

/// Standard deviation relative to the mean
///
/// Returns `None` when the sample is empty or its mean is zero.
pub fn coefficient_of_variation(values: &[f64]) -> Option<f64> {
    let average = mean(values)?;
    if average.abs() <= f64::EPSILON {
        return None;
    }
    Some(standard_deviation(values)? / average)
}
