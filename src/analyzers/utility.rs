/// Sums the values, skipping NaN. Returns 0.0 for empty input.
pub fn nan_sum(values: &[f64]) -> f64 {
    values.iter().filter(|v| !v.is_nan()).sum()
}

/// Arithmetic mean of the non-NaN values, or `None` if there are none.
pub fn nan_mean(values: &[f64]) -> Option<f64> {
    let valid: Vec<f64> = values.iter().copied().filter(|v| !v.is_nan()).collect();
    if valid.is_empty() {
        return None;
    }
    Some(valid.iter().sum::<f64>() / valid.len() as f64)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nan_sum_skips_nan() {
        assert_eq!(nan_sum(&[1.0, f64::NAN, 2.5]), 3.5);
        assert_eq!(nan_sum(&[]), 0.0);
        assert_eq!(nan_sum(&[f64::NAN]), 0.0);
    }

    #[test]
    fn test_nan_mean() {
        assert_eq!(nan_mean(&[2.0, 4.0]), Some(3.0));
        assert_eq!(nan_mean(&[2.0, f64::NAN, 4.0]), Some(3.0));
        assert_eq!(nan_mean(&[f64::NAN, f64::NAN]), None);
        assert_eq!(nan_mean(&[]), None);
    }
}
