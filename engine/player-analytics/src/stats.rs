//! Small numeric helpers shared by the analyzers

/// Round to two decimal places
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Arithmetic mean, 0 for an empty slice
pub fn mean(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    values.iter().sum::<f64>() / values.len() as f64
}

/// Population standard deviation (divides by n)
pub fn population_std_dev(values: &[f64]) -> f64 {
    if values.is_empty() {
        return 0.0;
    }
    let avg = mean(values);
    let variance = values.iter().map(|v| (v - avg).powi(2)).sum::<f64>() / values.len() as f64;
    variance.sqrt()
}

/// Ordinary least-squares slope of `values` against their index 0..n-1
pub fn linear_slope(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return 0.0;
    }

    let x_mean = (n - 1) as f64 / 2.0;
    let y_mean = mean(values);

    let mut numerator = 0.0;
    let mut denominator = 0.0;
    for (i, y) in values.iter().enumerate() {
        let dx = i as f64 - x_mean;
        numerator += dx * (y - y_mean);
        denominator += dx * dx;
    }

    numerator / denominator
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round2() {
        assert_eq!(round2(12.345_6), 12.35);
        assert_eq!(round2(-3.333), -3.33);
        assert_eq!(round2(7.0), 7.0);
    }

    #[test]
    fn test_mean_and_std_dev() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[10.0, 20.0]), 15.0);
        assert_eq!(population_std_dev(&[10.0, 20.0]), 5.0);
        assert_eq!(population_std_dev(&[4.0, 4.0, 4.0]), 0.0);
    }

    #[test]
    fn test_linear_slope() {
        assert_eq!(linear_slope(&[5.0, 10.0, 15.0, 20.0]), 5.0);
        assert_eq!(linear_slope(&[20.0, 10.0]), -10.0);
        assert_eq!(linear_slope(&[8.0]), 0.0);
        assert_eq!(linear_slope(&[3.0, 3.0, 3.0]), 0.0);
    }
}
