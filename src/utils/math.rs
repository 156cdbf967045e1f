//! Small DSP math helpers

/// Convert a dB value to a linear power ratio
#[inline]
pub fn db_to_power_ratio(db: f64) -> f64 {
    10.0_f64.powf(db / 10.0)
}

/// Mean of the squared samples
#[inline]
pub fn mean_power(samples: &[f64]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    samples.iter().map(|x| x * x).sum::<f64>() / samples.len() as f64
}

/// Compute magnitude of complex number
#[inline]
pub fn magnitude(i: f64, q: f64) -> f64 {
    (i * i + q * q).sqrt()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_db_conversion() {
        assert!((db_to_power_ratio(0.0) - 1.0).abs() < 1e-12);
        assert!((db_to_power_ratio(10.0) - 10.0).abs() < 1e-12);
        assert!((db_to_power_ratio(20.0) - 100.0).abs() < 1e-9);
        assert!((db_to_power_ratio(-10.0) - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_mean_power() {
        assert_eq!(mean_power(&[]), 0.0);
        assert!((mean_power(&[1.0, -1.0, 2.0]) - 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_magnitude() {
        assert!((magnitude(3.0, 4.0) - 5.0).abs() < 1e-10);
        assert!((magnitude(1.0, 0.0) - 1.0).abs() < 1e-10);
    }
}
