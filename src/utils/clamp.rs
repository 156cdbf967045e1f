//! Clamping utilities for continuous-to-discrete decisions

/// Clamp a level to the inclusive range `[lo, hi]`.
///
/// NaN saturates to `lo` so a decision is always produced.
#[inline]
pub fn clamp_level(val: f64, lo: f64, hi: f64) -> f64 {
    if val >= hi {
        hi
    } else if val >= lo {
        val
    } else {
        lo
    }
}

/// Round to the nearest integer level and clamp to `[lo, hi]`
///
/// Halfway values round to the even level.
#[inline]
pub fn round_to_level(val: f64, lo: f64, hi: f64) -> f64 {
    clamp_level(val.round_ties_even(), lo, hi)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_in_range() {
        assert_eq!(clamp_level(2.3, 1.0, 4.0), 2.3);
        assert_eq!(clamp_level(1.0, 1.0, 4.0), 1.0);
        assert_eq!(clamp_level(4.0, 1.0, 4.0), 4.0);
    }

    #[test]
    fn test_clamp_overflow() {
        assert_eq!(clamp_level(40.0, 1.0, 4.0), 4.0);
        assert_eq!(clamp_level(-40.0, 1.0, 4.0), 1.0);
        assert_eq!(clamp_level(f64::INFINITY, 1.0, 4.0), 4.0);
        assert_eq!(clamp_level(f64::NEG_INFINITY, 1.0, 4.0), 1.0);
    }

    #[test]
    fn test_clamp_nan_saturates_low() {
        assert_eq!(clamp_level(f64::NAN, 1.0, 4.0), 1.0);
    }

    #[test]
    fn test_round_to_level() {
        assert_eq!(round_to_level(2.49, 1.0, 4.0), 2.0);
        assert_eq!(round_to_level(2.51, 1.0, 4.0), 3.0);
        assert_eq!(round_to_level(0.2, 1.0, 4.0), 1.0);
        assert_eq!(round_to_level(9.7, 1.0, 4.0), 4.0);
    }

    #[test]
    fn test_round_to_level_ties_to_even() {
        assert_eq!(round_to_level(1.5, 1.0, 4.0), 2.0);
        assert_eq!(round_to_level(2.5, 1.0, 4.0), 2.0);
        assert_eq!(round_to_level(3.5, 1.0, 4.0), 4.0);
        assert_eq!(round_to_level(0.5, 1.0, 4.0), 1.0);
    }
}
