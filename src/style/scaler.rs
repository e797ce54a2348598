use crate::constants::MIN_RADIUS;

/// Marker radius for a magnitude.
///
/// Zero magnitude gets [`MIN_RADIUS`]; everything else scales linearly by
/// `multiplier`. Results that are not strictly positive (negative
/// magnitudes, NaN) are floored to [`MIN_RADIUS`] as well.
pub fn radius(mag: f64, multiplier: f64) -> f64 {
    if mag == 0.0 {
        return MIN_RADIUS;
    }

    let scaled = mag * multiplier;
    if scaled > 0.0 {
        scaled
    } else {
        MIN_RADIUS
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_magnitude_uses_floor() {
        for multiplier in [2.0, 4.0, 5.0, 100.0] {
            assert_eq!(radius(0.0, multiplier), 1.0);
        }
        assert_eq!(radius(-0.0, 4.0), 1.0);
    }

    #[test]
    fn test_linear_scaling() {
        assert_eq!(radius(4.0, 5.0), 20.0);
        assert_eq!(radius(2.5, 4.0), 10.0);
        assert_eq!(radius(0.1, 2.0), 0.2);
    }

    #[test]
    fn test_never_non_positive() {
        assert_eq!(radius(-0.8, 4.0), 1.0);
        assert_eq!(radius(f64::NAN, 4.0), 1.0);
        assert!(radius(0.01, 4.0) > 0.0);
    }
}
