/// Signed percentage change from `reference` to `current`.
///
/// Positive means weight was lost. A zero reference yields 0.
pub fn percentage_change(reference: f64, current: f64) -> f64 {
    if reference == 0.0 {
        return 0.0;
    }
    (reference - current) / reference * 100.0
}

/// Rounds half away from zero to `decimals` places.
pub fn round_to(value: f64, decimals: i32) -> f64 {
    let factor = 10f64.powi(decimals);
    (value * factor).round() / factor
}

/// `weight` as a percentage of `start_weight` (start = 100).
pub fn relative_to_start(start_weight: f64, weight: f64) -> f64 {
    if start_weight == 0.0 {
        return 0.0;
    }
    weight / start_weight * 100.0
}

#[cfg(test)]
pub(crate) fn approx_eq(a: f64, b: f64, tolerance: f64) -> bool {
    (a - b).abs() < tolerance
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loss_is_positive() {
        assert!(approx_eq(percentage_change(100.0, 99.0), 1.0, 1e-9));
    }

    #[test]
    fn test_gain_is_negative() {
        assert!(approx_eq(percentage_change(60.0, 61.0), -1.6667, 1e-4));
    }

    #[test]
    fn test_zero_reference() {
        assert_eq!(percentage_change(0.0, 80.0), 0.0);
    }

    #[test]
    fn test_round_to() {
        assert_eq!(round_to(1.666_666, 2), 1.67);
        assert_eq!(round_to(-1.666_666, 2), -1.67);
        assert_eq!(round_to(84.04, 1), 84.0);
    }

    #[test]
    fn test_relative_to_start() {
        assert!(approx_eq(relative_to_start(80.0, 79.0), 98.75, 1e-9));
        assert_eq!(relative_to_start(0.0, 79.0), 0.0);
    }
}
