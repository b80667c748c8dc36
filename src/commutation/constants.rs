//! Numeric constants of the commutation basis

/// Highest age of the commutation grid (the backward sums start here)
pub const MAX_AGE: u32 = 123;

/// Initial cohort size, survivors at age 0
pub const RADIX: f64 = 1_000_000.0;

/// Fractional digits kept after every rounded step
pub const ROUNDING_DIGITS: u32 = 16;

/// Round half away from zero to `digits` fractional digits
///
/// Values whose magnitude leaves no mantissa bits below `10^-digits` are
/// already exact at that precision and are returned unchanged; scaling them
/// would only introduce representation error.
pub fn round_to(value: f64, digits: u32) -> f64 {
    if !value.is_finite() || value == 0.0 {
        return value;
    }

    let scale = 10f64.powi(digits as i32);
    let scaled = value * scale;
    if scaled.abs() >= 2f64.powi(52) {
        return value;
    }

    scaled.round() / scale
}

/// Round with the crate-wide [`ROUNDING_DIGITS`]
pub fn round(value: f64) -> f64 {
    round_to(value, ROUNDING_DIGITS)
}

/// Divide, yielding 0 instead of a non-finite value for a zero denominator
pub fn safe_div(numerator: f64, denominator: f64) -> f64 {
    safe_div_or(numerator, denominator, 0.0)
}

/// Divide, yielding `fallback` for a zero denominator
pub fn safe_div_or(numerator: f64, denominator: f64, fallback: f64) -> f64 {
    if denominator == 0.0 {
        fallback
    } else {
        numerator / denominator
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_half_away_from_zero() {
        assert_eq!(round_to(2.5, 0), 3.0);
        assert_eq!(round_to(-2.5, 0), -3.0);
        assert_eq!(round_to(0.125, 2), 0.13);
        assert_eq!(round_to(1.23456, 3), 1.235);
    }

    #[test]
    fn test_round_keeps_large_values() {
        // 16 fractional digits are below the resolution of numbers this large
        let survivors = 987_654.321_098_765_4;
        assert_eq!(round(survivors), survivors);
        assert_eq!(round(RADIX), RADIX);
    }

    #[test]
    fn test_round_small_values() {
        let v = 0.042_260_012_345_678_91;
        assert!((round(v) - v).abs() < 1e-16);
        assert_eq!(round(0.0), 0.0);
        assert!(round(f64::NAN).is_nan());
    }

    #[test]
    fn test_safe_div() {
        assert_eq!(safe_div(1.0, 0.0), 0.0);
        assert_eq!(safe_div(1.0, 4.0), 0.25);
        assert_eq!(safe_div_or(7.0, 0.0, 7.0), 7.0);
    }
}
