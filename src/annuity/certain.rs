//! Interest-only building blocks: the instalment deduction and the annuity-certain

use crate::commutation::round;

/// Deduction term for `k` payments per year at interest `i`
///
/// (1+i)/k · Σ_{l=0}^{k-1} (l/k) / (1 + (l/k)·i), and 0 for k ≤ 0.
/// Annual payments (k = 1) need no correction and yield 0.
pub fn deduction_term(k: i32, interest: f64) -> f64 {
    if k <= 0 {
        return 0.0;
    }
    let kf = k as f64;
    let sum: f64 = (0..k)
        .map(|l| {
            let fraction = l as f64 / kf;
            fraction / (1.0 + fraction * interest)
        })
        .sum();
    (1.0 + interest) / kf * sum
}

/// Annuity-certain due over `years` with `k` payments per year
pub fn certain_annuity(years: i32, interest: f64, k: i32) -> f64 {
    if k <= 0 {
        return 0.0;
    }
    if interest == 0.0 {
        return years as f64;
    }

    let v = 1.0 / (1.0 + interest);
    let v_years = v.powf(years as f64);
    round((1.0 - v_years) / (1.0 - v) - deduction_term(k, interest) * (1.0 - v_years))
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_deduction_term() {
        assert_eq!(deduction_term(0, 0.0175), 0.0);
        assert_eq!(deduction_term(-4, 0.0175), 0.0);
        assert_eq!(deduction_term(1, 0.0175), 0.0);
        // Without interest the term reduces to (k-1)/(2k)
        assert_relative_eq!(deduction_term(12, 0.0), 11.0 / 24.0, epsilon = 1e-15);
        assert_relative_eq!(deduction_term(2, 0.0), 0.25, epsilon = 1e-15);

        // Monthly term at 1.75% sits just above 11/24
        let monthly = deduction_term(12, 0.0175);
        assert!(monthly > 11.0 / 24.0 && monthly < 0.47, "monthly deduction {}", monthly);
    }

    #[test]
    fn test_certain_annuity_without_interest() {
        assert_eq!(certain_annuity(10, 0.0, 1), 10.0);
        assert_eq!(certain_annuity(0, 0.0, 12), 0.0);
        assert_eq!(certain_annuity(10, 0.0, 0), 0.0);
    }

    #[test]
    fn test_certain_annuity_annual() {
        let i: f64 = 0.0175;
        let v = 1.0 / (1.0 + i);
        let expected: f64 = (0..20).map(|j| v.powi(j)).sum();
        assert_relative_eq!(certain_annuity(20, i, 1), expected, max_relative = 1e-12);
        assert_eq!(certain_annuity(0, i, 1), 0.0);
    }

    #[test]
    fn test_certain_annuity_monthly_below_annual() {
        let annual = certain_annuity(20, 0.0175, 1);
        let monthly = certain_annuity(20, 0.0175, 12);
        assert!(monthly < annual);
        assert!(monthly > annual - 0.5);
    }

    #[test]
    fn test_certain_annuity_negative_interest_uses_formula() {
        let i: f64 = -0.005;
        let v = 1.0 / (1.0 + i);
        let expected: f64 = (0..10).map(|j| v.powi(j)).sum();
        assert_relative_eq!(certain_annuity(10, i, 1), expected, max_relative = 1e-12);
    }
}
