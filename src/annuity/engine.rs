//! Life annuity and insurance factors built from commutation values

use crate::commutation::{round, safe_div, Basis, CommutationEngine};
use crate::error::Result;

use super::certain::deduction_term;

/// Annuity and insurance present values over a [`CommutationEngine`]
///
/// All results are rounded once, at the end of each formula. A zero D at
/// the entry age (cohort extinct) makes every factor 0.
#[derive(Debug, Clone, Copy)]
pub struct AnnuityEngine<'a> {
    commutation: &'a CommutationEngine,
}

impl<'a> AnnuityEngine<'a> {
    pub fn new(commutation: &'a CommutationEngine) -> Self {
        Self { commutation }
    }

    pub fn commutation(&self) -> &'a CommutationEngine {
        self.commutation
    }

    /// Whole-life annuity due with `k` payments per year: N_x/D_x − deduction
    pub fn temporary_annuity(&self, age: i32, k: i32, basis: &Basis) -> Result<f64> {
        if k <= 0 {
            return Ok(0.0);
        }
        let d_x = self.commutation.discounted_survivors(age, basis)?;
        if d_x == 0.0 {
            return Ok(0.0);
        }
        let n_x = self.commutation.sum_discounted_survivors(age, basis)?;
        Ok(round(n_x / d_x - deduction_term(k, basis.interest)))
    }

    /// Annuity due limited to `n` years with `k` payments per year
    ///
    /// N is 0 above `MAX_AGE`, so for `age + n > MAX_AGE` the value no longer
    /// depends on `n`.
    pub fn temporary_annuity_n_years(
        &self,
        age: i32,
        n: i32,
        k: i32,
        basis: &Basis,
    ) -> Result<f64> {
        if k <= 0 {
            return Ok(0.0);
        }
        let d_x = self.commutation.discounted_survivors(age, basis)?;
        if d_x == 0.0 {
            return Ok(0.0);
        }
        let d_xn = self.commutation.discounted_survivors(age + n, basis)?;
        let n_x = self.commutation.sum_discounted_survivors(age, basis)?;
        let n_xn = self.commutation.sum_discounted_survivors(age + n, basis)?;

        let value = (n_x - n_xn) / d_x - deduction_term(k, basis.interest) * (1.0 - d_xn / d_x);
        Ok(round(value))
    }

    /// Whole-life annuity deferred by `n` years
    pub fn deferred_annuity(&self, age: i32, n: i32, k: i32, basis: &Basis) -> Result<f64> {
        if k <= 0 {
            return Ok(0.0);
        }
        let d_x = self.commutation.discounted_survivors(age, basis)?;
        let d_xn = self.commutation.discounted_survivors(age + n, basis)?;
        let annuity = self.temporary_annuity(age + n, k, basis)?;
        Ok(round(safe_div(d_xn, d_x) * annuity))
    }

    /// Term insurance over `n` years: (M_x − M_{x+n})/D_x
    pub fn term_insurance(&self, age: i32, n: i32, basis: &Basis) -> Result<f64> {
        let d_x = self.commutation.discounted_survivors(age, basis)?;
        let m_x = self.commutation.sum_discounted_deaths(age, basis)?;
        let m_xn = self.commutation.sum_discounted_deaths(age + n, basis)?;
        Ok(round(safe_div(m_x - m_xn, d_x)))
    }

    /// Pure endowment over `n` years: D_{x+n}/D_x
    pub fn pure_endowment(&self, age: i32, n: i32, basis: &Basis) -> Result<f64> {
        let d_x = self.commutation.discounted_survivors(age, basis)?;
        let d_xn = self.commutation.discounted_survivors(age + n, basis)?;
        Ok(round(safe_div(d_xn, d_x)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::annuity::certain_annuity;
    use crate::commutation::MAX_AGE;
    use crate::error::TariffError;
    use crate::test_support::{
        basis, constant_rate_engine, gompertz_engine, truncated_engine, zero_mortality_engine,
    };
    use approx::assert_relative_eq;

    #[test]
    fn test_zero_payments_per_year() {
        let commutation = gompertz_engine();
        let annuities = AnnuityEngine::new(&commutation);
        let basis = basis(0.0175);

        assert_eq!(annuities.temporary_annuity(40, 0, &basis).unwrap(), 0.0);
        assert_eq!(annuities.temporary_annuity_n_years(40, 20, 0, &basis).unwrap(), 0.0);
        assert_eq!(annuities.deferred_annuity(40, 20, -1, &basis).unwrap(), 0.0);
    }

    #[test]
    fn test_pure_endowment_zero_term_is_one() {
        let commutation = gompertz_engine();
        let annuities = AnnuityEngine::new(&commutation);
        let basis = basis(0.0175);

        for age in [0, 30, 40, 80] {
            let value = annuities.pure_endowment(age, 0, &basis).unwrap();
            assert!((value - 1.0).abs() < 1e-15, "nGrEx({}, 0) = {}", age, value);
            assert_eq!(annuities.term_insurance(age, 0, &basis).unwrap(), 0.0);
            assert_eq!(annuities.temporary_annuity_n_years(age, 0, 1, &basis).unwrap(), 0.0);
        }
    }

    #[test]
    fn test_zero_mortality_matches_interest_only_values() {
        let commutation = zero_mortality_engine();
        let annuities = AnnuityEngine::new(&commutation);
        let i = 0.0175;
        let basis = basis(i);
        let v = 1.0 / (1.0 + i);

        assert_relative_eq!(
            annuities.temporary_annuity_n_years(40, 20, 1, &basis).unwrap(),
            certain_annuity(20, i, 1),
            max_relative = 1e-10
        );
        assert_relative_eq!(
            annuities.temporary_annuity_n_years(40, 20, 12, &basis).unwrap(),
            certain_annuity(20, i, 12),
            max_relative = 1e-10
        );
        assert_relative_eq!(
            annuities.pure_endowment(40, 30, &basis).unwrap(),
            v.powi(30),
            max_relative = 1e-10
        );
        assert_eq!(annuities.term_insurance(40, 30, &basis).unwrap(), 0.0);

        // Whole life runs to the top of the grid
        let whole_life = (1.0 - v.powi(MAX_AGE as i32 + 1 - 40)) / (1.0 - v);
        assert_relative_eq!(
            annuities.temporary_annuity(40, 1, &basis).unwrap(),
            whole_life,
            max_relative = 1e-10
        );
    }

    #[test]
    fn test_constant_mortality_closed_forms() {
        let q = 0.01;
        let commutation = constant_rate_engine(q);
        let annuities = AnnuityEngine::new(&commutation);
        let i = 0.02;
        let basis = basis(i);
        let v = 1.0 / (1.0 + i);
        let pv = (1.0 - q) * v;

        let endowment = annuities.pure_endowment(30, 10, &basis).unwrap();
        assert_relative_eq!(endowment, pv.powi(10), max_relative = 1e-9);

        let annuity = annuities.temporary_annuity_n_years(30, 10, 1, &basis).unwrap();
        assert_relative_eq!(annuity, (1.0 - pv.powi(10)) / (1.0 - pv), max_relative = 1e-9);

        // Deaths in year j+1 discounted to the end of that year
        let insurance = annuities.term_insurance(30, 10, &basis).unwrap();
        let expected: f64 = (0..10).map(|j| pv.powi(j) * q * v).sum();
        assert_relative_eq!(insurance, expected, max_relative = 1e-9);
    }

    #[test]
    fn test_annuity_decomposition() {
        let commutation = gompertz_engine();
        let annuities = AnnuityEngine::new(&commutation);
        let basis = basis(0.0175);

        // Whole life = temporary + deferred
        let whole = annuities.temporary_annuity(40, 1, &basis).unwrap();
        let temporary = annuities.temporary_annuity_n_years(40, 25, 1, &basis).unwrap();
        let deferred = annuities.deferred_annuity(40, 25, 1, &basis).unwrap();
        assert_relative_eq!(whole, temporary + deferred, max_relative = 1e-12);

        // Endowment assurance equals 1 − d·ä for annual payments
        let d = 0.0175 / 1.0175;
        let endowment = annuities.term_insurance(40, 25, &basis).unwrap()
            + annuities.pure_endowment(40, 25, &basis).unwrap();
        assert_relative_eq!(endowment, 1.0 - d * temporary, max_relative = 1e-9);
    }

    #[test]
    fn test_temporary_annuity_saturates_past_max_age() {
        let commutation = truncated_engine(100);
        let annuities = AnnuityEngine::new(&commutation);
        let basis = basis(0.0175);
        let top = MAX_AGE as i32;

        let through_top = annuities.temporary_annuity_n_years(120, top - 120, 1, &basis).unwrap();
        let past_top = annuities.temporary_annuity_n_years(120, top - 119, 1, &basis).unwrap();
        assert!(past_top > through_top);

        for n in [top - 119, 10, 30] {
            assert_eq!(annuities.temporary_annuity_n_years(120, n, 1, &basis).unwrap(), past_top);
        }
        assert_eq!(annuities.temporary_annuity(120, 1, &basis).unwrap(), past_top);
    }

    #[test]
    fn test_deferred_annuity_uses_unrounded_discount_ratio() {
        let commutation = gompertz_engine();
        let annuities = AnnuityEngine::new(&commutation);
        let basis = basis(0.0175);

        let d_x = commutation.discounted_survivors(40, &basis).unwrap();
        let d_xn = commutation.discounted_survivors(65, &basis).unwrap();
        let tail = annuities.temporary_annuity(65, 12, &basis).unwrap();

        let expected = round(d_xn / d_x * tail);
        assert_eq!(annuities.deferred_annuity(40, 25, 12, &basis).unwrap(), expected);
    }

    #[test]
    fn test_errors_propagate() {
        let commutation = gompertz_engine();
        let annuities = AnnuityEngine::new(&commutation);
        let basis = basis(0.0175);

        assert!(matches!(
            annuities.pure_endowment(-1, 5, &basis),
            Err(TariffError::InvalidAge(-1))
        ));
    }
}
