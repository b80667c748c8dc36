//! Memoized commutation accessors
//!
//! Each accessor answers one (quantity, age, basis) question. On a miss it
//! builds only the backing vector it needs: survivors through the requested
//! age for the forward quantities, the full `0..=MAX_AGE` grid for the
//! backward sums.
//!
//! Above `MAX_AGE` the forward quantities keep extrapolating while N, M and R
//! are 0. Factors that subtract a backward sum at `x + n` therefore stop
//! growing once `x + n` passes `MAX_AGE`.

use std::sync::Arc;

use log::debug;

use super::basis::Basis;
use super::cache::{CacheKey, CacheStats, CommutationCache, Quantity};
use super::constants::{round, MAX_AGE};
use super::vectors::{self, CommutationVectors};
use crate::error::{Result, TariffError};
use crate::tables::TableRepository;

/// Commutation values over a shared mortality repository
///
/// The engine owns its cache. Engines built over the same repository do not
/// share cached values.
#[derive(Debug)]
pub struct CommutationEngine {
    tables: Arc<TableRepository>,
    cache: CommutationCache,
}

impl CommutationEngine {
    pub fn new(tables: Arc<TableRepository>) -> Self {
        Self {
            tables,
            cache: CommutationCache::new(),
        }
    }

    pub fn tables(&self) -> &Arc<TableRepository> {
        &self.tables
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.stats()
    }

    pub fn clear_cache(&self) {
        self.cache.clear();
    }

    /// l_x
    pub fn survivors(&self, age: i32, basis: &Basis) -> Result<f64> {
        let age = check_age(age)?;
        self.memoized(Quantity::Survivors, age, basis, || {
            let lx = self.survivors_through(age as usize, basis)?;
            Ok(lx[age as usize])
        })
    }

    /// d_x, 0 at and above `MAX_AGE`
    pub fn deaths(&self, age: i32, basis: &Basis) -> Result<f64> {
        let age = check_age(age)?;
        self.memoized(Quantity::Deaths, age, basis, || {
            if age >= MAX_AGE as i32 {
                return Ok(0.0);
            }
            let a = age as usize;
            let lx = self.survivors_through(a + 1, basis)?;
            Ok(round(lx[a] - lx[a + 1]))
        })
    }

    /// D_x = l_x · v^x
    pub fn discounted_survivors(&self, age: i32, basis: &Basis) -> Result<f64> {
        let age = check_age(age)?;
        self.memoized(Quantity::DiscountedSurvivors, age, basis, || {
            let lx = self.survivors_through(age as usize, basis)?;
            let v = basis.discount_factor();
            Ok(round(lx[age as usize] * v.powf(age as f64)))
        })
    }

    /// C_x = d_x · v^(x+1)
    pub fn discounted_deaths(&self, age: i32, basis: &Basis) -> Result<f64> {
        let age = check_age(age)?;
        self.memoized(Quantity::DiscountedDeaths, age, basis, || {
            let dx = self.deaths(age, basis)?;
            let v = basis.discount_factor();
            Ok(round(dx * v.powf((age + 1) as f64)))
        })
    }

    /// N_x = Σ_{y ≥ x} D_y
    pub fn sum_discounted_survivors(&self, age: i32, basis: &Basis) -> Result<f64> {
        let age = check_age(age)?;
        self.memoized(Quantity::SumDiscountedSurvivors, age, basis, || {
            self.backward_value(age, basis, |v| &v.sum_discounted_survivors)
        })
    }

    /// M_x = Σ_{y ≥ x} C_y
    pub fn sum_discounted_deaths(&self, age: i32, basis: &Basis) -> Result<f64> {
        let age = check_age(age)?;
        self.memoized(Quantity::SumDiscountedDeaths, age, basis, || {
            self.backward_value(age, basis, |v| &v.sum_discounted_deaths)
        })
    }

    /// R_x = Σ_{y ≥ x} M_y
    pub fn sum_of_sum_discounted_deaths(&self, age: i32, basis: &Basis) -> Result<f64> {
        let age = check_age(age)?;
        self.memoized(Quantity::SumOfSumDiscountedDeaths, age, basis, || {
            self.backward_value(age, basis, |v| &v.sum_of_sum_discounted_deaths)
        })
    }

    /// Every commutation vector for `basis`, bypassing the value cache
    pub fn vectors(&self, basis: &Basis) -> Result<CommutationVectors> {
        debug!("building commutation vectors for {:?}", basis);
        CommutationVectors::build(&self.tables, basis)
    }

    fn memoized<F>(&self, quantity: Quantity, age: i32, basis: &Basis, compute: F) -> Result<f64>
    where
        F: FnOnce() -> Result<f64>,
    {
        let key = CacheKey::new(quantity, age, basis);
        self.cache.get_or_try_insert_with(key, || {
            debug!("cache miss {} age {} for {:?}", quantity.symbol(), age, basis);
            compute()
        })
    }

    fn survivors_through(&self, end_age: usize, basis: &Basis) -> Result<Vec<f64>> {
        let rates = self.tables.vector(basis.table_key())?;
        Ok(vectors::survivors(rates, end_age))
    }

    fn backward_value<F>(&self, age: i32, basis: &Basis, select: F) -> Result<f64>
    where
        F: FnOnce(&CommutationVectors) -> &Vec<f64>,
    {
        if age > MAX_AGE as i32 {
            return Ok(0.0);
        }
        let vectors = self.vectors(basis)?;
        Ok(select(&vectors)[age as usize])
    }
}

fn check_age(age: i32) -> Result<i32> {
    if age < 0 {
        Err(TariffError::InvalidAge(age))
    } else {
        Ok(age)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commutation::RADIX;
    use crate::tables::{Sex, TableId};
    use crate::test_support::{basis, gompertz_engine, truncated_engine};

    #[test]
    fn test_accessors_match_vectors() {
        let engine = gompertz_engine();
        let basis = basis(0.0175);
        let vectors = engine.vectors(&basis).unwrap();

        for age in [0, 1, 20, 40, 65, 100, 122, 123] {
            let a = age as usize;
            assert_eq!(engine.survivors(age, &basis).unwrap(), vectors.survivors[a]);
            assert_eq!(engine.deaths(age, &basis).unwrap(), vectors.deaths[a]);
            assert_eq!(
                engine.discounted_survivors(age, &basis).unwrap(),
                vectors.discounted_survivors[a]
            );
            assert_eq!(
                engine.discounted_deaths(age, &basis).unwrap(),
                vectors.discounted_deaths[a]
            );
            assert_eq!(
                engine.sum_discounted_survivors(age, &basis).unwrap(),
                vectors.sum_discounted_survivors[a]
            );
            assert_eq!(
                engine.sum_discounted_deaths(age, &basis).unwrap(),
                vectors.sum_discounted_deaths[a]
            );
            assert_eq!(
                engine.sum_of_sum_discounted_deaths(age, &basis).unwrap(),
                vectors.sum_of_sum_discounted_deaths[a]
            );
        }
    }

    #[test]
    fn test_radix_and_top_age_conventions() {
        let engine = gompertz_engine();
        let basis = basis(0.0175);

        assert_eq!(engine.survivors(0, &basis).unwrap(), RADIX);
        assert_eq!(engine.deaths(MAX_AGE as i32, &basis).unwrap(), 0.0);
        assert_eq!(
            engine.sum_discounted_survivors(MAX_AGE as i32, &basis).unwrap(),
            engine.discounted_survivors(MAX_AGE as i32, &basis).unwrap()
        );
        assert_eq!(engine.sum_discounted_survivors(MAX_AGE as i32 + 1, &basis).unwrap(), 0.0);
        assert_eq!(engine.sum_discounted_deaths(200, &basis).unwrap(), 0.0);
    }

    #[test]
    fn test_cache_hit_is_bit_identical() {
        let engine = gompertz_engine();
        let basis = basis(0.0175);

        let cold = engine.sum_discounted_survivors(40, &basis).unwrap();
        let warm = engine.sum_discounted_survivors(40, &basis).unwrap();
        assert_eq!(cold.to_bits(), warm.to_bits());

        let stats = engine.cache_stats();
        assert_eq!(stats.hits, 1);
        assert_eq!(stats.misses, 1);

        engine.clear_cache();
        let recomputed = engine.sum_discounted_survivors(40, &basis).unwrap();
        assert_eq!(cold.to_bits(), recomputed.to_bits());
    }

    #[test]
    fn test_negative_age_rejected() {
        let engine = gompertz_engine();
        let basis = basis(0.0175);

        assert!(matches!(engine.survivors(-1, &basis), Err(TariffError::InvalidAge(-1))));
        assert!(matches!(
            engine.sum_discounted_deaths(-5, &basis),
            Err(TariffError::InvalidAge(-5))
        ));
        assert!(engine.cache_stats().entries == 0);
    }

    #[test]
    fn test_missing_column_propagates() {
        let engine = gompertz_engine();
        let basis = Basis::new(TableId::Dav2008T, Sex::Female, 0.0175);

        assert!(matches!(
            engine.discounted_survivors(40, &basis),
            Err(TariffError::TableSource(_))
        ));
    }

    #[test]
    fn test_beyond_table_survivors_constant() {
        let engine = truncated_engine(100);
        let basis = basis(0.0175);

        let l101 = engine.survivors(101, &basis).unwrap();
        assert!(engine.survivors(100, &basis).unwrap() > l101);
        assert_eq!(engine.survivors(110, &basis).unwrap(), l101);
        assert_eq!(engine.survivors(150, &basis).unwrap(), l101);
        assert_eq!(engine.deaths(105, &basis).unwrap(), 0.0);
    }

    #[test]
    fn test_interest_changes_discounted_values_only() {
        let engine = gompertz_engine();
        let low = basis(0.01);
        let high = basis(0.03);

        assert_eq!(
            engine.survivors(50, &low).unwrap(),
            engine.survivors(50, &high).unwrap()
        );
        assert!(
            engine.discounted_survivors(50, &low).unwrap()
                > engine.discounted_survivors(50, &high).unwrap()
        );
    }
}
