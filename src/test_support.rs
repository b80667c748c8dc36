//! Synthetic mortality tables shared by the unit tests

use std::collections::HashMap;
use std::sync::Arc;

use crate::commutation::{Basis, CommutationEngine, MAX_AGE};
use crate::tables::{MortalityTableKey, Sex, TableId, TableRepository};

/// Gompertz-shaped rates over `0..=MAX_AGE`, capped at 0.5
pub fn gompertz_rates() -> Vec<f64> {
    (0..=MAX_AGE)
        .map(|age| (0.0002 * (0.085 * age as f64).exp()).min(0.5))
        .collect()
}

pub fn repository_with(rates: Vec<f64>) -> Arc<TableRepository> {
    let mut columns = HashMap::new();
    columns.insert(MortalityTableKey::new(TableId::Dav1994T, Sex::Male), rates);
    Arc::new(TableRepository::from_columns(columns).expect("synthetic table"))
}

pub fn gompertz_engine() -> CommutationEngine {
    CommutationEngine::new(repository_with(gompertz_rates()))
}

/// Gompertz table with no rates past `last_age`
pub fn truncated_engine(last_age: usize) -> CommutationEngine {
    let mut rates = gompertz_rates();
    rates.truncate(last_age + 1);
    CommutationEngine::new(repository_with(rates))
}

pub fn zero_mortality_engine() -> CommutationEngine {
    CommutationEngine::new(repository_with(vec![0.0; MAX_AGE as usize + 1]))
}

pub fn constant_rate_engine(q: f64) -> CommutationEngine {
    CommutationEngine::new(repository_with(vec![q; MAX_AGE as usize + 1]))
}

/// DAV1994_T male basis at `interest`
pub fn basis(interest: f64) -> Basis {
    Basis::new(TableId::Dav1994T, Sex::Male, interest)
}
