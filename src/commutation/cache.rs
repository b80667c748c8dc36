//! Memoization of single commutation values
//!
//! Every accessor of the engine stores the value it computed under a key made
//! of the quantity, the age and the full calculation basis. Entries live as
//! long as the engine that owns the cache; nothing is evicted implicitly.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{PoisonError, RwLock};

use log::trace;

use super::basis::Basis;
use crate::error::Result;
use crate::tables::{Sex, TableId};

/// Commutation quantity a cached value belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Quantity {
    /// l_x
    Survivors,
    /// d_x
    Deaths,
    /// D_x
    DiscountedSurvivors,
    /// C_x
    DiscountedDeaths,
    /// N_x
    SumDiscountedSurvivors,
    /// M_x
    SumDiscountedDeaths,
    /// R_x
    SumOfSumDiscountedDeaths,
}

impl Quantity {
    /// Conventional actuarial symbol
    pub fn symbol(&self) -> &'static str {
        match self {
            Quantity::Survivors => "lx",
            Quantity::Deaths => "dx",
            Quantity::DiscountedSurvivors => "Dx",
            Quantity::DiscountedDeaths => "Cx",
            Quantity::SumDiscountedSurvivors => "Nx",
            Quantity::SumDiscountedDeaths => "Mx",
            Quantity::SumOfSumDiscountedDeaths => "Rx",
        }
    }
}

/// Composite cache key
///
/// The interest rate is keyed by its bit pattern so that the key is `Eq`
/// and `Hash`; rates that compare equal but differ in bits (0.0 and -0.0)
/// simply occupy separate entries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey {
    quantity: Quantity,
    age: i32,
    table: TableId,
    sex: Sex,
    interest_bits: u64,
    birth_year: Option<i32>,
    pension_start_age: Option<i32>,
    layer: u32,
}

impl CacheKey {
    pub fn new(quantity: Quantity, age: i32, basis: &Basis) -> Self {
        Self {
            quantity,
            age,
            table: basis.table,
            sex: basis.sex,
            interest_bits: basis.interest.to_bits(),
            birth_year: basis.birth_year,
            pension_start_age: basis.pension_start_age,
            layer: basis.layer,
        }
    }
}

/// Snapshot of cache usage
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub entries: usize,
}

impl CacheStats {
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// Thread-safe value cache owned by a [`CommutationEngine`](super::CommutationEngine)
#[derive(Debug, Default)]
pub struct CommutationCache {
    entries: RwLock<HashMap<CacheKey, f64>>,
    hits: AtomicU64,
    misses: AtomicU64,
}

impl CommutationCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Stored value for `key`, if any
    pub fn get(&self, key: &CacheKey) -> Option<f64> {
        self.entries
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(key)
            .copied()
    }

    /// Return the stored value or compute, store and return it
    ///
    /// The computation runs outside the lock. When two callers miss on the same
    /// key concurrently, the first insert wins and both return that value.
    pub fn get_or_try_insert_with<F>(&self, key: CacheKey, compute: F) -> Result<f64>
    where
        F: FnOnce() -> Result<f64>,
    {
        if let Some(value) = self.get(&key) {
            self.hits.fetch_add(1, Ordering::Relaxed);
            trace!("cache hit {:?}", key);
            return Ok(value);
        }

        self.misses.fetch_add(1, Ordering::Relaxed);
        let value = compute()?;

        let mut entries = self.entries.write().unwrap_or_else(PoisonError::into_inner);
        Ok(*entries.entry(key).or_insert(value))
    }

    pub fn len(&self) -> usize {
        self.entries.read().unwrap_or_else(PoisonError::into_inner).len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop all entries and reset the counters
    pub fn clear(&self) {
        self.entries.write().unwrap_or_else(PoisonError::into_inner).clear();
        self.hits.store(0, Ordering::Relaxed);
        self.misses.store(0, Ordering::Relaxed);
    }

    pub fn stats(&self) -> CacheStats {
        CacheStats {
            hits: self.hits.load(Ordering::Relaxed),
            misses: self.misses.load(Ordering::Relaxed),
            entries: self.len(),
        }
    }
}
