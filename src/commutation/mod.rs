//! Commutation functions
//!
//! This module provides:
//! - The calculation basis and the numeric constants of the rounding contract
//! - Vector construction for l, d, D, C, N, M and R
//! - A memoized engine answering single (quantity, age, basis) lookups

mod basis;
mod cache;
mod constants;
mod engine;
pub mod vectors;

pub use basis::Basis;
pub use cache::{CacheKey, CacheStats, CommutationCache, Quantity};
pub use constants::{round, round_to, safe_div, safe_div_or, MAX_AGE, RADIX, ROUNDING_DIGITS};
pub use engine::CommutationEngine;
pub use vectors::{CommutationRow, CommutationVectors};
