//! Tariff Calculator - premiums and schedule values for endowment (KLV) life insurance
//!
//! This library provides:
//! - Mortality table loading for the supported DAV tables
//! - Memoized commutation functions (l, d, D, C, N, M, R)
//! - Annuity and insurance present values with sub-annual payments
//! - Gross and net premiums, reserves, surrender and paid-up values per contract year

pub mod error;
pub mod tables;
pub mod commutation;
pub mod annuity;
pub mod tariff;

#[cfg(test)]
mod test_support;

// Re-export commonly used types
pub use error::{Result, TableSourceError, TariffError};
pub use tables::{Sex, TableId, TableRepository};
pub use commutation::{Basis, CommutationEngine};
pub use annuity::AnnuityEngine;
pub use tariff::{
    ContractSchedule, PremiumRecord, ScheduleConfig, TariffCalculator, TariffContract,
};
