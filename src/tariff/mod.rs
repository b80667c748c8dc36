//! Endowment tariff: contract parameters, premiums and year-by-year schedule values
//!
//! - **Premium**: gross rate, annual premium, instalment and net rate
//! - **Schedule**: reserves, minimum reserve, surrender and paid-up values per elapsed year
//! - **Config**: JSON contract files and the standard instalment surcharges
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use tariff_calculator::tables::TableRepository;
//! use tariff_calculator::tariff::{config, TariffCalculator};
//!
//! let tables = Arc::new(TableRepository::from_path("data/tables/tafeln.csv".as_ref())?);
//! let contract = config::load_contract(config::DEFAULT_CONTRACT_PATH.as_ref())?;
//!
//! let calculator = TariffCalculator::new(tables);
//! let schedule = calculator.calculate(&contract)?;
//! println!("Bxt = {:.8}", schedule.premium.gross_rate);
//! ```

mod age;
mod calculator;
mod contract;
mod premium;
mod schedule;
pub mod config;

pub use age::{attained_age, AgeMethod};
pub use calculator::{ScheduleConfig, TariffCalculator};
pub use config::{instalment_surcharge, DEFAULT_CONTRACT_PATH};
pub use contract::TariffContract;
pub use premium::PremiumRecord;
pub use schedule::{ContractSchedule, ScheduleRow};
