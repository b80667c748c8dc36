//! Mortality tables: supported identifiers, sex normalisation and the loaded repository

mod ids;
mod repository;
pub mod loader;

pub use ids::{MortalityTableKey, Sex, TableId};
pub use loader::{LoadedTables, DEFAULT_TABLE_PATH, MAX_SOURCE_AGE};
pub use repository::TableRepository;
