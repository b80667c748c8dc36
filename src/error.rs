//! Error types shared by the table repository, commutation engine and tariff calculator

use thiserror::Error;

/// Errors raised by the calculator
///
/// Lower layers never reinterpret errors from the layers below them: a
/// `TableSource` raised while building a commutation vector reaches the caller
/// of the schedule calculation unchanged.
#[derive(Debug, Error)]
pub enum TariffError {
    /// Mortality table source is missing, unreadable or malformed
    #[error("mortality table source error: {0}")]
    TableSource(#[from] TableSourceError),

    /// Table identifier outside the supported set
    #[error("unsupported mortality table '{0}' (supported: DAV1994_T, DAV2008_T)")]
    UnsupportedTable(String),

    /// Negative age requested from the repository or commutation engine
    #[error("invalid age {0}: ages must be non-negative")]
    InvalidAge(i32),

    /// Schedule horizon outside the representable elapsed-year range
    #[error("schedule horizon {0} exceeds the supported maximum of {max}", max = i32::MAX)]
    InvalidHorizon(u32),

    /// Contract parameters rejected by explicit validation
    #[error("invalid contract: {0}")]
    InvalidContract(String),
}

/// Failure modes of a mortality table source
#[derive(Debug, Error)]
pub enum TableSourceError {
    #[error("failed to read table source: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse table CSV: {0}")]
    Csv(#[from] csv::Error),

    #[error("table source has no age column (expected 'x/y', 'xy', 'x', 'age' or 'alter')")]
    MissingAgeColumn,

    #[error("table source has no column for a supported table (expected e.g. 'DAV1994_T_M')")]
    NoTableColumns,

    #[error("table source contains no per-age records")]
    NoRecords,

    #[error("malformed probability '{value}' at age {age} in column {column}")]
    MalformedValue {
        age: u32,
        column: String,
        value: String,
    },

    #[error("age {age} in table source exceeds the highest supported age {max}")]
    AgeOutOfRange { age: u32, max: u32 },

    #[error("table source has no column '{0}'")]
    MissingColumn(String),
}

/// Result alias used throughout the crate
pub type Result<T> = std::result::Result<T, TariffError>;
