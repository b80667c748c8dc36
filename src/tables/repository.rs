//! Immutable store of mortality vectors, one per table/sex pair

use std::collections::HashMap;
use std::io::Read;
use std::path::Path;

use super::ids::{MortalityTableKey, Sex, TableId};
use super::loader::{self, LoadedTables};
use crate::commutation::MAX_AGE;
use crate::error::{Result, TableSourceError, TariffError};

/// Mortality probabilities by table, sex and integer age
///
/// Built once from a table source and shared read-only (typically behind an
/// `Arc`) by every commutation engine. Each vector covers ages
/// `0..=max(MAX_AGE, highest tabulated age)`; ages missing from the source
/// hold probability 0.
#[derive(Debug, Clone)]
pub struct TableRepository {
    vectors: HashMap<MortalityTableKey, Vec<f64>>,
    highest_tabulated_age: u32,
}

impl TableRepository {
    /// Load from a CSV table source on disk
    pub fn from_path(path: &Path) -> Result<Self> {
        Ok(Self::from_loaded(loader::load_table_source(path)?))
    }

    /// Load from any reader producing a CSV table source
    pub fn from_reader<R: Read>(reader: R) -> Result<Self> {
        Ok(Self::from_loaded(loader::load_table_source_from_reader(reader)?))
    }

    /// Build from per-age probability maps as produced by the loader
    pub fn from_loaded(loaded: LoadedTables) -> Self {
        let highest_tabulated_age = loaded.highest_age;
        let len = MAX_AGE.max(highest_tabulated_age) as usize + 1;

        let vectors = loaded
            .columns
            .into_iter()
            .map(|(key, by_age)| {
                let mut rates = vec![0.0; len];
                for (age, q) in by_age {
                    rates[age as usize] = q;
                }
                (key, rates)
            })
            .collect();

        Self {
            vectors,
            highest_tabulated_age,
        }
    }

    /// Build from dense vectors indexed by age
    ///
    /// Vectors shorter than the age grid are padded with zeros.
    pub fn from_columns(columns: HashMap<MortalityTableKey, Vec<f64>>) -> Result<Self> {
        if columns.is_empty() {
            return Err(TableSourceError::NoTableColumns.into());
        }

        let highest_tabulated_age = columns
            .values()
            .map(|v| v.len().saturating_sub(1) as u32)
            .max()
            .unwrap_or(0);
        let len = MAX_AGE.max(highest_tabulated_age) as usize + 1;

        let vectors = columns
            .into_iter()
            .map(|(key, mut rates)| {
                rates.resize(len, 0.0);
                (key, rates)
            })
            .collect();

        Ok(Self {
            vectors,
            highest_tabulated_age,
        })
    }

    /// Mortality probability q at `age`
    ///
    /// Ages beyond the tabulated range return 0: survivors stay constant past
    /// the end of the table.
    pub fn probability(&self, table: TableId, sex: Sex, age: i32) -> Result<f64> {
        if age < 0 {
            return Err(TariffError::InvalidAge(age));
        }
        let rates = self.vector(MortalityTableKey::new(table, sex))?;
        Ok(rates.get(age as usize).copied().unwrap_or(0.0))
    }

    /// Probability lookup with textual identifiers, as found in external configuration
    pub fn probability_by_code(&self, table: &str, sex: &str, age: i32) -> Result<f64> {
        let table: TableId = table.parse()?;
        self.probability(table, Sex::from_code(sex), age)
    }

    /// Full probability vector for one table/sex pair
    pub fn vector(&self, key: MortalityTableKey) -> Result<&[f64]> {
        self.vectors
            .get(&key)
            .map(Vec::as_slice)
            .ok_or_else(|| TableSourceError::MissingColumn(key.column_name()).into())
    }

    /// Table/sex pairs present in the source
    pub fn keys(&self) -> impl Iterator<Item = &MortalityTableKey> {
        self.vectors.keys()
    }

    /// Highest age that appeared in the source
    pub fn highest_tabulated_age(&self) -> u32 {
        self.highest_tabulated_age
    }
}
