//! CSV-based mortality table loader
//!
//! Reads a table source with one row per age and one probability column per
//! supported table/sex pair:
//!
//! ```text
//! x/y,DAV1994_T_M,DAV1994_T_F,DAV2008_T_M,DAV2008_T_F
//! 0,0.011687,0.009003,0.006113,0.005088
//! ```
//!
//! Semicolon-delimited exports with decimal commas are accepted as well.

use std::collections::HashMap;
use std::fs;
use std::io::Read;
use std::path::Path;

use log::{debug, info};

use super::ids::MortalityTableKey;
use crate::error::TableSourceError;

/// Default location of the table source used by the binaries
pub const DEFAULT_TABLE_PATH: &str = "data/tables/tafeln.csv";

/// Highest age accepted from a table source
pub const MAX_SOURCE_AGE: u32 = 200;

/// Header names recognised as the age column
const AGE_HEADERS: [&str; 5] = ["x/y", "xy", "x", "age", "alter"];

/// Raw table data as read from a source, before padding to the age grid
#[derive(Debug, Clone)]
pub struct LoadedTables {
    /// Probabilities by age for each column present in the source
    pub columns: HashMap<MortalityTableKey, HashMap<u32, f64>>,
    /// Highest age that appeared in the source
    pub highest_age: u32,
}

/// Load a table source from a file
pub fn load_table_source(path: &Path) -> Result<LoadedTables, TableSourceError> {
    let file = fs::File::open(path)?;
    let loaded = load_table_source_from_reader(file)?;
    info!(
        "Loaded {} mortality columns from {} (ages 0..={})",
        loaded.columns.len(),
        path.display(),
        loaded.highest_age
    );
    Ok(loaded)
}

/// Load a table source from any reader (file, string buffer, ...)
pub fn load_table_source_from_reader<R: Read>(
    mut reader: R,
) -> Result<LoadedTables, TableSourceError> {
    let mut text = String::new();
    reader.read_to_string(&mut text)?;

    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(detect_delimiter(&text))
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = csv_reader.headers()?.clone();
    let age_index = headers
        .iter()
        .position(|h| AGE_HEADERS.iter().any(|a| h.eq_ignore_ascii_case(a)))
        .ok_or(TableSourceError::MissingAgeColumn)?;

    let table_columns: Vec<(usize, MortalityTableKey)> = headers
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != age_index)
        .filter_map(|(i, h)| MortalityTableKey::from_column_name(h).map(|key| (i, key)))
        .collect();

    if table_columns.is_empty() {
        return Err(TableSourceError::NoTableColumns);
    }

    let mut columns: HashMap<MortalityTableKey, HashMap<u32, f64>> = table_columns
        .iter()
        .map(|(_, key)| (*key, HashMap::new()))
        .collect();
    let mut highest_age = 0;
    let mut records = 0usize;

    for result in csv_reader.records() {
        let record = result?;

        // Rows without an integer age carry no per-age data (notes, totals, blank lines)
        let age = match record.get(age_index).map(str::parse::<u32>) {
            Some(Ok(age)) => age,
            _ => {
                debug!("Skipping table row without integer age: {:?}", record);
                continue;
            }
        };
        if age > MAX_SOURCE_AGE {
            return Err(TableSourceError::AgeOutOfRange {
                age,
                max: MAX_SOURCE_AGE,
            });
        }

        for (index, key) in &table_columns {
            let raw = record.get(*index).unwrap_or("");
            let value = parse_probability(raw).ok_or_else(|| TableSourceError::MalformedValue {
                age,
                column: key.column_name(),
                value: raw.to_string(),
            })?;
            if let Some(column) = columns.get_mut(key) {
                column.insert(age, value);
            }
        }

        highest_age = highest_age.max(age);
        records += 1;
    }

    if records == 0 {
        return Err(TableSourceError::NoRecords);
    }

    Ok(LoadedTables { columns, highest_age })
}

/// Semicolon for German spreadsheet exports, comma otherwise
fn detect_delimiter(text: &str) -> u8 {
    let header = text.lines().next().unwrap_or("");
    if header.contains(';') && !header.contains(',') {
        b';'
    } else {
        b','
    }
}

/// Parse a probability cell; empty cells count as zero, values outside [0, 1] are rejected
fn parse_probability(raw: &str) -> Option<f64> {
    let raw = raw.trim();
    if raw.is_empty() {
        return Some(0.0);
    }

    let normalized = if raw.contains(',') {
        raw.replace('.', "").replace(',', ".")
    } else {
        raw.to_string()
    };

    normalized
        .parse::<f64>()
        .ok()
        .filter(|v| (0.0..=1.0).contains(v))
}
