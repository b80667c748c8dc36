//! Supported table identifiers and sex normalisation

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::TariffError;

/// Mortality tables the tariff is priced on
///
/// The set is closed: configuration naming any other table is rejected when
/// it is parsed, long before a commutation vector is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum TableId {
    /// DAV 1994 T (aggregate table for death benefits)
    Dav1994T,
    /// DAV 2008 T
    Dav2008T,
}

impl TableId {
    pub const ALL: [TableId; 2] = [TableId::Dav1994T, TableId::Dav2008T];

    /// Identifier as used in table source column headers
    pub fn code(&self) -> &'static str {
        match self {
            TableId::Dav1994T => "DAV1994_T",
            TableId::Dav2008T => "DAV2008_T",
        }
    }
}

impl FromStr for TableId {
    type Err = TariffError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_uppercase();
        TableId::ALL
            .into_iter()
            .find(|id| id.code() == normalized)
            .ok_or_else(|| TariffError::UnsupportedTable(s.trim().to_string()))
    }
}

impl TryFrom<String> for TableId {
    type Error = TariffError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<TableId> for String {
    fn from(id: TableId) -> Self {
        id.code().to_string()
    }
}

impl fmt::Display for TableId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// Sex of the insured life
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Normalise free-form input: "M"/"male" in any case is male, everything else female
    pub fn from_code(code: &str) -> Self {
        let code = code.trim();
        if code.eq_ignore_ascii_case("m") || code.eq_ignore_ascii_case("male") {
            Sex::Male
        } else {
            Sex::Female
        }
    }

    /// Single-letter code used in table column headers
    pub fn code(&self) -> &'static str {
        match self {
            Sex::Male => "M",
            Sex::Female => "F",
        }
    }
}

impl From<String> for Sex {
    fn from(value: String) -> Self {
        Sex::from_code(&value)
    }
}

impl From<Sex> for String {
    fn from(sex: Sex) -> Self {
        sex.code().to_string()
    }
}

impl fmt::Display for Sex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

/// One mortality curve: a table for one sex
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MortalityTableKey {
    pub table: TableId,
    pub sex: Sex,
}

impl MortalityTableKey {
    pub fn new(table: TableId, sex: Sex) -> Self {
        Self { table, sex }
    }

    /// Column header in a table source, e.g. `DAV1994_T_M`
    pub fn column_name(&self) -> String {
        format!("{}_{}", self.table.code(), self.sex.code())
    }

    /// Inverse of [`column_name`](Self::column_name); `None` for unrelated columns
    pub fn from_column_name(name: &str) -> Option<Self> {
        let name = name.trim().to_ascii_uppercase();
        let (table, sex) = name.rsplit_once('_')?;
        let table = table.parse::<TableId>().ok()?;
        let sex = match sex {
            "M" => Sex::Male,
            "F" => Sex::Female,
            _ => return None,
        };
        Some(Self { table, sex })
    }
}

impl fmt::Display for MortalityTableKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}_{}", self.table.code(), self.sex.code())
    }
}
