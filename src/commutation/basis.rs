//! Calculation basis: everything besides the age that a commutation value depends on

use serde::{Deserialize, Serialize};

use crate::tables::{MortalityTableKey, Sex, TableId};

/// Table, sex and interest rate plus the optional generation-table parameters
///
/// `birth_year`, `pension_start_age` and `layer` do not change values on the
/// supported period tables; they take part in cache keys so that values for
/// different generations or layers never alias each other.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Basis {
    pub table: TableId,
    pub sex: Sex,
    /// Technical interest rate as a decimal (0.0175 = 1.75%)
    pub interest: f64,
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub pension_start_age: Option<i32>,
    #[serde(default = "default_layer")]
    pub layer: u32,
}

fn default_layer() -> u32 {
    1
}

impl Basis {
    pub fn new(table: TableId, sex: Sex, interest: f64) -> Self {
        Self {
            table,
            sex,
            interest,
            birth_year: None,
            pension_start_age: None,
            layer: default_layer(),
        }
    }

    pub fn with_birth_year(mut self, birth_year: i32) -> Self {
        self.birth_year = Some(birth_year);
        self
    }

    pub fn with_pension_start_age(mut self, age: i32) -> Self {
        self.pension_start_age = Some(age);
        self
    }

    pub fn with_layer(mut self, layer: u32) -> Self {
        self.layer = layer;
        self
    }

    /// One-year discount factor v = 1/(1+i)
    pub fn discount_factor(&self) -> f64 {
        1.0 / (1.0 + self.interest)
    }

    pub fn table_key(&self) -> MortalityTableKey {
        MortalityTableKey::new(self.table, self.sex)
    }
}
