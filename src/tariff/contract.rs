//! Contract and tariff parameters of an endowment policy

use log::warn;
use serde::{Deserialize, Serialize};

use super::config::instalment_surcharge;
use crate::commutation::Basis;
use crate::error::{Result, TariffError};
use crate::tables::{Sex, TableId};

fn default_surrender_floor() -> f64 {
    50.0
}

fn default_surrender_cap() -> f64 {
    150.0
}

fn default_surrender_rate() -> f64 {
    0.01
}

fn default_layer() -> u32 {
    1
}

/// Endowment (KLV) contract with its tariff loadings
///
/// Field aliases accept the short workbook names (`x`, `n`, `t`, `VS`, `zw`,
/// ...) so that exported parameter sheets load without renaming.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TariffContract {
    // Contract data
    #[serde(alias = "x")]
    pub entry_age: i32,
    pub sex: Sex,
    #[serde(alias = "n")]
    pub term: i32,
    #[serde(alias = "t")]
    pub payment_term: i32,
    #[serde(alias = "VS")]
    pub sum_insured: f64,
    #[serde(alias = "zw")]
    pub payments_per_year: i32,

    // Tariff data
    #[serde(alias = "zins")]
    pub interest: f64,
    #[serde(alias = "tafel")]
    pub table: TableId,
    /// Acquisition loading
    pub alpha: f64,
    /// Administration loading on the premium
    pub beta1: f64,
    #[serde(default)]
    pub gamma1: f64,
    #[serde(default)]
    pub gamma2: f64,
    #[serde(default)]
    pub gamma3: f64,
    /// Flat cost per premium period
    #[serde(default, alias = "k")]
    pub unit_cost: f64,
    /// Instalment surcharge; the standard table for `payments_per_year` when absent
    #[serde(default, alias = "ratzu")]
    pub instalment_surcharge: Option<f64>,

    // Flexible phase thresholds
    #[serde(alias = "MinAlterFlex")]
    pub min_age_flex: i32,
    #[serde(alias = "MinRLZFlex")]
    pub min_remaining_term_flex: i32,

    // Surrender deduction bounds
    #[serde(default = "default_surrender_floor")]
    pub surrender_floor: f64,
    #[serde(default = "default_surrender_cap")]
    pub surrender_cap: f64,
    #[serde(default = "default_surrender_rate")]
    pub surrender_rate: f64,

    // Generation table parameters
    #[serde(default)]
    pub birth_year: Option<i32>,
    #[serde(default)]
    pub pension_start_age: Option<i32>,
    #[serde(default = "default_layer")]
    pub layer: u32,
}

impl TariffContract {
    /// Contract with zero surplus parameters, no unit cost and default bounds
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        entry_age: i32,
        sex: Sex,
        term: i32,
        payment_term: i32,
        sum_insured: f64,
        payments_per_year: i32,
        interest: f64,
        table: TableId,
    ) -> Self {
        Self {
            entry_age,
            sex,
            term,
            payment_term,
            sum_insured,
            payments_per_year,
            interest,
            table,
            alpha: 0.0,
            beta1: 0.0,
            gamma1: 0.0,
            gamma2: 0.0,
            gamma3: 0.0,
            unit_cost: 0.0,
            instalment_surcharge: None,
            min_age_flex: 0,
            min_remaining_term_flex: 0,
            surrender_floor: default_surrender_floor(),
            surrender_cap: default_surrender_cap(),
            surrender_rate: default_surrender_rate(),
            birth_year: None,
            pension_start_age: None,
            layer: default_layer(),
        }
    }

    pub fn with_loadings(mut self, alpha: f64, beta1: f64) -> Self {
        self.alpha = alpha;
        self.beta1 = beta1;
        self
    }

    pub fn with_surplus(mut self, gamma1: f64, gamma2: f64, gamma3: f64) -> Self {
        self.gamma1 = gamma1;
        self.gamma2 = gamma2;
        self.gamma3 = gamma3;
        self
    }

    pub fn with_flex_phase(mut self, min_age: i32, min_remaining_term: i32) -> Self {
        self.min_age_flex = min_age;
        self.min_remaining_term_flex = min_remaining_term;
        self
    }

    /// Effective instalment surcharge
    pub fn surcharge(&self) -> f64 {
        self.instalment_surcharge
            .unwrap_or_else(|| instalment_surcharge(self.payments_per_year))
    }

    /// Commutation basis of this contract
    pub fn basis(&self) -> Basis {
        let mut basis = Basis::new(self.table, self.sex, self.interest).with_layer(self.layer);
        basis.birth_year = self.birth_year;
        basis.pension_start_age = self.pension_start_age;
        basis
    }

    /// Last elapsed year of the default schedule
    pub fn default_horizon(&self) -> i32 {
        self.term.max(self.payment_term)
    }

    /// Reject parameter combinations the tariff formulas are not meant for
    ///
    /// The calculator itself does not call this; degenerate inputs there
    /// fall back to zero values. A payment term longer than the contract
    /// term is only logged: the schedule then runs to `max(n, t)`.
    pub fn validate(&self) -> Result<()> {
        let fail = |msg: String| Err(TariffError::InvalidContract(msg));

        if self.entry_age < 0 {
            return fail(format!("entry age {} is negative", self.entry_age));
        }
        if self.term <= 0 {
            return fail(format!("term {} must be positive", self.term));
        }
        if self.payment_term < 0 {
            return fail(format!("payment term {} is negative", self.payment_term));
        }
        if self.payment_term > self.term {
            warn!(
                "payment term {} exceeds contract term {}; schedule runs to year {}",
                self.payment_term,
                self.term,
                self.default_horizon()
            );
        }
        if self.payments_per_year <= 0 || 12 % self.payments_per_year != 0 {
            return fail(format!(
                "payments per year {} must be a positive divisor of 12",
                self.payments_per_year
            ));
        }
        if self.interest <= -1.0 {
            return fail(format!("interest rate {} must exceed -100%", self.interest));
        }
        if self.sum_insured < 0.0 {
            return fail(format!("sum insured {} is negative", self.sum_insured));
        }
        if self.surrender_floor > self.surrender_cap {
            return fail(format!(
                "surrender deduction floor {} exceeds cap {}",
                self.surrender_floor, self.surrender_cap
            ));
        }
        Ok(())
    }
}
