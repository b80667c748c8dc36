//! Schedule output: premium record plus one row per elapsed contract year

use serde::{Deserialize, Serialize};

use super::contract::TariffContract;
use super::premium::PremiumRecord;

/// Values of one elapsed year `k`
///
/// Serialized column names follow the tariff workbook.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleRow {
    #[serde(rename = "k")]
    pub elapsed_years: i32,
    #[serde(rename = "age")]
    pub attained_age: i32,

    /// Term insurance plus pure endowment over the remaining term
    #[serde(rename = "Axn")]
    pub insurance_value: f64,
    /// Annuity over the remaining contract term
    #[serde(rename = "axn")]
    pub term_annuity: f64,
    /// Annuity over the remaining payment term
    #[serde(rename = "axt")]
    pub payment_annuity: f64,

    // Reserves
    #[serde(rename = "kVx_bpfl")]
    pub funded_reserve: f64,
    #[serde(rename = "kDRx_bpfl")]
    pub funded_reserve_amount: f64,
    #[serde(rename = "kVx_bfr")]
    pub paid_up_reserve: f64,
    #[serde(rename = "kVx_MRV")]
    pub minimum_reserve: f64,

    // Surrender and paid-up values
    #[serde(rename = "flex_phase")]
    pub flexible_phase: bool,
    #[serde(rename = "StoAb")]
    pub surrender_deduction: f64,
    #[serde(rename = "RKW")]
    pub surrender_value: f64,
    #[serde(rename = "VS_bfr")]
    pub paid_up_sum_insured: f64,
}

/// Complete calculation result for one contract
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ContractSchedule {
    pub contract: TariffContract,
    pub premium: PremiumRecord,
    /// Ascending by elapsed year
    pub rows: Vec<ScheduleRow>,
}

impl ContractSchedule {
    /// Row for elapsed year `k`
    pub fn row(&self, k: i32) -> Option<&ScheduleRow> {
        self.rows.iter().find(|r| r.elapsed_years == k)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
