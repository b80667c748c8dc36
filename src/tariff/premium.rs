//! Premium constants of a contract

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use super::contract::TariffContract;
use crate::annuity::AnnuityEngine;
use crate::commutation::{safe_div, safe_div_or};
use crate::error::Result;

/// Premium results for one contract
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PremiumRecord {
    /// Gross annual premium per unit sum insured
    #[serde(rename = "Bxt")]
    pub gross_rate: f64,
    /// Gross annual premium
    #[serde(rename = "BJB")]
    pub annual_premium: f64,
    /// Premium per instalment including surcharge and unit cost
    #[serde(rename = "BZB")]
    pub installment: f64,
    /// Net premium rate including amortised acquisition cost
    #[serde(rename = "Pxt")]
    pub net_rate: f64,
}

/// Annuity values at the entry age reused by every schedule row
#[derive(Debug, Clone, Copy)]
pub(crate) struct EntryAnnuities {
    /// ä(x, n)
    pub term: f64,
    /// ä(x, t)
    pub payment: f64,
    /// ä(x, 5), the amortisation period of acquisition costs
    pub amortisation: f64,
}

pub(crate) const AMORTISATION_YEARS: i32 = 5;

impl EntryAnnuities {
    pub fn compute(annuities: &AnnuityEngine<'_>, contract: &TariffContract) -> Result<Self> {
        let basis = contract.basis();
        let x = contract.entry_age;
        Ok(Self {
            term: annuities.temporary_annuity_n_years(x, contract.term, 1, &basis)?,
            payment: annuities.temporary_annuity_n_years(x, contract.payment_term, 1, &basis)?,
            amortisation: annuities.temporary_annuity_n_years(x, AMORTISATION_YEARS, 1, &basis)?,
        })
    }
}

/// Gross rate, annual premium, instalment and net rate
pub(crate) fn compute_premium(
    annuities: &AnnuityEngine<'_>,
    contract: &TariffContract,
    entry: &EntryAnnuities,
) -> Result<PremiumRecord> {
    let basis = contract.basis();
    let commutation = annuities.commutation();
    let (x, n, t) = (contract.entry_age, contract.term, contract.payment_term);

    let insurance = annuities.term_insurance(x, n, &basis)?;
    let endowment = safe_div(
        commutation.discounted_survivors(x + n, &basis)?,
        commutation.discounted_survivors(x, &basis)?,
    );
    let t = t as f64;

    let numerator = insurance
        + endowment
        + contract.gamma1 * entry.payment
        + contract.gamma2 * (entry.term - entry.payment);
    let denominator = (1.0 - contract.beta1) * entry.payment - contract.alpha * t;
    if denominator == 0.0 {
        warn!("gross premium denominator is zero for {:?}; rate set to 0", contract);
    }
    let gross_rate = safe_div(numerator, denominator);

    let annual_premium = contract.sum_insured * gross_rate;

    let dividend = (1.0 + contract.surcharge()) * (annual_premium + contract.unit_cost);
    if contract.payments_per_year == 0 {
        warn!("zero payments per year; instalment is the undivided annual amount");
    }
    let installment = safe_div_or(dividend, contract.payments_per_year as f64, dividend);

    if entry.payment == 0.0 {
        warn!("premium annuity is zero for {:?}; net rate set to 0", contract);
    }
    let net_rate = safe_div(insurance + endowment + t * contract.alpha * gross_rate, entry.payment);

    debug!(
        "premium x={} n={} t={}: Bxt={} BJB={} BZB={} Pxt={}",
        x, n, t, gross_rate, annual_premium, installment, net_rate
    );

    Ok(PremiumRecord {
        gross_rate,
        annual_premium,
        installment,
        net_rate,
    })
}
