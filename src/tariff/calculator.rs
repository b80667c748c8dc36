//! Premium and schedule calculation for endowment contracts

use std::sync::Arc;

use log::info;
use rayon::prelude::*;

use super::contract::TariffContract;
use super::premium::{compute_premium, EntryAnnuities, PremiumRecord, AMORTISATION_YEARS};
use super::schedule::{ContractSchedule, ScheduleRow};
use crate::annuity::AnnuityEngine;
use crate::commutation::{safe_div, Basis, CacheStats, CommutationEngine};
use crate::error::{Result, TariffError};
use crate::tables::TableRepository;

/// Configuration for a schedule run
#[derive(Debug, Clone)]
pub struct ScheduleConfig {
    /// Last elapsed year to compute; `max(n, t)` when unset
    pub horizon: Option<u32>,

    /// Evaluate rows on the rayon pool
    pub parallel: bool,
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            horizon: None,
            parallel: true,
        }
    }
}

/// Values shared by every row of one contract
struct RowContext<'c> {
    contract: &'c TariffContract,
    basis: Basis,
    premium: PremiumRecord,
    entry: EntryAnnuities,
}

/// Tariff calculator over one commutation engine
///
/// Every contract calculated here shares the engine's cache, so a batch of
/// contracts on the same basis reuses the commutation values of the first.
#[derive(Debug)]
pub struct TariffCalculator {
    engine: CommutationEngine,
    config: ScheduleConfig,
}

impl TariffCalculator {
    pub fn new(tables: Arc<TableRepository>) -> Self {
        Self::with_config(tables, ScheduleConfig::default())
    }

    pub fn with_config(tables: Arc<TableRepository>, config: ScheduleConfig) -> Self {
        Self {
            engine: CommutationEngine::new(tables),
            config,
        }
    }

    pub fn engine(&self) -> &CommutationEngine {
        &self.engine
    }

    pub fn config(&self) -> &ScheduleConfig {
        &self.config
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.engine.cache_stats()
    }

    fn annuities(&self) -> AnnuityEngine<'_> {
        AnnuityEngine::new(&self.engine)
    }

    /// Premium constants only
    pub fn premium(&self, contract: &TariffContract) -> Result<PremiumRecord> {
        let annuities = self.annuities();
        let entry = EntryAnnuities::compute(&annuities, contract)?;
        compute_premium(&annuities, contract, &entry)
    }

    /// Premium record and all schedule rows of one contract
    pub fn calculate(&self, contract: &TariffContract) -> Result<ContractSchedule> {
        let annuities = self.annuities();
        let entry = EntryAnnuities::compute(&annuities, contract)?;
        let premium = compute_premium(&annuities, contract, &entry)?;

        let ctx = RowContext {
            contract,
            basis: contract.basis(),
            premium,
            entry,
        };

        let horizon = match self.config.horizon {
            Some(h) => i32::try_from(h).map_err(|_| TariffError::InvalidHorizon(h))?,
            None => contract.default_horizon().max(0),
        };

        let rows: Vec<ScheduleRow> = if self.config.parallel {
            (0..=horizon)
                .into_par_iter()
                .map(|k| self.schedule_row(&annuities, &ctx, k))
                .collect::<Result<_>>()?
        } else {
            (0..=horizon)
                .map(|k| self.schedule_row(&annuities, &ctx, k))
                .collect::<Result<_>>()?
        };

        info!(
            "schedule complete: x={} n={} t={} rows={} Bxt={:.8}",
            contract.entry_age,
            contract.term,
            contract.payment_term,
            rows.len(),
            premium.gross_rate
        );

        Ok(ContractSchedule {
            contract: contract.clone(),
            premium,
            rows,
        })
    }

    /// Calculate many contracts in parallel against the shared engine
    ///
    /// Results are returned in input order; one failing contract does not
    /// affect the others.
    pub fn calculate_batch(&self, contracts: &[TariffContract]) -> Vec<Result<ContractSchedule>> {
        let results: Vec<Result<ContractSchedule>> = contracts
            .par_iter()
            .map(|contract| self.calculate(contract))
            .collect();

        let stats = self.cache_stats();
        info!(
            "batch complete: {} contracts, {} failed, cache hit rate {:.1}%",
            results.len(),
            results.iter().filter(|r| r.is_err()).count(),
            stats.hit_rate() * 100.0
        );
        results
    }

    fn schedule_row(
        &self,
        annuities: &AnnuityEngine<'_>,
        ctx: &RowContext<'_>,
        k: i32,
    ) -> Result<ScheduleRow> {
        let c = ctx.contract;
        let basis = &ctx.basis;
        let (x, n, t) = (c.entry_age, c.term, c.payment_term);
        let age = x + k;

        let insurance_value = if k <= n {
            annuities.term_insurance(age, (n - k).max(0), basis)?
                + safe_div(
                    self.engine.discounted_survivors(x + n, basis)?,
                    self.engine.discounted_survivors(age, basis)?,
                )
        } else {
            0.0
        };

        let term_annuity = annuities.temporary_annuity_n_years(age, (n - k).max(0), 1, basis)?;
        let payment_annuity = annuities.temporary_annuity_n_years(age, (t - k).max(0), 1, basis)?;

        let annuity_ratio = safe_div(ctx.entry.term, ctx.entry.payment);
        let funded_reserve = insurance_value - ctx.premium.net_rate * payment_annuity
            + c.gamma2 * (term_annuity - annuity_ratio * payment_annuity);
        let funded_reserve_amount = c.sum_insured * funded_reserve;
        let paid_up_reserve = insurance_value + c.gamma3 * term_annuity;

        let amortisation_left =
            annuities.temporary_annuity_n_years(age, (AMORTISATION_YEARS - k).max(0), 1, basis)?;
        let minimum_reserve = funded_reserve_amount
            + c.alpha
                * t as f64
                * ctx.premium.annual_premium
                * safe_div(amortisation_left, ctx.entry.amortisation);

        let flexible_phase = age >= c.min_age_flex && k >= n - c.min_remaining_term_flex;

        let surrender_deduction = if k > n || flexible_phase {
            0.0
        } else {
            let raw = c.surrender_rate * (c.sum_insured - funded_reserve_amount);
            c.surrender_floor.max(c.surrender_cap.min(raw))
        };

        let surrender_value = (minimum_reserve - surrender_deduction).max(0.0);

        let paid_up_sum_insured = if k > n {
            0.0
        } else if k < t {
            safe_div(minimum_reserve, paid_up_reserve)
        } else {
            c.sum_insured
        };

        Ok(ScheduleRow {
            elapsed_years: k,
            attained_age: age,
            insurance_value,
            term_annuity,
            payment_annuity,
            funded_reserve,
            funded_reserve_amount,
            paid_up_reserve,
            minimum_reserve,
            flexible_phase,
            surrender_deduction,
            surrender_value,
            paid_up_sum_insured,
        })
    }
}
