//! Annuity factors for premium and reserve formulas
//!
//! - Life annuities due (whole life, temporary, deferred) with sub-annual payments
//! - Term insurance and pure endowment values
//! - Annuity-certain and the instalment deduction term

mod certain;
mod engine;

pub use certain::{certain_annuity, deduction_term};
pub use engine::AnnuityEngine;
