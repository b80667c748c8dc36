//! Construction of the commutation vectors
//!
//! Each vector is derived from the previous one and every element is rounded
//! as soon as it is computed. The backward sums therefore depend on the order
//! of summation and are always built top-down from `MAX_AGE`.

use serde::Serialize;

use super::basis::Basis;
use super::constants::{round, MAX_AGE, RADIX};
use crate::error::Result;
use crate::tables::TableRepository;

/// Survivors l_0..=l_end, starting from [`RADIX`]
///
/// Ages past the end of `rates` have probability 0.
pub fn survivors(rates: &[f64], end_age: usize) -> Vec<f64> {
    let mut lx = Vec::with_capacity(end_age + 1);
    lx.push(RADIX);
    for age in 1..=end_age {
        let q = rates.get(age - 1).copied().unwrap_or(0.0);
        lx.push(round(lx[age - 1] * (1.0 - q)));
    }
    lx
}

/// Deaths d_i = l_i - l_{i+1}; the last element is 0 by convention
pub fn deaths(survivors: &[f64]) -> Vec<f64> {
    let mut dx = vec![0.0; survivors.len()];
    for (i, pair) in survivors.windows(2).enumerate() {
        dx[i] = round(pair[0] - pair[1]);
    }
    dx
}

/// D_i = l_i · v^i
pub fn discounted_survivors(survivors: &[f64], v: f64) -> Vec<f64> {
    survivors
        .iter()
        .enumerate()
        .map(|(i, l)| round(l * v.powf(i as f64)))
        .collect()
}

/// C_i = d_i · v^(i+1)
pub fn discounted_deaths(deaths: &[f64], v: f64) -> Vec<f64> {
    deaths
        .iter()
        .enumerate()
        .map(|(i, d)| round(d * v.powf((i + 1) as f64)))
        .collect()
}

/// Backward running sum: S_last = x_last, S_i = S_{i+1} + x_i
pub fn backward_sum(values: &[f64]) -> Vec<f64> {
    let mut sums = values.to_vec();
    for i in (0..sums.len().saturating_sub(1)).rev() {
        sums[i] = round(sums[i + 1] + values[i]);
    }
    sums
}

/// All commutation vectors of one basis over ages `0..=MAX_AGE`
#[derive(Debug, Clone)]
pub struct CommutationVectors {
    pub basis: Basis,
    pub survivors: Vec<f64>,
    pub deaths: Vec<f64>,
    pub discounted_survivors: Vec<f64>,
    pub discounted_deaths: Vec<f64>,
    pub sum_discounted_survivors: Vec<f64>,
    pub sum_discounted_deaths: Vec<f64>,
    pub sum_of_sum_discounted_deaths: Vec<f64>,
}

/// One age of [`CommutationVectors`] in export layout
#[derive(Debug, Clone, Serialize)]
pub struct CommutationRow {
    #[serde(rename = "x")]
    pub age: u32,
    #[serde(rename = "lx")]
    pub survivors: f64,
    #[serde(rename = "dx")]
    pub deaths: f64,
    #[serde(rename = "Dx")]
    pub discounted_survivors: f64,
    #[serde(rename = "Cx")]
    pub discounted_deaths: f64,
    #[serde(rename = "Nx")]
    pub sum_discounted_survivors: f64,
    #[serde(rename = "Mx")]
    pub sum_discounted_deaths: f64,
    #[serde(rename = "Rx")]
    pub sum_of_sum_discounted_deaths: f64,
}

impl CommutationVectors {
    /// Build every vector for `basis` from the repository
    pub fn build(tables: &TableRepository, basis: &Basis) -> Result<Self> {
        let rates = tables.vector(basis.table_key())?;
        Ok(Self::from_rates(rates, basis))
    }

    /// Build from a raw probability vector
    pub fn from_rates(rates: &[f64], basis: &Basis) -> Self {
        let v = basis.discount_factor();
        let lx = survivors(rates, MAX_AGE as usize);
        let dx = deaths(&lx);
        let big_dx = discounted_survivors(&lx, v);
        let cx = discounted_deaths(&dx, v);
        let nx = backward_sum(&big_dx);
        let mx = backward_sum(&cx);
        let rx = backward_sum(&mx);

        Self {
            basis: *basis,
            survivors: lx,
            deaths: dx,
            discounted_survivors: big_dx,
            discounted_deaths: cx,
            sum_discounted_survivors: nx,
            sum_discounted_deaths: mx,
            sum_of_sum_discounted_deaths: rx,
        }
    }

    /// Rows in ascending age for tabular export
    pub fn rows(&self) -> Vec<CommutationRow> {
        (0..self.survivors.len())
            .map(|i| CommutationRow {
                age: i as u32,
                survivors: self.survivors[i],
                deaths: self.deaths[i],
                discounted_survivors: self.discounted_survivors[i],
                discounted_deaths: self.discounted_deaths[i],
                sum_discounted_survivors: self.sum_discounted_survivors[i],
                sum_discounted_deaths: self.sum_discounted_deaths[i],
                sum_of_sum_discounted_deaths: self.sum_of_sum_discounted_deaths[i],
            })
            .collect()
    }
}
