//! Contract configuration files
//!
//! Contracts are stored as JSON, either a single object or an array of
//! objects. Optional fields take the serde defaults of [`TariffContract`];
//! an omitted instalment surcharge follows [`instalment_surcharge`].

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use log::info;
use serde::Deserialize;

use super::contract::TariffContract;
use crate::error::{Result, TariffError};

/// Default path to the reference contract
pub const DEFAULT_CONTRACT_PATH: &str = "data/contracts/klv_reference.json";

/// Standard instalment surcharge for `payments_per_year`
pub fn instalment_surcharge(payments_per_year: i32) -> f64 {
    match payments_per_year {
        2 => 0.02,
        4 => 0.03,
        12 => 0.05,
        _ => 0.0,
    }
}

#[derive(Deserialize)]
#[serde(untagged)]
enum ContractFile {
    Many(Vec<TariffContract>),
    One(TariffContract),
}

/// Load and validate every contract in a JSON file
pub fn load_contracts(path: &Path) -> Result<Vec<TariffContract>> {
    let file = File::open(path).map_err(|e| {
        TariffError::InvalidContract(format!("cannot open {}: {}", path.display(), e))
    })?;
    let contracts = load_contracts_from_reader(BufReader::new(file))?;
    info!("Loaded {} contract(s) from {}", contracts.len(), path.display());
    Ok(contracts)
}

/// Load and validate contracts from any JSON reader
pub fn load_contracts_from_reader<R: Read>(reader: R) -> Result<Vec<TariffContract>> {
    let parsed: ContractFile = serde_json::from_reader(reader)
        .map_err(|e| TariffError::InvalidContract(format!("malformed contract file: {}", e)))?;

    let contracts = match parsed {
        ContractFile::Many(contracts) => contracts,
        ContractFile::One(contract) => vec![contract],
    };
    for contract in &contracts {
        contract.validate()?;
    }
    Ok(contracts)
}

/// Load a file that must hold exactly one contract
pub fn load_contract(path: &Path) -> Result<TariffContract> {
    let mut contracts = load_contracts(path)?;
    if contracts.len() != 1 {
        return Err(TariffError::InvalidContract(format!(
            "{} holds {} contracts, expected one",
            path.display(),
            contracts.len()
        )));
    }
    Ok(contracts.remove(0))
}
