//! Write the commutation vectors of one basis as CSV
//!
//! Usage: commutation_table --table DAV1994_T --sex M --interest 0.0175 [--output dx.csv]

use std::fs::File;
use std::io::{self, Write};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tariff_calculator::commutation::{Basis, CommutationEngine};
use tariff_calculator::tables::{Sex, TableId, TableRepository, DEFAULT_TABLE_PATH};

#[derive(Parser, Debug)]
#[command(name = "commutation_table", version, about = "Export commutation vectors for one basis")]
struct Cli {
    /// Mortality table identifier
    #[arg(long, default_value = "DAV1994_T")]
    table: String,

    /// Sex code (M or F)
    #[arg(long, default_value = "M")]
    sex: String,

    /// Technical interest rate as a decimal
    #[arg(long, default_value_t = 0.0175)]
    interest: f64,

    /// Mortality table CSV
    #[arg(long, default_value = DEFAULT_TABLE_PATH)]
    tables: PathBuf,

    /// Output file; stdout when omitted
    #[arg(long)]
    output: Option<PathBuf>,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    let table: TableId = cli.table.parse()?;
    let basis = Basis::new(table, Sex::from_code(&cli.sex), cli.interest);

    let tables = TableRepository::from_path(&cli.tables)
        .with_context(|| format!("failed to load mortality tables from {}", cli.tables.display()))?;
    let engine = CommutationEngine::new(Arc::new(tables));
    let vectors = engine.vectors(&basis)?;

    let out: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("unable to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };

    let mut writer = csv::Writer::from_writer(out);
    for row in vectors.rows() {
        writer.serialize(row)?;
    }
    writer.flush()?;

    if let Some(path) = &cli.output {
        eprintln!(
            "Wrote {} ages for {} {} at {:.4} to {}",
            vectors.survivors.len(),
            basis.table,
            basis.sex,
            basis.interest,
            path.display()
        );
    }
    Ok(())
}
