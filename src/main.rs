//! Tariff Calculator CLI
//!
//! Loads a mortality table source and a contract file, prints the premium
//! record and schedule of every contract and optionally writes the schedule
//! rows as CSV.

use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use tariff_calculator::tables::{TableRepository, DEFAULT_TABLE_PATH};
use tariff_calculator::tariff::{
    config, ContractSchedule, ScheduleConfig, TariffCalculator, DEFAULT_CONTRACT_PATH,
};

#[derive(Parser, Debug)]
#[command(
    name = "tariff_calculator",
    version,
    about = "Premiums and schedule values for endowment tariffs"
)]
struct Cli {
    /// Contract JSON file (one contract or an array)
    #[arg(default_value = DEFAULT_CONTRACT_PATH)]
    contract: PathBuf,

    /// Mortality table CSV
    #[arg(long, default_value = DEFAULT_TABLE_PATH)]
    tables: PathBuf,

    /// Write schedule rows to this CSV file
    #[arg(long)]
    output: Option<PathBuf>,

    /// Last elapsed year to compute instead of max(n, t)
    #[arg(long)]
    horizon: Option<u32>,

    /// Compute rows on the calling thread only
    #[arg(long)]
    sequential: bool,
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    println!("Tariff Calculator v{}", env!("CARGO_PKG_VERSION"));
    println!("=======================\n");

    let start = Instant::now();
    let tables = TableRepository::from_path(&cli.tables)
        .with_context(|| format!("failed to load mortality tables from {}", cli.tables.display()))?;
    let contracts = config::load_contracts(&cli.contract)
        .with_context(|| format!("failed to load contracts from {}", cli.contract.display()))?;
    println!(
        "Loaded {} table column(s) and {} contract(s) in {:?}\n",
        tables.keys().count(),
        contracts.len(),
        start.elapsed()
    );

    let calculator = TariffCalculator::with_config(
        Arc::new(tables),
        ScheduleConfig {
            horizon: cli.horizon,
            parallel: !cli.sequential,
        },
    );

    let mut schedules = Vec::with_capacity(contracts.len());
    for (i, result) in calculator.calculate_batch(&contracts).into_iter().enumerate() {
        let schedule = result.with_context(|| format!("contract {} failed", i + 1))?;
        print_schedule(i + 1, &schedule);
        schedules.push(schedule);
    }

    let stats = calculator.cache_stats();
    println!(
        "Cache: {} entries, {} hits, {} misses ({:.1}% hit rate)",
        stats.entries,
        stats.hits,
        stats.misses,
        stats.hit_rate() * 100.0
    );

    if let Some(path) = &cli.output {
        write_schedules(path, &schedules)?;
        println!("\nSchedule rows written to: {}", path.display());
    }

    println!("Completed in {:?}", start.elapsed());
    Ok(())
}

fn print_schedule(index: usize, schedule: &ContractSchedule) {
    let c = &schedule.contract;
    let p = &schedule.premium;

    println!(
        "Contract {}: x={} {} n={} t={} VS={:.2} zw={} i={:.4} {}",
        index,
        c.entry_age,
        c.sex,
        c.term,
        c.payment_term,
        c.sum_insured,
        c.payments_per_year,
        c.interest,
        c.table
    );
    println!("  Bxt: {:.8}", p.gross_rate);
    println!("  BJB: {:.2}", p.annual_premium);
    println!("  BZB: {:.2}", p.installment);
    println!("  Pxt: {:.8}", p.net_rate);
    println!();

    println!(
        "{:>3} {:>4} {:>10} {:>10} {:>10} {:>12} {:>12} {:>4} {:>8} {:>12} {:>12}",
        "k", "Age", "Axn", "axn", "axt", "kDRx_bpfl", "kVx_MRV", "Flex", "StoAb", "RKW", "VS_bfr"
    );
    println!("{}", "-".repeat(110));
    for row in &schedule.rows {
        println!(
            "{:>3} {:>4} {:>10.6} {:>10.6} {:>10.6} {:>12.2} {:>12.2} {:>4} {:>8.2} {:>12.2} \
             {:>12.2}",
            row.elapsed_years,
            row.attained_age,
            row.insurance_value,
            row.term_annuity,
            row.payment_annuity,
            row.funded_reserve_amount,
            row.minimum_reserve,
            if row.flexible_phase { 1 } else { 0 },
            row.surrender_deduction,
            row.surrender_value,
            row.paid_up_sum_insured,
        );
    }
    println!();
}

/// Rows of every schedule in contract order; `k` restarts at 0 for each contract
fn write_schedules(path: &Path, schedules: &[ContractSchedule]) -> Result<()> {
    let file = File::create(path).with_context(|| format!("unable to create {}", path.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    for row in schedules.iter().flat_map(|s| &s.rows) {
        writer.serialize(row)?;
    }

    writer.flush()?;
    Ok(())
}
