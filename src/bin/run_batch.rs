//! Run every parameter set of a scenario CSV in parallel
//!
//! Outputs one summary row per scenario for side-by-side comparison
//!
//! Usage: cargo run --bin run_batch -- [input.csv] [--output batch_output.csv]

use std::fs::File;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{Context, Result};
use clap::Parser;
use serde::Serialize;

use rent_vs_buy::params::{load_parameter_sets, loader::DEFAULT_SCENARIOS_PATH};
use rent_vs_buy::{IrrOutcome, ScenarioRunner, SimulationResult};

#[derive(Parser, Debug)]
#[command(name = "run_batch", about = "Run a CSV of buy-vs-rent scenarios")]
struct Cli {
    #[arg(default_value = DEFAULT_SCENARIOS_PATH)]
    input: PathBuf,
    #[arg(long, default_value = "batch_output.csv")]
    output: PathBuf,
}

/// One output row per scenario
#[derive(Debug, Serialize)]
struct BatchRow {
    scenario: usize,
    term_years: u32,
    purchase_price: f64,
    monthly_annuity: f64,
    final_property_value: f64,
    final_balance: f64,
    final_buy_wealth: f64,
    final_rent_wealth: f64,
    absolute_differential: f64,
    relative_differential: f64,
    simple_annual_return: Option<f64>,
    irr_annual: Option<f64>,
    first_shortfall_month: Option<u32>,
    cumulative_shortfall: f64,
}

impl BatchRow {
    fn from_result(scenario: usize, result: &SimulationResult) -> Self {
        let s = &result.summary;
        Self {
            scenario,
            term_years: result.params.term_years,
            purchase_price: result.params.purchase_price,
            monthly_annuity: s.monthly_annuity,
            final_property_value: s.final_property_value,
            final_balance: s.final_balance,
            final_buy_wealth: s.comparison.final_buy_wealth,
            final_rent_wealth: s.comparison.final_rent_wealth,
            absolute_differential: s.comparison.absolute_differential,
            relative_differential: s.comparison.relative_differential,
            simple_annual_return: s.simple_annual_return,
            irr_annual: match s.irr {
                IrrOutcome::Defined { annualized_rate, .. } => Some(annualized_rate),
                IrrOutcome::Undefined { .. } => None,
            },
            first_shortfall_month: s.first_shortfall_month,
            cumulative_shortfall: s.cumulative_shortfall,
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let start = Instant::now();

    println!("Loading scenarios from {}...", cli.input.display());
    let scenarios = load_parameter_sets(&cli.input)
        .with_context(|| format!("failed to load {}", cli.input.display()))?;
    println!("Loaded {} scenarios in {:?}", scenarios.len(), start.elapsed());

    let runner = ScenarioRunner::new();
    let run_start = Instant::now();
    let results = runner.run_batch(&scenarios);
    println!("Simulations complete in {:?}", run_start.elapsed());

    let file = File::create(&cli.output)
        .with_context(|| format!("failed to create {}", cli.output.display()))?;
    let mut writer = csv::Writer::from_writer(file);

    for (index, result) in results.iter().enumerate() {
        let scenario = index + 1;
        let result = result
            .as_ref()
            .map_err(|e| anyhow::anyhow!("scenario {}: {}", scenario, e))?;
        let row = BatchRow::from_result(scenario, result);

        println!(
            "  Scenario {:>3}: buy {:>14.2}  rent {:>14.2}  diff {:>8.2} %",
            scenario,
            row.final_buy_wealth,
            row.final_rent_wealth,
            row.relative_differential * 100.0
        );
        writer.serialize(&row)?;
    }
    writer.flush()?;

    println!("\nOutput written to {}", cli.output.display());
    println!("Total time: {:?}", start.elapsed());

    Ok(())
}
