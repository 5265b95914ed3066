//! Rent vs. Buy CLI
//!
//! Runs a single projection, prints the buy/rent/comparison summary and
//! writes the monthly schedule to CSV. Every parameter can also be supplied
//! through an `RVB_*` environment variable. Rates are decimals.

use std::fs::File;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use rent_vs_buy::params::{self, defaults};
use rent_vs_buy::{simulate, IrrOutcome, ParameterSet, SimulationResult, TransactionCosts};

#[derive(Parser, Debug)]
#[command(
    name = "rent_vs_buy",
    about = "Project buying a property with a mortgage against renting and investing the difference"
)]
struct Cli {
    #[arg(long, env = "RVB_TOTAL_EQUITY", default_value_t = defaults::TOTAL_EQUITY, help = "Cash available at the start")]
    total_equity: f64,
    #[arg(long, env = "RVB_PURCHASE_PRICE", default_value_t = defaults::PURCHASE_PRICE)]
    purchase_price: f64,
    #[arg(long, env = "RVB_EQUITY_RATIO", default_value_t = defaults::EQUITY_RATIO, help = "Own-funds share of the price, e.g. 0.2")]
    equity_ratio: f64,
    #[arg(long, env = "RVB_ANNUAL_RATE", default_value_t = defaults::ANNUAL_RATE, help = "Mortgage interest rate p.a.")]
    annual_rate: f64,
    #[arg(long, env = "RVB_AMORTIZATION_RATE", default_value_t = defaults::AMORTIZATION_RATE, help = "Initial amortization rate p.a.")]
    amortization_rate: f64,
    #[arg(long, env = "RVB_TERM_YEARS", default_value_t = defaults::TERM_YEARS)]
    term_years: u32,
    #[arg(long, env = "RVB_MONTHLY_RENT", default_value_t = defaults::MONTHLY_RENT, help = "Cold rent per month")]
    monthly_rent: f64,
    #[arg(long, env = "RVB_APPRECIATION_RATE", default_value_t = defaults::APPRECIATION_RATE)]
    appreciation_rate: f64,
    #[arg(long, env = "RVB_RENT_GROWTH_RATE", default_value_t = defaults::RENT_GROWTH_RATE)]
    rent_growth_rate: f64,
    #[arg(
        long,
        env = "RVB_HOLDING_COST_RATIO",
        default_value_t = defaults::HOLDING_COST_RATIO,
        help = "Running costs p.a. as a share of property value"
    )]
    holding_cost_ratio: f64,
    #[arg(long, env = "RVB_INVESTMENT_RETURN", default_value_t = defaults::INVESTMENT_RETURN, help = "Market return p.a.")]
    investment_return: f64,

    #[arg(long, env = "RVB_BROKER_FEE", default_value_t = params::BROKER_FEE_RATE)]
    broker_fee: f64,
    #[arg(long, env = "RVB_NOTARY_FEE", default_value_t = params::NOTARY_FEE_RATE)]
    notary_fee: f64,
    #[arg(long, env = "RVB_TRANSFER_TAX", default_value_t = params::TRANSFER_TAX_RATE)]
    transfer_tax: f64,
    #[arg(long, env = "RVB_LAND_REGISTRY_FEE", default_value_t = params::LAND_REGISTRY_FEE_RATE)]
    land_registry_fee: f64,

    #[arg(long, default_value = "simulation_output.csv", help = "Monthly schedule output path")]
    schedule_csv: PathBuf,
    #[arg(long, help = "Print the full result as JSON instead of the summary")]
    json: bool,
}

impl Cli {
    fn parameter_set(&self) -> ParameterSet {
        ParameterSet {
            total_equity: self.total_equity,
            purchase_price: self.purchase_price,
            equity_ratio: self.equity_ratio,
            annual_rate: self.annual_rate,
            annual_amortization_rate: self.amortization_rate,
            term_years: self.term_years,
            monthly_rent: self.monthly_rent,
            appreciation_rate: self.appreciation_rate,
            rent_growth_rate: self.rent_growth_rate,
            annual_holding_cost_ratio: self.holding_cost_ratio,
            investment_return_rate: self.investment_return,
            transaction_costs: TransactionCosts {
                broker: self.broker_fee,
                notary: self.notary_fee,
                transfer_tax: self.transfer_tax,
                land_registry: self.land_registry_fee,
            },
        }
    }
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    let params = cli.parameter_set();
    let result = simulate(&params).context("simulation rejected its parameters")?;

    let file = File::create(&cli.schedule_csv)
        .with_context(|| format!("unable to create {}", cli.schedule_csv.display()))?;
    result
        .write_schedule_csv(file)
        .with_context(|| format!("unable to write {}", cli.schedule_csv.display()))?;

    if cli.json {
        println!("{}", serde_json::to_string_pretty(&result)?);
        return Ok(());
    }

    print_summary(&result);
    println!("\nMonthly schedule written to: {}", cli.schedule_csv.display());

    Ok(())
}

fn print_summary(result: &SimulationResult) {
    let params = &result.params;
    let s = &result.summary;
    let c = &s.comparison;

    println!("Rent vs. Buy v0.1.0");
    println!("===================\n");

    println!("Buy scenario ({} months):", s.month_count);
    println!("  Total starting equity:        {:>14.2}", params.total_equity);
    println!("  Equity used incl. costs:      {:>14.2}", s.equity_with_costs);
    println!("  Transaction costs:            {:>14.2}", s.transaction_cost_amount);
    println!("  Equity kept invested:         {:>14.2}", s.idle_equity);
    println!("  Monthly annuity:              {:>14.2}", s.monthly_annuity);
    println!("  Interest month 1 / last:      {:>14.2} / {:.2}", s.first_month_interest, s.last_month_interest);
    println!("  Principal month 1 / last:     {:>14.2} / {:.2}", s.first_month_principal, s.last_month_principal);
    println!("  Initial loan:                 {:>14.2}", s.loan_amount);
    println!("  Property value at end:        {:>14.2}", s.final_property_value);
    println!("  Remaining balance at end:     {:>14.2}", s.final_balance);
    println!("  Cost of ownership:            {:>14.2}", s.cumulative_ownership_cost);
    println!("  Wealth (property + invested): {:>14.2}", c.final_buy_wealth);
    match s.simple_annual_return {
        Some(r) => println!("  Simple equity return p.a.:    {:>13.2} %", r * 100.0),
        None => println!("  Simple equity return p.a.:    {:>14}", "n/a"),
    }
    match s.irr {
        IrrOutcome::Defined { monthly_rate, annualized_rate } => println!(
            "  Equity IRR p.a.:              {:>13.2} % ({:.4} % monthly)",
            annualized_rate * 100.0,
            monthly_rate * 100.0
        ),
        IrrOutcome::Undefined { reason } => println!("  Equity IRR p.a.:              undefined ({})", reason),
    }

    println!("\nRent scenario:");
    println!("  Rent first / last month:      {:>14.2} / {:.2}", s.first_rent, s.final_rent);
    println!("  Savings rate first / last:    {:>14.2} / {:.2}", s.first_gap, s.last_gap);
    if let Some((year, month)) = s.first_shortfall_year_month() {
        println!("  Rent exceeds annuity from:    year {}, month {}", year, month);
    }
    println!("  Uninvested extra rent:        {:>14.2}", s.cumulative_shortfall);
    println!("  Wealth after investing:       {:>14.2}", c.final_rent_wealth);

    println!("\nComparison:");
    println!("  Buy:                          {:>14.2}", c.final_buy_wealth);
    println!("  Rent + invest:                {:>14.2}", c.final_rent_wealth);
    println!(
        "  Difference:                   {:>14.2} ({:.2} %)",
        c.absolute_differential,
        c.relative_differential * 100.0
    );
    if c.buying_wins() {
        println!("  Buying ends ahead.");
    } else {
        println!("  Renting and investing ends ahead.");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_flag_defaults_match_default_parameter_set() {
        let cli = Cli::try_parse_from(["rent_vs_buy"]).unwrap();
        assert_eq!(cli.parameter_set(), ParameterSet::default());
    }

    #[test]
    fn test_flags_override_defaults() {
        let cli = Cli::try_parse_from([
            "rent_vs_buy",
            "--purchase-price",
            "800000",
            "--term-years",
            "25",
        ])
        .unwrap();
        let params = cli.parameter_set();

        assert_eq!(params.purchase_price, 800_000.0);
        assert_eq!(params.term_years, 25);
        assert_eq!(params.monthly_rent, defaults::MONTHLY_RENT);
    }
}
