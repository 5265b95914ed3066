//! Load batches of parameter sets from CSV
//!
//! Columns use the `ParameterSet` field names. The four transaction cost
//! columns (`broker_fee_rate`, `notary_fee_rate`, `transfer_tax_rate`,
//! `land_registry_fee_rate`) are optional and default to the standard rates.

use super::{ParameterSet, TransactionCosts};
use crate::error::LoadError;
use csv::Reader;
use std::fs::File;
use std::path::Path;

/// Default location of the sample scenario file
pub const DEFAULT_SCENARIOS_PATH: &str = "data/scenarios.csv";

/// Raw CSV row
#[derive(Debug, serde::Deserialize)]
struct CsvRow {
    total_equity: f64,
    purchase_price: f64,
    equity_ratio: f64,
    annual_rate: f64,
    annual_amortization_rate: f64,
    term_years: u32,
    monthly_rent: f64,
    appreciation_rate: f64,
    rent_growth_rate: f64,
    annual_holding_cost_ratio: f64,
    investment_return_rate: f64,
    #[serde(default)]
    broker_fee_rate: Option<f64>,
    #[serde(default)]
    notary_fee_rate: Option<f64>,
    #[serde(default)]
    transfer_tax_rate: Option<f64>,
    #[serde(default)]
    land_registry_fee_rate: Option<f64>,
}

impl CsvRow {
    fn to_params(self) -> ParameterSet {
        let standard = TransactionCosts::default();

        ParameterSet {
            total_equity: self.total_equity,
            purchase_price: self.purchase_price,
            equity_ratio: self.equity_ratio,
            annual_rate: self.annual_rate,
            annual_amortization_rate: self.annual_amortization_rate,
            term_years: self.term_years,
            monthly_rent: self.monthly_rent,
            appreciation_rate: self.appreciation_rate,
            rent_growth_rate: self.rent_growth_rate,
            annual_holding_cost_ratio: self.annual_holding_cost_ratio,
            investment_return_rate: self.investment_return_rate,
            transaction_costs: TransactionCosts {
                broker: self.broker_fee_rate.unwrap_or(standard.broker),
                notary: self.notary_fee_rate.unwrap_or(standard.notary),
                transfer_tax: self.transfer_tax_rate.unwrap_or(standard.transfer_tax),
                land_registry: self.land_registry_fee_rate.unwrap_or(standard.land_registry),
            },
        }
    }
}

/// Load and validate all parameter sets from a CSV file
pub fn load_parameter_sets<P: AsRef<Path>>(path: P) -> Result<Vec<ParameterSet>, LoadError> {
    let file = File::open(path)?;
    load_parameter_sets_from_reader(file)
}

/// Load parameter sets from any reader (e.g., string buffer, network stream)
pub fn load_parameter_sets_from_reader<R: std::io::Read>(reader: R) -> Result<Vec<ParameterSet>, LoadError> {
    let mut csv_reader = Reader::from_reader(reader);
    let mut sets = Vec::new();

    for (index, result) in csv_reader.deserialize().enumerate() {
        let row: CsvRow = result?;
        let params = row.to_params();
        params
            .validate()
            .map_err(|source| LoadError::InvalidRow { row: index + 1, source })?;
        sets.push(params);
    }

    Ok(sets)
}

/// Load parameter sets from the default scenario file
pub fn load_default_scenarios() -> Result<Vec<ParameterSet>, LoadError> {
    load_parameter_sets(DEFAULT_SCENARIOS_PATH)
}

#[cfg(test)]
mod tests {
    use super::*;

    const HEADER: &str = "total_equity,purchase_price,equity_ratio,annual_rate,annual_amortization_rate,term_years,monthly_rent,appreciation_rate,rent_growth_rate,annual_holding_cost_ratio,investment_return_rate";

    #[test]
    fn test_load_from_reader() {
        let data = format!(
            "{}\n500000,650000,0.2,0.0345,0.015,10,1896,0.025,0.03,0.005,0.075\n300000,400000,0.3,0.04,0.02,25,1200,0.02,0.02,0.01,0.06\n",
            HEADER
        );
        let sets = load_parameter_sets_from_reader(data.as_bytes()).expect("valid csv");

        assert_eq!(sets.len(), 2);
        assert_eq!(sets[0], ParameterSet::default());
        assert_eq!(sets[1].term_years, 25);
        assert_eq!(sets[1].transaction_costs, TransactionCosts::default());
    }

    #[test]
    fn test_optional_transaction_cost_columns() {
        let data = format!(
            "{},broker_fee_rate,notary_fee_rate,transfer_tax_rate,land_registry_fee_rate\n500000,650000,0.2,0.0345,0.015,10,1896,0.025,0.03,0.005,0.075,0,0.015,0.035,0.005\n",
            HEADER
        );
        let sets = load_parameter_sets_from_reader(data.as_bytes()).expect("valid csv");

        assert_eq!(sets[0].transaction_costs.broker, 0.0);
        assert!((sets[0].transaction_costs.total_rate() - 0.055).abs() < 1e-12);
    }

    #[test]
    fn test_invalid_row_reports_position() {
        let data = format!(
            "{}\n500000,650000,0.2,0.0345,0.015,10,1896,0.025,0.03,0.005,0.075\n500000,650000,0.2,0.0345,0.015,0,1896,0.025,0.03,0.005,0.075\n",
            HEADER
        );
        match load_parameter_sets_from_reader(data.as_bytes()) {
            Err(LoadError::InvalidRow { row, .. }) => assert_eq!(row, 2),
            other => panic!("expected row error, got {:?}", other),
        }
    }

    #[test]
    fn test_load_default_scenarios() {
        let sets = load_default_scenarios().expect("Failed to load scenarios");
        assert!(!sets.is_empty());
        assert_eq!(sets[0], ParameterSet::default());
    }
}
