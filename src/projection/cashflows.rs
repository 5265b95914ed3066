//! Monthly output records, the buy-scenario cashflow series and the
//! complete simulation result

use serde::{Deserialize, Serialize};

use super::comparison::Comparison;
use super::irr::IrrOutcome;
use crate::error::SimulationError;
use crate::params::{DerivedConstants, ParameterSet};

/// One simulated month
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRecord {
    /// 1-indexed
    pub month_index: u32,

    // Mortgage
    pub interest: f64,
    pub principal_paid: f64,
    pub overpayment: f64,
    pub remaining_balance: f64,

    // Property
    pub property_value: f64,
    pub holding_cost: f64,

    // Rent and savings plan
    pub rent: f64,
    pub gap: f64,
    pub invested_capital_running_total: f64,
    pub cumulative_shortfall: f64,

    // Buy scenario
    pub buy_cashflow: f64,

    // Wealth tracks
    pub buy_equity: f64,
    pub rent_wealth: f64,
}

/// Builds the signed monthly cashflow series of the buy scenario
///
/// Rent is an avoided cost credited to the buyer, interest and holding costs
/// are charged. Month 1 carries the upfront equity-with-costs outlay, the
/// final month the property equity realized on exit.
#[derive(Debug, Clone)]
pub struct CashflowAssembler {
    month_count: u32,
    upfront_outlay: f64,
    series: Vec<f64>,
}

impl CashflowAssembler {
    pub fn new(month_count: u32, upfront_outlay: f64) -> Self {
        Self {
            month_count,
            upfront_outlay,
            series: Vec::with_capacity(month_count as usize),
        }
    }

    /// Append the cashflow for `month`; `terminal_equity` is only used in the
    /// final month
    pub fn assemble(&mut self, month: u32, holding_cost: f64, rent: f64, interest: f64, terminal_equity: f64) -> f64 {
        let mut cashflow = -holding_cost + (rent - interest);

        if month == 1 {
            cashflow -= self.upfront_outlay;
        }
        if month == self.month_count {
            cashflow += terminal_equity;
        }

        self.series.push(cashflow);
        cashflow
    }

    pub fn series(&self) -> &[f64] {
        &self.series
    }
}

/// Scalar results of a run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationSummary {
    pub month_count: u32,

    // Buy scenario
    pub monthly_annuity: f64,
    pub loan_amount: f64,
    pub equity_with_costs: f64,
    pub idle_equity: f64,
    pub transaction_cost_amount: f64,
    pub first_month_interest: f64,
    pub last_month_interest: f64,
    pub first_month_principal: f64,
    pub last_month_principal: f64,
    pub final_property_value: f64,
    pub final_balance: f64,
    /// Property value minus remaining balance at exit
    pub terminal_property_equity: f64,
    /// Transaction costs plus all holding costs and interest
    pub cumulative_ownership_cost: f64,
    /// `(final buy wealth / equity with costs)^(1/years) - 1`; None when
    /// final buy wealth is not positive
    pub simple_annual_return: Option<f64>,
    pub irr: IrrOutcome,

    // Rent scenario
    pub first_rent: f64,
    pub final_rent: f64,
    pub first_gap: f64,
    pub last_gap: f64,
    pub cumulative_shortfall: f64,
    pub first_shortfall_month: Option<u32>,

    pub comparison: Comparison,
}

impl SimulationSummary {
    /// First negative-gap month as 1-based (year, month in year)
    pub fn first_shortfall_year_month(&self) -> Option<(u32, u32)> {
        self.first_shortfall_month
            .map(|month| ((month - 1) / 12 + 1, (month - 1) % 12 + 1))
    }
}

/// Complete, immutable result of one simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationResult {
    pub params: ParameterSet,
    pub derived: DerivedConstants,
    pub records: Vec<MonthlyRecord>,
    pub summary: SimulationSummary,
}

impl SimulationResult {
    /// Buy-scenario cashflow series as fed to the IRR solver
    pub fn cashflow_series(&self) -> Vec<f64> {
        self.records.iter().map(|r| r.buy_cashflow).collect()
    }

    /// Annualized IRR, or an error naming why it is undefined
    pub fn require_irr(&self) -> Result<f64, SimulationError> {
        match self.summary.irr {
            IrrOutcome::Defined { annualized_rate, .. } => Ok(annualized_rate),
            IrrOutcome::Undefined { reason } => Err(SimulationError::UndefinedIrr(reason)),
        }
    }

    /// Write the monthly schedule as CSV
    pub fn write_schedule_csv<W: std::io::Write>(&self, writer: W) -> Result<(), csv::Error> {
        let mut csv_writer = csv::Writer::from_writer(writer);
        for record in &self.records {
            csv_writer.serialize(record)?;
        }
        csv_writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_month_carries_outlay() {
        let mut assembler = CashflowAssembler::new(12, 10_000.0);
        let cf = assembler.assemble(1, 50.0, 1000.0, 400.0, 0.0);
        assert_eq!(cf, -50.0 + 600.0 - 10_000.0);

        let cf = assembler.assemble(2, 50.0, 1000.0, 400.0, 99_999.0);
        assert_eq!(cf, 550.0);
    }

    #[test]
    fn test_last_month_realizes_equity() {
        let mut assembler = CashflowAssembler::new(3, 10_000.0);
        assembler.assemble(1, 0.0, 0.0, 0.0, 0.0);
        assembler.assemble(2, 0.0, 0.0, 0.0, 0.0);
        let cf = assembler.assemble(3, 10.0, 100.0, 20.0, 50_000.0);

        assert_eq!(cf, 50_070.0);
        assert_eq!(assembler.series(), &[-10_000.0, 0.0, 50_070.0]);
    }

    #[test]
    fn test_single_month_term_applies_both_adjustments() {
        let mut assembler = CashflowAssembler::new(1, 10_000.0);
        let cf = assembler.assemble(1, 0.0, 0.0, 0.0, 12_000.0);
        assert_eq!(cf, 2_000.0);
    }
}
