//! Core simulation engine for monthly buy-vs-rent projections

use serde::{Deserialize, Serialize};

use super::accumulator::{buy_scenario_equity, rent_scenario_wealth};
use super::cashflows::{CashflowAssembler, MonthlyRecord, SimulationResult, SimulationSummary};
use super::comparison::{annualize_monthly_rate, simple_annual_return, Comparison};
use super::irr::{solve_irr, IrrConfig, IrrOutcome};
use super::state::SimulationState;
use super::tracks::{PropertyValueTrack, RentTrack};
use crate::error::SimulationError;
use crate::params::{DerivedConstants, ParameterSet};

/// Configuration for a simulation run
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SimulationConfig {
    /// IRR solver settings
    pub irr: IrrConfig,
}

/// Main simulation engine
///
/// Holds a validated parameter set; each [`Simulator::run`] starts from fresh
/// state, so repeated runs return identical results.
#[derive(Debug, Clone)]
pub struct Simulator {
    params: ParameterSet,
    derived: DerivedConstants,
    config: SimulationConfig,
    property: PropertyValueTrack,
    rent: RentTrack,
}

impl Simulator {
    /// Validate `params` and prepare the fixed tracks
    pub fn new(params: ParameterSet, config: SimulationConfig) -> Result<Self, SimulationError> {
        params.validate()?;
        let derived = params.derived();

        log::debug!(
            "Simulating {} months: loan {:.2}, annuity {:.2}, equity with costs {:.2}, idle equity {:.2}",
            derived.month_count,
            derived.loan_amount,
            derived.monthly_annuity,
            derived.equity_with_costs,
            derived.idle_equity,
        );

        Ok(Self {
            property: PropertyValueTrack::new(
                params.purchase_price,
                params.appreciation_rate,
                params.annual_holding_cost_ratio,
            ),
            rent: RentTrack::new(params.monthly_rent, params.rent_growth_rate, derived.monthly_annuity),
            params,
            derived,
            config,
        })
    }

    /// Run the full projection
    pub fn run(&self) -> SimulationResult {
        let month_count = self.derived.month_count;
        let mut state = SimulationState::new(&self.params, &self.derived);
        let mut assembler = CashflowAssembler::new(month_count, self.derived.equity_with_costs);
        let mut records = Vec::with_capacity(month_count as usize);

        for _month in 1..=month_count {
            state.advance_month();

            let record = self.calculate_month(&mut state, &mut assembler);
            records.push(record);
        }

        let summary = self.summarize(&state, &records, assembler.series());

        SimulationResult {
            params: self.params,
            derived: self.derived,
            records,
            summary,
        }
    }

    /// Calculate all tracks for a single month
    fn calculate_month(&self, state: &mut SimulationState, assembler: &mut CashflowAssembler) -> MonthlyRecord {
        let month = state.month;
        let monthly_return = self.params.investment_return_rate / 12.0;

        // Mortgage
        let step = state.schedule.step();

        // Property
        let property_value = self.property.value_at(month);
        let holding_cost = self.property.holding_cost_at(month);
        state.ownership_cost.add(holding_cost);
        state.ownership_cost.add(step.interest);

        // Rent and savings plan
        let rent = self.rent.rent_at(month);
        let gap = self.rent.gap_at(month);
        state.savings.apply(month, gap);

        // Buy scenario cashflow for the IRR
        let terminal_equity = property_value - step.remaining_balance;
        let buy_cashflow = assembler.assemble(month, holding_cost, rent, step.interest, terminal_equity);

        MonthlyRecord {
            month_index: month,
            interest: step.interest,
            principal_paid: step.principal_paid,
            overpayment: step.overpayment,
            remaining_balance: step.remaining_balance,
            property_value,
            holding_cost,
            rent,
            gap,
            invested_capital_running_total: state.savings.capital(),
            cumulative_shortfall: state.savings.cumulative_shortfall(),
            buy_cashflow,
            buy_equity: buy_scenario_equity(
                property_value,
                step.remaining_balance,
                self.derived.idle_equity,
                monthly_return,
                month,
            ),
            rent_wealth: rent_scenario_wealth(
                self.params.total_equity,
                monthly_return,
                month,
                state.savings.capital(),
            ),
        }
    }

    /// Derive the scalar results once the monthly sequence is complete
    fn summarize(&self, state: &SimulationState, records: &[MonthlyRecord], cashflows: &[f64]) -> SimulationSummary {
        // month_count >= 12 after validation
        let first = &records[0];
        let last = &records[records.len() - 1];

        let irr = match solve_irr(cashflows, &self.config.irr) {
            Ok(monthly_rate) => IrrOutcome::Defined {
                monthly_rate,
                annualized_rate: annualize_monthly_rate(monthly_rate),
            },
            Err(reason) => {
                log::warn!("IRR undefined for buy scenario: {}", reason);
                IrrOutcome::Undefined { reason }
            }
        };

        let comparison = Comparison::new(last.buy_equity, last.rent_wealth, state.savings.cumulative_shortfall());

        SimulationSummary {
            month_count: self.derived.month_count,
            monthly_annuity: self.derived.monthly_annuity,
            loan_amount: self.derived.loan_amount,
            equity_with_costs: self.derived.equity_with_costs,
            idle_equity: self.derived.idle_equity,
            transaction_cost_amount: self.derived.transaction_cost_amount,
            first_month_interest: first.interest,
            last_month_interest: last.interest,
            first_month_principal: first.principal_paid,
            last_month_principal: last.principal_paid,
            final_property_value: last.property_value,
            final_balance: last.remaining_balance,
            terminal_property_equity: last.property_value - last.remaining_balance,
            cumulative_ownership_cost: state.ownership_cost.value(),
            simple_annual_return: simple_annual_return(
                comparison.final_buy_wealth,
                self.derived.equity_with_costs,
                self.params.term_years,
            ),
            irr,
            first_rent: first.rent,
            final_rent: last.rent,
            first_gap: first.gap,
            last_gap: last.gap,
            cumulative_shortfall: state.savings.cumulative_shortfall(),
            first_shortfall_month: state.savings.first_shortfall_month(),
            comparison,
        }
    }
}

/// Validate `params` and run a projection with the default configuration
pub fn simulate(params: &ParameterSet) -> Result<SimulationResult, SimulationError> {
    Ok(Simulator::new(*params, SimulationConfig::default())?.run())
}
