//! Path-dependent state carried from one simulated month to the next

use super::accumulator::{CompensatedSum, InvestmentAccumulator};
use super::amortization::AmortizationSchedule;
use crate::params::{DerivedConstants, ParameterSet};

/// State of a run at the end of `month`
#[derive(Debug, Clone)]
pub struct SimulationState {
    /// Current month (1-indexed, 0 before the first month)
    pub month: u32,

    /// Outstanding loan and fixed annuity
    pub schedule: AmortizationSchedule,

    /// Renter's savings plan and shortfall
    pub savings: InvestmentAccumulator,

    /// Transaction costs plus holding costs and interest paid so far
    pub ownership_cost: CompensatedSum,
}

impl SimulationState {
    /// Initialize state at origination
    pub fn new(params: &ParameterSet, derived: &DerivedConstants) -> Self {
        let mut ownership_cost = CompensatedSum::default();
        ownership_cost.add(derived.transaction_cost_amount);

        Self {
            month: 0,
            schedule: AmortizationSchedule::new(
                derived.loan_amount,
                params.annual_rate,
                derived.monthly_annuity,
            ),
            savings: InvestmentAccumulator::new(params.investment_return_rate),
            ownership_cost,
        }
    }

    /// Advance to next month
    pub fn advance_month(&mut self) {
        self.month += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_schedule_pays_the_derived_annuity_exactly() {
        // Awkward magnitudes where regrouping the annuity product changes the last bit
        let grid = [
            (1_234_567.0, 0.7, 0.0599, 0.037),
            (650_000.0, 0.20, 0.0345, 0.015),
            (987_654.3, 0.13, 0.0417, 0.029),
            (333_333.33, 0.55, 0.0711, 0.0),
            (2_500_001.0, 0.05, 0.0199, 0.061),
        ];

        for (price, equity_ratio, rate, amortization) in grid {
            let params = ParameterSet {
                total_equity: price,
                purchase_price: price,
                equity_ratio,
                annual_rate: rate,
                annual_amortization_rate: amortization,
                ..ParameterSet::default()
            };
            let derived = params.derived();
            let state = SimulationState::new(&params, &derived);

            assert_eq!(
                state.schedule.annuity().to_bits(),
                derived.monthly_annuity.to_bits(),
                "annuity mismatch for price {} ratio {}",
                price,
                equity_ratio
            );
        }
    }

    #[test]
    fn test_starts_before_first_month() {
        let params = ParameterSet::default();
        let derived = params.derived();
        let mut state = SimulationState::new(&params, &derived);

        assert_eq!(state.month, 0);
        assert_eq!(state.schedule.remaining_balance(), derived.loan_amount);
        state.advance_month();
        assert_eq!(state.month, 1);
    }
}
