//! Side investment account fed by the annuity/rent gap, plus the wealth tracks
//! of both scenarios
//!
//! The renter invests only a positive gap. A negative gap is cash the renter
//! has to find elsewhere: it is summed, never invested and never compounded.

use serde::{Deserialize, Serialize};

use super::tracks::compounded;

/// How a month's gap is treated
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum GapPolicy {
    /// Gap >= 0: the surplus is added and the account compounds
    Invest { surplus: f64 },
    /// Gap < 0: the deficit is recorded, the account is left untouched
    Shortfall { deficit: f64 },
}

impl GapPolicy {
    pub fn classify(gap: f64) -> Self {
        if gap >= 0.0 {
            GapPolicy::Invest { surplus: gap }
        } else {
            GapPolicy::Shortfall { deficit: -gap }
        }
    }
}

/// Kahan-compensated running sum
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct CompensatedSum {
    sum: f64,
    compensation: f64,
}

impl CompensatedSum {
    pub fn add(&mut self, value: f64) {
        let y = value - self.compensation;
        let t = self.sum + y;
        self.compensation = (t - self.sum) - y;
        self.sum = t;
    }

    pub fn value(&self) -> f64 {
        self.sum
    }
}

/// Renter's savings plan
#[derive(Debug, Clone)]
pub struct InvestmentAccumulator {
    monthly_return: f64,
    capital: f64,
    shortfall: CompensatedSum,
    first_shortfall_month: Option<u32>,
}

impl InvestmentAccumulator {
    pub fn new(investment_return_rate: f64) -> Self {
        Self {
            monthly_return: investment_return_rate / 12.0,
            capital: 0.0,
            shortfall: CompensatedSum::default(),
            first_shortfall_month: None,
        }
    }

    /// Apply one month's gap
    pub fn apply(&mut self, month: u32, gap: f64) -> GapPolicy {
        let policy = GapPolicy::classify(gap);

        match policy {
            GapPolicy::Invest { surplus } => {
                self.capital = (self.capital + surplus) * (1.0 + self.monthly_return);
            }
            GapPolicy::Shortfall { deficit } => {
                self.shortfall.add(deficit);
                if self.first_shortfall_month.is_none() {
                    log::info!("Rent exceeds the annuity from month {}", month);
                    self.first_shortfall_month = Some(month);
                }
            }
        }

        policy
    }

    /// Invested capital including returns
    pub fn capital(&self) -> f64 {
        self.capital
    }

    /// Sum of all uninvested deficits so far
    pub fn cumulative_shortfall(&self) -> f64 {
        self.shortfall.value()
    }

    pub fn first_shortfall_month(&self) -> Option<u32> {
        self.first_shortfall_month
    }
}

/// Renter's wealth: all starting equity kept invested, plus the savings plan
pub fn rent_scenario_wealth(total_equity: f64, monthly_return: f64, month: u32, savings_capital: f64) -> f64 {
    compounded(total_equity, monthly_return, month) + savings_capital
}

/// Buyer's wealth: equity in the property plus idle equity kept invested
pub fn buy_scenario_equity(
    property_value: f64,
    remaining_balance: f64,
    idle_equity: f64,
    monthly_return: f64,
    month: u32,
) -> f64 {
    (property_value - remaining_balance) + compounded(idle_equity, monthly_return, month)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_positive_gap_compounds() {
        let mut acc = InvestmentAccumulator::new(0.12);

        assert_eq!(acc.apply(1, 100.0), GapPolicy::Invest { surplus: 100.0 });
        assert_relative_eq!(acc.capital(), 101.0, epsilon = 1e-12);

        acc.apply(2, 100.0);
        assert_relative_eq!(acc.capital(), (101.0 + 100.0) * 1.01, epsilon = 1e-12);
        assert_eq!(acc.cumulative_shortfall(), 0.0);
        assert_eq!(acc.first_shortfall_month(), None);
    }

    #[test]
    fn test_zero_gap_still_compounds() {
        let mut acc = InvestmentAccumulator::new(0.12);
        acc.apply(1, 100.0);
        acc.apply(2, 0.0);
        assert_relative_eq!(acc.capital(), 101.0 * 1.01, epsilon = 1e-12);
    }

    #[test]
    fn test_negative_gap_is_not_compounded() {
        let mut acc = InvestmentAccumulator::new(0.12);
        acc.apply(1, 100.0);
        let capital = acc.capital();

        assert_eq!(acc.apply(2, -40.0), GapPolicy::Shortfall { deficit: 40.0 });
        assert_eq!(acc.capital(), capital);
        assert_relative_eq!(acc.cumulative_shortfall(), 40.0);

        acc.apply(3, -10.0);
        assert_eq!(acc.capital(), capital);
        assert_relative_eq!(acc.cumulative_shortfall(), 50.0);
    }

    #[test]
    fn test_first_shortfall_month_recorded_once() {
        let mut acc = InvestmentAccumulator::new(0.05);
        acc.apply(1, 10.0);
        acc.apply(2, -1.0);
        acc.apply(3, 5.0);
        acc.apply(4, -1.0);

        assert_eq!(acc.first_shortfall_month(), Some(2));
    }

    #[test]
    fn test_shortfall_is_non_decreasing() {
        let mut acc = InvestmentAccumulator::new(0.05);
        let mut previous = 0.0;
        for month in 1..=48 {
            let gap = if month % 3 == 0 { 25.0 } else { -(month as f64) };
            acc.apply(month, gap);
            assert!(acc.cumulative_shortfall() >= previous);
            previous = acc.cumulative_shortfall();
        }
    }

    #[test]
    fn test_compensated_sum_keeps_small_terms() {
        let mut sum = CompensatedSum::default();
        sum.add(1e16);
        for _ in 0..1000 {
            sum.add(1.0);
        }
        assert_eq!(sum.value(), 1e16 + 1000.0);
    }

    #[test]
    fn test_wealth_tracks() {
        assert_relative_eq!(rent_scenario_wealth(1000.0, 0.01, 2, 50.0), 1000.0 * 1.0201 + 50.0, epsilon = 1e-9);
        assert_relative_eq!(
            buy_scenario_equity(300_000.0, 200_000.0, 1000.0, 0.01, 1),
            100_000.0 + 1010.0,
            epsilon = 1e-9
        );
    }
}
