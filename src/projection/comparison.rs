//! Terminal comparison of the buy and rent scenarios

use serde::{Deserialize, Serialize};

/// Terminal values of both scenarios
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Comparison {
    /// Last value of the buy equity track
    pub final_buy_wealth: f64,

    /// Last rent wealth track value minus the cumulative shortfall
    pub final_rent_wealth: f64,

    /// Buy minus rent
    pub absolute_differential: f64,

    /// Absolute differential over rent wealth; 0 when rent wealth is exactly 0
    pub relative_differential: f64,
}

impl Comparison {
    pub fn new(final_buy_wealth: f64, final_rent_wealth_gross: f64, cumulative_shortfall: f64) -> Self {
        let final_rent_wealth = final_rent_wealth_gross - cumulative_shortfall;
        let absolute_differential = final_buy_wealth - final_rent_wealth;

        Self {
            final_buy_wealth,
            final_rent_wealth,
            absolute_differential,
            relative_differential: relative_difference(absolute_differential, final_rent_wealth),
        }
    }

    /// True when buying ends with more wealth than renting
    pub fn buying_wins(&self) -> bool {
        self.absolute_differential > 0.0
    }
}

/// `difference / base`, or 0 when the base is exactly zero
pub fn relative_difference(difference: f64, base: f64) -> f64 {
    if base == 0.0 {
        0.0
    } else {
        difference / base
    }
}

/// Compound a monthly rate to an annual one
pub fn annualize_monthly_rate(monthly_rate: f64) -> f64 {
    (1.0 + monthly_rate).powi(12) - 1.0
}

/// Geometric average annual growth of `final_wealth` over `outlay`
pub fn simple_annual_return(final_wealth: f64, outlay: f64, years: u32) -> Option<f64> {
    if outlay <= 0.0 || final_wealth <= 0.0 || years == 0 {
        return None;
    }
    Some((final_wealth / outlay).powf(1.0 / years as f64) - 1.0)
}
