//! Parameter set for a buy-vs-rent projection and the constants derived from it

use serde::{Deserialize, Serialize};

use crate::error::SimulationError;

/// Broker commission as a share of the purchase price
pub const BROKER_FEE_RATE: f64 = 0.0357;
/// Notary fees as a share of the purchase price
pub const NOTARY_FEE_RATE: f64 = 0.015;
/// Real-estate transfer tax as a share of the purchase price
pub const TRANSFER_TAX_RATE: f64 = 0.05;
/// Land registry fees as a share of the purchase price
pub const LAND_REGISTRY_FEE_RATE: f64 = 0.005;

/// Longest supported loan term
pub const MAX_TERM_YEARS: u32 = 100;

/// Reference scenario used by `ParameterSet::default` and the CLI
pub mod defaults {
    pub const TOTAL_EQUITY: f64 = 500_000.0;
    pub const PURCHASE_PRICE: f64 = 650_000.0;
    pub const EQUITY_RATIO: f64 = 0.20;
    pub const ANNUAL_RATE: f64 = 0.0345;
    pub const AMORTIZATION_RATE: f64 = 0.015;
    pub const TERM_YEARS: u32 = 10;
    /// Cold rent at a 3.5% gross yield on the purchase price, rounded
    pub const MONTHLY_RENT: f64 = 1896.0;
    pub const APPRECIATION_RATE: f64 = 0.025;
    pub const RENT_GROWTH_RATE: f64 = 0.03;
    pub const HOLDING_COST_RATIO: f64 = 0.005;
    pub const INVESTMENT_RETURN: f64 = 0.075;
}

/// One-time surcharges paid on purchase, each a share of the purchase price
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TransactionCosts {
    pub broker: f64,
    pub notary: f64,
    pub transfer_tax: f64,
    pub land_registry: f64,
}

impl TransactionCosts {
    /// Combined transaction cost ratio
    pub fn total_rate(&self) -> f64 {
        self.broker + self.notary + self.transfer_tax + self.land_registry
    }
}

impl Default for TransactionCosts {
    fn default() -> Self {
        Self {
            broker: BROKER_FEE_RATE,
            notary: NOTARY_FEE_RATE,
            transfer_tax: TRANSFER_TAX_RATE,
            land_registry: LAND_REGISTRY_FEE_RATE,
        }
    }
}

/// Inputs of a single simulation run
///
/// All rates are annual decimals (0.035 for 3.5%). Monetary values are in a
/// single nominal currency.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ParameterSet {
    /// Cash available at the start, whether buying or renting
    pub total_equity: f64,

    /// Purchase price of the property
    pub purchase_price: f64,

    /// Share of the purchase price paid from own funds
    pub equity_ratio: f64,

    /// Nominal mortgage interest rate
    pub annual_rate: f64,

    /// Initial amortization rate; fixes the annuity together with `annual_rate`
    pub annual_amortization_rate: f64,

    /// Loan term and simulation horizon
    pub term_years: u32,

    /// Cold rent in month 0
    pub monthly_rent: f64,

    /// Property appreciation
    pub appreciation_rate: f64,

    /// Rent growth
    pub rent_growth_rate: f64,

    /// Running ownership costs as a share of the current property value
    pub annual_holding_cost_ratio: f64,

    /// Return earned by any capital kept in the market
    pub investment_return_rate: f64,

    /// Purchase surcharges
    #[serde(default)]
    pub transaction_costs: TransactionCosts,
}

impl Default for ParameterSet {
    fn default() -> Self {
        Self {
            total_equity: defaults::TOTAL_EQUITY,
            purchase_price: defaults::PURCHASE_PRICE,
            equity_ratio: defaults::EQUITY_RATIO,
            annual_rate: defaults::ANNUAL_RATE,
            annual_amortization_rate: defaults::AMORTIZATION_RATE,
            term_years: defaults::TERM_YEARS,
            monthly_rent: defaults::MONTHLY_RENT,
            appreciation_rate: defaults::APPRECIATION_RATE,
            rent_growth_rate: defaults::RENT_GROWTH_RATE,
            annual_holding_cost_ratio: defaults::HOLDING_COST_RATIO,
            investment_return_rate: defaults::INVESTMENT_RETURN,
            transaction_costs: TransactionCosts::default(),
        }
    }
}

impl ParameterSet {
    /// Number of simulated months
    pub fn month_count(&self) -> u32 {
        self.term_years * 12
    }

    /// Reject out-of-domain inputs before anything is simulated
    pub fn validate(&self) -> Result<(), SimulationError> {
        if self.term_years == 0 || self.term_years > MAX_TERM_YEARS {
            return Err(SimulationError::invalid(
                "term_years",
                format!("must be between 1 and {}, got {}", MAX_TERM_YEARS, self.term_years),
            ));
        }

        if !self.equity_ratio.is_finite() || !(0.0..=1.0).contains(&self.equity_ratio) {
            return Err(SimulationError::invalid(
                "equity_ratio",
                format!("must lie within [0, 1], got {}", self.equity_ratio),
            ));
        }

        if !self.purchase_price.is_finite() || self.purchase_price <= 0.0 {
            return Err(SimulationError::invalid(
                "purchase_price",
                format!("must be positive, got {}", self.purchase_price),
            ));
        }
        check_amount("total_equity", self.total_equity)?;
        check_amount("monthly_rent", self.monthly_rent)?;

        check_cost_rate("annual_rate", self.annual_rate)?;
        check_cost_rate("annual_amortization_rate", self.annual_amortization_rate)?;
        check_cost_rate("annual_holding_cost_ratio", self.annual_holding_cost_ratio)?;

        check_growth_rate("appreciation_rate", self.appreciation_rate)?;
        check_growth_rate("rent_growth_rate", self.rent_growth_rate)?;
        check_growth_rate("investment_return_rate", self.investment_return_rate)?;

        let costs = &self.transaction_costs;
        check_cost_rate("transaction_costs.broker", costs.broker)?;
        check_cost_rate("transaction_costs.notary", costs.notary)?;
        check_cost_rate("transaction_costs.transfer_tax", costs.transfer_tax)?;
        check_cost_rate("transaction_costs.land_registry", costs.land_registry)?;

        Ok(())
    }

    /// Constants fixed for the whole run
    pub fn derived(&self) -> DerivedConstants {
        let transaction_cost_ratio = self.transaction_costs.total_rate();
        let loan_amount = (1.0 - self.equity_ratio) * self.purchase_price;
        let transaction_cost_amount = self.purchase_price * transaction_cost_ratio;
        let equity_with_costs = self.equity_ratio * self.purchase_price + transaction_cost_amount;

        DerivedConstants {
            month_count: self.month_count(),
            transaction_cost_ratio,
            transaction_cost_amount,
            loan_amount,
            equity_with_costs,
            idle_equity: (self.total_equity - equity_with_costs).max(0.0),
            monthly_annuity: (self.annual_rate + self.annual_amortization_rate)
                * (1.0 - self.equity_ratio)
                * self.purchase_price
                / 12.0,
        }
    }

    /// Hashable identity of every input, used for memoization
    pub fn cache_key(&self) -> ParameterKey {
        let costs = &self.transaction_costs;
        ParameterKey {
            term_years: self.term_years,
            bits: [
                self.total_equity.to_bits(),
                self.purchase_price.to_bits(),
                self.equity_ratio.to_bits(),
                self.annual_rate.to_bits(),
                self.annual_amortization_rate.to_bits(),
                self.monthly_rent.to_bits(),
                self.appreciation_rate.to_bits(),
                self.rent_growth_rate.to_bits(),
                self.annual_holding_cost_ratio.to_bits(),
                self.investment_return_rate.to_bits(),
                costs.broker.to_bits(),
                costs.notary.to_bits(),
                costs.transfer_tax.to_bits(),
                costs.land_registry.to_bits(),
            ],
        }
    }
}

fn check_amount(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimulationError::invalid(
            field,
            format!("must be a non-negative amount, got {}", value),
        ));
    }
    Ok(())
}

fn check_cost_rate(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() || value < 0.0 {
        return Err(SimulationError::invalid(
            field,
            format!("must be a non-negative decimal rate, got {}", value),
        ));
    }
    if value > 1.0 {
        return Err(SimulationError::invalid(
            field,
            format!("expected a decimal rate (e.g. 0.035), {} looks like a percentage", value),
        ));
    }
    Ok(())
}

fn check_growth_rate(field: &'static str, value: f64) -> Result<(), SimulationError> {
    if !value.is_finite() || value <= -1.0 {
        return Err(SimulationError::invalid(
            field,
            format!("must be a decimal rate above -1, got {}", value),
        ));
    }
    if value > 1.0 {
        return Err(SimulationError::invalid(
            field,
            format!("expected a decimal rate (e.g. 0.025), {} looks like a percentage", value),
        ));
    }
    Ok(())
}

/// Constants derived once from a [`ParameterSet`]
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DerivedConstants {
    pub month_count: u32,

    /// Sum of the four surcharge rates
    pub transaction_cost_ratio: f64,
    pub transaction_cost_amount: f64,

    pub loan_amount: f64,

    /// Own-cash outlay at purchase: equity share plus surcharges
    pub equity_with_costs: f64,

    /// Capital not consumed by the purchase, floored at zero
    pub idle_equity: f64,

    /// Fixed monthly mortgage payment
    pub monthly_annuity: f64,
}

/// Bit-exact identity of a [`ParameterSet`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterKey {
    term_years: u32,
    bits: [u64; 14],
}
