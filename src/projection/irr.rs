//! Internal Rate of Return (IRR) calculation
//!
//! The solver works on the native period of the series and returns a
//! periodic rate. Annualizing is left to the caller.

use serde::{Deserialize, Serialize};

use crate::error::IrrFailure;

/// Solver settings
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IrrConfig {
    /// Newton-Raphson seed (periodic rate)
    pub initial_guess: f64,
    /// Convergence threshold on the rate step
    pub rate_tolerance: f64,
    /// Accepted |NPV| relative to the sum of absolute cashflows
    pub npv_tolerance: f64,
    pub max_newton_iterations: u32,
    pub max_bisection_iterations: u32,
}

impl Default for IrrConfig {
    fn default() -> Self {
        Self {
            initial_guess: 0.05 / 12.0, // 5% annual / 12
            rate_tolerance: 1e-12,
            npv_tolerance: 1e-9,
            max_newton_iterations: 100,
            max_bisection_iterations: 200,
        }
    }
}

/// IRR as reported in a simulation result
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum IrrOutcome {
    Defined { monthly_rate: f64, annualized_rate: f64 },
    Undefined { reason: IrrFailure },
}

impl IrrOutcome {
    pub fn annualized(&self) -> Option<f64> {
        match self {
            IrrOutcome::Defined { annualized_rate, .. } => Some(*annualized_rate),
            IrrOutcome::Undefined { .. } => None,
        }
    }
}

const LOWER_BOUND: f64 = -0.99;
const UPPER_BOUND: f64 = 10.0;

/// Find the periodic rate zeroing the NPV of `cashflows`
///
/// The first cashflow is undiscounted; shifting every exponent by one gives
/// the same root. With several roots, the first one found is returned.
///
/// A rate from the bisection fallback is a bracketed sign change of the NPV,
/// not necessarily a point where |NPV| is within `npv_tolerance`.
pub fn solve_irr(cashflows: &[f64], config: &IrrConfig) -> Result<f64, IrrFailure> {
    if cashflows.is_empty() {
        return Err(IrrFailure::EmptySeries);
    }

    if cashflows.iter().all(|&cf| cf.abs() < 1e-10) {
        return Err(IrrFailure::AllZero);
    }

    // At least one sign change is required for a root to exist
    let has_positive = cashflows.iter().any(|&cf| cf > 1e-10);
    let has_negative = cashflows.iter().any(|&cf| cf < -1e-10);
    if !has_positive || !has_negative {
        return Err(IrrFailure::NoSignChange);
    }

    let scale: f64 = cashflows.iter().map(|cf| cf.abs()).sum();
    let npv_tolerance = config.npv_tolerance * scale;

    let mut rate = config.initial_guess;

    for _ in 0..config.max_newton_iterations {
        let (npv, dnpv) = npv_and_derivative(cashflows, rate);
        if !npv.is_finite() || !dnpv.is_finite() {
            break;
        }

        if dnpv.abs() < 1e-20 {
            // Derivative too small, try bisection instead
            return solve_irr_bisection(cashflows, config, npv_tolerance);
        }

        let new_rate = (rate - npv / dnpv).clamp(LOWER_BOUND, UPPER_BOUND);

        if (new_rate - rate).abs() < config.rate_tolerance {
            // A step that stalls on a bound is not a root
            if npv_at_rate(cashflows, new_rate).abs() <= npv_tolerance {
                return Ok(new_rate);
            }
            break;
        }

        rate = new_rate;
    }

    solve_irr_bisection(cashflows, config, npv_tolerance)
}

/// NPV and its derivative with respect to rate
fn npv_and_derivative(cashflows: &[f64], rate: f64) -> (f64, f64) {
    let mut npv = 0.0;
    let mut dnpv = 0.0;

    for (t, &cf) in cashflows.iter().enumerate() {
        let discount = (1.0 + rate).powi(t as i32);
        npv += cf / discount;
        if t > 0 {
            dnpv -= (t as f64) * cf / (discount * (1.0 + rate));
        }
    }

    (npv, dnpv)
}

/// Bisection on [`LOWER_BOUND`, `UPPER_BOUND`]
///
/// Stops either when |NPV| at the midpoint is within `npv_tolerance` or when
/// the bracket is narrower than `rate_tolerance`. In the second case the
/// midpoint is only guaranteed to sit on a sign change of the NPV; for a
/// steep NPV curve its residual can exceed `npv_tolerance`.
fn solve_irr_bisection(cashflows: &[f64], config: &IrrConfig, npv_tolerance: f64) -> Result<f64, IrrFailure> {
    let mut low = LOWER_BOUND;
    let mut high = UPPER_BOUND;
    let mut npv_low = npv_at_rate(cashflows, low);
    let npv_high = npv_at_rate(cashflows, high);

    // Long series overflow near -100%; pull the lower bound in until finite
    let mut retreats = 0;
    while !npv_low.is_finite() && retreats < 64 {
        low /= 2.0;
        npv_low = npv_at_rate(cashflows, low);
        retreats += 1;
    }

    if !npv_low.is_finite() || npv_low * npv_high > 0.0 {
        return Err(IrrFailure::NoBracket);
    }

    for _ in 0..config.max_bisection_iterations {
        let mid = (low + high) / 2.0;
        let npv_mid = npv_at_rate(cashflows, mid);

        if npv_mid.abs() <= npv_tolerance {
            return Ok(mid);
        }

        if (high - low) / 2.0 < config.rate_tolerance {
            log::debug!(
                "IRR bracket collapsed at {:.3e} with residual NPV {:.3e} (tolerance {:.3e})",
                mid,
                npv_mid,
                npv_tolerance
            );
            return Ok(mid);
        }

        if npv_mid * npv_low < 0.0 {
            high = mid;
        } else {
            low = mid;
            npv_low = npv_mid;
        }
    }

    Err(IrrFailure::NoConvergence)
}

/// NPV at a periodic rate, first cashflow undiscounted
pub fn npv_at_rate(cashflows: &[f64], rate: f64) -> f64 {
    cashflows
        .iter()
        .enumerate()
        .map(|(t, &cf)| cf / (1.0 + rate).powi(t as i32))
        .sum()
}
