//! Error types for parameter validation, IRR solving and batch loading

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors raised before or by a simulation run
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimulationError {
    /// Out-of-domain input, rejected before month 1 is simulated
    #[error("invalid parameter `{field}`: {reason}")]
    InvalidParameter { field: &'static str, reason: String },

    /// The assembled cashflow series admits no usable real root
    #[error("IRR undefined: {0}")]
    UndefinedIrr(#[from] IrrFailure),
}

impl SimulationError {
    pub(crate) fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        SimulationError::InvalidParameter {
            field,
            reason: reason.into(),
        }
    }
}

/// Why the IRR of a cashflow series could not be determined
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error, Serialize, Deserialize)]
pub enum IrrFailure {
    #[error("cashflow series is empty")]
    EmptySeries,

    #[error("every cashflow is zero")]
    AllZero,

    #[error("cashflows never change sign")]
    NoSignChange,

    #[error("no root bracketed between -99% and 1000% per period")]
    NoBracket,

    #[error("solver did not converge")]
    NoConvergence,
}

/// Errors raised while loading parameter sets from CSV
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to read parameter file: {0}")]
    Io(#[from] std::io::Error),

    #[error("malformed parameter CSV: {0}")]
    Csv(#[from] csv::Error),

    /// Row numbers are 1-based and count data rows only
    #[error("row {row}: {source}")]
    InvalidRow {
        row: usize,
        #[source]
        source: SimulationError,
    },
}
