//! Rent vs. Buy - monthly projection of buying a property with a mortgage
//! versus renting and investing the difference
//!
//! This library provides:
//! - Fixed-annuity amortization schedules
//! - Property value, rent and side-investment tracks for both scenarios
//! - The buy-scenario cashflow series and its internal rate of return
//! - Terminal wealth comparison
//! - Memoized and parallel batch runs over many parameter sets

pub mod error;
pub mod params;
pub mod projection;
pub mod scenario;

// Re-export commonly used types
pub use error::{IrrFailure, LoadError, SimulationError};
pub use params::{ParameterSet, DerivedConstants, TransactionCosts};
pub use projection::{simulate, Simulator, SimulationConfig, SimulationResult, MonthlyRecord, IrrOutcome};
pub use scenario::ScenarioRunner;
