//! Simulation inputs, boundary validation and batch loading

mod data;
pub mod loader;

pub use data::{
    defaults, ParameterSet, ParameterKey, DerivedConstants, TransactionCosts, MAX_TERM_YEARS,
    BROKER_FEE_RATE, NOTARY_FEE_RATE, TRANSFER_TAX_RATE, LAND_REGISTRY_FEE_RATE,
};
pub use loader::{load_parameter_sets, load_parameter_sets_from_reader, load_default_scenarios};
