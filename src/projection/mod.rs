//! Buy-vs-rent projection: amortization, value and rent tracks, savings plan,
//! buy-scenario cashflows, IRR and terminal comparison

mod state;
mod engine;
mod cashflows;
mod amortization;
mod tracks;
mod accumulator;
mod comparison;
pub mod irr;

pub use state::SimulationState;
pub use engine::{simulate, Simulator, SimulationConfig};
pub use cashflows::{CashflowAssembler, MonthlyRecord, SimulationResult, SimulationSummary};
pub use amortization::{AmortizationSchedule, AmortizationStep};
pub use tracks::{compounded, PropertyValueTrack, RentTrack};
pub use accumulator::{buy_scenario_equity, rent_scenario_wealth, CompensatedSum, GapPolicy, InvestmentAccumulator};
pub use comparison::{annualize_monthly_rate, relative_difference, simple_annual_return, Comparison};
pub use irr::{solve_irr, npv_at_rate, IrrConfig, IrrOutcome};
