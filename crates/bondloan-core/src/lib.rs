pub mod bonds;
pub mod error;
pub mod loan;
pub mod simulator;
pub mod tax;
pub mod time_value;
pub mod types;

#[cfg(feature = "sensitivity")]
pub mod sensitivity;

pub use error::SimulatorError;
pub use simulator::{run_simulation, simulate, SimulationInput, SimulationResult};
pub use tax::{InvestorKind, InvestorProfile};
pub use types::*;

/// Standard result type for all simulator operations
pub type SimulatorResult<T> = Result<T, SimulatorError>;
