pub mod bonds;
pub mod loan;
pub mod simulation;
pub mod tax;
