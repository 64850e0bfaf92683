pub mod ledger;
pub mod types;

pub use ledger::EnergyLedger;
pub use types::EnergyState;
