//! Domain models for LabDesk

mod audit;
mod inventory;
mod lab_test;
mod patient;
mod reconciliation;
mod transaction;

pub use audit::*;
pub use inventory::*;
pub use lab_test::*;
pub use patient::*;
pub use reconciliation::*;
pub use transaction::*;
