//! HTTP handlers for LabDesk endpoints

pub mod audit;
pub mod cashier;
pub mod health;
pub mod inventory;
pub mod lab_queue;
pub mod patient;
pub mod reconciliation;
pub mod reporting;

pub use audit::*;
pub use cashier::*;
pub use health::*;
pub use inventory::*;
pub use lab_queue::*;
pub use lab_test::*;
pub use patient::*;
pub use reconciliation::*;
pub use reporting::*;
