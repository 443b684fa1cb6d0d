//! Business logic services for LabDesk

pub mod audit;
pub mod cashier;
pub mod inventory;
pub mod lab_queue;
pub mod lab_test;
pub mod patient;
pub mod reconciliation;
pub mod reporting;

pub use audit::AuditService;
pub use cashier::CashierService;
pub use inventory::InventoryService;
pub use lab_queue::LabQueueService;
pub use lab_test::LabTestService;
pub use patient::PatientService;
pub use reconciliation::ReconciliationService;
pub use reporting::ReportingService;
