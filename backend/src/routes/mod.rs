//! API route definitions

use axum::{
    routing::{get, post, put},
    Router,
};

use crate::handlers;
use crate::AppState;

/// All /api/v1 routes
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/patients", patient_routes())
        .nest("/tests", lab_test_routes())
        .nest("/cashier", cashier_routes())
        .nest("/lab", lab_queue_routes())
        .nest("/inventory", inventory_routes())
        .nest("/reconciliations", reconciliation_routes())
        .nest("/reports", report_routes())
        .nest("/audit", audit_routes())
}

fn patient_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_patients).post(handlers::register_patient),
        )
        .route(
            "/:id",
            get(handlers::get_patient)
                .put(handlers::update_patient)
                .delete(handlers::delete_patient),
        )
        .route("/:id/transactions", get(handlers::get_patient_transactions))
}

fn lab_test_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_lab_tests).post(handlers::create_lab_test),
        )
        .route(
            "/:id",
            get(handlers::get_lab_test).put(handlers::update_lab_test),
        )
        .route("/:id/deactivate", post(handlers::deactivate_lab_test))
        .route("/:id/reactivate", post(handlers::reactivate_lab_test))
}

fn cashier_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/transactions",
            get(handlers::list_transactions).post(handlers::create_transaction),
        )
        .route("/transactions/:id", get(handlers::get_transaction))
        .route("/transactions/:id/void", post(handlers::void_transaction))
}

fn lab_queue_routes() -> Router<AppState> {
    Router::new()
        .route("/queue", get(handlers::list_queue))
        .route("/transactions/:id/status", put(handlers::advance_status))
        .route(
            "/transactions/:id/results",
            get(handlers::get_results).post(handlers::enter_results),
        )
}

fn inventory_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/items",
            get(handlers::list_inventory_items).post(handlers::create_inventory_item),
        )
        .route(
            "/items/:id",
            get(handlers::get_inventory_item).put(handlers::update_inventory_item),
        )
        .route(
            "/items/:id/transactions",
            get(handlers::list_stock_transactions),
        )
        .route("/transactions", post(handlers::record_stock_transaction))
        .route("/low-stock", get(handlers::list_low_stock))
}

fn reconciliation_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/",
            get(handlers::list_reconciliations).post(handlers::create_reconciliation),
        )
        .route("/:id", get(handlers::get_reconciliation))
}

fn report_routes() -> Router<AppState> {
    Router::new()
        .route("/daily-sales", get(handlers::daily_sales_report))
        .route("/revenue-by-test", get(handlers::revenue_by_test_report))
        .route("/dashboard", get(handlers::dashboard_metrics))
        .route(
            "/transactions/export",
            get(handlers::export_transactions_csv),
        )
}

fn audit_routes() -> Router<AppState> {
    Router::new().route("/", get(handlers::list_audit_logs))
}
