//! HTTP handlers for cashier transactions

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::cashier::{
    CreateTransactionInput, TransactionRecord, TransactionWithItems, VoidTransactionInput,
};
use crate::services::CashierService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct TransactionDateQuery {
    pub date: Option<NaiveDate>,
}

/// Create a cashier transaction
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(input): Json<CreateTransactionInput>,
) -> AppResult<Json<TransactionWithItems>> {
    let service = CashierService::new(state.db, state.config.billing.clone());
    let transaction = service.create_transaction(input).await?;
    Ok(Json(transaction))
}

/// Get a transaction with its line items
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<Json<TransactionWithItems>> {
    let service = CashierService::new(state.db, state.config.billing.clone());
    let transaction = service.get_transaction(transaction_id).await?;
    Ok(Json(transaction))
}

/// List transactions for a date (defaults to today)
pub async fn list_transactions(
    State(state): State<AppState>,
    Query(query): Query<TransactionDateQuery>,
) -> AppResult<Json<Vec<TransactionRecord>>> {
    let date = query.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let service = CashierService::new(state.db, state.config.billing.clone());
    let transactions = service.list_by_date(date).await?;
    Ok(Json(transactions))
}

/// Void a transaction
pub async fn void_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(input): Json<VoidTransactionInput>,
) -> AppResult<Json<TransactionRecord>> {
    let service = CashierService::new(state.db, state.config.billing.clone());
    let transaction = service.void_transaction(transaction_id, input).await?;
    Ok(Json(transaction))
}
