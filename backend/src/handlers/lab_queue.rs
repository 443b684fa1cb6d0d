//! HTTP handlers for the lab processing queue

use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use shared::TransactionStatus;
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::cashier::TransactionItemRecord;
use crate::services::lab_queue::{AdvanceStatusInput, EnterResultsInput, QueueEntry};
use crate::services::LabQueueService;
use crate::AppState;

#[derive(Debug, Deserialize)]
pub struct QueueDateQuery {
    pub date: Option<NaiveDate>,
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub transaction_id: Uuid,
    pub status: TransactionStatus,
}

/// List the day's lab queue (defaults to today)
pub async fn list_queue(
    State(state): State<AppState>,
    Query(query): Query<QueueDateQuery>,
) -> AppResult<Json<Vec<QueueEntry>>> {
    let date = query.date.unwrap_or_else(|| chrono::Utc::now().date_naive());
    let service = LabQueueService::new(state.db);
    let queue = service.list_queue(date).await?;
    Ok(Json(queue))
}

/// Advance a transaction's processing status
pub async fn advance_status(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(input): Json<AdvanceStatusInput>,
) -> AppResult<Json<StatusResponse>> {
    let service = LabQueueService::new(state.db);
    let status = service.advance_status(transaction_id, input).await?;
    Ok(Json(StatusResponse {
        transaction_id,
        status,
    }))
}

/// Enter results for a transaction's line items
pub async fn enter_results(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
    Json(input): Json<EnterResultsInput>,
) -> AppResult<Json<Vec<TransactionItemRecord>>> {
    let service = LabQueueService::new(state.db);
    let items = service.enter_results(transaction_id, input).await?;
    Ok(Json(items))
}

/// Get a transaction's line items with any recorded results
pub async fn get_results(
    State(state): State<AppState>,
    Path(transaction_id): Path<Uuid>,
) -> AppResult<Json<Vec<TransactionItemRecord>>> {
    let service = LabQueueService::new(state.db);
    let items = service.get_results(transaction_id).await?;
    Ok(Json(items))
}
