//! HTTP handlers for cash reconciliation

use axum::{
    extract::{Path, Query, State},
    Json,
};
use uuid::Uuid;

use crate::error::AppResult;
use crate::services::reconciliation::{
    CreateReconciliationInput, ReconciliationListQuery, ReconciliationRecord,
};
use crate::services::ReconciliationService;
use crate::AppState;

/// Record an end-of-shift reconciliation
pub async fn create_reconciliation(
    State(state): State<AppState>,
    Json(input): Json<CreateReconciliationInput>,
) -> AppResult<Json<ReconciliationRecord>> {
    let service = ReconciliationService::new(state.db);
    let record = service.create(input).await?;
    Ok(Json(record))
}

/// Get a reconciliation by id
pub async fn get_reconciliation(
    State(state): State<AppState>,
    Path(reconciliation_id): Path<Uuid>,
) -> AppResult<Json<ReconciliationRecord>> {
    let service = ReconciliationService::new(state.db);
    let record = service.get(reconciliation_id).await?;
    Ok(Json(record))
}

/// List reconciliations
pub async fn list_reconciliations(
    State(state): State<AppState>,
    Query(query): Query<ReconciliationListQuery>,
) -> AppResult<Json<Vec<ReconciliationRecord>>> {
    let service = ReconciliationService::new(state.db);
    let records = service.list(&query).await?;
    Ok(Json(records))
}
