//! HTTP handlers for the audit trail

use axum::{
    extract::{Query, State},
    Json,
};
use shared::PaginatedResponse;

use crate::error::AppResult;
use crate::services::audit::{AuditLogFilter, AuditLogRecord};
use crate::services::AuditService;
use crate::AppState;

/// List audit entries, newest first
pub async fn list_audit_logs(
    State(state): State<AppState>,
    Query(filter): Query<AuditLogFilter>,
) -> AppResult<Json<PaginatedResponse<AuditLogRecord>>> {
    let service = AuditService::new(state.db);
    let logs = service.list(&filter).await?;
    Ok(Json(logs))
}
