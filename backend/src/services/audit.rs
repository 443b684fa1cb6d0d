//! Audit trail service
//!
//! Mutating operations in the cashier, inventory, and reconciliation
//! services record entries here.

use chrono::{DateTime, NaiveDate, Utc};
use serde::Deserialize;
use shared::{AuditAction, PaginatedResponse, PaginationMeta};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::AppResult;

/// Audit service for recording and querying the change trail
#[derive(Clone)]
pub struct AuditService {
    db: PgPool,
}

/// Stored audit entry
#[derive(Debug, Clone, serde::Serialize, FromRow)]
pub struct AuditLogRecord {
    pub id: Uuid,
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action: String,
    pub performed_by: String,
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Filters for listing audit entries
#[derive(Debug, Deserialize)]
pub struct AuditLogFilter {
    pub entity_type: Option<String>,
    pub action: Option<String>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

impl AuditService {
    /// Create a new AuditService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an audit entry
    pub async fn record(
        &self,
        entity_type: &str,
        entity_id: Uuid,
        action: AuditAction,
        performed_by: &str,
        details: serde_json::Value,
    ) -> AppResult<()> {
        Self::record_with(&self.db, entity_type, entity_id, action, performed_by, details).await
    }

    /// Record an audit entry on a caller-supplied executor, so the entry
    /// commits or rolls back together with the change it describes
    pub async fn record_with<'e, E>(
        executor: E,
        entity_type: &str,
        entity_id: Uuid,
        action: AuditAction,
        performed_by: &str,
        details: serde_json::Value,
    ) -> AppResult<()>
    where
        E: sqlx::PgExecutor<'e>,
    {
        sqlx::query(
            r#"
            INSERT INTO audit_logs (entity_type, entity_id, action, performed_by, details)
            VALUES ($1, $2, $3, $4, $5)
            "#,
        )
        .bind(entity_type)
        .bind(entity_id)
        .bind(action.as_str())
        .bind(performed_by)
        .bind(&details)
        .execute(executor)
        .await?;

        Ok(())
    }

    /// List audit entries, newest first
    pub async fn list(
        &self,
        filter: &AuditLogFilter,
    ) -> AppResult<PaginatedResponse<AuditLogRecord>> {
        let page = filter.page.unwrap_or(1).max(1);
        let per_page = filter.per_page.unwrap_or(50).clamp(1, 200);
        let offset = (page as i64 - 1) * per_page as i64;

        let total: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM audit_logs
            WHERE ($1::text IS NULL OR entity_type = $1)
              AND ($2::text IS NULL OR action = $2)
              AND ($3::date IS NULL OR created_at::date >= $3)
              AND ($4::date IS NULL OR created_at::date <= $4)
            "#,
        )
        .bind(&filter.entity_type)
        .bind(&filter.action)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .fetch_one(&self.db)
        .await?;

        let entries = sqlx::query_as::<_, AuditLogRecord>(
            r#"
            SELECT id, entity_type, entity_id, action, performed_by, details, created_at
            FROM audit_logs
            WHERE ($1::text IS NULL OR entity_type = $1)
              AND ($2::text IS NULL OR action = $2)
              AND ($3::date IS NULL OR created_at::date >= $3)
              AND ($4::date IS NULL OR created_at::date <= $4)
            ORDER BY created_at DESC
            LIMIT $5 OFFSET $6
            "#,
        )
        .bind(&filter.entity_type)
        .bind(&filter.action)
        .bind(filter.start_date)
        .bind(filter.end_date)
        .bind(per_page as i64)
        .bind(offset)
        .fetch_all(&self.db)
        .await?;

        Ok(PaginatedResponse {
            data: entries,
            pagination: PaginationMeta::new(page, per_page, total as u64),
        })
    }
}
