//! Lab queue service
//!
//! Drives the linear transaction lifecycle (pending -> processing ->
//! completed -> released) and result entry for queued tests.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::{AuditAction, TransactionStatus};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::cashier::TransactionItemRecord;
use crate::services::AuditService;

/// Lab queue service for processing order and result entry
#[derive(Clone)]
pub struct LabQueueService {
    db: PgPool,
}

/// A transaction waiting in the lab queue
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct QueueEntry {
    pub transaction_id: Uuid,
    pub queue_number: i32,
    pub receipt_number: String,
    pub patient_name: String,
    pub status: String,
    pub test_count: i64,
    pub created_at: DateTime<Utc>,
}

/// Input for advancing a transaction's status
#[derive(Debug, Deserialize)]
pub struct AdvanceStatusInput {
    pub status: TransactionStatus,
    pub performed_by: String,
}

/// A single result to record against a line item
#[derive(Debug, Deserialize)]
pub struct EnterResultInput {
    pub item_id: Uuid,
    pub result_value: String,
    pub result_unit: Option<String>,
    pub reference_range: Option<String>,
    pub result_remarks: Option<String>,
}

/// Input for entering results on a transaction
#[derive(Debug, Deserialize)]
pub struct EnterResultsInput {
    pub results: Vec<EnterResultInput>,
    pub performed_by: String,
}

/// Row for status checks
#[derive(Debug, FromRow)]
struct StatusRow {
    status: String,
    voided_at: Option<DateTime<Utc>>,
}

impl LabQueueService {
    /// Create a new LabQueueService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// List the processing queue for a date, in ticket order
    pub async fn list_queue(&self, date: NaiveDate) -> AppResult<Vec<QueueEntry>> {
        let entries = sqlx::query_as::<_, QueueEntry>(
            r#"
            SELECT t.id AS transaction_id, t.queue_number, t.receipt_number,
                   p.last_name || ', ' || p.first_name AS patient_name,
                   t.status,
                   (SELECT COUNT(*) FROM transaction_items ti WHERE ti.transaction_id = t.id) AS test_count,
                   t.created_at
            FROM transactions t
            JOIN patients p ON p.id = t.patient_id
            WHERE t.transaction_date = $1
              AND t.voided_at IS NULL
              AND t.status IN ('pending', 'processing')
            ORDER BY t.queue_number ASC
            "#,
        )
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(entries)
    }

    async fn current_status(&self, transaction_id: Uuid) -> AppResult<TransactionStatus> {
        let row = sqlx::query_as::<_, StatusRow>(
            "SELECT status, voided_at FROM transactions WHERE id = $1",
        )
        .bind(transaction_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction".to_string()))?;

        if row.voided_at.is_some() {
            return Err(AppError::InvalidStateTransition(
                "Voided transactions cannot be processed".to_string(),
            ));
        }

        TransactionStatus::from_str(&row.status).ok_or_else(|| {
            AppError::Internal(format!("Unknown transaction status '{}'", row.status))
        })
    }

    /// Advance a transaction one step along the lifecycle
    pub async fn advance_status(
        &self,
        transaction_id: Uuid,
        input: AdvanceStatusInput,
    ) -> AppResult<TransactionStatus> {
        let current = self.current_status(transaction_id).await?;

        if !current.can_transition_to(input.status) {
            return Err(AppError::InvalidStateTransition(format!(
                "Cannot move from {} to {}",
                current.as_str(),
                input.status.as_str()
            )));
        }

        // Release requires every item to carry a result
        if input.status == TransactionStatus::Released {
            let missing: i64 = sqlx::query_scalar(
                r#"
                SELECT COUNT(*)
                FROM transaction_items
                WHERE transaction_id = $1 AND result_value IS NULL
                "#,
            )
            .bind(transaction_id)
            .fetch_one(&self.db)
            .await?;

            if missing > 0 {
                return Err(AppError::InvalidStateTransition(format!(
                    "{} test(s) still have no result",
                    missing
                )));
            }
        }

        let mut tx = self.db.begin().await?;

        sqlx::query("UPDATE transactions SET status = $1, updated_at = NOW() WHERE id = $2")
            .bind(input.status.as_str())
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;

        AuditService::record_with(
            &mut *tx,
            "transaction",
            transaction_id,
            AuditAction::StatusChanged,
            &input.performed_by,
            serde_json::json!({
                "from": current.as_str(),
                "to": input.status.as_str(),
            }),
        )
        .await?;

        tx.commit().await?;

        Ok(input.status)
    }

    /// Record results for line items on a processing transaction
    pub async fn enter_results(
        &self,
        transaction_id: Uuid,
        input: EnterResultsInput,
    ) -> AppResult<Vec<TransactionItemRecord>> {
        if input.results.is_empty() {
            return Err(AppError::Validation {
                field: "results".to_string(),
                message: "At least one result is required".to_string(),
            });
        }

        let current = self.current_status(transaction_id).await?;
        if current != TransactionStatus::Processing {
            return Err(AppError::InvalidStateTransition(format!(
                "Results can only be entered while processing, not {}",
                current.as_str()
            )));
        }

        // Either every result lands or none of them do
        let mut tx = self.db.begin().await?;

        for result in &input.results {
            if result.result_value.trim().is_empty() {
                return Err(AppError::Validation {
                    field: "result_value".to_string(),
                    message: "Result value cannot be empty".to_string(),
                });
            }

            let updated = sqlx::query(
                r#"
                UPDATE transaction_items
                SET result_value = $1, result_unit = $2, reference_range = $3,
                    result_remarks = $4, result_entered_at = NOW()
                WHERE id = $5 AND transaction_id = $6
                "#,
            )
            .bind(result.result_value.trim())
            .bind(&result.result_unit)
            .bind(&result.reference_range)
            .bind(&result.result_remarks)
            .bind(result.item_id)
            .bind(transaction_id)
            .execute(&mut *tx)
            .await?;

            if updated.rows_affected() == 0 {
                return Err(AppError::NotFound("Transaction item".to_string()));
            }
        }

        AuditService::record_with(
            &mut *tx,
            "transaction",
            transaction_id,
            AuditAction::ResultEntered,
            &input.performed_by,
            serde_json::json!({ "result_count": input.results.len() }),
        )
        .await?;

        tx.commit().await?;

        self.get_results(transaction_id).await
    }

    /// Get the items (with any recorded results) for a transaction
    pub async fn get_results(
        &self,
        transaction_id: Uuid,
    ) -> AppResult<Vec<TransactionItemRecord>> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM transactions WHERE id = $1)")
                .bind(transaction_id)
                .fetch_one(&self.db)
                .await?;
        if !exists {
            return Err(AppError::NotFound("Transaction".to_string()));
        }

        let items = sqlx::query_as::<_, TransactionItemRecord>(
            r#"
            SELECT id, transaction_id, lab_test_id, test_code, test_name, price,
                   result_value, result_unit, reference_range, result_remarks,
                   result_entered_at
            FROM transaction_items
            WHERE transaction_id = $1
            ORDER BY test_code ASC
            "#,
        )
        .bind(transaction_id)
        .fetch_all(&self.db)
        .await?;

        Ok(items)
    }
}
