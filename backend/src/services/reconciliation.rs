//! End-of-shift cash reconciliation service

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{classify_variance, validation, AuditAction};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::AuditService;

/// Reconciliation service for end-of-shift cash counts
#[derive(Clone)]
pub struct ReconciliationService {
    db: PgPool,
}

/// Stored reconciliation record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct ReconciliationRecord {
    pub id: Uuid,
    pub shift_date: NaiveDate,
    pub cashier_name: String,
    pub expected_amount: Decimal,
    pub actual_amount: Decimal,
    pub variance: Decimal,
    pub classification: String,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Input for recording a reconciliation
#[derive(Debug, Deserialize)]
pub struct CreateReconciliationInput {
    pub shift_date: NaiveDate,
    pub cashier_name: String,
    pub actual_amount: Decimal,
    pub remarks: Option<String>,
}

/// Query parameters for listing reconciliations
#[derive(Debug, Deserialize)]
pub struct ReconciliationListQuery {
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
}

impl ReconciliationService {
    /// Create a new ReconciliationService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Record an end-of-shift reconciliation
    ///
    /// The expected amount and variance classification are computed
    /// server-side from the cashier's non-voided transactions.
    pub async fn create(
        &self,
        input: CreateReconciliationInput,
    ) -> AppResult<ReconciliationRecord> {
        let cashier_name = input.cashier_name.trim().to_string();
        if cashier_name.is_empty() {
            return Err(AppError::Validation {
                field: "cashier_name".to_string(),
                message: "Cashier name is required".to_string(),
            });
        }
        validation::validate_amount(input.actual_amount).map_err(|msg| AppError::Validation {
            field: "actual_amount".to_string(),
            message: msg.to_string(),
        })?;

        // One reconciliation per cashier per shift date
        let already_reconciled: bool = sqlx::query_scalar(
            "SELECT EXISTS(SELECT 1 FROM cash_reconciliations WHERE shift_date = $1 AND cashier_name = $2)",
        )
        .bind(input.shift_date)
        .bind(&cashier_name)
        .fetch_one(&self.db)
        .await?;
        if already_reconciled {
            return Err(AppError::DuplicateEntry(
                "reconciliation for this cashier and date".to_string(),
            ));
        }

        let expected_amount: Decimal = sqlx::query_scalar(
            r#"
            SELECT COALESCE(SUM(net_amount), 0)
            FROM transactions
            WHERE transaction_date = $1
              AND cashier_name = $2
              AND voided_at IS NULL
            "#,
        )
        .bind(input.shift_date)
        .bind(&cashier_name)
        .fetch_one(&self.db)
        .await?;

        let variance = input.actual_amount - expected_amount;
        let classification = classify_variance(variance);

        let mut tx = self.db.begin().await?;

        let record = sqlx::query_as::<_, ReconciliationRecord>(
            r#"
            INSERT INTO cash_reconciliations (
                shift_date, cashier_name, expected_amount, actual_amount,
                variance, classification, remarks
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            RETURNING id, shift_date, cashier_name, expected_amount, actual_amount,
                      variance, classification, remarks, created_at
            "#,
        )
        .bind(input.shift_date)
        .bind(&cashier_name)
        .bind(expected_amount)
        .bind(input.actual_amount)
        .bind(variance)
        .bind(classification.as_str())
        .bind(&input.remarks)
        .fetch_one(&mut *tx)
        .await?;

        AuditService::record_with(
            &mut *tx,
            "cash_reconciliation",
            record.id,
            AuditAction::Reconciled,
            &cashier_name,
            serde_json::json!({
                "shift_date": input.shift_date,
                "expected": expected_amount,
                "actual": input.actual_amount,
                "classification": classification.as_str(),
            }),
        )
        .await?;

        tx.commit().await?;

        if classification.as_str() != "balanced" {
            tracing::warn!(
                cashier = %cashier_name,
                %variance,
                "Cash reconciliation did not balance"
            );
        }

        Ok(record)
    }

    /// Get a reconciliation by id
    pub async fn get(&self, reconciliation_id: Uuid) -> AppResult<ReconciliationRecord> {
        sqlx::query_as::<_, ReconciliationRecord>(
            r#"
            SELECT id, shift_date, cashier_name, expected_amount, actual_amount,
                   variance, classification, remarks, created_at
            FROM cash_reconciliations
            WHERE id = $1
            "#,
        )
        .bind(reconciliation_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Cash reconciliation".to_string()))
    }

    /// List reconciliations, newest shift first
    pub async fn list(
        &self,
        query: &ReconciliationListQuery,
    ) -> AppResult<Vec<ReconciliationRecord>> {
        let records = sqlx::query_as::<_, ReconciliationRecord>(
            r#"
            SELECT id, shift_date, cashier_name, expected_amount, actual_amount,
                   variance, classification, remarks, created_at
            FROM cash_reconciliations
            WHERE ($1::date IS NULL OR shift_date >= $1)
              AND ($2::date IS NULL OR shift_date <= $2)
            ORDER BY shift_date DESC, cashier_name ASC
            "#,
        )
        .bind(query.start_date)
        .bind(query.end_date)
        .fetch_all(&self.db)
        .await?;

        Ok(records)
    }
}
