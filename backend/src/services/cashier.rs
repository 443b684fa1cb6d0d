//! Cashier transaction service
//!
//! Implements the front-desk sale pipeline: test selection, discount and
//! PhilHealth coverage computation, duplicate-test detection, payment
//! calculation, queue numbering, and receipt generation.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{compute_billing, find_duplicate_test, validation, AuditAction, DiscountType};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::config::BillingConfig;
use crate::error::{AppError, AppResult};
use crate::services::AuditService;

/// Cashier service for recording sales of lab tests
#[derive(Clone)]
pub struct CashierService {
    db: PgPool,
    billing: BillingConfig,
}

/// Transaction record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransactionRecord {
    pub id: Uuid,
    pub receipt_number: String,
    pub queue_number: i32,
    pub patient_id: Uuid,
    pub cashier_name: String,
    pub transaction_date: NaiveDate,
    pub status: String,
    pub gross_amount: Decimal,
    pub discount_type: String,
    pub discount_percent: Decimal,
    pub discount_amount: Decimal,
    pub philhealth_percent: Decimal,
    pub philhealth_amount: Decimal,
    pub net_amount: Decimal,
    pub amount_paid: Decimal,
    pub change_amount: Decimal,
    pub voided_at: Option<DateTime<Utc>>,
    pub void_reason: Option<String>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Transaction line item record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct TransactionItemRecord {
    pub id: Uuid,
    pub transaction_id: Uuid,
    pub lab_test_id: Uuid,
    pub test_code: String,
    pub test_name: String,
    pub price: Decimal,
    pub result_value: Option<String>,
    pub result_unit: Option<String>,
    pub reference_range: Option<String>,
    pub result_remarks: Option<String>,
    pub result_entered_at: Option<DateTime<Utc>>,
}

/// Transaction with its line items
#[derive(Debug, Clone, Serialize)]
pub struct TransactionWithItems {
    #[serde(flatten)]
    pub transaction: TransactionRecord,
    pub items: Vec<TransactionItemRecord>,
}

/// Input for recording a transaction
#[derive(Debug, Deserialize)]
pub struct CreateTransactionInput {
    pub patient_id: Uuid,
    pub cashier_name: String,
    pub test_ids: Vec<Uuid>,
    pub discount_type: DiscountType,
    /// Required for custom discounts, ignored otherwise
    pub discount_percent: Option<Decimal>,
    pub philhealth_percent: Option<Decimal>,
    pub amount_paid: Decimal,
    pub transaction_date: Option<NaiveDate>,
    pub notes: Option<String>,
}

/// Input for voiding a transaction
#[derive(Debug, Deserialize)]
pub struct VoidTransactionInput {
    pub reason: String,
    pub performed_by: String,
}

/// Row for test lookup during transaction entry
#[derive(Debug, FromRow)]
struct TestPriceRow {
    id: Uuid,
    code: String,
    name: String,
    price: Decimal,
    is_active: bool,
}

/// Format an official receipt number from the daily sequence
pub fn format_receipt_number(date: NaiveDate, sequence: i32) -> String {
    format!("OR-{}-{:04}", date.format("%Y%m%d"), sequence)
}

impl CashierService {
    /// Create a new CashierService instance
    pub fn new(db: PgPool, billing: BillingConfig) -> Self {
        Self { db, billing }
    }

    /// Resolve the effective discount percent for a discount type
    fn resolve_discount_percent(
        &self,
        discount_type: DiscountType,
        requested: Option<Decimal>,
    ) -> AppResult<Decimal> {
        let percent = match discount_type {
            DiscountType::None => Decimal::ZERO,
            DiscountType::Senior => Decimal::from(self.billing.senior_discount_percent),
            DiscountType::Pwd => Decimal::from(self.billing.pwd_discount_percent),
            DiscountType::Custom => requested.ok_or_else(|| AppError::Validation {
                field: "discount_percent".to_string(),
                message: "Custom discounts require a discount percent".to_string(),
            })?,
        };

        validation::validate_discount_percent(percent).map_err(|msg| AppError::Validation {
            field: "discount_percent".to_string(),
            message: msg.to_string(),
        })?;

        Ok(percent)
    }

    /// Record a transaction, running the full billing pipeline
    pub async fn create_transaction(
        &self,
        input: CreateTransactionInput,
    ) -> AppResult<TransactionWithItems> {
        if input.test_ids.is_empty() {
            return Err(AppError::Validation {
                field: "test_ids".to_string(),
                message: "At least one test must be selected".to_string(),
            });
        }
        if input.cashier_name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "cashier_name".to_string(),
                message: "Cashier name is required".to_string(),
            });
        }

        // Duplicate tests within one submission
        if find_duplicate_test(&input.test_ids).is_some() {
            return Err(AppError::DuplicateEntry("test selection".to_string()));
        }

        // Patient must exist
        let patient_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM patients WHERE id = $1)")
                .bind(input.patient_id)
                .fetch_one(&self.db)
                .await?;
        if !patient_exists {
            return Err(AppError::NotFound("Patient".to_string()));
        }

        // Resolve selected tests against the catalog
        let tests = sqlx::query_as::<_, TestPriceRow>(
            "SELECT id, code, name, price, is_active FROM lab_tests WHERE id = ANY($1)",
        )
        .bind(&input.test_ids)
        .fetch_all(&self.db)
        .await?;

        if tests.len() != input.test_ids.len() {
            return Err(AppError::NotFound("Lab test".to_string()));
        }
        if let Some(inactive) = tests.iter().find(|t| !t.is_active) {
            return Err(AppError::Validation {
                field: "test_ids".to_string(),
                message: format!("Test {} is no longer offered", inactive.code),
            });
        }

        let transaction_date = input
            .transaction_date
            .unwrap_or_else(|| Utc::now().date_naive());

        // Same test already queued for this patient today
        let duplicate_codes: Vec<String> = sqlx::query_scalar(
            r#"
            SELECT DISTINCT ti.test_code
            FROM transaction_items ti
            JOIN transactions t ON t.id = ti.transaction_id
            WHERE t.patient_id = $1
              AND t.transaction_date = $2
              AND t.voided_at IS NULL
              AND t.status <> 'released'
              AND ti.lab_test_id = ANY($3)
            "#,
        )
        .bind(input.patient_id)
        .bind(transaction_date)
        .bind(&input.test_ids)
        .fetch_all(&self.db)
        .await?;

        if !duplicate_codes.is_empty() {
            return Err(AppError::DuplicateEntry(format!(
                "pending test for this patient today ({})",
                duplicate_codes.join(", ")
            )));
        }

        // Billing derivations
        let discount_percent =
            self.resolve_discount_percent(input.discount_type, input.discount_percent)?;
        let philhealth_percent = input.philhealth_percent.unwrap_or(Decimal::ZERO);
        validation::validate_coverage_percent(philhealth_percent).map_err(|msg| {
            AppError::Validation {
                field: "philhealth_percent".to_string(),
                message: msg.to_string(),
            }
        })?;

        let prices: Vec<Decimal> = tests.iter().map(|t| t.price).collect();
        let billing = compute_billing(&prices, discount_percent, philhealth_percent);

        if input.amount_paid < billing.net_amount {
            return Err(AppError::PaymentTooLow(format!(
                "Amount paid {} is less than the net amount due {}",
                input.amount_paid, billing.net_amount
            )));
        }
        let change_amount = input.amount_paid - billing.net_amount;

        // The transaction row, its items, and the audit entry commit together
        let mut tx = self.db.begin().await?;

        // Queue number and receipt share the per-day sequence; voided
        // transactions keep their number so numbers are never reused
        let queue_number: i32 = sqlx::query_scalar(
            "SELECT COALESCE(MAX(queue_number), 0) + 1 FROM transactions WHERE transaction_date = $1",
        )
        .bind(transaction_date)
        .fetch_one(&mut *tx)
        .await?;

        let receipt_number = format_receipt_number(transaction_date, queue_number);

        let transaction = sqlx::query_as::<_, TransactionRecord>(
            r#"
            INSERT INTO transactions (
                receipt_number, queue_number, patient_id, cashier_name, transaction_date,
                status, gross_amount, discount_type, discount_percent, discount_amount,
                philhealth_percent, philhealth_amount, net_amount, amount_paid,
                change_amount, notes
            )
            VALUES ($1, $2, $3, $4, $5, 'pending', $6, $7, $8, $9, $10, $11, $12, $13, $14, $15)
            RETURNING id, receipt_number, queue_number, patient_id, cashier_name,
                      transaction_date, status, gross_amount, discount_type, discount_percent,
                      discount_amount, philhealth_percent, philhealth_amount, net_amount,
                      amount_paid, change_amount, voided_at, void_reason, notes,
                      created_at, updated_at
            "#,
        )
        .bind(&receipt_number)
        .bind(queue_number)
        .bind(input.patient_id)
        .bind(input.cashier_name.trim())
        .bind(transaction_date)
        .bind(billing.gross_amount)
        .bind(input.discount_type.as_str())
        .bind(discount_percent)
        .bind(billing.discount_amount)
        .bind(philhealth_percent)
        .bind(billing.philhealth_amount)
        .bind(billing.net_amount)
        .bind(input.amount_paid)
        .bind(change_amount)
        .bind(&input.notes)
        .fetch_one(&mut *tx)
        .await?;

        let mut items = Vec::with_capacity(tests.len());
        for test in &tests {
            let item = sqlx::query_as::<_, TransactionItemRecord>(
                r#"
                INSERT INTO transaction_items (transaction_id, lab_test_id, test_code, test_name, price)
                VALUES ($1, $2, $3, $4, $5)
                RETURNING id, transaction_id, lab_test_id, test_code, test_name, price,
                          result_value, result_unit, reference_range, result_remarks,
                          result_entered_at
                "#,
            )
            .bind(transaction.id)
            .bind(test.id)
            .bind(&test.code)
            .bind(&test.name)
            .bind(test.price)
            .fetch_one(&mut *tx)
            .await?;
            items.push(item);
        }

        AuditService::record_with(
            &mut *tx,
            "transaction",
            transaction.id,
            AuditAction::Created,
            &transaction.cashier_name,
            serde_json::json!({
                "receipt_number": receipt_number,
                "queue_number": queue_number,
                "net_amount": billing.net_amount,
                "test_count": items.len(),
            }),
        )
        .await?;

        tx.commit().await?;

        tracing::info!(
            receipt = %transaction.receipt_number,
            queue = transaction.queue_number,
            "Recorded cashier transaction"
        );

        Ok(TransactionWithItems { transaction, items })
    }

    /// Get a transaction with its items
    pub async fn get_transaction(&self, transaction_id: Uuid) -> AppResult<TransactionWithItems> {
        let transaction = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT id, receipt_number, queue_number, patient_id, cashier_name,
                   transaction_date, status, gross_amount, discount_type, discount_percent,
                   discount_amount, philhealth_percent, philhealth_amount, net_amount,
                   amount_paid, change_amount, voided_at, void_reason, notes,
                   created_at, updated_at
            FROM transactions
            WHERE id = $1
            "#,
        )
        .bind(transaction_id)
        .fetch_optional(&self.db)
        .await?
        .ok_or_else(|| AppError::NotFound("Transaction".to_string()))?;

        let items = self.get_items(transaction_id).await?;

        Ok(TransactionWithItems { transaction, items })
    }

    /// Get the line items for a transaction
    pub async fn get_items(&self, transaction_id: Uuid) -> AppResult<Vec<TransactionItemRecord>> {
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

    /// List transactions for a date, newest first
    pub async fn list_by_date(&self, date: NaiveDate) -> AppResult<Vec<TransactionRecord>> {
        let transactions = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT id, receipt_number, queue_number, patient_id, cashier_name,
                   transaction_date, status, gross_amount, discount_type, discount_percent,
                   discount_amount, philhealth_percent, philhealth_amount, net_amount,
                   amount_paid, change_amount, voided_at, void_reason, notes,
                   created_at, updated_at
            FROM transactions
            WHERE transaction_date = $1
            ORDER BY queue_number DESC
            "#,
        )
        .bind(date)
        .fetch_all(&self.db)
        .await?;

        Ok(transactions)
    }

    /// Void a transaction
    pub async fn void_transaction(
        &self,
        transaction_id: Uuid,
        input: VoidTransactionInput,
    ) -> AppResult<TransactionRecord> {
        if input.reason.trim().is_empty() {
            return Err(AppError::Validation {
                field: "reason".to_string(),
                message: "A void reason is required".to_string(),
            });
        }

        let existing = self.get_transaction(transaction_id).await?.transaction;

        if existing.voided_at.is_some() {
            return Err(AppError::Conflict(
                "Transaction is already voided".to_string(),
            ));
        }
        if existing.status == "released" {
            return Err(AppError::Conflict(
                "Released transactions cannot be voided".to_string(),
            ));
        }

        let mut tx = self.db.begin().await?;

        let transaction = sqlx::query_as::<_, TransactionRecord>(
            r#"
            UPDATE transactions
            SET voided_at = NOW(), void_reason = $1, updated_at = NOW()
            WHERE id = $2
            RETURNING id, receipt_number, queue_number, patient_id, cashier_name,
                      transaction_date, status, gross_amount, discount_type, discount_percent,
                      discount_amount, philhealth_percent, philhealth_amount, net_amount,
                      amount_paid, change_amount, voided_at, void_reason, notes,
                      created_at, updated_at
            "#,
        )
        .bind(input.reason.trim())
        .bind(transaction_id)
        .fetch_one(&mut *tx)
        .await?;

        AuditService::record_with(
            &mut *tx,
            "transaction",
            transaction_id,
            AuditAction::Voided,
            &input.performed_by,
            serde_json::json!({
                "receipt_number": transaction.receipt_number,
                "reason": input.reason.trim(),
            }),
        )
        .await?;

        tx.commit().await?;

        Ok(transaction)
    }

    /// List transactions recorded for a patient, newest first
    pub async fn list_for_patient(&self, patient_id: Uuid) -> AppResult<Vec<TransactionRecord>> {
        let transactions = sqlx::query_as::<_, TransactionRecord>(
            r#"
            SELECT id, receipt_number, queue_number, patient_id, cashier_name,
                   transaction_date, status, gross_amount, discount_type, discount_percent,
                   discount_amount, philhealth_percent, philhealth_amount, net_amount,
                   amount_paid, change_amount, voided_at, void_reason, notes,
                   created_at, updated_at
            FROM transactions
            WHERE patient_id = $1
            ORDER BY transaction_date DESC, queue_number DESC
            "#,
        )
        .bind(patient_id)
        .fetch_all(&self.db)
        .await?;

        Ok(transactions)
    }
}
