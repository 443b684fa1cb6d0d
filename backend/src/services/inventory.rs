//! Inventory service for supply items, stock movements, and reorder flags

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use shared::{stock_delta, AuditAction, StockTransactionType};
use sqlx::{FromRow, PgPool};
use uuid::Uuid;

use crate::error::{AppError, AppResult};
use crate::services::AuditService;

/// Inventory service for managing stock items and their ledger
#[derive(Clone)]
pub struct InventoryService {
    db: PgPool,
}

/// Inventory item with its derived on-hand quantity
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct InventoryItemRecord {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    pub unit: String,
    pub reorder_level: Decimal,
    pub is_active: bool,
    pub on_hand: Decimal,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Stock ledger entry record
#[derive(Debug, Clone, Serialize, FromRow)]
pub struct StockTransactionRecord {
    pub id: Uuid,
    pub item_id: Uuid,
    pub transaction_type: String,
    pub quantity: Decimal,
    pub remarks: Option<String>,
    pub performed_by: String,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Input for creating an inventory item
#[derive(Debug, Deserialize)]
pub struct CreateItemInput {
    pub name: String,
    pub sku: String,
    pub unit: String,
    pub reorder_level: Decimal,
}

/// Input for updating an inventory item
#[derive(Debug, Deserialize)]
pub struct UpdateItemInput {
    pub name: Option<String>,
    pub unit: Option<String>,
    pub reorder_level: Option<Decimal>,
    pub is_active: Option<bool>,
}

/// Input for recording a stock movement
#[derive(Debug, Deserialize)]
pub struct RecordStockInput {
    pub item_id: Uuid,
    pub transaction_type: StockTransactionType,
    /// Positive for stock_in/stock_out; signed for adjustments
    pub quantity: Decimal,
    pub remarks: Option<String>,
    pub performed_by: String,
    pub transaction_date: Option<NaiveDate>,
}

const ITEM_COLUMNS: &str = r#"
    i.id, i.name, i.sku, i.unit, i.reorder_level, i.is_active,
    COALESCE((
        SELECT SUM(CASE WHEN st.transaction_type = 'stock_out'
                        THEN -st.quantity ELSE st.quantity END)
        FROM stock_transactions st WHERE st.item_id = i.id
    ), 0) AS on_hand,
    i.created_at, i.updated_at
"#;

impl InventoryService {
    /// Create a new InventoryService instance
    pub fn new(db: PgPool) -> Self {
        Self { db }
    }

    /// Create an inventory item
    pub async fn create_item(&self, input: CreateItemInput) -> AppResult<InventoryItemRecord> {
        if input.name.trim().is_empty() {
            return Err(AppError::Validation {
                field: "name".to_string(),
                message: "Item name is required".to_string(),
            });
        }
        if input.reorder_level < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "reorder_level".to_string(),
                message: "Reorder level cannot be negative".to_string(),
            });
        }

        let sku = input.sku.trim().to_uppercase();
        let sku_exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM inventory_items WHERE sku = $1)")
                .bind(&sku)
                .fetch_one(&self.db)
                .await?;
        if sku_exists {
            return Err(AppError::DuplicateEntry("sku".to_string()));
        }

        let id: Uuid = sqlx::query_scalar(
            r#"
            INSERT INTO inventory_items (name, sku, unit, reorder_level, is_active)
            VALUES ($1, $2, $3, $4, true)
            RETURNING id
            "#,
        )
        .bind(input.name.trim())
        .bind(&sku)
        .bind(input.unit.trim())
        .bind(input.reorder_level)
        .fetch_one(&self.db)
        .await?;

        self.get_item(id).await
    }

    /// Update an inventory item
    pub async fn update_item(
        &self,
        item_id: Uuid,
        input: UpdateItemInput,
    ) -> AppResult<InventoryItemRecord> {
        let existing = self.get_item(item_id).await?;

        let name = input.name.unwrap_or(existing.name);
        let unit = input.unit.unwrap_or(existing.unit);
        let reorder_level = input.reorder_level.unwrap_or(existing.reorder_level);
        let is_active = input.is_active.unwrap_or(existing.is_active);

        if reorder_level < Decimal::ZERO {
            return Err(AppError::Validation {
                field: "reorder_level".to_string(),
                message: "Reorder level cannot be negative".to_string(),
            });
        }

        sqlx::query(
            r#"
            UPDATE inventory_items
            SET name = $1, unit = $2, reorder_level = $3, is_active = $4, updated_at = NOW()
            WHERE id = $5
            "#,
        )
        .bind(name.trim())
        .bind(unit.trim())
        .bind(reorder_level)
        .bind(is_active)
        .bind(item_id)
        .execute(&self.db)
        .await?;

        self.get_item(item_id).await
    }

    /// Get an item with its on-hand balance
    pub async fn get_item(&self, item_id: Uuid) -> AppResult<InventoryItemRecord> {
        let query = format!(
            "SELECT {} FROM inventory_items i WHERE i.id = $1",
            ITEM_COLUMNS
        );

        sqlx::query_as::<_, InventoryItemRecord>(&query)
            .bind(item_id)
            .fetch_optional(&self.db)
            .await?
            .ok_or_else(|| AppError::NotFound("Inventory item".to_string()))
    }

    /// List items with on-hand balances
    pub async fn list_items(&self, include_inactive: bool) -> AppResult<Vec<InventoryItemRecord>> {
        let query = format!(
            "SELECT {} FROM inventory_items i WHERE ($1 OR i.is_active) ORDER BY i.name ASC",
            ITEM_COLUMNS
        );

        let items = sqlx::query_as::<_, InventoryItemRecord>(&query)
            .bind(include_inactive)
            .fetch_all(&self.db)
            .await?;

        Ok(items)
    }

    /// Record a stock movement against an item's ledger
    pub async fn record_stock(&self, input: RecordStockInput) -> AppResult<StockTransactionRecord> {
        match input.transaction_type {
            StockTransactionType::StockIn | StockTransactionType::StockOut => {
                if input.quantity <= Decimal::ZERO {
                    return Err(AppError::Validation {
                        field: "quantity".to_string(),
                        message: "Quantity must be positive".to_string(),
                    });
                }
            }
            StockTransactionType::Adjustment => {
                if input.quantity.is_zero() {
                    return Err(AppError::Validation {
                        field: "quantity".to_string(),
                        message: "Adjustment quantity cannot be zero".to_string(),
                    });
                }
            }
        }

        let item = self.get_item(input.item_id).await?;

        // Stock never goes below zero
        let delta = stock_delta(input.transaction_type, input.quantity);
        let resulting = item.on_hand + delta;
        if resulting < Decimal::ZERO {
            return Err(AppError::InsufficientStock(format!(
                "{} has {} {} on hand; movement of {} would leave {}",
                item.name, item.on_hand, item.unit, delta, resulting
            )));
        }

        let transaction_date = input
            .transaction_date
            .unwrap_or_else(|| Utc::now().date_naive());

        let mut tx = self.db.begin().await?;

        let transaction = sqlx::query_as::<_, StockTransactionRecord>(
            r#"
            INSERT INTO stock_transactions (
                item_id, transaction_type, quantity, remarks, performed_by, transaction_date
            )
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING id, item_id, transaction_type, quantity, remarks, performed_by,
                      transaction_date, created_at
            "#,
        )
        .bind(input.item_id)
        .bind(input.transaction_type.as_str())
        .bind(input.quantity)
        .bind(&input.remarks)
        .bind(input.performed_by.trim())
        .bind(transaction_date)
        .fetch_one(&mut *tx)
        .await?;

        AuditService::record_with(
            &mut *tx,
            "inventory_item",
            input.item_id,
            AuditAction::StockMoved,
            &input.performed_by,
            serde_json::json!({
                "transaction_type": input.transaction_type.as_str(),
                "quantity": input.quantity,
                "on_hand_after": resulting,
            }),
        )
        .await?;

        tx.commit().await?;

        Ok(transaction)
    }

    /// List the ledger for an item, newest first
    pub async fn list_item_transactions(
        &self,
        item_id: Uuid,
    ) -> AppResult<Vec<StockTransactionRecord>> {
        // Ensure the item exists so missing ids surface as 404
        self.get_item(item_id).await?;

        let transactions = sqlx::query_as::<_, StockTransactionRecord>(
            r#"
            SELECT id, item_id, transaction_type, quantity, remarks, performed_by,
                   transaction_date, created_at
            FROM stock_transactions
            WHERE item_id = $1
            ORDER BY transaction_date DESC, created_at DESC
            "#,
        )
        .bind(item_id)
        .fetch_all(&self.db)
        .await?;

        Ok(transactions)
    }

    /// Active items at or below their reorder level
    pub async fn low_stock(&self) -> AppResult<Vec<InventoryItemRecord>> {
        let query = format!(
            r#"
            SELECT * FROM (
                SELECT {} FROM inventory_items i WHERE i.is_active
            ) items
            WHERE items.on_hand <= items.reorder_level
            ORDER BY items.on_hand ASC
            "#,
            ITEM_COLUMNS
        );

        let items = sqlx::query_as::<_, InventoryItemRecord>(&query)
            .fetch_all(&self.db)
            .await?;

        Ok(items)
    }
}
