//! Inventory models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A supply item tracked by the laboratory
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct InventoryItem {
    pub id: Uuid,
    pub name: String,
    pub sku: String,
    /// Unit of measure for ledger quantities (e.g., box, piece, mL)
    pub unit: String,
    /// On-hand at or below this level flags the item for reorder
    pub reorder_level: Decimal,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A ledger entry against an inventory item
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StockTransaction {
    pub id: Uuid,
    pub item_id: Uuid,
    pub transaction_type: StockTransactionType,
    /// Positive for stock_in/stock_out; signed for adjustments
    pub quantity: Decimal,
    pub remarks: Option<String>,
    pub performed_by: String,
    pub transaction_date: NaiveDate,
    pub created_at: DateTime<Utc>,
}

/// Types of stock movements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockTransactionType {
    StockIn,
    StockOut,
    Adjustment,
}

impl StockTransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            StockTransactionType::StockIn => "stock_in",
            StockTransactionType::StockOut => "stock_out",
            StockTransactionType::Adjustment => "adjustment",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "stock_in" => Some(StockTransactionType::StockIn),
            "stock_out" => Some(StockTransactionType::StockOut),
            "adjustment" => Some(StockTransactionType::Adjustment),
            _ => None,
        }
    }
}

/// Signed ledger effect of a stock movement
pub fn stock_delta(transaction_type: StockTransactionType, quantity: Decimal) -> Decimal {
    match transaction_type {
        StockTransactionType::StockIn => quantity,
        StockTransactionType::StockOut => -quantity,
        StockTransactionType::Adjustment => quantity,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stock_delta_signs() {
        let qty = Decimal::from(10);
        assert_eq!(stock_delta(StockTransactionType::StockIn, qty), qty);
        assert_eq!(stock_delta(StockTransactionType::StockOut, qty), -qty);
        // Adjustments carry their own sign
        assert_eq!(stock_delta(StockTransactionType::Adjustment, -qty), -qty);
    }
}
