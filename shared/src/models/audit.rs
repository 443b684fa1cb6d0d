//! Audit trail models

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A recorded change to front-office data
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLog {
    pub id: Uuid,
    /// Entity kind the action touched (e.g., "transaction", "inventory_item")
    pub entity_type: String,
    pub entity_id: Uuid,
    pub action: AuditAction,
    pub performed_by: String,
    /// Free-form payload describing the change
    pub details: serde_json::Value,
    pub created_at: DateTime<Utc>,
}

/// Actions recorded in the audit trail
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AuditAction {
    Created,
    Updated,
    Deleted,
    Voided,
    StatusChanged,
    ResultEntered,
    StockMoved,
    Reconciled,
}

impl AuditAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            AuditAction::Created => "created",
            AuditAction::Updated => "updated",
            AuditAction::Deleted => "deleted",
            AuditAction::Voided => "voided",
            AuditAction::StatusChanged => "status_changed",
            AuditAction::ResultEntered => "result_entered",
            AuditAction::StockMoved => "stock_moved",
            AuditAction::Reconciled => "reconciled",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "created" => Some(AuditAction::Created),
            "updated" => Some(AuditAction::Updated),
            "deleted" => Some(AuditAction::Deleted),
            "voided" => Some(AuditAction::Voided),
            "status_changed" => Some(AuditAction::StatusChanged),
            "result_entered" => Some(AuditAction::ResultEntered),
            "stock_moved" => Some(AuditAction::StockMoved),
            "reconciled" => Some(AuditAction::Reconciled),
            _ => None,
        }
    }
}
