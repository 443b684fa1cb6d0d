//! Cashier transaction models and billing derivations

use std::collections::HashSet;

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A cashier-recorded sale of one or more lab tests to a patient
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Transaction {
    pub id: Uuid,
    /// Official receipt number: OR-YYYYMMDD-NNNN
    pub receipt_number: String,
    /// Daily lab processing ticket, starting at 1 each day
    pub queue_number: i32,
    pub patient_id: Uuid,
    pub cashier_name: String,
    pub transaction_date: NaiveDate,
    pub status: TransactionStatus,
    pub gross_amount: Decimal,
    pub discount_type: DiscountType,
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

/// A single test line on a transaction
///
/// Test code, name and price are denormalized at sale time so later catalog
/// edits do not rewrite receipt history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransactionItem {
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

/// Transaction lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TransactionStatus {
    Pending,
    Processing,
    Completed,
    Released,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "pending",
            TransactionStatus::Processing => "processing",
            TransactionStatus::Completed => "completed",
            TransactionStatus::Released => "released",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "pending" => Some(TransactionStatus::Pending),
            "processing" => Some(TransactionStatus::Processing),
            "completed" => Some(TransactionStatus::Completed),
            "released" => Some(TransactionStatus::Released),
            _ => None,
        }
    }

    /// The lifecycle is strictly linear; a status may only advance one step
    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        matches!(
            (self, next),
            (TransactionStatus::Pending, TransactionStatus::Processing)
                | (TransactionStatus::Processing, TransactionStatus::Completed)
                | (TransactionStatus::Completed, TransactionStatus::Released)
        )
    }
}

/// Discount classification applied at the cashier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiscountType {
    None,
    Senior,
    Pwd,
    Custom,
}

impl DiscountType {
    pub fn as_str(&self) -> &'static str {
        match self {
            DiscountType::None => "none",
            DiscountType::Senior => "senior",
            DiscountType::Pwd => "pwd",
            DiscountType::Custom => "custom",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "none" => Some(DiscountType::None),
            "senior" => Some(DiscountType::Senior),
            "pwd" => Some(DiscountType::Pwd),
            "custom" => Some(DiscountType::Custom),
            _ => None,
        }
    }
}

/// Computed billing figures for a transaction
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BillingBreakdown {
    pub gross_amount: Decimal,
    pub discount_amount: Decimal,
    pub philhealth_amount: Decimal,
    pub net_amount: Decimal,
}

/// Round a monetary amount to centavos, half away from zero
pub fn round_centavos(amount: Decimal) -> Decimal {
    amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero)
}

/// First test id that appears more than once in a cashier selection
pub fn find_duplicate_test(test_ids: &[Uuid]) -> Option<Uuid> {
    let mut seen = HashSet::with_capacity(test_ids.len());
    test_ids.iter().copied().find(|id| !seen.insert(*id))
}

/// Compute the billing breakdown for a set of test prices
///
/// The discount applies to the gross; PhilHealth coverage applies to the
/// already-discounted base. Both percentages are expected in 0-100.
pub fn compute_billing(
    prices: &[Decimal],
    discount_percent: Decimal,
    philhealth_percent: Decimal,
) -> BillingBreakdown {
    let hundred = Decimal::from(100);
    let gross: Decimal = prices.iter().sum();
    let discount_amount = round_centavos(gross * discount_percent / hundred);
    let covered_base = gross - discount_amount;
    let philhealth_amount = round_centavos(covered_base * philhealth_percent / hundred);
    let net_amount = gross - discount_amount - philhealth_amount;

    BillingBreakdown {
        gross_amount: gross,
        discount_amount,
        philhealth_amount,
        net_amount,
    }
}
