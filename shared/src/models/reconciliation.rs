//! End-of-shift cash reconciliation models

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An end-of-shift comparison of expected vs actual cash
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CashReconciliation {
    pub id: Uuid,
    pub shift_date: NaiveDate,
    pub cashier_name: String,
    /// Sum of net collections over the cashier's non-voided transactions
    pub expected_amount: Decimal,
    pub actual_amount: Decimal,
    /// actual - expected
    pub variance: Decimal,
    pub classification: VarianceClassification,
    pub remarks: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Outcome of a cash count against expected collections
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VarianceClassification {
    Balanced,
    Overage,
    Shortage,
}

impl VarianceClassification {
    pub fn as_str(&self) -> &'static str {
        match self {
            VarianceClassification::Balanced => "balanced",
            VarianceClassification::Overage => "overage",
            VarianceClassification::Shortage => "shortage",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s {
            "balanced" => Some(VarianceClassification::Balanced),
            "overage" => Some(VarianceClassification::Overage),
            "shortage" => Some(VarianceClassification::Shortage),
            _ => None,
        }
    }
}

/// Classify a variance amount
pub fn classify_variance(variance: Decimal) -> VarianceClassification {
    if variance.is_zero() {
        VarianceClassification::Balanced
    } else if variance > Decimal::ZERO {
        VarianceClassification::Overage
    } else {
        VarianceClassification::Shortage
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str(s).unwrap()
    }

    #[test]
    fn test_classify_balanced() {
        assert_eq!(
            classify_variance(Decimal::ZERO),
            VarianceClassification::Balanced
        );
        // 0.00 with trailing decimals is still balanced
        assert_eq!(
            classify_variance(dec("0.00")),
            VarianceClassification::Balanced
        );
    }

    #[test]
    fn test_classify_overage() {
        assert_eq!(
            classify_variance(dec("0.01")),
            VarianceClassification::Overage
        );
        assert_eq!(
            classify_variance(dec("150")),
            VarianceClassification::Overage
        );
    }

    #[test]
    fn test_classify_shortage() {
        assert_eq!(
            classify_variance(dec("-0.01")),
            VarianceClassification::Shortage
        );
        assert_eq!(
            classify_variance(dec("-500")),
            VarianceClassification::Shortage
        );
    }
}
