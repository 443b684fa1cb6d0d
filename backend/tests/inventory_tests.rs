//! Inventory tracking tests
//!
//! Covers stock movement deltas, ledger-derived on-hand balances,
//! non-negative stock enforcement, and low-stock detection.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{stock_delta, StockTransactionType};

// Helper to create Decimal from string
fn dec(s: &str) -> Decimal {
    Decimal::from_str(s).unwrap()
}

// ============================================================================
// Unit Tests
// ============================================================================

#[cfg(test)]
mod unit_tests {
    use super::*;

    /// Stock-in adds the quantity
    #[test]
    fn test_stock_in_delta() {
        assert_eq!(
            stock_delta(StockTransactionType::StockIn, dec("25")),
            dec("25")
        );
    }

    /// Stock-out subtracts the quantity
    #[test]
    fn test_stock_out_delta() {
        assert_eq!(
            stock_delta(StockTransactionType::StockOut, dec("10")),
            dec("-10")
        );
    }

    /// Adjustments carry their own sign
    #[test]
    fn test_adjustment_delta() {
        assert_eq!(
            stock_delta(StockTransactionType::Adjustment, dec("-3")),
            dec("-3")
        );
        assert_eq!(
            stock_delta(StockTransactionType::Adjustment, dec("5")),
            dec("5")
        );
    }

    /// On-hand is the running sum of deltas
    #[test]
    fn test_on_hand_from_ledger() {
        let movements = [
            (StockTransactionType::StockIn, dec("100")),
            (StockTransactionType::StockOut, dec("30")),
            (StockTransactionType::StockIn, dec("20")),
            (StockTransactionType::Adjustment, dec("-5")),
        ];

        let on_hand: Decimal = movements
            .iter()
            .map(|(t, q)| stock_delta(*t, *q))
            .sum();

        assert_eq!(on_hand, dec("85"));
    }

    /// A movement that would drive stock negative is detectable
    #[test]
    fn test_insufficient_stock_detection() {
        let on_hand = dec("12");
        let requested_out = dec("20");
        let resulting = on_hand + stock_delta(StockTransactionType::StockOut, requested_out);

        assert!(resulting < Decimal::ZERO);
    }

    /// Draining exactly to zero is allowed
    #[test]
    fn test_drain_to_zero() {
        let on_hand = dec("12");
        let resulting = on_hand + stock_delta(StockTransactionType::StockOut, dec("12"));

        assert_eq!(resulting, Decimal::ZERO);
    }

    /// Low stock triggers at or below the reorder level
    #[test]
    fn test_low_stock_threshold() {
        let reorder_level = dec("10");

        assert!(dec("10") <= reorder_level);
        assert!(dec("3") <= reorder_level);
        assert!(!(dec("11") <= reorder_level));
    }

    /// Transaction types round-trip through their string form
    #[test]
    fn test_transaction_type_round_trip() {
        use StockTransactionType::*;

        for t in [StockIn, StockOut, Adjustment] {
            assert_eq!(StockTransactionType::from_str(t.as_str()), Some(t));
        }
        assert_eq!(StockTransactionType::from_str("transfer"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating positive quantities (0.1 to 1000.0)
    fn quantity_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=10000i64).prop_map(|n| Decimal::new(n, 1))
    }

    /// Strategy for generating movement types
    fn movement_strategy() -> impl Strategy<Value = StockTransactionType> {
        prop_oneof![
            Just(StockTransactionType::StockIn),
            Just(StockTransactionType::StockOut),
        ]
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// On-hand equals total in minus total out
        #[test]
        fn prop_on_hand_accuracy(
            movements in prop::collection::vec(
                (movement_strategy(), quantity_strategy()),
                1..20
            )
        ) {
            let mut total_in = Decimal::ZERO;
            let mut total_out = Decimal::ZERO;

            for (t, q) in &movements {
                match t {
                    StockTransactionType::StockIn => total_in += q,
                    StockTransactionType::StockOut => total_out += q,
                    StockTransactionType::Adjustment => {}
                }
            }

            let on_hand: Decimal = movements
                .iter()
                .map(|(t, q)| stock_delta(*t, *q))
                .sum();

            prop_assert_eq!(on_hand, total_in - total_out);
        }

        /// Rejecting negative-result movements keeps the balance non-negative
        #[test]
        fn prop_guarded_balance_never_negative(
            movements in prop::collection::vec(
                (movement_strategy(), quantity_strategy()),
                1..30
            )
        ) {
            let mut on_hand = Decimal::ZERO;

            for (t, q) in &movements {
                let resulting = on_hand + stock_delta(*t, *q);
                if resulting >= Decimal::ZERO {
                    on_hand = resulting;
                }
            }

            prop_assert!(on_hand >= Decimal::ZERO);
        }

        /// An adjustment is its own inverse
        #[test]
        fn prop_adjustment_inverse(
            start in quantity_strategy(),
            amount in quantity_strategy()
        ) {
            let up = start + stock_delta(StockTransactionType::Adjustment, amount);
            let back = up + stock_delta(StockTransactionType::Adjustment, -amount);

            prop_assert_eq!(back, start);
        }

        /// Low-stock detection matches the threshold comparison exactly
        #[test]
        fn prop_low_stock_detection(
            on_hand in quantity_strategy(),
            reorder_level in quantity_strategy()
        ) {
            let flagged = on_hand <= reorder_level;
            prop_assert_eq!(flagged, !(on_hand > reorder_level));
        }
    }
}
