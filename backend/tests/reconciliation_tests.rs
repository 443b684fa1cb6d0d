//! Cash reconciliation tests
//!
//! Covers variance computation and its classification into
//! balanced, overage, and shortage.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;

use shared::{classify_variance, VarianceClassification};

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

    /// Exact match is balanced
    #[test]
    fn test_balanced() {
        let expected = dec("15230.50");
        let actual = dec("15230.50");

        assert_eq!(
            classify_variance(actual - expected),
            VarianceClassification::Balanced
        );
    }

    /// Counting more cash than expected is an overage
    #[test]
    fn test_overage() {
        let variance = dec("15250.00") - dec("15230.50");

        assert_eq!(variance, dec("19.50"));
        assert_eq!(classify_variance(variance), VarianceClassification::Overage);
    }

    /// Counting less cash than expected is a shortage
    #[test]
    fn test_shortage() {
        let variance = dec("15200.00") - dec("15230.50");

        assert_eq!(variance, dec("-30.50"));
        assert_eq!(classify_variance(variance), VarianceClassification::Shortage);
    }

    /// A single centavo off is not balanced
    #[test]
    fn test_centavo_sensitivity() {
        assert_eq!(
            classify_variance(dec("0.01")),
            VarianceClassification::Overage
        );
        assert_eq!(
            classify_variance(dec("-0.01")),
            VarianceClassification::Shortage
        );
    }

    /// A shift with no transactions expects zero
    #[test]
    fn test_empty_shift() {
        let expected = Decimal::ZERO;
        let actual = Decimal::ZERO;

        assert_eq!(
            classify_variance(actual - expected),
            VarianceClassification::Balanced
        );
    }

    /// Classification round-trips through its string form
    #[test]
    fn test_classification_round_trip() {
        use VarianceClassification::*;

        for c in [Balanced, Overage, Shortage] {
            assert_eq!(VarianceClassification::from_str(c.as_str()), Some(c));
        }
        assert_eq!(VarianceClassification::from_str("unknown"), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating cash amounts (0.00 to 100000.00)
    fn amount_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=10_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Classification matches the sign of the variance
        #[test]
        fn prop_classification_matches_sign(
            expected in amount_strategy(),
            actual in amount_strategy()
        ) {
            let variance = actual - expected;
            let classification = classify_variance(variance);

            if variance > Decimal::ZERO {
                prop_assert_eq!(classification, VarianceClassification::Overage);
            } else if variance < Decimal::ZERO {
                prop_assert_eq!(classification, VarianceClassification::Shortage);
            } else {
                prop_assert_eq!(classification, VarianceClassification::Balanced);
            }
        }

        /// Variance of an amount against itself is always balanced
        #[test]
        fn prop_self_comparison_balanced(amount in amount_strategy()) {
            prop_assert_eq!(
                classify_variance(amount - amount),
                VarianceClassification::Balanced
            );
        }

        /// Swapping expected and actual flips overage and shortage
        #[test]
        fn prop_swap_flips_classification(
            expected in amount_strategy(),
            actual in amount_strategy()
        ) {
            let forward = classify_variance(actual - expected);
            let reverse = classify_variance(expected - actual);

            match forward {
                VarianceClassification::Overage => {
                    prop_assert_eq!(reverse, VarianceClassification::Shortage)
                }
                VarianceClassification::Shortage => {
                    prop_assert_eq!(reverse, VarianceClassification::Overage)
                }
                VarianceClassification::Balanced => {
                    prop_assert_eq!(reverse, VarianceClassification::Balanced)
                }
            }
        }
    }
}
