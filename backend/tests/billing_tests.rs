//! Billing computation tests
//!
//! Covers the cashier billing pipeline: gross totals, discount and
//! PhilHealth coverage amounts, centavo rounding, change due, and
//! duplicate detection within a test selection.

use proptest::prelude::*;
use rust_decimal::Decimal;
use std::str::FromStr;
use uuid::Uuid;

use shared::{compute_billing, find_duplicate_test, round_centavos};

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

    /// No discount, no coverage: net equals gross
    #[test]
    fn test_plain_billing() {
        let breakdown = compute_billing(
            &[dec("350.00"), dec("150.00")],
            Decimal::ZERO,
            Decimal::ZERO,
        );

        assert_eq!(breakdown.gross_amount, dec("500.00"));
        assert_eq!(breakdown.discount_amount, Decimal::ZERO);
        assert_eq!(breakdown.philhealth_amount, Decimal::ZERO);
        assert_eq!(breakdown.net_amount, dec("500.00"));
    }

    /// Senior citizen discount of 20%
    #[test]
    fn test_senior_discount() {
        let breakdown = compute_billing(&[dec("1000.00")], dec("20"), Decimal::ZERO);

        assert_eq!(breakdown.discount_amount, dec("200.00"));
        assert_eq!(breakdown.net_amount, dec("800.00"));
    }

    /// PhilHealth coverage applies to the discounted base, not the gross
    #[test]
    fn test_coverage_after_discount() {
        // 1000 gross, 20% discount = 200, coverage 30% of 800 = 240
        let breakdown = compute_billing(&[dec("1000.00")], dec("20"), dec("30"));

        assert_eq!(breakdown.gross_amount, dec("1000.00"));
        assert_eq!(breakdown.discount_amount, dec("200.00"));
        assert_eq!(breakdown.philhealth_amount, dec("240.00"));
        assert_eq!(breakdown.net_amount, dec("560.00"));
    }

    /// Discount and coverage amounts round to the centavo
    #[test]
    fn test_centavo_rounding() {
        let breakdown = compute_billing(&[dec("333.33")], dec("20"), Decimal::ZERO);

        // 333.33 * 0.20 = 66.666 -> 66.67 half away from zero
        assert_eq!(breakdown.discount_amount, dec("66.67"));
        assert_eq!(breakdown.net_amount, dec("266.66"));
    }

    /// Full coverage leaves a zero net
    #[test]
    fn test_full_coverage() {
        let breakdown = compute_billing(&[dec("450.00")], Decimal::ZERO, dec("100"));

        assert_eq!(breakdown.philhealth_amount, dec("450.00"));
        assert_eq!(breakdown.net_amount, Decimal::ZERO);
    }

    /// Empty price list produces an all-zero breakdown
    #[test]
    fn test_empty_prices() {
        let breakdown = compute_billing(&[], dec("20"), dec("30"));

        assert_eq!(breakdown.gross_amount, Decimal::ZERO);
        assert_eq!(breakdown.net_amount, Decimal::ZERO);
    }

    /// Change due is paid minus net
    #[test]
    fn test_change_due() {
        let breakdown = compute_billing(&[dec("780.00")], Decimal::ZERO, Decimal::ZERO);
        let paid = dec("1000.00");
        let change = paid - breakdown.net_amount;

        assert_eq!(change, dec("220.00"));
    }

    /// Underpayment is detectable by comparing paid against net
    #[test]
    fn test_underpayment_detection() {
        let breakdown = compute_billing(&[dec("780.00")], Decimal::ZERO, Decimal::ZERO);
        let paid = dec("500.00");

        assert!(paid < breakdown.net_amount);
    }

    /// Rounding half away from zero at the centavo
    #[test]
    fn test_round_centavos() {
        assert_eq!(round_centavos(dec("10.005")), dec("10.01"));
        assert_eq!(round_centavos(dec("10.004")), dec("10.00"));
        assert_eq!(round_centavos(dec("10.995")), dec("11.00"));
    }

    /// A selection of distinct tests passes the duplicate check
    #[test]
    fn test_distinct_selection_accepted() {
        let cbc = Uuid::new_v4();
        let fbs = Uuid::new_v4();
        let urinalysis = Uuid::new_v4();

        assert_eq!(find_duplicate_test(&[cbc, fbs, urinalysis]), None);
        assert_eq!(find_duplicate_test(&[cbc]), None);
    }

    /// The same test twice in one submission is flagged
    #[test]
    fn test_repeated_selection_rejected() {
        let cbc = Uuid::new_v4();
        let fbs = Uuid::new_v4();

        assert_eq!(find_duplicate_test(&[cbc, cbc]), Some(cbc));
        assert_eq!(find_duplicate_test(&[cbc, fbs, fbs]), Some(fbs));
    }

    /// An empty selection has no duplicate (rejected separately as empty)
    #[test]
    fn test_empty_selection_has_no_duplicate() {
        assert_eq!(find_duplicate_test(&[]), None);
    }
}

// ============================================================================
// Property-Based Tests
// ============================================================================

#[cfg(test)]
mod property_tests {
    use super::*;

    /// Strategy for generating catalog prices (0.01 to 10000.00)
    fn price_strategy() -> impl Strategy<Value = Decimal> {
        (1i64..=1_000_000i64).prop_map(|n| Decimal::new(n, 2))
    }

    /// Strategy for generating percentages (0 to 100)
    fn percent_strategy() -> impl Strategy<Value = Decimal> {
        (0i64..=100i64).prop_map(Decimal::from)
    }

    /// Strategy for generating selections of distinct test ids
    fn distinct_ids_strategy() -> impl Strategy<Value = Vec<Uuid>> {
        prop::collection::hash_set(any::<u64>(), 1..10)
            .prop_map(|set| set.into_iter().map(|n| Uuid::from_u64_pair(0, n)).collect())
    }

    proptest! {
        #![proptest_config(ProptestConfig::with_cases(100))]

        /// Gross is the sum of the selected test prices
        #[test]
        fn prop_gross_is_sum_of_prices(
            prices in prop::collection::vec(price_strategy(), 1..10)
        ) {
            let expected: Decimal = prices.iter().sum();
            let breakdown = compute_billing(&prices, Decimal::ZERO, Decimal::ZERO);

            prop_assert_eq!(breakdown.gross_amount, expected);
        }

        /// Breakdown components always reconcile with the net
        #[test]
        fn prop_breakdown_reconciles(
            prices in prop::collection::vec(price_strategy(), 1..10),
            discount in percent_strategy(),
            coverage in percent_strategy()
        ) {
            let breakdown = compute_billing(&prices, discount, coverage);

            prop_assert_eq!(
                breakdown.net_amount,
                breakdown.gross_amount - breakdown.discount_amount - breakdown.philhealth_amount
            );
        }

        /// Net is never negative for percentages within 0..=100
        #[test]
        fn prop_net_never_negative(
            prices in prop::collection::vec(price_strategy(), 1..10),
            discount in percent_strategy(),
            coverage in percent_strategy()
        ) {
            let breakdown = compute_billing(&prices, discount, coverage);

            prop_assert!(breakdown.net_amount >= Decimal::ZERO);
        }

        /// Discount never exceeds the gross
        #[test]
        fn prop_discount_bounded_by_gross(
            prices in prop::collection::vec(price_strategy(), 1..10),
            discount in percent_strategy()
        ) {
            let breakdown = compute_billing(&prices, discount, Decimal::ZERO);

            prop_assert!(breakdown.discount_amount <= breakdown.gross_amount);
        }

        /// A higher discount never increases the net
        #[test]
        fn prop_discount_monotonic(
            prices in prop::collection::vec(price_strategy(), 1..10),
            low in 0i64..=50,
            bump in 0i64..=50
        ) {
            let low_pct = Decimal::from(low);
            let high_pct = Decimal::from(low + bump);

            let lower = compute_billing(&prices, low_pct, Decimal::ZERO);
            let higher = compute_billing(&prices, high_pct, Decimal::ZERO);

            prop_assert!(higher.net_amount <= lower.net_amount);
        }

        /// Amounts are always rounded to at most two decimal places
        #[test]
        fn prop_amounts_centavo_scale(
            prices in prop::collection::vec(price_strategy(), 1..10),
            discount in percent_strategy(),
            coverage in percent_strategy()
        ) {
            let breakdown = compute_billing(&prices, discount, coverage);

            prop_assert!(breakdown.discount_amount.scale() <= 2);
            prop_assert!(breakdown.philhealth_amount.scale() <= 2);
        }

        /// Distinct selections never trip the duplicate check
        #[test]
        fn prop_distinct_selection_no_duplicate(ids in distinct_ids_strategy()) {
            prop_assert!(find_duplicate_test(&ids).is_none());
        }

        /// Repeating any id in a selection is always detected
        #[test]
        fn prop_repeated_id_detected(
            ids in distinct_ids_strategy(),
            pick in any::<prop::sample::Index>()
        ) {
            let repeat = *pick.get(&ids);
            let mut with_dup = ids.clone();
            with_dup.push(repeat);

            prop_assert_eq!(find_duplicate_test(&with_dup), Some(repeat));
        }
    }
}
