//! Property-based tests for amount handling

use partytrailer::backend::booqable::email::format_usd;
use partytrailer::backend::booqable::status::normalize_amount_cents;
use proptest::prelude::*;
use serde_json::json;

proptest! {
    #[test]
    fn test_integer_amounts_are_cents(cents in 1i64..10_000_000_000) {
        prop_assert_eq!(normalize_amount_cents(Some(&json!(cents))).unwrap(), cents);
    }

    #[test]
    fn test_decimal_strings_are_dollars(dollars in 0u32..1_000_000, minor in 0u32..100) {
        prop_assume!(dollars > 0 || minor > 0);
        let raw = format!("{dollars}.{minor:02}");
        let expected = i64::from(dollars) * 100 + i64::from(minor);
        prop_assert_eq!(normalize_amount_cents(Some(&json!(raw))).unwrap(), expected);
    }

    #[test]
    fn test_non_positive_amounts_are_rejected(cents in -10_000_000i64..=0) {
        prop_assert!(normalize_amount_cents(Some(&json!(cents))).is_err());
    }

    #[test]
    fn test_format_usd_reads_back(cents in -10_000_000_000i64..10_000_000_000) {
        let rendered = format_usd(cents);
        let digits: String = rendered.chars().filter(|c| c.is_ascii_digit()).collect();
        prop_assert_eq!(digits.parse::<i64>().unwrap(), cents.abs());
        prop_assert_eq!(rendered.starts_with('-'), cents < 0);
        prop_assert_eq!(rendered.split('.').nth(1).map(str::len), Some(2));
    }
}
