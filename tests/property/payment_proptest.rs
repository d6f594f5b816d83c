//! Property-based tests for payment link extraction

use partytrailer::backend::booqable::payment::{find_payment_url, MAX_SCAN_DEPTH};
use proptest::prelude::*;
use serde_json::{json, Value};

/// Wrap `inner` in `depth` alternating object/array layers with filler siblings
fn nest(inner: Value, layers: &[(bool, String)]) -> Value {
    layers.iter().fold(inner, |acc, (as_array, filler)| {
        if *as_array {
            json!([filler, acc])
        } else {
            json!({ "note": filler, "child": acc })
        }
    })
}

proptest! {
    #[test]
    fn test_deep_scan_finds_nested_link(
        slug in "[a-z0-9]{1,12}",
        layers in prop::collection::vec((any::<bool>(), "[a-z ]{0,10}"), 0..MAX_SCAN_DEPTH - 1),
    ) {
        let link = format!("https://pay.example.com/{slug}");
        let body = nest(json!({ "href": link.clone() }), &layers);
        prop_assert_eq!(find_payment_url(&body), Some(link));
    }

    #[test]
    fn test_known_field_beats_deep_scan(slug in "[a-z0-9]{1,12}") {
        let body = json!({
            "meta": { "docs": "https://docs.example.com" },
            "invoice": { "payment_url": format!("https://pay.example.com/{slug}") }
        });
        prop_assert_eq!(find_payment_url(&body), Some(format!("https://pay.example.com/{slug}")));
    }

    #[test]
    fn test_no_url_no_link(words in prop::collection::vec("[a-z/. ]{0,16}", 0..8)) {
        let body = json!({ "data": { "words": words } });
        prop_assert_eq!(find_payment_url(&body), None);
    }
}
