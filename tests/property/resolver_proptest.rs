//! Property-based tests for product resolution precedence

use partytrailer::backend::booqable::resolver::{Product, ProductIndex};
use proptest::prelude::*;

fn product(id: usize, name: &str, sku: &str) -> Product {
    Product {
        id: format!("p-{id}"),
        name: name.to_string(),
        sku: sku.to_string(),
    }
}

proptest! {
    #[test]
    fn test_sku_match_beats_name_match(term in "[a-z]{3,10}", decoys in 0usize..5) {
        let mut products: Vec<Product> = (0..decoys)
            .map(|n| product(n, &format!("{term} deluxe {n}"), &format!("X-{n}")))
            .collect();
        products.push(product(100, &term, "NAME-ONLY"));
        products.push(product(200, "Unrelated", &term.to_uppercase()));
        let index = ProductIndex::new(products);

        let found = index.resolve(&[term.as_str()]).map(|p| p.id.clone());
        prop_assert_eq!(found, Some("p-200".to_string()));
    }

    #[test]
    fn test_equal_matches_resolve_in_listing_order(term in "[a-z]{3,10}", copies in 2usize..6) {
        let products: Vec<Product> = (0..copies).map(|n| product(n, &format!("Big {term}"), "")).collect();
        let index = ProductIndex::new(products);

        let found = index.resolve(&[term.as_str()]).map(|p| p.id.clone());
        prop_assert_eq!(found, Some("p-0".to_string()));
    }
}
