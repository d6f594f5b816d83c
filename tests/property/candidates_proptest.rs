//! Property-based tests for candidate enumeration order

use partytrailer::backend::booqable::candidates::{AuthScheme, CandidateSpace, Credentials};
use partytrailer::backend::booqable::prober::{probe_candidates, ProbeParams, ResourceKind};
use proptest::prelude::*;

fn kinds() -> impl Strategy<Value = ResourceKind> {
    prop_oneof![
        Just(ResourceKind::Reservations),
        Just(ResourceKind::Products),
        Just(ResourceKind::InventoryItems),
    ]
}

proptest! {
    #[test]
    fn test_enumeration_is_base_auth_path(base_count in 1usize..4, kind in kinds(), per_page in 1u32..500) {
        let bases: Vec<String> = (0..base_count).map(|n| format!("https://b{n}.example.com")).collect();
        let space = CandidateSpace::new(bases.clone(), Credentials::new("key"));
        let candidates = probe_candidates(&space, kind, ProbeParams::first_page(per_page));
        let paths = kind.paths();

        prop_assert_eq!(candidates.len(), base_count * AuthScheme::ALL.len() * paths.len());
        for (i, candidate) in candidates.iter().enumerate() {
            let path = i % paths.len();
            let auth = (i / paths.len()) % AuthScheme::ALL.len();
            let base = i / (paths.len() * AuthScheme::ALL.len());
            prop_assert_eq!(&candidate.base, &bases[base]);
            prop_assert_eq!(candidate.auth, AuthScheme::ALL[auth]);
            prop_assert_eq!(candidate.path.as_str(), paths[path]);
        }
    }

    #[test]
    fn test_blank_key_yields_no_candidates(blank in "[ \t]{0,4}", kind in kinds()) {
        let space = CandidateSpace::new(vec!["https://b.example.com".to_string()], Credentials::new(blank));
        prop_assert!(probe_candidates(&space, kind, ProbeParams::first_page(1)).is_empty());
    }
}
