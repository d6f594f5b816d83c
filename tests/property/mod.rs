//! Property-based tests
//!
//! Uses proptest to generate random inputs and verify the engine's invariants

pub mod amount_proptest;
pub mod candidates_proptest;
pub mod payment_proptest;
pub mod resolver_proptest;
