//! Test suite for Party Trailer
//!
//! This module organizes all tests

pub mod common;
#[cfg(feature = "ssr")]
pub mod property;
