//! Pricing Simulator — unit-economics pricing and competitor benchmarking.
//!
//! Library crate exposing all modules for use by integration tests
//! and the binary entry point.

pub mod competitors;
pub mod config;
pub mod dashboard;
pub mod pricing;
pub mod types;
