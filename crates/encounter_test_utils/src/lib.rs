//! # Encounter Test Utilities
//!
//! Shared testing utilities for all crates:
//! - Settings, scene and contract fixtures
//! - A deterministic stub unit generator
//! - Seeded build determinism harness
//! - Property-based testing strategies

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod determinism;
pub mod fixtures;
pub mod strategies;

/// Re-export proptest for convenience.
pub use proptest;
