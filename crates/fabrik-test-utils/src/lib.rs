//! Shared test fixtures and utilities for the FABRIK crates.
//!
//! Provides the reference arms used across tests, invariant assertions, and
//! deterministic RNG setup for randomized targets.

pub mod arm;
pub mod invariants;
pub mod rng;

// ---------------------------------------------------------------------------
// Re-exports for convenience
// ---------------------------------------------------------------------------

pub use arm::{LENGTH_TOLERANCE, REFERENCE_LENGTHS, reference_arm, reference_arm_config, straight_arm};
pub use invariants::{assert_base_anchored, assert_lengths_preserved};
pub use rng::{random_target, seeded_rng};
