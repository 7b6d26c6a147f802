//! Assertions for the chain invariants every solve must preserve.

use fabrik_ik::Chain;

/// Assert every segment spans its configured length within `tolerance`.
///
/// # Panics
///
/// Panics naming the first segment that drifted.
pub fn assert_lengths_preserved(chain: &Chain, tolerance: f64) {
    for (i, err) in chain.segment_length_errors().into_iter().enumerate() {
        assert!(
            err <= tolerance,
            "segment {i} length drifted by {err} (tolerance {tolerance})"
        );
    }
}

/// Assert the first joint sits exactly on the base.
///
/// # Panics
///
/// Panics if `joints[0] != base`.
pub fn assert_base_anchored(chain: &Chain) {
    assert_eq!(
        chain.joints()[0],
        chain.base(),
        "joint 0 moved off the base"
    );
}
