//! Reference arms.

use nalgebra::Point2;

use fabrik_core::{ArmConfig, SegmentConfig};
use fabrik_ik::Chain;

/// Segment lengths of the reference shoulder/elbow/wrist arm.
pub const REFERENCE_LENGTHS: [f64; 3] = [150.0, 120.0, 100.0];

/// Tolerance for segment-length checks after a solve.
pub const LENGTH_TOLERANCE: f64 = 1e-6;

/// Straight chain along +x from `base` with the given lengths.
///
/// # Panics
///
/// Panics if any length is not positive.
pub fn straight_arm(base: Point2<f64>, lengths: &[f64]) -> Chain {
    let mut chain = Chain::new(base);
    for &length in lengths {
        chain
            .add_segment(length, 0.0)
            .expect("fixture lengths must be positive");
    }
    chain
}

/// The reference arm (150, 120, 100) lying straight along +x from the origin.
pub fn reference_arm() -> Chain {
    straight_arm(Point2::origin(), &REFERENCE_LENGTHS)
}

/// [`ArmConfig`] matching [`reference_arm`].
pub fn reference_arm_config() -> ArmConfig {
    ArmConfig {
        base: [0.0, 0.0],
        segments: REFERENCE_LENGTHS
            .iter()
            .map(|&length| SegmentConfig::new(length, 0.0))
            .collect(),
    }
}
