//! Planar kinematic chain anchored at a fixed base.
//!
//! A [`Chain`] is an ordered list of rigid segments from the base to the
//! end effector. It owns the segment lengths and the current joint
//! positions; the solver rewrites the positions in place.

use nalgebra::{Point2, Vector2};

use fabrik_core::{ArmConfig, ChainError};

/// An ordered planar chain from a fixed base to a free end effector.
///
/// `joints` always holds one more point than there are segments:
/// `joints[0]` is the base and `joints[n]` is the end effector.
#[derive(Debug, Clone, PartialEq)]
pub struct Chain {
    base: Point2<f64>,
    joints: Vec<Point2<f64>>,
    segment_lengths: Vec<f64>,
}

impl Chain {
    /// Create an empty chain anchored at `base`.
    pub fn new(base: Point2<f64>) -> Self {
        Self {
            base,
            joints: vec![base],
            segment_lengths: Vec::new(),
        }
    }

    /// Build a chain from an [`ArmConfig`], appending its segments in order.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidSegment`] for the first segment whose
    /// length is not finite and positive.
    pub fn from_config(config: &ArmConfig) -> Result<Self, ChainError> {
        let mut chain = Self::new(Point2::new(config.base[0], config.base[1]));
        for segment in &config.segments {
            chain.add_segment(segment.length, segment.angle_rad())?;
        }
        Ok(chain)
    }

    /// Append a segment at the tip.
    ///
    /// The new joint is placed `length` away from the current tip along
    /// `initial_angle` (radians from +x). The angle only shapes the starting
    /// pose; the solver never reads it.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError::InvalidSegment`] if `length` is not finite and
    /// positive, or [`ChainError::InvalidAngle`] if `initial_angle` is not
    /// finite. The chain is left unmodified on error.
    pub fn add_segment(&mut self, length: f64, initial_angle: f64) -> Result<(), ChainError> {
        let index = self.segment_count();
        if !length.is_finite() || length <= 0.0 {
            return Err(ChainError::InvalidSegment { index, length });
        }
        if !initial_angle.is_finite() {
            return Err(ChainError::InvalidAngle {
                index,
                angle: initial_angle,
            });
        }

        let (sin, cos) = initial_angle.sin_cos();
        let tip = self.end_effector();
        self.joints.push(tip + Vector2::new(cos, sin) * length);
        self.segment_lengths.push(length);
        Ok(())
    }

    /// The fixed base point.
    pub const fn base(&self) -> Point2<f64> {
        self.base
    }

    /// The free tip of the chain. For an empty chain this is the base.
    pub fn end_effector(&self) -> Point2<f64> {
        self.joints[self.joints.len() - 1]
    }

    /// Owned snapshot of every joint position, base first.
    pub fn joint_positions(&self) -> Vec<Point2<f64>> {
        self.joints.clone()
    }

    /// Borrowed view of the joint positions.
    pub fn joints(&self) -> &[Point2<f64>] {
        &self.joints
    }

    pub fn segment_lengths(&self) -> &[f64] {
        &self.segment_lengths
    }

    /// Number of segments.
    pub const fn segment_count(&self) -> usize {
        self.segment_lengths.len()
    }

    pub const fn is_empty(&self) -> bool {
        self.segment_lengths.is_empty()
    }

    /// Sum of all segment lengths. Derived on every call so it cannot drift
    /// from the segment list.
    pub fn total_reach(&self) -> f64 {
        self.segment_lengths.iter().sum()
    }

    /// Whether `target` lies within `total_reach` of the base.
    pub fn is_reachable(&self, target: Point2<f64>) -> bool {
        nalgebra::distance(&self.base, &target) <= self.total_reach()
    }

    /// Absolute deviation of each segment's current span from its length.
    pub fn segment_length_errors(&self) -> Vec<f64> {
        self.joints
            .windows(2)
            .zip(&self.segment_lengths)
            .map(|(pair, &length)| (nalgebra::distance(&pair[0], &pair[1]) - length).abs())
            .collect()
    }

    /// Base, mutable joints and lengths, borrowed together for the solver.
    pub(crate) fn parts_mut(&mut self) -> (Point2<f64>, &mut [Point2<f64>], &[f64]) {
        (self.base, &mut self.joints, &self.segment_lengths)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
