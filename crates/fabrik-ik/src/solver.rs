//! FABRIK (Forward And Backward Reaching Inverse Kinematics) solver.
//!
//! Alternates a backward pass that pins the tip to the target with a
//! forward pass that re-pins the base, until the end effector is within
//! the margin of error or the iteration budget runs out. Every pass step
//! places a joint exactly one segment length from its neighbour, so the
//! length invariant holds after each pass; only target proximity is
//! approximate.

use nalgebra::{Point2, Vector2};
use tracing::{debug, trace};

use fabrik_core::{ConfigError, SolverConfig};

use crate::chain::Chain;

/// Spans at or below this norm have no usable direction.
const DEGENERATE_NORM: f64 = 1e-12;

/// Outcome of a single [`FabrikSolver::solve`] call.
///
/// `reached == false` with `iterations_used == 0` means the target was out
/// of reach and the chain was stretched toward it. `reached == false` with
/// `iterations_used == max_iterations` means the budget ran out. Both leave
/// the chain in a length-valid pose.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolveResult {
    /// Whether the end effector ended within the margin of error.
    pub reached: bool,
    /// Backward/forward pass pairs performed.
    pub iterations_used: u32,
    /// Final distance between end effector and target.
    pub distance_to_target: f64,
}

/// FABRIK solver. Holds only its configuration; all state lives in the
/// [`Chain`] passed to [`solve`](Self::solve).
#[derive(Debug, Clone)]
pub struct FabrikSolver {
    config: SolverConfig,
}

impl FabrikSolver {
    /// Create a new solver with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if the margin is not finite and positive or
    /// the iteration budget is zero.
    pub fn new(config: SolverConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Create a solver with default configuration (margin 2.0, 100 iterations).
    pub fn with_defaults() -> Self {
        Self {
            config: SolverConfig::default(),
        }
    }

    pub const fn config(&self) -> &SolverConfig {
        &self.config
    }

    /// Move `chain` so its end effector tracks `target`.
    ///
    /// Unreachable targets stretch the chain in a straight line toward the
    /// target without iterating. Otherwise the solver returns immediately if
    /// the end effector is already within the margin, and iterates pass
    /// pairs up to `max_iterations` if not.
    pub fn solve(&self, chain: &mut Chain, target: Point2<f64>) -> SolveResult {
        let margin = self.config.margin_of_error;
        let base_distance = nalgebra::distance(&chain.base(), &target);
        let total_reach = chain.total_reach();

        if base_distance > total_reach {
            stretch_toward(chain, target);
            let distance_to_target = nalgebra::distance(&chain.end_effector(), &target);
            debug!(
                base_distance,
                total_reach, distance_to_target, "target out of reach, chain stretched"
            );
            return SolveResult {
                reached: false,
                iterations_used: 0,
                distance_to_target,
            };
        }

        let mut error = nalgebra::distance(&chain.end_effector(), &target);
        if error <= margin {
            trace!(error, "already within margin");
            return SolveResult {
                reached: true,
                iterations_used: 0,
                distance_to_target: error,
            };
        }

        let (base, joints, lengths) = chain.parts_mut();
        let mut directions = segment_directions(joints);

        for iteration in 1..=self.config.max_iterations {
            backward_pass(joints, lengths, target, &mut directions);
            forward_pass(joints, lengths, base, &mut directions);

            error = nalgebra::distance(&joints[joints.len() - 1], &target);
            trace!(iteration, error, "pass pair complete");

            if error <= margin {
                debug!(iterations = iteration, error, "target reached");
                return SolveResult {
                    reached: true,
                    iterations_used: iteration,
                    distance_to_target: error,
                };
            }
        }

        debug!(
            iterations = self.config.max_iterations,
            error, "iteration budget exhausted"
        );
        SolveResult {
            reached: false,
            iterations_used: self.config.max_iterations,
            distance_to_target: error,
        }
    }
}

/// Lay the chain out in a straight line from the base toward `target`.
fn stretch_toward(chain: &mut Chain, target: Point2<f64>) {
    let (base, joints, lengths) = chain.parts_mut();
    joints[0] = base;
    for (i, &length) in lengths.iter().enumerate() {
        let direction = (target - joints[i])
            .try_normalize(DEGENERATE_NORM)
            .unwrap_or_else(Vector2::x);
        joints[i + 1] = joints[i] + direction * length;
    }
}

/// Unit base-to-tip direction of every segment in the starting pose.
///
/// Used as the fallback when a pass meets coincident points before it has
/// computed a direction of its own for that segment.
fn segment_directions(joints: &[Point2<f64>]) -> Vec<Vector2<f64>> {
    joints
        .windows(2)
        .map(|pair| {
            (pair[1] - pair[0])
                .try_normalize(DEGENERATE_NORM)
                .unwrap_or_else(Vector2::x)
        })
        .collect()
}

/// Tip to base: pin the tip on the target, then place each joint one
/// segment length from its successor. Breaks the base anchor.
fn backward_pass(
    joints: &mut [Point2<f64>],
    lengths: &[f64],
    target: Point2<f64>,
    directions: &mut [Vector2<f64>],
) {
    let n = lengths.len();
    joints[n] = target;
    for i in (0..n).rev() {
        // Points from the new joint i+1 back toward the old joint i.
        let toward_base = match (joints[i] - joints[i + 1]).try_normalize(DEGENERATE_NORM) {
            Some(unit) => {
                directions[i] = -unit;
                unit
            }
            None => -directions[i],
        };
        joints[i] = joints[i + 1] + toward_base * lengths[i];
    }
}

/// Base to tip: re-pin the base, then place each joint one segment length
/// from its predecessor. Restores the anchor exactly.
fn forward_pass(
    joints: &mut [Point2<f64>],
    lengths: &[f64],
    base: Point2<f64>,
    directions: &mut [Vector2<f64>],
) {
    joints[0] = base;
    for i in 1..joints.len() {
        let toward_tip = match (joints[i] - joints[i - 1]).try_normalize(DEGENERATE_NORM) {
            Some(unit) => {
                directions[i - 1] = unit;
                unit
            }
            None => directions[i - 1],
        };
        joints[i] = joints[i - 1] + toward_tip * lengths[i - 1];
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
