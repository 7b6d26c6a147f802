//! Bevy ECS integration for the FABRIK solver.
//!
//! Provides [`FabrikPlugin`] which adds a solve system that reads each
//! registered arm's goal and rewrites its joint positions every frame.
//!
//! # Usage
//!
//! 1. Add [`FabrikPlugin`] to your app.
//! 2. Register an arm with [`ArmRegistry::insert`] or
//!    [`ArmRegistry::build_and_insert`].
//! 3. Set a goal with [`ArmRegistry::set_goal`] whenever the target moves.
//! 4. After `app.update()`, read [`ArmEntry::chain`] for drawing and
//!    [`ArmEntry::last_result`] to colour the target marker.

use std::collections::BTreeMap;

use bevy::prelude::*;
use nalgebra::Point2;
use tracing::{debug, warn};

use fabrik_core::{ArmConfig, ArmId, ChainError, FabrikError, SolverConfig};

use crate::chain::Chain;
use crate::solver::{FabrikSolver, SolveResult};

/// Bevy plugin that solves every arm with an active goal once per frame.
pub struct FabrikPlugin;

impl Plugin for FabrikPlugin {
    fn build(&self, app: &mut App) {
        app.init_resource::<ArmRegistry>()
            .init_resource::<SolverConfig>()
            .add_systems(Update, fabrik_solve_system);
    }
}

/// One arm: its chain, current goal and the outcome of the latest solve.
#[derive(Debug, Clone)]
pub struct ArmEntry {
    pub chain: Chain,
    /// Current target. `None` leaves the arm where it is.
    pub goal: Option<Point2<f64>>,
    /// Result of the most recent solve, if any.
    pub last_result: Option<SolveResult>,
}

impl ArmEntry {
    pub const fn new(chain: Chain) -> Self {
        Self {
            chain,
            goal: None,
            last_result: None,
        }
    }
}

/// Resource mapping [`ArmId`] to arm data.
///
/// Ordered by id so arms are solved in a stable order.
#[derive(Resource, Debug, Default)]
pub struct ArmRegistry {
    arms: BTreeMap<ArmId, ArmEntry>,
}

impl ArmRegistry {
    /// Insert a pre-built chain for an arm, replacing any previous entry.
    pub fn insert(&mut self, arm_id: ArmId, chain: Chain) {
        self.arms.insert(arm_id, ArmEntry::new(chain));
    }

    /// Build a [`Chain`] from an [`ArmConfig`] and register it.
    ///
    /// # Errors
    ///
    /// Returns [`ChainError`] if the config holds an invalid segment; the
    /// registry is unchanged in that case.
    pub fn build_and_insert(&mut self, arm_id: ArmId, config: &ArmConfig) -> Result<(), ChainError> {
        let chain = Chain::from_config(config)?;
        self.insert(arm_id, chain);
        Ok(())
    }

    /// Set the target for an arm. Returns `false` if the arm is unknown.
    pub fn set_goal(&mut self, arm_id: ArmId, target: Point2<f64>) -> bool {
        match self.arms.get_mut(&arm_id) {
            Some(entry) => {
                entry.goal = Some(target);
                true
            }
            None => false,
        }
    }

    /// Clear the target for an arm (stop solving it).
    pub fn clear_goal(&mut self, arm_id: ArmId) {
        if let Some(entry) = self.arms.get_mut(&arm_id) {
            entry.goal = None;
        }
    }

    /// Remove an arm.
    pub fn remove(&mut self, arm_id: ArmId) -> Option<ArmEntry> {
        self.arms.remove(&arm_id)
    }

    pub fn get(&self, arm_id: ArmId) -> Option<&ArmEntry> {
        self.arms.get(&arm_id)
    }

    pub fn get_mut(&mut self, arm_id: ArmId) -> Option<&mut ArmEntry> {
        self.arms.get_mut(&arm_id)
    }

    pub fn iter(&self) -> impl Iterator<Item = (ArmId, &ArmEntry)> {
        self.arms.iter().map(|(&id, entry)| (id, entry))
    }

    pub fn len(&self) -> usize {
        self.arms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.arms.is_empty()
    }
}

/// System that solves every arm in [`ArmRegistry`] with a goal.
///
/// Solving the same goal on consecutive frames is cheap: once converged the
/// solver returns without iterating. An invalid [`SolverConfig`] resource
/// leaves every arm untouched; the error is logged when the resource changes.
#[allow(clippy::needless_pass_by_value)]
pub fn fabrik_solve_system(mut registry: ResMut<ArmRegistry>, config: Res<SolverConfig>) {
    let solver = match FabrikSolver::new(*config) {
        Ok(solver) => solver,
        Err(err) => {
            if config.is_changed() {
                warn!(%err, "invalid solver config, skipping solve");
            }
            return;
        }
    };

    for (arm_id, entry) in &mut registry.arms {
        let Some(goal) = entry.goal else {
            continue;
        };

        let result = solver.solve(&mut entry.chain, goal);
        if entry.last_result.map(|r| r.reached) != Some(result.reached) {
            debug!(%arm_id, reached = result.reached, "reachability changed");
        }
        entry.last_result = Some(result);
    }
}

/// Convenience: solve an arm without the ECS (for scripted use).
///
/// Builds the chain from `arm`, validates `config`, and solves once toward
/// `target`. Returns the solved chain together with the result.
pub fn solve_arm(
    arm: &ArmConfig,
    target: Point2<f64>,
    config: &SolverConfig,
) -> Result<(Chain, SolveResult), FabrikError> {
    let solver = FabrikSolver::new(*config)?;
    let mut chain = Chain::from_config(arm)?;
    let result = solver.solve(&mut chain, target);
    Ok((chain, result))
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
