//! FABRIK inverse kinematics for planar arms.
//!
//! Provides a planar [`Chain`] of rigid segments anchored at a fixed base,
//! and the [`FabrikSolver`] that drives its end effector toward a target by
//! alternating backward and forward reaching passes.
//!
//! # Architecture
//!
//! ```text
//! ArmConfig ──► Chain ──► FabrikSolver ──► joint positions + reachability
//! ```
//!
//! The [`Chain`] is built once (directly or from an
//! [`ArmConfig`](fabrik_core::ArmConfig)), then mutated in place by every
//! solve. [`FabrikPlugin`] wires the same pieces into a Bevy app.

pub mod chain;
pub mod plugin;
pub mod solver;

pub use chain::Chain;
pub use plugin::{ArmEntry, ArmRegistry, FabrikPlugin, fabrik_solve_system, solve_arm};
pub use solver::{FabrikSolver, SolveResult};
