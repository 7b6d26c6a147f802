//! Invariant and convergence checks for the FABRIK solver across many targets.

use approx::assert_relative_eq;
use nalgebra::{Point2, Vector2};

use fabrik_core::SolverConfig;
use fabrik_ik::{Chain, FabrikSolver};
use fabrik_test_utils::{
    LENGTH_TOLERANCE, assert_base_anchored, assert_lengths_preserved, random_target,
    reference_arm, seeded_rng, straight_arm,
};

// ---------------------------------------------------------------------------
// Reference scenario: lengths {150, 120, 100}, base (0, 0), margin 2
// ---------------------------------------------------------------------------

#[test]
fn reference_full_reach_target() {
    let mut chain = reference_arm();
    let result = FabrikSolver::with_defaults().solve(&mut chain, Point2::new(370.0, 0.0));

    assert!(result.reached);
    assert_eq!(result.iterations_used, 0);
    assert_eq!(chain.joints()[1], Point2::new(150.0, 0.0));
    assert_eq!(chain.joints()[2], Point2::new(270.0, 0.0));
    assert_eq!(chain.joints()[3], Point2::new(370.0, 0.0));
}

#[test]
fn reference_unreachable_target() {
    let mut chain = reference_arm();
    let result = FabrikSolver::with_defaults().solve(&mut chain, Point2::new(1000.0, 0.0));

    assert!(!result.reached);
    assert_eq!(result.iterations_used, 0);
    assert_relative_eq!(chain.end_effector().x, 370.0, epsilon = 1e-9);
    assert_relative_eq!(chain.end_effector().y, 0.0, epsilon = 1e-9);
}

#[test]
fn reference_reachable_target() {
    let mut chain = reference_arm();
    let target = Point2::new(50.0, 50.0);
    let result = FabrikSolver::with_defaults().solve(&mut chain, target);

    assert!(result.reached);
    assert!(result.iterations_used < 20, "took {}", result.iterations_used);
    assert!(nalgebra::distance(&chain.end_effector(), &target) <= 2.0);
}

// ---------------------------------------------------------------------------
// Invariants
// ---------------------------------------------------------------------------

#[test]
fn invariants_hold_for_random_target_sequence() {
    let solver = FabrikSolver::with_defaults();
    let mut chain = reference_arm();
    let mut rng = seeded_rng(0xFAB);

    for _ in 0..500 {
        // Mix of reachable and out-of-reach targets.
        let target = random_target(&mut rng, chain.base(), 0.0, 600.0);
        let result = solver.solve(&mut chain, target);

        assert_lengths_preserved(&chain, LENGTH_TOLERANCE);
        assert_base_anchored(&chain);
        if result.reached {
            assert!(result.distance_to_target <= 2.0);
        } else {
            assert!(result.iterations_used == 0 || result.iterations_used == 100);
        }
    }
}

#[test]
fn unreachable_stretch_is_exact() {
    let solver = FabrikSolver::with_defaults();
    let mut rng = seeded_rng(11);
    let base = Point2::new(500.0, 350.0);

    for _ in 0..100 {
        let mut chain = straight_arm(base, &[150.0, 120.0, 100.0]);
        let target = random_target(&mut rng, base, 371.0, 2000.0);
        let base_distance = nalgebra::distance(&base, &target);

        let result = solver.solve(&mut chain, target);
        assert!(!result.reached);
        assert_eq!(result.iterations_used, 0);
        assert_relative_eq!(
            result.distance_to_target,
            base_distance - chain.total_reach(),
            epsilon = 1e-6
        );

        let unit: Vector2<f64> = (target - base) / base_distance;
        let mut cumulative = 0.0;
        for (i, &length) in chain.segment_lengths().iter().enumerate() {
            cumulative += length;
            let expected = base + unit * cumulative;
            let joint = chain.joints()[i + 1];
            assert_relative_eq!(joint.x, expected.x, epsilon = 1e-6);
            assert_relative_eq!(joint.y, expected.y, epsilon = 1e-6);
        }
    }
}

#[test]
fn full_reach_from_offset_base_needs_no_iterations() {
    let base = Point2::new(500.0, 350.0);
    let mut chain = straight_arm(base, &[150.0, 120.0, 100.0]);
    let before = chain.joint_positions();

    let result = FabrikSolver::with_defaults().solve(&mut chain, Point2::new(870.0, 350.0));
    assert!(result.reached);
    assert_eq!(result.iterations_used, 0);
    assert_eq!(chain.joint_positions(), before);
}

#[test]
fn converged_solve_is_idempotent() {
    let solver = FabrikSolver::with_defaults();
    let targets = [
        Point2::new(50.0, 50.0),
        Point2::new(0.0, 200.0),
        Point2::new(100.0, -250.0),
        Point2::new(300.0, 100.0),
    ];

    for target in targets {
        let mut chain = reference_arm();
        assert!(solver.solve(&mut chain, target).reached);
        let settled = chain.joint_positions();

        let again = solver.solve(&mut chain, target);
        assert!(again.reached);
        assert_eq!(again.iterations_used, 0);
        assert_eq!(chain.joint_positions(), settled);
    }
}

// ---------------------------------------------------------------------------
// Convergence
// ---------------------------------------------------------------------------

/// Off-axis targets in the half-plane the straight arm points into.
fn forward_grid(reach: f64, min_distance: f64) -> Vec<Point2<f64>> {
    let mut targets = Vec::new();
    for x in (0..=370).step_by(10) {
        for y in (-370..=370).step_by(10) {
            if y == 0 {
                continue;
            }
            let target = Point2::new(f64::from(x), f64::from(y));
            let d = nalgebra::distance(&Point2::origin(), &target);
            if d >= min_distance && d <= reach {
                targets.push(target);
            }
        }
    }
    targets
}

#[test]
fn reachable_grid_converges_from_rest() {
    let solver = FabrikSolver::with_defaults();
    for target in forward_grid(370.0, 20.0) {
        let mut chain = reference_arm();
        let result = solver.solve(&mut chain, target);
        assert!(
            result.reached,
            "target ({}, {}) not reached: {result:?}",
            target.x, target.y
        );
        assert_lengths_preserved(&chain, LENGTH_TOLERANCE);
    }
}

#[test]
fn five_segment_arm_converges() {
    let lengths = [80.0, 60.0, 40.0, 30.0, 20.0];
    let solver = FabrikSolver::with_defaults();

    for target in forward_grid(230.0, 46.0) {
        let mut chain = straight_arm(Point2::origin(), &lengths);
        let result = solver.solve(&mut chain, target);
        assert!(
            result.reached,
            "target ({}, {}) not reached: {result:?}",
            target.x, target.y
        );
        assert_base_anchored(&chain);
    }
}

#[test]
fn tracks_target_moving_on_circles() {
    let solver = FabrikSolver::with_defaults();

    for radius in [100.0, 250.0, 350.0] {
        let mut chain = reference_arm();
        for step in 0..72_u32 {
            let angle = (2.5 + 5.0 * f64::from(step)).to_radians();
            let target = Point2::new(radius * angle.cos(), radius * angle.sin());
            let result = solver.solve(&mut chain, target);
            assert!(result.reached, "radius {radius}, step {step}: {result:?}");
            assert_lengths_preserved(&chain, LENGTH_TOLERANCE);
        }
    }
}

#[test]
fn appending_after_solving_keeps_solver_working() {
    let solver = FabrikSolver::with_defaults();
    let mut chain = reference_arm();
    assert!(solver.solve(&mut chain, Point2::new(50.0, 50.0)).reached);

    chain.add_segment(60.0, 0.3).unwrap();
    assert_eq!(chain.joints().len(), 5);
    assert_relative_eq!(chain.total_reach(), 430.0);
    assert_lengths_preserved(&chain, LENGTH_TOLERANCE);

    let result = solver.solve(&mut chain, Point2::new(0.0, 420.0));
    assert!(result.reached);
    assert_lengths_preserved(&chain, LENGTH_TOLERANCE);
    assert_base_anchored(&chain);
}

#[test]
fn solver_config_flows_into_result() {
    let solver = FabrikSolver::new(SolverConfig::default().with_max_iterations(1)).unwrap();
    let mut chain: Chain = reference_arm();
    let result = solver.solve(&mut chain, Point2::new(-100.0, 0.0));
    assert!(!result.reached);
    assert_eq!(result.iterations_used, 1);
}
