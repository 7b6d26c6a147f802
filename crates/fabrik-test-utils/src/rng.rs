//! Deterministic RNG utilities for reproducible tests.

use nalgebra::Point2;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;

/// Create a deterministic `ChaCha8Rng` from a seed.
///
/// All test randomization should go through this to ensure reproducibility.
pub fn seeded_rng(seed: u64) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed)
}

/// Random point at a distance in `[min_radius, max_radius)` from `center`.
pub fn random_target<R: Rng>(
    rng: &mut R,
    center: Point2<f64>,
    min_radius: f64,
    max_radius: f64,
) -> Point2<f64> {
    let angle = rng.gen_range(-std::f64::consts::PI..std::f64::consts::PI);
    let radius = rng.gen_range(min_radius..max_radius);
    center + nalgebra::Vector2::new(angle.cos(), angle.sin()) * radius
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
