//! Seedable randomness shared by every generation and simulation step
//!
//! Nothing in the crate touches thread-local randomness: callers hold one
//! [`GameRng`] and pass it down, so a seed fully determines a run.

use glam::Vec3;
use rand::Rng;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rand_distr::StandardNormal;

/// Generator used throughout the crate
pub type GameRng = ChaCha8Rng;

/// Create a generator from a configuration seed
pub fn seeded(seed: u32) -> GameRng {
    ChaCha8Rng::seed_from_u64(seed as u64)
}

/// Uniformly distributed point on the unit sphere
pub fn random_unit_vector(rng: &mut GameRng) -> Vec3 {
    // Uniform in z and longitude gives a uniform area distribution
    let z: f32 = rng.gen_range(-1.0..=1.0);
    let theta: f32 = rng.gen_range(0.0..std::f32::consts::TAU);
    let r = (1.0 - z * z).max(0.0).sqrt();
    Vec3::new(r * theta.cos(), r * theta.sin(), z)
}

/// Any unit vector perpendicular to `v`, chosen at random
pub fn random_perpendicular(rng: &mut GameRng, v: Vec3) -> Vec3 {
    for _ in 0..8 {
        let candidate = v.cross(random_unit_vector(rng));
        if candidate.length_squared() > 1e-6 {
            return candidate.normalize();
        }
    }
    v.any_orthonormal_vector()
}

/// Gaussian sample with mean 0, scaled so that ±3σ spans `range`
///
/// The standard normal draw is clamped to ±3 before scaling, so the result
/// always lies within `[-range, range]`.
pub fn clamped_gaussian(rng: &mut GameRng, range: f64) -> f64 {
    if range <= 0.0 {
        return 0.0;
    }
    let z: f64 = rng.sample(StandardNormal);
    z.clamp(-3.0, 3.0) * range / 3.0
}
