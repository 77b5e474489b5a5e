//! Jittered golden-spiral lattice on the unit sphere
//!
//! Points climb from the north pole (+Y) to the south pole in even steps of
//! height while turning by the golden angle, which spreads them almost
//! uniformly. Each point is then pushed a random distance along the surface
//! so the hull triangulation does not show the spiral.
//!
//! Pole offsets follow <https://extremelearning.com.au/how-to-evenly-distribute-points-on-a-sphere-more-effectively-than-the-canonical-fibonacci-lattice/>

use std::f32::consts::PI;

use glam::Vec3;
use rand::Rng;

use crate::rng::{random_perpendicular, GameRng};

/// π(3 - √5), the turn between consecutive points
const GOLDEN_ANGLE: f32 = 2.399_963;

/// Largest nudge, as a fraction of the mean point spacing
const JITTER: f32 = 0.5;

/// How far the first and last points sit from the poles, in lattice steps
fn pole_offset(count: usize) -> f32 {
    match count {
        0..=23 => 0.33,
        24..=176 => 1.33,
        177..=889 => 3.33,
        890..=10999 => 10.0,
        _ => 27.5,
    }
}

/// `count` unit vectors, north to south
pub fn lattice_points(count: usize, rng: &mut GameRng) -> Vec<Vec3> {
    if count == 0 {
        return Vec::new();
    }

    let offset = pole_offset(count);
    let span = count as f32 - 1.0 + 2.0 * offset;
    let max_nudge = (4.0 * PI / count as f32).sqrt() * JITTER;

    let mut points = Vec::with_capacity(count);
    for i in 0..count {
        let y = 1.0 - 2.0 * (i as f32 + offset) / span;
        let ring = (1.0 - y * y).max(0.0).sqrt();
        let (sin, cos) = (GOLDEN_ANGLE * i as f32).sin_cos();
        let on_spiral = Vec3::new(ring * cos, y, ring * sin);

        let nudge = random_perpendicular(rng, on_spiral) * rng.gen_range(0.0..max_nudge);
        points.push((on_spiral + nudge).normalize());
    }
    points
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    #[test]
    fn test_points_on_unit_sphere() {
        let points = lattice_points(500, &mut seeded(42));
        assert_eq!(points.len(), 500);
        for p in &points {
            assert!((p.length() - 1.0).abs() < 1e-4, "{p} is off the sphere");
        }
    }

    #[test]
    fn test_empty_lattice() {
        assert!(lattice_points(0, &mut seeded(1)).is_empty());
    }

    #[test]
    fn test_runs_pole_to_pole() {
        let points = lattice_points(1000, &mut seeded(42));
        assert!(points[0].y > 0.9);
        assert!(points[999].y < -0.9);
    }

    #[test]
    fn test_seed_moves_points() {
        let a = lattice_points(100, &mut seeded(12345));
        let b = lattice_points(100, &mut seeded(12345));
        let c = lattice_points(100, &mut seeded(67890));
        assert_eq!(a, b);
        assert!(a.iter().zip(&c).any(|(p, q)| p.distance(*q) > 0.01));
    }

    /// No two points land on top of each other
    #[test]
    fn test_points_spread_out() {
        let points = lattice_points(200, &mut seeded(3));
        let closest = points
            .iter()
            .enumerate()
            .flat_map(|(i, p)| points[i + 1..].iter().map(move |q| p.distance(*q)))
            .fold(f32::MAX, f32::min);
        assert!(closest > 1e-3);
    }
}
