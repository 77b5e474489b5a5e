//! Spatial indexing for position-to-face lookups
//!
//! This module is only available with the `spatial-index` feature; without it
//! [`crate::Planet::face_at`] falls back to a linear scan.

use glam::Vec3;
use kiddo::immutable::float::kdtree::ImmutableKdTree;
use kiddo::SquaredEuclidean;

use crate::topology::{FaceId, PlanetTopology};

/// KD-tree over face midpoints
///
/// Turns a picked 3D position (a raycast hit on the globe, a click) into the
/// face under it. Face midpoints are fixed once jumbling is done, so the tree
/// is built once per planet.
#[derive(Clone)]
pub struct FaceIndex {
    tree: ImmutableKdTree<f32, usize, 3, 32>,
}

impl FaceIndex {
    /// Build the index from arbitrary points; item `i` is point `i`
    ///
    /// # Example
    ///
    /// ```
    /// use rust_globe_conquest::*;
    ///
    /// let points = vec![
    ///     Vec3::new(1.0, 0.0, 0.0),
    ///     Vec3::new(0.0, 1.0, 0.0),
    ///     Vec3::new(0.0, 0.0, 1.0),
    /// ];
    ///
    /// let index = FaceIndex::new(&points);
    /// assert_eq!(index.find_nearest(Vec3::new(1.0, 0.1, 0.0)), 0);
    /// ```
    pub fn new(points: &[Vec3]) -> Self {
        let points: Vec<[f32; 3]> = points.iter().map(|p| p.to_array()).collect();
        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Build the index from every face midpoint of `topology`
    pub fn from_topology(topology: &PlanetTopology) -> Self {
        let midpoints: Vec<Vec3> = topology.faces().iter().map(|f| f.mid_point).collect();
        Self::new(&midpoints)
    }

    /// Face whose midpoint is closest to `position`
    ///
    /// `position` need not lie on the unit sphere; the closest midpoint by
    /// straight-line distance is returned.
    pub fn find_nearest(&self, position: Vec3) -> FaceId {
        let result = self.tree.nearest_one::<SquaredEuclidean>(&position.to_array());
        result.item
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::topology::tests::small_sphere;

    #[test]
    fn test_index_basic() {
        let points = vec![
            Vec3::new(1.0, 0.0, 0.0),
            Vec3::new(0.0, 1.0, 0.0),
            Vec3::new(0.0, 0.0, 1.0),
            Vec3::new(-1.0, 0.0, 0.0),
        ];
        let index = FaceIndex::new(&points);

        assert_eq!(index.find_nearest(Vec3::new(0.9, 0.1, 0.0)), 0);
        assert_eq!(index.find_nearest(Vec3::new(0.0, 0.95, 0.0)), 1);
        assert_eq!(index.find_nearest(Vec3::new(0.0, 0.1, 0.9)), 2);
        assert_eq!(index.find_nearest(Vec3::new(-0.8, 0.0, 0.0)), 3);
    }

    /// The tree agrees with a linear scan over the faces
    #[test]
    fn test_matches_linear_scan() {
        let topology = small_sphere();
        let index = FaceIndex::from_topology(&topology);

        for face in topology.faces().iter().step_by(7) {
            assert_eq!(index.find_nearest(face.mid_point), face.id);
            // Off-surface picks resolve the same way
            let lifted = face.mid_point * 1.3;
            assert_eq!(Some(index.find_nearest(lifted)), topology.nearest_face(lifted));
        }
    }
}
