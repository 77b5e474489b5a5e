//! Built-in sphere mesh source
//!
//! The simulation consumes any closed triangle mesh through
//! [`PlanetTopology::from_buffers`](crate::topology::PlanetTopology::from_buffers).
//! This module supplies one: a jittered golden-spiral lattice triangulated by its
//! convex hull. Vertices are emitted un-welded, three per triangle, the same
//! way icosphere builders hand them to a renderer, so consumers always go
//! through colocated-vertex matching.

mod lattice;

pub use lattice::lattice_points;

use parry3d::math::Point;
use parry3d::transformation;

use crate::config::PlanetConfig;
use crate::error::{GlobeError, Result};
use crate::rng::seeded;

/// Flat vertex and index buffers of a triangle mesh
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMesh {
    /// Vertex positions
    pub positions: Vec<[f32; 3]>,
    /// Triangle indices, three per face
    pub indices: Vec<u32>,
}

impl RawMesh {
    /// Number of triangles
    pub fn face_count(&self) -> usize {
        self.indices.len() / 3
    }
}

/// Triangulate `point_count` lattice points into an un-welded unit sphere mesh
pub fn generate_sphere_mesh(point_count: usize, seed: u32) -> Result<RawMesh> {
    if point_count < 4 {
        return Err(GlobeError::InvalidConfig(format!(
            "a sphere needs at least 4 points (got {})",
            point_count
        )));
    }

    let points: Vec<Point<f32>> = lattice_points(point_count, &mut seeded(seed))
        .into_iter()
        .map(|p| Point::new(p.x, p.y, p.z))
        .collect();
    let (vertices, triangles) = transformation::convex_hull(&points);
    if triangles.is_empty() {
        return Err(GlobeError::InvalidMesh("convex hull produced no triangles".into()));
    }

    let mut mesh = RawMesh {
        positions: Vec::with_capacity(triangles.len() * 3),
        indices: Vec::with_capacity(triangles.len() * 3),
    };

    for triangle in &triangles {
        for &vertex in triangle {
            let p = vertices[vertex as usize];
            mesh.indices.push(mesh.positions.len() as u32);
            mesh.positions.push([p.x, p.y, p.z]);
        }
    }

    tracing::debug!(
        points = point_count,
        faces = mesh.face_count(),
        "triangulated sphere lattice"
    );

    Ok(mesh)
}

/// Generate the sphere mesh described by a planet configuration
pub fn generate_planet_mesh(config: &PlanetConfig) -> Result<RawMesh> {
    generate_sphere_mesh(config.planet_size.point_count(), config.seed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sphere_mesh_face_count() {
        let mesh = generate_sphere_mesh(162, 42).unwrap();
        assert_eq!(mesh.positions.len(), mesh.indices.len());

        // Closed triangulation of v points: 2v - 4 faces
        let mut distinct: Vec<[u32; 3]> = mesh
            .positions
            .iter()
            .map(|p| [p[0].to_bits(), p[1].to_bits(), p[2].to_bits()])
            .collect();
        distinct.sort_unstable();
        distinct.dedup();
        assert_eq!(mesh.face_count(), 2 * distinct.len() - 4);
        assert!(distinct.len() > 150);
    }

    #[test]
    fn test_sphere_mesh_is_unwelded() {
        let mesh = generate_sphere_mesh(50, 7).unwrap();
        for (i, &index) in mesh.indices.iter().enumerate() {
            assert_eq!(index as usize, i);
        }
    }

    #[test]
    fn test_sphere_mesh_rejects_too_few_points() {
        assert!(generate_sphere_mesh(3, 1).is_err());
    }

    #[test]
    fn test_sphere_mesh_determinism() {
        let a = generate_sphere_mesh(100, 5).unwrap();
        let b = generate_sphere_mesh(100, 5).unwrap();
        assert_eq!(a, b);
    }
}
