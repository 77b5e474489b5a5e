//! Mesh output for renderers
//!
//! Produces engine-agnostic buffers from a [`PlanetTopology`] and pushes color
//! updates to the host through [`ColorSink`].

mod colors;

pub use colors::{shade, Color, ColorMapper, CustomColorMapper, SurfaceColorMapper};

use crate::topology::PlanetTopology;

/// Engine-agnostic mesh data output
///
/// Contains raw vertex data suitable for any rendering engine:
/// - Bevy: Convert to `Mesh` with attributes
/// - Godot: Convert to `ArrayMesh`
/// - wgpu: Use directly as vertex buffers
///
/// The buffers mirror the topology's vertex and index buffers one to one, so
/// a vertex index picked on the GPU side is a valid topology vertex index.
#[derive(Debug, Clone, Default)]
pub struct MeshData {
    /// Vertex positions (3D coordinates)
    pub positions: Vec<[f32; 3]>,
    /// Vertex normals (normalized direction from sphere center)
    pub normals: Vec<[f32; 3]>,
    /// Vertex colors (RGBA)
    pub colors: Vec<Color>,
    /// Triangle indices
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Get the number of triangles
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check if mesh is empty
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }
}

/// Receiver for full per-vertex color refreshes
///
/// Called whenever face colors change (terraforming, ownership changes,
/// highlighting). `colors` has one entry per vertex of the mesh.
pub trait ColorSink {
    /// Replace every vertex color
    fn re_color_all(&mut self, colors: &[Color]);
}

impl ColorSink for MeshData {
    fn re_color_all(&mut self, colors: &[Color]) {
        self.colors.clear();
        self.colors.extend_from_slice(colors);
    }
}

/// Per-vertex colors taken from the color of the face each vertex belongs to
///
/// Vertices shared by several faces take the color of the last face listing
/// them; on an un-welded mesh every vertex has exactly one face.
pub fn vertex_colors(topology: &PlanetTopology) -> Vec<Color> {
    let mut colors = vec![[0.0, 0.0, 0.0, 1.0]; topology.positions().len()];
    for face in topology.faces() {
        for &v in &face.vertices {
            colors[v as usize] = face.color;
        }
    }
    colors
}

/// Color every face by its land/water classification
pub fn paint_surface<C: ColorMapper<crate::topology::CellType>>(topology: &mut PlanetTopology, mapper: &C) {
    for face in topology.faces_mut() {
        face.color = mapper.map_color(&face.cell_type);
    }
}

/// Build renderer buffers from the topology's current positions and face colors
pub fn generate_mesh(topology: &PlanetTopology) -> MeshData {
    let positions: Vec<[f32; 3]> = topology.positions().iter().map(|p| p.to_array()).collect();
    let normals = topology
        .positions()
        .iter()
        .map(|p| p.normalize_or_zero().to_array())
        .collect();

    MeshData {
        positions,
        normals,
        colors: vertex_colors(topology),
        indices: topology.indices().to_vec(),
    }
}
