//! Face list and face adjacency over a triangle sphere
//!
//! [`PlanetTopology`] is the shared graph every later phase works on. Faces
//! live in one flat vector and refer to each other (and to regions) by index,
//! so the cyclic face/region relationships never need shared ownership.

mod colocated;

pub use colocated::{ColocatedVertices, COLOCATED_EPSILON, COLOCATED_GROUP_CAP};

use std::collections::HashMap;

use glam::Vec3;
use rand::Rng;

use crate::error::{GlobeError, Result};
use crate::generation::RawMesh;
use crate::mesh::Color;
use crate::regions::RegionId;
use crate::rng::GameRng;

/// Index of a face in [`PlanetTopology::faces`]
pub type FaceId = usize;

/// Surface classification of a face
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellType {
    /// Not yet decided by terraforming
    #[default]
    Undefined,
    /// Dry land
    Land,
    /// Sea, lake or river
    Water,
}

impl CellType {
    /// Check if this face is water
    pub fn is_water(&self) -> bool {
        matches!(self, CellType::Water)
    }

    /// Check if this face counts as land (undecided faces do)
    pub fn is_land(&self) -> bool {
        !self.is_water()
    }
}

/// One triangle of the planet surface
#[derive(Debug, Clone)]
pub struct Face {
    /// Stable index of this face
    pub id: FaceId,
    /// Vertex indices as given by the index buffer
    pub vertices: [u32; 3],
    /// Base vertex of each corner's colocated group
    pub base_vertices: [u32; 3],
    /// Land/water classification
    pub cell_type: CellType,
    /// Unit-length center of the triangle
    pub mid_point: Vec3,
    /// Faces sharing an edge with this one
    pub connected_faces: Vec<FaceId>,
    /// Owning region, if any
    pub region: Option<RegionId>,
    /// Lake this water face grew from during water expansion
    pub drip: Option<usize>,
    /// Current display color
    pub color: Color,
}

impl Face {
    /// Turn this face into water, detaching it from any region and lake
    pub fn waterify(&mut self) {
        self.cell_type = CellType::Water;
        self.region = None;
        self.drip = None;
    }

    /// Whether any connected face is water
    pub fn touches_water(&self, faces: &[Face]) -> bool {
        self.connected_faces.iter().any(|&f| faces[f].cell_type.is_water())
    }
}

/// Vertex buffers, colocated vertex map and face graph of a planet mesh
#[derive(Debug, Clone)]
pub struct PlanetTopology {
    positions: Vec<Vec3>,
    indices: Vec<u32>,
    colocated: ColocatedVertices,
    faces: Vec<Face>,
}

impl PlanetTopology {
    /// Build the face graph from flat vertex and index buffers
    ///
    /// # Errors
    ///
    /// Returns `InvalidMesh` if the index buffer is empty, not a multiple of
    /// three, or references a vertex outside the position buffer.
    pub fn from_buffers(positions: &[[f32; 3]], indices: &[u32]) -> Result<Self> {
        if indices.is_empty() || indices.len() % 3 != 0 {
            return Err(GlobeError::InvalidMesh(format!(
                "index buffer length must be a positive multiple of 3 (got {})",
                indices.len()
            )));
        }
        if let Some(&bad) = indices.iter().find(|&&i| i as usize >= positions.len()) {
            return Err(GlobeError::InvalidMesh(format!(
                "index {} out of range for {} vertices",
                bad,
                positions.len()
            )));
        }

        let mut positions: Vec<Vec3> = positions.iter().map(|&p| Vec3::from_array(p)).collect();
        let mut colocated = ColocatedVertices::build(&positions, indices);
        let merged = colocated.fix_close_vertices(&mut positions);

        let faces: Vec<Face> = indices
            .chunks_exact(3)
            .enumerate()
            .map(|(id, tri)| {
                let vertices = [tri[0], tri[1], tri[2]];
                Face {
                    id,
                    vertices,
                    base_vertices: vertices.map(|v| colocated.base(v)),
                    cell_type: CellType::Undefined,
                    mid_point: Vec3::ZERO,
                    connected_faces: Vec::new(),
                    region: None,
                    drip: None,
                    color: [0.0, 0.0, 0.0, 1.0],
                }
            })
            .collect();

        let mut topology = Self {
            positions,
            indices: indices.to_vec(),
            colocated,
            faces,
        };
        topology.recompute_midpoints();
        topology.connect_faces();

        tracing::debug!(
            faces = topology.faces.len(),
            points = topology.colocated.group_count(),
            merged,
            "built planet topology"
        );

        Ok(topology)
    }

    /// Build the face graph from a [`RawMesh`]
    pub fn from_mesh(mesh: &RawMesh) -> Result<Self> {
        Self::from_buffers(&mesh.positions, &mesh.indices)
    }

    /// Link every face to the faces sharing two base vertices with it
    fn connect_faces(&mut self) {
        let mut faces_at: HashMap<u32, Vec<FaceId>> = HashMap::new();
        for face in &self.faces {
            for &v in &face.base_vertices {
                let list = faces_at.entry(v).or_default();
                if !list.contains(&face.id) {
                    list.push(face.id);
                }
            }
        }

        let mut orphan_edges = 0usize;
        for face in self.faces.iter_mut() {
            let [a, b, c] = face.base_vertices;
            let mut connected = Vec::with_capacity(3);

            for (v1, v2) in [(a, b), (b, c), (c, a)] {
                if v1 == v2 {
                    continue;
                }
                let siblings: Vec<FaceId> = faces_at[&v1]
                    .iter()
                    .copied()
                    .filter(|&f| f != face.id && faces_at[&v2].contains(&f))
                    .collect();

                if siblings.is_empty() {
                    orphan_edges += 1;
                    tracing::warn!(face = face.id, v1, v2, "no common face across edge");
                }
                for f in siblings {
                    if !connected.contains(&f) {
                        connected.push(f);
                    }
                }
            }

            face.connected_faces = connected;
        }

        if orphan_edges > 0 {
            tracing::warn!(orphan_edges, "mesh is not closed; some faces have fewer than 3 neighbors");
        }
    }

    /// Recompute every face midpoint from the current vertex positions
    pub fn recompute_midpoints(&mut self) {
        for face in self.faces.iter_mut() {
            let [a, b, c] = face.vertices.map(|v| self.positions[v as usize]);
            face.mid_point = ((a + b + c) / 3.0).normalize_or_zero();
        }
    }

    /// Move a vertex and every colocated copy of it
    pub fn move_vertex(&mut self, vertex: u32, position: Vec3) {
        for &v in self.colocated.members(vertex) {
            self.positions[v as usize] = position;
        }
    }

    /// Randomly nudge one corner of every face toward the other two
    ///
    /// The face's first base vertex moves to
    /// `normalize(v1 + v2 * r2 + v3 * r3)` with `r2, r3` uniform in
    /// `[0, max_veer)`, which roughens the regular lattice. Topology is
    /// unchanged; midpoints are recomputed.
    pub fn jumble_vertices(&mut self, max_veer: f32, rng: &mut GameRng) {
        if max_veer <= 0.0 {
            return;
        }

        for id in 0..self.faces.len() {
            let [b1, b2, b3] = self.faces[id].base_vertices;
            let v1 = self.positions[b1 as usize];
            let v2 = self.positions[b2 as usize] * rng.gen_range(0.0..max_veer);
            let v3 = self.positions[b3 as usize] * rng.gen_range(0.0..max_veer);

            let moved = (v1 + v2 + v3).normalize_or_zero();
            if moved != Vec3::ZERO {
                self.move_vertex(b1, moved);
            }
        }

        self.recompute_midpoints();
    }

    /// All faces, indexed by face ID
    #[inline]
    pub fn faces(&self) -> &[Face] {
        &self.faces
    }

    /// Mutable access to all faces
    #[inline]
    pub fn faces_mut(&mut self) -> &mut [Face] {
        &mut self.faces
    }

    /// Get a face by ID
    #[inline]
    pub fn face(&self, id: FaceId) -> Option<&Face> {
        self.faces.get(id)
    }

    /// Number of faces
    #[inline]
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Current vertex positions (written back by jumbling and fixups)
    #[inline]
    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    /// Triangle index buffer
    #[inline]
    pub fn indices(&self) -> &[u32] {
        &self.indices
    }

    /// Colocated vertex map
    #[inline]
    pub fn colocated(&self) -> &ColocatedVertices {
        &self.colocated
    }

    /// Face whose midpoint is closest to `point`, by linear scan
    pub fn nearest_face(&self, point: Vec3) -> Option<FaceId> {
        self.faces
            .iter()
            .min_by(|a, b| {
                a.mid_point
                    .distance_squared(point)
                    .total_cmp(&b.mid_point.distance_squared(point))
            })
            .map(|f| f.id)
    }

    /// Fraction of faces currently classified as water
    pub fn water_fraction(&self) -> f32 {
        if self.faces.is_empty() {
            return 0.0;
        }
        let water = self.faces.iter().filter(|f| f.cell_type.is_water()).count();
        water as f32 / self.faces.len() as f32
    }

    /// Turn a face into water, detaching it from any region and lake
    pub fn waterify(&mut self, id: FaceId) {
        self.faces[id].waterify();
    }
}
