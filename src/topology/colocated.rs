//! Colocated vertex matching
//!
//! Renderer-facing sphere meshes duplicate vertices wherever texture or color
//! seams need it, so one point in space can carry several vertex indices.
//! Adjacency must be computed on points, not indices: this map groups every
//! index with the others at the same position and names one of them the
//! "base" vertex of the group.

use std::collections::HashMap;

use glam::Vec3;

/// Groups at or above this size are never merged by the distance fixup
///
/// A regular sphere vertex is shared by five or six triangles; smaller groups
/// are the ones float noise split apart.
pub const COLOCATED_GROUP_CAP: usize = 5;

/// Two groups closer than this are the same point
pub const COLOCATED_EPSILON: f32 = 0.001;

/// Map from vertex index to the group of indices sharing its position
#[derive(Debug, Clone, Default)]
pub struct ColocatedVertices {
    group_of: Vec<usize>,
    groups: Vec<Vec<u32>>,
}

/// Exact-position key; `+ 0.0` folds -0.0 into 0.0
fn position_key(p: Vec3) -> [u32; 3] {
    [(p.x + 0.0).to_bits(), (p.y + 0.0).to_bits(), (p.z + 0.0).to_bits()]
}

impl ColocatedVertices {
    /// Group vertices by exact position, in order of first use by the index buffer
    ///
    /// Vertices the index buffer never references get singleton groups.
    pub fn build(positions: &[Vec3], indices: &[u32]) -> Self {
        let mut by_position: HashMap<[u32; 3], usize> = HashMap::new();
        let mut group_of = vec![usize::MAX; positions.len()];
        let mut groups: Vec<Vec<u32>> = Vec::new();

        let referenced = indices.iter().copied();
        let unreferenced = 0..positions.len() as u32;
        for vertex in referenced.chain(unreferenced) {
            let v = vertex as usize;
            if group_of[v] != usize::MAX {
                continue;
            }
            let group = *by_position
                .entry(position_key(positions[v]))
                .or_insert_with(|| {
                    groups.push(Vec::new());
                    groups.len() - 1
                });
            groups[group].push(vertex);
            group_of[v] = group;
        }

        Self { group_of, groups }
    }

    /// Merge groups that sit within [`COLOCATED_EPSILON`] of each other
    ///
    /// Only undersized groups are candidates, which keeps the pairwise scan
    /// small. Every member of the second group is snapped onto the first
    /// group's position; the groups themselves merge only while both stay
    /// below [`COLOCATED_GROUP_CAP`]. Returns the number of merges.
    pub fn fix_close_vertices(&mut self, positions: &mut [Vec3]) -> usize {
        let candidates: Vec<usize> = (0..self.groups.len())
            .filter(|&g| !self.groups[g].is_empty() && self.groups[g].len() < COLOCATED_GROUP_CAP)
            .collect();

        tracing::debug!(candidates = candidates.len(), "vertices to combine");

        let mut merges = 0;
        for (i, &first) in candidates.iter().enumerate() {
            for &second in &candidates[i + 1..] {
                let (Some(&a), Some(&b)) = (self.groups[first].first(), self.groups[second].first())
                else {
                    continue;
                };
                if self.group_of[a as usize] == self.group_of[b as usize] {
                    continue;
                }

                let target = positions[a as usize];
                if target.distance(positions[b as usize]) >= COLOCATED_EPSILON {
                    continue;
                }

                let (keep, absorb) = (self.group_of[a as usize], self.group_of[b as usize]);
                for &v in &self.groups[absorb] {
                    positions[v as usize] = target;
                }

                if self.groups[keep].len() < COLOCATED_GROUP_CAP
                    && self.groups[absorb].len() < COLOCATED_GROUP_CAP
                {
                    // Lower base index stays first so the base is stable
                    let (low, high) = if a < b { (keep, absorb) } else { (absorb, keep) };
                    let moved = std::mem::take(&mut self.groups[high]);
                    for &v in &moved {
                        self.group_of[v as usize] = low;
                    }
                    self.groups[low].extend(moved);
                    merges += 1;
                }
            }
        }

        merges
    }

    /// All vertex indices sharing the position of `vertex`
    pub fn members(&self, vertex: u32) -> &[u32] {
        &self.groups[self.group_of[vertex as usize]]
    }

    /// Canonical index for the position of `vertex`
    #[inline]
    pub fn base(&self, vertex: u32) -> u32 {
        self.members(vertex)[0]
    }

    /// Number of distinct positions
    pub fn group_count(&self) -> usize {
        self.groups.iter().filter(|g| !g.is_empty()).count()
    }
}
