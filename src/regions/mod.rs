//! Regions: contiguous groups of land faces
//!
//! Regions live in a [`RegionSet`] arena and are never removed from it. A
//! region that gets absorbed is tombstoned as [`RegionState::Merged`] so that
//! IDs held by pending merge proposals stay valid; every caller that iterates
//! regions must skip inactive ones.

mod builder;
mod islands;

pub use builder::{create_regions, measure_border, regions_unite_pass, MAX_UNITE_RETRIES};
pub use islands::{claim_islands, find_nearest_region_to_island, IslandReport};

use glam::Vec3;

use crate::error::{GlobeError, Result};
use crate::mesh::Color;
use crate::topology::{Face, FaceId};

/// Index of a region in its [`RegionSet`]
pub type RegionId = usize;

/// Lifecycle of a region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum RegionState {
    /// Participates in merging and in the game
    Active,
    /// Absorbed by another region
    Merged {
        /// The region that took over this one's faces
        into: RegionId,
    },
    /// Island too small and too remote to keep; its faces became water
    Sunk,
}

/// A group of land faces under common ownership
#[derive(Debug, Clone)]
pub struct Region {
    /// Stable index of this region
    pub id: RegionId,
    /// Member faces
    pub faces: Vec<FaceId>,
    /// Regions sharing at least one face edge with this one
    pub neighbors: Vec<RegionId>,
    /// Lifecycle state
    pub state: RegionState,
    /// Whether any member face borders water
    pub coastal: bool,
    /// Midpoint of the first face, fixed at creation
    pub starting_point: Vec3,
    /// Representative point of the region on the sphere
    pub mid_point: Vec3,
    /// Display color, if one was assigned
    pub color: Option<Color>,
}

impl Region {
    fn new(id: RegionId, starting_point: Vec3) -> Self {
        Self {
            id,
            faces: Vec::new(),
            neighbors: Vec::new(),
            state: RegionState::Active,
            coastal: false,
            starting_point,
            mid_point: starting_point,
            color: None,
        }
    }

    /// Check if this region is still a live participant
    #[inline]
    pub fn is_active(&self) -> bool {
        self.state == RegionState::Active
    }

    /// Number of member faces
    #[inline]
    pub fn size(&self) -> usize {
        self.faces.len()
    }

    /// Check if `other` is a neighbor
    #[inline]
    pub fn is_neighbor_of(&self, other: RegionId) -> bool {
        self.neighbors.contains(&other)
    }

    /// Add a neighbor; returns false if it was already present or is self
    pub fn add_neighbor(&mut self, other: RegionId) -> bool {
        if other == self.id || self.neighbors.contains(&other) {
            return false;
        }
        self.neighbors.push(other);
        true
    }

    /// Remove a neighbor; returns false if it was not present
    pub fn remove_neighbor(&mut self, other: RegionId) -> bool {
        match self.neighbors.iter().position(|&n| n == other) {
            Some(idx) => {
                self.neighbors.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Arena of all regions ever created on a planet
#[derive(Debug, Clone, Default)]
pub struct RegionSet {
    regions: Vec<Region>,
}

impl RegionSet {
    /// Create an empty set
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a region seeded with one face
    pub fn create_region(&mut self, faces: &mut [Face], seed: FaceId) -> RegionId {
        let id = self.regions.len();
        self.regions.push(Region::new(id, faces[seed].mid_point));
        self.add_face(faces, id, seed);
        id
    }

    /// Make `face` a member of `region`
    ///
    /// The face is first detached from any other region it belonged to.
    pub fn add_face(&mut self, faces: &mut [Face], region: RegionId, face: FaceId) {
        match faces[face].region {
            Some(current) if current == region => return,
            Some(current) => self.remove_face(faces, current, face),
            None => {}
        }
        self.regions[region].faces.push(face);
        faces[face].region = Some(region);
        self.update_mid_point(faces, region);
    }

    /// Detach `face` from `region`
    pub fn remove_face(&mut self, faces: &mut [Face], region: RegionId, face: FaceId) {
        let members = &mut self.regions[region].faces;
        if let Some(idx) = members.iter().position(|&f| f == face) {
            members.swap_remove(idx);
            self.update_mid_point(faces, region);
        }
        if faces[face].region == Some(region) {
            faces[face].region = None;
        }
    }

    /// Recompute the mean of member face midpoints
    pub fn update_mid_point(&mut self, faces: &[Face], region: RegionId) {
        let r = &mut self.regions[region];
        if r.faces.is_empty() {
            return;
        }
        let sum: Vec3 = r.faces.iter().map(|&f| faces[f].mid_point).sum();
        r.mid_point = sum / r.faces.len() as f32;
    }

    /// Move the midpoint onto the closest member face's midpoint
    ///
    /// The mean of a curved or ragged region can fall outside it; markers
    /// drawn from the snapped point always start on the region itself.
    pub fn snap_mid_point(&mut self, faces: &[Face], region: RegionId) {
        let r = &mut self.regions[region];
        let mean = r.mid_point;
        if let Some(closest) = r
            .faces
            .iter()
            .map(|&f| faces[f].mid_point)
            .min_by(|a, b| a.distance_squared(mean).total_cmp(&b.distance_squared(mean)))
        {
            r.mid_point = closest;
        }
    }

    /// Add every region across a land face edge as a neighbor
    pub fn find_neighbors(&mut self, faces: &[Face], region: RegionId) {
        let mut found = Vec::new();
        for &f in &self.regions[region].faces {
            for &cf in &faces[f].connected_faces {
                let other = &faces[cf];
                if other.cell_type.is_land() {
                    if let Some(r) = other.region {
                        if r != region {
                            found.push(r);
                        }
                    }
                }
            }
        }
        for r in found {
            self.regions[region].add_neighbor(r);
        }
    }

    /// `consumer` absorbs `eaten`
    ///
    /// Faces move over, the eaten region's neighbors are re-pointed at the
    /// consumer and the eaten region is tombstoned. Coastal status is
    /// inherited.
    pub fn eat_region(&mut self, faces: &mut [Face], consumer: RegionId, eaten: RegionId) {
        if consumer == eaten {
            return;
        }

        let moved = std::mem::take(&mut self.regions[eaten].faces);
        for &f in &moved {
            faces[f].region = Some(consumer);
        }
        self.regions[consumer].faces.extend(moved);
        self.update_mid_point(faces, consumer);

        self.regions[consumer].remove_neighbor(eaten);
        let eaten_neighbors = std::mem::take(&mut self.regions[eaten].neighbors);
        for n in eaten_neighbors {
            if n == consumer {
                continue;
            }
            self.regions[consumer].add_neighbor(n);
            self.regions[n].remove_neighbor(eaten);
            self.regions[n].add_neighbor(consumer);
        }

        if self.regions[eaten].coastal {
            self.regions[consumer].coastal = true;
        }
        self.regions[eaten].state = RegionState::Merged { into: consumer };
    }

    /// Drop a region and turn its faces into water
    pub fn sink_region(&mut self, faces: &mut [Face], region: RegionId) {
        let members = std::mem::take(&mut self.regions[region].faces);
        for f in members {
            faces[f].waterify();
        }
        let neighbors = std::mem::take(&mut self.regions[region].neighbors);
        for n in neighbors {
            self.regions[n].remove_neighbor(region);
        }
        self.regions[region].state = RegionState::Sunk;
    }

    /// Paint a region and all its faces
    pub fn set_color(&mut self, faces: &mut [Face], region: RegionId, color: Color) {
        let r = &mut self.regions[region];
        r.color = Some(color);
        for &f in &r.faces {
            faces[f].color = color;
        }
    }

    /// Drop inactive regions from neighbor lists, refresh coastal flags, and
    /// snap midpoints into their regions
    pub fn finalize(&mut self, faces: &[Face]) {
        let active: Vec<bool> = self.regions.iter().map(Region::is_active).collect();
        for id in 0..self.regions.len() {
            if !active[id] {
                continue;
            }
            self.regions[id].neighbors.retain(|&n| active[n]);
            let coastal = self.regions[id]
                .faces
                .iter()
                .any(|&f| faces[f].touches_water(faces));
            self.regions[id].coastal = coastal;
            self.update_mid_point(faces, id);
            self.snap_mid_point(faces, id);
        }
    }

    /// Get a region by ID, active or not
    #[inline]
    pub fn get(&self, id: RegionId) -> Option<&Region> {
        self.regions.get(id)
    }

    /// Get an active region by ID
    ///
    /// # Errors
    ///
    /// `RegionNotFound` for unknown IDs, `RegionInactive` for merged or sunk ones.
    pub fn active(&self, id: RegionId) -> Result<&Region> {
        let region = self.regions.get(id).ok_or(GlobeError::RegionNotFound(id))?;
        if !region.is_active() {
            return Err(GlobeError::RegionInactive(id));
        }
        Ok(region)
    }

    /// Check if `id` names an active region
    #[inline]
    pub fn is_active(&self, id: RegionId) -> bool {
        self.regions.get(id).is_some_and(Region::is_active)
    }

    /// Follow merge tombstones to the region that now holds `id`'s faces
    pub fn resolve(&self, mut id: RegionId) -> Option<RegionId> {
        for _ in 0..self.regions.len() {
            match self.regions.get(id)?.state {
                RegionState::Active => return Some(id),
                RegionState::Merged { into } => id = into,
                RegionState::Sunk => return None,
            }
        }
        None
    }

    /// Iterate over active regions
    pub fn iter_active(&self) -> impl Iterator<Item = &Region> {
        self.regions.iter().filter(|r| r.is_active())
    }

    /// IDs of active regions, ascending
    pub fn active_ids(&self) -> Vec<RegionId> {
        self.iter_active().map(|r| r.id).collect()
    }

    /// Number of active regions
    pub fn active_count(&self) -> usize {
        self.iter_active().count()
    }

    /// Every region ever created, tombstones included
    #[inline]
    pub fn all(&self) -> &[Region] {
        &self.regions
    }

    /// Total number of regions ever created
    #[inline]
    pub fn len(&self) -> usize {
        self.regions.len()
    }

    /// Check if no region was ever created
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.regions.is_empty()
    }
}
