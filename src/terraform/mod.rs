//! Terraforming: deciding which faces are land and which are water
//!
//! Every face starts [`CellType::Undefined`]. The phases run in a fixed order:
//!
//! 1. rivers are carved along great circles,
//! 2. lakes are seeded ("drizzle") and grown until the water target is met,
//! 3. lakes enclosed by land are randomly filled back in,
//! 4. single land specks are bridged to nearby land or flooded,
//! 5. whatever is still undecided becomes land.
//!
//! All loops are bounded by the face count or fixed attempt caps.

mod lakes;
mod rivers;

pub use lakes::{drizzle, expand_water, fill_inland_seas, DripGroups, DRIZZLE_ATTEMPTS_PER_LAKE};
pub use rivers::{carve_river, river_waypoints, RIVER_WANDER_CHANCE};

use std::time::Instant;

use crate::config::TerraformSettings;
use crate::rng::GameRng;
use crate::topology::{CellType, Face, FaceId, PlanetTopology};

/// What a terraforming run did
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct TerraformReport {
    /// Faces carved by rivers
    pub river_faces: usize,
    /// Lakes seeded by drizzling
    pub lakes: usize,
    /// Faces flooded by water expansion
    pub flooded: usize,
    /// Enclosed lakes filled back in
    pub inland_seas_filled: usize,
    /// Water faces turned to land to connect a speck
    pub bridged: usize,
    /// Land specks turned to water
    pub specks_removed: usize,
    /// Water fraction at the end
    pub water_fraction: f32,
}

/// Remove single-face landmasses and waterbodies
///
/// A land speck is kept when one of its water neighbors touches other land:
/// that neighbor becomes land and joins the two. Otherwise it is flooded.
/// Water faces with no water neighbor are filled in afterwards. Returns
/// `(bridged, removed)`, with both kinds of speck counted as removed.
pub fn despeckle(faces: &mut [Face]) -> (usize, usize) {
    let mut bridged = 0;
    let mut removed = 0;

    for id in 0..faces.len() {
        if faces[id].cell_type.is_water() {
            continue;
        }
        let connected = &faces[id].connected_faces;
        if connected.iter().any(|&f| faces[f].cell_type.is_land()) {
            continue;
        }

        let bridge: Option<FaceId> = connected.iter().copied().find(|&n| {
            faces[n]
                .connected_faces
                .iter()
                .any(|&g| g != id && faces[g].cell_type.is_land())
        });

        match bridge {
            Some(n) => {
                faces[n].cell_type = CellType::Land;
                faces[n].drip = None;
                bridged += 1;
            }
            None => {
                faces[id].waterify();
                removed += 1;
            }
        }
    }

    for id in 0..faces.len() {
        if !faces[id].cell_type.is_water() {
            continue;
        }
        if faces[id].connected_faces.iter().any(|&f| faces[f].cell_type.is_water()) {
            continue;
        }
        faces[id].cell_type = CellType::Land;
        faces[id].drip = None;
        removed += 1;
    }

    (bridged, removed)
}

/// Run every terraforming phase on `topology`
pub fn terraform(topology: &mut PlanetTopology, settings: &TerraformSettings, rng: &mut GameRng) -> TerraformReport {
    let start = Instant::now();
    let mut report = TerraformReport::default();

    for _ in 0..settings.river_count {
        report.river_faces += carve_river(topology, rng);
    }
    tracing::debug!(faces = report.river_faces, "carved rivers");

    let faces = topology.faces_mut();
    let mut drips = DripGroups::new();
    report.lakes = drizzle(faces, &mut drips, settings.drizzle_count, rng);
    report.flooded = expand_water(faces, &mut drips, settings.water_proportion, rng);
    tracing::debug!(lakes = report.lakes, flooded = report.flooded, "expanded water");

    report.inland_seas_filled = fill_inland_seas(faces, &drips, settings.inland_sea_fill, rng);
    (report.bridged, report.specks_removed) = despeckle(faces);

    for face in faces.iter_mut() {
        if face.cell_type == CellType::Undefined {
            face.cell_type = CellType::Land;
        }
    }

    report.water_fraction = topology.water_fraction();
    tracing::info!(
        water = report.water_fraction,
        inland_seas_filled = report.inland_seas_filled,
        bridged = report.bridged,
        specks_removed = report.specks_removed,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "terraformed planet"
    );

    report
}
