//! Region building by randomized greedy agglomeration
//!
//! Every land face starts as its own region. Each pass, small regions pick a
//! partner (eat a smaller-or-equal neighbor, else offer themselves to a bigger
//! one); proposals are ranked by the border length the merged region would
//! have and only the best ones are applied. Passes repeat until nothing small
//! is left, the region count stalls, or the retry budget runs out.

use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;

use super::{RegionId, RegionSet};
use crate::config::TerraformSettings;
use crate::rng::GameRng;
use crate::topology::Face;

/// Upper bound on merge passes
pub const MAX_UNITE_RETRIES: usize = 100;

/// Below this many proposals every one of them is applied
const APPLY_ALL_BELOW: usize = 100;

/// Share of proposals applied once there are many
const APPLY_FRACTION: usize = 10;

#[derive(Debug, Clone, Copy)]
struct Merger {
    consumer: RegionId,
    eaten: RegionId,
    border: usize,
}

/// Count land face edges around `a` and `b` that lead to a third region
///
/// Adjacencies between `a` and `b` themselves do not count, so a lower value
/// means the merged region would have a shorter, less jagged border.
pub fn measure_border(faces: &[Face], regions: &RegionSet, a: RegionId, b: RegionId) -> usize {
    [a, b]
        .iter()
        .flat_map(|&r| regions.regions[r].faces.iter())
        .flat_map(|&f| faces[f].connected_faces.iter())
        .filter(|&&cf| {
            let other = &faces[cf];
            other.cell_type.is_land() && other.region != Some(a) && other.region != Some(b)
        })
        .count()
}

/// Pick the candidate whose starting point is closest to `from`'s
///
/// Candidates are shuffled first so exact ties break randomly; with
/// probability `1 - chance_best_match` the shuffled head is taken instead.
fn pick_partner(
    regions: &RegionSet,
    from: RegionId,
    mut candidates: Vec<RegionId>,
    chance_best_match: f32,
    rng: &mut GameRng,
) -> Option<RegionId> {
    candidates.shuffle(rng);
    if rng.gen::<f32>() < chance_best_match {
        let origin = regions.regions[from].starting_point;
        // Stable sort keeps the shuffled order among equals
        candidates.sort_by(|&x, &y| {
            let dx = regions.regions[x].starting_point.distance_squared(origin);
            let dy = regions.regions[y].starting_point.distance_squared(origin);
            dx.total_cmp(&dy)
        });
    }
    candidates.first().copied()
}

/// Run one merge pass over `order`; returns the number of merges applied
///
/// `order` is shuffled in place. Inactive entries are skipped.
pub fn regions_unite_pass(
    faces: &mut [Face],
    regions: &mut RegionSet,
    order: &mut [RegionId],
    settings: &TerraformSettings,
    rng: &mut GameRng,
) -> usize {
    for &id in order.iter() {
        regions.update_mid_point(faces, id);
    }
    order.shuffle(rng);

    let safe = settings.safe_size;
    let mut proposals: Vec<Merger> = Vec::new();

    for &id in order.iter() {
        // A region merged earlier in the pass neither eats nor gets eaten
        if !regions.is_active(id) {
            continue;
        }
        let size = regions.regions[id].size();

        let mut edible = Vec::new();
        let mut bigger = Vec::new();
        for &n in &regions.regions[id].neighbors {
            let neighbor = &regions.regions[n];
            if !neighbor.is_active() {
                continue;
            }
            if neighbor.size() <= size && neighbor.size() < safe {
                edible.push(n);
            }
            if size < safe && neighbor.size() >= size {
                bigger.push(n);
            }
        }

        let (consumer, eaten) = if !edible.is_empty() {
            let target = pick_partner(regions, id, edible, settings.chance_best_match, rng);
            (Some(id), target)
        } else {
            let target = pick_partner(regions, id, bigger, settings.chance_best_match, rng);
            (target, Some(id))
        };

        if let (Some(consumer), Some(eaten)) = (consumer, eaten) {
            proposals.push(Merger {
                consumer,
                eaten,
                border: measure_border(faces, regions, consumer, eaten),
            });
        }
    }

    proposals.sort_by_key(|m| m.border);
    let to_merge = if proposals.len() < APPLY_ALL_BELOW {
        proposals.len()
    } else {
        proposals.len() / APPLY_FRACTION
    };

    let mut merged = 0;
    for m in proposals.iter().take(to_merge) {
        if regions.is_active(m.consumer) && regions.is_active(m.eaten) {
            regions.eat_region(faces, m.consumer, m.eaten);
            merged += 1;
        }
    }

    merged
}

/// Partition all land faces into regions
///
/// Returns the arena with merged-away regions tombstoned. After building,
/// neighbor lists hold only active regions and every midpoint sits on one of
/// the region's own faces.
pub fn create_regions(faces: &mut [Face], settings: &TerraformSettings, rng: &mut GameRng) -> RegionSet {
    let start = Instant::now();
    let mut regions = RegionSet::new();

    for id in 0..faces.len() {
        if faces[id].cell_type.is_land() {
            regions.create_region(faces, id);
        }
    }

    for id in 0..regions.len() {
        regions.find_neighbors(faces, id);
        let coastal = regions.regions[id]
            .faces
            .iter()
            .any(|&f| faces[f].touches_water(faces));
        regions.regions[id].coastal = coastal;
    }

    let initial = regions.len();
    let mut active = regions.active_ids();
    let mut passes = 0;

    loop {
        let previous = active.len();
        passes += 1;

        let merged = regions_unite_pass(faces, &mut regions, &mut active, settings, rng);
        active.retain(|&id| regions.is_active(id));

        let more_to_eat = active.iter().any(|&id| {
            let r = &regions.regions[id];
            !r.neighbors.is_empty() && r.size() < settings.safe_size
        });

        tracing::debug!(pass = passes, merged, regions = active.len(), "regions unite");

        if !more_to_eat || active.len() == previous || passes >= MAX_UNITE_RETRIES {
            break;
        }
    }

    regions.finalize(faces);

    tracing::info!(
        land_faces = initial,
        regions = active.len(),
        passes,
        elapsed_ms = start.elapsed().as_millis() as u64,
        "created regions"
    );

    regions
}
