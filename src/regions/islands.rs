//! Island resolution
//!
//! After merging, small regions cut off by water are either attached to the
//! closest region across the water or, when nothing is in reach and they are
//! tiny, sunk.

use std::collections::VecDeque;

use super::{RegionId, RegionSet};
use crate::config::TerraformSettings;
use crate::topology::Face;

/// Outcome of [`claim_islands`]
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct IslandReport {
    /// Regions absorbed into another region
    pub merged: usize,
    /// Regions turned into water
    pub sunk: usize,
    /// Passes run
    pub passes: usize,
}

/// Breadth-first search from the rim of `region` for another region's land
///
/// The search only crosses water and the region's own faces, and goes at most
/// `radius` hops out. Returns the first foreign region reached.
pub fn find_nearest_region_to_island(
    faces: &[Face],
    regions: &RegionSet,
    region: RegionId,
    radius: usize,
) -> Option<RegionId> {
    let members = &regions.regions[region].faces;
    let mut seen = vec![false; faces.len()];
    let mut queue: VecDeque<(usize, usize)> = VecDeque::new();

    for &f in members {
        seen[f] = true;
    }
    for &f in members {
        if faces[f].connected_faces.iter().any(|&cf| faces[cf].region != Some(region)) {
            queue.push_back((f, 0));
        }
    }

    while let Some((f, depth)) = queue.pop_front() {
        if depth >= radius {
            continue;
        }
        for &cf in &faces[f].connected_faces {
            if seen[cf] {
                continue;
            }
            seen[cf] = true;

            let face = &faces[cf];
            if face.cell_type.is_land() {
                match face.region {
                    Some(other) if other != region => return Some(other),
                    Some(_) => {}
                    // Land without a region is not a valid path
                    None => continue,
                }
            }
            queue.push_back((cf, depth + 1));
        }
    }

    None
}

/// Attach or sink every region smaller than `island_safe_size`
///
/// The first pass looks at all small regions. Later passes only revisit the
/// regions that grew by eating another one, since they may still be small;
/// the loop ends on the first pass where nothing was eaten.
pub fn claim_islands(faces: &mut [Face], regions: &mut RegionSet, settings: &TerraformSettings) -> IslandReport {
    let mut report = IslandReport::default();
    let mut candidates: Vec<RegionId> = regions.active_ids();
    // Every productive pass tombstones a region, so this never binds on a valid set
    let max_passes = regions.len() + 1;

    while !candidates.is_empty() && report.passes < max_passes {
        report.passes += 1;
        let mut consumers = Vec::new();

        for id in candidates {
            if !regions.is_active(id) || regions.regions[id].size() >= settings.island_safe_size {
                continue;
            }

            match find_nearest_region_to_island(faces, regions, id, settings.island_neighborhood_radius) {
                Some(found) => {
                    let (eater, eaten) = if regions.regions[found].size() > regions.regions[id].size() {
                        (found, id)
                    } else {
                        (id, found)
                    };
                    regions.eat_region(faces, eater, eaten);
                    report.merged += 1;
                    if eater == id {
                        consumers.push(id);
                    }
                }
                None if regions.regions[id].size() < settings.island_kill_size => {
                    regions.sink_region(faces, id);
                    report.sunk += 1;
                }
                None => {}
            }
        }

        candidates = consumers;
    }

    regions.finalize(faces);

    tracing::debug!(
        merged = report.merged,
        sunk = report.sunk,
        passes = report.passes,
        "claimed islands"
    );

    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::regions::tests::sphere_with_land;
    use crate::regions::RegionState;
    use crate::topology::tests::small_sphere;
    use crate::topology::FaceId;

    /// Faces exactly `hops` steps away from `start`, by breadth-first distance
    fn ring(faces: &[Face], start: FaceId, hops: usize) -> Vec<FaceId> {
        let mut dist = vec![usize::MAX; faces.len()];
        let mut queue = VecDeque::from([start]);
        dist[start] = 0;
        while let Some(f) = queue.pop_front() {
            for &cf in &faces[f].connected_faces {
                if dist[cf] == usize::MAX {
                    dist[cf] = dist[f] + 1;
                    queue.push_back(cf);
                }
            }
        }
        (0..faces.len()).filter(|&f| dist[f] == hops).collect()
    }

    fn settings(radius: usize, kill: usize) -> TerraformSettings {
        TerraformSettings {
            island_safe_size: 5,
            island_neighborhood_radius: radius,
            island_kill_size: kill,
            ..Default::default()
        }
    }

    fn singles(faces: &mut [Face], land: &[FaceId]) -> (RegionSet, Vec<RegionId>) {
        let mut regions = RegionSet::new();
        let ids = land.iter().map(|&f| regions.create_region(faces, f)).collect();
        (regions, ids)
    }

    #[test]
    fn test_island_found_across_water() {
        let base = small_sphere();
        let far = ring(base.faces(), 0, 3)[0];
        let mut topology = sphere_with_land(&[0, far]);
        let faces = topology.faces_mut();
        let (regions, ids) = singles(faces, &[0, far]);

        assert_eq!(find_nearest_region_to_island(faces, &regions, ids[0], 3), Some(ids[1]));
        assert_eq!(find_nearest_region_to_island(faces, &regions, ids[0], 2), None);
    }

    #[test]
    fn test_nearby_island_is_merged() {
        let base = small_sphere();
        let far = ring(base.faces(), 0, 2)[0];
        let mut topology = sphere_with_land(&[0, far]);
        let faces = topology.faces_mut();
        let (mut regions, ids) = singles(faces, &[0, far]);

        let report = claim_islands(faces, &mut regions, &settings(4, 2));

        assert_eq!(report.merged, 1);
        assert_eq!(report.sunk, 0);
        assert_eq!(regions.active_count(), 1);
        // Equal sizes: the searcher absorbs what it found and is searched again
        assert!(regions.is_active(ids[0]));
        assert_eq!(regions.get(ids[0]).unwrap().size(), 2);
        assert_eq!(regions.get(ids[1]).unwrap().state, RegionState::Merged { into: ids[0] });
        assert_eq!(report.passes, 2);
    }

    #[test]
    fn test_larger_neighbor_absorbs_island() {
        let base = small_sphere();
        let far = ring(base.faces(), 0, 2)[0];
        let beside = base.faces()[far].connected_faces[0];
        let mut topology = sphere_with_land(&[0, far, beside]);
        let faces = topology.faces_mut();
        let mut regions = RegionSet::new();
        let island = regions.create_region(faces, 0);
        let mainland = regions.create_region(faces, far);
        regions.add_face(faces, mainland, beside);

        let report = claim_islands(faces, &mut regions, &settings(4, 2));

        assert_eq!(report.merged, 1);
        assert_eq!(regions.get(island).unwrap().state, RegionState::Merged { into: mainland });
        assert_eq!(regions.get(mainland).unwrap().size(), 3);
        assert_eq!(faces[0].region, Some(mainland));
    }

    #[test]
    fn test_remote_tiny_island_sinks() {
        let mut topology = sphere_with_land(&[0]);
        let faces = topology.faces_mut();
        let (mut regions, ids) = singles(faces, &[0]);

        let report = claim_islands(faces, &mut regions, &settings(4, 3));

        assert_eq!(report.sunk, 1);
        assert_eq!(regions.active_count(), 0);
        assert_eq!(regions.get(ids[0]).unwrap().state, RegionState::Sunk);
        assert!(faces[0].cell_type.is_water());
        assert_eq!(faces[0].region, None);
    }

    #[test]
    fn test_remote_island_above_kill_size_survives() {
        let base = small_sphere();
        let (a, b) = (0, base.faces()[0].connected_faces[0]);
        let mut topology = sphere_with_land(&[a, b]);
        let faces = topology.faces_mut();
        let mut regions = RegionSet::new();
        let r = regions.create_region(faces, a);
        regions.add_face(faces, r, b);

        let report = claim_islands(faces, &mut regions, &settings(4, 2));

        assert_eq!(report, IslandReport { merged: 0, sunk: 0, passes: 1 });
        assert!(regions.is_active(r));
        assert!(faces[a].cell_type.is_land());
    }

    #[test]
    fn test_all_land_terminates_without_changes() {
        let mut topology = small_sphere();
        for face in topology.faces_mut() {
            face.cell_type = crate::topology::CellType::Land;
        }
        let faces = topology.faces_mut();
        let mut regions = RegionSet::new();
        let id = regions.create_region(faces, 0);
        for f in 1..faces.len() {
            regions.add_face(faces, id, f);
        }

        let report = claim_islands(faces, &mut regions, &settings(4, 3));
        assert_eq!(report.merged + report.sunk, 0);
        assert_eq!(regions.active_count(), 1);
    }
}
