//! River carving

use std::f32::consts::FRAC_PI_2;

use glam::{Quat, Vec3};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::rng::{random_perpendicular, random_unit_vector, GameRng};
use crate::topology::{FaceId, PlanetTopology};

/// Chance of stepping to a random land neighbor instead of the best one
pub const RIVER_WANDER_CHANCE: f64 = 0.3;

/// Start point plus four targets: three waypoints a quarter turn apart along a
/// great circle, and the start again to close the loop
pub fn river_waypoints(rng: &mut GameRng) -> (Vec3, [Vec3; 4]) {
    let start = random_unit_vector(rng);
    let axis = random_perpendicular(rng, start);
    let turn = |k: f32| Quat::from_axis_angle(axis, FRAC_PI_2 * k) * start;
    (start, [turn(1.0), turn(2.0), turn(3.0), start])
}

/// Carve one river; returns the number of faces turned to water
///
/// The walk only steps onto land, so it stops as soon as it runs into water
/// on every side. The final leg ends once the walk is back next to the face
/// it started from.
pub fn carve_river(topology: &mut PlanetTopology, rng: &mut GameRng) -> usize {
    let (start, targets) = river_waypoints(rng);
    let Some(mut current) = topology.nearest_face(start) else {
        return 0;
    };
    let start_face = current;

    let faces = topology.faces_mut();
    let mut carved = 0;
    if faces[current].cell_type.is_land() {
        faces[current].waterify();
        carved += 1;
    }

    let mut leg = 0;
    for _ in 0..faces.len() {
        let here = faces[current].mid_point;
        // Move on once the next waypoint is nearer than the one being chased
        if leg + 1 < targets.len()
            && here.distance_squared(targets[leg + 1]) < here.distance_squared(targets[leg])
        {
            leg += 1;
        }
        if leg + 1 == targets.len() && faces[current].connected_faces.contains(&start_face) {
            break;
        }

        let land: Vec<FaceId> = faces[current]
            .connected_faces
            .iter()
            .copied()
            .filter(|&f| faces[f].cell_type.is_land())
            .collect();
        if land.is_empty() {
            break;
        }

        let target = targets[leg];
        let next = if rng.gen_bool(RIVER_WANDER_CHANCE) {
            land.choose(rng).copied()
        } else {
            land.iter().copied().min_by(|&a, &b| {
                faces[a]
                    .mid_point
                    .distance_squared(target)
                    .total_cmp(&faces[b].mid_point.distance_squared(target))
            })
        };
        let Some(next) = next else { break };

        faces[next].waterify();
        carved += 1;
        current = next;
    }

    carved
}
