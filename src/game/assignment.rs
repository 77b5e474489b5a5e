//! Turn-zero setup: resources, ownership and loyalty of every region

use rand::Rng;

use crate::config::{GameConfig, PopulationConfig};
use crate::names::RegionNamer;
use crate::regions::{Region, RegionSet};
use crate::rng::GameRng;

use super::{PlayerId, RegionGameData};

/// Linear interpolation from `a` (t = 0) to `b` (t = 1)
#[inline]
pub fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + (b - a) * t
}

/// Climate multiplier for a region, from its midpoint's distance to the equator
///
/// The sphere's poles are on the Y axis.
pub fn latitude_factor(region: &Region, config: &PopulationConfig) -> f64 {
    let latitude = (region.mid_point.y as f64).abs().min(1.0);
    lerp(1.0 - latitude, config.polar, config.equatorial)
}

/// Loyalty vector with `owner_initial` for the owner and the rest split evenly
pub fn initial_loyalty(owner: PlayerId, player_count: usize, owner_initial: f64) -> Vec<f64> {
    if player_count <= 1 {
        return vec![1.0; player_count];
    }
    let others = (1.0 - owner_initial) / (player_count - 1) as f64;
    (0..player_count)
        .map(|p| if p == owner { owner_initial } else { others })
        .collect()
}

/// Owner for each of `capacities`, balancing per-player totals
///
/// Largest first, each goes to whichever player holds the smallest running
/// total (lowest ID on ties).
pub fn balance_owners(capacities: &[f64], player_count: usize) -> Vec<PlayerId> {
    let mut order: Vec<usize> = (0..capacities.len()).collect();
    order.sort_by(|&a, &b| capacities[b].total_cmp(&capacities[a]));

    let mut totals = vec![0.0f64; player_count];
    let mut owners = vec![0; capacities.len()];
    for idx in order {
        let mut smallest = 0;
        for p in 1..player_count {
            if totals[p] < totals[smallest] {
                smallest = p;
            }
        }
        totals[smallest] += capacities[idx];
        owners[idx] = smallest;
    }
    owners
}

/// Build the game data side table for every active region
///
/// Returns one entry per region ever created; inactive regions get `None`.
/// Each player ends up with the same total maximum population and the same
/// total production, unless they own nothing.
pub fn assign_regions(
    regions: &RegionSet,
    config: &GameConfig,
    namer: &mut RegionNamer,
    rng: &mut GameRng,
) -> Vec<Option<RegionGameData>> {
    let pop = &config.population;
    let player_count = config.players.len();
    let mut table: Vec<Option<RegionGameData>> = vec![None; regions.len()];

    let active = regions.active_ids();
    let mut capacities = Vec::with_capacity(active.len());
    for &id in &active {
        let region = &regions.all()[id];
        let size = region.size() as f64 * pop.face_area;
        let climate = latitude_factor(region, pop);
        let base_density = rng.gen_range(pop.low_base_density..=pop.high_base_density);
        let production_density = rng.gen_range(pop.low_production_density..=pop.high_production_density);

        let maximum_population = size * base_density * climate;
        capacities.push(maximum_population);
        table[id] = Some(RegionGameData {
            owner: 0,
            name: namer.next_name(rng),
            size,
            base_density,
            production: size * production_density * climate,
            maximum_population,
            population: 0.0,
            military_size: 0.0,
            loyalty: Vec::new(),
        });
    }

    let owners = balance_owners(&capacities, player_count);

    let mut max_totals = vec![0.0f64; player_count];
    let mut production_totals = vec![0.0f64; player_count];
    for (&id, &owner) in active.iter().zip(&owners) {
        if let Some(data) = table[id].as_mut() {
            data.owner = owner;
            max_totals[owner] += data.maximum_population;
            production_totals[owner] += data.production;
        }
    }

    let mean = |totals: &[f64]| {
        let owning: Vec<f64> = totals.iter().copied().filter(|&t| t > 0.0).collect();
        if owning.is_empty() {
            0.0
        } else {
            owning.iter().sum::<f64>() / owning.len() as f64
        }
    };
    let max_mean = mean(&max_totals);
    let production_mean = mean(&production_totals);

    for &id in &active {
        let Some(data) = table[id].as_mut() else { continue };
        let owner = data.owner;
        if max_totals[owner] > 0.0 {
            data.maximum_population *= max_mean / max_totals[owner];
        }
        if production_totals[owner] > 0.0 {
            data.production *= production_mean / production_totals[owner];
        }
        data.population = data.maximum_population * pop.initial_max;
        data.military_size = (data.population * pop.initial_military).floor();
        data.loyalty = initial_loyalty(owner, player_count, config.loyalty.owner_initial);
    }

    let owned = owners.iter().fold(vec![0usize; player_count], |mut acc, &o| {
        acc[o] += 1;
        acc
    });
    tracing::info!(regions = active.len(), per_player = ?owned, "assigned regions");

    table
}
