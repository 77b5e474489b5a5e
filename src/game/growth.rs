//! Per-turn population and military growth

use crate::config::PopulationConfig;
use crate::regions::RegionSet;

use super::RegionGameData;

/// Grow each loyalty faction of a region toward its maximum population
///
/// Faction `i` holds `population * loyalty[i]` people and grows logistically
/// at `growth_rate`, scaled by `loyal_growth` for the owner's faction and
/// `disloyal_growth` for everyone else's. Loyalty shares are renormalized to
/// the new faction sizes, so a well-loved owner gains share over time.
pub fn grow_population(data: &mut RegionGameData, config: &PopulationConfig) {
    if data.maximum_population <= 0.0 || data.population <= 0.0 {
        return;
    }
    let headroom = 1.0 - data.population / data.maximum_population;

    let masses: Vec<f64> = data
        .loyalty
        .iter()
        .enumerate()
        .map(|(player, &share)| {
            let mass = data.population * share;
            let factor = if player == data.owner {
                config.loyal_growth
            } else {
                config.disloyal_growth
            };
            (mass + config.growth_rate * factor * mass * headroom).max(0.0)
        })
        .collect();

    let total: f64 = masses.iter().sum();
    if total <= 0.0 {
        return;
    }
    data.population = total;
    data.loyalty = masses.into_iter().map(|m| m / total).collect();
}

/// Add this turn's military production to every region
///
/// A region produces its own `production` plus `neighbor_production_bonus`
/// times the production of each neighbor held by the same owner. Bonuses
/// are computed from production before anything changes hands.
pub fn grow_military(regions: &RegionSet, table: &mut [Option<RegionGameData>], config: &PopulationConfig) {
    let snapshot: Vec<Option<(usize, f64)>> = table
        .iter()
        .map(|d| d.as_ref().map(|d| (d.owner, d.production)))
        .collect();

    for region in regions.iter_active() {
        let Some(data) = table[region.id].as_mut() else { continue };
        let bonus: f64 = region
            .neighbors
            .iter()
            .filter_map(|&n| snapshot.get(n).copied().flatten())
            .filter(|&(owner, _)| owner == data.owner)
            .map(|(_, production)| production)
            .sum();
        data.military_size += data.production + config.neighbor_production_bonus * bonus;
    }
}
