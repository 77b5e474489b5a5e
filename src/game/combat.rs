//! Combat resolution
//!
//! A battle is fought between combatants, one per player. Two combatants
//! fight a single conflict; three or more split their troops evenly over one
//! conflict with each other combatant, and the round repeats on the survivors
//! until one is left.

use crate::config::CombatConfig;
use crate::rng::{clamped_gaussian, GameRng};

use super::PlayerId;

/// One side of a battle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Combatant {
    /// Player fighting
    pub player: PlayerId,
    /// Troops committed
    pub troops: f64,
    /// Force per troop
    pub effectiveness: f64,
}

impl Combatant {
    /// Create a combatant for `player`
    pub fn new(player: PlayerId, troops: f64, effectiveness: f64) -> Self {
        Self {
            player,
            troops,
            effectiveness,
        }
    }

    /// Troops times effectiveness
    #[inline]
    pub fn force(&self) -> f64 {
        self.troops * self.effectiveness
    }
}

/// Surviving troops of a single conflict
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ConflictResult {
    pub attacker_remaining: f64,
    pub defender_remaining: f64,
}

/// Result of a full battle
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WarOutcome {
    /// Player left holding the field
    pub winner: PlayerId,
    /// Winner's surviving troops
    pub remaining: f64,
    /// Rounds fought
    pub rounds: usize,
    /// Whether the round cap decided the battle
    pub capped: bool,
}

/// Attacker effectiveness for a source `distance` away from the target
///
/// Falls linearly from the band's maximum at distance 0 to its minimum at
/// `attack_range` and stays there beyond it.
pub fn attack_effectiveness(distance: f64, config: &CombatConfig) -> f64 {
    let t = (distance / config.attack_range).clamp(0.0, 1.0);
    config.attack_effectiveness_max - (config.attack_effectiveness_max - config.attack_effectiveness_min) * t
}

/// Defender effectiveness given the owner's loyalty share in the region
pub fn defense_effectiveness(owner_loyalty: f64, config: &CombatConfig) -> f64 {
    let w = config.loyalty_defense_weight.clamp(0.0, 1.0);
    config.defense_effectiveness * (1.0 - w + w * owner_loyalty.clamp(0.0, 1.0))
}

/// Fight one conflict
///
/// `luck` scales the attacker's force by `1 + luck`. The side with the
/// larger force wins and keeps `ceil(troops * margin / force)` troops; the
/// loser keeps none. Only a strictly larger attacker force wins, so an exact
/// tie leaves the defender as winner with a margin of 0 and both sides empty.
pub fn resolve_conflict(attacker: (f64, f64), defender: (f64, f64), luck: f64) -> ConflictResult {
    let (n_a, e_a) = attacker;
    let (n_d, e_d) = defender;
    let f_a = (n_a * e_a * (1.0 + luck)).max(0.0);
    let f_d = (n_d * e_d).max(0.0);

    let diff = f_d - f_a;
    if diff < 0.0 {
        ConflictResult {
            attacker_remaining: (n_a * -diff / f_a).ceil(),
            defender_remaining: 0.0,
        }
    } else {
        let defender_remaining = if f_d > 0.0 { (n_d * diff / f_d).ceil() } else { 0.0 };
        ConflictResult {
            attacker_remaining: 0.0,
            defender_remaining,
        }
    }
}

/// One conflict of a round: combatant indices and the troops each commits
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Pairing {
    pub defender: usize,
    pub attacker: usize,
    pub defender_troops: f64,
    pub attacker_troops: f64,
}

/// Every conflict of a round among `combatants`
///
/// Every pair fights once and each combatant commits `troops / (k - 1)` to
/// each of its `k - 1` conflicts, so its commitments add up to its troops.
/// The combatant listed first in a pair defends.
pub fn pairings(combatants: &[Combatant]) -> Vec<Pairing> {
    let k = combatants.len();
    if k < 2 {
        return Vec::new();
    }
    let share = (k - 1) as f64;
    let mut pairs = Vec::with_capacity(k * (k - 1) / 2);
    for i in 0..k {
        for j in (i + 1)..k {
            pairs.push(Pairing {
                defender: i,
                attacker: j,
                defender_troops: combatants[i].troops / share,
                attacker_troops: combatants[j].troops / share,
            });
        }
    }
    pairs
}

/// Fight one round among `combatants`, returning their surviving troops
pub fn war_round(combatants: &[Combatant], luck: &mut impl FnMut() -> f64) -> Vec<f64> {
    if combatants.len() < 2 {
        return combatants.iter().map(|c| c.troops).collect();
    }

    let mut remaining = vec![0.0; combatants.len()];
    for pair in pairings(combatants) {
        let result = resolve_conflict(
            (pair.attacker_troops, combatants[pair.attacker].effectiveness),
            (pair.defender_troops, combatants[pair.defender].effectiveness),
            luck(),
        );
        remaining[pair.defender] += result.defender_remaining;
        remaining[pair.attacker] += result.attacker_remaining;
    }
    remaining
}

/// Fight a battle to a single winner with an explicit luck source
///
/// `defender` holds the region. Attackers of the same player should already
/// be combined. If the round cap is reached, the largest remaining force
/// wins; if everyone is wiped out, the defender keeps the region with no
/// troops.
pub fn do_war_with_luck(
    defender: Combatant,
    attackers: &[Combatant],
    max_rounds: usize,
    luck: &mut impl FnMut() -> f64,
) -> WarOutcome {
    let mut combatants: Vec<Combatant> = std::iter::once(defender)
        .chain(attackers.iter().copied())
        .filter(|c| c.troops > 0.0)
        .collect();

    let mut rounds = 0;
    while combatants.len() > 1 && rounds < max_rounds {
        rounds += 1;
        let remaining = war_round(&combatants, luck);
        for (c, r) in combatants.iter_mut().zip(remaining) {
            c.troops = r;
        }
        combatants.retain(|c| c.troops > 0.0);
    }

    let capped = combatants.len() > 1;
    let survivor = combatants
        .iter()
        .copied()
        .max_by(|a, b| a.force().total_cmp(&b.force()));

    match survivor {
        Some(winner) => WarOutcome {
            winner: winner.player,
            remaining: winner.troops,
            rounds,
            capped,
        },
        None => WarOutcome {
            winner: defender.player,
            remaining: 0.0,
            rounds,
            capped,
        },
    }
}

/// Fight a battle with Gaussian luck drawn from `rng`
pub fn do_war(defender: Combatant, attackers: &[Combatant], config: &CombatConfig, rng: &mut GameRng) -> WarOutcome {
    let range = config.luck_range;
    let mut luck = || clamped_gaussian(rng, range);
    do_war_with_luck(defender, attackers, config.max_war_rounds, &mut luck)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::seeded;

    fn no_luck() -> impl FnMut() -> f64 {
        || 0.0
    }

    /// Equal forces annihilate each other
    #[test]
    fn test_tie_is_mutual_annihilation() {
        let result = resolve_conflict((100.0, 1.0), (100.0, 1.0), 0.0);
        assert_eq!(result.attacker_remaining, 0.0);
        assert_eq!(result.defender_remaining, 0.0);
    }

    #[test]
    fn test_winner_keeps_margin() {
        // Attacker force 150 vs 100: keeps ceil(100 * 50 / 150) = 34
        let result = resolve_conflict((100.0, 1.5), (100.0, 1.0), 0.0);
        assert_eq!(result.attacker_remaining, 34.0);
        assert_eq!(result.defender_remaining, 0.0);

        // Defender force 200 vs 60: keeps ceil(100 * 140 / 200) = 70
        let result = resolve_conflict((60.0, 1.0), (100.0, 2.0), 0.0);
        assert_eq!(result.attacker_remaining, 0.0);
        assert_eq!(result.defender_remaining, 70.0);
    }

    #[test]
    fn test_luck_tips_a_tie() {
        let result = resolve_conflict((100.0, 1.0), (100.0, 1.0), 0.1);
        assert!(result.attacker_remaining > 0.0);
        let result = resolve_conflict((100.0, 1.0), (100.0, 1.0), -0.1);
        assert!(result.defender_remaining > 0.0);
    }

    #[test]
    fn test_empty_sides() {
        let result = resolve_conflict((0.0, 1.0), (0.0, 1.0), 0.0);
        assert_eq!(result, ConflictResult { attacker_remaining: 0.0, defender_remaining: 0.0 });

        let result = resolve_conflict((10.0, 1.0), (0.0, 1.0), 0.0);
        assert_eq!(result.attacker_remaining, 10.0);
    }

    #[test]
    fn test_effectiveness_band() {
        let config = CombatConfig::default();
        assert_eq!(attack_effectiveness(0.0, &config), config.attack_effectiveness_max);
        assert_eq!(attack_effectiveness(5.0, &config), config.attack_effectiveness_min);
        let mid = attack_effectiveness(config.attack_range / 2.0, &config);
        assert!(mid < config.attack_effectiveness_max && mid > config.attack_effectiveness_min);

        assert_eq!(defense_effectiveness(1.0, &config), config.defense_effectiveness);
        assert!(defense_effectiveness(0.0, &config) < config.defense_effectiveness);
    }

    /// Each combatant spreads its troops evenly over its pairings
    #[test]
    fn test_three_way_round_splits_troops() {
        let combatants = [
            Combatant::new(0, 100.0, 1.0),
            Combatant::new(1, 300.0, 1.0),
            Combatant::new(2, 10.0, 1.0),
        ];
        let remaining = war_round(&combatants, &mut no_luck());
        // 0 vs 1: 50 vs 150 -> 1 keeps ceil(150 * 100 / 150) = 100
        // 0 vs 2: 50 vs 5   -> 0 keeps ceil(50 * 45 / 50) = 45
        // 1 vs 2: 150 vs 5  -> 1 keeps ceil(150 * 145 / 150) = 145
        assert_eq!(remaining, vec![45.0, 245.0, 0.0]);
    }

    /// Commitments over a combatant's pairings add up to its troops
    #[test]
    fn test_pairings_conserve_troops() {
        let combatants = [
            Combatant::new(0, 90.0, 1.0),
            Combatant::new(1, 30.0, 1.4),
            Combatant::new(2, 12.0, 0.8),
            Combatant::new(3, 7.0, 1.0),
        ];
        let pairs = pairings(&combatants);
        assert_eq!(pairs.len(), 6);

        let mut committed = [0.0f64; 4];
        for pair in &pairs {
            assert!(pair.defender < pair.attacker);
            committed[pair.defender] += pair.defender_troops;
            committed[pair.attacker] += pair.attacker_troops;
        }
        for (c, total) in combatants.iter().zip(committed) {
            assert!((total - c.troops).abs() < 1e-9);
        }
        assert!(pairings(&combatants[..1]).is_empty());
    }

    #[test]
    fn test_war_single_winner() {
        let outcome = do_war_with_luck(
            Combatant::new(0, 100.0, 1.0),
            &[Combatant::new(1, 300.0, 1.0), Combatant::new(2, 10.0, 1.0)],
            32,
            &mut no_luck(),
        );
        assert_eq!(outcome.winner, 1);
        assert!(!outcome.capped);
        assert!(outcome.remaining > 0.0);
    }

    #[test]
    fn test_total_wipeout_leaves_defender() {
        let outcome = do_war_with_luck(
            Combatant::new(3, 100.0, 1.0),
            &[Combatant::new(1, 100.0, 1.0)],
            32,
            &mut no_luck(),
        );
        assert_eq!(outcome.winner, 3);
        assert_eq!(outcome.remaining, 0.0);
    }

    #[test]
    fn test_undefended_region_falls() {
        let outcome = do_war_with_luck(
            Combatant::new(0, 0.0, 1.2),
            &[Combatant::new(1, 40.0, 0.8)],
            32,
            &mut no_luck(),
        );
        assert_eq!(outcome.winner, 1);
        assert_eq!(outcome.remaining, 40.0);
        assert_eq!(outcome.rounds, 0);
    }

    #[test]
    fn test_round_cap_picks_largest_force() {
        let outcome = do_war_with_luck(
            Combatant::new(0, 100.0, 1.0),
            &[Combatant::new(1, 300.0, 1.0), Combatant::new(2, 10.0, 1.0)],
            0,
            &mut no_luck(),
        );
        assert!(outcome.capped);
        assert_eq!(outcome.winner, 1);
        assert_eq!(outcome.remaining, 300.0);
    }

    #[test]
    fn test_seeded_war_is_deterministic() {
        let config = CombatConfig::default();
        let fight = || {
            let mut rng = seeded(99);
            do_war(
                Combatant::new(0, 500.0, 1.1),
                &[Combatant::new(1, 480.0, 0.9), Combatant::new(2, 200.0, 1.0)],
                &config,
                &mut rng,
            )
        };
        assert_eq!(fight(), fight());
    }
}
