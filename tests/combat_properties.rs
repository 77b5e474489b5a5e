//! Property tests for conflict and war resolution

use proptest::prelude::*;
use rust_globe_conquest::game::{do_war_with_luck, pairings, resolve_conflict, war_round, Combatant};

fn troops() -> impl Strategy<Value = f64> {
    (1u32..5_000).prop_map(f64::from)
}

fn effectiveness() -> impl Strategy<Value = f64> {
    (1u32..=40).prop_map(|e| f64::from(e) / 20.0)
}

proptest! {
    /// Exactly one side survives a conflict, never with more than it brought
    #[test]
    fn conflict_has_one_survivor(
        n_a in troops(), e_a in effectiveness(),
        n_d in troops(), e_d in effectiveness(),
    ) {
        let result = resolve_conflict((n_a, e_a), (n_d, e_d), 0.0);
        prop_assert!(result.attacker_remaining == 0.0 || result.defender_remaining == 0.0);
        prop_assert!(result.attacker_remaining <= n_a);
        prop_assert!(result.defender_remaining <= n_d);
    }

    /// The loser's deficit formula, checked from the winner's side
    #[test]
    fn winner_keeps_margin(
        n_a in troops(), e_a in effectiveness(),
        n_d in troops(), e_d in effectiveness(),
    ) {
        let (f_a, f_d) = (n_a * e_a, n_d * e_d);
        let result = resolve_conflict((n_a, e_a), (n_d, e_d), 0.0);
        if f_a > f_d {
            prop_assert_eq!(result.attacker_remaining, (n_a * (f_a - f_d) / f_a).ceil());
        } else {
            prop_assert_eq!(result.defender_remaining, (n_d * (f_d - f_a) / f_d).ceil());
        }
    }

    /// Better attackers never end up with fewer troops
    #[test]
    fn attacker_effectiveness_is_monotonic(
        n_a in troops(), e_a in effectiveness(), bump in 1u32..20,
        n_d in troops(), e_d in effectiveness(),
    ) {
        let better = e_a + f64::from(bump) / 20.0;
        let before = resolve_conflict((n_a, e_a), (n_d, e_d), 0.0);
        let after = resolve_conflict((n_a, better), (n_d, e_d), 0.0);
        prop_assert!(after.attacker_remaining >= before.attacker_remaining);
        prop_assert!(after.defender_remaining <= before.defender_remaining);
    }

    /// A round commits each combatant's troops evenly across its pairings,
    /// so nobody comes out of it with more than they put in plus rounding
    #[test]
    fn round_respects_commitment(
        forces in prop::collection::vec((troops(), effectiveness()), 2..6),
    ) {
        let combatants: Vec<Combatant> = forces
            .iter()
            .enumerate()
            .map(|(p, &(n, e))| Combatant::new(p, n, e))
            .collect();
        let share = (combatants.len() - 1) as f64;
        let remaining = war_round(&combatants, &mut || 0.0);
        for (c, r) in combatants.iter().zip(remaining) {
            prop_assert!(r >= 0.0);
            prop_assert!(r <= c.troops + share);
        }
    }

    /// Each combatant's commitments across its pairings sum to its troops
    #[test]
    fn pairings_conserve_troops(
        forces in prop::collection::vec((troops(), effectiveness()), 2..7),
    ) {
        let combatants: Vec<Combatant> = forces
            .iter()
            .enumerate()
            .map(|(p, &(n, e))| Combatant::new(p, n, e))
            .collect();
        let k = combatants.len();
        let pairs = pairings(&combatants);
        prop_assert_eq!(pairs.len(), k * (k - 1) / 2);

        let mut committed = vec![0.0f64; k];
        for pair in &pairs {
            committed[pair.defender] += pair.defender_troops;
            committed[pair.attacker] += pair.attacker_troops;
        }
        for (c, total) in combatants.iter().zip(committed) {
            prop_assert!((total - c.troops).abs() <= 1e-9 * c.troops.max(1.0));
        }
    }

    /// Wars always end with one winner drawn from the participants
    #[test]
    fn war_terminates_with_one_winner(
        defender in (troops(), effectiveness()),
        attackers in prop::collection::vec((troops(), effectiveness()), 1..5),
        lucks in prop::collection::vec(-0.3f64..0.3, 1..16),
    ) {
        let defender = Combatant::new(0, defender.0, defender.1);
        let attackers: Vec<Combatant> = attackers
            .iter()
            .enumerate()
            .map(|(i, &(n, e))| Combatant::new(i + 1, n, e))
            .collect();

        let mut draws = lucks.iter().copied().cycle();
        let mut luck = || draws.next().unwrap_or(0.0);
        let outcome = do_war_with_luck(defender, &attackers, 50, &mut luck);

        prop_assert!(outcome.winner <= attackers.len());
        prop_assert!(outcome.rounds <= 50);
        prop_assert!(outcome.remaining >= 0.0);
        if outcome.remaining == 0.0 {
            prop_assert_eq!(outcome.winner, 0);
        }
    }
}

#[test]
fn concrete_tie_annihilates_both() {
    let result = resolve_conflict((100.0, 1.0), (100.0, 1.0), 0.0);
    assert_eq!(result.attacker_remaining, 0.0);
    assert_eq!(result.defender_remaining, 0.0);
}
