//! Turn-based simulation on a generated planet
//!
//! A [`Game`] owns the [`Planet`] and a side table of [`RegionGameData`]
//! keyed by region ID. Players queue [`PlannedAction`]s; [`Game::go`]
//! resolves them all at once in the order moves, settles, attacks, then
//! grows every region.

mod actions;
mod assignment;
mod combat;
mod growth;

pub use actions::{default_amount, validate_action, ActionKind, PlannedAction};
pub use assignment::{assign_regions, balance_owners, initial_loyalty, latitude_factor, lerp};
pub use combat::{
    attack_effectiveness, defense_effectiveness, do_war, do_war_with_luck, pairings, resolve_conflict, war_round,
    Combatant, ConflictResult, Pairing, WarOutcome,
};
pub use growth::{grow_military, grow_population};

use std::collections::{BTreeMap, HashMap};
use std::time::Instant;

use glam::Vec3;

use crate::config::{GameConfig, PlayerConfig};
use crate::error::{GlobeError, Result};
use crate::mesh::{Color, ColorSink};
use crate::names::RegionNamer;
use crate::planet::Planet;
use crate::regions::RegionId;
use crate::rng::{seeded, GameRng};
use crate::topology::FaceId;

/// Index of a player in [`Game::players`]
pub type PlayerId = usize;

/// A player and whether they are still in the game
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    pub npc: bool,
    pub color: Color,
    pub highlight_color: Color,
    /// False once the player owns no region
    pub alive: bool,
}

impl Player {
    fn from_config(id: PlayerId, config: &PlayerConfig) -> Self {
        Self {
            id,
            name: config.name.clone(),
            npc: config.npc,
            color: config.color,
            highlight_color: config.highlight_color,
            alive: true,
        }
    }
}

/// Simulation state of one region
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RegionGameData {
    /// Owning player
    pub owner: PlayerId,
    /// Display name
    pub name: String,
    /// Area: face count times the per-face area
    pub size: f64,
    /// Population density rolled at assignment
    pub base_density: f64,
    /// Troops produced per turn
    pub production: f64,
    /// Population the region grows toward
    pub maximum_population: f64,
    pub population: f64,
    /// Troops stationed
    pub military_size: f64,
    /// Share of the population loyal to each player; sums to 1
    pub loyalty: Vec<f64>,
}

impl RegionGameData {
    /// Loyalty share of the current owner
    pub fn owner_loyalty(&self) -> f64 {
        self.loyalty.get(self.owner).copied().unwrap_or(0.0)
    }
}

/// One battle fought during a turn
#[derive(Debug, Clone, PartialEq)]
pub struct Battle {
    pub region: RegionId,
    /// Owner before the battle
    pub defender: PlayerId,
    pub attackers: Vec<PlayerId>,
    pub winner: PlayerId,
    /// Whether the region changed hands
    pub captured: bool,
    /// Winner's troops left in the region
    pub troops_remaining: f64,
    pub civilian_losses: f64,
    pub rounds: usize,
}

/// What happened during one call to [`Game::go`]
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TurnReport {
    /// Turn number just resolved, starting at 1
    pub turn: u32,
    pub moves: usize,
    pub settles: usize,
    /// Actions dropped because their regions changed since planning
    pub skipped: usize,
    pub battles: Vec<Battle>,
    /// Players who lost their last region this turn
    pub eliminated: Vec<PlayerId>,
}

impl TurnReport {
    /// Number of regions that changed hands
    pub fn captures(&self) -> usize {
        self.battles.iter().filter(|b| b.captured).count()
    }
}

/// Sums over a player's regions
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PlayerTotals {
    pub regions: usize,
    pub population: f64,
    pub military: f64,
    pub production: f64,
}

/// A game in progress
pub struct Game {
    planet: Planet,
    config: GameConfig,
    players: Vec<Player>,
    table: Vec<Option<RegionGameData>>,
    planned: Vec<PlannedAction>,
    picked: Option<RegionId>,
    turn: u32,
    rng: GameRng,
    sink: Option<Box<dyn ColorSink>>,
}

impl Game {
    /// Start a game, seeding its generator from the planet's seed
    ///
    /// # Errors
    ///
    /// `InvalidConfig` if the game configuration does not validate.
    pub fn new(planet: Planet, config: GameConfig) -> Result<Self> {
        let seed = planet.config().seed;
        Self::with_seed(planet, config, seed)
    }

    /// Start a game with an explicit simulation seed
    ///
    /// Regions are handed out, named and colored by owner.
    pub fn with_seed(planet: Planet, config: GameConfig, seed: u32) -> Result<Self> {
        config.validate()?;
        let mut rng = seeded(seed);
        let mut namer = RegionNamer::new();
        let table = assign_regions(planet.regions(), &config, &mut namer, &mut rng);
        let players = config
            .players
            .iter()
            .enumerate()
            .map(|(id, p)| Player::from_config(id, p))
            .collect();

        let mut game = Self {
            planet,
            config,
            players,
            table,
            planned: Vec::new(),
            picked: None,
            turn: 0,
            rng,
            sink: None,
        };
        game.refresh_alive();
        for id in game.planet.regions().active_ids() {
            game.paint_region(id);
        }
        Ok(game)
    }

    /// Install the receiver for color refreshes and send it the current colors
    pub fn set_color_sink(&mut self, sink: Box<dyn ColorSink>) {
        self.sink = Some(sink);
        self.push_colors();
    }

    /// The planet being played on
    #[inline]
    pub fn planet(&self) -> &Planet {
        &self.planet
    }

    #[inline]
    pub fn config(&self) -> &GameConfig {
        &self.config
    }

    #[inline]
    pub fn players(&self) -> &[Player] {
        &self.players
    }

    /// Get a player
    ///
    /// # Errors
    ///
    /// `PlayerNotFound` for unknown IDs.
    pub fn player(&self, id: PlayerId) -> Result<&Player> {
        self.players.get(id).ok_or(GlobeError::PlayerNotFound(id))
    }

    /// Number of turns resolved so far
    #[inline]
    pub fn turn(&self) -> u32 {
        self.turn
    }

    /// Simulation state of an active region
    ///
    /// # Errors
    ///
    /// `RegionNotFound` or `RegionInactive`
    pub fn region_data(&self, id: RegionId) -> Result<&RegionGameData> {
        self.planet.region(id)?;
        self.table
            .get(id)
            .and_then(Option::as_ref)
            .ok_or(GlobeError::RegionNotFound(id))
    }

    /// Regions currently owned by `player`, ascending
    pub fn regions_of(&self, player: PlayerId) -> Vec<RegionId> {
        self.table
            .iter()
            .enumerate()
            .filter_map(|(id, d)| d.as_ref().filter(|d| d.owner == player).map(|_| id))
            .collect()
    }

    /// Sum population, troops and production over a player's regions
    pub fn totals(&self, player: PlayerId) -> Result<PlayerTotals> {
        self.player(player)?;
        let mut totals = PlayerTotals::default();
        for data in self.table.iter().flatten().filter(|d| d.owner == player) {
            totals.regions += 1;
            totals.population += data.population;
            totals.military += data.military_size;
            totals.production += data.production;
        }
        Ok(totals)
    }

    /// The last player standing, if only one is left
    pub fn winner(&self) -> Option<PlayerId> {
        let mut alive = self.players.iter().filter(|p| p.alive);
        match (alive.next(), alive.next()) {
            (Some(p), None) => Some(p.id),
            _ => None,
        }
    }

    /// Actions queued for the next turn
    #[inline]
    pub fn planned_actions(&self) -> &[PlannedAction] {
        &self.planned
    }

    /// Default amount for an action of `kind` out of region `from`
    pub fn default_amount(&self, kind: ActionKind, from: RegionId) -> Result<f64> {
        let source = self.region_data(from)?;
        Ok(default_amount(kind, source, &self.config.actions))
    }

    /// Queue an action for the next turn
    ///
    /// # Errors
    ///
    /// `PlayerNotFound`, `RegionNotFound`, `RegionInactive`, or
    /// `InvalidAction` when ownership or amounts do not allow it.
    pub fn plan_action(&mut self, action: PlannedAction) -> Result<()> {
        self.player(action.player)?;
        let source = self.region_data(action.from)?;
        let target = self.region_data(action.to)?;

        let pool = action.kind.uses_military();
        let committed: f64 = self
            .planned
            .iter()
            .filter(|a| a.player == action.player && a.from == action.from && a.kind.uses_military() == pool)
            .map(|a| a.amount)
            .sum();
        validate_action(&action, source, target, committed)?;

        tracing::debug!(
            player = action.player,
            kind = %action.kind,
            from = action.from,
            to = action.to,
            amount = action.amount,
            "planned action"
        );
        self.planned.push(action);
        Ok(())
    }

    /// Queue an action with the default amount; returns the amount queued
    pub fn plan(&mut self, player: PlayerId, kind: ActionKind, from: RegionId, to: RegionId) -> Result<f64> {
        let amount = self.default_amount(kind, from)?;
        self.plan_action(PlannedAction {
            player,
            kind,
            from,
            to,
            amount,
        })?;
        Ok(amount)
    }

    /// Drop every queued action of `player`; returns how many were dropped
    pub fn cancel_actions(&mut self, player: PlayerId) -> usize {
        let before = self.planned.len();
        self.planned.retain(|a| a.player != player);
        before - self.planned.len()
    }

    /// Resolve all queued actions and grow every region
    pub fn go(&mut self) -> TurnReport {
        let start = Instant::now();
        self.turn += 1;
        let mut report = TurnReport {
            turn: self.turn,
            ..Default::default()
        };

        let (mut moves, mut settles, mut attacks) = (Vec::new(), Vec::new(), Vec::new());
        for action in std::mem::take(&mut self.planned) {
            match action.kind {
                ActionKind::Move => moves.push(action),
                ActionKind::Settle => settles.push(action),
                ActionKind::Attack => attacks.push(action),
            }
        }

        self.resolve_moves(&moves, &mut report);
        self.resolve_settles(&settles, &mut report);
        self.resolve_attacks(&attacks, &mut report);
        self.grow();
        report.eliminated = self.refresh_alive();

        if report.captures() > 0 {
            self.push_colors();
        }

        tracing::info!(
            turn = self.turn,
            moves = report.moves,
            settles = report.settles,
            battles = report.battles.len(),
            captures = report.captures(),
            elapsed_ms = start.elapsed().as_millis() as u64,
            "resolved turn"
        );
        for &player in &report.eliminated {
            tracing::info!(player, turn = self.turn, "player eliminated");
        }

        report
    }

    /// Highlight a region in its owner's highlight color, restoring the previous pick
    ///
    /// `None` clears the highlight.
    pub fn pick_region(&mut self, region: Option<RegionId>) -> Result<()> {
        if let Some(id) = region {
            self.region_data(id)?;
        }
        let previous = std::mem::replace(&mut self.picked, region);
        if let Some(prev) = previous.filter(|&p| Some(p) != region) {
            self.paint_region(prev);
        }
        if let Some(id) = region {
            self.paint_region(id);
        }
        self.push_colors();
        Ok(())
    }

    /// Pick the region owning `face`; water clears the pick
    pub fn pick_face(&mut self, face: FaceId) -> Option<RegionId> {
        let region = self.planet.region_of_face(face);
        match self.pick_region(region) {
            Ok(()) => region,
            Err(_) => None,
        }
    }

    /// Pick the region under a 3D position
    pub fn pick_at(&mut self, position: Vec3) -> Option<RegionId> {
        let face = self.planet.face_at(position)?;
        self.pick_face(face)
    }

    /// Currently highlighted region
    #[inline]
    pub fn picked_region(&self) -> Option<RegionId> {
        self.picked
    }

    fn entry(&self, id: RegionId) -> Option<&RegionGameData> {
        self.table.get(id).and_then(Option::as_ref)
    }

    fn entry_mut(&mut self, id: RegionId) -> Option<&mut RegionGameData> {
        self.table.get_mut(id).and_then(Option::as_mut)
    }

    /// Whether both ends of an action are still as they were when planned
    fn owns(&self, player: PlayerId, region: RegionId) -> bool {
        self.entry(region).is_some_and(|d| d.owner == player)
    }

    fn resolve_moves(&mut self, moves: &[PlannedAction], report: &mut TurnReport) {
        for action in moves {
            if !self.owns(action.player, action.from) || !self.owns(action.player, action.to) {
                report.skipped += 1;
                continue;
            }
            let Some(source) = self.entry_mut(action.from) else { continue };
            let troops = action.amount.min(source.military_size);
            if troops <= 0.0 {
                report.skipped += 1;
                continue;
            }
            source.military_size -= troops;
            if let Some(target) = self.entry_mut(action.to) {
                target.military_size += troops;
            }
            report.moves += 1;
        }
    }

    /// Settlers into one region share its free capacity in proportion to
    /// their numbers; loyalty blends by population.
    fn resolve_settles(&mut self, settles: &[PlannedAction], report: &mut TurnReport) {
        let mut by_target: BTreeMap<RegionId, Vec<(RegionId, f64)>> = BTreeMap::new();
        let mut offered: HashMap<RegionId, f64> = HashMap::new();

        for action in settles {
            if !self.owns(action.player, action.from) || !self.owns(action.player, action.to) {
                report.skipped += 1;
                continue;
            }
            let Some(source) = self.entry(action.from) else { continue };
            let already = offered.entry(action.from).or_insert(0.0);
            let people = action.amount.min(source.population - *already);
            if people <= 0.0 {
                report.skipped += 1;
                continue;
            }
            *already += people;
            by_target.entry(action.to).or_default().push((action.from, people));
        }

        for (to, offers) in by_target {
            let Some(target) = self.entry(to) else { continue };
            let total: f64 = offers.iter().map(|&(_, n)| n).sum();
            let headroom = (target.maximum_population - target.population).max(0.0);
            let accepted = if total > 0.0 { (headroom / total).min(1.0) } else { 0.0 };

            for (from, people) in offers {
                let moving = people * accepted;
                if moving <= 0.0 {
                    report.skipped += 1;
                    continue;
                }
                let Some(source) = self.entry_mut(from) else { continue };
                source.population -= moving;
                let incoming = source.loyalty.clone();

                let Some(target) = self.entry_mut(to) else { continue };
                let merged = target.population + moving;
                for (share, theirs) in target.loyalty.iter_mut().zip(incoming) {
                    *share = (*share * target.population + theirs * moving) / merged;
                }
                target.population = merged;
                report.settles += 1;
            }
        }
    }

    /// Every attacking force leaves home before any battle is fought, so a
    /// region can send troops out and be attacked in the same turn.
    fn resolve_attacks(&mut self, attacks: &[PlannedAction], report: &mut TurnReport) {
        let combat = self.config.combat;
        let mut by_target: BTreeMap<RegionId, Vec<Combatant>> = BTreeMap::new();

        for action in attacks {
            if !self.owns(action.player, action.from) || self.owns(action.player, action.to) {
                report.skipped += 1;
                continue;
            }
            let (Ok(from), Ok(to)) = (self.planet.region(action.from), self.planet.region(action.to)) else {
                report.skipped += 1;
                continue;
            };
            let distance = from.mid_point.distance(to.mid_point) as f64;
            let effectiveness = attack_effectiveness(distance, &combat);

            let Some(source) = self.entry_mut(action.from) else { continue };
            let troops = action.amount.min(source.military_size);
            if troops <= 0.0 {
                report.skipped += 1;
                continue;
            }
            source.military_size -= troops;

            let forces = by_target.entry(action.to).or_default();
            match forces.iter_mut().find(|c| c.player == action.player) {
                // Same player from several regions: one force, troop-weighted effectiveness
                Some(force) => {
                    let total = force.troops + troops;
                    force.effectiveness = (force.force() + troops * effectiveness) / total;
                    force.troops = total;
                }
                None => forces.push(Combatant::new(action.player, troops, effectiveness)),
            }
        }

        for (region, attackers) in by_target {
            let Some(data) = self.entry(region) else { continue };
            let owner = data.owner;
            let garrison = data.military_size;
            let defender = Combatant::new(owner, garrison, defense_effectiveness(data.owner_loyalty(), &combat));

            let outcome = do_war(defender, &attackers, &combat, &mut self.rng);
            let captured = outcome.winner != owner;

            let surviving_defenders = if captured { 0.0 } else { outcome.remaining };
            let losses = if garrison > 0.0 {
                ((garrison - surviving_defenders) / garrison).clamp(0.0, 1.0)
            } else {
                0.0
            };

            let Some(data) = self.entry_mut(region) else { continue };
            let civilian_losses = data.population * combat.civilian_casualty_rate * losses;
            data.population -= civilian_losses;
            data.military_size = outcome.remaining;
            if captured {
                data.owner = outcome.winner;
            }

            tracing::debug!(
                region,
                defender = owner,
                winner = outcome.winner,
                rounds = outcome.rounds,
                capped = outcome.capped,
                "battle"
            );
            if captured {
                tracing::info!(region, from = owner, to = outcome.winner, "region captured");
                self.paint_region(region);
            }

            report.battles.push(Battle {
                region,
                defender: owner,
                attackers: attackers.iter().map(|c| c.player).collect(),
                winner: outcome.winner,
                captured,
                troops_remaining: outcome.remaining,
                civilian_losses,
                rounds: outcome.rounds,
            });
        }
    }

    fn grow(&mut self) {
        let population = self.config.population;
        for data in self.table.iter_mut().flatten() {
            grow_population(data, &population);
        }
        grow_military(self.planet.regions(), &mut self.table, &population);
    }

    /// Mark players with no regions as out; returns the newly eliminated
    fn refresh_alive(&mut self) -> Vec<PlayerId> {
        let mut owned = vec![0usize; self.players.len()];
        for data in self.table.iter().flatten() {
            if let Some(count) = owned.get_mut(data.owner) {
                *count += 1;
            }
        }

        let mut eliminated = Vec::new();
        for player in self.players.iter_mut() {
            if player.alive && owned[player.id] == 0 {
                player.alive = false;
                eliminated.push(player.id);
            }
        }
        eliminated
    }

    /// Color a region by its owner, highlighted if picked
    fn paint_region(&mut self, id: RegionId) {
        let Some(owner) = self.entry(id).map(|d| d.owner) else { return };
        let Some(player) = self.players.get(owner) else { return };
        let color = if self.picked == Some(id) {
            player.highlight_color
        } else {
            player.color
        };
        if let Err(err) = self.planet.set_region_color(id, color) {
            tracing::warn!(region = id, %err, "could not paint region");
        }
    }

    fn push_colors(&mut self) {
        if let Some(sink) = self.sink.as_mut() {
            let colors = self.planet.vertex_colors();
            sink.re_color_all(&colors);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PlanetConfigBuilder, PlanetSize};
    use std::cell::Cell;
    use std::rc::Rc;

    fn game(players: usize) -> Game {
        let config = PlanetConfigBuilder::new()
            .seed(42)
            .planet_size(PlanetSize::Small)
            .build()
            .unwrap();
        let planet = Planet::generate(config).unwrap();
        Game::new(planet, GameConfig::with_players(players)).unwrap()
    }

    /// First region of each of two different owners
    fn rivals(game: &Game) -> (RegionId, RegionId) {
        let mine = game.regions_of(0)[0];
        let theirs = game.regions_of(1)[0];
        (mine, theirs)
    }

    struct CountingSink(Rc<Cell<usize>>);

    impl ColorSink for CountingSink {
        fn re_color_all(&mut self, _colors: &[Color]) {
            self.0.set(self.0.get() + 1);
        }
    }

    #[test]
    fn test_every_region_assigned() {
        let game = game(3);
        for region in game.planet().regions().iter_active() {
            let data = game.region_data(region.id).unwrap();
            assert!(data.owner < 3);
            assert!(data.military_size >= 0.0);
            let color = game.players()[data.owner].color;
            assert_eq!(game.planet().faces()[region.faces[0]].color, color);
        }
        assert!(game.players().iter().all(|p| p.alive));
        assert_eq!(game.winner(), None);
    }

    #[test]
    fn test_plan_action_errors() {
        let mut game = game(2);
        let (mine, theirs) = rivals(&game);

        let attack = PlannedAction {
            player: 0,
            kind: ActionKind::Attack,
            from: mine,
            to: theirs,
            amount: 1.0,
        };
        assert!(matches!(
            game.plan_action(PlannedAction { player: 9, ..attack }),
            Err(GlobeError::PlayerNotFound(9))
        ));
        assert!(matches!(
            game.plan_action(PlannedAction { from: usize::MAX, ..attack }),
            Err(GlobeError::RegionNotFound(_))
        ));
        assert!(matches!(
            game.plan_action(PlannedAction { player: 1, ..attack }),
            Err(GlobeError::InvalidAction(_))
        ));

        let inactive = game.planet().regions().all().iter().find(|r| !r.is_active()).map(|r| r.id);
        if let Some(id) = inactive {
            assert!(matches!(
                game.plan_action(PlannedAction { to: id, ..attack }),
                Err(GlobeError::RegionInactive(_))
            ));
        }
        assert!(game.planned_actions().is_empty());
    }

    #[test]
    fn test_move_transfers_troops() {
        let mut game = game(2);
        let owned = game.regions_of(0);
        let (a, b) = (owned[0], owned[1]);
        game.entry_mut(a).unwrap().military_size = 100.0;
        let before_b = game.region_data(b).unwrap().military_size;

        let mut report = TurnReport::default();
        let action = PlannedAction {
            player: 0,
            kind: ActionKind::Move,
            from: a,
            to: b,
            amount: 40.0,
        };
        game.resolve_moves(&[action], &mut report);

        assert_eq!(report.moves, 1);
        assert_eq!(game.region_data(a).unwrap().military_size, 60.0);
        assert_eq!(game.region_data(b).unwrap().military_size, before_b + 40.0);
    }

    #[test]
    fn test_settle_blends_loyalty_within_headroom() {
        let mut game = game(2);
        let owned = game.regions_of(0);
        let (a, b) = (owned[0], owned[1]);
        {
            let source = game.entry_mut(a).unwrap();
            source.population = 1000.0;
            source.loyalty = vec![1.0, 0.0];
        }
        {
            let target = game.entry_mut(b).unwrap();
            target.population = 100.0;
            target.maximum_population = 200.0;
            target.loyalty = vec![0.0, 1.0];
        }

        let mut report = TurnReport::default();
        let action = PlannedAction {
            player: 0,
            kind: ActionKind::Settle,
            from: a,
            to: b,
            amount: 500.0,
        };
        game.resolve_settles(&[action], &mut report);

        // Only 100 fit
        let target = game.region_data(b).unwrap();
        assert_eq!(target.population, 200.0);
        assert!((target.loyalty[0] - 0.5).abs() < 1e-12);
        assert!((target.loyalty[1] - 0.5).abs() < 1e-12);
        assert_eq!(game.region_data(a).unwrap().population, 900.0);
        assert_eq!(report.settles, 1);
    }

    /// Two settlers split the target's room in proportion to their offers
    #[test]
    fn test_settlers_share_headroom() {
        let mut game = game(2);
        let owned = game.regions_of(0);
        let (a, b, to) = (owned[0], owned[1], owned[2]);
        for (id, loyalty) in [(a, vec![1.0, 0.0]), (b, vec![0.0, 1.0])] {
            let source = game.entry_mut(id).unwrap();
            source.population = 1000.0;
            source.loyalty = loyalty;
        }
        {
            let target = game.entry_mut(to).unwrap();
            target.population = 100.0;
            target.maximum_population = 200.0;
            target.loyalty = vec![0.5, 0.5];
        }

        let settle = |from, amount| PlannedAction {
            player: 0,
            kind: ActionKind::Settle,
            from,
            to,
            amount,
        };
        let mut report = TurnReport::default();
        game.resolve_settles(&[settle(a, 150.0), settle(b, 50.0)], &mut report);

        // 100 free for 200 offered: each settler moves half its offer
        assert_eq!(report.settles, 2);
        assert!((game.region_data(a).unwrap().population - 925.0).abs() < 1e-9);
        assert!((game.region_data(b).unwrap().population - 975.0).abs() < 1e-9);
        let target = game.region_data(to).unwrap();
        assert!((target.population - 200.0).abs() < 1e-9);
        assert!((target.loyalty[0] - 0.625).abs() < 1e-9);
        assert!((target.loyalty[1] - 0.375).abs() < 1e-9);
    }

    #[test]
    fn test_overwhelming_attack_captures() {
        let mut game = game(2);
        let (mine, theirs) = rivals(&game);
        game.entry_mut(mine).unwrap().military_size = 1_000_000.0;
        game.entry_mut(theirs).unwrap().military_size = 10.0;

        let calls = Rc::new(Cell::new(0));
        game.set_color_sink(Box::new(CountingSink(calls.clone())));
        assert_eq!(calls.get(), 1);

        game.plan_action(PlannedAction {
            player: 0,
            kind: ActionKind::Attack,
            from: mine,
            to: theirs,
            amount: 500_000.0,
        })
        .unwrap();
        let report = game.go();

        assert_eq!(report.turn, 1);
        assert_eq!(report.battles.len(), 1);
        let battle = &report.battles[0];
        assert!(battle.captured);
        assert_eq!(battle.winner, 0);
        assert_eq!(game.region_data(theirs).unwrap().owner, 0);
        let face = game.planet().region(theirs).unwrap().faces[0];
        assert_eq!(game.planet().faces()[face].color, game.players()[0].color);
        assert_eq!(calls.get(), 2);
        assert!(game.planned_actions().is_empty());
    }

    #[test]
    fn test_last_region_eliminates_player() {
        let mut game = game(2);
        let (mine, theirs) = rivals(&game);
        for id in game.planet().regions().active_ids() {
            if id != theirs {
                game.entry_mut(id).unwrap().owner = 0;
            }
        }
        game.entry_mut(mine).unwrap().military_size = 1_000_000.0;
        game.entry_mut(theirs).unwrap().military_size = 0.0;

        game.plan(0, ActionKind::Attack, mine, theirs).unwrap();
        let report = game.go();

        assert_eq!(report.eliminated, vec![1]);
        assert!(!game.player(1).unwrap().alive);
        assert_eq!(game.winner(), Some(0));
    }

    #[test]
    fn test_turn_without_actions_grows() {
        let mut game = game(2);
        let before = game.totals(0).unwrap();
        let report = game.go();
        let after = game.totals(0).unwrap();

        assert!(report.battles.is_empty());
        assert!(after.military > before.military);
        assert!(after.population >= before.population);
        assert_eq!(after.regions, before.regions);
    }

    #[test]
    fn test_pick_region_highlights_and_restores() {
        let mut game = game(2);
        let (a, b) = rivals(&game);
        let first_face = |game: &Game, id| game.planet().region(id).unwrap().faces[0];

        game.pick_region(Some(a)).unwrap();
        let owner = game.region_data(a).unwrap().owner;
        assert_eq!(game.planet().faces()[first_face(&game, a)].color, game.players()[owner].highlight_color);

        game.pick_region(Some(b)).unwrap();
        assert_eq!(game.planet().faces()[first_face(&game, a)].color, game.players()[owner].color);
        assert_eq!(game.picked_region(), Some(b));

        game.pick_region(None).unwrap();
        assert_eq!(game.picked_region(), None);
    }

    #[test]
    fn test_pick_face_over_water_clears() {
        let mut game = game(2);
        let water = game.planet().faces().iter().find(|f| f.cell_type.is_water()).map(|f| f.id);
        if let Some(face) = water {
            assert_eq!(game.pick_face(face), None);
            assert_eq!(game.picked_region(), None);
        }
        let land = game.planet().faces().iter().find(|f| f.region.is_some()).unwrap();
        let (id, region) = (land.id, land.region);
        assert_eq!(game.pick_face(id), region);
    }
}
