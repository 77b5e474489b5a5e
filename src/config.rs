//! Planet, terraforming and game configuration
//!
//! Every tunable of the pipeline is a plain numeric knob on one of these
//! records. Validation happens once, in the builders and `validate` methods;
//! the algorithms trust what they are handed.

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

use crate::error::{GlobeError, Result};
use crate::mesh::Color;

/// Planet size presets
///
/// Each preset maps to the lattice point count used by the built-in sphere
/// generator; the resulting mesh has `2 * points - 4` triangular faces.
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum PlanetSize {
    /// ~320 faces
    Tiny,
    /// ~1,280 faces
    #[default]
    Small,
    /// ~5,120 faces
    Medium,
    /// ~20,480 faces
    Large,
    /// Custom lattice point count
    Custom {
        /// Number of sphere lattice points (mesh vertices)
        point_count: usize,
    },
}

impl PlanetSize {
    /// Number of lattice points the sphere generator places
    pub fn point_count(self) -> usize {
        match self {
            PlanetSize::Tiny => 162,
            PlanetSize::Small => 642,
            PlanetSize::Medium => 2_562,
            PlanetSize::Large => 10_242,
            PlanetSize::Custom { point_count } => point_count,
        }
    }

    /// Expected face count of the generated sphere
    pub fn face_count(self) -> usize {
        (2 * self.point_count()).saturating_sub(4)
    }

    /// Get a human-readable name for this planet size
    pub fn name(self) -> &'static str {
        match self {
            PlanetSize::Tiny => "Tiny",
            PlanetSize::Small => "Small",
            PlanetSize::Medium => "Medium",
            PlanetSize::Large => "Large",
            PlanetSize::Custom { .. } => "Custom",
        }
    }
}

/// Knobs for terraforming and region building
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TerraformSettings {
    /// Number of rivers carved across the globe
    pub river_count: usize,
    /// Number of lakes seeded before water expansion
    pub drizzle_count: usize,
    /// Target fraction of faces that end up as water (0.0 - 1.0)
    pub water_proportion: f32,
    /// Probability that an enclosed inland sea is filled back in with land
    pub inland_sea_fill: f32,
    /// Maximum vertex veer used when jumbling the mesh (0.0 disables it)
    pub jumble: f32,
    /// Regions below this face count keep merging with their neighbors
    pub safe_size: usize,
    /// Regions below this face count look across water for a mainland
    pub island_safe_size: usize,
    /// Hop budget for the island search
    pub island_neighborhood_radius: usize,
    /// Isolated islands below this face count are sunk
    pub island_kill_size: usize,
    /// Probability of taking the closest merge partner instead of a random one
    pub chance_best_match: f32,
}

impl Default for TerraformSettings {
    fn default() -> Self {
        Self {
            river_count: 2,
            drizzle_count: 20,
            water_proportion: 0.6,
            inland_sea_fill: 0.5,
            jumble: 0.5,
            safe_size: 12,
            island_safe_size: 5,
            island_neighborhood_radius: 4,
            island_kill_size: 3,
            chance_best_match: 1.0,
        }
    }
}

impl TerraformSettings {
    /// Check that every knob is within its meaningful range
    pub fn validate(&self) -> Result<()> {
        if !(0.0..1.0).contains(&self.water_proportion) {
            return Err(GlobeError::InvalidConfig(format!(
                "water proportion must be in [0, 1) (got {})",
                self.water_proportion
            )));
        }
        if !(0.0..=1.0).contains(&self.inland_sea_fill) {
            return Err(GlobeError::InvalidConfig(format!(
                "inland sea fill must be in [0, 1] (got {})",
                self.inland_sea_fill
            )));
        }
        if !(0.0..=1.0).contains(&self.jumble) {
            return Err(GlobeError::InvalidConfig(format!(
                "jumble must be in [0, 1] (got {})",
                self.jumble
            )));
        }
        if !(0.0..=1.0).contains(&self.chance_best_match) {
            return Err(GlobeError::InvalidConfig(format!(
                "chance of best match must be in [0, 1] (got {})",
                self.chance_best_match
            )));
        }
        if self.safe_size == 0 {
            return Err(GlobeError::InvalidConfig("safe size must be at least 1".into()));
        }
        Ok(())
    }
}

/// Configuration for deterministic planet generation
///
/// The same configuration always produces the same faces, land/water split
/// and region partition.
///
/// # Example
///
/// ```rust
/// use rust_globe_conquest::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(42)
///     .planet_size(PlanetSize::Tiny)
///     .build()
///     .unwrap();
/// assert_eq!(config.planet_size.face_count(), 320);
/// ```
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlanetConfig {
    /// Random seed for the sphere lattice and every randomized phase
    pub seed: u32,

    /// Planet size preset (determines face count)
    pub planet_size: PlanetSize,

    /// Terraforming and region-building knobs
    pub terraform: TerraformSettings,
}

impl Default for PlanetConfig {
    fn default() -> Self {
        Self {
            seed: rand::random(),
            planet_size: PlanetSize::default(),
            terraform: TerraformSettings::default(),
        }
    }
}

/// Builder for creating PlanetConfig with validation
///
/// ```rust
/// use rust_globe_conquest::*;
///
/// let config = PlanetConfigBuilder::new()
///     .seed(12345)
///     .planet_size(PlanetSize::Small)
///     .water_proportion(0.5)
///     .unwrap()
///     .safe_size(8)
///     .unwrap()
///     .build()
///     .unwrap();
/// assert_eq!(config.terraform.safe_size, 8);
/// ```
#[derive(Debug, Clone)]
pub struct PlanetConfigBuilder {
    seed: Option<u32>,
    planet_size: PlanetSize,
    terraform: TerraformSettings,
}

impl PlanetConfigBuilder {
    /// Create a new builder with default values
    ///
    /// Defaults:
    /// - seed: Random
    /// - planet_size: Small (~1,280 faces)
    /// - terraform: `TerraformSettings::default()`
    pub fn new() -> Self {
        Self {
            seed: None,
            planet_size: PlanetSize::default(),
            terraform: TerraformSettings::default(),
        }
    }

    /// Set the random seed for planet generation
    pub fn seed(mut self, seed: u32) -> Self {
        self.seed = Some(seed);
        self
    }

    /// Set the planet size preset
    pub fn planet_size(mut self, size: PlanetSize) -> Self {
        self.planet_size = size;
        self
    }

    /// Replace all terraform settings at once (validated in `build`)
    pub fn terraform(mut self, settings: TerraformSettings) -> Self {
        self.terraform = settings;
        self
    }

    /// Set the number of rivers
    pub fn river_count(mut self, count: usize) -> Self {
        self.terraform.river_count = count;
        self
    }

    /// Set the number of seeded lakes
    pub fn drizzle_count(mut self, count: usize) -> Self {
        self.terraform.drizzle_count = count;
        self
    }

    /// Set the target water fraction
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the proportion is outside `[0, 1)`
    pub fn water_proportion(mut self, proportion: f32) -> Result<Self> {
        if !(0.0..1.0).contains(&proportion) {
            return Err(GlobeError::InvalidConfig(format!(
                "water proportion must be in [0, 1) (got {})",
                proportion
            )));
        }
        self.terraform.water_proportion = proportion;
        Ok(self)
    }

    /// Set the size below which regions keep merging
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if size is 0
    pub fn safe_size(mut self, size: usize) -> Result<Self> {
        if size == 0 {
            return Err(GlobeError::InvalidConfig("safe size must be at least 1".into()));
        }
        self.terraform.safe_size = size;
        Ok(self)
    }

    /// Set the vertex jumble strength
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if veer is outside `[0, 1]`
    pub fn jumble(mut self, veer: f32) -> Result<Self> {
        if !(0.0..=1.0).contains(&veer) {
            return Err(GlobeError::InvalidConfig(format!(
                "jumble must be in [0, 1] (got {})",
                veer
            )));
        }
        self.terraform.jumble = veer;
        Ok(self)
    }

    /// Build the configuration
    ///
    /// If no seed was provided, a random one is drawn.
    pub fn build(self) -> Result<PlanetConfig> {
        self.terraform.validate()?;
        if self.planet_size.point_count() < 4 {
            return Err(GlobeError::InvalidConfig(format!(
                "a sphere needs at least 4 points (got {})",
                self.planet_size.point_count()
            )));
        }

        Ok(PlanetConfig {
            seed: self.seed.unwrap_or_else(rand::random),
            planet_size: self.planet_size,
            terraform: self.terraform,
        })
    }
}

impl Default for PlanetConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// Population, production and growth tunables
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PopulationConfig {
    /// Lower bound of the random population density per unit area
    pub low_base_density: f64,
    /// Upper bound of the random population density per unit area
    pub high_base_density: f64,
    /// Lower bound of the random production density per unit area
    pub low_production_density: f64,
    /// Upper bound of the random production density per unit area
    pub high_production_density: f64,
    /// Multiplier applied at the poles
    pub polar: f64,
    /// Multiplier applied at the equator
    pub equatorial: f64,
    /// Relative growth of population not loyal to the owner
    pub disloyal_growth: f64,
    /// Relative growth of population loyal to the owner
    pub loyal_growth: f64,
    /// Per-turn growth rate toward the maximum population
    pub growth_rate: f64,
    /// Starting population as a fraction of the maximum
    pub initial_max: f64,
    /// Starting military per head of population
    pub initial_military: f64,
    /// Area of a single face
    pub face_area: f64,
    /// Share of same-owner neighbor production added to military each turn
    pub neighbor_production_bonus: f64,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            low_base_density: 80.0,
            high_base_density: 270.0,
            low_production_density: 0.005,
            high_production_density: 0.015,
            polar: 0.15,
            equatorial: 1.0,
            disloyal_growth: 0.10,
            loyal_growth: 1.0,
            growth_rate: 0.05,
            initial_max: 0.4,
            initial_military: 0.0037,
            face_area: 10_000.0,
            neighbor_production_bonus: 0.25,
        }
    }
}

/// Initial loyalty shares
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LoyaltyConfig {
    /// Share of a region's population loyal to its starting owner; the rest is
    /// split evenly across the other players
    pub owner_initial: f64,
}

impl Default for LoyaltyConfig {
    fn default() -> Self {
        Self { owner_initial: 0.4 }
    }
}

/// Combat tunables
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CombatConfig {
    /// Attacker effectiveness at (or beyond) `attack_range`
    pub attack_effectiveness_min: f64,
    /// Attacker effectiveness from an adjacent, zero-distance source
    pub attack_effectiveness_max: f64,
    /// Chord distance on the unit sphere at which effectiveness bottoms out
    pub attack_range: f64,
    /// Base defender effectiveness
    pub defense_effectiveness: f64,
    /// How much the owner's loyalty share scales defense (0.0 - 1.0)
    pub loyalty_defense_weight: f64,
    /// Maximum magnitude of the luck factor (reached at 3σ)
    pub luck_range: f64,
    /// Fraction of population lost when a region's defenders are wiped out
    pub civilian_casualty_rate: f64,
    /// Bound on recursive N-way resolution rounds
    pub max_war_rounds: usize,
}

impl Default for CombatConfig {
    fn default() -> Self {
        Self {
            attack_effectiveness_min: 0.5,
            attack_effectiveness_max: 1.0,
            attack_range: 1.0,
            defense_effectiveness: 1.2,
            loyalty_defense_weight: 0.5,
            luck_range: 0.25,
            civilian_casualty_rate: 0.1,
            max_war_rounds: 32,
        }
    }
}

/// Default commitment for each planned action kind
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ActionConfig {
    /// Fraction of military sent by default when attacking
    pub attack_proportion: f64,
    /// Fraction of population sent by default when settling
    pub settle_proportion: f64,
    /// Fraction of military sent by default when moving
    pub move_proportion: f64,
}

impl Default for ActionConfig {
    fn default() -> Self {
        Self {
            attack_proportion: 0.33,
            settle_proportion: 0.2,
            move_proportion: 0.33,
        }
    }
}

/// A seat at the table
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct PlayerConfig {
    /// Display name
    pub name: String,
    /// Whether the host drives this player automatically
    pub npc: bool,
    /// Territory color
    pub color: Color,
    /// Territory color while picked
    pub highlight_color: Color,
}

const PLAYER_PALETTE: [(&str, Color, Color); 5] = [
    ("Blue", [0.17, 0.22, 0.60, 1.0], [0.48, 0.47, 0.90, 1.0]),
    ("Red", [0.73, 0.13, 0.13, 1.0], [1.00, 0.43, 0.43, 1.0]),
    ("Green", [0.20, 0.60, 0.10, 1.0], [0.40, 0.95, 0.35, 1.0]),
    ("Purple", [0.50, 0.25, 0.57, 1.0], [0.91, 0.40, 0.98, 1.0]),
    ("Yellow", [0.95, 0.95, 0.10, 1.0], [1.00, 1.00, 0.60, 1.0]),
];

/// Everything the simulation layer reads
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[derive(Debug, Clone, PartialEq)]
pub struct GameConfig {
    /// Population and production model
    pub population: PopulationConfig,
    /// Initial loyalty split
    pub loyalty: LoyaltyConfig,
    /// Combat model
    pub combat: CombatConfig,
    /// Default action commitments
    pub actions: ActionConfig,
    /// Players, indexed by player ID
    pub players: Vec<PlayerConfig>,
}

impl Default for GameConfig {
    fn default() -> Self {
        Self::with_players(4)
    }
}

impl GameConfig {
    /// Default tunables with `count` players; player 0 is the human seat
    ///
    /// Colors cycle through a fixed palette.
    pub fn with_players(count: usize) -> Self {
        let players = (0..count)
            .map(|i| {
                let (name, color, highlight_color) = PLAYER_PALETTE[i % PLAYER_PALETTE.len()];
                PlayerConfig {
                    name: name.to_string(),
                    npc: i != 0,
                    color,
                    highlight_color,
                }
            })
            .collect();

        Self {
            population: PopulationConfig::default(),
            loyalty: LoyaltyConfig::default(),
            combat: CombatConfig::default(),
            actions: ActionConfig::default(),
            players,
        }
    }

    /// Check ranges and orderings of the tunables
    pub fn validate(&self) -> Result<()> {
        if self.players.is_empty() {
            return Err(GlobeError::InvalidConfig("at least one player is required".into()));
        }

        let p = &self.population;
        if p.low_base_density > p.high_base_density {
            return Err(GlobeError::InvalidConfig(format!(
                "population density range is inverted ({} > {})",
                p.low_base_density, p.high_base_density
            )));
        }
        if p.low_production_density > p.high_production_density {
            return Err(GlobeError::InvalidConfig(format!(
                "production density range is inverted ({} > {})",
                p.low_production_density, p.high_production_density
            )));
        }
        if p.face_area <= 0.0 {
            return Err(GlobeError::InvalidConfig(format!(
                "face area must be positive (got {})",
                p.face_area
            )));
        }

        if !(0.0..=1.0).contains(&self.loyalty.owner_initial) {
            return Err(GlobeError::InvalidConfig(format!(
                "owner loyalty must be in [0, 1] (got {})",
                self.loyalty.owner_initial
            )));
        }

        let c = &self.combat;
        if c.attack_effectiveness_min > c.attack_effectiveness_max {
            return Err(GlobeError::InvalidConfig(format!(
                "attack effectiveness band is inverted ({} > {})",
                c.attack_effectiveness_min, c.attack_effectiveness_max
            )));
        }
        if c.attack_range <= 0.0 {
            return Err(GlobeError::InvalidConfig(format!(
                "attack range must be positive (got {})",
                c.attack_range
            )));
        }
        if !(0.0..1.0).contains(&c.luck_range) {
            return Err(GlobeError::InvalidConfig(format!(
                "luck range must be in [0, 1) (got {})",
                c.luck_range
            )));
        }
        if c.max_war_rounds == 0 {
            return Err(GlobeError::InvalidConfig("at least one war round is required".into()));
        }

        let a = &self.actions;
        for (name, value) in [
            ("attack", a.attack_proportion),
            ("settle", a.settle_proportion),
            ("move", a.move_proportion),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(GlobeError::InvalidConfig(format!(
                    "{} proportion must be in [0, 1] (got {})",
                    name, value
                )));
            }
        }

        Ok(())
    }
}
