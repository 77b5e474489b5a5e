//! Procedural globe partitioned into regions, with a turn-based conquest simulation
//!
//! A standalone library that takes a closed triangle sphere, carves rivers,
//! lakes and seas into it, groups the remaining land into contiguous regions,
//! and runs a territorial strategy game on top. Rendering is left to the
//! host: it receives flat vertex buffers and per-vertex colors.
//!
//! # Quick Start
//!
//! ```rust,no_run
//! use rust_globe_conquest::*;
//!
//! // Generate a planet
//! let config = PlanetConfigBuilder::new()
//!     .seed(42)
//!     .planet_size(PlanetSize::Medium)
//!     .water_proportion(0.55).unwrap()
//!     .build().unwrap();
//!
//! let planet = Planet::generate(config).unwrap();
//! let mesh = planet.mesh_data();
//! println!("{} triangles, {} regions", mesh.triangle_count(), planet.region_count());
//!
//! // Play a turn
//! let mut game = Game::new(planet, GameConfig::with_players(3)).unwrap();
//! let home = game.regions_of(0)[0];
//! let target = game.regions_of(1)[0];
//! game.plan(0, ActionKind::Attack, home, target).unwrap();
//! let report = game.go();
//! println!("turn {}: {} battles", report.turn, report.battles.len());
//! ```
//!
//! # Features
//!
//! - `spatial-index` (default): Enables O(log n) position-to-face lookups using KD-tree
//! - `serde`: Enables serialization support for configuration and game records

// Modules
pub mod error;
pub mod config;
pub mod rng;
pub mod generation;
pub mod topology;
pub mod terraform;
pub mod regions;
pub mod names;
pub mod game;
pub mod planet;
pub mod mesh;

#[cfg(feature = "spatial-index")]
pub mod spatial;

// Re-export core types for convenience
pub use error::{GlobeError, Result};
pub use config::{
    ActionConfig, CombatConfig, GameConfig, LoyaltyConfig, PlanetConfig, PlanetConfigBuilder, PlanetSize,
    PlayerConfig, PopulationConfig, TerraformSettings,
};
pub use rng::{seeded, GameRng};
pub use generation::{generate_sphere_mesh, RawMesh};
pub use topology::{CellType, Face, FaceId, PlanetTopology};
pub use terraform::TerraformReport;
pub use regions::{IslandReport, Region, RegionId, RegionSet, RegionState};
pub use game::{ActionKind, Battle, Game, PlannedAction, Player, PlayerId, PlayerTotals, RegionGameData, TurnReport};
pub use planet::Planet;
pub use mesh::{generate_mesh, Color, ColorMapper, ColorSink, CustomColorMapper, MeshData, SurfaceColorMapper};

#[cfg(feature = "spatial-index")]
pub use spatial::FaceIndex;

// Re-export glam::Vec3 for convenience
pub use glam::Vec3;
