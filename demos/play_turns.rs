//! Generate a planet and let every seat play a few greedy turns
//!
//! Run with `RUST_LOG=rust_globe_conquest=debug` for per-phase logging.

use rust_globe_conquest::*;
use tracing_subscriber::EnvFilter;

const TURNS: u32 = 12;

/// Attack the weakest hostile neighbor, or settle into a roomier friendly one
fn plan_greedy(game: &mut Game, player: PlayerId) -> Result<()> {
    for from in game.regions_of(player) {
        let neighbors = game.planet().region(from)?.neighbors.clone();
        let source = game.region_data(from)?.clone();

        let mut weakest: Option<(RegionId, f64)> = None;
        let mut roomiest: Option<(RegionId, f64)> = None;
        for n in neighbors {
            let data = game.region_data(n)?;
            if data.owner != player {
                if weakest.map_or(true, |(_, m)| data.military_size < m) {
                    weakest = Some((n, data.military_size));
                }
            } else {
                let room = data.maximum_population - data.population;
                if roomiest.map_or(true, |(_, r)| room > r) {
                    roomiest = Some((n, room));
                }
            }
        }

        if let Some((to, defenders)) = weakest {
            let troops = game.default_amount(ActionKind::Attack, from)?;
            if troops > defenders {
                game.plan(player, ActionKind::Attack, from, to)?;
                continue;
            }
        }
        if let Some((to, room)) = roomiest {
            let crowded = source.population > 0.9 * source.maximum_population;
            if crowded && room > 0.0 && game.default_amount(ActionKind::Settle, from)? > 0.0 {
                game.plan(player, ActionKind::Settle, from, to)?;
            }
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    println!("=== rust_globe_conquest Turn Demo ===\n");

    let config = PlanetConfigBuilder::new()
        .seed(2024)
        .planet_size(PlanetSize::Small)
        .water_proportion(0.55)?
        .build()?;

    let planet = Planet::generate(config)?;
    let terraform = planet.terraform_report();
    println!("Planet:");
    println!("  Faces: {}", planet.face_count());
    println!("  Water: {:.1}%", terraform.water_fraction * 100.0);
    println!("  River faces: {}, lakes: {}", terraform.river_faces, terraform.lakes);
    println!("  Regions: {}", planet.region_count());
    println!(
        "  Islands merged: {}, sunk: {}",
        planet.island_report().merged,
        planet.island_report().sunk
    );

    let mut game = Game::new(planet, GameConfig::with_players(4))?;
    println!("\nStarting positions:");
    for player in game.players() {
        let totals = game.totals(player.id)?;
        println!(
            "  {:<7} {:>3} regions  pop {:>9.0}  troops {:>6.0}",
            player.name, totals.regions, totals.population, totals.military
        );
    }

    println!();
    for _ in 0..TURNS {
        let seats: Vec<PlayerId> = game.players().iter().filter(|p| p.alive).map(|p| p.id).collect();
        for player in seats {
            plan_greedy(&mut game, player)?;
        }
        let report = game.go();
        println!(
            "Turn {:>2}: {} moves, {} settles, {} battles, {} captured",
            report.turn,
            report.moves,
            report.settles,
            report.battles.len(),
            report.captures()
        );
        for player in &report.eliminated {
            println!("  {} is out", game.player(*player)?.name);
        }
        if let Some(winner) = game.winner() {
            println!("  {} rules the world", game.player(winner)?.name);
            break;
        }
    }

    println!("\nStandings after {} turns:", game.turn());
    for player in game.players() {
        let totals = game.totals(player.id)?;
        println!(
            "  {:<7} {:>3} regions  pop {:>9.0}  troops {:>6.0}{}",
            player.name,
            totals.regions,
            totals.population,
            totals.military,
            if player.alive { "" } else { "  (eliminated)" }
        );
    }

    let mesh = game.planet().mesh_data();
    println!("\nMesh: {} vertices, {} triangles", mesh.vertex_count(), mesh.triangle_count());

    println!("\n=== Demo Complete ===");
    Ok(())
}
