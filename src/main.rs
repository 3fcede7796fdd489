//! Triade CLI - Run simulation scenarios from JSON configuration.

#[cfg(feature = "dhat-heap")]
#[global_allocator]
static ALLOC: dhat::Alloc = dhat::Alloc;

use std::path::PathBuf;
use std::time::Instant;

use triade::{
    compute::{
        AERO_CURL, AERO_OBSTACLE, AERO_UX, AerodynamicsEngine, BLUE, CARNIVORE, ECOSYSTEM_STATE,
        EcosystemEngine, FaceStats, FactionWarEngine, HEATMAP_INPUT, HEATMAP_OUTPUT, HERBIVORE,
        HeatmapEngine, PLANT, RED, WAR_STATE, obstacles,
    },
    runtime::{Arena, Session},
    schema::{DemoConfig, Scenario},
    world::{DEFAULT_BOAT_LENGTH, OceanWorld},
};

const CUBE: &str = "main";

fn main() {
    #[cfg(feature = "dhat-heap")]
    let _profiler = dhat::Profiler::new_heap();

    env_logger::init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <scenario.json> [steps]", args[0]);
        eprintln!();
        eprintln!("Run a Triade simulation scenario from JSON configuration.");
        eprintln!();
        eprintln!("Arguments:");
        eprintln!("  scenario.json  Path to scenario configuration file");
        eprintln!("  steps          Number of simulation steps (default: 100)");
        eprintln!();
        eprintln!("Example configuration is generated with --example flag.");
        std::process::exit(1);
    }

    if args[1] == "--example" {
        print_example_config();
        return;
    }

    let config_path = PathBuf::from(&args[1]);
    let steps: u64 = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(100);

    let config = DemoConfig::load(&config_path).unwrap_or_else(|e| {
        eprintln!("Error loading {}: {}", config_path.display(), e);
        std::process::exit(1);
    });

    println!("Triade Simulation");
    println!("=================");
    println!("Arena: {} MB", config.session.arena_megabytes);
    println!("Steps: {}", steps);
    println!();

    let start = Instant::now();
    let result = match &config.scenario {
        Scenario::Ocean {
            world,
            boats,
            biology,
        } => run_ocean(&config, world.clone(), boats, biology.as_ref(), steps),
        _ => run_single_cube(&config, steps),
    };

    if let Err(e) = result {
        eprintln!("Simulation failed: {}", e);
        std::process::exit(1);
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "Time: {:.2}s ({:.1} steps/s)",
        elapsed.as_secs_f32(),
        steps as f32 / elapsed.as_secs_f32()
    );
}

/// Every scenario except the ocean is one named cube in a session.
fn run_single_cube(config: &DemoConfig, steps: u64) -> triade::Result<()> {
    let mut session = Session::new(&config.session)?;

    match &config.scenario {
        Scenario::WindTunnel {
            size,
            aerodynamics,
            wing_angle,
        } => {
            println!(
                "Scenario: wind tunnel {}x{}, wing at {} deg",
                size, size, wing_angle
            );
            let engine = AerodynamicsEngine::new(aerodynamics.clone());
            session.create_cube(CUBE, *size, engine, 22)?;
            let (cube, arena) = split(&mut session)?;
            obstacles::stamp_wing(cube.face_mut(arena, AERO_OBSTACLE)?, *size, *wing_angle);
        }
        Scenario::Ecosystem { size, seed } => {
            println!("Scenario: ecosystem {}x{}", size, size);
            session.create_cube(CUBE, *size, EcosystemEngine::new(), 3)?;
            let (cube, arena) = split(&mut session)?;
            seed.apply(cube.face_mut(arena, ECOSYSTEM_STATE)?, *size, *size);
        }
        Scenario::FactionWar {
            size,
            faction_war,
            seed,
        } => {
            println!("Scenario: faction war {}x{}", size, size);
            let engine = FactionWarEngine::new(faction_war.clone());
            session.create_cube(CUBE, *size, engine, 3)?;
            let (cube, arena) = split(&mut session)?;
            seed.apply(cube.face_mut(arena, WAR_STATE)?, *size, *size);
        }
        Scenario::Heatmap {
            size,
            heatmap,
            seed,
        } => {
            println!(
                "Scenario: heatmap {}x{}, radius {}",
                size, size, heatmap.radius
            );
            session.create_cube(CUBE, *size, HeatmapEngine::from_config(heatmap), 5)?;
            let (cube, arena) = split(&mut session)?;
            seed.apply(cube.face_mut(arena, HEATMAP_INPUT)?, *size, *size);
        }
        Scenario::Ocean { .. } => {
            return Err(triade::TriadeError::InvalidGrid {
                reason: "ocean scenarios run through the world, not a single cube".to_string(),
            });
        }
    }

    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..steps {
        session.compute(CUBE)?;

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let elapsed = start.elapsed().as_secs_f32();
            println!(
                "  Step {}/{}: {}, {:.1} steps/s",
                i + 1,
                steps,
                describe(&session, &config.scenario)?,
                (i + 1) as f32 / elapsed
            );
        }
    }

    Ok(())
}

fn split(session: &mut Session) -> triade::Result<(&mut triade::Cube, &mut Arena)> {
    session
        .cube_and_arena(CUBE)
        .ok_or_else(|| triade::TriadeError::CubeNotFound {
            name: CUBE.to_string(),
        })
}

/// One-line progress summary for a single-cube scenario.
fn describe(session: &Session, scenario: &Scenario) -> triade::Result<String> {
    let cube = session
        .cube(CUBE)
        .ok_or_else(|| triade::TriadeError::CubeNotFound {
            name: CUBE.to_string(),
        })?;
    let arena = session.arena();

    let line = match scenario {
        Scenario::WindTunnel { .. } => {
            let drag = cube
                .engine()
                .and_then(|e| e.as_aerodynamics())
                .map(|e| e.display_drag())
                .unwrap_or(0.0);
            let speed = FaceStats::from_face(cube.face(arena, AERO_UX)?);
            let curl = FaceStats::from_face(cube.face(arena, AERO_CURL)?);
            format!(
                "drag={:.3}, ux=[{:.4}, {:.4}], curl=[{:.4}, {:.4}]",
                drag, speed.min_value, speed.max_value, curl.min_value, curl.max_value
            )
        }
        Scenario::Ecosystem { .. } => {
            let state = cube.face(arena, ECOSYSTEM_STATE)?;
            format!(
                "plants={}, herbivores={}, carnivores={}",
                FaceStats::count_state(state, PLANT),
                FaceStats::count_state(state, HERBIVORE),
                FaceStats::count_state(state, CARNIVORE)
            )
        }
        Scenario::FactionWar { .. } => {
            let state = cube.face(arena, WAR_STATE)?;
            format!(
                "blue={}, red={}",
                FaceStats::count_state(state, BLUE),
                FaceStats::count_state(state, RED)
            )
        }
        Scenario::Heatmap { .. } => {
            let stats = FaceStats::from_face(cube.face(arena, HEATMAP_OUTPUT)?);
            format!(
                "total={:.3}, peak={:.3}, active={}",
                stats.total, stats.max_value, stats.active_cells
            )
        }
        Scenario::Ocean { .. } => String::new(),
    };
    Ok(line)
}

fn run_ocean(
    config: &DemoConfig,
    world_config: triade::WorldConfig,
    boats: &[(f32, f32)],
    biology: Option<&triade::Seed>,
    steps: u64,
) -> triade::Result<()> {
    let mut arena = Arena::with_megabytes(config.session.arena_megabytes);
    let mut world = OceanWorld::new(&mut arena, world_config)?;

    for &(x, y) in boats {
        world.spawn_boat(x, y, DEFAULT_BOAT_LENGTH);
    }
    if let Some(seed) = biology {
        world.seed_biology(&mut arena, seed)?;
    }

    println!(
        "Scenario: ocean {}x{} cells, {} boats",
        world.width(),
        world.height(),
        world.boats().len()
    );
    println!("Running simulation...");
    let start = Instant::now();

    for i in 0..steps {
        world.step(&mut arena)?;

        // Print progress every 10%
        if (i + 1) % (steps / 10).max(1) == 0 {
            let stats = world.stats();
            let elapsed = start.elapsed().as_secs_f32();
            let boat = world
                .boats()
                .first()
                .map(|b| format!(", boat=({:.1}, {:.1})", b.x, b.y))
                .unwrap_or_default();
            println!(
                "  Step {}/{}: max_u={:.4}, avg_tau={:.4}{}, {:.1} steps/s",
                i + 1,
                steps,
                stats.max_u,
                stats.avg_tau,
                boat,
                (i + 1) as f32 / elapsed
            );
        }
    }

    Ok(())
}

fn print_example_config() {
    let config = DemoConfig::default();

    println!("Example configuration (scenario.json):");
    match serde_json::to_string_pretty(&config) {
        Ok(json) => println!("{}", json),
        Err(e) => eprintln!("Error serializing example: {}", e),
    }
}
