//! Configuration types for sessions, engines and the ocean world.

use std::path::Path;

use serde::{Deserialize, Serialize};

use super::Seed;

/// Session-level memory budget.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionConfig {
    /// Arena size in megabytes.
    pub arena_megabytes: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            arena_megabytes: 50,
        }
    }
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.arena_megabytes == 0 {
            return Err(ConfigError::EmptyArena);
        }
        Ok(())
    }
}

/// Summed-area-table heatmap parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeatmapConfig {
    /// Influence radius in cells (half-width of the box window).
    pub radius: usize,
    /// Multiplier applied to every window sum.
    pub weight: f32,
}

impl Default for HeatmapConfig {
    fn default() -> Self {
        Self {
            radius: 10,
            weight: 1.0,
        }
    }
}

/// Faction-war automaton parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactionWarConfig {
    /// Per-tick probability that an empty cell without a birth is reinforced.
    pub reinforcement_chance: f64,
    /// Seed for the reinforcement RNG.
    pub seed: u64,
}

impl Default for FactionWarConfig {
    fn default() -> Self {
        Self {
            reinforcement_chance: 0.0005,
            seed: 0,
        }
    }
}

impl FactionWarConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(0.0..=1.0).contains(&self.reinforcement_chance) {
            return Err(ConfigError::InvalidProbability(self.reinforcement_chance));
        }
        Ok(())
    }
}

/// Wind-tunnel LBM parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AerodynamicsConfig {
    /// BGK relaxation factor (close to 2.0 gives high turbulence).
    pub omega: f32,
    /// Inflow velocity forced at the left boundary, in lattice units.
    pub inflow_velocity: f32,
}

impl Default for AerodynamicsConfig {
    fn default() -> Self {
        Self {
            omega: 1.95,
            inflow_velocity: 0.12,
        }
    }
}

impl AerodynamicsConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.omega > 0.0 && self.omega < 2.0) {
            return Err(ConfigError::InvalidRelaxation(self.omega));
        }
        Ok(())
    }
}

/// Ocean LBM, turbulence, biology and vortex parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OceanParams {
    /// Base relaxation time.
    pub tau_0: f32,
    /// Smagorinsky constant scaling the stress-tensor norm.
    pub smagorinsky: f32,
    /// Maximum lattice speed before a cell falls back to equilibrium.
    pub cfl_limit: f32,
    /// Biology diffusion coefficient.
    pub bio_diffusion: f32,
    /// Biology logistic growth rate.
    pub bio_growth: f32,
    /// Vortex forcing radius in cells.
    pub vortex_radius: f32,
    /// Vortex forcing strength.
    pub vortex_strength: f32,
}

impl Default for OceanParams {
    fn default() -> Self {
        Self {
            tau_0: 0.8,
            smagorinsky: 0.2,
            cfl_limit: 0.38,
            bio_diffusion: 0.05,
            bio_growth: 0.0005,
            vortex_radius: 28.0,
            vortex_strength: 0.02,
        }
    }
}

impl OceanParams {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tau_0 <= 0.5 {
            return Err(ConfigError::InvalidRelaxation(self.tau_0));
        }
        if self.cfl_limit <= 0.0 {
            return Err(ConfigError::InvalidCflLimit(self.cfl_limit));
        }
        // Explicit 4-neighbour diffusion is only stable below 0.25.
        if !(0.0..0.25).contains(&self.bio_diffusion) {
            return Err(ConfigError::InvalidDiffusion(self.bio_diffusion));
        }
        if self.vortex_radius <= 0.0 {
            return Err(ConfigError::InvalidVortexRadius(self.vortex_radius));
        }
        Ok(())
    }
}

/// Force model for boats.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoatDynamics {
    /// Forward thrust while `up` is held (reverse gets half).
    pub engine_force: f32,
    /// Heading change per tick while turning, in radians.
    pub turn_force: f32,
    /// Forward thrust when no control is held.
    pub idle_thrust: f32,
    /// Coupling from fluid velocity into boat velocity.
    pub advection: f32,
    /// Hydrodynamic friction (fraction of velocity removed per tick).
    pub friction: f32,
    /// Velocity multiplier applied on island collision.
    pub collision_damping: f32,
}

impl Default for BoatDynamics {
    fn default() -> Self {
        Self {
            engine_force: 0.15,
            turn_force: 0.05,
            idle_thrust: 0.01,
            advection: 0.25,
            friction: 0.05,
            collision_damping: 0.1,
        }
    }
}

/// Multi-tile ocean world layout.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorldConfig {
    /// Tiles along X.
    pub cols: usize,
    /// Tiles along Y.
    pub rows: usize,
    /// Edge length of every tile in cells (ghost border included).
    pub chunk_size: usize,
    /// Radius of the central island obstacle in cells (0 disables it).
    pub island_radius: f32,
    /// Radius boats are pushed out to around the island centre.
    pub collision_radius: f32,
    #[serde(default)]
    pub ocean: OceanParams,
    #[serde(default)]
    pub boats: BoatDynamics,
}

impl Default for WorldConfig {
    fn default() -> Self {
        Self {
            cols: 2,
            rows: 2,
            chunk_size: 64,
            island_radius: 20.0,
            collision_radius: 24.0,
            ocean: OceanParams::default(),
            boats: BoatDynamics::default(),
        }
    }
}

impl WorldConfig {
    /// World width in cells.
    #[inline]
    pub fn width(&self) -> usize {
        self.cols * self.chunk_size
    }

    /// World height in cells.
    #[inline]
    pub fn height(&self) -> usize {
        self.rows * self.chunk_size
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.cols == 0 || self.rows == 0 || self.chunk_size < 3 {
            return Err(ConfigError::InvalidDimensions);
        }
        if self.island_radius < 0.0 || self.collision_radius < 0.0 {
            return Err(ConfigError::InvalidIsland);
        }
        self.ocean.validate()
    }
}

/// A runnable demo: what to build and how to seed it.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Scenario {
    /// Wind tunnel around a rotated ellipse profile.
    WindTunnel {
        size: usize,
        #[serde(default)]
        aerodynamics: AerodynamicsConfig,
        /// Wing angle of attack in degrees.
        wing_angle: f32,
    },
    /// Plant / herbivore / carnivore cyclic automaton.
    Ecosystem { size: usize, seed: Seed },
    /// Blue vs red Game-of-Life variant.
    FactionWar {
        size: usize,
        #[serde(default)]
        faction_war: FactionWarConfig,
        seed: Seed,
    },
    /// Box-filter heatmap over a seeded input layer.
    Heatmap {
        size: usize,
        #[serde(default)]
        heatmap: HeatmapConfig,
        seed: Seed,
    },
    /// Multi-tile ocean with boats.
    Ocean {
        #[serde(default)]
        world: WorldConfig,
        /// Boat spawn points in world cells.
        #[serde(default)]
        boats: Vec<(f32, f32)>,
        /// Optional biology seed (world-relative pattern).
        #[serde(default)]
        biology: Option<Seed>,
    },
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ConfigError> {
        match self {
            Scenario::WindTunnel {
                size, aerodynamics, ..
            } => {
                check_size(*size)?;
                aerodynamics.validate()
            }
            Scenario::Ecosystem { size, .. } | Scenario::Heatmap { size, .. } => check_size(*size),
            Scenario::FactionWar {
                size, faction_war, ..
            } => {
                check_size(*size)?;
                faction_war.validate()
            }
            Scenario::Ocean { world, .. } => world.validate(),
        }
    }
}

fn check_size(size: usize) -> Result<(), ConfigError> {
    if size < 3 {
        return Err(ConfigError::InvalidDimensions);
    }
    Ok(())
}

/// Top-level CLI configuration file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DemoConfig {
    #[serde(default)]
    pub session: SessionConfig,
    pub scenario: Scenario,
}

impl Default for DemoConfig {
    fn default() -> Self {
        Self {
            session: SessionConfig::default(),
            scenario: Scenario::Ocean {
                world: WorldConfig::default(),
                boats: vec![(20.0, 20.0)],
                biology: Some(Seed::default()),
            },
        }
    }
}

impl DemoConfig {
    /// Read and validate a JSON configuration file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path)?;
        let config: DemoConfig = serde_json::from_str(&text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.session.validate()?;
        self.scenario.validate()
    }
}

/// Configuration validation errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Arena size must be non-zero")]
    EmptyArena,
    #[error("Grid dimensions must be non-zero and cubes at least 3 cells wide")]
    InvalidDimensions,
    #[error("Probability {0} must be within [0, 1]")]
    InvalidProbability(f64),
    #[error("Relaxation parameter {0} is outside the stable range")]
    InvalidRelaxation(f32),
    #[error("CFL limit {0} must be positive")]
    InvalidCflLimit(f32),
    #[error("Diffusion coefficient {0} must be within [0, 0.25)")]
    InvalidDiffusion(f32),
    #[error("Vortex radius {0} must be positive")]
    InvalidVortexRadius(f32),
    #[error("Island and collision radii must be non-negative")]
    InvalidIsland,
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),
    #[error("Failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
}
