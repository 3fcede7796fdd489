//! Toroidal ocean assembled from a periodic grid of [`OceanEngine`] tiles.
//!
//! World coordinates are cells: tile `(cx, cy)` covers
//! `[cx * chunk, (cx + 1) * chunk) x [cy * chunk, (cy + 1) * chunk)`.

use crate::compute::d2q9::{Q, W, fill_equilibrium};
use crate::compute::{
    OCEAN_BIO, OCEAN_OBSTACLE, OCEAN_RHO, OCEAN_UX, OCEAN_UY, OceanEngine, OceanStats,
};
use crate::error::Result;
use crate::runtime::{Arena, Grid};
use crate::schema::{Seed, WorldConfig};

use super::boat::{Boat, Controls, DEFAULT_BOAT_LENGTH, wrap_coord};

/// Faces each ocean tile needs.
pub const OCEAN_CHANNELS: usize = 24;

/// Where `reset` puts every boat.
pub const BOAT_HOME: (f32, f32) = (20.0, 20.0);

/// Faces exchanged after every tick: distributions, macros and biology.
const STEP_SYNC: [usize; 13] = [0, 1, 2, 3, 4, 5, 6, 7, 8, OCEAN_UX, OCEAN_UY, OCEAN_RHO, OCEAN_BIO];

/// Faces exchanged by `reset`: both distribution buffers, macros, obstacles.
const RESET_SYNC: [usize; 22] = [
    0, 1, 2, 3, 4, 5, 6, 7, 8, 9, 10, 11, 12, 13, 14, 15, 16, 17, OCEAN_UX, OCEAN_UY, OCEAN_RHO,
    OCEAN_OBSTACLE,
];

#[derive(Debug)]
pub struct OceanWorld {
    config: WorldConfig,
    grid: Grid<OceanEngine>,
    boats: Vec<Boat>,
    controls: Controls,
}

impl OceanWorld {
    /// Allocate the tiles in `arena` and bring the ocean to rest.
    pub fn new(arena: &mut Arena, config: WorldConfig) -> Result<Self> {
        config.validate()?;

        let params = config.ocean.clone();
        let grid = Grid::new(
            config.cols,
            config.rows,
            config.chunk_size,
            arena,
            || OceanEngine::new(params.clone()),
            OCEAN_CHANNELS,
            true,
        )?;

        log::info!(
            "Ocean world {}x{} cells ({}x{} tiles of {}), {:.2} MB used",
            config.width(),
            config.height(),
            config.cols,
            config.rows,
            config.chunk_size,
            arena.used_megabytes()
        );

        let mut world = Self {
            config,
            grid,
            boats: Vec::new(),
            controls: Controls::default(),
        };
        world.reset(arena)?;
        Ok(world)
    }

    pub fn config(&self) -> &WorldConfig {
        &self.config
    }

    pub fn grid(&self) -> &Grid<OceanEngine> {
        &self.grid
    }

    pub fn grid_mut(&mut self) -> &mut Grid<OceanEngine> {
        &mut self.grid
    }

    /// World width in cells.
    pub fn width(&self) -> usize {
        self.config.width()
    }

    /// World height in cells.
    pub fn height(&self) -> usize {
        self.config.height()
    }

    fn center(&self) -> (f32, f32) {
        (self.width() as f32 / 2.0, self.height() as f32 / 2.0)
    }

    /// Fluid at rest, island re-stamped, boats sent home, ghosts refreshed.
    ///
    /// Biology is left untouched.
    pub fn reset(&mut self, arena: &mut Arena) -> Result<()> {
        let chunk = self.config.chunk_size;
        let area = chunk * chunk;
        let (cx, cy) = self.center();
        let r2 = self.config.island_radius * self.config.island_radius;

        for ty in 0..self.grid.rows() {
            for tx in 0..self.grid.cols() {
                let Some(cube) = self.grid.cube(tx, ty) else {
                    continue;
                };

                let data = arena.slice_mut(cube.face_offset(0), area * OCEAN_CHANNELS);
                for k in 0..Q {
                    data[k * area..(k + 1) * area].fill(W[k]);
                    data[(Q + k) * area..(Q + k + 1) * area].fill(W[k]);
                }
                data[OCEAN_RHO * area..(OCEAN_RHO + 1) * area].fill(1.0);
                data[OCEAN_UX * area..(OCEAN_UX + 1) * area].fill(0.0);
                data[OCEAN_UY * area..(OCEAN_UY + 1) * area].fill(0.0);

                let obstacle = &mut data[OCEAN_OBSTACLE * area..(OCEAN_OBSTACLE + 1) * area];
                obstacle.fill(0.0);
                for ly in 0..chunk {
                    for lx in 0..chunk {
                        let dx = (tx * chunk + lx) as f32 - cx;
                        let dy = (ty * chunk + ly) as f32 - cy;
                        if dx * dx + dy * dy < r2 {
                            obstacle[ly * chunk + lx] = 1.0;
                        }
                    }
                }
            }
        }

        for boat in &mut self.boats {
            boat.x = BOAT_HOME.0;
            boat.y = BOAT_HOME.1;
            boat.vx = 0.0;
            boat.vy = 0.0;
            boat.angle = 0.0;
        }

        self.grid.synchronize(arena, &RESET_SYNC)
    }

    /// Replace the fluid state with a uniform equilibrium flow `(ux, uy)` at
    /// unit density, everywhere including ghost cells.
    pub fn set_equilibrium_flow(&mut self, arena: &mut Arena, ux: f32, uy: f32) {
        let area = self.config.chunk_size * self.config.chunk_size;
        for cube in self.grid.cubes() {
            let data = arena.slice_mut(cube.face_offset(0), area * OCEAN_CHANNELS);
            fill_equilibrium(data, area, 1.0, ux, uy);
            data[OCEAN_RHO * area..(OCEAN_RHO + 1) * area].fill(1.0);
            data[OCEAN_UX * area..(OCEAN_UX + 1) * area].fill(ux);
            data[OCEAN_UY * area..(OCEAN_UY + 1) * area].fill(uy);
        }
    }

    /// Write a seed pattern into the biology layer, laid out over the whole
    /// world rather than per tile.
    pub fn seed_biology(&mut self, arena: &mut Arena, seed: &Seed) -> Result<()> {
        let (width, height) = (self.width(), self.height());
        let chunk = self.config.chunk_size;

        let mut global = vec![0.0f32; width * height];
        seed.apply(&mut global, width, height);

        for ty in 0..self.grid.rows() {
            for tx in 0..self.grid.cols() {
                let Some(cube) = self.grid.cube(tx, ty) else {
                    continue;
                };
                let bio = cube.face_mut(arena, OCEAN_BIO)?;
                for ly in 0..chunk {
                    let row = (ty * chunk + ly) * width + tx * chunk;
                    bio[ly * chunk..(ly + 1) * chunk].copy_from_slice(&global[row..row + chunk]);
                }
            }
        }

        self.grid.synchronize(arena, &[OCEAN_BIO])
    }

    /// One world tick: every tile, the boundary exchange, then the boats.
    pub fn step(&mut self, arena: &mut Arena) -> Result<()> {
        self.grid.compute(arena, &STEP_SYNC)?;

        let (width, height) = (self.width(), self.height());
        let chunk = self.config.chunk_size;
        let center = self.center();
        let dynamics = &self.config.boats;

        for boat in &mut self.boats {
            let gx = (boat.x.floor() as i64).rem_euclid(width as i64) as usize;
            let gy = (boat.y.floor() as i64).rem_euclid(height as i64) as usize;
            let fluid = sample_velocity(&self.grid, arena, chunk, gx, gy)?;

            boat.apply_controls(self.controls, dynamics);
            boat.advect(fluid, dynamics);
            boat.push_out_of(
                center,
                self.config.collision_radius,
                (width as f32, height as f32),
                dynamics.collision_damping,
            );
            boat.wrap(width as f32, height as f32);
            boat.update_heading();
        }

        Ok(())
    }

    pub fn spawn_boat(&mut self, x: f32, y: f32, length: f32) -> &mut Boat {
        self.boats.push(Boat::new(x, y, length));
        let last = self.boats.len() - 1;
        &mut self.boats[last]
    }

    /// Spawn with the default hull length.
    pub fn spawn_default_boat(&mut self, x: f32, y: f32) -> &mut Boat {
        self.spawn_boat(x, y, DEFAULT_BOAT_LENGTH)
    }

    pub fn clear_boats(&mut self) {
        self.boats.clear();
    }

    pub fn boats(&self) -> &[Boat] {
        &self.boats
    }

    pub fn controls(&self) -> Controls {
        self.controls
    }

    pub fn set_controls(&mut self, controls: Controls) {
        self.controls = controls;
    }

    /// Vortex forcing parameters for every tile.
    pub fn set_vortex_params(&mut self, strength: f32, radius: f32) {
        for engine in self.grid.engines_mut() {
            engine.params.vortex_strength = strength;
            engine.params.vortex_radius = radius;
        }
    }

    /// Point the vortex at world position `(gx, gy)`.
    ///
    /// Only the tile containing the point is forced; every other tile is
    /// switched off.
    pub fn set_interaction(&mut self, gx: f32, gy: f32, active: bool) {
        let chunk = self.config.chunk_size as f32;
        let x = wrap_coord(gx, self.width() as f32);
        let y = wrap_coord(gy, self.height() as f32);
        let tx = ((x / chunk) as usize).min(self.grid.cols() - 1);
        let ty = ((y / chunk) as usize).min(self.grid.rows() - 1);

        for engine in self.grid.engines_mut() {
            engine.interaction.active = false;
        }

        if let Some(engine) = self.grid.cube_mut(tx, ty).and_then(|c| c.engine_mut()) {
            engine.interaction.x = x % chunk;
            engine.interaction.y = y % chunk;
            engine.interaction.active = active;
        }
    }

    /// Diagnostics across tiles: the largest speed and the mean relaxation time.
    pub fn stats(&self) -> OceanStats {
        let mut max_u = 0.0f32;
        let mut tau_sum = 0.0f32;
        let mut tiles = 0usize;
        for engine in self.grid.cubes().filter_map(|c| c.engine()) {
            let stats = engine.stats();
            max_u = max_u.max(stats.max_u);
            tau_sum += stats.avg_tau;
            tiles += 1;
        }
        OceanStats {
            max_u,
            avg_tau: if tiles > 0 { tau_sum / tiles as f32 } else { 0.0 },
        }
    }
}

fn sample_velocity(
    grid: &Grid<OceanEngine>,
    arena: &Arena,
    chunk: usize,
    gx: usize,
    gy: usize,
) -> Result<(f32, f32)> {
    let Some(cube) = grid.cube(gx / chunk, gy / chunk) else {
        return Ok((0.0, 0.0));
    };
    let idx = (gy % chunk) * chunk + gx % chunk;
    let ux = cube.face(arena, OCEAN_UX)?[idx];
    let uy = cube.face(arena, OCEAN_UY)?[idx];
    Ok((ux, uy))
}
