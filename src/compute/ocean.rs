//! Ocean tile engine: pull-streaming D2Q9 with a Smagorinsky closure,
//! user-driven vortex forcing, and a diffusing / growing biology layer.
//!
//! Only the interior `1..N-1` is computed. Ghost rows and columns are
//! written by the grid exchange and read here as streaming sources.

use serde::{Deserialize, Serialize};

use crate::runtime::Faces;
use crate::schema::OceanParams;

use super::Engine;
use super::d2q9::{CX, CY, NEXT, OPP, Q, W, equilibrium};

pub const OCEAN_UX: usize = 18;
pub const OCEAN_UY: usize = 19;
pub const OCEAN_RHO: usize = 20;
pub const OCEAN_BIO: usize = 21;
pub const OCEAN_OBSTACLE: usize = 22;
pub const OCEAN_BIO_SCRATCH: usize = 23;

/// Elevation reported for solid cells.
pub const PLATEAU_HEIGHT: f32 = 5.0;

const RHO_MIN: f32 = 0.8;
const RHO_MAX: f32 = 1.2;
const TAU_FLOOR: f32 = 0.505;
const VORTEX_GAIN: f32 = 0.005;

/// Display elevation of one cell: islands are a flat plateau, water follows
/// its density offset.
#[inline]
pub fn obstacle_height(obstacle: f32, rho: f32) -> f32 {
    if obstacle > 0.5 {
        PLATEAU_HEIGHT
    } else {
        rho - 1.0
    }
}

/// Pointer-driven vortex forcing, in cube-local cell coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Interaction {
    pub x: f32,
    pub y: f32,
    pub active: bool,
}

/// Per-tick diagnostics.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct OceanStats {
    /// Largest fluid speed before the CFL clamp.
    pub max_u: f32,
    /// Mean effective relaxation time over cells that went through the
    /// turbulence closure.
    pub avg_tau: f32,
}

#[derive(Debug, Clone, Default)]
pub struct OceanEngine {
    pub params: OceanParams,
    pub interaction: Interaction,
    stats: OceanStats,
}

impl OceanEngine {
    pub fn new(params: OceanParams) -> Self {
        Self {
            params,
            interaction: Interaction::default(),
            stats: OceanStats::default(),
        }
    }

    pub fn stats(&self) -> OceanStats {
        self.stats
    }

    fn step_fluid(&mut self, data: &mut [f32], n: usize) {
        let area = n * n;
        let obstacle = OCEAN_OBSTACLE * area;
        let (rho_face, ux_face, uy_face) = (OCEAN_RHO * area, OCEAN_UX * area, OCEAN_UY * area);

        data[NEXT * area..(NEXT + Q) * area].fill(0.0);

        let params = &self.params;
        let Interaction {
            x: mx,
            y: my,
            active: forcing,
        } = self.interaction;
        let vr2 = params.vortex_radius * params.vortex_radius;

        let mut max_u = 0.0f32;
        let mut sum_tau = 0.0f32;
        let mut active_cells = 0usize;

        let mut pulled = [0.0f32; Q];
        let mut feq = [0.0f32; Q];

        for y in 1..n - 1 {
            for x in 1..n - 1 {
                let i = y * n + x;

                if data[obstacle + i] > 0.5 {
                    for k in 0..Q {
                        data[(NEXT + k) * area + i] = W[k];
                    }
                    data[rho_face + i] = 1.0;
                    data[ux_face + i] = 0.0;
                    data[uy_face + i] = 0.0;
                    continue;
                }

                let mut r = 0.0f32;
                let mut vx = 0.0f32;
                let mut vy = 0.0f32;
                for k in 0..Q {
                    let src = (y as i32 - CY[k]) as usize * n + (x as i32 - CX[k]) as usize;
                    pulled[k] = if data[obstacle + src] > 0.5 {
                        data[OPP[k] * area + i]
                    } else {
                        data[k * area + src]
                    };
                    r += pulled[k];
                    vx += pulled[k] * CX[k] as f32;
                    vy += pulled[k] * CY[k] as f32;
                }

                let mut shockwave = false;
                if r < RHO_MIN {
                    r = RHO_MIN;
                    shockwave = true;
                } else if r > RHO_MAX {
                    r = RHO_MAX;
                    shockwave = true;
                }

                vx /= r;
                vy /= r;

                if forcing {
                    let dx = x as f32 - mx;
                    let dy = y as f32 - my;
                    let dist2 = dx * dx + dy * dy;
                    if dist2 < vr2 {
                        let scale = params.vortex_strength
                            * VORTEX_GAIN
                            * (1.0 - dist2.sqrt() / params.vortex_radius);
                        vx += -dy * scale;
                        vy += dx * scale;
                    }
                }

                let speed = (vx * vx + vy * vy).sqrt();
                max_u = max_u.max(speed);
                if speed > params.cfl_limit {
                    let scale = params.cfl_limit / speed;
                    vx *= scale;
                    vy *= scale;
                    shockwave = true;
                }

                data[rho_face + i] = r;
                data[ux_face + i] = vx;
                data[uy_face + i] = vy;

                if shockwave {
                    for k in 0..Q {
                        data[(NEXT + k) * area + i] = equilibrium(k, r, vx, vy);
                    }
                    continue;
                }

                let mut pxx = 0.0f32;
                let mut pyy = 0.0f32;
                let mut pxy = 0.0f32;
                for k in 0..Q {
                    feq[k] = equilibrium(k, r, vx, vy);
                    let fneq = pulled[k] - feq[k];
                    let (cx, cy) = (CX[k] as f32, CY[k] as f32);
                    pxx += fneq * cx * cx;
                    pyy += fneq * cy * cy;
                    pxy += fneq * cx * cy;
                }

                let strain = (2.0 * (pxx * pxx + pyy * pyy + 2.0 * pxy * pxy)).sqrt();
                let mut tau = params.tau_0 + params.smagorinsky * strain;
                if tau.is_nan() || tau < TAU_FLOOR {
                    tau = TAU_FLOOR;
                }
                sum_tau += tau;
                active_cells += 1;

                for k in 0..Q {
                    data[(NEXT + k) * area + i] = pulled[k] - (pulled[k] - feq[k]) / tau;
                }
            }
        }

        if active_cells > 0 {
            self.stats.avg_tau = sum_tau / active_cells as f32;
        }
        self.stats.max_u = max_u;

        data.copy_within(NEXT * area..(NEXT + Q) * area, 0);
    }

    fn step_biology(&self, data: &mut [f32], n: usize) {
        let area = n * n;
        let bio = OCEAN_BIO * area;
        let obstacle = OCEAN_OBSTACLE * area;
        let scratch = OCEAN_BIO_SCRATCH * area;
        let diffusion = self.params.bio_diffusion;
        let growth = self.params.bio_growth;

        for y in 1..n - 1 {
            for x in 1..n - 1 {
                let i = bio + y * n + x;
                let b = data[i];
                // Islands keep their biology as is.
                if data[obstacle + y * n + x] > 0.5 {
                    data[scratch + y * n + x] = b;
                    continue;
                }
                let lap = data[i - 1] + data[i + 1] + data[i - n] + data[i + n] - 4.0 * b;
                let next = b + diffusion * lap + growth * b * (1.0 - b);
                data[scratch + y * n + x] = next.clamp(0.0, 1.0);
            }
        }

        for y in 1..n - 1 {
            let row = y * n + 1;
            data.copy_within(scratch + row..scratch + row + n - 2, bio + row);
        }
    }
}

impl Engine for OceanEngine {
    fn name(&self) -> &str {
        "OceanEngine"
    }

    fn required_channels(&self) -> usize {
        24
    }

    fn compute(&mut self, faces: &mut Faces<'_>) {
        let n = faces.size();
        let data = faces.raw_mut();
        self.step_fluid(data, n);
        self.step_biology(data, n);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::d2q9::fill_equilibrium;
    use crate::runtime::{Arena, Grid};

    fn at_rest(n: usize) -> Vec<f32> {
        let mut data = vec![0.0f32; n * n * 24];
        fill_equilibrium(&mut data, n * n, 1.0, 0.0, 0.0);
        data[OCEAN_RHO * n * n..(OCEAN_RHO + 1) * n * n].fill(1.0);
        data
    }

    fn face(data: &[f32], n: usize, index: usize) -> &[f32] {
        &data[index * n * n..(index + 1) * n * n]
    }

    #[test]
    fn test_mass_conserved_on_periodic_tile() {
        let n = 12;
        let area = n * n;
        let mut arena = Arena::new(area * 24 * 4);
        let mut grid = Grid::new(1, 1, n, &mut arena, OceanEngine::default, 24, true).unwrap();

        {
            let cube = grid.cube(0, 0).unwrap();
            let data = arena.slice_mut(cube.face_offset(0), area * 24);
            fill_equilibrium(data, area, 1.0, 0.0, 0.0);
            for y in 4..7 {
                for x in 4..7 {
                    for k in 0..Q {
                        data[k * area + y * n + x] = equilibrium(k, 1.02, 0.0, 0.0);
                    }
                }
            }
        }
        let sync: Vec<usize> = (0..Q).collect();
        grid.synchronize(&mut arena, &sync).unwrap();

        let mass = |arena: &Arena, grid: &Grid<OceanEngine>| {
            let cube = grid.cube(0, 0).unwrap();
            let mut total = 0.0f64;
            for k in 0..Q {
                let f = cube.face(arena, k).unwrap();
                for y in 1..n - 1 {
                    for x in 1..n - 1 {
                        total += f[y * n + x] as f64;
                    }
                }
            }
            total
        };

        let before = mass(&arena, &grid);
        for _ in 0..25 {
            grid.compute(&mut arena, &sync).unwrap();
        }
        let after = mass(&arena, &grid);
        assert!(
            ((after - before) / before).abs() < 1e-4,
            "mass drifted from {} to {}",
            before,
            after
        );
    }

    #[test]
    fn test_obstacle_cells_are_still() {
        let n = 10;
        let mut data = at_rest(n);
        data[OCEAN_OBSTACLE * n * n + 5 * n + 5] = 1.0;
        data[OCEAN_UX * n * n + 5 * n + 5] = 0.3;

        let mut engine = OceanEngine::default();
        engine.interaction = Interaction {
            x: 5.0,
            y: 5.0,
            active: true,
        };

        for tick in 0..8 {
            let mut faces = Faces::new(&mut data, n, 24);
            engine.compute(&mut faces);

            assert_eq!(face(&data, n, OCEAN_UX)[5 * n + 5], 0.0, "tick {}", tick);
            assert_eq!(face(&data, n, OCEAN_UY)[5 * n + 5], 0.0, "tick {}", tick);
            for k in 0..Q {
                assert_eq!(face(&data, n, k)[5 * n + 5], W[k], "tick {}", tick);
            }
        }
        // The forcing did move the surrounding water.
        assert!(face(&data, n, OCEAN_UY)[5 * n + 3] != 0.0);
    }

    #[test]
    fn test_island_biology_is_fixed() {
        let n = 8;
        let mut data = at_rest(n);
        data[OCEAN_OBSTACLE * n * n + 4 * n + 4] = 1.0;
        data[OCEAN_BIO * n * n + 4 * n + 5] = 1.0;

        let mut engine = OceanEngine::default();
        for _ in 0..3 {
            let mut faces = Faces::new(&mut data, n, 24);
            engine.compute(&mut faces);
        }

        let bio_face = face(&data, n, OCEAN_BIO);
        assert_eq!(bio_face[4 * n + 4], 0.0);
        // Water next to the bloom still picks it up.
        assert!(bio_face[4 * n + 6] > 0.0);
    }

    /// Tile at rest density with a uniform normal-stress perturbation and no
    /// momentum.
    fn stressed(n: usize) -> Vec<f32> {
        let mut data = at_rest(n);
        let area = n * n;
        for i in 0..area {
            data[i] -= 0.04;
            data[area + i] += 0.02;
            data[3 * area + i] += 0.02;
        }
        data
    }

    #[test]
    fn test_relaxation_time_is_floored() {
        let n = 6;
        let mut data = stressed(n);
        let mut engine = OceanEngine::new(OceanParams {
            tau_0: 0.3,
            smagorinsky: 0.0,
            ..Default::default()
        });
        let mut faces = Faces::new(&mut data, n, 24);
        engine.compute(&mut faces);

        assert!(
            (engine.stats().avg_tau - TAU_FLOOR).abs() < 1e-5,
            "avg_tau {}",
            engine.stats().avg_tau
        );
    }

    #[test]
    fn test_stress_raises_relaxation_time() {
        let n = 6;
        let mut data = stressed(n);
        let params = OceanParams::default();
        let tau_0 = params.tau_0;
        let smagorinsky = params.smagorinsky;
        let mut engine = OceanEngine::new(params);
        let mut faces = Faces::new(&mut data, n, 24);
        engine.compute(&mut faces);

        // Pxx = 0.02 + 0.02, the other components vanish.
        let strain = (2.0f32 * 0.04 * 0.04).sqrt();
        let expected = tau_0 + smagorinsky * strain;
        let avg_tau = engine.stats().avg_tau;
        assert!(avg_tau > tau_0, "avg_tau {}", avg_tau);
        assert!((avg_tau - expected).abs() < 1e-4, "avg_tau {}", avg_tau);

        // The same tile at equilibrium relaxes at exactly tau_0.
        let mut data = at_rest(n);
        let mut engine = OceanEngine::default();
        let mut faces = Faces::new(&mut data, n, 24);
        engine.compute(&mut faces);
        assert!((engine.stats().avg_tau - tau_0).abs() < 1e-5);
    }

    #[test]
    fn test_vortex_forcing_rotates_counterclockwise() {
        let n = 21;
        let mut data = at_rest(n);
        let mut engine = OceanEngine::default();
        engine.interaction = Interaction {
            x: 10.0,
            y: 10.0,
            active: true,
        };
        let mut faces = Faces::new(&mut data, n, 24);
        engine.compute(&mut faces);

        let ux = face(&data, n, OCEAN_UX);
        let uy = face(&data, n, OCEAN_UY);
        // East of the centre the flow turns +y, north of it -x.
        assert!(uy[10 * n + 15] > 0.0);
        assert!(ux[15 * n + 10] < 0.0);
        assert_eq!(ux[10 * n + 10], 0.0);
        assert!(engine.stats().max_u > 0.0);
    }

    #[test]
    fn test_density_clamp_falls_back_to_equilibrium() {
        let n = 6;
        let mut data = at_rest(n);
        for k in 0..Q {
            data[k * n * n..(k + 1) * n * n].fill(W[k] * 2.0);
        }

        let mut engine = OceanEngine::default();
        let mut faces = Faces::new(&mut data, n, 24);
        engine.compute(&mut faces);

        assert_eq!(face(&data, n, OCEAN_RHO)[2 * n + 2], RHO_MAX);
        let f0 = face(&data, n, 0)[2 * n + 2];
        assert!((f0 - W[0] * RHO_MAX).abs() < 1e-6);
    }

    #[test]
    fn test_biology_stays_in_unit_range() {
        let n = 8;
        let mut data = at_rest(n);
        let bio = OCEAN_BIO * n * n;
        for (i, cell) in data[bio..bio + n * n].iter_mut().enumerate() {
            *cell = if i % 3 == 0 { 1.5 } else { -0.2 };
        }
        let ghost = data[bio];

        let mut engine = OceanEngine::default();
        engine.params.bio_growth = 0.5;
        let mut faces = Faces::new(&mut data, n, 24);
        engine.compute(&mut faces);

        let bio_face = face(&data, n, OCEAN_BIO);
        for y in 1..n - 1 {
            for x in 1..n - 1 {
                let b = bio_face[y * n + x];
                assert!((0.0..=1.0).contains(&b), "bio {} at ({}, {})", b, x, y);
            }
        }
        // Ghost cells belong to the exchange and are left alone.
        assert_eq!(bio_face[0], ghost);
    }

    #[test]
    fn test_plateau_height() {
        assert_eq!(obstacle_height(1.0, 1.0), PLATEAU_HEIGHT);
        assert!((obstacle_height(0.0, 1.05) - 0.05).abs() < 1e-6);
    }
}
