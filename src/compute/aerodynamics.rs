//! Wind-tunnel lattice Boltzmann (D2Q9, BGK, push streaming).
//!
//! Air enters at column 1 with a fixed velocity, rows wrap top/bottom and the
//! right edge is a zero-gradient outlet. Solid cells bounce distributions
//! back to where they came from.

use crate::runtime::Faces;
use crate::schema::AerodynamicsConfig;

use super::Engine;
use super::d2q9::{CX, CY, NEXT, OPP, Q, equilibrium, fill_equilibrium};

pub const AERO_OBSTACLE: usize = 18;
pub const AERO_UX: usize = 19;
pub const AERO_UY: usize = 20;
pub const AERO_CURL: usize = 21;

/// UI multiplier applied by [`AerodynamicsEngine::display_drag`].
pub const DRAG_DISPLAY_SCALE: f32 = 1000.0;

#[derive(Debug, Clone)]
pub struct AerodynamicsEngine {
    config: AerodynamicsConfig,
    initialized: bool,
    drag_estimate: f32,
}

impl AerodynamicsEngine {
    pub fn new(config: AerodynamicsConfig) -> Self {
        Self {
            config,
            initialized: false,
            drag_estimate: 0.0,
        }
    }

    pub fn config(&self) -> &AerodynamicsConfig {
        &self.config
    }

    /// Exponentially smoothed momentum hitting obstacles along +x.
    pub fn drag_estimate(&self) -> f32 {
        self.drag_estimate
    }

    /// Drag scaled for display.
    pub fn display_drag(&self) -> f32 {
        self.drag_estimate * DRAG_DISPLAY_SCALE
    }

    /// Re-initialise the populations on the next compute.
    pub fn reset(&mut self) {
        self.initialized = false;
        self.drag_estimate = 0.0;
    }
}

impl Default for AerodynamicsEngine {
    fn default() -> Self {
        Self::new(AerodynamicsConfig::default())
    }
}

impl Engine for AerodynamicsEngine {
    fn name(&self) -> &str {
        "Lattice Boltzmann D2Q9 (wind tunnel)"
    }

    fn required_channels(&self) -> usize {
        22
    }

    fn compute(&mut self, faces: &mut Faces<'_>) {
        let n = faces.size();
        let area = faces.area();
        let u0 = self.config.inflow_velocity;
        let omega = self.config.omega;
        let data = faces.raw_mut();

        if !self.initialized {
            fill_equilibrium(data, area, 1.0, u0, 0.0);
            self.initialized = true;
        }

        let obstacle = AERO_OBSTACLE * area;
        let ux_face = AERO_UX * area;
        let uy_face = AERO_UY * area;
        let mut tick_drag = 0.0f32;

        for y in 1..n - 1 {
            for x in 1..n - 1 {
                let idx = y * n + x;

                if data[obstacle + idx] > 0.0 {
                    for k in 1..Q {
                        let ox = x as i32 - CX[k];
                        let oy = y as i32 - CY[k];
                        let origin = oy as usize * n + ox as usize;
                        let incoming = data[k * area + origin];
                        data[(NEXT + OPP[k]) * area + origin] = incoming;
                        if k == 1 {
                            tick_drag += incoming;
                        }
                    }
                    data[ux_face + idx] = 0.0;
                    data[uy_face + idx] = 0.0;
                    continue;
                }

                let mut rho = 0.0f32;
                let mut ux = 0.0f32;
                let mut uy = 0.0f32;
                for k in 0..Q {
                    let f = data[k * area + idx];
                    rho += f;
                    ux += CX[k] as f32 * f;
                    uy += CY[k] as f32 * f;
                }

                if x == 1 {
                    ux = u0 * rho;
                    uy = 0.0;
                }
                if rho > 0.0 {
                    ux /= rho;
                    uy /= rho;
                }
                data[ux_face + idx] = ux;
                data[uy_face + idx] = uy;

                for k in 0..Q {
                    let feq = equilibrium(k, rho, ux, uy);
                    let post = data[k * area + idx] * (1.0 - omega) + feq * omega;

                    let nx = (x as i32 + CX[k]).min(n as i32 - 2);
                    let mut ny = y as i32 + CY[k];
                    if ny < 1 {
                        ny = n as i32 - 2;
                    } else if ny > n as i32 - 2 {
                        ny = 1;
                    }

                    data[(NEXT + k) * area + ny as usize * n + nx as usize] = post;
                }
            }
        }

        data.copy_within(NEXT * area..(NEXT + Q) * area, 0);

        self.drag_estimate = self.drag_estimate * 0.9 + tick_drag * 0.1;

        let curl = AERO_CURL * area;
        for y in 1..n - 1 {
            for x in 1..n - 1 {
                let idx = y * n + x;
                let duy_dx = data[uy_face + idx + 1] - data[uy_face + idx - 1];
                let dux_dy = data[ux_face + idx + n] - data[ux_face + idx - n];
                data[curl + idx] = duy_dx - dux_dy;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::obstacles::stamp_disk;

    fn distribution_mass(data: &[f32], n: usize) -> f32 {
        let area = n * n;
        let mut total = 0.0;
        for k in 0..Q {
            for y in 1..n - 1 {
                for x in 1..n - 1 {
                    total += data[k * area + y * n + x];
                }
            }
        }
        total
    }

    #[test]
    fn test_uniform_inflow_is_steady() {
        let n = 16;
        let mut data = vec![0.0f32; n * n * 22];
        let mut engine = AerodynamicsEngine::default();

        {
            let mut faces = Faces::new(&mut data, n, 22);
            engine.compute(&mut faces);
        }
        let initial = distribution_mass(&data, n);
        for _ in 0..20 {
            let mut faces = Faces::new(&mut data, n, 22);
            engine.compute(&mut faces);
        }
        let after = distribution_mass(&data, n);

        assert!(
            (after - initial).abs() / initial < 1e-4,
            "mass drifted from {} to {}",
            initial,
            after
        );
        let ux = &data[AERO_UX * n * n..(AERO_UX + 1) * n * n];
        assert!((ux[5 * n + 5] - 0.12).abs() < 1e-4);
    }

    #[test]
    fn test_obstacle_has_zero_velocity_and_drag() {
        let n = 24;
        let mut data = vec![0.0f32; n * n * 22];
        {
            let obstacle = &mut data[AERO_OBSTACLE * n * n..(AERO_OBSTACLE + 1) * n * n];
            stamp_disk(obstacle, n, 12.0, 12.0, 3.0);
        }

        let mut engine = AerodynamicsEngine::default();
        for _ in 0..10 {
            let mut faces = Faces::new(&mut data, n, 22);
            engine.compute(&mut faces);
        }

        let ux = &data[AERO_UX * n * n..(AERO_UX + 1) * n * n];
        let uy = &data[AERO_UY * n * n..(AERO_UY + 1) * n * n];
        assert_eq!(ux[12 * n + 12], 0.0);
        assert_eq!(uy[12 * n + 12], 0.0);
        assert!(engine.drag_estimate() > 0.0);
        assert_eq!(engine.display_drag(), engine.drag_estimate() * DRAG_DISPLAY_SCALE);

        engine.reset();
        assert_eq!(engine.drag_estimate(), 0.0);
    }
}
