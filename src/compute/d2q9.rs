//! D2Q9 lattice shared by the lattice-Boltzmann engines.
//!
//! Direction order: rest, E, N, W, S, NE, NW, SW, SE.

/// Number of discrete velocities.
pub const Q: usize = 9;

/// X components of the lattice velocities.
pub const CX: [i32; Q] = [0, 1, 0, -1, 0, 1, -1, -1, 1];

/// Y components of the lattice velocities.
pub const CY: [i32; Q] = [0, 0, 1, 0, -1, 1, 1, -1, -1];

/// Lattice weights.
pub const W: [f32; Q] = [
    4.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 9.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
    1.0 / 36.0,
];

/// Index of the opposite direction (bounce-back partner).
pub const OPP: [usize; Q] = [0, 3, 4, 1, 2, 7, 8, 5, 6];

/// First face of the post-collision buffer block.
pub const NEXT: usize = Q;

/// Second-order equilibrium distribution for direction `k`.
#[inline(always)]
pub fn equilibrium(k: usize, rho: f32, ux: f32, uy: f32) -> f32 {
    let cu = CX[k] as f32 * ux + CY[k] as f32 * uy;
    let u_sq = ux * ux + uy * uy;
    W[k] * rho * (1.0 + 3.0 * cu + 4.5 * cu * cu - 1.5 * u_sq)
}

/// Density and velocity from nine distributions.
#[inline(always)]
pub fn moments(f: &[f32; Q]) -> (f32, f32, f32) {
    let mut rho = 0.0f32;
    let mut mx = 0.0f32;
    let mut my = 0.0f32;
    for k in 0..Q {
        rho += f[k];
        mx += CX[k] as f32 * f[k];
        my += CY[k] as f32 * f[k];
    }
    (rho, mx, my)
}

/// Write the equilibrium for (rho, ux, uy) into faces `0..9` and `9..18`.
///
/// `data` is the whole cube slice and `area` the floats per face.
pub fn fill_equilibrium(data: &mut [f32], area: usize, rho: f32, ux: f32, uy: f32) {
    for k in 0..Q {
        let feq = equilibrium(k, rho, ux, uy);
        data[k * area..(k + 1) * area].fill(feq);
        data[(NEXT + k) * area..(NEXT + k + 1) * area].fill(feq);
    }
}
