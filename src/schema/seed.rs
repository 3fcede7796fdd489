//! Seed patterns for initializing input faces.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde::{Deserialize, Serialize};

/// Initial contents for one face.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Seed {
    /// Pattern to use for seeding.
    pub pattern: Pattern,
}

impl Default for Seed {
    fn default() -> Self {
        Self {
            pattern: Pattern::GaussianBlob {
                center: (0.25, 0.25),
                radius: 0.1,
                amplitude: 0.5,
            },
        }
    }
}

impl Seed {
    /// Faction-war opening: 80% empty, 10% blue, 10% red.
    pub fn faction_war(seed: u64) -> Self {
        Self {
            pattern: Pattern::RandomStates {
                states: vec![(0.0, 0.8), (2.0, 0.1), (3.0, 0.1)],
                seed,
            },
        }
    }

    /// Ecosystem opening: uniform mix of the four states.
    pub fn ecosystem(seed: u64) -> Self {
        Self {
            pattern: Pattern::RandomStates {
                states: vec![(0.0, 0.25), (1.0, 0.25), (2.0, 0.25), (3.0, 0.25)],
                seed,
            },
        }
    }
}

/// Predefined patterns. Positions and radii are fractions of the face size.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Pattern {
    /// Every cell set to `value`.
    Uniform { value: f32 },
    /// Each cell independently drawn from weighted discrete states.
    RandomStates {
        /// `(state, weight)` pairs; weights need not sum to 1.
        states: Vec<(f32, f32)>,
        /// Random seed.
        seed: u64,
    },
    /// Single Gaussian blob added on top of the current values.
    GaussianBlob {
        /// Center position as fraction of face size (0.0-1.0).
        center: (f32, f32),
        /// Radius as fraction of face size.
        radius: f32,
        /// Peak amplitude.
        amplitude: f32,
    },
    /// Filled disk set to `value`.
    Disk {
        center: (f32, f32),
        radius: f32,
        value: f32,
    },
    /// Explicit `(x, y, value)` cells.
    Points { cells: Vec<(usize, usize, f32)> },
}

impl Seed {
    /// Write the pattern into a row-major `width x height` raster.
    pub fn apply(&self, face: &mut [f32], width: usize, height: usize) {
        debug_assert_eq!(face.len(), width * height);

        match &self.pattern {
            Pattern::Uniform { value } => face.fill(*value),
            Pattern::RandomStates { states, seed } => apply_random_states(face, states, *seed),
            Pattern::GaussianBlob {
                center,
                radius,
                amplitude,
            } => {
                let cx = center.0 * width as f32;
                let cy = center.1 * height as f32;
                let r = radius * width.min(height) as f32;
                apply_gaussian(face, width, cx, cy, r, *amplitude);
            }
            Pattern::Disk {
                center,
                radius,
                value,
            } => {
                let cx = center.0 * width as f32;
                let cy = center.1 * height as f32;
                let r = radius * width.min(height) as f32;
                let r2 = r * r;
                for (i, cell) in face.iter_mut().enumerate() {
                    let dx = (i % width) as f32 - cx;
                    let dy = (i / width) as f32 - cy;
                    if dx * dx + dy * dy < r2 {
                        *cell = *value;
                    }
                }
            }
            Pattern::Points { cells } => {
                for &(x, y, v) in cells {
                    if x < width && y < height {
                        face[y * width + x] = v;
                    }
                }
            }
        }
    }
}

fn apply_random_states(face: &mut [f32], states: &[(f32, f32)], seed: u64) {
    let total: f32 = states.iter().map(|&(_, w)| w.max(0.0)).sum();
    if states.is_empty() || total <= 0.0 {
        return;
    }

    let mut rng = StdRng::seed_from_u64(seed);
    for cell in face.iter_mut() {
        let mut pick = rng.r#gen::<f32>() * total;
        let mut chosen = states[states.len() - 1].0;
        for &(state, weight) in states {
            let weight = weight.max(0.0);
            if pick < weight {
                chosen = state;
                break;
            }
            pick -= weight;
        }
        *cell = chosen;
    }
}

fn apply_gaussian(face: &mut [f32], width: usize, cx: f32, cy: f32, radius: f32, amplitude: f32) {
    let sigma_sq = (radius / 2.0).powi(2);
    if sigma_sq <= 0.0 {
        return;
    }

    for (i, cell) in face.iter_mut().enumerate() {
        let dx = (i % width) as f32 - cx;
        let dy = (i / width) as f32 - cy;
        let dist_sq = dx * dx + dy * dy;
        *cell += amplitude * (-dist_sq / (2.0 * sigma_sq)).exp();
    }
}
