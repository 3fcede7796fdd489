//! Faction war - a two-colour Game of Life with annihilation and reinforcements.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::runtime::Faces;
use crate::schema::FactionWarConfig;

use super::Engine;

pub const WAR_STATE: usize = 1;
pub const WAR_NEXT: usize = 2;

pub const BLUE: f32 = 2.0;
pub const RED: f32 = 3.0;

#[derive(Debug, Clone)]
pub struct FactionWarEngine {
    config: FactionWarConfig,
    rng: StdRng,
}

impl FactionWarEngine {
    pub fn new(config: FactionWarConfig) -> Self {
        let rng = StdRng::seed_from_u64(config.seed);
        Self { config, rng }
    }

    pub fn config(&self) -> &FactionWarConfig {
        &self.config
    }

    /// Rule for a cell given its Moore-neighbourhood faction counts.
    fn next_state(&mut self, state: f32, blue: u32, red: u32) -> f32 {
        let total = blue + red;
        if state == BLUE {
            // Outnumbered locally: the blue cell is wiped out.
            if red >= 2 {
                return 0.0;
            }
            return if total == 2 || total == 3 { BLUE } else { 0.0 };
        }
        if state == RED {
            if blue >= 2 {
                return 0.0;
            }
            return if total == 2 || total == 3 { RED } else { 0.0 };
        }

        if total == 3 {
            if blue > red { BLUE } else { RED }
        } else if self.config.reinforcement_chance > 0.0
            && self.rng.gen_bool(self.config.reinforcement_chance.min(1.0))
        {
            if self.rng.gen_bool(0.5) { BLUE } else { RED }
        } else {
            0.0
        }
    }
}

impl Default for FactionWarEngine {
    fn default() -> Self {
        Self::new(FactionWarConfig::default())
    }
}

impl Engine for FactionWarEngine {
    fn name(&self) -> &str {
        "Faction War (blue vs red)"
    }

    fn required_channels(&self) -> usize {
        3
    }

    fn compute(&mut self, faces: &mut Faces<'_>) {
        let n = faces.size();
        let (current, next) = faces.pair_mut(WAR_STATE, WAR_NEXT);

        for y in 0..n {
            for x in 0..n {
                let mut blue = 0u32;
                let mut red = 0u32;
                for dy in [n - 1, 0, 1] {
                    for dx in [n - 1, 0, 1] {
                        if dx == 0 && dy == 0 {
                            continue;
                        }
                        let nx = (x + dx) % n;
                        let ny = (y + dy) % n;
                        let v = current[ny * n + nx];
                        if v == BLUE {
                            blue += 1;
                        } else if v == RED {
                            red += 1;
                        }
                    }
                }

                let idx = y * n + x;
                next[idx] = self.next_state(current[idx], blue, red);
            }
        }

        faces.copy_face(WAR_NEXT, WAR_STATE);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiet() -> FactionWarEngine {
        FactionWarEngine::new(FactionWarConfig {
            reinforcement_chance: 0.0,
            seed: 1,
        })
    }

    fn step(engine: &mut FactionWarEngine, state: &mut [f32], n: usize) {
        let mut data = vec![0.0f32; n * n * 3];
        data[n * n..2 * n * n].copy_from_slice(state);
        let mut faces = Faces::new(&mut data, n, 3);
        engine.compute(&mut faces);
        state.copy_from_slice(faces.face(WAR_STATE));
    }

    #[test]
    fn test_block_is_stable() {
        let n = 6;
        let mut state = vec![0.0f32; n * n];
        for (x, y) in [(2, 2), (3, 2), (2, 3), (3, 3)] {
            state[y * n + x] = BLUE;
        }
        let before = state.clone();

        let mut engine = quiet();
        for _ in 0..3 {
            step(&mut engine, &mut state, n);
        }
        assert_eq!(state, before);
    }

    #[test]
    fn test_blue_annihilated_by_two_reds() {
        let n = 6;
        let mut state = vec![0.0f32; n * n];
        state[2 * n + 2] = BLUE;
        state[2 * n + 3] = BLUE;
        state[3 * n + 2] = BLUE;
        state[n + 2] = RED;
        state[n + 1] = RED;

        step(&mut quiet(), &mut state, n);
        // (2,2) has 2 blue and 2 red neighbours, survival count but too many reds.
        assert_eq!(state[2 * n + 2], 0.0);
    }

    #[test]
    fn test_birth_takes_majority() {
        let mut engine = quiet();
        assert_eq!(engine.next_state(0.0, 2, 1), BLUE);
        assert_eq!(engine.next_state(0.0, 1, 2), RED);
        assert_eq!(engine.next_state(0.0, 1, 1), 0.0);
        assert_eq!(engine.next_state(RED, 0, 4), 0.0);
    }

    #[test]
    fn test_reinforcements_appear() {
        let mut engine = FactionWarEngine::new(FactionWarConfig {
            reinforcement_chance: 1.0,
            seed: 9,
        });
        let n = 8;
        let mut state = vec![0.0f32; n * n];
        step(&mut engine, &mut state, n);
        assert!(state.iter().all(|&v| v == BLUE || v == RED));
        assert!(state.contains(&BLUE));
        assert!(state.contains(&RED));
    }
}
