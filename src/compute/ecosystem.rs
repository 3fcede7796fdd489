//! Ecosystem automaton - cyclic plant / herbivore / carnivore dominance.
//!
//! Each state is invaded by its successor `(s + 1) mod 4`. Empty land is
//! colonised by a single neighbour; occupied cells fall only when at least two
//! of the 8 neighbours carry the successor state.

use crate::runtime::Faces;

use super::Engine;

/// Current state face.
pub const ECOSYSTEM_STATE: usize = 1;
/// Next state face (scratch).
pub const ECOSYSTEM_NEXT: usize = 2;

pub const EMPTY: f32 = 0.0;
pub const PLANT: f32 = 1.0;
pub const HERBIVORE: f32 = 2.0;
pub const CARNIVORE: f32 = 3.0;

/// Successor of a state in the dominance cycle.
#[inline]
pub fn successor(state: f32) -> f32 {
    let next = state + 1.0;
    if next > CARNIVORE { EMPTY } else { next }
}

#[derive(Debug, Clone, Default)]
pub struct EcosystemEngine;

impl EcosystemEngine {
    pub fn new() -> Self {
        Self
    }
}

impl Engine for EcosystemEngine {
    fn name(&self) -> &str {
        "Ecosystem (plants, herbivores, carnivores)"
    }

    fn required_channels(&self) -> usize {
        3
    }

    fn compute(&mut self, faces: &mut Faces<'_>) {
        let n = faces.size();
        let (current, next) = faces.pair_mut(ECOSYSTEM_STATE, ECOSYSTEM_NEXT);

        for y in 0..n {
            let top = (if y == 0 { n - 1 } else { y - 1 }) * n;
            let mid = y * n;
            let bot = (if y == n - 1 { 0 } else { y + 1 }) * n;

            for x in 0..n {
                let left = if x == 0 { n - 1 } else { x - 1 };
                let right = if x == n - 1 { 0 } else { x + 1 };

                let idx = mid + x;
                let state = current[idx];
                let target = successor(state);

                let neighbours = [
                    current[top + x],
                    current[mid + left],
                    current[mid + right],
                    current[bot + x],
                    current[top + left],
                    current[top + right],
                    current[bot + left],
                    current[bot + right],
                ];
                let predators = neighbours.iter().filter(|&&v| v == target).count();

                let threshold = if state == EMPTY { 1 } else { 2 };
                next[idx] = if predators >= threshold { target } else { state };
            }
        }

        faces.copy_face(ECOSYSTEM_NEXT, ECOSYSTEM_STATE);
    }
}
