//! Compute module - Engines that advance cube faces by one tick.

mod aerodynamics;
mod ecosystem;
mod engine;
mod faction_war;
mod heatmap;
mod ocean;
mod stats;

pub mod d2q9;
pub mod obstacles;

pub use aerodynamics::*;
pub use ecosystem::*;
pub use engine::*;
pub use faction_war::*;
pub use heatmap::*;
pub use ocean::*;
pub use stats::*;
