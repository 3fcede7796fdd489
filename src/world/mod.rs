//! World module - Multi-tile ocean orchestration and the boats sailing it.

mod boat;
mod ocean_world;

pub use boat::*;
pub use ocean_world::*;
