//! Runtime module - memory layout and execution order.
//!
//! - [`Arena`]: one contiguous float buffer, append-only allocation
//! - [`Cube`]: N x N tile of K faces carved from the arena
//! - [`Grid`]: cubes stitched together through ghost-cell exchange
//! - [`Session`]: registry of named cubes sharing one arena

mod arena;
mod cube;
mod faces;
mod grid;
mod session;

pub use arena::*;
pub use cube::*;
pub use faces::*;
pub use grid::*;
pub use session::*;
