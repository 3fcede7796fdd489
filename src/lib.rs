//! Triade - Arena-backed multi-channel simulation kernel.
//!
//! Simulations live in *cubes*: an N x N grid of cells carrying K float
//! channels ("faces"), all carved out of one preallocated [`runtime::Arena`].
//! Each cube delegates its per-tick update to an [`compute::Engine`]. Several
//! cubes can be tiled into a [`runtime::Grid`] that keeps their one-cell ghost
//! borders consistent, which is how the toroidal ocean in [`world`] is built.
//!
//! # Architecture
//!
//! - `schema`: Configuration types and seed patterns
//! - `runtime`: Arena, faces, cubes, grids and the named-cube session
//! - `compute`: Engines (lattice Boltzmann, automata, heatmap) and helpers
//! - `world`: Multi-tile ocean with boats
//!
//! # Example
//!
//! ```rust,no_run
//! use triade::{
//!     compute::{FactionWarEngine, WAR_STATE},
//!     runtime::Session,
//!     schema::{FactionWarConfig, Seed, SessionConfig},
//! };
//!
//! let mut session = Session::new(&SessionConfig::default())?;
//! session.create_cube("war", 256, FactionWarEngine::new(FactionWarConfig::default()), 3)?;
//!
//! // Seed the battlefield: 80% empty, 10% blue, 10% red.
//! let (cube, arena) = session.cube_and_arena("war").expect("cube exists");
//! Seed::faction_war(42).apply(cube.face_mut(arena, WAR_STATE)?, 256, 256);
//!
//! for _ in 0..100 {
//!     session.compute("war")?;
//! }
//! # Ok::<(), triade::TriadeError>(())
//! ```

pub mod compute;
pub mod error;
pub mod runtime;
pub mod schema;
pub mod world;

// Re-export commonly used types
pub use compute::{AnyEngine, Engine, FaceStats};
pub use error::{Result, TriadeError};
pub use runtime::{Arena, Cube, Faces, Grid, Session};
pub use schema::{DemoConfig, Pattern, Scenario, Seed, SessionConfig, WorldConfig};
pub use world::{Boat, Controls, OceanWorld};
