//! Schema module - Configuration and seeding types for Triade sessions.

mod config;
mod seed;

pub use config::*;
pub use seed::*;
