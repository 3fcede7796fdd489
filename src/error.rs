//! Error taxonomy for the Triade kernel.

use crate::schema::ConfigError;

/// Errors raised by arena, cube, grid and session operations.
///
/// Construction-time errors abort only the call that triggered them; the
/// session and any cubes already created stay usable.
#[derive(Debug, thiserror::Error)]
pub enum TriadeError {
    #[error("Out of memory: requested {requested} bytes, {available} bytes remaining in arena")]
    OutOfMemory { requested: usize, available: usize },
    #[error("A cube named '{name}' already exists")]
    NameConflict { name: String },
    #[error("No cube named '{name}'")]
    CubeNotFound { name: String },
    #[error("No engine assigned to this cube")]
    MissingEngine,
    #[error(
        "Engine '{engine}' requires {required} channels, but the cube only has {actual}. \
         Allocate the cube with channels >= {required}"
    )]
    InsufficientChannels {
        engine: String,
        required: usize,
        actual: usize,
    },
    #[error("Channel {index} out of range for a cube with {channels} channels")]
    ChannelOutOfRange { index: usize, channels: usize },
    #[error("Invalid grid: {reason}")]
    InvalidGrid { reason: String },
    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Convenience alias used throughout the crate.
pub type Result<T, E = TriadeError> = std::result::Result<T, E>;
