//! Session - owns the arena and a registry of named cubes.

use std::collections::BTreeMap;

use crate::compute::AnyEngine;
use crate::error::{Result, TriadeError};
use crate::schema::SessionConfig;

use super::{Arena, Cube};

/// Top-level owner of simulation memory for one running demo.
#[derive(Debug)]
pub struct Session {
    arena: Arena,
    cubes: BTreeMap<String, Cube<AnyEngine>>,
}

impl Session {
    /// Allocate the session arena.
    pub fn new(config: &SessionConfig) -> Result<Self> {
        config.validate()?;
        let arena = Arena::with_megabytes(config.arena_megabytes);
        log::info!(
            "triade session initialized with {} MB of arena memory",
            config.arena_megabytes
        );
        Ok(Self {
            arena,
            cubes: BTreeMap::new(),
        })
    }

    /// Create and register a cube under `name`.
    ///
    /// Fails with [`TriadeError::NameConflict`] before touching the arena if the
    /// name is taken. Channel requirements of `engine` are not checked here.
    pub fn create_cube(
        &mut self,
        name: &str,
        size: usize,
        engine: impl Into<AnyEngine>,
        channels: usize,
    ) -> Result<&mut Cube<AnyEngine>> {
        if self.cubes.contains_key(name) {
            return Err(TriadeError::NameConflict {
                name: name.to_string(),
            });
        }

        let cube = Cube::new(size, &mut self.arena, channels)?.with_engine(engine.into());
        log::debug!(
            "session: created cube '{}' ({}x{}, {} channels)",
            name,
            size,
            size,
            channels
        );
        Ok(self.cubes.entry(name.to_string()).or_insert(cube))
    }

    pub fn cube(&self, name: &str) -> Option<&Cube<AnyEngine>> {
        self.cubes.get(name)
    }

    pub fn cube_mut(&mut self, name: &str) -> Option<&mut Cube<AnyEngine>> {
        self.cubes.get_mut(name)
    }

    /// Registered cube names, sorted.
    pub fn cube_names(&self) -> impl Iterator<Item = &str> {
        self.cubes.keys().map(String::as_str)
    }

    /// Compute one named cube.
    pub fn compute(&mut self, name: &str) -> Result<()> {
        let cube = self
            .cubes
            .get_mut(name)
            .ok_or_else(|| TriadeError::CubeNotFound {
                name: name.to_string(),
            })?;
        cube.compute(&mut self.arena)
    }

    /// Compute every registered cube in name order.
    pub fn compute_all(&mut self) -> Result<()> {
        for cube in self.cubes.values_mut() {
            cube.compute(&mut self.arena)?;
        }
        Ok(())
    }

    pub fn arena(&self) -> &Arena {
        &self.arena
    }

    pub fn arena_mut(&mut self) -> &mut Arena {
        &mut self.arena
    }

    /// Split borrow of a named cube and the arena, for reading or writing faces.
    pub fn cube_and_arena(&mut self, name: &str) -> Option<(&mut Cube<AnyEngine>, &mut Arena)> {
        let cube = self.cubes.get_mut(name)?;
        Some((cube, &mut self.arena))
    }
}
