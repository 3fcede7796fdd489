//! Grid - a rectangular assembly of same-sized cubes kept consistent through
//! ghost-cell boundary exchange.
//!
//! Each tick first computes every cube, then copies one-cell-deep border
//! strips between neighbours for the requested faces:
//!
//! ```text
//! pass 1 (X): interior column s-2  -> right neighbour's column 0
//!             interior column 1    -> left neighbour's column s-1
//! pass 2 (Y): full row s-2         -> bottom neighbour's row 0
//!             full row 1           -> top neighbour's row s-1
//! ```
//!
//! Pass 2 copies whole rows, so the ghost columns written by pass 1 reach the
//! diagonal neighbours without a separate corner exchange.

use crate::compute::{AnyEngine, Engine};
use crate::error::{Result, TriadeError};

use super::{Arena, BYTES_PER_FLOAT, Cube};

/// `cols x rows` cubes of identical size and channel count.
#[derive(Debug)]
pub struct Grid<E = AnyEngine> {
    cols: usize,
    rows: usize,
    cube_size: usize,
    channels: usize,
    periodic: bool,
    /// Row-major: cube (x, y) lives at `y * cols + x`.
    cubes: Vec<Cube<E>>,
}

impl<E: Engine> Grid<E> {
    /// Allocate `cols * rows` cubes and give each a fresh engine from `factory`.
    pub fn new<F>(
        cols: usize,
        rows: usize,
        cube_size: usize,
        arena: &mut Arena,
        mut factory: F,
        channels: usize,
        periodic: bool,
    ) -> Result<Self>
    where
        F: FnMut() -> E,
    {
        if cols == 0 || rows == 0 {
            return Err(TriadeError::InvalidGrid {
                reason: format!("grid dimensions must be non-zero, got {}x{}", cols, rows),
            });
        }
        if cube_size < 3 {
            return Err(TriadeError::InvalidGrid {
                reason: format!("cube size {} leaves no interior cells", cube_size),
            });
        }

        // A grid that does not fit must leave the arena cursor unchanged.
        let available = arena.remaining_bytes();
        let requested = cols
            .checked_mul(rows)
            .and_then(|n| n.checked_mul(cube_size))
            .and_then(|n| n.checked_mul(cube_size))
            .and_then(|n| n.checked_mul(channels))
            .and_then(|n| n.checked_mul(BYTES_PER_FLOAT))
            .ok_or(TriadeError::OutOfMemory {
                requested: usize::MAX,
                available,
            })?;
        if requested > available {
            return Err(TriadeError::OutOfMemory {
                requested,
                available,
            });
        }

        let mut cubes = Vec::with_capacity(cols * rows);
        for _ in 0..cols * rows {
            let cube = Cube::new(cube_size, arena, channels)?.with_engine(factory());
            cubes.push(cube);
        }

        Ok(Self {
            cols,
            rows,
            cube_size,
            channels,
            periodic,
            cubes,
        })
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cube_size(&self) -> usize {
        self.cube_size
    }

    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    #[inline]
    pub fn is_periodic(&self) -> bool {
        self.periodic
    }

    /// Cube at column `x`, row `y`.
    pub fn cube(&self, x: usize, y: usize) -> Option<&Cube<E>> {
        if x < self.cols && y < self.rows {
            self.cubes.get(y * self.cols + x)
        } else {
            None
        }
    }

    pub fn cube_mut(&mut self, x: usize, y: usize) -> Option<&mut Cube<E>> {
        if x < self.cols && y < self.rows {
            self.cubes.get_mut(y * self.cols + x)
        } else {
            None
        }
    }

    /// Cubes in row-major order.
    pub fn cubes(&self) -> impl Iterator<Item = &Cube<E>> {
        self.cubes.iter()
    }

    pub fn cubes_mut(&mut self) -> impl Iterator<Item = &mut Cube<E>> {
        self.cubes.iter_mut()
    }

    /// Every assigned engine, in row-major order.
    pub fn engines_mut(&mut self) -> impl Iterator<Item = &mut E> {
        self.cubes.iter_mut().filter_map(|cube| cube.engine_mut())
    }

    /// One grid tick: compute every cube, then exchange borders of `sync_faces`.
    ///
    /// Cubes read their ghost cells as left by the previous exchange, so
    /// border data seen during a tick is one tick old.
    pub fn compute(&mut self, arena: &mut Arena, sync_faces: &[usize]) -> Result<()> {
        for cube in &mut self.cubes {
            cube.compute(arena)?;
        }
        self.synchronize(arena, sync_faces)
    }

    /// Boundary exchange only, without computing.
    pub fn synchronize(&self, arena: &mut Arena, faces: &[usize]) -> Result<()> {
        if let Some(&bad) = faces.iter().find(|&&f| f >= self.channels) {
            return Err(TriadeError::ChannelOutOfRange {
                index: bad,
                channels: self.channels,
            });
        }
        for &face in faces {
            self.synchronize_face(arena, face);
        }
        Ok(())
    }

    /// Float index of face `face` of cube (x, y) in the arena.
    #[inline]
    fn base(&self, x: usize, y: usize, face: usize) -> usize {
        self.cubes[y * self.cols + x].face_offset(face) / BYTES_PER_FLOAT
    }

    fn synchronize_face(&self, arena: &mut Arena, face: usize) {
        let s = self.cube_size;
        let (cols, rows) = (self.cols, self.rows);
        let data = arena.floats_mut();

        // Pass 1: left/right ghost columns (interior rows only).
        for y in 0..rows {
            for x in 0..cols {
                let src = self.base(x, y, face);

                if x + 1 < cols || self.periodic {
                    let right = self.base((x + 1) % cols, y, face);
                    for row in 1..s - 1 {
                        data[right + row * s] = data[src + row * s + s - 2];
                    }
                }

                if x > 0 || self.periodic {
                    let left = self.base((x + cols - 1) % cols, y, face);
                    for row in 1..s - 1 {
                        data[left + row * s + s - 1] = data[src + row * s + 1];
                    }
                }
            }
        }

        // Pass 2: top/bottom ghost rows, full width (carries the corners).
        for y in 0..rows {
            for x in 0..cols {
                let src = self.base(x, y, face);

                if y + 1 < rows || self.periodic {
                    let bottom = self.base(x, (y + 1) % rows, face);
                    let from = src + (s - 2) * s;
                    data.copy_within(from..from + s, bottom);
                }

                if y > 0 || self.periodic {
                    let top = self.base(x, (y + rows - 1) % rows, face);
                    let from = src + s;
                    data.copy_within(from..from + s, top + (s - 1) * s);
                }
            }
        }
    }
}
