//! Cube - an N x N tile of K channels carved from one arena allocation.
//!
//! The cube only records where its channels live; the memory itself belongs
//! to the [`Arena`] and is borrowed for every access.

use crate::compute::{AnyEngine, Engine};
use crate::error::{Result, TriadeError};

use super::{Arena, BYTES_PER_FLOAT, Faces};

/// N x N grid of `channels` faces driven by an optional engine.
#[derive(Debug)]
pub struct Cube<E = AnyEngine> {
    size: usize,
    channels: usize,
    /// Byte offset of face 0 in the arena.
    offset: usize,
    engine: Option<E>,
}

impl<E: Engine> Cube<E> {
    /// Allocate `channels` faces of `size * size` floats from the arena.
    pub fn new(size: usize, arena: &mut Arena, channels: usize) -> Result<Self> {
        if size == 0 {
            return Err(TriadeError::InvalidGrid {
                reason: "cube size must be at least 1".to_string(),
            });
        }
        let offset = arena.allocate(size * size, channels)?;
        Ok(Self {
            size,
            channels,
            offset,
            engine: None,
        })
    }

    /// Builder-style engine assignment.
    pub fn with_engine(mut self, engine: E) -> Self {
        self.engine = Some(engine);
        self
    }

    /// Replace the active engine. Channel requirements are checked lazily in
    /// [`Cube::compute`].
    pub fn set_engine(&mut self, engine: E) {
        self.engine = Some(engine);
    }

    /// Detach the active engine.
    pub fn take_engine(&mut self) -> Option<E> {
        self.engine.take()
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    /// Edge length N.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of faces K.
    #[inline]
    pub fn channels(&self) -> usize {
        self.channels
    }

    /// Floats per face.
    #[inline]
    pub fn area(&self) -> usize {
        self.size * self.size
    }

    /// Byte offset of face `index` in the arena.
    #[inline]
    pub fn face_offset(&self, index: usize) -> usize {
        self.offset + index * self.area() * BYTES_PER_FLOAT
    }

    /// Advance the cube by one tick.
    ///
    /// A cube without an engine is tolerated: the call logs a warning and
    /// does nothing.
    pub fn compute(&mut self, arena: &mut Arena) -> Result<()> {
        let (size, channels, offset) = (self.size, self.channels, self.offset);
        let Some(engine) = self.engine.as_mut() else {
            log::warn!(
                "cube at offset {}: {}, skipping compute",
                offset,
                TriadeError::MissingEngine
            );
            return Ok(());
        };

        let required = engine.required_channels();
        if channels < required {
            return Err(TriadeError::InsufficientChannels {
                engine: engine.name().to_string(),
                required,
                actual: channels,
            });
        }

        let data = arena.slice_mut(offset, size * size * channels);
        let mut faces = Faces::new(data, size, channels);
        engine.compute(&mut faces);
        Ok(())
    }

    /// All faces of this cube, in the layout engines see.
    pub fn faces_mut<'a>(&self, arena: &'a mut Arena) -> Faces<'a> {
        let data = arena.slice_mut(self.offset, self.area() * self.channels);
        Faces::new(data, self.size, self.channels)
    }

    fn check_channel(&self, index: usize) -> Result<()> {
        if index >= self.channels {
            return Err(TriadeError::ChannelOutOfRange {
                index,
                channels: self.channels,
            });
        }
        Ok(())
    }

    /// Read-only snapshot of one face.
    pub fn face<'a>(&self, arena: &'a Arena, index: usize) -> Result<&'a [f32]> {
        self.check_channel(index)?;
        Ok(arena.slice(self.face_offset(index), self.area()))
    }

    /// Writable face (input masks, seed states).
    pub fn face_mut<'a>(&self, arena: &'a mut Arena, index: usize) -> Result<&'a mut [f32]> {
        self.check_channel(index)?;
        Ok(arena.slice_mut(self.face_offset(index), self.area()))
    }

    /// Zero-fill one face.
    pub fn clear_channel(&self, arena: &mut Arena, index: usize) -> Result<()> {
        self.fill_channel(arena, index, 0.0)
    }

    /// Fill one face with a constant.
    pub fn fill_channel(&self, arena: &mut Arena, index: usize, value: f32) -> Result<()> {
        self.face_mut(arena, index)?.fill(value);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::compute::{ECOSYSTEM_STATE, EcosystemEngine, HeatmapEngine, PLANT};

    #[test]
    fn test_faces_are_disjoint_and_sized() {
        let mut arena = Arena::new(4096);
        let cube: Cube = Cube::new(8, &mut arena, 4).unwrap();

        for i in 0..4 {
            assert_eq!(cube.face(&arena, i).unwrap().len(), 64);
        }

        cube.face_mut(&mut arena, 2)
            .unwrap()
            .iter_mut()
            .enumerate()
            .for_each(|(i, v)| *v = i as f32 + 1.0);

        for i in [0, 1, 3] {
            assert!(cube.face(&arena, i).unwrap().iter().all(|&v| v == 0.0));
        }
        assert_eq!(cube.face(&arena, 2).unwrap()[63], 64.0);
    }

    #[test]
    fn test_face_offsets_contiguous() {
        let mut arena = Arena::new(4096);
        let _first: Cube = Cube::new(4, &mut arena, 2).unwrap();
        let cube: Cube = Cube::new(4, &mut arena, 3).unwrap();
        assert_eq!(cube.face_offset(0), 128);
        assert_eq!(cube.face_offset(1), 128 + 64);
        assert_eq!(cube.face_offset(2), 128 + 128);
    }

    #[test]
    fn test_missing_engine_is_noop() {
        let mut arena = Arena::new(1024);
        let mut cube: Cube = Cube::new(4, &mut arena, 3).unwrap();
        cube.fill_channel(&mut arena, 1, 2.0).unwrap();
        assert!(cube.compute(&mut arena).is_ok());
        assert!(cube.face(&arena, 1).unwrap().iter().all(|&v| v == 2.0));
    }

    #[test]
    fn test_insufficient_channels() {
        let mut arena = Arena::new(4096);
        let mut cube = Cube::new(4, &mut arena, 3)
            .unwrap()
            .with_engine(AnyEngine::from(HeatmapEngine::new(2, 1.0)));

        match cube.compute(&mut arena) {
            Err(TriadeError::InsufficientChannels {
                required, actual, ..
            }) => {
                assert_eq!(required, 5);
                assert_eq!(actual, 3);
            }
            other => panic!("expected InsufficientChannels, got {:?}", other),
        }
    }

    #[test]
    fn test_channel_out_of_range() {
        let mut arena = Arena::new(1024);
        let cube: Cube<EcosystemEngine> = Cube::new(4, &mut arena, 3).unwrap();
        assert!(matches!(
            cube.clear_channel(&mut arena, 3),
            Err(TriadeError::ChannelOutOfRange {
                index: 3,
                channels: 3
            })
        ));
    }

    #[test]
    fn test_compute_runs_engine_on_own_faces() {
        let mut arena = Arena::new(4096);
        let _before: Cube = Cube::new(4, &mut arena, 3).unwrap();
        let mut cube = Cube::new(5, &mut arena, 3)
            .unwrap()
            .with_engine(EcosystemEngine::new());
        cube.face_mut(&mut arena, ECOSYSTEM_STATE).unwrap()[2 * 5 + 2] = PLANT;

        cube.compute(&mut arena).unwrap();

        let state = cube.face(&arena, ECOSYSTEM_STATE).unwrap();
        assert_eq!(state[5 + 1], PLANT);
        assert_eq!(state[3 * 5 + 3], PLANT);
        assert_eq!(state[0], 0.0);
        // The neighbouring cube's memory is untouched.
        assert!(arena.slice(0, 4 * 4 * 3).iter().all(|&v| v == 0.0));
    }

    #[test]
    fn test_zero_size_is_rejected() {
        let mut arena = Arena::new(1024);
        let result: Result<Cube> = Cube::new(0, &mut arena, 3);
        assert!(matches!(result, Err(TriadeError::InvalidGrid { .. })));
        assert_eq!(arena.used_bytes(), 0);
    }
}
