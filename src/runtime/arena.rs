//! Arena - one contiguous memory region shared by every cube of a session.
//!
//! Allocation is append-only: a cursor moves forward and nothing is ever freed
//! or compacted. Cube counts and sizes are fixed at startup, so fragmentation
//! cannot occur.

use crate::error::{Result, TriadeError};

/// Size of one channel element in bytes.
pub const BYTES_PER_FLOAT: usize = std::mem::size_of::<f32>();

const BYTES_PER_MEGABYTE: usize = 1024 * 1024;

/// Fixed-capacity float arena addressed by byte offsets.
pub struct Arena {
    /// Backing storage, `capacity / 4` floats.
    data: Vec<f32>,
    /// Capacity in bytes (always a multiple of 4).
    capacity: usize,
    /// Allocation cursor in bytes.
    cursor: usize,
}

impl Arena {
    /// Create an arena with `capacity` bytes, rounded down to whole floats.
    pub fn new(capacity: usize) -> Self {
        let floats = capacity / BYTES_PER_FLOAT;
        Self {
            data: vec![0.0f32; floats],
            capacity: floats * BYTES_PER_FLOAT,
            cursor: 0,
        }
    }

    /// Create an arena sized in megabytes.
    pub fn with_megabytes(megabytes: usize) -> Self {
        Self::new(megabytes.saturating_mul(BYTES_PER_MEGABYTE))
    }

    /// Reserve `size_in_floats * channel_count` floats and return the byte offset.
    ///
    /// On failure the cursor is left untouched.
    pub fn allocate(&mut self, size_in_floats: usize, channel_count: usize) -> Result<usize> {
        let available = self.remaining_bytes();
        let requested = size_in_floats
            .checked_mul(channel_count)
            .and_then(|floats| floats.checked_mul(BYTES_PER_FLOAT))
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

        let offset = self.cursor;
        self.cursor += requested;
        log::debug!(
            "arena: allocated {} bytes at offset {} ({} / {} used)",
            requested,
            offset,
            self.cursor,
            self.capacity
        );
        Ok(offset)
    }

    /// Capacity in bytes.
    #[inline]
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Bytes handed out so far.
    #[inline]
    pub fn used_bytes(&self) -> usize {
        self.cursor
    }

    /// Bytes still available.
    #[inline]
    pub fn remaining_bytes(&self) -> usize {
        self.capacity - self.cursor
    }

    /// Memory consumed, in megabytes.
    pub fn used_megabytes(&self) -> f64 {
        self.cursor as f64 / BYTES_PER_MEGABYTE as f64
    }

    /// Float window starting at byte `offset`.
    #[inline]
    pub fn slice(&self, offset: usize, floats: usize) -> &[f32] {
        let start = offset / BYTES_PER_FLOAT;
        &self.data[start..start + floats]
    }

    /// Mutable float window starting at byte `offset`.
    #[inline]
    pub fn slice_mut(&mut self, offset: usize, floats: usize) -> &mut [f32] {
        let start = offset / BYTES_PER_FLOAT;
        &mut self.data[start..start + floats]
    }

    /// Whole arena as floats, for index arithmetic across cube boundaries.
    #[inline]
    pub(crate) fn floats_mut(&mut self) -> &mut [f32] {
        &mut self.data
    }

    /// Raw byte view of the arena (for texture uploads by renderers).
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.data)
    }
}

impl std::fmt::Debug for Arena {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Arena")
            .field("capacity", &self.capacity)
            .field("cursor", &self.cursor)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_allocate_advances_cursor() {
        let mut arena = Arena::new(1024);
        let a = arena.allocate(16, 2).unwrap();
        let b = arena.allocate(16, 1).unwrap();
        assert_eq!(a, 0);
        assert_eq!(b, 128);
        assert_eq!(arena.used_bytes(), 192);
        assert_eq!(arena.remaining_bytes(), 1024 - 192);
    }

    #[test]
    fn test_out_of_memory_leaves_cursor() {
        let mut arena = Arena::new(256);
        arena.allocate(32, 1).unwrap();
        let before = arena.used_bytes();

        let err = arena.allocate(64, 1).unwrap_err();
        assert!(matches!(
            err,
            TriadeError::OutOfMemory {
                requested: 256,
                available: 128
            }
        ));
        assert_eq!(arena.used_bytes(), before);
    }

    #[test]
    fn test_exact_fit() {
        let mut arena = Arena::new(64);
        assert!(arena.allocate(4, 4).is_ok());
        assert_eq!(arena.remaining_bytes(), 0);
        assert!(arena.allocate(1, 1).is_err());
    }

    #[test]
    fn test_overflowing_request_is_oom() {
        let mut arena = Arena::new(64);
        let err = arena.allocate(usize::MAX, 2).unwrap_err();
        assert!(matches!(err, TriadeError::OutOfMemory { .. }));
        assert_eq!(arena.used_bytes(), 0);
    }

    #[test]
    fn test_megabytes_and_bytes_view() {
        let arena = Arena::with_megabytes(1);
        assert_eq!(arena.capacity(), 1024 * 1024);
        assert_eq!(arena.as_bytes().len(), 1024 * 1024);
        assert_eq!(arena.used_megabytes(), 0.0);
    }

    proptest! {
        #[test]
        fn prop_allocations_never_exceed_capacity(
            capacity in 0usize..8192,
            sizes in proptest::collection::vec((1usize..64, 1usize..8), 1..24)
        ) {
            let mut arena = Arena::new(capacity);
            for (floats, channels) in sizes {
                let before = arena.used_bytes();
                match arena.allocate(floats, channels) {
                    Ok(offset) => {
                        prop_assert_eq!(offset, before);
                        prop_assert_eq!(arena.used_bytes(), before + floats * channels * 4);
                    }
                    Err(TriadeError::OutOfMemory { .. }) => {
                        prop_assert!(before + floats * channels * 4 > arena.capacity());
                        prop_assert_eq!(arena.used_bytes(), before);
                    }
                    Err(other) => prop_assert!(false, "unexpected error: {}", other),
                }
                prop_assert!(arena.used_bytes() <= arena.capacity());
            }
        }
    }
}
