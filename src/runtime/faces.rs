//! Faces - channel views over one cube's arena slice.
//!
//! A cube's channels are laid out contiguously in channel order, so face `i`
//! starts at float `i * size * size` of the slice. Engines either borrow single
//! faces or index the whole slice directly with `face_base(i) + y * size + x`.

use std::ops::Range;

/// Mutable view over all channels of one cube.
pub struct Faces<'a> {
    data: &'a mut [f32],
    size: usize,
    count: usize,
}

impl<'a> Faces<'a> {
    /// Wrap a cube slice holding `count` faces of `size * size` floats.
    pub fn new(data: &'a mut [f32], size: usize, count: usize) -> Self {
        debug_assert_eq!(data.len(), size * size * count);
        Self { data, size, count }
    }

    /// Edge length N of every face.
    #[inline]
    pub fn size(&self) -> usize {
        self.size
    }

    /// Number of faces.
    #[inline]
    pub fn count(&self) -> usize {
        self.count
    }

    /// Floats per face (N * N).
    #[inline]
    pub fn area(&self) -> usize {
        self.size * self.size
    }

    /// Float offset of face `index` within [`Faces::raw`].
    #[inline]
    pub fn face_base(&self, index: usize) -> usize {
        index * self.area()
    }

    #[inline]
    fn range(&self, index: usize) -> Range<usize> {
        let base = self.face_base(index);
        base..base + self.area()
    }

    /// Read-only face.
    #[inline]
    pub fn face(&self, index: usize) -> &[f32] {
        &self.data[self.range(index)]
    }

    /// Writable face.
    #[inline]
    pub fn face_mut(&mut self, index: usize) -> &mut [f32] {
        let range = self.range(index);
        &mut self.data[range]
    }

    /// Borrow one face for reading and a different face for writing.
    ///
    /// # Panics
    /// Panics if `read == write`.
    pub fn pair_mut(&mut self, read: usize, write: usize) -> (&[f32], &mut [f32]) {
        assert_ne!(read, write, "pair_mut needs two distinct faces");
        let area = self.area();
        if read < write {
            let (lo, hi) = self.data.split_at_mut(write * area);
            (&lo[read * area..(read + 1) * area], &mut hi[..area])
        } else {
            let (lo, hi) = self.data.split_at_mut(read * area);
            (&hi[..area], &mut lo[write * area..(write + 1) * area])
        }
    }

    /// Copy face `src` over face `dst`.
    #[inline]
    pub fn copy_face(&mut self, src: usize, dst: usize) {
        if src != dst {
            let range = self.range(src);
            let dst_start = self.face_base(dst);
            self.data.copy_within(range, dst_start);
        }
    }

    /// Fill one face with a constant.
    #[inline]
    pub fn fill(&mut self, index: usize, value: f32) {
        self.face_mut(index).fill(value);
    }

    /// Every face as one flat slice.
    #[inline]
    pub fn raw(&self) -> &[f32] {
        &*self.data
    }

    /// Every face as one flat mutable slice.
    #[inline]
    pub fn raw_mut(&mut self) -> &mut [f32] {
        &mut *self.data
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_ranges_are_disjoint() {
        let mut data = vec![0.0f32; 4 * 4 * 3];
        let mut faces = Faces::new(&mut data, 4, 3);

        faces.fill(1, 7.0);
        assert!(faces.face(0).iter().all(|&v| v == 0.0));
        assert!(faces.face(1).iter().all(|&v| v == 7.0));
        assert!(faces.face(2).iter().all(|&v| v == 0.0));
        assert_eq!(faces.face(2).len(), 16);
    }

    #[test]
    fn test_pair_mut_both_orders() {
        let mut data = vec![0.0f32; 2 * 2 * 3];
        let mut faces = Faces::new(&mut data, 2, 3);
        faces.fill(0, 1.0);
        faces.fill(2, 3.0);

        let (src, dst) = faces.pair_mut(0, 2);
        dst.copy_from_slice(src);
        assert!(faces.face(2).iter().all(|&v| v == 1.0));

        faces.fill(2, 5.0);
        let (src, dst) = faces.pair_mut(2, 1);
        dst.copy_from_slice(src);
        assert!(faces.face(1).iter().all(|&v| v == 5.0));
    }

    #[test]
    fn test_copy_face() {
        let mut data = vec![0.0f32; 3 * 3 * 2];
        let mut faces = Faces::new(&mut data, 3, 2);
        faces.face_mut(1)[4] = 9.0;
        faces.copy_face(1, 0);
        assert_eq!(faces.face(0)[4], 9.0);
        assert_eq!(faces.face_base(1), 9);
    }
}
