//! Box-filter heatmap via a summed-area table.
//!
//! Every output cell is the weighted sum of the input over its Chebyshev
//! window of half-width `radius`, clipped to the face. The table makes the
//! cost per cell independent of the radius.

#[cfg(not(target_arch = "wasm32"))]
use rayon::prelude::*;

use crate::runtime::Faces;
use crate::schema::HeatmapConfig;

use super::Engine;

/// Input layer.
pub const HEATMAP_INPUT: usize = 1;
/// Filtered output.
pub const HEATMAP_OUTPUT: usize = 2;
/// Summed-area table.
pub const HEATMAP_SAT: usize = 4;

#[derive(Debug, Clone)]
pub struct HeatmapEngine {
    pub radius: usize,
    pub weight: f32,
}

impl HeatmapEngine {
    pub fn new(radius: usize, weight: f32) -> Self {
        Self { radius, weight }
    }

    pub fn from_config(config: &HeatmapConfig) -> Self {
        Self::new(config.radius, config.weight)
    }
}

impl Default for HeatmapEngine {
    fn default() -> Self {
        Self::from_config(&HeatmapConfig::default())
    }
}

impl Engine for HeatmapEngine {
    fn name(&self) -> &str {
        "Heatmap"
    }

    fn required_channels(&self) -> usize {
        5
    }

    fn compute(&mut self, faces: &mut Faces<'_>) {
        let n = faces.size();

        {
            let (input, sat) = faces.pair_mut(HEATMAP_INPUT, HEATMAP_SAT);
            build_sat(input, sat, n);
        }

        let radius = self.radius;
        let weight = self.weight;
        let (sat, output) = faces.pair_mut(HEATMAP_SAT, HEATMAP_OUTPUT);

        #[cfg(not(target_arch = "wasm32"))]
        output
            .par_chunks_mut(n)
            .enumerate()
            .for_each(|(y, row)| window_row(sat, n, radius, weight, y, row));

        #[cfg(target_arch = "wasm32")]
        output
            .chunks_mut(n)
            .enumerate()
            .for_each(|(y, row)| window_row(sat, n, radius, weight, y, row));
    }
}

/// Inclusive prefix sums: `sat[y][x] = sum of input[0..=y][0..=x]`.
pub fn build_sat(input: &[f32], sat: &mut [f32], n: usize) {
    for y in 0..n {
        let mut row_sum = 0.0f32;
        for x in 0..n {
            let idx = y * n + x;
            row_sum += input[idx];
            let top = if y > 0 { sat[idx - n] } else { 0.0 };
            sat[idx] = row_sum + top;
        }
    }
}

fn window_row(sat: &[f32], n: usize, radius: usize, weight: f32, y: usize, row: &mut [f32]) {
    let min_y = y.saturating_sub(radius);
    let max_y = y.saturating_add(radius).min(n - 1);

    for (x, out) in row.iter_mut().enumerate() {
        let min_x = x.saturating_sub(radius);
        let max_x = x.saturating_add(radius).min(n - 1);

        let a = if min_x > 0 && min_y > 0 {
            sat[(min_y - 1) * n + min_x - 1]
        } else {
            0.0
        };
        let b = if min_y > 0 { sat[(min_y - 1) * n + max_x] } else { 0.0 };
        let c = if min_x > 0 { sat[max_y * n + min_x - 1] } else { 0.0 };
        let d = sat[max_y * n + max_x];

        *out = (d - b - c + a) * weight;
    }
}

/// Blend several equally sized layers into `out` as a weighted sum.
///
/// Negative results are clamped to zero and the map is normalised by its
/// maximum. Returns the pre-normalisation maximum (0 leaves `out` all zero).
pub fn composite_layers(layers: &[(&[f32], f32)], out: &mut [f32]) -> f32 {
    out.fill(0.0);
    for &(layer, weight) in layers {
        for (o, &v) in out.iter_mut().zip(layer) {
            *o += v * weight;
        }
    }

    let mut max = 0.0f32;
    for o in out.iter_mut() {
        *o = o.max(0.0);
        max = max.max(*o);
    }

    if max > 0.0 {
        for o in out.iter_mut() {
            *o /= max;
        }
    }
    max
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn run(engine: &mut HeatmapEngine, input: &[f32], n: usize) -> Vec<f32> {
        let mut data = vec![0.0f32; n * n * 5];
        data[n * n..2 * n * n].copy_from_slice(input);
        let mut faces = Faces::new(&mut data, n, 5);
        engine.compute(&mut faces);
        faces.face(HEATMAP_OUTPUT).to_vec()
    }

    fn brute_force(input: &[f32], n: usize, radius: usize, weight: f32) -> Vec<f32> {
        let mut out = vec![0.0f32; n * n];
        for y in 0..n {
            for x in 0..n {
                let mut sum = 0.0;
                for yy in y.saturating_sub(radius)..=(y + radius).min(n - 1) {
                    for xx in x.saturating_sub(radius)..=(x + radius).min(n - 1) {
                        sum += input[yy * n + xx];
                    }
                }
                out[y * n + x] = sum * weight;
            }
        }
        out
    }

    #[test]
    fn test_huge_radius_covers_whole_face() {
        let n = 4;
        let input = vec![1.0f32; n * n];
        let out = run(&mut HeatmapEngine::new(usize::MAX, 1.0), &input, n);
        assert!(out.iter().all(|&v| v == 16.0), "{:?}", out);
    }

    #[test]
    fn test_single_source_spreads_to_window() {
        let n = 9;
        let mut input = vec![0.0f32; n * n];
        input[4 * n + 4] = 1.0;

        let out = run(&mut HeatmapEngine::new(2, 3.0), &input, n);
        for y in 0..n {
            for x in 0..n {
                let inside = x.abs_diff(4) <= 2 && y.abs_diff(4) <= 2;
                let expected = if inside { 3.0 } else { 0.0 };
                assert_eq!(out[y * n + x], expected, "({}, {})", x, y);
            }
        }
    }

    #[test]
    fn test_corner_window_is_clipped() {
        let n = 6;
        let input = vec![1.0f32; n * n];
        let out = run(&mut HeatmapEngine::new(1, 1.0), &input, n);
        assert_eq!(out[0], 4.0);
        assert_eq!(out[n + 1], 9.0);
        assert_eq!(out[n * n - 1], 4.0);
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let n = 4;
        let input: Vec<f32> = (0..n * n).map(|i| i as f32).collect();
        let out = run(&mut HeatmapEngine::new(0, 1.0), &input, n);
        assert_eq!(out, input);
    }

    #[test]
    fn test_composite_normalises() {
        let a = [1.0f32, 2.0, 0.0, 0.0];
        let b = [0.0f32, 0.0, 4.0, 1.0];
        let mut out = [0.0f32; 4];
        let max = composite_layers(&[(&a, 1.0), (&b, -0.5)], &mut out);
        assert_eq!(max, 2.0);
        assert_eq!(out, [0.5, 1.0, 0.0, 0.0]);
    }

    proptest! {
        #[test]
        fn prop_matches_brute_force(
            n in 3usize..12,
            radius in 0usize..6,
            cells in prop::collection::vec(0u8..4, 144),
        ) {
            let input: Vec<f32> = cells[..n * n].iter().map(|&c| c as f32).collect();
            let out = run(&mut HeatmapEngine::new(radius, 1.0), &input, n);
            let expected = brute_force(&input, n, radius, 1.0);
            // Small integer inputs keep every partial sum exact in f32.
            prop_assert_eq!(out, expected);
        }
    }
}
