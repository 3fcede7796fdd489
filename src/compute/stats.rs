/// Summary statistics over one face, for monitoring.
#[derive(Debug, Clone, serde::Serialize, serde::Deserialize)]
pub struct FaceStats {
    pub total: f32,
    pub max_value: f32,
    pub min_value: f32,
    pub mean_value: f32,
    pub active_cells: usize,
}

impl FaceStats {
    /// Compute statistics from a raster. Cells with `|v| > 1e-6` count as active.
    pub fn from_face(face: &[f32]) -> Self {
        let mut total = 0.0f32;
        let mut max_value = f32::NEG_INFINITY;
        let mut min_value = f32::INFINITY;
        let mut active_cells = 0usize;

        for &v in face {
            total += v;
            max_value = max_value.max(v);
            min_value = min_value.min(v);
            if v.abs() > 1e-6 {
                active_cells += 1;
            }
        }

        let mean_value = if face.is_empty() {
            0.0
        } else {
            total / face.len() as f32
        };

        Self {
            total,
            max_value,
            min_value,
            mean_value,
            active_cells,
        }
    }

    /// Count of cells exactly equal to `state` (automaton populations).
    pub fn count_state(face: &[f32], state: f32) -> usize {
        face.iter().filter(|&&v| v == state).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_face_stats() {
        let stats = FaceStats::from_face(&[0.0, -1.0, 2.0, 3.0]);
        assert_eq!(stats.total, 4.0);
        assert_eq!(stats.min_value, -1.0);
        assert_eq!(stats.max_value, 3.0);
        assert_eq!(stats.mean_value, 1.0);
        assert_eq!(stats.active_cells, 3);
        assert_eq!(FaceStats::count_state(&[2.0, 3.0, 2.0], 2.0), 2);
    }
}
