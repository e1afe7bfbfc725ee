use argminmax::ArgMinMax;

/// A closed price interval split into `n_chunks` equal-width chunks.
#[derive(serde::Deserialize, serde::Serialize, Default, Debug, Clone, PartialEq)]
pub struct RangeF64 {
    pub start_range: f64,
    pub end_range: f64,
    pub n_chunks: usize,
}

impl RangeF64 {
    pub fn new(start_range: f64, end_range: f64, n_chunks: usize) -> Self {
        debug_assert!(n_chunks > 0, "RangeF64 needs at least one chunk");
        Self {
            start_range,
            end_range,
            n_chunks: n_chunks.max(1),
        }
    }

    #[inline]
    pub fn n_chunks(&self) -> usize {
        self.n_chunks
    }

    pub fn range_length(&self) -> f64 {
        self.end_range - self.start_range
    }

    pub fn chunk_size(&self) -> f64 {
        self.range_length() / (self.n_chunks as f64)
    }

    /// Floor-division index of `value`. The top edge (and float noise around it)
    /// lands in the last chunk; a degenerate zero-width range maps everything to 0.
    pub fn chunk_index(&self, value: f64) -> usize {
        let size = self.chunk_size();
        if size <= 0.0 || !size.is_finite() {
            return 0;
        }
        let index = ((value - self.start_range) / size).floor();
        if index <= 0.0 {
            return 0;
        }
        (index as usize).min(self.n_chunks - 1)
    }

    pub fn chunk_bounds(&self, chunk_index: usize) -> (f64, f64) {
        debug_assert!(chunk_index < self.n_chunks);
        let lower_bound = self.start_range + chunk_index as f64 * self.chunk_size();
        let upper_bound = self.start_range + (chunk_index + 1) as f64 * self.chunk_size();
        (lower_bound, upper_bound)
    }
}

pub fn get_max(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }
    let max_index: usize = vec.argmax();
    Some(vec[max_index])
}

pub fn get_min(vec: &[f64]) -> Option<f64> {
    if vec.is_empty() {
        return None;
    }
    let min_index: usize = vec.argmin();
    Some(vec[min_index])
}

/// Index of the largest value. Ties go to the lowest index.
pub fn first_argmax(vec: &[f64]) -> Option<usize> {
    let mut best: Option<(usize, f64)> = None;
    for (i, &v) in vec.iter().enumerate() {
        match best {
            Some((_, b)) if v <= b => {}
            _ => best = Some((i, v)),
        }
    }
    best.map(|(i, _)| i)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_index_clamps_top_edge_into_last_chunk() {
        let range = RangeF64::new(100.0, 140.0, 40);
        assert_eq!(range.chunk_index(100.0), 0);
        assert_eq!(range.chunk_index(100.99), 0);
        assert_eq!(range.chunk_index(101.0), 1);
        assert_eq!(range.chunk_index(140.0), 39);
    }

    #[test]
    fn degenerate_range_maps_to_first_chunk() {
        let range = RangeF64::new(50.0, 50.0, 40);
        assert_eq!(range.chunk_index(50.0), 0);
    }

    #[test]
    fn chunk_bounds_tile_the_range() {
        let range = RangeF64::new(0.0, 10.0, 4);
        assert_eq!(range.chunk_bounds(0), (0.0, 2.5));
        assert_eq!(range.chunk_bounds(3), (7.5, 10.0));
    }

    #[test]
    fn first_argmax_prefers_lowest_index_on_tie() {
        assert_eq!(first_argmax(&[1.0, 5.0, 3.0, 5.0]), Some(1));
        assert_eq!(first_argmax(&[]), None);
    }

    #[test]
    fn min_max_helpers() {
        let v = [3.0, 1.5, 9.25];
        assert_eq!(get_min(&v), Some(1.5));
        assert_eq!(get_max(&v), Some(9.25));
        assert_eq!(get_max(&[]), None);
    }
}
