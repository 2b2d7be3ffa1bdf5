//! The coordinator's query result.

use crate::timing::TimingInfo;

/// Result of a `search` or `scan_partitions` call.
///
/// `ids` and `distances` are both `N x k`, row-major: row `q` holds the
/// top-k for query `q`, best first. Unfilled ranks carry `id == -1` and
/// the metric's sentinel distance.
#[derive(Clone, Debug, PartialEq)]
pub struct SearchResult {
    pub num_queries: usize,
    pub k: usize,
    pub ids: Vec<i64>,
    pub distances: Vec<f32>,
    pub timing_info: TimingInfo,
}

impl SearchResult {
    pub fn empty(k: usize) -> Self {
        Self {
            num_queries: 0,
            k,
            ids: Vec::new(),
            distances: Vec::new(),
            timing_info: TimingInfo::default(),
        }
    }

    /// Ids of query `q`'s top-k, best first.
    pub fn ids_row(&self, q: usize) -> &[i64] {
        &self.ids[q * self.k..(q + 1) * self.k]
    }

    /// Distances of query `q`'s top-k, best first.
    pub fn distances_row(&self, q: usize) -> &[f32] {
        &self.distances[q * self.k..(q + 1) * self.k]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_result_has_no_rows() {
        let r = SearchResult::empty(5);
        assert_eq!(r.num_queries, 0);
        assert!(r.ids.is_empty());
    }

    #[test]
    fn rows_index_into_the_flat_tensors() {
        let r = SearchResult {
            num_queries: 2,
            k: 2,
            ids: vec![1, 2, 3, 4],
            distances: vec![0.1, 0.2, 0.3, 0.4],
            timing_info: TimingInfo::default(),
        };
        assert_eq!(r.ids_row(1), &[3, 4]);
        assert_eq!(r.distances_row(0), &[0.1, 0.2]);
    }
}
