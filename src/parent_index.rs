//! The parent index collaborator: partition (centroid) selection.

use crate::error::Error;
use crate::metric::Metric;
use crate::vector::{BlockVectorSet, VectorSet};

/// An ANN index over partition centroids, supplied by index
/// construction (out of scope here). The coordinator only ever calls
/// [`ParentIndex::search`].
pub trait ParentIndex {
    /// Vector size this index was built over.
    fn vector_size(&self) -> usize;

    /// Number of centroids (partitions) indexed.
    fn num_partitions(&self) -> usize;

    /// Finds the `k` partitions closest to each query. Each returned row
    /// has exactly `k` entries in ascending-distance (best-first) order;
    /// `-1` pads a row once `k` exceeds [`ParentIndex::num_partitions`].
    fn search(&self, queries: &BlockVectorSet<f32>, k: usize) -> Result<Vec<Vec<i64>>, Error>;
}

/// Brute-force [`ParentIndex`] over an in-memory set of centroids.
///
/// Ranks every centroid against every query rather than pruning with a
/// coarser structure; adequate for small centroid counts and as the
/// reference implementation the worker pool and dispatcher are tested
/// against.
pub struct ExhaustiveParentIndex {
    metric: Metric,
    partition_ids: Vec<i64>,
    centroids: BlockVectorSet<f32>,
}

impl ExhaustiveParentIndex {
    /// Fails if `partition_ids.len() != centroids.len()`.
    pub fn new(
        metric: Metric,
        partition_ids: Vec<i64>,
        centroids: BlockVectorSet<f32>,
    ) -> Result<Self, Error> {
        if partition_ids.len() != centroids.len() {
            return Err(Error::InvalidInput(format!(
                "partition_ids.len() {} and centroids.len() {} do not match",
                partition_ids.len(),
                centroids.len(),
            )));
        }
        Ok(Self {
            metric,
            partition_ids,
            centroids,
        })
    }
}

impl ParentIndex for ExhaustiveParentIndex {
    fn vector_size(&self) -> usize {
        self.centroids.vector_size()
    }

    fn num_partitions(&self) -> usize {
        self.centroids.len()
    }

    fn search(&self, queries: &BlockVectorSet<f32>, k: usize) -> Result<Vec<Vec<i64>>, Error> {
        if queries.vector_size() != self.vector_size() {
            return Err(Error::InvalidInput(format!(
                "query vector size {} does not match index vector size {}",
                queries.vector_size(),
                self.vector_size(),
            )));
        }
        let mut buf = vec![0.0f32; self.vector_size()];
        let mut rows = Vec::with_capacity(queries.len());
        for qi in 0..queries.len() {
            let q = queries.get(qi);
            let mut ranked: Vec<(f32, i64)> = Vec::with_capacity(self.num_partitions());
            for pi in 0..self.num_partitions() {
                let centroid = self.centroids.get(pi);
                let d = self.metric.distance(q, centroid, &mut buf);
                ranked.push((d, self.partition_ids[pi]));
            }
            ranked.sort_by(|a, b| self.metric.cmp_candidates(*a, *b));
            ranked.truncate(k);
            let mut row: Vec<i64> = ranked.into_iter().map(|(_, pid)| pid).collect();
            row.resize(k, -1);
            rows.push(row);
        }
        Ok(rows)
    }
}
