//! Partitions and the partition manager collaborator.

use std::collections::HashMap;

use crate::error::Error;

/// A bucket of `(id, vector)` pairs produced by index construction (out
/// of scope here). Vectors are stored row-major, dense, uncompressed.
#[derive(Clone, Debug)]
pub struct Partition {
    vector_size: usize,
    ids: Vec<i64>,
    vectors: Vec<f32>,
}

impl Partition {
    /// Fails if `vectors.len() != ids.len() * vector_size`.
    pub fn new(vector_size: usize, ids: Vec<i64>, vectors: Vec<f32>) -> Result<Self, Error> {
        if vectors.len() != ids.len() * vector_size {
            return Err(Error::InvalidInput(format!(
                "partition vectors length {} does not match ids.len() {} * vector_size {}",
                vectors.len(),
                ids.len(),
                vector_size,
            )));
        }
        Ok(Self {
            vector_size,
            ids,
            vectors,
        })
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn vector_size(&self) -> usize {
        self.vector_size
    }

    pub fn ids(&self) -> &[i64] {
        &self.ids
    }

    pub fn get_id(&self, i: usize) -> i64 {
        self.ids[i]
    }

    pub fn get_vector(&self, i: usize) -> &[f32] {
        let from = i * self.vector_size;
        &self.vectors[from..from + self.vector_size]
    }
}

/// Read-only collaborator holding the live partitions behind a
/// [`crate::coordinator::Coordinator`].
///
/// Supplied by whatever owns index construction and persistence;
/// neither is this crate's concern.
pub trait PartitionManager {
    /// Ids of all partitions currently live.
    fn list_partitions(&self) -> Vec<i64>;

    /// Vector count of a partition, or `None` if it does not exist.
    fn num_vectors_in(&self, partition_id: i64) -> Option<usize>;

    /// Fetches a partition by id.
    fn get_partition(&self, partition_id: i64) -> Result<&Partition, Error>;
}

/// In-memory [`PartitionManager`] used for tests and as a reference
/// collaborator when nothing else is wired in.
#[derive(Default)]
pub struct InMemoryPartitionManager {
    partitions: HashMap<i64, Partition>,
}

impl InMemoryPartitionManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, partition_id: i64, partition: Partition) {
        self.partitions.insert(partition_id, partition);
    }
}

impl PartitionManager for InMemoryPartitionManager {
    fn list_partitions(&self) -> Vec<i64> {
        let mut ids: Vec<i64> = self.partitions.keys().copied().collect();
        ids.sort_unstable();
        ids
    }

    fn num_vectors_in(&self, partition_id: i64) -> Option<usize> {
        self.partitions.get(&partition_id).map(|p| p.len())
    }

    fn get_partition(&self, partition_id: i64) -> Result<&Partition, Error> {
        self.partitions
            .get(&partition_id)
            .ok_or_else(|| Error::InvalidInput(format!("no such partition: {}", partition_id)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_rejects_mismatched_vector_buffer_length() {
        let err = Partition::new(3, vec![1, 2], vec![0.0; 5]).unwrap_err();
        assert!(matches!(err, Error::InvalidInput(_)));
    }

    #[test]
    fn partition_indexes_rows_by_position() {
        let p = Partition::new(2, vec![10, 20], vec![1.0, 2.0, 3.0, 4.0]).unwrap();
        assert_eq!(p.len(), 2);
        assert_eq!(p.get_id(1), 20);
        assert_eq!(p.get_vector(1), &[3.0, 4.0]);
    }

    #[test]
    fn in_memory_partition_manager_lists_sorted_ids() {
        let mut mgr = InMemoryPartitionManager::new();
        mgr.insert(5, Partition::new(1, vec![1], vec![0.0]).unwrap());
        mgr.insert(1, Partition::new(1, vec![2], vec![0.0]).unwrap());
        assert_eq!(mgr.list_partitions(), vec![1, 5]);
    }

    #[test]
    fn in_memory_partition_manager_reports_missing_partitions() {
        let mgr = InMemoryPartitionManager::new();
        assert!(mgr.num_vectors_in(42).is_none());
        assert!(mgr.get_partition(42).is_err());
    }
}
