//! The scan engine: per-partition distance computation against queries.

use std::collections::HashMap;

use crate::error::Error;
use crate::metric::Metric;
use crate::partition::{Partition, PartitionManager};
use crate::topk::{Candidate, TopKBuffer};

/// Vector ids allowed to survive pre-filtering, built once per `search`
/// call over the union of every candidate partition touched.
pub type PreFilterMask = HashMap<i64, bool>;

/// Scans an already-fetched partition for one query, pushing every
/// surviving candidate into `buffer`. Consults `mask`, when given,
/// before computing a distance, so masked-out vectors never reach the
/// metric kernel.
pub(crate) fn scan_fetched_partition(
    query: &[f32],
    metric: Metric,
    partition: &Partition,
    mask: Option<&PreFilterMask>,
    buffer: &mut TopKBuffer,
) {
    let mut scratch = vec![0.0f32; partition.vector_size()];
    for i in 0..partition.len() {
        let id = partition.get_id(i);
        if let Some(mask) = mask {
            if !*mask.get(&id).unwrap_or(&false) {
                continue;
            }
        }
        let v = partition.get_vector(i);
        let distance = metric.distance(query, v, &mut scratch);
        buffer.push(Candidate { distance, id });
    }
}

/// Fetches `partition_id` and scans it for one query. A negative
/// `partition_id` ("no more partitions") is a no-op, tolerated so the
/// caller can pass ragged selector output padded with `-1`.
pub(crate) fn scan_partition_for_query(
    query: &[f32],
    metric: Metric,
    partition_manager: &dyn PartitionManager,
    partition_id: i64,
    mask: Option<&PreFilterMask>,
    buffer: &mut TopKBuffer,
) -> Result<(), Error> {
    if partition_id < 0 {
        return Ok(());
    }
    let partition = partition_manager.get_partition(partition_id)?;
    scan_fetched_partition(query, metric, partition, mask, buffer);
    Ok(())
}

/// Groups an `N x P` candidate-partition matrix by partition id,
/// preserving first-seen order. Feeds the batched scan mode, which
/// fetches each partition once and reuses it across every query
/// assigned to it.
pub(crate) fn group_by_partition(partition_ids: &[Vec<i64>]) -> Vec<(i64, Vec<usize>)> {
    let mut groups: Vec<(i64, Vec<usize>)> = Vec::new();
    let mut index_of: HashMap<i64, usize> = HashMap::new();
    for (qi, row) in partition_ids.iter().enumerate() {
        for &pid in row {
            if pid < 0 {
                continue;
            }
            let gi = *index_of.entry(pid).or_insert_with(|| {
                groups.push((pid, Vec::new()));
                groups.len() - 1
            });
            groups[gi].1.push(qi);
        }
    }
    groups
}

/// Flattens an `N x P` candidate-partition matrix into `(query,
/// partition)` pairs in selector order. Feeds the serial scan mode,
/// which revisits the partition store once per pair.
pub(crate) fn flatten_pairs(partition_ids: &[Vec<i64>]) -> Vec<(usize, i64)> {
    let mut pairs = Vec::new();
    for (qi, row) in partition_ids.iter().enumerate() {
        for &pid in row {
            pairs.push((qi, pid));
        }
    }
    pairs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::InMemoryPartitionManager;

    fn two_partitions() -> InMemoryPartitionManager {
        let mut mgr = InMemoryPartitionManager::new();
        mgr.insert(1, Partition::new(2, vec![10, 11], vec![0.0, 0.0, 1.0, 1.0]).unwrap());
        mgr.insert(2, Partition::new(2, vec![20], vec![2.0, 2.0]).unwrap());
        mgr
    }

    #[test]
    fn scan_partition_for_query_skips_negative_partition_ids() {
        let mgr = two_partitions();
        let mut buf = TopKBuffer::new(Metric::L2, 3);
        scan_partition_for_query(&[0.0, 0.0], Metric::L2, &mgr, -1, None, &mut buf).unwrap();
        assert_eq!(buf.len(), 0);
    }

    #[test]
    fn scan_partition_for_query_fills_the_buffer() {
        let mgr = two_partitions();
        let mut buf = TopKBuffer::new(Metric::L2, 3);
        scan_partition_for_query(&[0.0, 0.0], Metric::L2, &mgr, 1, None, &mut buf).unwrap();
        assert_eq!(buf.len(), 2);
    }

    #[test]
    fn pre_filter_mask_excludes_vectors_before_distance_is_computed() {
        let mgr = two_partitions();
        let mut mask = PreFilterMask::new();
        mask.insert(10, false);
        mask.insert(11, true);
        let mut buf = TopKBuffer::new(Metric::L2, 3);
        scan_partition_for_query(&[0.0, 0.0], Metric::L2, &mgr, 1, Some(&mask), &mut buf).unwrap();
        let ids: Vec<i64> = buf
            .into_sorted_with_sentinels()
            .into_iter()
            .filter(|c| c.id >= 0)
            .map(|c| c.id)
            .collect();
        assert_eq!(ids, vec![11]);
    }

    #[test]
    fn group_by_partition_collects_queries_sharing_a_partition() {
        let rows = vec![vec![1, 2], vec![1, -1]];
        let groups = group_by_partition(&rows);
        assert_eq!(groups[0], (1, vec![0, 1]));
        assert_eq!(groups[1], (2, vec![0]));
    }

    #[test]
    fn flatten_pairs_preserves_selector_order() {
        let rows = vec![vec![1, 2], vec![3]];
        let pairs = flatten_pairs(&rows);
        assert_eq!(pairs, vec![(0, 1), (0, 2), (1, 3)]);
    }
}
