//! The dispatcher: the coordinator's external entry point.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use std::time::Instant;

use tracing::debug;

use crate::attributes::AttributeTable;
use crate::error::Error;
use crate::metric::Metric;
use crate::params::{FilteringType, SearchParams};
use crate::parent_index::ParentIndex;
use crate::partition::PartitionManager;
use crate::result::SearchResult;
use crate::scan::{flatten_pairs, group_by_partition, PreFilterMask};
use crate::timing::TimingInfo;
use crate::topk::TopKBuffer;
use crate::vector::{BlockVectorSet, VectorSet};
use crate::worker::{Job, SearchContext, WorkerPool};

/// Partitions inspected per query when [`SearchParams::nprobe`] is unset.
const DEFAULT_NPROBE: usize = 1;

/// Factor applied to `k` when [`FilteringType::Post`] is in effect. The
/// scan keeps `k * OVER_FETCH_FACTOR` survivors per query before the
/// predicate truncates back down to `k` (see `DESIGN.md`).
pub const OVER_FETCH_FACTOR: usize = 4;

/// Milestones reached while a `search` call runs, mirroring the base
/// vector library's query-event callback.
#[derive(Debug)]
pub enum SearchEvent {
    StartingPartitionSelection,
    FinishedPartitionSelection { elapsed_nanos: u64 },
    StartingScan,
    FinishedScan { elapsed_nanos: u64 },
    StartingResultAggregation,
    FinishedResultAggregation { elapsed_nanos: u64 },
}

/// The query coordinator (C1, the Dispatcher).
///
/// Owns no vector data itself: everything about partitions, centroids,
/// and attribute columns is reached through the collaborators handed to
/// [`Coordinator::new`]. A coordinator is cheap to share across threads
/// (`&Coordinator` suffices; `search` takes `&self`) and owns the one
/// piece of mutable state in the crate, the worker pool.
pub struct Coordinator {
    metric: Metric,
    parent_index: Option<Arc<dyn ParentIndex + Send + Sync>>,
    partition_manager: Option<Arc<dyn PartitionManager + Send + Sync>>,
    attribute_table: Option<Arc<dyn AttributeTable + Send + Sync>>,
    pool: Mutex<WorkerPool>,
}

impl Coordinator {
    /// Builds a coordinator. `parent_index` absent means flat (brute
    /// force) mode: every live partition is scanned for every query and
    /// `batched_scan` is forced on regardless of `SearchParams`.
    /// `num_workers == 0` keeps the worker pool uninitialized; every
    /// search then runs inline.
    pub fn new(
        metric: Metric,
        parent_index: Option<Arc<dyn ParentIndex + Send + Sync>>,
        partition_manager: Option<Arc<dyn PartitionManager + Send + Sync>>,
        attribute_table: Option<Arc<dyn AttributeTable + Send + Sync>>,
        num_workers: usize,
    ) -> Self {
        let mut pool = WorkerPool::new();
        if num_workers > 0 {
            pool.initialize(num_workers);
        }
        Self {
            metric,
            parent_index,
            partition_manager,
            attribute_table,
            pool: Mutex::new(pool),
        }
    }

    pub fn workers_initialized(&self) -> bool {
        self.pool.lock().expect("worker pool mutex poisoned").is_initialized()
    }

    /// (Re-)initializes the worker pool with `n` threads. Shuts down any
    /// pool already running first.
    pub fn initialize_workers(&self, n: usize) {
        self.pool
            .lock()
            .expect("worker pool mutex poisoned")
            .initialize(n);
    }

    /// Drains and joins the worker pool. Subsequent searches run inline
    /// until [`Coordinator::initialize_workers`] is called again.
    pub fn shutdown_workers(&self) {
        self.pool
            .lock()
            .expect("worker pool mutex poisoned")
            .shutdown();
    }

    /// Runs `queries` through partition selection, the scan engine, and
    /// top-k merging, honoring `params`.
    pub fn search(
        &self,
        queries: &BlockVectorSet<f32>,
        params: &SearchParams,
    ) -> Result<SearchResult, Error> {
        self.search_with_events(queries, params, None)
    }

    /// As [`Coordinator::search`], additionally reporting milestones to
    /// `on_event` as they are reached.
    pub fn search_with_events(
        &self,
        queries: &BlockVectorSet<f32>,
        params: &SearchParams,
        mut on_event: Option<&mut dyn FnMut(SearchEvent)>,
    ) -> Result<SearchResult, Error> {
        params.validate()?;
        let total_start = Instant::now();
        if queries.len() == 0 {
            return Ok(SearchResult::empty(params.k));
        }
        let partition_manager = self
            .partition_manager
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no partition manager configured".to_string()))?;

        if let Some(f) = on_event.as_deref_mut() {
            f(SearchEvent::StartingPartitionSelection);
        }
        let selection_start = Instant::now();
        let (partition_ids, batched_scan, parent_timing) =
            self.select_partitions(queries, params)?;
        let selection_elapsed = selection_start.elapsed().as_nanos() as u64;
        if let Some(f) = on_event.as_deref_mut() {
            f(SearchEvent::FinishedPartitionSelection {
                elapsed_nanos: selection_elapsed,
            });
        }

        let mask = self.build_pre_filter_mask(partition_manager.as_ref(), params, &partition_ids)?;
        let effective_k = match params.filtering_type {
            FilteringType::Post => params.k.saturating_mul(OVER_FETCH_FACTOR),
            _ => params.k,
        };

        if let Some(f) = on_event.as_deref_mut() {
            f(SearchEvent::StartingScan);
        }
        let scan_start = Instant::now();
        let (mut buffers, scan_timing) = self.scan_and_merge(
            queries,
            partition_manager.as_ref(),
            &partition_ids,
            batched_scan,
            effective_k,
            mask.as_ref(),
        )?;
        let scan_elapsed = scan_start.elapsed().as_nanos() as u64;
        if let Some(f) = on_event.as_deref_mut() {
            f(SearchEvent::FinishedScan {
                elapsed_nanos: scan_elapsed,
            });
        }

        if let Some(f) = on_event.as_deref_mut() {
            f(SearchEvent::StartingResultAggregation);
        }
        let aggregate_start = Instant::now();
        if params.filtering_type == FilteringType::Post {
            buffers = self.apply_post_filter(params, buffers)?;
        }
        let (ids, distances) = flatten_buffers(buffers, params.k, self.metric);
        let aggregate_elapsed = aggregate_start.elapsed().as_nanos() as u64;
        if let Some(f) = on_event.as_deref_mut() {
            f(SearchEvent::FinishedResultAggregation {
                elapsed_nanos: aggregate_elapsed,
            });
        }

        let timing_info = TimingInfo {
            total: total_start.elapsed().as_nanos() as u64,
            partition_selection: selection_elapsed,
            job_enqueue: scan_timing.job_enqueue,
            job_wait: scan_elapsed,
            buffer_init: scan_timing.buffer_init,
            result_aggregation: aggregate_elapsed,
            boundary_distance: scan_timing.boundary_distance,
            parent_info: parent_timing.map(Box::new),
        };
        debug!(
            num_queries = queries.len(),
            k = params.k,
            total_nanos = timing_info.total,
            "search finished"
        );
        Ok(SearchResult {
            num_queries: queries.len(),
            k: params.k,
            ids,
            distances,
            timing_info,
        })
    }

    /// Scans the caller-supplied `partition_ids` directly, bypassing the
    /// parent index. `partition_ids` is `N x P`, ragged rows padded with
    /// `-1` tolerated exactly as selector output is.
    pub fn scan_partitions(
        &self,
        queries: &BlockVectorSet<f32>,
        partition_ids: &[Vec<i64>],
        params: &SearchParams,
    ) -> Result<SearchResult, Error> {
        params.validate()?;
        let total_start = Instant::now();
        if queries.len() == 0 {
            return Ok(SearchResult::empty(params.k));
        }
        if partition_ids.len() != queries.len() {
            return Err(Error::InvalidInput(format!(
                "partition_ids has {} rows but there are {} queries",
                partition_ids.len(),
                queries.len(),
            )));
        }
        let partition_manager = self
            .partition_manager
            .as_ref()
            .ok_or_else(|| Error::InvalidState("no partition manager configured".to_string()))?;

        let mask = self.build_pre_filter_mask(partition_manager.as_ref(), params, partition_ids)?;
        let effective_k = match params.filtering_type {
            FilteringType::Post => params.k.saturating_mul(OVER_FETCH_FACTOR),
            _ => params.k,
        };
        let scan_start = Instant::now();
        let (mut buffers, scan_timing) = self.scan_and_merge(
            queries,
            partition_manager.as_ref(),
            partition_ids,
            params.batched_scan,
            effective_k,
            mask.as_ref(),
        )?;
        let scan_elapsed = scan_start.elapsed().as_nanos() as u64;
        let aggregate_start = Instant::now();
        if params.filtering_type == FilteringType::Post {
            buffers = self.apply_post_filter(params, buffers)?;
        }
        let (ids, distances) = flatten_buffers(buffers, params.k, self.metric);
        let aggregate_elapsed = aggregate_start.elapsed().as_nanos() as u64;
        Ok(SearchResult {
            num_queries: queries.len(),
            k: params.k,
            ids,
            distances,
            timing_info: TimingInfo {
                total: total_start.elapsed().as_nanos() as u64,
                partition_selection: 0,
                job_enqueue: scan_timing.job_enqueue,
                job_wait: scan_elapsed,
                buffer_init: scan_timing.buffer_init,
                result_aggregation: aggregate_elapsed,
                boundary_distance: scan_timing.boundary_distance,
                parent_info: None,
            },
        })
    }

    // Resolves the N x P candidate-partition matrix and the effective
    // batched_scan flag for one `search` call. Returns the nested
    // TimingInfo for the selector step when a parent index is in play.
    fn select_partitions(
        &self,
        queries: &BlockVectorSet<f32>,
        params: &SearchParams,
    ) -> Result<(Vec<Vec<i64>>, bool, Option<TimingInfo>), Error> {
        match &self.parent_index {
            Some(parent_index) => {
                let nprobe = params.nprobe.unwrap_or(DEFAULT_NPROBE);
                let start = Instant::now();
                let partition_ids = parent_index.search(queries, nprobe)?;
                let elapsed = start.elapsed().as_nanos() as u64;
                Ok((
                    partition_ids,
                    params.batched_scan,
                    Some(TimingInfo {
                        total: elapsed,
                        ..TimingInfo::default()
                    }),
                ))
            }
            None => {
                let partition_manager = self.partition_manager.as_ref().ok_or_else(|| {
                    Error::InvalidState("no partition manager configured".to_string())
                })?;
                let all = partition_manager.list_partitions();
                let rows = vec![all; queries.len()];
                Ok((rows, true, None))
            }
        }
    }

    // Builds the pre-filter mask over the union of every vector id in
    // every partition touched, evaluated once per search call.
    fn build_pre_filter_mask(
        &self,
        partition_manager: &dyn PartitionManager,
        params: &SearchParams,
        partition_ids: &[Vec<i64>],
    ) -> Result<Option<Arc<PreFilterMask>>, Error> {
        if params.filtering_type != FilteringType::Pre {
            return Ok(None);
        }
        let filter = params
            .filter
            .as_ref()
            .expect("validate() guarantees a filter accompanies a non-None filtering_type");
        let attribute_table = self.attribute_table.as_ref().ok_or_else(|| {
            Error::InvalidState("a filter was given but no attribute table is configured".to_string())
        })?;

        let mut touched_partitions: Vec<i64> = Vec::new();
        let mut seen_partitions: HashMap<i64, ()> = HashMap::new();
        for row in partition_ids {
            for &pid in row {
                if pid >= 0 && seen_partitions.insert(pid, ()).is_none() {
                    touched_partitions.push(pid);
                }
            }
        }

        let mut ids: Vec<i64> = Vec::new();
        for pid in touched_partitions {
            let partition = partition_manager.get_partition(pid)?;
            ids.extend_from_slice(partition.ids());
        }
        let satisfied = attribute_table.evaluate(&filter.column, filter.op, &filter.value, &ids)?;
        let mask: PreFilterMask = ids.into_iter().zip(satisfied).collect();
        Ok(Some(Arc::new(mask)))
    }

    // Applies the post-filter predicate to each query's oversized
    // survivor set, truncating back to `k`.
    fn apply_post_filter(
        &self,
        params: &SearchParams,
        buffers: Vec<TopKBuffer>,
    ) -> Result<Vec<TopKBuffer>, Error> {
        let filter = params
            .filter
            .as_ref()
            .expect("validate() guarantees a filter accompanies a non-None filtering_type");
        let attribute_table = self.attribute_table.as_ref().ok_or_else(|| {
            Error::InvalidState("a filter was given but no attribute table is configured".to_string())
        })?;

        let mut out = Vec::with_capacity(buffers.len());
        for buffer in buffers {
            let metric = buffer.metric();
            let candidates = buffer.into_sorted_with_sentinels();
            let ids: Vec<i64> = candidates.iter().filter(|c| c.id >= 0).map(|c| c.id).collect();
            let satisfied = attribute_table.evaluate(&filter.column, filter.op, &filter.value, &ids)?;
            let satisfied: HashMap<i64, bool> = ids.into_iter().zip(satisfied).collect();
            let mut truncated = TopKBuffer::new(metric, params.k);
            for candidate in candidates.into_iter().filter(|c| c.id >= 0) {
                if *satisfied.get(&candidate.id).unwrap_or(&false) {
                    truncated.push(candidate);
                }
            }
            out.push(truncated);
        }
        Ok(out)
    }

    // Builds and runs the scan jobs for one call, then merges per-job
    // partial buffers into one final buffer per query. Returns the
    // merged buffers alongside the timing breakdown of the steps this
    // method itself performs (buffer allocation, job enqueue, and the
    // worst-candidate boundary checks the merge performs).
    fn scan_and_merge(
        &self,
        queries: &BlockVectorSet<f32>,
        partition_manager: &Arc<dyn PartitionManager + Send + Sync>,
        partition_ids: &[Vec<i64>],
        batched_scan: bool,
        effective_k: usize,
        mask: Option<&Arc<PreFilterMask>>,
    ) -> Result<(Vec<TopKBuffer>, ScanTiming), Error> {
        let ctx = Arc::new(SearchContext {
            queries: Arc::new(queries.clone()),
            metric: self.metric,
            partition_manager: partition_manager.clone(),
            mask: mask.cloned(),
            k: effective_k,
        });

        let jobs: Vec<Job> = if batched_scan {
            group_by_partition(partition_ids)
                .into_iter()
                .map(|(partition_id, query_indices)| Job::Batched {
                    ctx: ctx.clone(),
                    partition_id,
                    query_indices,
                })
                .collect()
        } else {
            flatten_pairs(partition_ids)
                .into_iter()
                .map(|(query_index, partition_id)| Job::Serial {
                    ctx: ctx.clone(),
                    query_index,
                    partition_id,
                })
                .collect()
        };

        let (job_results, job_enqueue) = self
            .pool
            .lock()
            .expect("worker pool mutex poisoned")
            .run_all(jobs)?;

        let buffer_init_start = Instant::now();
        let mut buffers: Vec<TopKBuffer> = (0..queries.len())
            .map(|_| TopKBuffer::new(self.metric, effective_k))
            .collect();
        let buffer_init = buffer_init_start.elapsed().as_nanos() as u64;

        // `TopKBuffer::merge` pushes each partial candidate through the
        // same worst-boundary comparison `push` uses on the scan's hot
        // path, so the time this loop takes is the merge's boundary-
        // distance cost.
        let boundary_start = Instant::now();
        for job_result in job_results {
            for (query_index, partial) in job_result.buffers {
                buffers[query_index].merge(partial);
            }
        }
        let boundary_distance = boundary_start.elapsed().as_nanos() as u64;

        Ok((
            buffers,
            ScanTiming {
                job_enqueue,
                buffer_init,
                boundary_distance,
            },
        ))
    }
}

// Timing breakdown produced by `Coordinator::scan_and_merge`, folded
// into the call's overall `TimingInfo` by its caller.
struct ScanTiming {
    job_enqueue: u64,
    buffer_init: u64,
    boundary_distance: u64,
}

fn flatten_buffers(buffers: Vec<TopKBuffer>, k: usize, metric: Metric) -> (Vec<i64>, Vec<f32>) {
    let mut ids = Vec::with_capacity(buffers.len() * k);
    let mut distances = Vec::with_capacity(buffers.len() * k);
    for buffer in buffers {
        let candidates = buffer.into_sorted_with_sentinels();
        for candidate in &candidates[..k.min(candidates.len())] {
            ids.push(candidate.id);
            distances.push(candidate.distance);
        }
        for _ in candidates.len()..k {
            ids.push(-1);
            distances.push(metric.sentinel());
        }
    }
    (ids, distances)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attributes::{AttributeValue, InMemoryAttributeTable, PredicateOp};
    use crate::parent_index::ExhaustiveParentIndex;
    use crate::params::Filter;
    use crate::partition::{InMemoryPartitionManager, Partition};
    use std::num::NonZeroUsize;

    fn vectors(v: Vec<f32>, d: usize) -> BlockVectorSet<f32> {
        BlockVectorSet::chunk(v, NonZeroUsize::new(d).unwrap()).unwrap()
    }

    fn flat_coordinator() -> Coordinator {
        let mut mgr = InMemoryPartitionManager::new();
        mgr.insert(
            1,
            Partition::new(2, vec![10, 11, 12], vec![0.0, 0.0, 1.0, 0.0, 5.0, 5.0]).unwrap(),
        );
        mgr.insert(2, Partition::new(2, vec![20], vec![2.0, 2.0]).unwrap());
        Coordinator::new(Metric::L2, None, Some(Arc::new(mgr)), None, 0)
    }

    #[test]
    fn search_without_a_partition_manager_is_invalid_state() {
        let coord = Coordinator::new(Metric::L2, None, None, None, 0);
        let queries = vectors(vec![0.0, 0.0], 2);
        let err = coord.search(&queries, &SearchParams::new(1)).unwrap_err();
        assert!(matches!(err, Error::InvalidState(_)));
    }

    #[test]
    fn search_with_zero_queries_returns_an_empty_result() {
        let coord = flat_coordinator();
        let queries = vectors(vec![], 2);
        let result = coord.search(&queries, &SearchParams::new(3)).unwrap();
        assert_eq!(result.num_queries, 0);
    }

    #[test]
    fn flat_mode_scans_every_live_partition() {
        let coord = flat_coordinator();
        let queries = vectors(vec![0.0, 0.0], 2);
        let result = coord.search(&queries, &SearchParams::new(4)).unwrap();
        assert_eq!(result.ids_row(0), &[10, 11, 20, 12]);
    }

    fn ivf_coordinator() -> Coordinator {
        let mut mgr = InMemoryPartitionManager::new();
        mgr.insert(
            1,
            Partition::new(2, vec![1, 2, 3], vec![0.0, 0.0, 1.0, 0.0, 0.0, 1.0]).unwrap(),
        );
        mgr.insert(
            2,
            Partition::new(2, vec![4, 5, 6], vec![100.0, 100.0, 101.0, 100.0, 100.0, 101.0])
                .unwrap(),
        );
        let centroids = vectors(vec![0.0, 0.0, 100.0, 100.0], 2);
        let parent_index =
            ExhaustiveParentIndex::new(Metric::L2, vec![1, 2], centroids).unwrap();
        Coordinator::new(
            Metric::L2,
            Some(Arc::new(parent_index)),
            Some(Arc::new(mgr)),
            None,
            0,
        )
    }

    #[test]
    fn ivf_mode_scans_only_the_partition_the_parent_index_selects() {
        let coord = ivf_coordinator();
        let queries = vectors(vec![0.0, 0.0, 100.0, 100.0], 2);
        let params = SearchParams::new(2).with_nprobe(1);
        let result = coord.search(&queries, &params).unwrap();

        let row0: Vec<i64> = result.ids_row(0).to_vec();
        assert_eq!(row0.len(), 2);
        assert!(row0.iter().all(|id| [1, 2, 3].contains(id)));

        let row1: Vec<i64> = result.ids_row(1).to_vec();
        assert_eq!(row1.len(), 2);
        assert!(row1.iter().all(|id| [4, 5, 6].contains(id)));
    }

    #[test]
    fn result_is_identical_with_and_without_a_worker_pool() {
        let queries = vectors(vec![0.3, 0.1, 9.0, 9.0], 2);
        let inline = flat_coordinator();
        let pooled = flat_coordinator();
        pooled.initialize_workers(3);
        let params = SearchParams::new(2);
        let a = inline.search(&queries, &params).unwrap();
        let b = pooled.search(&queries, &params).unwrap();
        assert_eq!(a.ids, b.ids);
        assert_eq!(a.distances, b.distances);
    }

    #[test]
    fn batched_and_serial_scans_agree() {
        let queries = vectors(vec![0.3, 0.1, 9.0, 9.0], 2);
        let coord = flat_coordinator();
        let batched = coord
            .search(&queries, &SearchParams::new(3).with_batched_scan(true))
            .unwrap();
        let serial = coord
            .search(&queries, &SearchParams::new(3).with_batched_scan(false))
            .unwrap();
        assert_eq!(batched.ids, serial.ids);
        assert_eq!(batched.distances, serial.distances);
    }

    #[test]
    fn pre_filter_excludes_vectors_failing_the_predicate() {
        let mut attrs = InMemoryAttributeTable::new();
        attrs.set("flag", 10, AttributeValue::Bool(false));
        attrs.set("flag", 11, AttributeValue::Bool(true));
        attrs.set("flag", 12, AttributeValue::Bool(true));
        attrs.set("flag", 20, AttributeValue::Bool(true));
        let mut mgr = InMemoryPartitionManager::new();
        mgr.insert(
            1,
            Partition::new(2, vec![10, 11, 12], vec![0.0, 0.0, 1.0, 0.0, 5.0, 5.0]).unwrap(),
        );
        mgr.insert(2, Partition::new(2, vec![20], vec![2.0, 2.0]).unwrap());
        let coord = Coordinator::new(
            Metric::L2,
            None,
            Some(Arc::new(mgr)),
            Some(Arc::new(attrs)),
            0,
        );
        let queries = vectors(vec![0.0, 0.0], 2);
        let filter = Filter {
            column: "flag".to_string(),
            op: PredicateOp::Equal,
            value: AttributeValue::Bool(true),
        };
        let params = SearchParams::new(4).with_filter(filter, FilteringType::Pre);
        let result = coord.search(&queries, &params).unwrap();
        let ids: Vec<i64> = result.ids_row(0).iter().filter(|&&id| id >= 0).copied().collect();
        assert_eq!(ids, vec![11, 20, 12]);
    }

    #[test]
    fn post_filter_truncates_the_oversized_survivor_set() {
        let mut attrs = InMemoryAttributeTable::new();
        attrs.set("flag", 10, AttributeValue::Bool(false));
        attrs.set("flag", 11, AttributeValue::Bool(true));
        attrs.set("flag", 12, AttributeValue::Bool(true));
        attrs.set("flag", 20, AttributeValue::Bool(true));
        let mut mgr = InMemoryPartitionManager::new();
        mgr.insert(
            1,
            Partition::new(2, vec![10, 11, 12], vec![0.0, 0.0, 1.0, 0.0, 5.0, 5.0]).unwrap(),
        );
        mgr.insert(2, Partition::new(2, vec![20], vec![2.0, 2.0]).unwrap());
        let coord = Coordinator::new(
            Metric::L2,
            None,
            Some(Arc::new(mgr)),
            Some(Arc::new(attrs)),
            0,
        );
        let queries = vectors(vec![0.0, 0.0], 2);
        let filter = Filter {
            column: "flag".to_string(),
            op: PredicateOp::Equal,
            value: AttributeValue::Bool(true),
        };
        let params = SearchParams::new(2).with_filter(filter, FilteringType::Post);
        let result = coord.search(&queries, &params).unwrap();
        assert_eq!(result.ids_row(0), &[11, 20]);
    }

    #[test]
    fn scan_partitions_bypasses_the_selector() {
        let coord = flat_coordinator();
        let queries = vectors(vec![0.0, 0.0], 2);
        let result = coord
            .scan_partitions(&queries, &[vec![1]], &SearchParams::new(2))
            .unwrap();
        assert_eq!(result.ids_row(0), &[10, 11]);
    }

    #[test]
    fn workers_initialized_reports_pool_state() {
        let coord = flat_coordinator();
        assert!(!coord.workers_initialized());
        coord.initialize_workers(2);
        assert!(coord.workers_initialized());
        coord.shutdown_workers();
        assert!(!coord.workers_initialized());
    }

    #[test]
    fn k_larger_than_the_candidate_set_pads_the_tail_with_sentinels() {
        let mut mgr = InMemoryPartitionManager::new();
        mgr.insert(1, Partition::new(2, vec![1, 2], vec![0.0, 0.0, 1.0, 0.0]).unwrap());
        mgr.insert(2, Partition::new(2, vec![3, 4], vec![2.0, 0.0, 3.0, 0.0]).unwrap());
        let coord = Coordinator::new(Metric::L2, None, Some(Arc::new(mgr)), None, 0);
        let queries = vectors(vec![0.0, 0.0], 2);
        let result = coord.search(&queries, &SearchParams::new(5)).unwrap();
        let row = result.ids_row(0);
        assert_eq!(&row[..4], &[1, 2, 3, 4]);
        assert_eq!(row[4], -1);
        assert_eq!(result.distances_row(0)[4], f32::INFINITY);
        for d in &result.distances_row(0)[..4] {
            assert!(*d >= 0.0);
        }
    }

    #[test]
    fn scan_partitions_with_all_negative_ids_returns_only_sentinels() {
        let coord = flat_coordinator();
        let queries = vectors(vec![0.0, 0.0], 2);
        let result = coord
            .scan_partitions(&queries, &[vec![-1, -1]], &SearchParams::new(3))
            .unwrap();
        assert_eq!(result.ids_row(0), &[-1, -1, -1]);
        assert_eq!(
            result.distances_row(0),
            &[f32::INFINITY, f32::INFINITY, f32::INFINITY],
        );
    }
}
