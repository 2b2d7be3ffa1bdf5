//! The worker pool: optional OS-thread parallelism for the scan engine.
//!
//! A pool is either uninitialized (every search runs inline, on the
//! caller's thread) or running a fixed number of long-lived threads that
//! pull jobs from a shared queue, mirroring the event-driven processing
//! loop the base vector library uses for its own query path.

use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::Instant;

use crossbeam_channel::{bounded, Receiver, Sender};

use crate::error::Error;
use crate::metric::Metric;
use crate::partition::PartitionManager;
use crate::scan::{scan_fetched_partition, scan_partition_for_query, PreFilterMask};
use crate::topk::TopKBuffer;
use crate::vector::{BlockVectorSet, VectorSet};

/// Lifecycle state of a [`WorkerPool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PoolState {
    Uninitialized,
    Running,
    Draining,
    Shutdown,
}

/// Everything a job needs to scan its assigned work, shared read-only
/// across every job in one `search` call via `Arc`.
pub(crate) struct SearchContext {
    pub queries: Arc<BlockVectorSet<f32>>,
    pub metric: Metric,
    pub partition_manager: Arc<dyn PartitionManager + Send + Sync>,
    pub mask: Option<Arc<PreFilterMask>>,
    pub k: usize,
}

/// One unit of scan work. Variants are fixed at job-construction time -
/// a pool never decides at dispatch time which shape of work it is
/// doing, matching the coordinator's choice of scan mode for the whole
/// search.
pub(crate) enum Job {
    /// Scan one partition once, against every query assigned to it.
    Batched {
        ctx: Arc<SearchContext>,
        partition_id: i64,
        query_indices: Vec<usize>,
    },
    /// Scan one `(query, partition)` pair.
    Serial {
        ctx: Arc<SearchContext>,
        query_index: usize,
        partition_id: i64,
    },
}

/// The outcome of one [`Job`]: a private top-k buffer per query it
/// touched, to be merged into that query's final buffer by the
/// dispatcher.
pub(crate) struct JobResult {
    pub buffers: Vec<(usize, TopKBuffer)>,
}

fn execute(job: Job) -> Result<JobResult, Error> {
    match job {
        Job::Batched {
            ctx,
            partition_id,
            query_indices,
        } => {
            let mut buffers = Vec::with_capacity(query_indices.len());
            if partition_id >= 0 {
                let partition = ctx.partition_manager.get_partition(partition_id)?;
                for qi in query_indices {
                    let mut buf = TopKBuffer::new(ctx.metric, ctx.k);
                    scan_fetched_partition(
                        ctx.queries.get(qi),
                        ctx.metric,
                        partition,
                        ctx.mask.as_deref(),
                        &mut buf,
                    );
                    buffers.push((qi, buf));
                }
            } else {
                for qi in query_indices {
                    buffers.push((qi, TopKBuffer::new(ctx.metric, ctx.k)));
                }
            }
            Ok(JobResult { buffers })
        }
        Job::Serial {
            ctx,
            query_index,
            partition_id,
        } => {
            let mut buf = TopKBuffer::new(ctx.metric, ctx.k);
            scan_partition_for_query(
                ctx.queries.get(query_index),
                ctx.metric,
                ctx.partition_manager.as_ref(),
                partition_id,
                ctx.mask.as_deref(),
                &mut buf,
            )?;
            Ok(JobResult {
                buffers: vec![(query_index, buf)],
            })
        }
    }
}

type WorkItem = (Job, Sender<Result<JobResult, Error>>);

/// A fixed-size pool of persistent worker threads processing [`Job`]s
/// from a shared bounded queue.
///
/// Lifecycle: `Uninitialized` -> `Running` (via [`WorkerPool::initialize`])
/// -> `Draining` -> `Shutdown` (via [`WorkerPool::shutdown`]). A pool with
/// zero workers stays `Uninitialized` and [`WorkerPool::run_all`] runs
/// every job inline on the caller's thread.
pub(crate) struct WorkerPool {
    state: PoolState,
    job_tx: Option<Sender<WorkItem>>,
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    pub fn new() -> Self {
        Self {
            state: PoolState::Uninitialized,
            job_tx: None,
            handles: Vec::new(),
        }
    }

    pub fn state(&self) -> PoolState {
        self.state
    }

    pub fn is_initialized(&self) -> bool {
        self.state == PoolState::Running
    }

    /// Spins up `n` worker threads. Shuts down any pool already running
    /// first. `n == 0` leaves the pool `Uninitialized`.
    pub fn initialize(&mut self, n: usize) {
        if self.state == PoolState::Running {
            self.shutdown();
        }
        if n == 0 {
            self.state = PoolState::Uninitialized;
            return;
        }
        let (tx, rx) = bounded::<WorkItem>(n * 4);
        let mut handles = Vec::with_capacity(n);
        for _ in 0..n {
            let rx: Receiver<WorkItem> = rx.clone();
            handles.push(std::thread::spawn(move || {
                for (job, reply_tx) in rx.iter() {
                    let result = execute(job);
                    let _ = reply_tx.send(result);
                }
            }));
        }
        self.job_tx = Some(tx);
        self.handles = handles;
        self.state = PoolState::Running;
    }

    /// Drains the queue and joins every worker thread. Idempotent.
    pub fn shutdown(&mut self) {
        if self.state != PoolState::Running {
            self.state = PoolState::Shutdown;
            return;
        }
        self.state = PoolState::Draining;
        self.job_tx.take();
        for handle in self.handles.drain(..) {
            let _ = handle.join();
        }
        self.state = PoolState::Shutdown;
    }

    /// Runs every job to completion - on worker threads if the pool is
    /// `Running`, inline otherwise - and blocks until every one has
    /// signaled done, acting as the barrier between the scan and the
    /// final top-k merge. Returns the completed jobs alongside the time
    /// spent handing them to the queue (zero on the inline path, since
    /// there is no queue to enqueue onto).
    ///
    /// The first error raised by any job is returned only after every
    /// job has drained, so no worker is ever left holding in-flight
    /// state when `run_all` returns.
    pub fn run_all(&self, jobs: Vec<Job>) -> Result<(Vec<JobResult>, u64), Error> {
        if jobs.is_empty() {
            return Ok((Vec::new(), 0));
        }
        match &self.job_tx {
            None => {
                let mut results = Vec::with_capacity(jobs.len());
                let mut first_err = None;
                for job in jobs {
                    match execute(job) {
                        Ok(r) => results.push(r),
                        Err(e) => {
                            first_err.get_or_insert(e);
                        }
                    }
                }
                match first_err {
                    Some(e) => Err(e),
                    None => Ok((results, 0)),
                }
            }
            Some(tx) => {
                if self.state != PoolState::Running {
                    return Err(Error::Cancelled("worker pool is draining".to_string()));
                }
                let n = jobs.len();
                let (reply_tx, reply_rx) = bounded::<Result<JobResult, Error>>(n);
                let enqueue_start = Instant::now();
                for job in jobs {
                    tx.send((job, reply_tx.clone())).map_err(|_| {
                        Error::Cancelled("worker pool is draining".to_string())
                    })?;
                }
                let job_enqueue = enqueue_start.elapsed().as_nanos() as u64;
                drop(reply_tx);
                let mut results = Vec::with_capacity(n);
                let mut first_err = None;
                for _ in 0..n {
                    match reply_rx.recv() {
                        Ok(Ok(r)) => results.push(r),
                        Ok(Err(e)) => {
                            first_err.get_or_insert(e);
                        }
                        Err(_) => {
                            first_err.get_or_insert(Error::Cancelled(
                                "worker pool shut down mid-search".to_string(),
                            ));
                        }
                    }
                }
                match first_err {
                    Some(e) => Err(e),
                    None => Ok((results, job_enqueue)),
                }
            }
        }
    }
}

impl Drop for WorkerPool {
    fn drop(&mut self) {
        self.shutdown();
    }
}
