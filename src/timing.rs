//! Latency telemetry recorded by a `search` call.

/// Cumulative, monotonic timing recorded within one `search` or
/// `scan_partitions` call. Every field is nanoseconds.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimingInfo {
    /// Wall-clock time for the whole call.
    pub total: u64,
    /// Time spent selecting partitions to scan, when a parent index is
    /// configured.
    pub partition_selection: u64,
    /// Time spent enqueuing jobs onto the worker pool (zero when the
    /// pool runs inline, since there is no queue to enqueue onto).
    pub job_enqueue: u64,
    /// Time spent blocked on the worker-pool barrier, waiting for every
    /// job to signal done.
    pub job_wait: u64,
    /// Time spent allocating the per-query top-k buffers the scan
    /// engine's jobs merge their partial results into.
    pub buffer_init: u64,
    /// Time spent reducing per-worker partial buffers into the final
    /// per-query buffer, including any post-filter truncation.
    pub result_aggregation: u64,
    /// Time spent comparing candidates against a top-k buffer's current
    /// worst retained distance while merging partial buffers.
    pub boundary_distance: u64,
    /// Timing of the nested partition-selection call, present only when
    /// a parent index is configured. Boxed to keep the struct's size
    /// fixed despite the recursive shape.
    pub parent_info: Option<Box<TimingInfo>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_timing_is_all_zero_with_no_nested_parent_info() {
        let t = TimingInfo::default();
        assert_eq!(t.total, 0);
        assert!(t.parent_info.is_none());
    }
}
