//! Bounded top-k selection.
//!
//! Functionally the same job as an n-best selector elsewhere in this
//! crate, but backed by a binary heap so a push is `O(log k)` instead of
//! a linear scan through the retained set.

use std::cmp::Ordering;
use std::collections::BinaryHeap;

use crate::metric::Metric;

/// One ranked candidate: a distance paired with a vector id.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Candidate {
    pub distance: f32,
    pub id: i64,
}

// Orders candidates so that `BinaryHeap`'s max (its `peek`/`pop` root) is
// always the worst surviving candidate - the one to evict when a better
// one arrives. `Metric::cmp_candidates` already orders best-first
// (ascending); reusing it here means "worse" naturally sorts greater.
struct HeapEntry {
    candidate: Candidate,
    metric: Metric,
}

impl PartialEq for HeapEntry {
    fn eq(&self, other: &Self) -> bool {
        self.candidate.distance == other.candidate.distance
            && self.candidate.id == other.candidate.id
    }
}

impl Eq for HeapEntry {}

impl PartialOrd for HeapEntry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for HeapEntry {
    fn cmp(&self, other: &Self) -> Ordering {
        self.metric.cmp_candidates(
            (self.candidate.distance, self.candidate.id),
            (other.candidate.distance, other.candidate.id),
        )
    }
}

/// Bounded top-k buffer with `O(log k)` insertion.
///
/// Holds at most `k` candidates, always the best `k` seen so far under
/// `metric`. Capacity `0` rejects every push.
pub struct TopKBuffer {
    metric: Metric,
    k: usize,
    heap: BinaryHeap<HeapEntry>,
}

impl TopKBuffer {
    /// Creates an empty buffer retaining the best `k` candidates.
    pub fn new(metric: Metric, k: usize) -> Self {
        Self {
            metric,
            k,
            heap: BinaryHeap::with_capacity(k),
        }
    }

    /// Number of candidates currently retained.
    pub fn len(&self) -> usize {
        self.heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.heap.is_empty()
    }

    /// Requested capacity.
    pub fn capacity(&self) -> usize {
        self.k
    }

    pub fn metric(&self) -> Metric {
        self.metric
    }

    /// Distance of the currently-worst retained candidate, or `None`
    /// while the buffer has free slots.
    pub fn worst(&self) -> Option<f32> {
        self.heap.peek().map(|e| e.candidate.distance)
    }

    /// Inserts `candidate`, evicting the current worst if the buffer is
    /// full and `candidate` ranks better. Returns whether it was kept.
    pub fn push(&mut self, candidate: Candidate) -> bool {
        if self.k == 0 {
            return false;
        }
        let entry = HeapEntry {
            candidate,
            metric: self.metric,
        };
        if self.heap.len() < self.k {
            self.heap.push(entry);
            return true;
        }
        if entry < *self.heap.peek().expect("buffer at capacity is non-empty") {
            self.heap.pop();
            self.heap.push(entry);
            true
        } else {
            false
        }
    }

    /// Merges `other`'s candidates into this buffer, consuming it. Used
    /// to reduce per-worker partial buffers into one final buffer.
    pub fn merge(&mut self, other: TopKBuffer) {
        for entry in other.heap.into_iter() {
            self.push(entry.candidate);
        }
    }

    /// Drains the buffer into best-first order, right-padded with the
    /// metric's sentinel (`id = -1`) up to `k` entries.
    pub fn into_sorted_with_sentinels(self) -> Vec<Candidate> {
        let metric = self.metric;
        let k = self.k;
        let mut out: Vec<Candidate> = self
            .heap
            .into_sorted_vec()
            .into_iter()
            .map(|e| e.candidate)
            .collect();
        out.resize(
            k,
            Candidate {
                distance: metric.sentinel(),
                id: -1,
            },
        );
        out
    }
}
