//! Distance metrics fixed at coordinator construction.

use std::cmp::Ordering;

use crate::linalg::{dot, subtract};

/// Distance metric used by every `search` call a [`crate::coordinator::Coordinator`]
/// serves. Chosen once, at construction; `SearchParams` carries no metric
/// override (see `SPEC_FULL.md` §3).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Metric {
    /// Squared Euclidean distance. Smaller is better.
    L2,
    /// Inner (dot) product. Larger is better.
    InnerProduct,
}

impl Metric {
    /// Sentinel distance padded into unfilled ranks.
    pub fn sentinel(self) -> f32 {
        match self {
            Self::L2 => f32::INFINITY,
            Self::InnerProduct => f32::NEG_INFINITY,
        }
    }

    /// `true` if `a` ranks strictly better than `b` under this metric.
    pub fn is_better(self, a: f32, b: f32) -> bool {
        match self {
            Self::L2 => a < b,
            Self::InnerProduct => a > b,
        }
    }

    /// Computes the distance between `q` and `v`. `buf` is scratch space
    /// of the same length as `q` and `v`, reused by the caller across
    /// calls so the scan loop does not allocate per candidate.
    pub fn distance(self, q: &[f32], v: &[f32], buf: &mut [f32]) -> f32 {
        match self {
            Self::L2 => {
                subtract(q, v, buf);
                dot(buf, buf)
            }
            Self::InnerProduct => dot(q, v),
        }
    }

    // Maps a raw distance to a key that sorts ascending = best-first
    // regardless of metric.
    fn rank_key(self, distance: f32) -> f32 {
        match self {
            Self::L2 => distance,
            Self::InnerProduct => -distance,
        }
    }

    /// Orders two `(distance, id)` candidates best-first: ties (equal
    /// distance) are broken by the smaller id, matching the worker pool's
    /// ordering guarantee (SPEC_FULL.md §4.4).
    pub fn cmp_candidates(self, a: (f32, i64), b: (f32, i64)) -> Ordering {
        self.rank_key(a.0)
            .partial_cmp(&self.rank_key(b.0))
            .unwrap_or(Ordering::Equal)
            .then_with(|| a.1.cmp(&b.1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn l2_prefers_the_smaller_distance() {
        assert!(Metric::L2.is_better(1.0, 2.0));
        assert!(!Metric::L2.is_better(2.0, 1.0));
    }

    #[test]
    fn inner_product_prefers_the_larger_distance() {
        assert!(Metric::InnerProduct.is_better(2.0, 1.0));
        assert!(!Metric::InnerProduct.is_better(1.0, 2.0));
    }

    #[test]
    fn sentinels_match_each_metric_worst_case() {
        assert_eq!(Metric::L2.sentinel(), f32::INFINITY);
        assert_eq!(Metric::InnerProduct.sentinel(), f32::NEG_INFINITY);
    }

    #[test]
    fn distance_computes_squared_euclidean_for_l2() {
        let mut buf = [0.0f32; 3];
        let d = Metric::L2.distance(&[1.0, 2.0, 3.0], &[0.0, 0.0, 0.0], &mut buf);
        assert_eq!(d, 1.0 + 4.0 + 9.0);
    }

    #[test]
    fn distance_computes_dot_product_for_inner_product() {
        let mut buf = [0.0f32; 3];
        let d = Metric::InnerProduct.distance(&[1.0, 2.0, 3.0], &[1.0, 1.0, 1.0], &mut buf);
        assert_eq!(d, 6.0);
    }

    #[test]
    fn cmp_candidates_breaks_ties_by_smaller_id() {
        let ordering = Metric::L2.cmp_candidates((1.0, 5), (1.0, 2));
        assert_eq!(ordering, Ordering::Greater);
        let ordering = Metric::L2.cmp_candidates((1.0, 2), (1.0, 5));
        assert_eq!(ordering, Ordering::Less);
    }

    #[test]
    fn cmp_candidates_orders_l2_ascending_by_distance() {
        assert_eq!(Metric::L2.cmp_candidates((1.0, 0), (2.0, 0)), Ordering::Less);
    }

    #[test]
    fn cmp_candidates_orders_inner_product_descending_by_distance() {
        assert_eq!(
            Metric::InnerProduct.cmp_candidates((2.0, 0), (1.0, 0)),
            Ordering::Less,
        );
    }
}
