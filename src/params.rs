//! Per-call search configuration.

use crate::attributes::{AttributeValue, PredicateOp};
use crate::error::Error;

/// Where an attribute predicate is applied relative to the scan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FilteringType {
    /// No predicate is applied.
    None,
    /// The predicate mask is built once per `search` call and consulted
    /// by the scan engine before computing each distance.
    Pre,
    /// The scan runs unfiltered to an oversized top-k', then the
    /// predicate truncates the survivors down to `k`.
    Post,
}

/// An attribute predicate: `column op value`.
#[derive(Clone, Debug)]
pub struct Filter {
    pub column: String,
    pub op: PredicateOp,
    pub value: AttributeValue,
}

/// Configuration carried alongside one batch of queries.
///
/// Built with the `with_*` methods rather than constructed as a plain
/// struct literal, so adding a field later does not break callers.
#[derive(Clone, Debug)]
pub struct SearchParams {
    /// Neighbors requested per query. Must be positive.
    pub k: usize,
    /// Partitions to inspect per query (IVF mode only). `None` defaults
    /// to 1; `Some(0)` is rejected by [`Coordinator::search`].
    ///
    /// [`Coordinator::search`]: crate::coordinator::Coordinator::search
    pub nprobe: Option<usize>,
    /// Vectorized (`true`) vs. one-query-at-a-time (`false`) scanning.
    /// Forced to `true` when the coordinator has no parent index.
    pub batched_scan: bool,
    /// Optional attribute predicate and where to apply it.
    pub filter: Option<Filter>,
    pub filtering_type: FilteringType,
}

impl SearchParams {
    /// Requests `k` neighbors per query with batched scanning and no
    /// filter; nprobe defaults at the coordinator.
    pub fn new(k: usize) -> Self {
        Self {
            k,
            nprobe: None,
            batched_scan: true,
            filter: None,
            filtering_type: FilteringType::None,
        }
    }

    pub fn with_nprobe(mut self, nprobe: usize) -> Self {
        self.nprobe = Some(nprobe);
        self
    }

    pub fn with_batched_scan(mut self, batched_scan: bool) -> Self {
        self.batched_scan = batched_scan;
        self
    }

    pub fn with_filter(mut self, filter: Filter, filtering_type: FilteringType) -> Self {
        self.filter = Some(filter);
        self.filtering_type = filtering_type;
        self
    }

    pub(crate) fn validate(&self) -> Result<(), Error> {
        if self.k == 0 {
            return Err(Error::InvalidInput("k must be positive".to_string()));
        }
        if self.nprobe == Some(0) {
            return Err(Error::InvalidInput(
                "nprobe must be positive when given".to_string(),
            ));
        }
        if self.filter.is_some() && self.filtering_type == FilteringType::None {
            return Err(Error::InvalidInput(
                "a filter was set but filtering_type is None".to_string(),
            ));
        }
        if self.filter.is_none() && self.filtering_type != FilteringType::None {
            return Err(Error::InvalidInput(
                "filtering_type was set but no filter was given".to_string(),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_defaults_to_batched_scan_and_no_filter() {
        let p = SearchParams::new(10);
        assert!(p.batched_scan);
        assert!(p.filter.is_none());
        assert_eq!(p.filtering_type, FilteringType::None);
    }

    #[test]
    fn validate_rejects_zero_k() {
        assert!(SearchParams::new(0).validate().is_err());
    }

    #[test]
    fn validate_rejects_zero_nprobe() {
        assert!(SearchParams::new(1).with_nprobe(0).validate().is_err());
    }

    #[test]
    fn validate_rejects_a_filter_without_a_filtering_type() {
        let p = SearchParams {
            filter: Some(Filter {
                column: "x".to_string(),
                op: PredicateOp::Equal,
                value: AttributeValue::Bool(true),
            }),
            ..SearchParams::new(1)
        };
        assert!(p.validate().is_err());
    }

    #[test]
    fn validate_rejects_a_filtering_type_without_a_filter() {
        let p = SearchParams {
            filtering_type: FilteringType::Pre,
            ..SearchParams::new(1)
        };
        assert!(p.validate().is_err());
    }
}
