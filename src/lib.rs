//! The query coordinator of an IVF approximate nearest-neighbor search
//! engine.
//!
//! This crate answers one question: given a batch of query vectors,
//! which partitions should be scanned, and which of their vectors are
//! the closest matches? It owns no index construction, no persistence,
//! and no wire format; see [`crate::parent_index`] and
//! [`crate::partition`] for the collaborator traits index construction
//! and storage are expected to implement.

#![warn(missing_docs)]

pub mod attributes;
pub mod coordinator;
pub mod error;
pub mod linalg;
pub mod metric;
pub mod numbers;
pub mod parent_index;
pub mod params;
pub mod partition;
pub mod result;
mod scan;
pub mod timing;
pub mod topk;
pub mod vector;
mod worker;
