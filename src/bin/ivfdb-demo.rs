//! Demonstrates the query coordinator end to end: builds a handful of
//! in-memory partitions and a centroid index over synthetic vectors,
//! then runs a batch of queries and prints the per-phase timing.

use std::num::NonZeroUsize;
use std::sync::Arc;

use anyhow::Result;
use rand::Rng;

use ivfdb::coordinator::{Coordinator, SearchEvent};
use ivfdb::metric::Metric;
use ivfdb::parent_index::ExhaustiveParentIndex;
use ivfdb::partition::{InMemoryPartitionManager, Partition};
use ivfdb::params::SearchParams;
use ivfdb::vector::BlockVectorSet;

const VECTOR_SIZE: usize = 16;
const NUM_PARTITIONS: usize = 8;
const VECTORS_PER_PARTITION: usize = 256;
const NUM_QUERIES: usize = 4;

fn random_vector(rng: &mut impl Rng) -> Vec<f32> {
    (0..VECTOR_SIZE).map(|_| rng.gen_range(-1.0..1.0)).collect()
}

fn main() -> Result<()> {
    tracing_subscriber::fmt::init();
    let mut rng = rand::thread_rng();

    let mut partition_manager = InMemoryPartitionManager::new();
    let mut centroid_data = Vec::with_capacity(NUM_PARTITIONS * VECTOR_SIZE);
    let mut partition_ids = Vec::with_capacity(NUM_PARTITIONS);
    for partition_id in 0..NUM_PARTITIONS as i64 {
        let centroid = random_vector(&mut rng);
        centroid_data.extend_from_slice(&centroid);
        partition_ids.push(partition_id);

        let mut ids = Vec::with_capacity(VECTORS_PER_PARTITION);
        let mut vectors = Vec::with_capacity(VECTORS_PER_PARTITION * VECTOR_SIZE);
        for i in 0..VECTORS_PER_PARTITION {
            ids.push(partition_id * VECTORS_PER_PARTITION as i64 + i as i64);
            vectors.extend_from_slice(&random_vector(&mut rng));
        }
        partition_manager.insert(partition_id, Partition::new(VECTOR_SIZE, ids, vectors)?);
    }

    let centroids = BlockVectorSet::chunk(centroid_data, NonZeroUsize::new(VECTOR_SIZE).unwrap())?;
    let parent_index = ExhaustiveParentIndex::new(Metric::L2, partition_ids, centroids)?;

    let coordinator = Coordinator::new(
        Metric::L2,
        Some(Arc::new(parent_index)),
        Some(Arc::new(partition_manager)),
        None,
        4,
    );

    let mut query_data = Vec::with_capacity(NUM_QUERIES * VECTOR_SIZE);
    for _ in 0..NUM_QUERIES {
        query_data.extend_from_slice(&random_vector(&mut rng));
    }
    let queries = BlockVectorSet::chunk(query_data, NonZeroUsize::new(VECTOR_SIZE).unwrap())?;

    let params = SearchParams::new(5).with_nprobe(3);
    let mut on_event = |event: SearchEvent| println!("  {:?}", event);
    let result = coordinator.search_with_events(&queries, &params, Some(&mut on_event))?;

    for q in 0..result.num_queries {
        println!(
            "query {}: ids={:?} distances={:?}",
            q,
            result.ids_row(q),
            result.distances_row(q),
        );
    }
    println!("total: {} ns", result.timing_info.total);

    coordinator.shutdown_workers();
    Ok(())
}
