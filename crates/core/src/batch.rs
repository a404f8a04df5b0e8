//! Chunked batch processing.
//!
//! [`partition`] splits an ordered sequence into fixed-size contiguous
//! chunks; [`process_in_chunks`] drives a per-item async operation over
//! all items, chunk by chunk, aggregating the successful results and
//! recording batch metrics.

use std::future::Future;
use std::time::Instant;

use futures::future::join_all;
use metrics::{counter, gauge, histogram};

use crate::error::CoreError;
use crate::metric_names::{
    METRIC_BATCH_DURATION_SECONDS, METRIC_BATCH_ITEMS_FAILED, METRIC_BATCH_ITEMS_SUCCEEDED,
    METRIC_BATCH_SIZE,
};

// ---------------------------------------------------------------------------
// Constants
// ---------------------------------------------------------------------------

/// Default chunk size, balancing outbound rate-limit headroom, memory
/// footprint, and batch-insert efficiency.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// Hard upper bound on the chunk size. Requests above this fail with a
/// validation error, never silently clamped.
pub const MAX_CHUNK_SIZE: usize = 100;

// ---------------------------------------------------------------------------
// Partitioning
// ---------------------------------------------------------------------------

/// Validate a chunk size against the allowed `1..=MAX_CHUNK_SIZE` range.
pub fn validate_chunk_size(chunk_size: usize) -> Result<(), CoreError> {
    if chunk_size < 1 {
        return Err(CoreError::Validation(
            "chunk size must be at least 1".to_string(),
        ));
    }
    if chunk_size > MAX_CHUNK_SIZE {
        return Err(CoreError::Validation(format!(
            "chunk size {chunk_size} exceeds maximum of {MAX_CHUNK_SIZE}"
        )));
    }
    Ok(())
}

/// Number of chunks a sequence of `len` items yields at `chunk_size`.
///
/// `chunk_size` must be non-zero; callers go through
/// [`validate_chunk_size`] first.
pub fn chunk_count(len: usize, chunk_size: usize) -> usize {
    len.div_ceil(chunk_size)
}

/// Split `items` into ordered, contiguous, non-overlapping chunks.
///
/// Every chunk holds exactly `chunk_size` items except possibly the last,
/// which holds the remainder. Concatenating the chunks reconstructs the
/// input exactly.
pub fn partition<T>(items: Vec<T>, chunk_size: usize) -> Result<Vec<Vec<T>>, CoreError> {
    validate_chunk_size(chunk_size)?;

    let mut chunks = Vec::with_capacity(chunk_count(items.len(), chunk_size));
    let mut iter = items.into_iter();
    loop {
        let chunk: Vec<T> = iter.by_ref().take(chunk_size).collect();
        if chunk.is_empty() {
            break;
        }
        chunks.push(chunk);
    }
    Ok(chunks)
}

// ---------------------------------------------------------------------------
// Aggregation
// ---------------------------------------------------------------------------

/// Run `op` over all `items` and aggregate the successful results.
///
/// Items are partitioned into chunks of `chunk_size`; all items within a
/// chunk run concurrently, and all chunks' work is started concurrently,
/// so the fixed chunk size acts as the effective parallelism ceiling
/// rather than a strict admission gate. The caller suspends until the
/// whole aggregate is ready.
///
/// A per-item operation signals failure by resolving to `None`; failed
/// items are dropped from the output and counted, never aborting their
/// siblings. Output order has no guaranteed relation to input order
/// beyond each surviving result tracing back to exactly one input item.
///
/// Records a duration histogram, a batch-size gauge, and
/// success/failure counters for the whole run. Failure counting is
/// item-count based (total minus surviving results).
pub async fn process_in_chunks<T, R, F, Fut>(
    items: Vec<T>,
    chunk_size: usize,
    mut op: F,
) -> Result<Vec<R>, CoreError>
where
    F: FnMut(T) -> Fut,
    Fut: Future<Output = Option<R>>,
{
    validate_chunk_size(chunk_size)?;

    let total = items.len();
    if total == 0 {
        gauge!(METRIC_BATCH_SIZE).set(0.0);
        histogram!(METRIC_BATCH_DURATION_SECONDS).record(0.0);
        counter!(METRIC_BATCH_ITEMS_SUCCEEDED).increment(0);
        counter!(METRIC_BATCH_ITEMS_FAILED).increment(0);
        return Ok(Vec::new());
    }

    let started = Instant::now();

    let chunk_futures: Vec<_> = partition(items, chunk_size)?
        .into_iter()
        .map(|chunk| join_all(chunk.into_iter().map(&mut op)))
        .collect();

    let survived: Vec<R> = join_all(chunk_futures)
        .await
        .into_iter()
        .flatten()
        .flatten()
        .collect();

    let succeeded = survived.len();
    let failed = total - succeeded;

    gauge!(METRIC_BATCH_SIZE).set(total as f64);
    histogram!(METRIC_BATCH_DURATION_SECONDS).record(started.elapsed().as_secs_f64());
    counter!(METRIC_BATCH_ITEMS_SUCCEEDED).increment(succeeded as u64);
    counter!(METRIC_BATCH_ITEMS_FAILED).increment(failed as u64);

    if failed > 0 {
        tracing::warn!(total, succeeded, failed, "Batch completed with failures");
    } else {
        tracing::debug!(total, "Batch completed");
    }

    Ok(survived)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partition_reconstructs_input() {
        for n in [0usize, 1, 7, 50, 51, 100, 257] {
            for k in [1usize, 3, 50, 100] {
                let items: Vec<usize> = (0..n).collect();
                let chunks = partition(items.clone(), k).unwrap();
                assert_eq!(chunks.len(), chunk_count(n, k), "n={n} k={k}");
                for chunk in &chunks[..chunks.len().saturating_sub(1)] {
                    assert_eq!(chunk.len(), k);
                }
                if let Some(last) = chunks.last() {
                    assert!(!last.is_empty() && last.len() <= k);
                }
                let flat: Vec<usize> = chunks.into_iter().flatten().collect();
                assert_eq!(flat, items);
            }
        }
    }

    #[test]
    fn chunk_size_zero_rejected() {
        assert!(validate_chunk_size(0).is_err());
        assert!(partition(vec![1, 2, 3], 0).is_err());
    }

    #[test]
    fn chunk_size_over_max_rejected() {
        assert!(validate_chunk_size(MAX_CHUNK_SIZE).is_ok());
        assert!(validate_chunk_size(MAX_CHUNK_SIZE + 1).is_err());
    }

    #[test]
    fn chunk_count_is_ceiling_division() {
        assert_eq!(chunk_count(0, 50), 0);
        assert_eq!(chunk_count(1, 50), 1);
        assert_eq!(chunk_count(50, 50), 1);
        assert_eq!(chunk_count(51, 50), 2);
        assert_eq!(chunk_count(100, 50), 2);
    }

    #[tokio::test]
    async fn all_items_succeed() {
        let items: Vec<u32> = (0..123).collect();
        let results = process_in_chunks(items, 50, |i| async move { Some(i * 2) })
            .await
            .unwrap();
        assert_eq!(results.len(), 123);

        let mut sorted = results.clone();
        sorted.sort_unstable();
        let expected: Vec<u32> = (0..123).map(|i| i * 2).collect();
        assert_eq!(sorted, expected);
    }

    #[tokio::test]
    async fn failed_items_are_dropped() {
        // Every third item fails; 40 of 120 are dropped.
        let items: Vec<u32> = (0..120).collect();
        let results = process_in_chunks(items, 50, |i| async move {
            if i % 3 == 0 {
                None
            } else {
                Some(i)
            }
        })
        .await
        .unwrap();
        assert_eq!(results.len(), 80);
        assert!(results.iter().all(|i| i % 3 != 0));
    }

    #[tokio::test]
    async fn empty_input_yields_empty_output() {
        let results = process_in_chunks(Vec::<u32>::new(), 50, |i| async move { Some(i) })
            .await
            .unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn single_item_behaves_like_chunk_of_one() {
        let results = process_in_chunks(vec![7u32], 50, |i| async move { Some(i + 1) })
            .await
            .unwrap();
        assert_eq!(results, vec![8]);
    }

    #[tokio::test]
    async fn invalid_chunk_size_propagates() {
        let err = process_in_chunks(vec![1u32], 0, |i| async move { Some(i) })
            .await
            .unwrap_err();
        assert!(matches!(err, CoreError::Validation(_)));
    }
}
