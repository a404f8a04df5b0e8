//! Well-known metric name constants.
//!
//! These are the canonical names registered with the Prometheus recorder.
//! They live in `core` so the provider client, the batch aggregator, and
//! the API layer all agree on spelling.

/// Histogram: wall-clock duration of one whole batch aggregation run.
pub const METRIC_BATCH_DURATION_SECONDS: &str = "nimbus_batch_duration_seconds";

/// Gauge: number of items in the most recent batch.
pub const METRIC_BATCH_SIZE: &str = "nimbus_batch_size";

/// Counter: per-item operations that produced a result.
pub const METRIC_BATCH_ITEMS_SUCCEEDED: &str = "nimbus_batch_items_succeeded_total";

/// Counter: per-item operations that were dropped (failure or absence).
pub const METRIC_BATCH_ITEMS_FAILED: &str = "nimbus_batch_items_failed_total";

/// Counter: outbound provider calls, labelled by `operation` and `outcome`.
pub const METRIC_PROVIDER_CALLS: &str = "nimbus_provider_calls_total";

/// Histogram: outbound provider call latency, labelled by `operation`.
pub const METRIC_PROVIDER_CALL_DURATION_SECONDS: &str = "nimbus_provider_call_duration_seconds";

/// Counter: weather/forecast rows written, labelled by `kind`.
pub const METRIC_RECORDS_SAVED: &str = "nimbus_records_saved_total";
