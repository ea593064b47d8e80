//! Prometheus counters for ingestion and queries

use metrics::counter;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};

pub const RECORDS_INSERTED: &str = "temper_records_inserted_total";
pub const BATCHES_REJECTED: &str = "temper_batches_rejected_total";
pub const QUERIES: &str = "temper_queries_total";

/// Install the global Prometheus recorder. Call once per process.
pub fn install_recorder() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}

pub fn records_inserted(count: usize) {
    counter!(RECORDS_INSERTED).increment(count as u64);
}

pub fn batch_rejected() {
    counter!(BATCHES_REJECTED).increment(1);
}

pub fn query_served() {
    counter!(QUERIES).increment(1);
}
