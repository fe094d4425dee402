//! Operational metrics of the in-memory backend.

use prometheus_client::metrics::counter::Counter;
use prometheus_client::metrics::gauge::Gauge;
use prometheus_client::registry::Registry;

/// Metric handles updated by the storage on every read and write.
///
/// Handles are cheap atomic clones; the storage keeps one copy and
/// hands another to the registry, so updates flow whether or not
/// `register` was called.
#[derive(Debug, Clone, Default)]
pub struct MemoryMetrics {
    /// Distinct series currently stored.
    pub stored_series: Gauge,
    /// Samples accepted by write calls.
    pub written_samples: Counter,
    /// Series entries accepted by write calls, counting merges into
    /// existing series.
    pub written_series: Counter,
    /// Queries evaluated by read calls.
    pub read_queries: Counter,
    /// Series returned across all read results.
    pub read_series: Counter,
}

impl MemoryMetrics {
    /// Registers all handles. Counter names are registered without the
    /// `_total` suffix; the text encoder appends it.
    pub fn register(&self, registry: &mut Registry) {
        registry.register(
            "promstash_memory_stored_series",
            "Number of distinct time series currently stored",
            self.stored_series.clone(),
        );
        registry.register(
            "promstash_memory_written_samples",
            "Number of samples accepted by write requests",
            self.written_samples.clone(),
        );
        registry.register(
            "promstash_memory_written_series",
            "Number of time series entries accepted by write requests",
            self.written_series.clone(),
        );
        registry.register(
            "promstash_memory_read_queries",
            "Number of queries evaluated by read requests",
            self.read_queries.clone(),
        );
        registry.register(
            "promstash_memory_read_series",
            "Number of time series returned by read requests",
            self.read_series.clone(),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_handles_stay_connected_after_registration() {
        let metrics = MemoryMetrics::default();
        let mut registry = Registry::default();
        metrics.register(&mut registry);

        metrics.stored_series.set(3);
        metrics.written_samples.inc_by(7);

        let mut encoded = String::new();
        prometheus_client::encoding::text::encode(&mut encoded, &registry).unwrap();
        assert!(encoded.contains("promstash_memory_stored_series 3"));
        assert!(encoded.contains("promstash_memory_written_samples_total 7"));
    }
}
