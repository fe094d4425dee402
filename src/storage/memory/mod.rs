//! In-memory storage backend.
//!
//! Series live in a `BTreeMap` keyed by label-set fingerprint, so
//! scans visit them in a fixed order and repeated reads of the same
//! data produce byte-identical responses. Useful for tests and as the
//! reference behavior other backends are checked against.

pub mod memory_metrics;

use anyhow::{Result, bail};
use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::collections::btree_map::Entry;
use std::collections::{BTreeMap, HashSet};
use tokio::sync::RwLock;
use tracing::debug;
use url::Url;

use self::memory_metrics::MemoryMetrics;
use super::error::StorageError;
use super::query::Query;
use super::storage::StorageInstance;
use crate::datamodel::Fingerprint;
use crate::datamodel::labels::{sort_labels, sort_time_series, validate_labels};
use crate::parsing::prometheus::remote_read_models::QueryResult;
use crate::parsing::prometheus::remote_write_models::{TimeSeries, WriteRequest};

/// Storage backend keeping everything in process memory.
///
/// Writes merge into existing series by fingerprint. A batch is
/// validated in full before any series is applied, so a rejected write
/// leaves the store exactly as it was.
#[derive(Debug)]
pub struct MemoryStorage {
    series: RwLock<BTreeMap<Fingerprint, TimeSeries>>,
    max_series: Option<usize>,
    metrics: MemoryMetrics,
}

impl MemoryStorage {
    /// Creates an empty storage from a `memory://` connection string.
    ///
    /// `memory://?max_series=N` caps the number of distinct series the
    /// store will hold; without the parameter the store is unbounded.
    pub fn connect(connection_string: &str) -> Result<Self> {
        let url = Url::parse(connection_string)?;
        if url.scheme() != "memory" {
            bail!("Invalid scheme in connection string: {}", url.scheme());
        }

        let max_series = url
            .query_pairs()
            .find(|(key, _)| key == "max_series")
            .map(|(_, value)| value.parse())
            .transpose()?;

        Ok(Self {
            series: RwLock::new(BTreeMap::new()),
            max_series,
            metrics: MemoryMetrics::default(),
        })
    }
}

#[async_trait]
impl StorageInstance for MemoryStorage {
    async fn read(&self, queries: &[Query]) -> Result<Vec<QueryResult>, StorageError> {
        let series = self.series.read().await;
        let mut results = Vec::with_capacity(queries.len());

        for query in queries {
            let mut matched: Vec<TimeSeries> = Vec::new();
            for stored in series.values() {
                let accepted =
                    query
                        .matches(&stored.labels)
                        .map_err(|source| StorageError::InvalidQuery {
                            query: query.to_string(),
                            source,
                        })?;
                if !accepted {
                    continue;
                }

                let samples: Vec<_> = stored
                    .samples
                    .iter()
                    .filter(|sample| {
                        sample.timestamp >= query.start_timestamp_ms
                            && sample.timestamp <= query.end_timestamp_ms
                    })
                    .cloned()
                    .collect();
                // Series with no sample in range are omitted rather
                // than returned empty.
                if samples.is_empty() {
                    continue;
                }

                matched.push(TimeSeries {
                    labels: stored.labels.clone(),
                    samples,
                });
            }

            sort_time_series(&mut matched);
            self.metrics.read_series.inc_by(matched.len() as u64);
            debug!("Query {} matched {} series", query, matched.len());
            results.push(QueryResult { timeseries: matched });
        }

        self.metrics.read_queries.inc_by(queries.len() as u64);
        Ok(results)
    }

    async fn write(&self, request: WriteRequest) -> Result<(), StorageError> {
        // Validate the whole batch before touching the map.
        for ts in &request.timeseries {
            validate_labels(&ts.labels)
                .map_err(|err| StorageError::InvalidTimeSeries(err.to_string()))?;
        }

        let batch: Vec<(Fingerprint, TimeSeries)> = request
            .timeseries
            .into_iter()
            .map(|ts| (Fingerprint::of(&ts.labels), ts))
            .collect();

        let mut series = self.series.write().await;

        // The limit is checked against the post-merge cardinality, so
        // writes into existing series always pass.
        if let Some(limit) = self.max_series {
            let mut count = series.len();
            let mut incoming = HashSet::new();
            for (fingerprint, _) in &batch {
                if !series.contains_key(fingerprint) && incoming.insert(*fingerprint) {
                    count += 1;
                }
            }
            if count > limit {
                return Err(StorageError::SeriesLimitExceeded { count, limit });
            }
        }

        let written_series = batch.len() as u64;
        let mut written_samples = 0u64;
        for (fingerprint, mut ts) in batch {
            written_samples += ts.samples.len() as u64;
            match series.entry(fingerprint) {
                Entry::Occupied(mut entry) => {
                    let stored = entry.get_mut();
                    stored.samples.append(&mut ts.samples);
                    stored.samples.sort_by_key(|sample| sample.timestamp);
                }
                Entry::Vacant(entry) => {
                    sort_labels(&mut ts.labels);
                    ts.samples.sort_by_key(|sample| sample.timestamp);
                    entry.insert(ts);
                }
            }
        }

        self.metrics.stored_series.set(series.len() as i64);
        self.metrics.written_samples.inc_by(written_samples);
        self.metrics.written_series.inc_by(written_series);
        debug!(
            "Wrote {} series ({} samples), {} series stored",
            written_series,
            written_samples,
            series.len()
        );
        Ok(())
    }

    fn register_metrics(&self, registry: &mut Registry) {
        self.metrics.register(registry);
    }
}
