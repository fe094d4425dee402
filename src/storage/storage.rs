use async_trait::async_trait;
use prometheus_client::registry::Registry;
use std::fmt::Debug;

use super::error::StorageError;
use super::query::Query;
use crate::parsing::prometheus::remote_read_models::QueryResult;
use crate::parsing::prometheus::remote_write_models::WriteRequest;

/// Contract implemented by every storage backend.
#[async_trait]
pub trait StorageInstance: Send + Sync + Debug {
    /// Runs the queries and returns one result per query, in request
    /// order. A query matching nothing yields an empty result at its
    /// position, never an omitted slot; callers pair results with
    /// queries positionally.
    async fn read(&self, queries: &[Query]) -> Result<Vec<QueryResult>, StorageError>;

    /// Ingests a batch of time series.
    ///
    /// Whether a failing batch is rejected whole or applied partially
    /// is the backend's decision; each implementation documents its
    /// policy.
    async fn write(&self, request: WriteRequest) -> Result<(), StorageError>;

    /// Registers the backend's operational metrics with the given
    /// registry.
    fn register_metrics(&self, registry: &mut Registry);
}
