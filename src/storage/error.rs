use thiserror::Error;

use super::query::MatcherError;

/// Errors surfaced by storage backends from read and write operations.
#[derive(Error, Debug)]
pub enum StorageError {
    /// A query could not be evaluated against stored series, typically
    /// because one of its regex matchers carries an invalid pattern.
    /// `query` holds the canonical `[start,end,{...}]` rendering.
    #[error("Invalid query {query}: {source}")]
    InvalidQuery {
        query: String,
        #[source]
        source: MatcherError,
    },

    /// A time series in a write batch failed label validation.
    #[error("Invalid time series: {0}")]
    InvalidTimeSeries(String),

    /// Accepting a write would push the backend past its configured
    /// series capacity.
    #[error("Series limit exceeded: {count} series would exceed the limit of {limit}")]
    SeriesLimitExceeded { count: usize, limit: usize },
}
