//! Test utilities shared by unit and integration tests.
//!
//! Compiled into the crate for `#[cfg(test)]` and exposed to the
//! integration tests through the `test-utils` feature.

pub mod fixtures {
    //! Builders that keep label and sample literals compact in tests.

    use crate::parsing::prometheus::remote_write_models::{Label, Sample, TimeSeries, WriteRequest};

    /// Builds a label set from (name, value) pairs, in the given order.
    pub fn labels(pairs: &[(&str, &str)]) -> Vec<Label> {
        pairs
            .iter()
            .map(|(name, value)| Label {
                name: name.to_string(),
                value: value.to_string(),
            })
            .collect()
    }

    /// Builds a time series from (name, value) label pairs and
    /// (timestamp, value) samples.
    pub fn time_series(label_pairs: &[(&str, &str)], samples: &[(i64, f64)]) -> TimeSeries {
        TimeSeries {
            labels: labels(label_pairs),
            samples: samples
                .iter()
                .map(|&(timestamp, value)| Sample { value, timestamp })
                .collect(),
        }
    }

    /// A small write request: two series of the same metric, differing
    /// in their `code` label.
    pub fn write_request() -> WriteRequest {
        WriteRequest {
            timeseries: vec![
                time_series(
                    &[
                        ("__name__", "http_requests_total"),
                        ("code", "200"),
                        ("handler", "query"),
                    ],
                    &[(1000, 42.0), (2000, 43.0)],
                ),
                time_series(
                    &[
                        ("__name__", "http_requests_total"),
                        ("code", "400"),
                        ("handler", "query"),
                    ],
                    &[(1000, 7.0)],
                ),
            ],
        }
    }
}
