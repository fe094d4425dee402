// Hand-written prost models for the Prometheus remote write protocol.
// The protocol carries four small messages, so maintaining the structs
// by hand beats wiring a protobuf compiler into the build.
//
// Field numbers follow the upstream definition:
// https://github.com/prometheus/prometheus/blob/main/prompb/remote.proto
// and https://prometheus.io/docs/concepts/remote_write_spec/
//
// These types double as the crate's data model: a series is identified
// by its labels (an unordered set of unique name/value pairs, see
// crate::datamodel) and carries (timestamp, value) samples.

#[derive(prost::Message, Clone, PartialEq)]
pub struct WriteRequest {
    #[prost(message, repeated, tag = "1")]
    pub timeseries: Vec<TimeSeries>,
}

#[derive(prost::Message, Clone, PartialEq)]
pub struct TimeSeries {
    #[prost(message, repeated, tag = "1")]
    pub labels: Vec<Label>,
    #[prost(message, repeated, tag = "2")]
    pub samples: Vec<Sample>,
}

#[derive(prost::Message, Clone, PartialEq)]
pub struct Label {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(prost::Message, Clone, PartialEq)]
pub struct Sample {
    #[prost(double, tag = "1")]
    pub value: f64,
    #[prost(int64, tag = "2")]
    pub timestamp: i64,
}
