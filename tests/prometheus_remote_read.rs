//! End-to-end exercise of the remote write and remote read wire paths:
//! bytes in, bytes out, with the storage backend in the middle.

use anyhow::Result;
use prost::Message;
use promstash::parsing::prometheus::common::{compress_snappy, decompress_snappy};
use promstash::parsing::prometheus::remote_read_models::{
    LabelMatcher, Query as WireQuery, ReadRequest, ReadResponse, label_matcher, read_request,
};
use promstash::parsing::prometheus::remote_read_parser::{
    parse_remote_read_request, serialize_read_response,
};
use promstash::parsing::prometheus::remote_write_parser::parse_remote_write_request;
use promstash::storage::query::Query;
use promstash::storage::storage_factory::create_storage_from_connection_string;
use promstash::storage::{StorageError, StorageInstance};
use promstash::test_utils::fixtures::write_request;
use std::io::Cursor;

fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

fn eq_matcher(name: &str, value: &str) -> LabelMatcher {
    LabelMatcher {
        r#type: label_matcher::Type::Eq as i32,
        name: name.to_string(),
        value: value.to_string(),
    }
}

#[tokio::test]
async fn test_remote_write_then_remote_read() -> Result<()> {
    init_tracing();
    let storage = create_storage_from_connection_string("memory://").await?;

    // Ingest a write request exactly as it arrives on the wire.
    let write_body = compress_snappy(&write_request().encode_to_vec())?;
    storage.write(parse_remote_write_request(&write_body)?).await?;

    // Three queries in one request: a match-all for the metric, one
    // matching nothing, one narrowed by a second matcher.
    let read_request = ReadRequest {
        queries: vec![
            WireQuery {
                start_timestamp_ms: 0,
                end_timestamp_ms: 10_000,
                matchers: vec![eq_matcher("__name__", "http_requests_total")],
                hints: None,
            },
            WireQuery {
                start_timestamp_ms: 0,
                end_timestamp_ms: 10_000,
                matchers: vec![eq_matcher("__name__", "no_such_metric")],
                hints: None,
            },
            WireQuery {
                start_timestamp_ms: 0,
                end_timestamp_ms: 10_000,
                matchers: vec![
                    eq_matcher("__name__", "http_requests_total"),
                    eq_matcher("code", "400"),
                ],
                hints: None,
            },
        ],
        accepted_response_types: vec![read_request::ResponseType::Samples as i32],
    };
    let read_body = compress_snappy(&read_request.encode_to_vec())?;

    let decoded = parse_remote_read_request(&read_body)?;
    let queries = decoded
        .queries
        .iter()
        .map(Query::try_from)
        .collect::<Result<Vec<_>, _>>()?;

    let results = storage.read(&queries).await?;
    let response_body = serialize_read_response(&ReadResponse { results })?;

    // Decode what Prometheus would receive.
    let response = ReadResponse::decode(&mut Cursor::new(decompress_snappy(&response_body)?))?;
    assert_eq!(response.results.len(), 3);

    let first = &response.results[0].timeseries;
    assert_eq!(first.len(), 2);
    // Canonical form: labels sorted by name within each series.
    let names: Vec<&str> = first[0].labels.iter().map(|l| l.name.as_str()).collect();
    assert_eq!(names, ["__name__", "code", "handler"]);
    assert_eq!(first[0].labels[1].value, "200");
    assert_eq!(first[1].labels[1].value, "400");
    assert_eq!(first[0].samples.len(), 2);
    assert_eq!(first[0].samples[0].timestamp, 1000);
    assert_eq!(first[0].samples[0].value, 42.0);

    // The unmatched query keeps its slot.
    assert!(response.results[1].timeseries.is_empty());

    let third = &response.results[2].timeseries;
    assert_eq!(third.len(), 1);
    assert_eq!(third[0].labels[1].value, "400");
    Ok(())
}

#[tokio::test]
async fn test_empty_read_request_round_trip() -> Result<()> {
    init_tracing();
    let storage = create_storage_from_connection_string("memory://").await?;

    let body = compress_snappy(
        &ReadRequest {
            queries: vec![],
            accepted_response_types: vec![],
        }
        .encode_to_vec(),
    )?;
    let decoded = parse_remote_read_request(&body)?;
    assert!(decoded.queries.is_empty());

    let results = storage.read(&[]).await?;
    let response_body = serialize_read_response(&ReadResponse { results })?;

    let response = ReadResponse::decode(&mut Cursor::new(decompress_snappy(&response_body)?))?;
    assert!(response.results.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_unknown_match_type_fails_at_conversion() -> Result<()> {
    init_tracing();

    // The wire request itself decodes fine; the unknown discriminant
    // is rejected when converting to a storage query.
    let read_request = ReadRequest {
        queries: vec![WireQuery {
            start_timestamp_ms: 0,
            end_timestamp_ms: 10_000,
            matchers: vec![LabelMatcher {
                r#type: 7,
                name: "job".to_string(),
                value: "prometheus".to_string(),
            }],
            hints: None,
        }],
        accepted_response_types: vec![],
    };
    let body = compress_snappy(&read_request.encode_to_vec())?;
    let decoded = parse_remote_read_request(&body)?;

    let err = Query::try_from(&decoded.queries[0]).unwrap_err();
    assert_eq!(err.to_string(), "Unknown match type: 7");
    Ok(())
}

#[tokio::test]
async fn test_invalid_regex_surfaces_as_query_failure() -> Result<()> {
    init_tracing();
    let storage = create_storage_from_connection_string("memory://").await?;
    storage.write(write_request()).await?;

    let wire = WireQuery {
        start_timestamp_ms: 0,
        end_timestamp_ms: 10_000,
        matchers: vec![LabelMatcher {
            r#type: label_matcher::Type::Re as i32,
            name: "code".to_string(),
            value: "2(".to_string(),
        }],
        hints: None,
    };
    // Conversion succeeds: the pattern is only compiled at evaluation.
    let query = Query::try_from(&wire)?;

    let err = storage.read(&[query]).await.unwrap_err();
    assert!(matches!(err, StorageError::InvalidQuery { .. }));
    assert!(err.to_string().contains("2("));
    Ok(())
}
