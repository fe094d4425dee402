use super::common::{compress_snappy, decompress_snappy};
use super::remote_read_models::{ReadRequest, ReadResponse};
use anyhow::Result;
use prost::Message;
use std::io::Cursor;
use tracing::debug;

fn parse_protobuf(input: &[u8]) -> Result<ReadRequest> {
    Ok(ReadRequest::decode(&mut Cursor::new(input))?)
}

/// Parse the body of a Prometheus remote read request: a snappy
/// block-compressed, protobuf-encoded `ReadRequest`.
pub fn parse_remote_read_request(input: &[u8]) -> Result<ReadRequest> {
    let decompressed = decompress_snappy(input)?;
    let request = parse_protobuf(&decompressed)?;

    debug!(
        "Parsed ReadRequest: {} queries, accepted response types {:?}",
        request.queries.len(),
        request.accepted_response_types
    );
    for (i, query) in request.queries.iter().enumerate() {
        debug!(
            "Query {}: time range [{}ms, {}ms], {} matchers",
            i,
            query.start_timestamp_ms,
            query.end_timestamp_ms,
            query.matchers.len()
        );
        if let Some(hints) = &query.hints {
            debug!("  hints: step={}ms, func='{}'", hints.step_ms, hints.func);
        }
    }

    Ok(request)
}

/// Serialize a `ReadResponse` to the wire form Prometheus expects:
/// protobuf-encoded, then snappy block-compressed.
pub fn serialize_read_response(response: &ReadResponse) -> Result<Vec<u8>> {
    let encoded = response.encode_to_vec();
    let compressed = compress_snappy(&encoded)?;
    debug!(
        "Serialized ReadResponse: {} bytes encoded, {} bytes compressed",
        encoded.len(),
        compressed.len()
    );
    Ok(compressed)
}
