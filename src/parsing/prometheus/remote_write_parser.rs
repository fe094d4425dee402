use super::common::decompress_snappy;
use super::remote_write_models::WriteRequest;
use anyhow::Result;
use prost::Message;
use std::io::Cursor;

fn parse_protobuf(input: &[u8]) -> Result<WriteRequest> {
    Ok(WriteRequest::decode(&mut Cursor::new(input))?)
}

/// Parse the body of a Prometheus remote write request: a snappy
/// block-compressed, protobuf-encoded `WriteRequest`.
pub fn parse_remote_write_request(input: &[u8]) -> Result<WriteRequest> {
    let decompressed = decompress_snappy(input)?;
    parse_protobuf(&decompressed)
}
