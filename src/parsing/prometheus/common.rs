use anyhow::Result;
use snap::raw::{Decoder, Encoder};

/// Decompress snappy-compressed data using the block format.
///
/// The Prometheus remote write and read protocols use the snappy block
/// format, not the framed format. From the snap crate documentation:
/// > Generally, one only needs to use the raw format if some other
/// > source is generating raw Snappy compressed data and you have
/// > no choice but to do the same. Otherwise, the Snappy frame format
/// > should probably always be preferred.
pub fn decompress_snappy(input: &[u8]) -> Result<Vec<u8>> {
    Ok(Decoder::new().decompress_vec(input)?)
}

/// Compress data using the snappy block format, the counterpart of
/// [`decompress_snappy`] used when serializing responses.
pub fn compress_snappy(input: &[u8]) -> Result<Vec<u8>> {
    Ok(Encoder::new().compress_vec(input)?)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snappy_block_format() {
        let input = b"Hello, world!";
        let compressed = compress_snappy(input).unwrap();
        let decompressed = decompress_snappy(&compressed).unwrap();
        assert_eq!(decompressed, input);

        // The framed format has a stream identifier header that the block
        // format decoder must reject.
        let mut framed = Vec::new();
        framed.extend_from_slice(&[0xff, 0x06, 0x00, 0x00]);
        framed.extend_from_slice(b"sNaPpY");
        assert!(decompress_snappy(&framed).is_err());
    }
}
