// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-chunk payload compression.

use std::io::{Read, Write};

use crate::error::CodecError;
use crate::head::Compression;

/// Wraps a section payload with the compression chosen in the header.
///
/// # Errors
///
/// Returns a framing error when the compressor fails (I/O on in-memory
/// buffers should not fail; this surfaces allocator or format issues).
pub fn compress(payload: &[u8], compression: Compression) -> Result<Vec<u8>, CodecError> {
    match compression {
        Compression::None => Ok(payload.to_vec()),
        Compression::Zip => {
            let mut encoder =
                flate2::write::ZlibEncoder::new(Vec::new(), flate2::Compression::default());
            encoder
                .write_all(payload)
                .and_then(|()| encoder.finish())
                .map_err(|e| CodecError::format("compress", e.to_string()))
        }
        Compression::Lzma => {
            let mut out = Vec::new();
            lzma_rs::lzma_compress(&mut &payload[..], &mut out)
                .map_err(|e| CodecError::format("compress", e.to_string()))?;
            Ok(out)
        }
    }
}

/// Unwraps a section payload.
///
/// # Errors
///
/// Returns a framing error when the compressed stream is damaged.
pub fn decompress(payload: &[u8], compression: Compression) -> Result<Vec<u8>, CodecError> {
    match compression {
        Compression::None => Ok(payload.to_vec()),
        Compression::Zip => {
            let mut out = Vec::new();
            flate2::read::ZlibDecoder::new(payload)
                .read_to_end(&mut out)
                .map_err(|e| CodecError::format("decompress", e.to_string()))?;
            Ok(out)
        }
        Compression::Lzma => {
            let mut out = Vec::new();
            lzma_rs::lzma_decompress(&mut &payload[..], &mut out)
                .map_err(|e| CodecError::format("decompress", format!("{e:?}")))?;
            Ok(out)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn all_modes_round_trip() {
        let payload: Vec<u8> = (0..2048u32).map(|i| (i % 7) as u8).collect();
        for mode in [Compression::None, Compression::Zip, Compression::Lzma] {
            let packed = compress(&payload, mode).unwrap();
            assert_eq!(decompress(&packed, mode).unwrap(), payload, "{mode:?}");
        }
    }

    #[test]
    fn repetitive_payloads_shrink() {
        let payload = vec![42u8; 4096];
        for mode in [Compression::Zip, Compression::Lzma] {
            assert!(compress(&payload, mode).unwrap().len() < payload.len());
        }
    }

    #[test]
    fn damaged_streams_fail() {
        assert!(decompress(&[1, 2, 3], Compression::Zip).is_err());
    }
}
