// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! RIFF chunk framing.
//!
//! Byte-exact layout:
//!
//! | Offset | Bytes | Content |
//! |---|---|---|
//! | 0 | 4 | `"RIFF"` |
//! | 4 | 4 | little-endian payload size (bytes after this field) |
//! | 8 | 4 | `"UINK"` |
//! | 12 | … | `HEAD` chunk, then a `DATA` chunk wrapping the sections |
//!
//! Every chunk is `id(4) ‖ size(4, LE) ‖ payload ‖ pad`, with one zero pad
//! byte when the payload size is odd. Every size is validated against the
//! remaining bytes before the payload is touched.

use crate::error::CodecError;

/// One decoded chunk: 4-byte ASCII id plus its payload slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunk<'a> {
    /// Chunk id.
    pub id: [u8; 4],
    /// Payload bytes (padding excluded).
    pub payload: &'a [u8],
}

/// Cursor over a byte buffer yielding chunks.
#[derive(Debug)]
pub struct ChunkReader<'a> {
    data: &'a [u8],
    pos: usize,
}

impl<'a> ChunkReader<'a> {
    /// Starts reading chunks at the beginning of `data`.
    #[must_use]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, pos: 0 }
    }

    /// True when no bytes remain.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.pos >= self.data.len()
    }

    /// Reads the next chunk.
    ///
    /// # Errors
    ///
    /// Returns a framing error when fewer than 8 header bytes remain or the
    /// declared size exceeds the remaining bytes.
    pub fn next_chunk(&mut self) -> Result<Chunk<'a>, CodecError> {
        let remaining = self.data.len() - self.pos;
        if remaining < 8 {
            return Err(CodecError::format(
                "chunk",
                format!("{remaining} bytes left, chunk header needs 8"),
            ));
        }
        let id: [u8; 4] = self.data[self.pos..self.pos + 4]
            .try_into()
            .map_err(|_| CodecError::format("chunk", "unreadable id"))?;
        let size = u32::from_le_bytes(
            self.data[self.pos + 4..self.pos + 8]
                .try_into()
                .map_err(|_| CodecError::format("chunk", "unreadable size"))?,
        ) as usize;
        let start = self.pos + 8;
        if size > self.data.len() - start {
            return Err(CodecError::format(
                "chunk",
                format!(
                    "chunk {} declares {size} bytes, only {} remain",
                    String::from_utf8_lossy(&id),
                    self.data.len() - start
                ),
            ));
        }
        let payload = &self.data[start..start + size];
        self.pos = start + size + (size & 1);
        // The pad byte may be missing at end of stream; tolerate that.
        self.pos = self.pos.min(self.data.len());
        Ok(Chunk { id, payload })
    }
}

/// Appends one chunk (id, size, payload, pad) to `out`.
pub fn write_chunk(out: &mut Vec<u8>, id: [u8; 4], payload: &[u8]) {
    out.extend_from_slice(&id);
    #[allow(clippy::cast_possible_truncation)]
    out.extend_from_slice(&(payload.len() as u32).to_le_bytes());
    out.extend_from_slice(payload);
    if payload.len() % 2 != 0 {
        out.push(0);
    }
}

/// Wraps the already-chunked `body` into the RIFF envelope.
#[must_use]
pub fn write_envelope(body: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(body.len() + 12);
    out.extend_from_slice(&crate::head::RIFF_MAGIC);
    #[allow(clippy::cast_possible_truncation)]
    out.extend_from_slice(&((crate::head::UINK_MAGIC.len() + body.len()) as u32).to_le_bytes());
    out.extend_from_slice(&crate::head::UINK_MAGIC);
    out.extend_from_slice(body);
    out
}

/// Strips the RIFF envelope, returning the chunk stream after `UINK`.
///
/// # Errors
///
/// Returns a framing error on magic mismatch or when the declared payload
/// size runs past the end of the buffer.
pub fn read_envelope(data: &[u8]) -> Result<&[u8], CodecError> {
    if data.len() < 12 {
        return Err(CodecError::format(
            "riff",
            format!("{} bytes is too short for a RIFF envelope", data.len()),
        ));
    }
    if data[0..4] != crate::head::RIFF_MAGIC {
        return Err(CodecError::format("riff", "missing RIFF magic"));
    }
    let size = u32::from_le_bytes(
        data[4..8]
            .try_into()
            .map_err(|_| CodecError::format("riff", "unreadable size"))?,
    ) as usize;
    if size > data.len() - 8 {
        return Err(CodecError::format(
            "riff",
            format!("payload size {size} exceeds file size {}", data.len()),
        ));
    }
    if size < 4 || data[8..12] != crate::head::UINK_MAGIC {
        return Err(CodecError::format("riff", "missing UINK form type"));
    }
    Ok(&data[12..8 + size])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn chunk_padding_keeps_alignment() {
        let mut out = Vec::new();
        write_chunk(&mut out, *b"TEST", &[1, 2, 3]);
        assert_eq!(out, vec![b'T', b'E', b'S', b'T', 3, 0, 0, 0, 1, 2, 3, 0]);

        let mut reader = ChunkReader::new(&out);
        let chunk = reader.next_chunk().unwrap();
        assert_eq!(&chunk.id, b"TEST");
        assert_eq!(chunk.payload, &[1, 2, 3]);
        assert!(reader.is_exhausted());
    }

    #[test]
    fn envelope_round_trips() {
        let mut body = Vec::new();
        write_chunk(&mut body, *b"ABCD", &[9, 9]);
        let file = write_envelope(&body);
        assert_eq!(&file[0..4], b"RIFF");
        assert_eq!(read_envelope(&file).unwrap(), body.as_slice());
    }

    #[test]
    fn framing_damage_is_rejected() {
        assert!(read_envelope(b"RIFX\x00\x00\x00\x00UINK").is_err());
        assert!(read_envelope(b"RIFF\xff\x00\x00\x00UINKxx").is_err());
        assert!(read_envelope(b"RIFF\x04\x00\x00\x00JUNK").is_err());

        // chunk size past end of buffer
        let mut bad = Vec::new();
        bad.extend_from_slice(b"TEST");
        bad.extend_from_slice(&100u32.to_le_bytes());
        bad.push(1);
        assert!(ChunkReader::new(&bad).next_chunk().is_err());
    }
}
