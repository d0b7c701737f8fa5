// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Container constants and the HEAD chunk.

use crate::error::CodecError;

/// RIFF container magic.
pub const RIFF_MAGIC: [u8; 4] = *b"RIFF";
/// Form type identifying a Universal Ink Model file.
pub const UINK_MAGIC: [u8; 4] = *b"UINK";

/// Header chunk id.
pub const CHUNK_HEAD: [u8; 4] = *b"HEAD";
/// Body container chunk id.
pub const CHUNK_DATA: [u8; 4] = *b"DATA";
/// Properties section.
pub const CHUNK_PROPERTIES: [u8; 4] = *b"PRPS";
/// Input-configuration and sensor-data section.
pub const CHUNK_INPUT_DATA: [u8; 4] = *b"INPT";
/// Brushes section.
pub const CHUNK_BRUSHES: [u8; 4] = *b"BRSH";
/// Ink-data section (strokes, style palette).
pub const CHUNK_INK_DATA: [u8; 4] = *b"INKD";
/// Ink-structure section (main tree + views).
pub const CHUNK_INK_STRUCTURE: [u8; 4] = *b"INKS";
/// Knowledge-graph section (triples).
pub const CHUNK_KNOWLEDGE: [u8; 4] = *b"KNWG";

/// The version triple written by the encoder.
pub const CURRENT_VERSION: (u8, u8, u8) = (3, 1, 0);
/// The legacy version this codec still reads.
pub const LEGACY_VERSION: (u8, u8, u8) = (3, 0, 0);

/// Encoding of chunk payloads.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentType {
    /// Protocol-Buffers payloads (the only type this codec writes).
    #[default]
    Protobuf,
    /// JSON payloads.
    Json,
    /// Plain-text payloads.
    Text,
    /// Opaque binary payloads.
    Binary,
}

impl ContentType {
    /// The header tag byte.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::Protobuf => 0,
            Self::Json => 1,
            Self::Text => 2,
            Self::Binary => 3,
        }
    }

    /// Resolves a header tag byte.
    ///
    /// # Errors
    ///
    /// Returns a framing error for unknown tags.
    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(Self::Protobuf),
            1 => Ok(Self::Json),
            2 => Ok(Self::Text),
            3 => Ok(Self::Binary),
            other => Err(CodecError::format(
                "HEAD",
                format!("unknown content type tag {other}"),
            )),
        }
    }
}

/// Compression applied to every data-chunk payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Compression {
    /// No compression.
    #[default]
    None,
    /// Deflate (zlib) compression.
    Zip,
    /// LZMA compression.
    Lzma,
}

impl Compression {
    /// The header tag byte.
    #[must_use]
    pub fn tag(self) -> u8 {
        match self {
            Self::None => 0,
            Self::Zip => 1,
            Self::Lzma => 2,
        }
    }

    /// Resolves a header tag byte.
    ///
    /// # Errors
    ///
    /// Returns a framing error for unknown tags.
    pub fn from_tag(tag: u8) -> Result<Self, CodecError> {
        match tag {
            0 => Ok(Self::None),
            1 => Ok(Self::Zip),
            2 => Ok(Self::Lzma),
            other => Err(CodecError::format(
                "HEAD",
                format!("unknown compression tag {other}"),
            )),
        }
    }
}

/// Decoded HEAD chunk: version triple plus payload coding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Head {
    /// Major version.
    pub major: u8,
    /// Minor version.
    pub minor: u8,
    /// Patch version.
    pub patch: u8,
    /// Payload encoding of the data chunks.
    pub content_type: ContentType,
    /// Compression of the data chunks.
    pub compression: Compression,
}

impl Head {
    /// The 8-byte HEAD payload: version triple, reserved byte, content-type
    /// tag, compression tag, two reserved bytes.
    #[must_use]
    pub fn to_bytes(&self) -> [u8; 8] {
        [
            self.major,
            self.minor,
            self.patch,
            0,
            self.content_type.tag(),
            self.compression.tag(),
            0,
            0,
        ]
    }

    /// Parses a HEAD payload.
    ///
    /// # Errors
    ///
    /// Returns a framing error when the payload is not 8 bytes or carries
    /// unknown tags.
    pub fn from_bytes(payload: &[u8]) -> Result<Self, CodecError> {
        if payload.len() != 8 {
            return Err(CodecError::format(
                "HEAD",
                format!("expected 8 bytes, got {}", payload.len()),
            ));
        }
        Ok(Self {
            major: payload[0],
            minor: payload[1],
            patch: payload[2],
            content_type: ContentType::from_tag(payload[4])?,
            compression: Compression::from_tag(payload[5])?,
        })
    }

    /// Version triple as a tuple.
    #[must_use]
    pub fn version(&self) -> (u8, u8, u8) {
        (self.major, self.minor, self.patch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn head_round_trips() {
        let head = Head {
            major: 3,
            minor: 1,
            patch: 0,
            content_type: ContentType::Protobuf,
            compression: Compression::Lzma,
        };
        let bytes = head.to_bytes();
        assert_eq!(bytes, [3, 1, 0, 0, 0, 2, 0, 0]);
        assert_eq!(Head::from_bytes(&bytes).unwrap(), head);
    }

    #[test]
    fn unknown_tags_are_rejected()  {
        assert!(Head::from_bytes(&[3, 1, 0, 0, 9, 0, 0, 0]).is_err());
        assert!(Head::from_bytes(&[3, 1, 0, 0, 0, 9, 0, 0]).is_err());
        assert!(Head::from_bytes(&[3, 1, 0, 0]).is_err());
    }
}
