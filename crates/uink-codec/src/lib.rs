// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! uink-codec: the RIFF-chunked, Protocol-Buffers-encoded wire codec for
//! Universal Ink Model documents.
//!
//! Reading and writing operate on in-memory byte buffers; no operation
//! blocks on I/O. [`parse`] auto-detects the on-disk version (3.0.0 or
//! 3.1.0) from the HEAD chunk and normalizes both into the same in-memory
//! [`InkModel`](uink_model::InkModel); [`encode`] always writes 3.1.0.
//!
//! # Failure semantics
//!
//! The codec recovers nothing locally — the first error aborts the current
//! encode or decode. A [`DecodeOptions::lenient`] decode downgrades
//! dangling-reference failures to logged warnings and drops the offending
//! reference instead.
#![forbid(unsafe_code)]
#![deny(missing_docs, rust_2018_idioms, unused_must_use)]
#![deny(
    clippy::all,
    clippy::pedantic,
    clippy::nursery,
    clippy::cargo,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::dbg_macro,
    clippy::print_stdout,
    clippy::print_stderr
)]
#![allow(
    clippy::must_use_candidate,
    clippy::return_self_not_must_use,
    clippy::unreadable_literal,
    clippy::missing_const_for_fn,
    clippy::suboptimal_flops,
    clippy::redundant_pub_crate,
    clippy::many_single_char_names,
    clippy::module_name_repetitions,
    clippy::use_self
)]

mod chunk;
mod compression;
mod decode_v300;
mod decode_v310;
mod delta;
mod encode;
mod error;
mod head;
mod json;

/// Wire message shapes (prost-derived, fixed field tags).
pub mod proto;

pub use chunk::{write_chunk, write_envelope, Chunk, ChunkReader};
pub use encode::{encode, encode_with, EncodeOptions};
pub use error::CodecError;
pub use head::{
    Compression, ContentType, Head, CHUNK_BRUSHES, CHUNK_DATA, CHUNK_HEAD, CHUNK_INK_DATA,
    CHUNK_INK_STRUCTURE, CHUNK_INPUT_DATA, CHUNK_KNOWLEDGE, CHUNK_PROPERTIES, CURRENT_VERSION,
    LEGACY_VERSION,
};
pub use json::{parse_json, parse_json_bytes};

use uink_model::InkModel;

/// MIME type of binary UIM documents (informational, for transports).
pub const UIM_MIME_TYPE: &str = "application/vnd.wacom-ink.model";
/// MIME type of legacy WILL 2.0 documents (informational).
pub const WILL_MIME_TYPE: &str = "application/vnd.wacom-ink.will";
/// File extension of binary UIM documents.
pub const UIM_EXTENSION: &str = ".uim";
/// File extension of the protobuf-JSON read-only surface.
pub const JSON_EXTENSION: &str = ".json";

/// Decoder knobs.
#[derive(Debug, Clone, Copy, Default)]
pub struct DecodeOptions {
    /// Downgrade dangling-reference consistency failures to warnings,
    /// dropping the offending reference.
    pub lenient: bool,
}

/// Parses a UIM byte stream, auto-detecting 3.0.0 vs 3.1.0.
///
/// # Errors
///
/// [`CodecError::Format`] on framing or protobuf damage,
/// [`CodecError::UnsupportedVersion`] for version triples this codec does
/// not handle, [`CodecError::Consistency`] on dangling references.
pub fn parse(data: &[u8]) -> Result<InkModel, CodecError> {
    parse_with(data, DecodeOptions::default())
}

/// [`parse`] with explicit options.
///
/// # Errors
///
/// See [`parse`].
pub fn parse_with(data: &[u8], options: DecodeOptions) -> Result<InkModel, CodecError> {
    let body = chunk::read_envelope(data)?;
    let mut reader = ChunkReader::new(body);

    let head_chunk = reader.next_chunk()?;
    if head_chunk.id != head::CHUNK_HEAD {
        return Err(CodecError::format("riff", "HEAD chunk missing"));
    }
    let head = Head::from_bytes(head_chunk.payload)?;
    tracing::debug!(
        version = %format!("{}.{}.{}", head.major, head.minor, head.patch),
        compression = ?head.compression,
        "parsing uim stream"
    );
    if head.content_type != ContentType::Protobuf {
        return Err(CodecError::format(
            "HEAD",
            format!("only protobuf content is supported, got {:?}", head.content_type),
        ));
    }

    let data_chunk = reader.next_chunk()?;
    if data_chunk.id != head::CHUNK_DATA {
        return Err(CodecError::format("riff", "DATA chunk missing after HEAD"));
    }

    match head.version() {
        CURRENT_VERSION => {
            let mut sections: Vec<([u8; 4], Vec<u8>)> = Vec::new();
            let mut inner = ChunkReader::new(data_chunk.payload);
            while !inner.is_exhausted() {
                let section = inner.next_chunk()?;
                sections.push((section.id, section.payload.to_vec()));
            }
            decode_v310::decode_body(&sections, head.compression, options)
        }
        LEGACY_VERSION => {
            let payload = compression::decompress(data_chunk.payload, head.compression)?;
            decode_v300::decode_body(&payload, options)
        }
        (major, minor, patch) => Err(CodecError::UnsupportedVersion {
            major,
            minor,
            patch,
        }),
    }
}
