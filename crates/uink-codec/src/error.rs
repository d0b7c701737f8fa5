// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy of the codec.

use thiserror::Error;
use uink_model::ModelError;

/// Errors raised while encoding or decoding UIM documents.
///
/// The codec recovers nothing locally: the first error aborts the current
/// encode or decode. Every variant carries a location token — the chunk id
/// or section the failure happened in.
#[derive(Debug, Error)]
pub enum CodecError {
    /// Wire-format damage: bad magic, truncated chunk, size overflow.
    #[error("[FORMAT] {context}: {detail}")]
    Format {
        /// Chunk id or framing stage.
        context: &'static str,
        /// What was malformed.
        detail: String,
    },

    /// The file declares a version this codec cannot handle.
    #[error("[UNSUPPORTED_VERSION] cannot decode version {major}.{minor}.{patch}")]
    UnsupportedVersion {
        /// Declared major version.
        major: u8,
        /// Declared minor version.
        minor: u8,
        /// Declared patch version.
        patch: u8,
    },

    /// A protobuf payload inside a known chunk failed to parse.
    #[error("[FORMAT] chunk {context}: {source}")]
    Proto {
        /// Chunk id the payload belonged to.
        context: &'static str,
        /// Underlying decode failure.
        #[source]
        source: prost::DecodeError,
    },

    /// Post-parse cross-reference or invariant failure.
    #[error("[CONSISTENCY] {context}: {source}")]
    Consistency {
        /// Section the dangling reference was found in.
        context: &'static str,
        /// Underlying model failure.
        #[source]
        source: ModelError,
    },
}

impl CodecError {
    /// Wraps a model failure with its section context.
    #[must_use]
    pub fn consistency(context: &'static str, source: ModelError) -> Self {
        Self::Consistency { context, source }
    }

    /// Builds a framing error.
    #[must_use]
    pub fn format(context: &'static str, detail: impl Into<String>) -> Self {
        Self::Format {
            context,
            detail: detail.into(),
        }
    }
}
