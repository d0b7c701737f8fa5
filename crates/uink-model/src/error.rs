// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Error taxonomy of the model layer.

use thiserror::Error;

/// Errors raised by mutation and lookup APIs on the model.
///
/// Every variant carries a machine-readable bracket code plus the location
/// token (id, URI, or name) the failure is about. Mutation APIs fail fast:
/// the model is unchanged when an error is returned.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ModelError {
    /// A lookup by id or name found no match.
    #[error("[NOT_FOUND] no {kind} with id {id}")]
    NotFound {
        /// Kind of entity looked up (e.g. `"sensor data"`, `"view"`).
        kind: &'static str,
        /// The id or name that missed.
        id: String,
    },

    /// Attempted to attach a node that already has a parent.
    #[error("[ALREADY_ATTACHED] node {node} already has a parent")]
    AlreadyAttached {
        /// Offending node (URI or index rendering).
        node: String,
    },

    /// Registering a node URI that is already in use within the model.
    #[error("[DUPLICATE_URI] an ink node with uri {uri} already exists in the model")]
    DuplicateUri {
        /// The colliding URI.
        uri: String,
    },

    /// A view references a stroke that is not present in the main tree.
    #[error("[MISSING_STROKE] stroke {id} referenced by tree '{tree}' is not in the main tree")]
    MissingStrokeInMainTree {
        /// S-form of the stroke id.
        id: String,
        /// Name of the referencing tree.
        tree: String,
    },

    /// Fragment indices, t-values, or channel samples outside legal bounds.
    #[error("[OUT_OF_RANGE] {what}: {detail}")]
    OutOfRange {
        /// What was out of range.
        what: &'static str,
        /// Human-readable bound violation.
        detail: String,
    },

    /// Illegal combination of arguments.
    #[error("[INVALID_ARGUMENT] {0}")]
    InvalidArgument(String),

    /// A cross-plane invariant does not hold (dangling id, stale hash, …).
    #[error("[CONSISTENCY] {0}")]
    Consistency(String),

    /// A textual identifier could not be parsed.
    #[error("[FORMAT] {0}")]
    Format(String),
}
