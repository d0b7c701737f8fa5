// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Semantic layer: the triple store, the URI scheme, and the schema
//! vocabularies used by recognition backends.

mod triple;
mod uri;

/// Schema vocabularies (segmentation, named entities, math).
pub mod schema;

pub use triple::{SemanticTriple, TripleStore};
pub use uri::{
    is_main_tree, legacy_group_uri, named_entity_uri, node_uri, view_uri, CommonView, URI_SCHEME,
};
