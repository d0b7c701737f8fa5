// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The `uim:` URI scheme addressing nodes, strokes, trees, and entities.
//!
//! 3.1.0 forms:
//!
//! * `uim:<uuid>` — group node in the main tree
//! * `uim:<tree>/<uuid>` — group node in a view tree
//! * `uim:stroke/<uuid>` — stroke reference in the main tree
//! * `uim:<tree>/stroke/<uuid>[#frag=<from>,<to>]` — stroke reference in a
//!   view (the tree prefix keeps URIs unique when one stroke appears in
//!   several trees)
//! * `uim:ne/<uuid>` — named entity
//! * `uim:view/<tree>` — root of a view tree
//!
//! The legacy 3.0.0 group form `uim:<uuid>/<tree>` is rewritten to the
//! 3.1.0 form when a legacy file is read.

use crate::ident::UimId;
use crate::tree::{InkNode, NodeKind};

/// Scheme prefix of every model URI.
pub const URI_SCHEME: &str = "uim:";

/// Well-known tree names.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommonView {
    /// The main tree of ink strokes.
    Main,
    /// Handwriting-recognition view.
    Hwr,
    /// Named-entity-recognition view.
    Ner,
    /// Segmentation view.
    Segmentation,
    /// Main tree of sensor-data objects.
    SensorData,
    /// Application-defined view.
    Custom,
    /// Legacy (v3.0) HWR view name.
    LegacyHwr,
    /// Legacy (v3.0) NER view name.
    LegacyNer,
}

impl CommonView {
    /// The tree name carried on the wire.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Main => "main",
            Self::Hwr => "hwr",
            Self::Ner => "ner",
            Self::Segmentation => "seg",
            Self::SensorData => "sdm",
            Self::Custom => "custom",
            Self::LegacyHwr => "will://views/3.0/HWR",
            Self::LegacyNer => "will://views/3.0/NER",
        }
    }

    /// Normalizes a legacy view name to its 3.1.0 short form.
    #[must_use]
    pub fn normalize(name: &str) -> &str {
        match name {
            "will://views/3.0/HWR" => "hwr",
            "will://views/3.0/NER" => "ner",
            other => other,
        }
    }
}

/// True when `tree_name` denotes the main tree.
#[must_use]
pub fn is_main_tree(tree_name: &str) -> bool {
    tree_name.is_empty() || tree_name == CommonView::Main.name()
}

/// URI of a named entity.
#[must_use]
pub fn named_entity_uri(id: UimId) -> String {
    format!("{URI_SCHEME}ne/{}", id.h_form())
}

/// URI of a view tree as a whole (used as a triple subject for tree-level
/// statements and as the root node's URI).
#[must_use]
pub fn view_uri(tree_name: &str) -> String {
    format!("{URI_SCHEME}view/{tree_name}")
}

/// Canonical 3.1.0 URI of a node within the named tree.
///
/// `is_root` selects the `uim:view/<tree>` form for view-tree roots.
#[must_use]
pub fn node_uri(tree_name: &str, node: &InkNode, is_root: bool) -> String {
    let main = is_main_tree(tree_name);
    if is_root && !main {
        return view_uri(tree_name);
    }
    match node.kind() {
        NodeKind::Group { .. } => {
            if main {
                format!("{URI_SCHEME}{}", node.id().h_form())
            } else {
                format!("{URI_SCHEME}{tree_name}/{}", node.id().h_form())
            }
        }
        NodeKind::StrokeRef { fragment } => {
            let mut uri = if main {
                format!("{URI_SCHEME}stroke/{}", node.id().h_form())
            } else {
                format!("{URI_SCHEME}{tree_name}/stroke/{}", node.id().h_form())
            };
            if let Some(frag) = fragment {
                uri.push_str(&format!(
                    "#frag={},{}",
                    frag.from_point_index, frag.to_point_index
                ));
            }
            uri
        }
    }
}

/// Legacy 3.0.0 URI of a view-tree group node (`uim:<uuid>/<tree>`).
#[must_use]
pub fn legacy_group_uri(tree_name: &str, id: UimId) -> String {
    format!("{URI_SCHEME}{}/{tree_name}", id.h_form())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::InkTree;

    #[test]
    fn uri_forms() {
        let id = UimId::Random(0xfa70390871c84d91b83c9b56549043ca);
        let h = "fa703908-71c8-4d91-b83c-9b56549043ca";

        let mut main = InkTree::new("main");
        let g = main.create_group_with_id(id);
        let s = main.create_stroke_ref(id, None);
        assert_eq!(node_uri("main", main.node(g).unwrap(), false), format!("uim:{h}"));
        assert_eq!(
            node_uri("main", main.node(s).unwrap(), false),
            format!("uim:stroke/{h}")
        );

        let mut hwr = InkTree::new("hwr");
        let g = hwr.create_group_with_id(id);
        let s = hwr.create_stroke_ref(id, None);
        assert_eq!(node_uri("hwr", hwr.node(g).unwrap(), true), "uim:view/hwr");
        assert_eq!(
            node_uri("hwr", hwr.node(g).unwrap(), false),
            format!("uim:hwr/{h}")
        );
        assert_eq!(
            node_uri("hwr", hwr.node(s).unwrap(), false),
            format!("uim:hwr/stroke/{h}")
        );

        assert_eq!(legacy_group_uri("hwr", id), format!("uim:{h}/hwr"));
        assert_eq!(named_entity_uri(id), format!("uim:ne/{h}"));
    }

    #[test]
    fn legacy_view_names_normalize() {
        assert_eq!(CommonView::normalize("will://views/3.0/HWR"), "hwr");
        assert_eq!(CommonView::normalize("will://views/3.0/NER"), "ner");
        assert_eq!(CommonView::normalize("seg"), "seg");
    }
}
