// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Logical ink trees.
//!
//! A tree owns a contiguous node arena; nodes address each other through
//! indices rather than owning pointers. The parent field is the parent's
//! index, so the structure has no reference cycles and subtree walks are a
//! plain explicit stack with no recursion depth limit.
//!
//! Nodes are created *detached* inside the arena, then attached under a
//! parent (or installed as the root). Registration with the owning model —
//! URI assignment and uniqueness checks — happens when the tree is added to
//! an [`InkModel`](crate::InkModel) or when subtrees are attached afterwards
//! through the model's API.

use crate::error::ModelError;
use crate::ident::UimId;

/// Axis-aligned rectangle: lower-left corner plus extent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct BoundingBox {
    /// Lower-left x.
    pub x: f64,
    /// Lower-left y.
    pub y: f64,
    /// Width.
    pub width: f64,
    /// Height.
    pub height: f64,
}

impl BoundingBox {
    /// Builds a box from corner and extent.
    #[must_use]
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// True when the box has zero extent at the origin.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.x == 0.0 && self.y == 0.0 && self.width == 0.0 && self.height == 0.0
    }

    /// Smallest box enclosing `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        let x = self.x.min(other.x);
        let y = self.y.min(other.y);
        let right = (self.x + self.width).max(other.x + other.width);
        let top = (self.y + self.height).max(other.y + other.height);
        Self::new(x, y, right - x, top - y)
    }
}

/// Sub-range of a stroke: sample indices plus spline parameter values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Fragment {
    /// Index of the first relevant path point.
    pub from_point_index: u32,
    /// Index of the last relevant path point.
    pub to_point_index: u32,
    /// Spline parameter of the first point, in `[0, 1]`.
    pub from_t: f32,
    /// Spline parameter of the last point, in `[0, 1]`.
    pub to_t: f32,
}

impl Fragment {
    /// Builds a fragment after checking its bounds.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::OutOfRange`] unless
    /// `from_point_index ≤ to_point_index` and
    /// `0 ≤ from_t ≤ to_t ≤ 1`.
    pub fn new(
        from_point_index: u32,
        to_point_index: u32,
        from_t: f32,
        to_t: f32,
    ) -> Result<Self, ModelError> {
        if to_point_index < from_point_index {
            return Err(ModelError::OutOfRange {
                what: "fragment point range",
                detail: format!("from {from_point_index} > to {to_point_index}"),
            });
        }
        if !(0.0..=1.0).contains(&from_t) || !(0.0..=1.0).contains(&to_t) || to_t < from_t {
            return Err(ModelError::OutOfRange {
                what: "fragment t range",
                detail: format!("[{from_t}, {to_t}] is not an ordered subrange of [0, 1]"),
            });
        }
        Ok(Self {
            from_point_index,
            to_point_index,
            from_t,
            to_t,
        })
    }
}

/// Index of a node within its tree's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NodeIndex(pub(crate) usize);

impl NodeIndex {
    /// The raw arena slot.
    #[must_use]
    pub fn get(self) -> usize {
        self.0
    }
}

/// What a node is: an interior group or a stroke reference leaf.
#[derive(Debug, Clone, PartialEq)]
pub enum NodeKind {
    /// Interior node grouping other nodes.
    Group {
        /// Child indices, in insertion order.
        children: Vec<NodeIndex>,
    },
    /// Leaf referencing a stroke, possibly only a fragment of it.
    StrokeRef {
        /// The referenced sub-range, when not the whole stroke.
        fragment: Option<Fragment>,
    },
}

/// One node of an ink tree.
#[derive(Debug, Clone, PartialEq)]
pub struct InkNode {
    id: UimId,
    parent: Option<NodeIndex>,
    bounds: Option<BoundingBox>,
    kind: NodeKind,
}

impl InkNode {
    /// Node identifier: a group's own id, or the referenced stroke's id.
    #[must_use]
    pub fn id(&self) -> UimId {
        self.id
    }

    /// Parent index; `None` for the root and for detached nodes.
    #[must_use]
    pub fn parent(&self) -> Option<NodeIndex> {
        self.parent
    }

    /// Cached bounding box, when computed or decoded.
    #[must_use]
    pub fn bounds(&self) -> Option<BoundingBox> {
        self.bounds
    }

    /// Node kind.
    #[must_use]
    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    /// True for group nodes.
    #[must_use]
    pub fn is_group(&self) -> bool {
        matches!(self.kind, NodeKind::Group { .. })
    }

    /// Child indices of a group; empty for stroke refs.
    #[must_use]
    pub fn children(&self) -> &[NodeIndex] {
        match &self.kind {
            NodeKind::Group { children } => children,
            NodeKind::StrokeRef { .. } => &[],
        }
    }

    /// The fragment of a stroke ref, when present.
    #[must_use]
    pub fn fragment(&self) -> Option<Fragment> {
        match &self.kind {
            NodeKind::StrokeRef { fragment } => *fragment,
            NodeKind::Group { .. } => None,
        }
    }
}

/// A logical tree of ink nodes, arena-backed.
#[derive(Debug, Clone, PartialEq)]
pub struct InkTree {
    name: String,
    nodes: Vec<InkNode>,
    root: Option<NodeIndex>,
}

impl InkTree {
    /// Creates an empty tree with the given name (use `"main"` for the main
    /// tree).
    #[must_use]
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
            nodes: Vec::new(),
            root: None,
        }
    }

    /// Tree name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Renames the tree (legacy view-name normalization).
    pub(crate) fn set_name(&mut self, name: &str) {
        self.name = name.to_string();
    }

    /// Root index, once installed.
    #[must_use]
    pub fn root(&self) -> Option<NodeIndex> {
        self.root
    }

    /// Node at `index`, when the index is in range.
    #[must_use]
    pub fn node(&self, index: NodeIndex) -> Option<&InkNode> {
        self.nodes.get(index.0)
    }

    /// Number of nodes in the arena.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// True when the arena holds no node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Creates a detached group node with a fresh random id.
    pub fn create_group(&mut self) -> NodeIndex {
        self.create_group_with_id(UimId::random())
    }

    /// Creates a detached group node with a known id (decoder path).
    pub fn create_group_with_id(&mut self, id: UimId) -> NodeIndex {
        self.push(InkNode {
            id,
            parent: None,
            bounds: None,
            kind: NodeKind::Group {
                children: Vec::new(),
            },
        })
    }

    /// Creates a detached stroke-reference node.
    pub fn create_stroke_ref(&mut self, stroke_id: UimId, fragment: Option<Fragment>) -> NodeIndex {
        self.push(InkNode {
            id: stroke_id,
            parent: None,
            bounds: None,
            kind: NodeKind::StrokeRef { fragment },
        })
    }

    fn push(&mut self, node: InkNode) -> NodeIndex {
        self.nodes.push(node);
        NodeIndex(self.nodes.len() - 1)
    }

    /// Installs a detached group node as the root.
    ///
    /// # Errors
    ///
    /// [`ModelError::AlreadyAttached`] when the node has a parent or a root
    /// is already installed; [`ModelError::InvalidArgument`] when the node
    /// is not a group or the index is out of range.
    pub fn set_root(&mut self, index: NodeIndex) -> Result<(), ModelError> {
        let node = self
            .nodes
            .get(index.0)
            .ok_or_else(|| bad_index(index, self.nodes.len()))?;
        if !node.is_group() {
            return Err(ModelError::InvalidArgument(
                "tree root must be a group node".to_string(),
            ));
        }
        if node.parent.is_some() || self.root.is_some() {
            return Err(ModelError::AlreadyAttached {
                node: node.id.s_form(),
            });
        }
        self.root = Some(index);
        Ok(())
    }

    /// Attaches a detached node under a group.
    ///
    /// # Errors
    ///
    /// [`ModelError::AlreadyAttached`] when the child already has a parent
    /// or is the root; [`ModelError::InvalidArgument`] when the parent is
    /// not a group or an index is out of range.
    pub fn attach(&mut self, parent: NodeIndex, child: NodeIndex) -> Result<(), ModelError> {
        let len = self.nodes.len();
        if parent.0 >= len {
            return Err(bad_index(parent, len));
        }
        if child.0 >= len {
            return Err(bad_index(child, len));
        }
        if parent == child {
            return Err(ModelError::InvalidArgument(
                "cannot attach a node to itself".to_string(),
            ));
        }
        if self.nodes[child.0].parent.is_some() || self.root == Some(child) {
            return Err(ModelError::AlreadyAttached {
                node: self.nodes[child.0].id.s_form(),
            });
        }
        match &mut self.nodes[parent.0].kind {
            NodeKind::Group { children } => children.push(child),
            NodeKind::StrokeRef { .. } => {
                return Err(ModelError::InvalidArgument(
                    "stroke-reference nodes cannot have children".to_string(),
                ))
            }
        }
        self.nodes[child.0].parent = Some(parent);
        Ok(())
    }

    /// Detaches a node from its parent (it stays in the arena, unreachable
    /// from the root). Root detachment clears the root.
    pub(crate) fn detach(&mut self, index: NodeIndex) {
        if self.root == Some(index) {
            self.root = None;
        }
        let Some(parent) = self.nodes.get(index.0).and_then(|n| n.parent) else {
            return;
        };
        if let NodeKind::Group { children } = &mut self.nodes[parent.0].kind {
            children.retain(|&c| c != index);
        }
        self.nodes[index.0].parent = None;
    }

    /// Sets the cached bounding box of a node.
    pub fn set_bounds(&mut self, index: NodeIndex, bounds: Option<BoundingBox>) {
        if let Some(node) = self.nodes.get_mut(index.0) {
            node.bounds = bounds;
        }
    }

    /// Pre-order walk over the subtree rooted at `start`.
    #[must_use]
    pub fn pre_order_from(&self, start: NodeIndex) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: vec![(start, 0)],
        }
    }

    /// Pre-order walk over the whole tree; empty when no root is installed.
    #[must_use]
    pub fn pre_order(&self) -> PreOrder<'_> {
        PreOrder {
            tree: self,
            stack: self.root.map(|r| (r, 0)).into_iter().collect(),
        }
    }

    /// All arena indices of the subtree rooted at `start`, pre-order.
    #[must_use]
    pub fn subtree_indices(&self, start: NodeIndex) -> Vec<NodeIndex> {
        self.pre_order_from(start).map(|(idx, _)| idx).collect()
    }

    /// Stroke ids referenced from the tree, in pre-order.
    #[must_use]
    pub fn stroke_ids(&self) -> Vec<UimId> {
        self.pre_order()
            .filter_map(|(idx, _)| {
                let node = &self.nodes[idx.0];
                (!node.is_group()).then_some(node.id)
            })
            .collect()
    }
}

fn bad_index(index: NodeIndex, len: usize) -> ModelError {
    ModelError::InvalidArgument(format!("node index {} out of range (len {len})", index.0))
}

/// Depth-first pre-order iterator yielding `(index, depth)`.
///
/// A plain explicit stack — no recursion, no depth limit. Children are
/// visited in insertion order; depth grows by at most one between
/// consecutive items.
pub struct PreOrder<'a> {
    tree: &'a InkTree,
    stack: Vec<(NodeIndex, usize)>,
}

impl Iterator for PreOrder<'_> {
    type Item = (NodeIndex, usize);

    fn next(&mut self) -> Option<Self::Item> {
        let (index, depth) = self.stack.pop()?;
        let node = self.tree.node(index)?;
        for &child in node.children().iter().rev() {
            self.stack.push((child, depth + 1));
        }
        Some((index, depth))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_tree() -> (InkTree, NodeIndex, NodeIndex, NodeIndex, NodeIndex) {
        let mut tree = InkTree::new("main");
        let root = tree.create_group();
        let group = tree.create_group();
        let s1 = tree.create_stroke_ref(UimId::random(), None);
        let s2 = tree.create_stroke_ref(UimId::random(), None);
        tree.set_root(root).unwrap();
        tree.attach(root, group).unwrap();
        tree.attach(group, s1).unwrap();
        tree.attach(root, s2).unwrap();
        (tree, root, group, s1, s2)
    }

    #[test]
    fn pre_order_depths_step_by_at_most_one() {
        let (tree, root, group, s1, s2) = sample_tree();
        let walk: Vec<(NodeIndex, usize)> = tree.pre_order().collect();
        assert_eq!(walk, vec![(root, 0), (group, 1), (s1, 2), (s2, 1)]);
        for pair in walk.windows(2) {
            assert!(pair[1].1 <= pair[0].1 + 1);
        }
    }

    #[test]
    fn double_attach_fails() {
        let (mut tree, root, group, s1, _) = sample_tree();
        let err = tree.attach(root, s1).unwrap_err();
        assert!(matches!(err, ModelError::AlreadyAttached { .. }));
        let err = tree.attach(group, root).unwrap_err();
        assert!(matches!(err, ModelError::AlreadyAttached { .. }));
    }

    #[test]
    fn stroke_refs_cannot_parent() {
        let (mut tree, _, _, s1, s2) = sample_tree();
        tree.detach(s2);
        assert!(tree.attach(s1, s2).is_err());
    }

    #[test]
    fn root_must_be_detached_group() {
        let mut tree = InkTree::new("main");
        let s = tree.create_stroke_ref(UimId::random(), None);
        assert!(tree.set_root(s).is_err());
        let g = tree.create_group();
        tree.set_root(g).unwrap();
        let g2 = tree.create_group();
        assert!(matches!(
            tree.set_root(g2),
            Err(ModelError::AlreadyAttached { .. })
        ));
    }

    #[test]
    fn detach_unlinks_from_parent() {
        let (mut tree, root, group, _, _) = sample_tree();
        tree.detach(group);
        assert!(tree.node(group).unwrap().parent().is_none());
        let walk: Vec<NodeIndex> = tree.pre_order().map(|(i, _)| i).collect();
        assert!(walk.contains(&root));
        assert!(!walk.contains(&group));
    }

    #[test]
    fn fragment_bounds_are_checked() {
        assert!(Fragment::new(0, 1, 0.0, 1.0).is_ok());
        assert!(Fragment::new(3, 1, 0.0, 1.0).is_err());
        assert!(Fragment::new(0, 1, -0.1, 1.0).is_err());
        assert!(Fragment::new(0, 1, 0.8, 0.4).is_err());
        assert!(Fragment::new(0, 1, 0.0, 1.5).is_err());
    }

    #[test]
    fn bounding_box_union() {
        let a = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let b = BoundingBox::new(5.0, -5.0, 10.0, 10.0);
        let u = a.union(&b);
        assert_eq!((u.x, u.y, u.width, u.height), (0.0, -5.0, 15.0, 15.0));
    }
}
