// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! The ink-model root aggregate.
//!
//! An [`InkModel`] ties the four data planes together: the input
//! configuration and sensor-data repositories, the stroke/brush ink data,
//! the logical trees, and the semantic triple store. The model also owns
//! the node-URI registry that keeps tree nodes addressable and unique.
//!
//! # Invariants
//!
//! After every mutation that crosses the public contract:
//!
//! * every stroke referenced by any tree exists in the main tree;
//! * every node URI is unique within the model;
//! * every `sensor_data_id` on a stroke resolves in the sensor repository;
//! * every content-addressed id equals the hash of its current components;
//! * every triple subject that is a node URI refers to a registered node.
//!
//! [`InkModel::validate`] checks all five; the encoder runs it before
//! serializing.

use std::collections::HashMap;

use crate::brush::Brushes;
use crate::error::ModelError;
use crate::ident::UimId;
use crate::input::{InputConfiguration, SensorChannel, SensorType};
use crate::matrix::Matrix4;
use crate::semantics::{self, TripleStore};
use crate::sensor::SensorDataRepository;
use crate::stroke::{MissingDataPolicy, Stroke, StrokeAttribute};
use crate::tree::{BoundingBox, Fragment, InkTree, NodeIndex, PreOrder};

/// Location of a registered node: owning tree plus arena index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NodeRef {
    /// Name of the owning tree.
    pub tree: String,
    /// Arena index within that tree.
    pub index: NodeIndex,
}

/// Options for [`InkModel::clone_group`].
#[derive(Debug, Clone, Copy)]
pub struct CloneOptions {
    /// Duplicate triples of cloned nodes onto the clone URIs.
    pub clone_semantics: bool,
    /// Clone child stroke references (same underlying strokes).
    pub clone_stroke_refs: bool,
    /// Recurse into child groups.
    pub clone_child_groups: bool,
}

impl Default for CloneOptions {
    fn default() -> Self {
        Self {
            clone_semantics: true,
            clone_stroke_refs: true,
            clone_child_groups: false,
        }
    }
}

/// The root aggregate of a UIM document.
///
/// Equality is logical: the source-format version and the derived URI
/// registry do not participate, so a decoded legacy document compares equal
/// to its re-encoded 3.1.0 form when the content matches.
#[derive(Debug, Clone, Default)]
pub struct InkModel {
    version: Option<(u8, u8, u8)>,
    unit_scale_factor: f32,
    transform: Matrix4,
    properties: Vec<(String, String)>,
    input_configuration: InputConfiguration,
    sensor_data: SensorDataRepository,
    brushes: Brushes,
    strokes: Vec<Stroke>,
    main_tree: Option<InkTree>,
    views: Vec<InkTree>,
    knowledge_graph: TripleStore,
    uri_registry: HashMap<String, NodeRef>,
}

impl PartialEq for InkModel {
    fn eq(&self, other: &Self) -> bool {
        self.unit_scale_factor == other.unit_scale_factor
            && self.transform == other.transform
            && self.properties == other.properties
            && self.input_configuration == other.input_configuration
            && self.sensor_data == other.sensor_data
            && self.brushes == other.brushes
            && self.strokes == other.strokes
            && self.main_tree == other.main_tree
            && self.views == other.views
            && self.knowledge_graph == other.knowledge_graph
    }
}

impl InkModel {
    /// Creates an empty model (unit scale 1, identity transform).
    #[must_use]
    pub fn new() -> Self {
        Self {
            unit_scale_factor: 1.0,
            ..Self::default()
        }
    }

    /// Version triple of the source file, when the model was decoded.
    #[must_use]
    pub fn version(&self) -> Option<(u8, u8, u8)> {
        self.version
    }

    /// Records the source-format version (decoder path).
    pub fn set_version(&mut self, version: (u8, u8, u8)) {
        self.version = Some(version);
    }

    /// Factor converting local coordinates to DIPs (1/96 inch).
    #[must_use]
    pub fn unit_scale_factor(&self) -> f32 {
        self.unit_scale_factor
    }

    /// Sets the local-to-DIP scale factor.
    pub fn set_unit_scale_factor(&mut self, factor: f32) {
        self.unit_scale_factor = factor;
    }

    /// Document transform (defaults to identity).
    #[must_use]
    pub fn transform(&self) -> &Matrix4 {
        &self.transform
    }

    /// Sets the document transform.
    pub fn set_transform(&mut self, transform: Matrix4) {
        self.transform = transform;
    }

    /// Ordered document properties.
    #[must_use]
    pub fn properties(&self) -> &[(String, String)] {
        &self.properties
    }

    /// Appends a document property.
    pub fn add_property(&mut self, name: &str, value: &str) {
        self.properties.push((name.to_string(), value.to_string()));
    }

    /// Removes every property with the given name. Unknown names no-op.
    pub fn remove_property(&mut self, name: &str) {
        self.properties.retain(|(k, _)| k != name);
    }

    /// Input-configuration repository.
    #[must_use]
    pub fn input_configuration(&self) -> &InputConfiguration {
        &self.input_configuration
    }

    /// Mutable input-configuration repository.
    pub fn input_configuration_mut(&mut self) -> &mut InputConfiguration {
        &mut self.input_configuration
    }

    /// Sensor-data repository.
    #[must_use]
    pub fn sensor_data(&self) -> &SensorDataRepository {
        &self.sensor_data
    }

    /// Mutable sensor-data repository.
    pub fn sensor_data_mut(&mut self) -> &mut SensorDataRepository {
        &mut self.sensor_data
    }

    /// Brush repository.
    #[must_use]
    pub fn brushes(&self) -> &Brushes {
        &self.brushes
    }

    /// Mutable brush repository.
    pub fn brushes_mut(&mut self) -> &mut Brushes {
        &mut self.brushes
    }

    /// The triple store.
    #[must_use]
    pub fn knowledge_graph(&self) -> &TripleStore {
        &self.knowledge_graph
    }

    /// Mutable triple store.
    pub fn knowledge_graph_mut(&mut self) -> &mut TripleStore {
        &mut self.knowledge_graph
    }

    /// Adds a triple statement.
    pub fn add_semantic_triple(&mut self, subject: &str, predicate: &str, object: &str) {
        self.knowledge_graph.add(subject, predicate, object);
    }

    /// Removes the first matching triple statement, if present.
    pub fn remove_semantic_triple(&mut self, subject: &str, predicate: &str, object: &str) {
        self.knowledge_graph
            .remove(&crate::semantics::SemanticTriple::new(subject, predicate, object));
    }

    /// Registers a stroke. Re-adding an id replaces the content.
    pub fn add_stroke(&mut self, stroke: Stroke) {
        if let Some(existing) = self
            .strokes
            .iter_mut()
            .find(|s| s.id().value() == stroke.id().value())
        {
            *existing = stroke;
        } else {
            self.strokes.push(stroke);
        }
    }

    /// Looks up a stroke by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn stroke_by_id(&self, id: UimId) -> Result<&Stroke, ModelError> {
        self.strokes
            .iter()
            .find(|s| s.id().value() == id.value())
            .ok_or_else(|| ModelError::NotFound {
                kind: "stroke",
                id: id.s_form(),
            })
    }

    /// Mutable stroke lookup by id.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn stroke_by_id_mut(&mut self, id: UimId) -> Result<&mut Stroke, ModelError> {
        self.strokes
            .iter_mut()
            .find(|s| s.id().value() == id.value())
            .ok_or_else(|| ModelError::NotFound {
                kind: "stroke",
                id: id.s_form(),
            })
    }

    /// Strokes in main-tree pre-order (the serialization order).
    #[must_use]
    pub fn strokes(&self) -> Vec<&Stroke> {
        let Some(tree) = &self.main_tree else {
            return Vec::new();
        };
        tree.stroke_ids()
            .iter()
            .filter_map(|id| self.stroke_by_id(*id).ok())
            .collect()
    }

    /// The main tree, once installed.
    #[must_use]
    pub fn main_tree(&self) -> Option<&InkTree> {
        self.main_tree.as_ref()
    }

    /// View trees in insertion order.
    #[must_use]
    pub fn views(&self) -> &[InkTree] {
        &self.views
    }

    /// The named tree (`"main"` or a view name).
    #[must_use]
    pub fn tree(&self, name: &str) -> Option<&InkTree> {
        if semantics::is_main_tree(name) {
            self.main_tree.as_ref()
        } else {
            self.views.iter().find(|v| v.name() == name)
        }
    }

    /// Looks up a view by name.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] on a miss.
    pub fn view(&self, name: &str) -> Result<&InkTree, ModelError> {
        self.views
            .iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| ModelError::NotFound {
                kind: "view",
                id: name.to_string(),
            })
    }

    /// True when a tree with the name exists.
    #[must_use]
    pub fn has_tree(&self, name: &str) -> bool {
        self.tree(name).is_some()
    }

    /// Adds a tree (main or view) and registers every reachable node URI.
    ///
    /// Main-tree stroke references must resolve in the stroke repository;
    /// view references must additionally point at strokes already present
    /// in the main tree.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidArgument`] when a tree of the name exists,
    /// [`ModelError::MissingStrokeInMainTree`] and
    /// [`ModelError::DuplicateUri`] per the checks above. The model is
    /// unchanged on error.
    pub fn add_tree(&mut self, mut tree: InkTree) -> Result<(), ModelError> {
        if semantics::is_main_tree(tree.name()) && tree.name().is_empty() {
            tree.set_name(semantics::CommonView::Main.name());
        }
        let name = tree.name().to_string();
        let main = semantics::is_main_tree(&name);
        if self.has_tree(&name) {
            return Err(ModelError::InvalidArgument(format!(
                "a tree named '{name}' is already assigned to the model"
            )));
        }

        // Cross-plane stroke checks before any mutation.
        let main_stroke_ids: Vec<u128> = self
            .main_tree
            .as_ref()
            .map(|t| t.stroke_ids().iter().map(|id| id.value()).collect())
            .unwrap_or_default();
        for id in tree.stroke_ids() {
            if main {
                self.stroke_by_id(id)?;
            } else if !main_stroke_ids.contains(&id.value()) {
                return Err(ModelError::MissingStrokeInMainTree {
                    id: id.s_form(),
                    tree: name.clone(),
                });
            }
        }

        let uris = self.collect_uris(&tree)?;
        for (uri, index) in uris {
            self.uri_registry.insert(
                uri,
                NodeRef {
                    tree: name.clone(),
                    index,
                },
            );
        }
        if main {
            self.main_tree = Some(tree);
        } else {
            self.views.push(tree);
        }
        Ok(())
    }

    /// Pre-computes the URIs a tree would register, rejecting duplicates.
    fn collect_uris(&self, tree: &InkTree) -> Result<Vec<(String, NodeIndex)>, ModelError> {
        let mut out = Vec::new();
        for (index, _) in tree.pre_order() {
            let uri = uri_of(tree, index).ok_or_else(|| {
                ModelError::Consistency(format!("unreachable node index in tree {}", tree.name()))
            })?;
            if self.uri_registry.contains_key(&uri) || out.iter().any(|(u, _)| *u == uri) {
                return Err(ModelError::DuplicateUri { uri });
            }
            out.push((uri, index));
        }
        Ok(out)
    }

    /// Removes a view tree with its URIs and node triples. Unknown names
    /// no-op.
    pub fn remove_view(&mut self, name: &str) {
        let Some(pos) = self.views.iter().position(|v| v.name() == name) else {
            return;
        };
        let view = self.views.remove(pos);
        for (index, _) in view.pre_order() {
            if let Some(uri) = uri_of(&view, index) {
                self.uri_registry.remove(&uri);
                let removed = self.knowledge_graph.remove_subject(&uri);
                if removed > 0 {
                    tracing::debug!(uri = %uri, removed, "dropped triples of removed view node");
                }
            }
        }
    }

    /// Canonical URI of a node.
    #[must_use]
    pub fn node_uri(&self, tree_name: &str, index: NodeIndex) -> Option<String> {
        let tree = self.tree(tree_name)?;
        uri_of(tree, index)
    }

    /// Resolves a registered URI to its node.
    #[must_use]
    pub fn node_by_uri(&self, uri: &str) -> Option<&NodeRef> {
        self.uri_registry.get(uri)
    }

    /// True when the URI is registered.
    #[must_use]
    pub fn is_registered(&self, uri: &str) -> bool {
        self.uri_registry.contains_key(uri)
    }

    /// Creates and attaches a group node in a registered tree.
    ///
    /// # Errors
    ///
    /// Propagates attach and registration failures; see [`Self::add_tree`].
    pub fn add_group(
        &mut self,
        tree_name: &str,
        parent: NodeIndex,
    ) -> Result<NodeIndex, ModelError> {
        let tree = self.tree_mut(tree_name)?;
        let node = tree.create_group();
        tree.attach(parent, node)?;
        self.register_node(tree_name, node)?;
        Ok(node)
    }

    /// Creates and attaches a stroke-reference node in a registered tree.
    ///
    /// # Errors
    ///
    /// [`ModelError::NotFound`] when the stroke id is unknown,
    /// [`ModelError::MissingStrokeInMainTree`] when a view references a
    /// stroke absent from the main tree, plus attach/registration failures.
    pub fn add_stroke_ref(
        &mut self,
        tree_name: &str,
        parent: NodeIndex,
        stroke_id: UimId,
        fragment: Option<Fragment>,
    ) -> Result<NodeIndex, ModelError> {
        self.stroke_by_id(stroke_id)?;
        let main = semantics::is_main_tree(tree_name);
        if !main {
            let in_main = self
                .main_tree
                .as_ref()
                .map(|t| {
                    t.stroke_ids()
                        .iter()
                        .any(|id| id.value() == stroke_id.value())
                })
                .unwrap_or(false);
            if !in_main {
                return Err(ModelError::MissingStrokeInMainTree {
                    id: stroke_id.s_form(),
                    tree: tree_name.to_string(),
                });
            }
        }
        let tree = self.tree_mut(tree_name)?;
        let node = tree.create_stroke_ref(stroke_id, fragment);
        tree.attach(parent, node)?;
        self.register_node(tree_name, node)?;
        Ok(node)
    }

    fn tree_mut(&mut self, name: &str) -> Result<&mut InkTree, ModelError> {
        if semantics::is_main_tree(name) {
            self.main_tree.as_mut().ok_or(ModelError::NotFound {
                kind: "tree",
                id: "main".to_string(),
            })
        } else {
            self.views
                .iter_mut()
                .find(|v| v.name() == name)
                .ok_or_else(|| ModelError::NotFound {
                    kind: "view",
                    id: name.to_string(),
                })
        }
    }

    fn register_node(&mut self, tree_name: &str, index: NodeIndex) -> Result<(), ModelError> {
        let tree = self.tree(tree_name).ok_or_else(|| ModelError::NotFound {
            kind: "tree",
            id: tree_name.to_string(),
        })?;
        let uri = uri_of(tree, index).ok_or_else(|| {
            ModelError::Consistency(format!("node index out of range in tree {tree_name}"))
        })?;
        if self.uri_registry.contains_key(&uri) {
            // Roll the attach back so failure leaves the model unchanged.
            if let Ok(tree) = self.tree_mut(tree_name) {
                tree.detach(index);
            }
            return Err(ModelError::DuplicateUri { uri });
        }
        tracing::trace!(uri = %uri, tree = tree_name, "registering ink node");
        self.uri_registry.insert(
            uri,
            NodeRef {
                tree: tree_name.to_string(),
                index,
            },
        );
        Ok(())
    }

    /// Removes a node (and its subtree) from a tree: URIs are unregistered,
    /// triples whose subject is a removed node's URI are dropped, and the
    /// subtree is detached.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] for an unknown tree.
    pub fn remove_node(&mut self, tree_name: &str, index: NodeIndex) -> Result<(), ModelError> {
        let tree = self.tree(tree_name).ok_or_else(|| ModelError::NotFound {
            kind: "tree",
            id: tree_name.to_string(),
        })?;
        let subtree = tree.subtree_indices(index);
        let uris: Vec<String> = subtree.iter().filter_map(|&i| uri_of(tree, i)).collect();
        for uri in &uris {
            self.uri_registry.remove(uri);
            self.knowledge_graph.remove_subject(uri);
        }
        self.tree_mut(tree_name)?.detach(index);
        Ok(())
    }

    /// Clones a group node, optionally with its stroke-ref children and
    /// recursively with its child groups. Triples of cloned nodes are
    /// re-subjected to the clone URIs when `clone_semantics` is set.
    ///
    /// The clone is attached under `target_parent` in the same tree.
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidArgument`] when `source` is not a group,
    /// plus attach/registration failures.
    pub fn clone_group(
        &mut self,
        tree_name: &str,
        source: NodeIndex,
        target_parent: NodeIndex,
        options: CloneOptions,
    ) -> Result<NodeIndex, ModelError> {
        let tree = self.tree(tree_name).ok_or_else(|| ModelError::NotFound {
            kind: "tree",
            id: tree_name.to_string(),
        })?;
        let source_node = tree
            .node(source)
            .ok_or_else(|| ModelError::InvalidArgument("source index out of range".to_string()))?;
        if !source_node.is_group() {
            return Err(ModelError::InvalidArgument(
                "clone source must be a group node".to_string(),
            ));
        }
        let source_uri = uri_of(tree, source);
        let child_info: Vec<(NodeIndex, bool, Option<String>, UimId, Option<Fragment>)> =
            source_node
                .children()
                .iter()
                .filter_map(|&c| tree.node(c).map(|n| (c, n)))
                .map(|(c, n)| (c, n.is_group(), uri_of(tree, c), n.id(), n.fragment()))
                .collect();

        let clone = {
            let tree = self.tree_mut(tree_name)?;
            let clone = tree.create_group();
            tree.attach(target_parent, clone)?;
            clone
        };
        self.register_node(tree_name, clone)?;

        if options.clone_semantics {
            if let Some(source_uri) = source_uri {
                self.copy_triples(&source_uri, tree_name, clone);
            }
        }

        for (child, is_group, child_uri, child_id, fragment) in &child_info {
            if *is_group {
                if options.clone_child_groups {
                    self.clone_group(tree_name, *child, clone, options)?;
                }
            } else if options.clone_stroke_refs {
                let new_child = self.add_stroke_ref(tree_name, clone, *child_id, *fragment)?;
                if options.clone_semantics {
                    if let Some(child_uri) = child_uri {
                        self.copy_triples(child_uri, tree_name, new_child);
                    }
                }
            }
        }
        Ok(clone)
    }

    fn copy_triples(&mut self, source_uri: &str, tree_name: &str, target: NodeIndex) {
        let Some(target_uri) = self.node_uri(tree_name, target) else {
            return;
        };
        let copies: Vec<(String, String)> = self
            .knowledge_graph
            .filter(Some(source_uri), None, None)
            .iter()
            .map(|t| (t.predicate.clone(), t.object.clone()))
            .collect();
        for (predicate, object) in copies {
            self.knowledge_graph.add(&target_uri, &predicate, &object);
        }
    }

    /// Recomputes a node's bounding box as the union of its descendants'.
    ///
    /// Stroke-ref boxes come from the referenced stroke's X/Y channels.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::NotFound`] for an unknown tree or index.
    pub fn calculate_bounds_recursively(
        &mut self,
        tree_name: &str,
        index: NodeIndex,
    ) -> Result<Option<BoundingBox>, ModelError> {
        let tree = self.tree(tree_name).ok_or_else(|| ModelError::NotFound {
            kind: "tree",
            id: tree_name.to_string(),
        })?;
        // Post-order over the subtree, computed iteratively on the reversed
        // pre-order.
        let order = tree.subtree_indices(index);
        let mut computed: HashMap<usize, Option<BoundingBox>> = HashMap::new();
        for &node_index in order.iter().rev() {
            let node = tree.node(node_index).ok_or(ModelError::NotFound {
                kind: "node",
                id: format!("{}", node_index.get()),
            })?;
            let bbox = if node.is_group() {
                node.children()
                    .iter()
                    .filter_map(|c| computed.get(&c.get()).copied().flatten())
                    .reduce(|a, b| a.union(&b))
            } else {
                self.stroke_by_id(node.id())
                    .ok()
                    .and_then(Stroke::bounding_box)
            };
            computed.insert(node_index.get(), bbox);
        }
        for &node_index in &order {
            let bbox = computed.get(&node_index.get()).copied().flatten();
            self.tree_mut(tree_name)?.set_bounds(node_index, bbox);
        }
        Ok(computed.get(&index.get()).copied().flatten())
    }

    /// The sensor channel of the given type serving a stroke, resolved
    /// through the stroke's sensor frame and its input context.
    #[must_use]
    pub fn sensor_channel(
        &self,
        stroke: &Stroke,
        sensor_type: SensorType,
    ) -> Option<&SensorChannel> {
        let frame = self.sensor_data.by_id(stroke.sensor_data_id?).ok()?;
        let input_ctx = self
            .input_configuration
            .input_context(frame.input_context_id())
            .ok()?;
        let sensor_ctx = self
            .input_configuration
            .sensor_context(input_ctx.sensor_context_id()?)
            .ok()?;
        sensor_ctx.channel_by_type(sensor_type).ok()
    }

    /// Samples of the given channel type for a stroke; empty when the
    /// stroke has no frame or the frame no such channel. Timestamps are
    /// absolute milliseconds.
    #[must_use]
    pub fn channel_data_values(&self, stroke: &Stroke, sensor_type: SensorType) -> Vec<f64> {
        let Some(channel) = self.sensor_channel(stroke, sensor_type) else {
            return Vec::new();
        };
        let channel_id = channel.id();
        let Some(frame_id) = stroke.sensor_data_id else {
            return Vec::new();
        };
        self.sensor_data
            .by_id(frame_id)
            .ok()
            .and_then(|frame| frame.channel_values(channel_id))
            .map(<[f64]>::to_vec)
            .unwrap_or_default()
    }

    /// Strided export of one stroke.
    ///
    /// The result interleaves the requested attributes per spline point
    /// (stride = layout length). `Ok(None)` means the stroke was skipped
    /// under [`MissingDataPolicy::SkipStroke`].
    ///
    /// # Errors
    ///
    /// [`ModelError::InvalidArgument`] when the layout misses X or Y, or
    /// data is missing under [`MissingDataPolicy::Throw`].
    pub fn stroke_as_strided_array(
        &self,
        stroke: &Stroke,
        layout: &[StrokeAttribute],
        policy: MissingDataPolicy,
    ) -> Result<Option<Vec<f64>>, ModelError> {
        if !layout.contains(&StrokeAttribute::SplineX) || !layout.contains(&StrokeAttribute::SplineY)
        {
            return Err(ModelError::InvalidArgument(
                "strided layout requires the X and Y attributes".to_string(),
            ));
        }
        let mut sensor_cache: HashMap<SensorType, Vec<f64>> = HashMap::new();
        for attribute in layout {
            if let Some(sensor_type) = attribute.sensor_type() {
                sensor_cache.insert(sensor_type, self.channel_data_values(stroke, sensor_type));
            }
        }

        let count = stroke.point_count();
        let mut out = Vec::with_capacity(count * layout.len());
        for i in 0..count {
            for attribute in layout {
                let value = if attribute.is_spline() {
                    stroke.spline_value(*attribute, i)
                } else {
                    let sensor_type = attribute.sensor_type().unwrap_or(SensorType::Timestamp);
                    let values = &sensor_cache[&sensor_type];
                    let sample = stroke
                        .sensor_data_mapping
                        .get(i)
                        .copied()
                        .map_or_else(|| i + stroke.sensor_data_offset as usize, |m| m as usize);
                    values.get(sample).copied()
                };
                match value {
                    Some(v) => out.push(v),
                    None => match policy {
                        MissingDataPolicy::FillWithZeros => out.push(0.0),
                        MissingDataPolicy::FillWithNan => out.push(f64::NAN),
                        MissingDataPolicy::SkipStroke => return Ok(None),
                        MissingDataPolicy::Throw => {
                            return Err(ModelError::InvalidArgument(format!(
                                "stroke {} provides no {attribute:?} at point {i}",
                                stroke.id()
                            )))
                        }
                    },
                }
            }
        }
        Ok(Some(out))
    }

    /// Strided export of every main-tree stroke, skipping strokes the
    /// policy drops.
    ///
    /// # Errors
    ///
    /// Propagates [`Self::stroke_as_strided_array`] failures.
    pub fn strokes_as_strided_arrays(
        &self,
        layout: &[StrokeAttribute],
        policy: MissingDataPolicy,
    ) -> Result<Vec<Vec<f64>>, ModelError> {
        let mut out = Vec::new();
        for stroke in self.strokes() {
            if let Some(row) = self.stroke_as_strided_array(stroke, layout, policy)? {
                out.push(row);
            }
        }
        Ok(out)
    }

    /// Validates the five cross-plane invariants.
    ///
    /// # Errors
    ///
    /// Returns [`ModelError::Consistency`] (or the more specific variants)
    /// naming the first violation found.
    pub fn validate(&self) -> Result<(), ModelError> {
        // Every stroke referenced by any tree exists in the main tree.
        let main_ids: Vec<u128> = self
            .main_tree
            .as_ref()
            .map(|t| t.stroke_ids().iter().map(|id| id.value()).collect())
            .unwrap_or_default();
        if let Some(main) = &self.main_tree {
            for id in main.stroke_ids() {
                self.stroke_by_id(id)?;
            }
        }
        for view in &self.views {
            for id in view.stroke_ids() {
                if !main_ids.contains(&id.value()) {
                    return Err(ModelError::MissingStrokeInMainTree {
                        id: id.s_form(),
                        tree: view.name().to_string(),
                    });
                }
            }
        }

        // Reachable node URIs are unique across all trees.
        let mut seen: HashMap<String, ()> = HashMap::new();
        for tree in self.main_tree.iter().chain(self.views.iter()) {
            for (index, _) in tree.pre_order() {
                let uri = uri_of(tree, index).ok_or_else(|| {
                    ModelError::Consistency(format!("dangling node in tree {}", tree.name()))
                })?;
                if seen.insert(uri.clone(), ()).is_some() {
                    return Err(ModelError::DuplicateUri { uri });
                }
            }
        }

        // Stroke sensor references resolve in the repository.
        for stroke in &self.strokes {
            if let Some(frame_id) = stroke.sensor_data_id {
                self.sensor_data.by_id(frame_id)?;
            }
        }

        // Frames reference live input contexts and their channels belong to
        // the referenced context.
        for frame in self.sensor_data.frames() {
            let input_ctx = self
                .input_configuration
                .input_context(frame.input_context_id())?;
            if let Some(sensor_ctx_id) = input_ctx.sensor_context_id() {
                let sensor_ctx = self.input_configuration.sensor_context(sensor_ctx_id)?;
                for channel_data in frame.channels() {
                    let channel = sensor_ctx.channel_by_id(channel_data.sensor_channel_id())?;
                    crate::sensor::check_channel_bounds(channel, channel_data.values())?;
                }
            }
        }

        // Content-addressed ids match their current components.
        self.validate_hashes()?;

        // Triple subjects that are node URIs name registered nodes.
        for statement in self.knowledge_graph.statements() {
            let subject = statement.subject.as_str();
            let is_node_uri = subject.starts_with(semantics::URI_SCHEME)
                && !subject.starts_with("uim:ne/");
            if is_node_uri && !seen.contains_key(subject) {
                return Err(ModelError::Consistency(format!(
                    "triple subject {subject} does not name a registered node"
                )));
            }
        }
        Ok(())
    }

    fn validate_hashes(&self) -> Result<(), ModelError> {
        let stale = |kind: &str, stored: UimId, fresh: UimId| {
            ModelError::Consistency(format!(
                "{kind} id {} does not match its components (expected {})",
                stored.s_form(),
                fresh.s_form()
            ))
        };
        let config = &self.input_configuration;
        for e in config.environments() {
            if e.compute_id() != e.id() {
                return Err(stale("environment", e.id(), e.compute_id()));
            }
        }
        for p in config.providers() {
            if p.compute_id() != p.id() {
                return Err(stale("input provider", p.id(), p.compute_id()));
            }
        }
        for d in config.devices() {
            if d.compute_id() != d.id() {
                return Err(stale("input device", d.id(), d.compute_id()));
            }
        }
        for sc in config.sensor_contexts() {
            for cc in sc.channel_contexts() {
                for channel in cc.channels() {
                    if channel.compute_id() != channel.id() {
                        return Err(stale("sensor channel", channel.id(), channel.compute_id()));
                    }
                }
                if cc.compute_id() != cc.id() {
                    return Err(stale("channel context", cc.id(), cc.compute_id()));
                }
            }
            if sc.compute_id() != sc.id() {
                return Err(stale("sensor context", sc.id(), sc.compute_id()));
            }
        }
        for ic in config.input_contexts() {
            if ic.compute_id() != ic.id() {
                return Err(stale("input context", ic.id(), ic.compute_id()));
            }
        }
        for stroke in &self.strokes {
            let props = &stroke.style.properties;
            if props.compute_id() != props.id() {
                return Err(stale("path point properties", props.id(), props.compute_id()));
            }
        }
        Ok(())
    }

    /// Pre-order walk of a named tree; `None` for unknown names.
    #[must_use]
    pub fn pre_order<'a>(&'a self, tree_name: &str) -> Option<PreOrder<'a>> {
        self.tree(tree_name).map(InkTree::pre_order)
    }
}

/// URI of a node within its tree (root-awareness included).
fn uri_of(tree: &InkTree, index: NodeIndex) -> Option<String> {
    let node = tree.node(index)?;
    Some(semantics::node_uri(
        tree.name(),
        node,
        tree.root() == Some(index),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stroke::{LayoutMask, Spline, Style};

    fn stroke_with_points(points: &[(f32, f32)]) -> Stroke {
        let mask = LayoutMask::from_bits(LayoutMask::X | LayoutMask::Y);
        let data: Vec<f32> = points.iter().flat_map(|&(x, y)| [x, y]).collect();
        Stroke::from_spline(&Spline::new(mask, data), Style::default()).unwrap()
    }

    fn model_with_main(strokes: &[&Stroke]) -> InkModel {
        let mut model = InkModel::new();
        let mut main = InkTree::new("main");
        let root = main.create_group();
        main.set_root(root).unwrap();
        for stroke in strokes {
            model.add_stroke((*stroke).clone());
            let node = main.create_stroke_ref(stroke.id(), None);
            main.attach(root, node).unwrap();
        }
        model.add_tree(main).unwrap();
        model
    }

    #[test]
    fn view_requires_stroke_in_main_tree() {
        let s = stroke_with_points(&[(0.0, 0.0), (1.0, 1.0)]);
        let mut model = model_with_main(&[&s]);

        let mut view = InkTree::new("hwr");
        let root = view.create_group();
        view.set_root(root).unwrap();
        let foreign = view.create_stroke_ref(UimId::random(), None);
        view.attach(root, foreign).unwrap();
        let err = model.add_tree(view).unwrap_err();
        assert!(matches!(err, ModelError::MissingStrokeInMainTree { .. }));

        let mut view = InkTree::new("hwr");
        let root = view.create_group();
        view.set_root(root).unwrap();
        let ok = view.create_stroke_ref(s.id(), None);
        view.attach(root, ok).unwrap();
        model.add_tree(view).unwrap();
        assert!(model.view("hwr").is_ok());
        model.validate().unwrap();
    }

    #[test]
    fn duplicate_uris_are_rejected() {
        let s = stroke_with_points(&[(0.0, 0.0), (1.0, 1.0)]);
        let mut model = model_with_main(&[&s]);
        let mut view = InkTree::new("hwr");
        let root = view.create_group();
        view.set_root(root).unwrap();
        let a = view.create_stroke_ref(s.id(), None);
        let b = view.create_stroke_ref(s.id(), None);
        view.attach(root, a).unwrap();
        view.attach(root, b).unwrap();
        let err = model.add_tree(view).unwrap_err();
        assert!(matches!(err, ModelError::DuplicateUri { .. }));
    }

    #[test]
    fn removing_a_node_cascades_its_triples_only() {
        let s = stroke_with_points(&[(0.0, 0.0), (1.0, 1.0)]);
        let mut model = model_with_main(&[&s]);
        let mut view = InkTree::new("hwr");
        let root = view.create_group();
        view.set_root(root).unwrap();
        model.add_tree(view).unwrap();

        let root = model.view("hwr").unwrap().root().unwrap();
        let word = model.add_group("hwr", root).unwrap();
        let word_uri = model.node_uri("hwr", word).unwrap();
        model.add_semantic_triple(&word_uri, "@", "Word");
        model.add_semantic_triple(&word_uri, "hasContent", "ink");
        model.add_semantic_triple("uim:ne/other", "hasLabel", "keep me");

        model.remove_node("hwr", word).unwrap();
        assert_eq!(model.knowledge_graph().len(), 1);
        assert_eq!(model.knowledge_graph().statements()[0].object, "keep me");
        assert!(!model.is_registered(&word_uri));
    }

    #[test]
    fn clone_group_resubjects_triples() {
        let s = stroke_with_points(&[(0.0, 0.0), (1.0, 1.0)]);
        let mut model = model_with_main(&[&s]);
        let mut view = InkTree::new("hwr");
        let root = view.create_group();
        view.set_root(root).unwrap();
        model.add_tree(view).unwrap();
        let root = model.view("hwr").unwrap().root().unwrap();
        let word = model.add_group("hwr", root).unwrap();
        let word_uri = model.node_uri("hwr", word).unwrap();
        model.add_semantic_triple(&word_uri, "@", "Word");

        let clone = model
            .clone_group(
                "hwr",
                word,
                root,
                CloneOptions {
                    clone_semantics: true,
                    clone_stroke_refs: true,
                    clone_child_groups: false,
                },
            )
            .unwrap();
        let clone_uri = model.node_uri("hwr", clone).unwrap();
        assert_ne!(clone_uri, word_uri);
        assert_eq!(
            model
                .knowledge_graph()
                .filter(Some(&clone_uri), None, None)
                .len(),
            1
        );
        // source statements untouched
        assert_eq!(
            model
                .knowledge_graph()
                .filter(Some(&word_uri), None, None)
                .len(),
            1
        );
    }

    #[test]
    fn bounds_union_descendants() {
        let s1 = stroke_with_points(&[(0.0, 0.0), (10.0, 10.0)]);
        let s2 = stroke_with_points(&[(20.0, 20.0), (30.0, 40.0)]);
        let mut model = model_with_main(&[&s1, &s2]);
        let root = model.main_tree().unwrap().root().unwrap();
        let bbox = model
            .calculate_bounds_recursively("main", root)
            .unwrap()
            .unwrap();
        assert_eq!((bbox.x, bbox.y, bbox.width, bbox.height), (0.0, 0.0, 30.0, 40.0));
    }

    #[test]
    fn strided_export_requires_xy() {
        let s = stroke_with_points(&[(0.0, 0.0), (1.0, 1.0)]);
        let model = model_with_main(&[&s]);
        let err = model
            .stroke_as_strided_array(
                &s,
                &[StrokeAttribute::SplineX, StrokeAttribute::Size],
                MissingDataPolicy::FillWithZeros,
            )
            .unwrap_err();
        assert!(matches!(err, ModelError::InvalidArgument(_)));
    }

    #[test]
    fn strided_export_policies() {
        let s = stroke_with_points(&[(1.0, 2.0), (3.0, 4.0)]);
        let model = model_with_main(&[&s]);
        let layout = [
            StrokeAttribute::SplineX,
            StrokeAttribute::SplineY,
            StrokeAttribute::SensorPressure,
        ];

        let zeros = model
            .stroke_as_strided_array(&s, &layout, MissingDataPolicy::FillWithZeros)
            .unwrap()
            .unwrap();
        assert_eq!(zeros, vec![1.0, 2.0, 0.0, 3.0, 4.0, 0.0]);

        let nan = model
            .stroke_as_strided_array(&s, &layout, MissingDataPolicy::FillWithNan)
            .unwrap()
            .unwrap();
        assert!(nan[2].is_nan());

        assert!(model
            .stroke_as_strided_array(&s, &layout, MissingDataPolicy::SkipStroke)
            .unwrap()
            .is_none());

        assert!(model
            .stroke_as_strided_array(&s, &layout, MissingDataPolicy::Throw)
            .is_err());
    }

    #[test]
    fn validate_catches_stale_hash() {
        let mut model = InkModel::new();
        let mut env = crate::input::Environment::new(vec![("a".into(), "1".into())]);
        env.add_property("b", "2"); // mutated without regenerate
        model.input_configuration_mut().add_environment(env);
        assert!(matches!(
            model.validate(),
            Err(ModelError::Consistency(_))
        ));
    }
}
