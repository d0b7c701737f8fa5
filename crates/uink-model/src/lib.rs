// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! uink-model: in-memory data model for Universal Ink Model documents.
//!
//! A UIM document couples four data planes: raw per-sample sensor streams
//! with device/channel provenance, rendered stroke geometry (Catmull-Rom
//! splines with per-point visual attributes), logical trees grouping strokes
//! into regions, and an RDF-style triple store attaching meaning to tree
//! nodes. This crate owns the mutable aggregate and the invariants that keep
//! those planes consistent; the wire codec lives in `uink-codec`.
//!
//! # Identity
//!
//! Two identifier kinds exist side by side (see [`UimId`]): random 128-bit
//! ids for mutable leaves (strokes, sensor frames, tree nodes) and
//! content-addressed ids for value objects (environments, devices, channels,
//! contexts, path-point properties). Equal value objects hash to the same id
//! anywhere in any model — repositories rely on this for idempotent inserts.
//!
//! # Thread safety
//!
//! An [`InkModel`] is a plain mutable aggregate with no interior
//! synchronization. Concurrent read-only traversal is safe as long as no
//! thread mutates; concurrent mutation is not supported.
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

mod brush;
mod error;
mod ident;
mod input;
mod matrix;
mod model;
mod precision;
mod sensor;
mod stroke;
mod tree;
mod units;

/// Semantic triple store, URI scheme, and schema vocabularies.
pub mod semantics;

pub use brush::{
    BlendMode, BrushPrototype, Brushes, RasterBrush, RasterTexture, RotationMode, VectorBrush,
};
pub use error::ModelError;
pub use ident::{canonical_float, HashBuilder, UimId};
pub use input::{
    DataType, Environment, InkInputProvider, InputConfiguration, InputContext, InputDevice,
    InputProviderKind, MetricKind, SensorChannel, SensorChannelsContext, SensorContext, SensorType,
};
pub use matrix::Matrix4;
pub use model::{CloneOptions, InkModel, NodeRef};
pub use precision::PrecisionScheme;
pub use sensor::{check_channel_bounds, ChannelData, InkState, SensorData, SensorDataRepository};
pub use stroke::{
    color_byte_to_float, color_float_to_byte, LayoutMask, MissingDataPolicy, PathPointProperties,
    Spline, Stroke, StrokeAttribute, Style, DEFAULT_RENDER_MODE_URI,
};
pub use tree::{BoundingBox, Fragment, InkNode, InkTree, NodeIndex, NodeKind, PreOrder};
pub use units::{convert, si_unit, virtual_resolution, Unit};
