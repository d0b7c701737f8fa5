// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire message shapes for the v3.1.0 section schemas.
//!
//! Hand-derived `prost` messages with fixed field tags, so the crate builds
//! without `protoc`. Field names mirror the published schema's JSON names;
//! tags are part of the format and must not change.
#![allow(missing_docs)]

/// Legacy v3.0.0 single-message schema.
pub mod legacy;

/// Input provider hardware kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum InputProviderKind {
    Pen = 0,
    Touch = 1,
    Mouse = 2,
    Controller = 3,
}

/// Channel metric kinds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum MetricKind {
    Length = 0,
    Time = 1,
    Force = 2,
    Angle = 3,
    Normalized = 4,
}

/// Capture states.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum InkState {
    Plane = 0,
    Hovering = 1,
    InVolume = 2,
    VolumeHovering = 3,
    StartTracking = 4,
    StopTracking = 5,
}

/// Raster-brush particle rotation modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum RotationMode {
    None = 0,
    Random = 1,
    Trajectory = 2,
}

/// Raster-brush blend modes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, ::prost::Enumeration)]
#[repr(i32)]
pub enum BlendMode {
    SourceOver = 0,
    DestinationOver = 1,
    DestinationOut = 2,
    Lighter = 3,
    Copy = 4,
    Min = 5,
    Max = 6,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Property {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(string, tag = "2")]
    pub value: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Properties {
    #[prost(message, repeated, tag = "1")]
    pub properties: Vec<Property>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Environment {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(message, repeated, tag = "2")]
    pub properties: Vec<Property>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InkInputProvider {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(enumeration = "InputProviderKind", tag = "2")]
    pub r#type: i32,
    #[prost(message, repeated, tag = "3")]
    pub properties: Vec<Property>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputDevice {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(message, repeated, tag = "2")]
    pub properties: Vec<Property>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorChannel {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(string, tag = "2")]
    pub r#type: String,
    #[prost(enumeration = "MetricKind", tag = "3")]
    pub metric: i32,
    #[prost(double, tag = "4")]
    pub resolution: f64,
    #[prost(float, tag = "5")]
    pub min: f32,
    #[prost(float, tag = "6")]
    pub max: f32,
    #[prost(uint32, tag = "7")]
    pub precision: u32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorChannelsContext {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(message, repeated, tag = "2")]
    pub channels: Vec<SensorChannel>,
    #[prost(uint32, tag = "3")]
    pub sampling_rate_hint: u32,
    #[prost(uint32, tag = "4")]
    pub latency: u32,
    #[prost(bytes = "vec", tag = "5")]
    pub ink_input_provider_id: Vec<u8>,
    #[prost(bytes = "vec", tag = "6")]
    pub input_device_id: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorContext {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(message, repeated, tag = "2")]
    pub sensor_channels_context: Vec<SensorChannelsContext>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputContext {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub environment_id: Vec<u8>,
    #[prost(bytes = "vec", tag = "3")]
    pub sensor_context_id: Vec<u8>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputContextData {
    #[prost(message, repeated, tag = "1")]
    pub input_contexts: Vec<InputContext>,
    #[prost(message, repeated, tag = "2")]
    pub ink_input_providers: Vec<InkInputProvider>,
    #[prost(message, repeated, tag = "3")]
    pub input_devices: Vec<InputDevice>,
    #[prost(message, repeated, tag = "4")]
    pub environments: Vec<Environment>,
    #[prost(message, repeated, tag = "5")]
    pub sensor_contexts: Vec<SensorContext>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ChannelData {
    #[prost(bytes = "vec", tag = "1")]
    pub sensor_channel_id: Vec<u8>,
    #[prost(sint64, repeated, tag = "2")]
    pub values: Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorData {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(bytes = "vec", tag = "2")]
    pub input_context_id: Vec<u8>,
    #[prost(enumeration = "InkState", tag = "3")]
    pub state: i32,
    #[prost(uint64, tag = "4")]
    pub timestamp: u64,
    #[prost(message, repeated, tag = "5")]
    pub data_channels: Vec<ChannelData>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputData {
    #[prost(message, optional, tag = "1")]
    pub input_context_data: Option<InputContextData>,
    #[prost(message, repeated, tag = "2")]
    pub sensor_data: Vec<SensorData>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct BrushPrototype {
    #[prost(float, repeated, tag = "1")]
    pub coord_x: Vec<f32>,
    #[prost(float, repeated, tag = "2")]
    pub coord_y: Vec<f32>,
    #[prost(float, repeated, tag = "3")]
    pub coord_z: Vec<f32>,
    #[prost(uint32, repeated, tag = "4")]
    pub indices: Vec<u32>,
    #[prost(string, tag = "5")]
    pub shape_uri: String,
    #[prost(float, tag = "6")]
    pub size: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct VectorBrush {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    pub prototype: Vec<BrushPrototype>,
    #[prost(float, tag = "3")]
    pub spacing: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct RasterBrush {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(float, tag = "2")]
    pub spacing: f32,
    #[prost(float, tag = "3")]
    pub scattering: f32,
    #[prost(enumeration = "RotationMode", tag = "4")]
    pub rotation_mode: i32,
    #[prost(bytes = "vec", repeated, tag = "5")]
    pub shape_texture: Vec<Vec<u8>>,
    #[prost(string, repeated, tag = "6")]
    pub shape_texture_uri: Vec<String>,
    #[prost(bytes = "vec", tag = "7")]
    pub fill_texture: Vec<u8>,
    #[prost(string, tag = "8")]
    pub fill_texture_uri: String,
    #[prost(float, tag = "9")]
    pub fill_width: f32,
    #[prost(float, tag = "10")]
    pub fill_height: f32,
    #[prost(bool, tag = "11")]
    pub randomize_fill: bool,
    #[prost(enumeration = "BlendMode", tag = "12")]
    pub blend_mode: i32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Brushes {
    #[prost(message, repeated, tag = "1")]
    pub vector_brushes: Vec<VectorBrush>,
    #[prost(message, repeated, tag = "2")]
    pub raster_brushes: Vec<RasterBrush>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PathPointProperties {
    /// Packed RGBA, one byte per component, red in the high byte.
    #[prost(int32, tag = "1")]
    pub color: i32,
    #[prost(float, tag = "2")]
    pub size: f32,
    #[prost(float, tag = "3")]
    pub rotation: f32,
    #[prost(float, tag = "4")]
    pub scale_x: f32,
    #[prost(float, tag = "5")]
    pub scale_y: f32,
    #[prost(float, tag = "6")]
    pub scale_z: f32,
    #[prost(float, tag = "7")]
    pub offset_x: f32,
    #[prost(float, tag = "8")]
    pub offset_y: f32,
    #[prost(float, tag = "9")]
    pub offset_z: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Matrix {
    #[prost(double, tag = "1")]
    pub m00: f64,
    #[prost(double, tag = "2")]
    pub m01: f64,
    #[prost(double, tag = "3")]
    pub m02: f64,
    #[prost(double, tag = "4")]
    pub m03: f64,
    #[prost(double, tag = "5")]
    pub m10: f64,
    #[prost(double, tag = "6")]
    pub m11: f64,
    #[prost(double, tag = "7")]
    pub m12: f64,
    #[prost(double, tag = "8")]
    pub m13: f64,
    #[prost(double, tag = "9")]
    pub m20: f64,
    #[prost(double, tag = "10")]
    pub m21: f64,
    #[prost(double, tag = "11")]
    pub m22: f64,
    #[prost(double, tag = "12")]
    pub m23: f64,
    #[prost(double, tag = "13")]
    pub m30: f64,
    #[prost(double, tag = "14")]
    pub m31: f64,
    #[prost(double, tag = "15")]
    pub m32: f64,
    #[prost(double, tag = "16")]
    pub m33: f64,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SplineData {
    #[prost(float, repeated, tag = "1")]
    pub spline_x: Vec<f32>,
    #[prost(float, repeated, tag = "2")]
    pub spline_y: Vec<f32>,
    #[prost(float, repeated, tag = "3")]
    pub spline_z: Vec<f32>,
    #[prost(float, repeated, tag = "4")]
    pub size: Vec<f32>,
    #[prost(float, repeated, tag = "5")]
    pub rotation: Vec<f32>,
    #[prost(uint32, repeated, tag = "6")]
    pub red: Vec<u32>,
    #[prost(uint32, repeated, tag = "7")]
    pub green: Vec<u32>,
    #[prost(uint32, repeated, tag = "8")]
    pub blue: Vec<u32>,
    #[prost(uint32, repeated, tag = "9")]
    pub alpha: Vec<u32>,
    #[prost(float, repeated, tag = "10")]
    pub scale_x: Vec<f32>,
    #[prost(float, repeated, tag = "11")]
    pub scale_y: Vec<f32>,
    #[prost(float, repeated, tag = "12")]
    pub scale_z: Vec<f32>,
    #[prost(float, repeated, tag = "13")]
    pub offset_x: Vec<f32>,
    #[prost(float, repeated, tag = "14")]
    pub offset_y: Vec<f32>,
    #[prost(float, repeated, tag = "15")]
    pub offset_z: Vec<f32>,
    #[prost(float, repeated, tag = "16")]
    pub tangent_x: Vec<f32>,
    #[prost(float, repeated, tag = "17")]
    pub tangent_y: Vec<f32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SplineCompressed {
    #[prost(sint64, repeated, tag = "1")]
    pub spline_x: Vec<i64>,
    #[prost(sint64, repeated, tag = "2")]
    pub spline_y: Vec<i64>,
    #[prost(sint64, repeated, tag = "3")]
    pub spline_z: Vec<i64>,
    #[prost(sint64, repeated, tag = "4")]
    pub size: Vec<i64>,
    #[prost(sint64, repeated, tag = "5")]
    pub rotation: Vec<i64>,
    #[prost(uint32, repeated, tag = "6")]
    pub red: Vec<u32>,
    #[prost(uint32, repeated, tag = "7")]
    pub green: Vec<u32>,
    #[prost(uint32, repeated, tag = "8")]
    pub blue: Vec<u32>,
    #[prost(uint32, repeated, tag = "9")]
    pub alpha: Vec<u32>,
    #[prost(sint64, repeated, tag = "10")]
    pub scale_x: Vec<i64>,
    #[prost(sint64, repeated, tag = "11")]
    pub scale_y: Vec<i64>,
    #[prost(sint64, repeated, tag = "12")]
    pub scale_z: Vec<i64>,
    #[prost(sint64, repeated, tag = "13")]
    pub offset_x: Vec<i64>,
    #[prost(sint64, repeated, tag = "14")]
    pub offset_y: Vec<i64>,
    #[prost(sint64, repeated, tag = "15")]
    pub offset_z: Vec<i64>,
    #[prost(sint64, repeated, tag = "16")]
    pub tangent_x: Vec<i64>,
    #[prost(sint64, repeated, tag = "17")]
    pub tangent_y: Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Stroke {
    #[prost(bytes = "vec", tag = "1")]
    pub id: Vec<u8>,
    #[prost(float, tag = "2")]
    pub start_parameter: f32,
    #[prost(float, tag = "3")]
    pub end_parameter: f32,
    #[prost(oneof = "stroke::Data", tags = "4, 5")]
    pub data: Option<stroke::Data>,
    #[prost(uint32, tag = "6")]
    pub precisions: u32,
    #[prost(bytes = "vec", tag = "7")]
    pub sensor_data_id: Vec<u8>,
    #[prost(uint32, tag = "8")]
    pub sensor_data_offset: u32,
    #[prost(uint32, repeated, tag = "9")]
    pub sensor_data_mapping: Vec<u32>,
    #[prost(uint32, tag = "10")]
    pub properties_index: u32,
    #[prost(uint32, tag = "11")]
    pub brush_uri_index: u32,
    #[prost(uint32, tag = "12")]
    pub render_mode_uri_index: u32,
    #[prost(uint32, tag = "13")]
    pub random_seed: u32,
}

pub mod stroke {
    /// Uncompressed or fixed-point spline payload.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Data {
        #[prost(message, tag = "4")]
        SplineData(super::SplineData),
        #[prost(message, tag = "5")]
        SplineCompressed(super::SplineCompressed),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InkData {
    #[prost(message, repeated, tag = "1")]
    pub strokes: Vec<Stroke>,
    #[prost(message, repeated, tag = "2")]
    pub properties: Vec<PathPointProperties>,
    #[prost(string, repeated, tag = "3")]
    pub brush_uris: Vec<String>,
    #[prost(string, repeated, tag = "4")]
    pub render_mode_uris: Vec<String>,
    #[prost(float, tag = "5")]
    pub unit_scale_factor: f32,
    #[prost(message, optional, tag = "6")]
    pub transform: Option<Matrix>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Rectangle {
    #[prost(float, tag = "1")]
    pub x: f32,
    #[prost(float, tag = "2")]
    pub y: f32,
    #[prost(float, tag = "3")]
    pub width: f32,
    #[prost(float, tag = "4")]
    pub height: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Interval {
    #[prost(uint32, tag = "1")]
    pub from_index: u32,
    #[prost(uint32, tag = "2")]
    pub to_index: u32,
    #[prost(float, tag = "3")]
    pub from_t_value: f32,
    #[prost(float, tag = "4")]
    pub to_t_value: f32,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Node {
    #[prost(uint32, tag = "1")]
    pub depth: u32,
    #[prost(oneof = "node::Id", tags = "2, 3")]
    pub id: Option<node::Id>,
    #[prost(message, optional, tag = "4")]
    pub bounds: Option<Rectangle>,
    #[prost(message, optional, tag = "5")]
    pub interval: Option<Interval>,
}

pub mod node {
    /// Group identity or stroke-table index.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Id {
        #[prost(bytes, tag = "2")]
        GroupId(Vec<u8>),
        #[prost(uint32, tag = "3")]
        Index(u32),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InkTree {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    pub tree: Vec<Node>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InkStructure {
    #[prost(message, optional, tag = "1")]
    pub ink_tree: Option<InkTree>,
    #[prost(message, repeated, tag = "2")]
    pub views: Vec<InkTree>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Statement {
    #[prost(string, tag = "1")]
    pub subject: String,
    #[prost(string, tag = "2")]
    pub predicate: String,
    #[prost(string, tag = "3")]
    pub object: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TripleStore {
    #[prost(message, repeated, tag = "1")]
    pub statements: Vec<Statement>,
}
