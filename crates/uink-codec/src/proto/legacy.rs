// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Wire message shapes for the legacy v3.0.0 schema.
//!
//! Version 3.0.0 carried the whole document as a single `InkObject` message
//! inside the `DATA` chunk. Identifiers travel as S-form strings, stroke
//! styles are inline (no palette tables), and splines are stored
//! uncompressed. The decoder maps everything into the 3.1.0 in-memory
//! shape.
#![allow(missing_docs)]

use super::{Interval, Matrix, Property, Rectangle, Statement};

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Environment {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, repeated, tag = "2")]
    pub properties: Vec<Property>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InkInputProvider {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(enumeration = "super::InputProviderKind", tag = "2")]
    pub r#type: i32,
    #[prost(message, repeated, tag = "3")]
    pub properties: Vec<Property>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputDevice {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, repeated, tag = "2")]
    pub properties: Vec<Property>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorChannel {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub r#type: String,
    #[prost(enumeration = "super::MetricKind", tag = "3")]
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
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, repeated, tag = "2")]
    pub channels: Vec<SensorChannel>,
    #[prost(uint32, tag = "3")]
    pub sampling_rate_hint: u32,
    #[prost(uint32, tag = "4")]
    pub latency: u32,
    #[prost(string, tag = "5")]
    pub ink_input_provider_id: String,
    #[prost(string, tag = "6")]
    pub input_device_id: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorContext {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(message, repeated, tag = "2")]
    pub sensor_channels_context: Vec<SensorChannelsContext>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InputContext {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub environment_id: String,
    #[prost(string, tag = "3")]
    pub sensor_context_id: String,
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
    #[prost(string, tag = "1")]
    pub sensor_channel_id: String,
    #[prost(sint64, repeated, tag = "2")]
    pub values: Vec<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SensorData {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(string, tag = "2")]
    pub input_context_id: String,
    #[prost(enumeration = "super::InkState", tag = "3")]
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
pub struct PathPointProperties {
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
pub struct Style {
    #[prost(message, optional, tag = "1")]
    pub properties: Option<PathPointProperties>,
    #[prost(string, tag = "2")]
    pub brush_uri: String,
    #[prost(uint32, tag = "3")]
    pub particles_random_seed: u32,
    #[prost(string, tag = "4")]
    pub render_mode_uri: String,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Stroke {
    #[prost(string, tag = "1")]
    pub id: String,
    #[prost(float, tag = "2")]
    pub start_parameter: f32,
    #[prost(float, tag = "3")]
    pub end_parameter: f32,
    #[prost(message, optional, tag = "4")]
    pub spline_data: Option<super::SplineData>,
    #[prost(message, optional, tag = "5")]
    pub style: Option<Style>,
    #[prost(string, tag = "6")]
    pub sensor_data_id: String,
    #[prost(uint32, tag = "7")]
    pub sensor_data_offset: u32,
    #[prost(uint32, repeated, tag = "8")]
    pub sensor_data_mapping: Vec<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InkData {
    #[prost(message, repeated, tag = "1")]
    pub strokes: Vec<Stroke>,
    #[prost(float, tag = "2")]
    pub unit_scale_factor: f32,
    #[prost(message, optional, tag = "3")]
    pub transform: Option<Matrix>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Brushes {
    #[prost(message, repeated, tag = "1")]
    pub vector_brushes: Vec<super::VectorBrush>,
    #[prost(message, repeated, tag = "2")]
    pub raster_brushes: Vec<super::RasterBrush>,
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
    /// Group identity (S-form string) or stroke-table index.
    #[derive(Clone, PartialEq, ::prost::Oneof)]
    pub enum Id {
        #[prost(string, tag = "2")]
        GroupId(String),
        #[prost(uint32, tag = "3")]
        Index(u32),
    }
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct View {
    #[prost(string, tag = "1")]
    pub name: String,
    #[prost(message, repeated, tag = "2")]
    pub tree: Vec<Node>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct KnowledgeGraph {
    #[prost(message, repeated, tag = "1")]
    pub statements: Vec<Statement>,
}

/// The whole 3.0.0 document.
#[derive(Clone, PartialEq, ::prost::Message)]
pub struct InkObject {
    #[prost(message, repeated, tag = "1")]
    pub properties: Vec<Property>,
    #[prost(message, optional, tag = "2")]
    pub input_data: Option<InputData>,
    #[prost(message, optional, tag = "3")]
    pub brushes: Option<Brushes>,
    #[prost(message, optional, tag = "4")]
    pub ink_data: Option<InkData>,
    #[prost(message, optional, tag = "5")]
    pub knowledge_graph: Option<KnowledgeGraph>,
    #[prost(message, repeated, tag = "6")]
    pub ink_tree: Vec<Node>,
    #[prost(message, repeated, tag = "7")]
    pub views: Vec<View>,
}
