// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Read-only protobuf-JSON surface.
//!
//! Accepts a 3.1.0 document rendered as protobuf-JSON: one object with the
//! section fields (`properties`, `inputData`, `brushes`, `inkData`,
//! `knowledgeGraph`, `inkStructure`), camelCase field names, identifiers as
//! S-/H-form strings, texture bytes as base64, enums by name. The sections
//! are lifted into the binary wire messages and flow through the same
//! decoder as a binary file.

use std::path::Path;

use base64::Engine as _;
use prost::Message;
use serde_json::Value;

use uink_model::{InkModel, UimId};

use crate::error::CodecError;
use crate::head::{
    Compression, CHUNK_BRUSHES, CHUNK_INK_DATA, CHUNK_INK_STRUCTURE, CHUNK_INPUT_DATA,
    CHUNK_KNOWLEDGE, CHUNK_PROPERTIES,
};
use crate::{decode_v310, proto, DecodeOptions};

/// Parses a protobuf-JSON UIM document from a file.
///
/// # Errors
///
/// [`CodecError::Format`] on I/O failures, malformed JSON, or malformed
/// field content; consistency failures as in [`crate::parse`].
pub fn parse_json(path: &Path) -> Result<InkModel, CodecError> {
    let bytes = std::fs::read(path)
        .map_err(|e| CodecError::format("json", format!("{}: {e}", path.display())))?;
    parse_json_bytes(&bytes)
}

/// Parses a protobuf-JSON UIM document from bytes.
///
/// # Errors
///
/// See [`parse_json`].
pub fn parse_json_bytes(data: &[u8]) -> Result<InkModel, CodecError> {
    let document: Value = serde_json::from_slice(data)
        .map_err(|e| CodecError::format("json", e.to_string()))?;
    let root = document
        .as_object()
        .ok_or_else(|| CodecError::format("json", "document root must be an object"))?;

    let mut sections: Vec<([u8; 4], Vec<u8>)> = Vec::new();
    if let Some(value) = root.get("properties") {
        sections.push((CHUNK_PROPERTIES, properties_message(value)?.encode_to_vec()));
    }
    if let Some(value) = root.get("inputData") {
        sections.push((CHUNK_INPUT_DATA, input_data_message(value)?.encode_to_vec()));
    }
    if let Some(value) = root.get("brushes") {
        sections.push((CHUNK_BRUSHES, brushes_message(value)?.encode_to_vec()));
    }
    if let Some(value) = root.get("inkData") {
        sections.push((CHUNK_INK_DATA, ink_data_message(value)?.encode_to_vec()));
    }
    if let Some(value) = root.get("knowledgeGraph") {
        sections.push((CHUNK_KNOWLEDGE, knowledge_message(value)?.encode_to_vec()));
    }
    if let Some(value) = root.get("inkStructure") {
        sections.push((CHUNK_INK_STRUCTURE, structure_message(value)?.encode_to_vec()));
    }

    decode_v310::decode_body(&sections, Compression::None, DecodeOptions::default())
}

// --- field access helpers -------------------------------------------------

fn field<'a>(value: &'a Value, names: &[&str]) -> Option<&'a Value> {
    names.iter().find_map(|n| value.get(n))
}

fn str_field(value: &Value, names: &[&str]) -> String {
    field(value, names)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

fn f32_field(value: &Value, names: &[&str]) -> f32 {
    field(value, names).and_then(Value::as_f64).unwrap_or(0.0) as f32
}

fn f64_field(value: &Value, names: &[&str]) -> f64 {
    field(value, names).and_then(Value::as_f64).unwrap_or(0.0)
}

fn u32_field(value: &Value, names: &[&str]) -> u32 {
    field(value, names).and_then(Value::as_u64).unwrap_or(0) as u32
}

fn u64_field(value: &Value, names: &[&str]) -> u64 {
    field(value, names)
        .and_then(|v| {
            v.as_u64()
                .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
        })
        .unwrap_or(0)
}

fn i32_field(value: &Value, names: &[&str]) -> i32 {
    field(value, names).and_then(Value::as_i64).unwrap_or(0) as i32
}

fn array<'a>(value: &'a Value, names: &[&str]) -> impl Iterator<Item = &'a Value> {
    field(value, names)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
        .iter()
}

fn f32_array(value: &Value, names: &[&str]) -> Vec<f32> {
    array(value, names)
        .filter_map(Value::as_f64)
        .map(|v| v as f32)
        .collect()
}

fn i64_array(value: &Value, names: &[&str]) -> Vec<i64> {
    array(value, names).filter_map(Value::as_i64).collect()
}

fn u32_array(value: &Value, names: &[&str]) -> Vec<u32> {
    array(value, names)
        .filter_map(Value::as_u64)
        .map(|v| v as u32)
        .collect()
}

fn id_field(value: &Value, names: &[&str]) -> Result<Vec<u8>, CodecError> {
    let text = str_field(value, names);
    if text.is_empty() {
        return Ok(Vec::new());
    }
    UimId::parse_random(&text)
        .map(|id| id.to_bytes().to_vec())
        .map_err(|e| CodecError::format("json", e.to_string()))
}

fn base64_field(value: &Value, names: &[&str]) -> Result<Vec<u8>, CodecError> {
    let text = str_field(value, names);
    if text.is_empty() {
        return Ok(Vec::new());
    }
    base64::engine::general_purpose::STANDARD
        .decode(text)
        .map_err(|e| CodecError::format("json", e.to_string()))
}

fn enum_field(value: &Value, names: &[&str], mapping: &[(&str, i32)]) -> i32 {
    match field(value, names) {
        Some(Value::String(name)) => mapping
            .iter()
            .find(|(n, _)| n.eq_ignore_ascii_case(name))
            .map_or(0, |(_, v)| *v),
        Some(other) => other.as_i64().map_or(0, |v| v as i32),
        None => 0,
    }
}

fn properties_list(value: &Value, names: &[&str]) -> Vec<proto::Property> {
    array(value, names)
        .map(|p| proto::Property {
            name: str_field(p, &["name"]),
            value: str_field(p, &["value"]),
        })
        .collect()
}

// --- section builders -----------------------------------------------------

fn properties_message(value: &Value) -> Result<proto::Properties, CodecError> {
    // Either {"properties": [...]} or a bare list.
    let items: &[Value] = value
        .as_array()
        .map(Vec::as_slice)
        .or_else(|| field(value, &["properties"]).and_then(Value::as_array).map(Vec::as_slice))
        .unwrap_or(&[]);
    Ok(proto::Properties {
        properties: items
            .iter()
            .map(|p| proto::Property {
                name: str_field(p, &["name"]),
                value: str_field(p, &["value"]),
            })
            .collect(),
    })
}

const STATE_NAMES: &[(&str, i32)] = &[
    ("PLANE", 0),
    ("HOVERING", 1),
    ("IN_VOLUME", 2),
    ("VOLUME_HOVERING", 3),
    ("START_TRACKING", 4),
    ("STOP_TRACKING", 5),
];

const METRIC_NAMES: &[(&str, i32)] = &[
    ("LENGTH", 0),
    ("TIME", 1),
    ("FORCE", 2),
    ("ANGLE", 3),
    ("NORMALIZED", 4),
];

const PROVIDER_NAMES: &[(&str, i32)] =
    &[("PEN", 0), ("TOUCH", 1), ("MOUSE", 2), ("CONTROLLER", 3)];

const ROTATION_NAMES: &[(&str, i32)] = &[("NONE", 0), ("RANDOM", 1), ("TRAJECTORY", 2)];

const BLEND_NAMES: &[(&str, i32)] = &[
    ("SOURCE_OVER", 0),
    ("DESTINATION_OVER", 1),
    ("DESTINATION_OUT", 2),
    ("LIGHTER", 3),
    ("COPY", 4),
    ("MIN", 5),
    ("MAX", 6),
];

fn input_data_message(value: &Value) -> Result<proto::InputData, CodecError> {
    let mut message = proto::InputData::default();
    if let Some(data) = field(value, &["inputContextData"]) {
        let mut out = proto::InputContextData::default();
        for ctx in array(data, &["inputContexts"]) {
            out.input_contexts.push(proto::InputContext {
                id: id_field(ctx, &["id"])?,
                environment_id: id_field(ctx, &["environmentID", "environmentId"])?,
                sensor_context_id: id_field(ctx, &["sensorContextID", "sensorContextId"])?,
            });
        }
        for provider in array(data, &["inkInputProviders"]) {
            out.ink_input_providers.push(proto::InkInputProvider {
                id: id_field(provider, &["id"])?,
                r#type: enum_field(provider, &["type"], PROVIDER_NAMES),
                properties: properties_list(provider, &["properties"]),
            });
        }
        for device in array(data, &["inputDevices"]) {
            out.input_devices.push(proto::InputDevice {
                id: id_field(device, &["id"])?,
                properties: properties_list(device, &["properties"]),
            });
        }
        for env in array(data, &["environments"]) {
            out.environments.push(proto::Environment {
                id: id_field(env, &["id"])?,
                properties: properties_list(env, &["properties"]),
            });
        }
        for sensor_ctx in array(data, &["sensorContexts"]) {
            let mut ctx_message = proto::SensorContext {
                id: id_field(sensor_ctx, &["id"])?,
                sensor_channels_context: Vec::new(),
            };
            for cc in array(sensor_ctx, &["sensorChannelsContext", "sensorChannelsContexts"]) {
                let mut cc_message = proto::SensorChannelsContext {
                    id: id_field(cc, &["id"])?,
                    channels: Vec::new(),
                    sampling_rate_hint: u32_field(cc, &["samplingRateHint"]),
                    latency: u32_field(cc, &["latency"]),
                    ink_input_provider_id: id_field(
                        cc,
                        &["inkInputProviderID", "inkInputProviderId"],
                    )?,
                    input_device_id: id_field(cc, &["inputDeviceID", "inputDeviceId"])?,
                };
                for channel in array(cc, &["channels"]) {
                    cc_message.channels.push(proto::SensorChannel {
                        id: id_field(channel, &["id"])?,
                        r#type: str_field(channel, &["type"]),
                        metric: enum_field(channel, &["metric"], METRIC_NAMES),
                        resolution: f64_field(channel, &["resolution"]),
                        min: f32_field(channel, &["min"]),
                        max: f32_field(channel, &["max"]),
                        precision: u32_field(channel, &["precision"]),
                    });
                }
                ctx_message.sensor_channels_context.push(cc_message);
            }
            out.sensor_contexts.push(ctx_message);
        }
        message.input_context_data = Some(out);
    }
    for frame in array(value, &["sensorData"]) {
        let mut frame_message = proto::SensorData {
            id: id_field(frame, &["id"])?,
            input_context_id: id_field(frame, &["inputContextID", "inputContextId"])?,
            state: enum_field(frame, &["state"], STATE_NAMES),
            timestamp: u64_field(frame, &["timestamp"]),
            data_channels: Vec::new(),
        };
        for channel in array(frame, &["dataChannels"]) {
            frame_message.data_channels.push(proto::ChannelData {
                sensor_channel_id: id_field(channel, &["sensorChannelID", "sensorChannelId"])?,
                values: i64_array(channel, &["values"]),
            });
        }
        message.sensor_data.push(frame_message);
    }
    Ok(message)
}

fn brushes_message(value: &Value) -> Result<proto::Brushes, CodecError> {
    let mut message = proto::Brushes::default();
    for brush in array(value, &["vectorBrushes"]) {
        let mut out = proto::VectorBrush {
            name: str_field(brush, &["name"]),
            prototype: Vec::new(),
            spacing: f32_field(brush, &["spacing"]),
        };
        for prototype in array(brush, &["prototype", "prototypes"]) {
            out.prototype.push(proto::BrushPrototype {
                coord_x: f32_array(prototype, &["coordX"]),
                coord_y: f32_array(prototype, &["coordY"]),
                coord_z: f32_array(prototype, &["coordZ"]),
                indices: u32_array(prototype, &["indices"]),
                shape_uri: str_field(prototype, &["shapeURI", "shapeUri"]),
                size: f32_field(prototype, &["size"]),
            });
        }
        message.vector_brushes.push(out);
    }
    for brush in array(value, &["rasterBrushes"]) {
        let mut shape_texture = Vec::new();
        for texture in array(brush, &["shapeTexture"]) {
            shape_texture.push(
                base64::engine::general_purpose::STANDARD
                    .decode(texture.as_str().unwrap_or_default())
                    .map_err(|e| CodecError::format("json", e.to_string()))?,
            );
        }
        let shape_texture_uri = array(brush, &["shapeTextureURI", "shapeTextureUri"])
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect();
        message.raster_brushes.push(proto::RasterBrush {
            name: str_field(brush, &["name"]),
            spacing: f32_field(brush, &["spacing"]),
            scattering: f32_field(brush, &["scattering"]),
            rotation_mode: enum_field(brush, &["rotationMode"], ROTATION_NAMES),
            shape_texture,
            shape_texture_uri,
            fill_texture: base64_field(brush, &["fillTexture"])?,
            fill_texture_uri: str_field(brush, &["fillTextureURI", "fillTextureUri"]),
            fill_width: f32_field(brush, &["fillWidth"]),
            fill_height: f32_field(brush, &["fillHeight"]),
            randomize_fill: field(brush, &["randomizeFill"])
                .and_then(Value::as_bool)
                .unwrap_or(false),
            blend_mode: enum_field(brush, &["blendMode"], BLEND_NAMES),
        });
    }
    Ok(message)
}

fn spline_data(value: &Value) -> proto::SplineData {
    proto::SplineData {
        spline_x: f32_array(value, &["splineX"]),
        spline_y: f32_array(value, &["splineY"]),
        spline_z: f32_array(value, &["splineZ"]),
        size: f32_array(value, &["size"]),
        rotation: f32_array(value, &["rotation"]),
        red: u32_array(value, &["red"]),
        green: u32_array(value, &["green"]),
        blue: u32_array(value, &["blue"]),
        alpha: u32_array(value, &["alpha"]),
        scale_x: f32_array(value, &["scaleX"]),
        scale_y: f32_array(value, &["scaleY"]),
        scale_z: f32_array(value, &["scaleZ"]),
        offset_x: f32_array(value, &["offsetX"]),
        offset_y: f32_array(value, &["offsetY"]),
        offset_z: f32_array(value, &["offsetZ"]),
        tangent_x: f32_array(value, &["tangentX"]),
        tangent_y: f32_array(value, &["tangentY"]),
    }
}

fn spline_compressed(value: &Value) -> proto::SplineCompressed {
    proto::SplineCompressed {
        spline_x: i64_array(value, &["splineX"]),
        spline_y: i64_array(value, &["splineY"]),
        spline_z: i64_array(value, &["splineZ"]),
        size: i64_array(value, &["size"]),
        rotation: i64_array(value, &["rotation"]),
        red: u32_array(value, &["red"]),
        green: u32_array(value, &["green"]),
        blue: u32_array(value, &["blue"]),
        alpha: u32_array(value, &["alpha"]),
        scale_x: i64_array(value, &["scaleX"]),
        scale_y: i64_array(value, &["scaleY"]),
        scale_z: i64_array(value, &["scaleZ"]),
        offset_x: i64_array(value, &["offsetX"]),
        offset_y: i64_array(value, &["offsetY"]),
        offset_z: i64_array(value, &["offsetZ"]),
        tangent_x: i64_array(value, &["tangentX"]),
        tangent_y: i64_array(value, &["tangentY"]),
    }
}

fn ink_data_message(value: &Value) -> Result<proto::InkData, CodecError> {
    let mut message = proto::InkData {
        strokes: Vec::new(),
        properties: Vec::new(),
        brush_uris: array(value, &["brushURIs", "brushUris"])
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect(),
        render_mode_uris: array(value, &["renderModeURIs", "renderModeUris"])
            .filter_map(Value::as_str)
            .map(ToString::to_string)
            .collect(),
        unit_scale_factor: f32_field(value, &["unitScaleFactor"]),
        transform: None,
    };
    for ppp in array(value, &["properties"]) {
        message.properties.push(proto::PathPointProperties {
            color: i32_field(ppp, &["color"]),
            size: f32_field(ppp, &["size"]),
            rotation: f32_field(ppp, &["rotation"]),
            scale_x: f32_field(ppp, &["scaleX"]),
            scale_y: f32_field(ppp, &["scaleY"]),
            scale_z: f32_field(ppp, &["scaleZ"]),
            offset_x: f32_field(ppp, &["offsetX"]),
            offset_y: f32_field(ppp, &["offsetY"]),
            offset_z: f32_field(ppp, &["offsetZ"]),
        });
    }
    for stroke in array(value, &["strokes"]) {
        let data = if let Some(plain) = field(stroke, &["splineData"]) {
            Some(proto::stroke::Data::SplineData(spline_data(plain)))
        } else {
            field(stroke, &["splineCompressed"])
                .map(|packed| proto::stroke::Data::SplineCompressed(spline_compressed(packed)))
        };
        message.strokes.push(proto::Stroke {
            id: id_field(stroke, &["id"])?,
            start_parameter: f32_field(stroke, &["startParameter"]),
            end_parameter: f32_field(stroke, &["endParameter"]),
            data,
            precisions: u32_field(stroke, &["precisions"]),
            sensor_data_id: id_field(stroke, &["sensorDataID", "sensorDataId"])?,
            sensor_data_offset: u32_field(stroke, &["sensorDataOffset"]),
            sensor_data_mapping: u32_array(stroke, &["sensorDataMapping"]),
            properties_index: u32_field(stroke, &["propertiesIndex"]),
            brush_uri_index: u32_field(stroke, &["brushURIIndex", "brushUriIndex"]),
            render_mode_uri_index: u32_field(
                stroke,
                &["renderModeURIIndex", "renderModeUriIndex"],
            ),
            random_seed: u32_field(stroke, &["randomSeed"]),
        });
    }
    if let Some(transform) = field(value, &["transform"]) {
        message.transform = Some(proto::Matrix {
            m00: f64_field(transform, &["m00"]),
            m01: f64_field(transform, &["m01"]),
            m02: f64_field(transform, &["m02"]),
            m03: f64_field(transform, &["m03"]),
            m10: f64_field(transform, &["m10"]),
            m11: f64_field(transform, &["m11"]),
            m12: f64_field(transform, &["m12"]),
            m13: f64_field(transform, &["m13"]),
            m20: f64_field(transform, &["m20"]),
            m21: f64_field(transform, &["m21"]),
            m22: f64_field(transform, &["m22"]),
            m23: f64_field(transform, &["m23"]),
            m30: f64_field(transform, &["m30"]),
            m31: f64_field(transform, &["m31"]),
            m32: f64_field(transform, &["m32"]),
            m33: f64_field(transform, &["m33"]),
        });
    }
    Ok(message)
}

fn knowledge_message(value: &Value) -> Result<proto::TripleStore, CodecError> {
    Ok(proto::TripleStore {
        statements: array(value, &["statements"])
            .map(|s| proto::Statement {
                subject: str_field(s, &["subject"]),
                predicate: str_field(s, &["predicate"]),
                object: str_field(s, &["object"]),
            })
            .collect(),
    })
}

fn tree_message(value: &Value) -> Result<proto::InkTree, CodecError> {
    let mut message = proto::InkTree {
        name: str_field(value, &["name"]),
        tree: Vec::new(),
    };
    for node in array(value, &["tree"]) {
        let id = if let Some(group) = field(node, &["groupID", "groupId"]) {
            let text = group.as_str().unwrap_or_default();
            let parsed = UimId::parse_random(text)
                .map_err(|e| CodecError::format("json", e.to_string()))?;
            Some(proto::node::Id::GroupId(parsed.to_bytes().to_vec()))
        } else {
            field(node, &["index"])
                .and_then(Value::as_u64)
                .map(|index| proto::node::Id::Index(index as u32))
        };
        let bounds = field(node, &["bounds"]).map(|b| proto::Rectangle {
            x: f32_field(b, &["x"]),
            y: f32_field(b, &["y"]),
            width: f32_field(b, &["width"]),
            height: f32_field(b, &["height"]),
        });
        let interval = field(node, &["interval"]).map(|i| proto::Interval {
            from_index: u32_field(i, &["fromIndex"]),
            to_index: u32_field(i, &["toIndex"]),
            from_t_value: f32_field(i, &["fromTValue"]),
            to_t_value: f32_field(i, &["toTValue"]),
        });
        message.tree.push(proto::Node {
            depth: u32_field(node, &["depth"]),
            id,
            bounds,
            interval,
        });
    }
    Ok(message)
}

fn structure_message(value: &Value) -> Result<proto::InkStructure, CodecError> {
    let ink_tree = field(value, &["inkTree"]).map(tree_message).transpose()?;
    let mut views = Vec::new();
    for view in array(value, &["views"]) {
        views.push(tree_message(view)?);
    }
    Ok(proto::InkStructure { ink_tree, views })
}
