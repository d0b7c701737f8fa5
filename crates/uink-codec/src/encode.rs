// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! v3.1.0 encoder.
//!
//! Encoding is a fixed pipeline: validate the model's invariants, build one
//! protobuf message per populated section (properties, input data, brushes,
//! ink data, knowledge graph, ink structure — in that order), wrap each in
//! a chunk with the chosen compression, and frame everything in the RIFF
//! envelope. Output is deterministic for identical in-memory input.

use std::collections::HashMap;

use prost::Message;

use uink_model::{
    BlendMode, BrushPrototype, InkModel, InkState, InkTree, InputProviderKind, MetricKind,
    NodeKind, RasterTexture, RotationMode, SensorType, Stroke, UimId,
};

use crate::error::CodecError;
use crate::head::{
    Compression, ContentType, Head, CHUNK_BRUSHES, CHUNK_DATA, CHUNK_HEAD, CHUNK_INK_DATA,
    CHUNK_INK_STRUCTURE, CHUNK_INPUT_DATA, CHUNK_KNOWLEDGE, CHUNK_PROPERTIES, CURRENT_VERSION,
};
use crate::{chunk, compression, delta, proto};

/// Encoder knobs. The version is always 3.1.0; only the chunk compression
/// is selectable.
#[derive(Debug, Clone, Copy, Default)]
pub struct EncodeOptions {
    /// Compression applied to every section chunk.
    pub compression: Compression,
}

/// Serializes a model into a v3.1.0 UIM byte stream.
///
/// # Errors
///
/// Returns [`CodecError::Consistency`] when the model violates its
/// invariants, and framing errors when compression fails.
pub fn encode(model: &InkModel) -> Result<Vec<u8>, CodecError> {
    encode_with(model, EncodeOptions::default())
}

/// [`encode`] with explicit options.
///
/// # Errors
///
/// See [`encode`].
pub fn encode_with(model: &InkModel, options: EncodeOptions) -> Result<Vec<u8>, CodecError> {
    model
        .validate()
        .map_err(|e| CodecError::consistency("validate", e))?;

    let mut sections: Vec<([u8; 4], Vec<u8>)> = Vec::new();

    if !model.properties().is_empty() {
        sections.push((CHUNK_PROPERTIES, build_properties(model).encode_to_vec()));
    }
    if !model.input_configuration().is_empty() || !model.sensor_data().is_empty() {
        sections.push((CHUNK_INPUT_DATA, build_input_data(model)?.encode_to_vec()));
    }
    if !model.brushes().is_empty() {
        sections.push((CHUNK_BRUSHES, build_brushes(model).encode_to_vec()));
    }

    let strokes = model.strokes();
    let has_ink_data = model.main_tree().is_some()
        || model.unit_scale_factor() != 1.0
        || !model.transform().is_identity();
    let mut stroke_order: HashMap<u128, u32> = HashMap::new();
    if has_ink_data {
        let ink_data = build_ink_data(model, &strokes, &mut stroke_order);
        sections.push((CHUNK_INK_DATA, ink_data.encode_to_vec()));
    }
    if !model.knowledge_graph().is_empty() {
        sections.push((CHUNK_KNOWLEDGE, build_knowledge(model).encode_to_vec()));
    }
    if model.main_tree().is_some() || !model.views().is_empty() {
        let structure = build_structure(model, &stroke_order)?;
        sections.push((CHUNK_INK_STRUCTURE, structure.encode_to_vec()));
    }

    let head = Head {
        major: CURRENT_VERSION.0,
        minor: CURRENT_VERSION.1,
        patch: CURRENT_VERSION.2,
        content_type: ContentType::Protobuf,
        compression: options.compression,
    };

    let mut data_payload = Vec::new();
    for (id, payload) in sections {
        let packed = compression::compress(&payload, options.compression)?;
        tracing::debug!(
            chunk = %String::from_utf8_lossy(&id),
            raw = payload.len(),
            packed = packed.len(),
            "writing chunk"
        );
        chunk::write_chunk(&mut data_payload, id, &packed);
    }

    let mut body = Vec::new();
    chunk::write_chunk(&mut body, CHUNK_HEAD, &head.to_bytes());
    chunk::write_chunk(&mut body, CHUNK_DATA, &data_payload);
    Ok(chunk::write_envelope(&body))
}

fn id_bytes(id: UimId) -> Vec<u8> {
    id.to_bytes().to_vec()
}

fn opt_id_bytes(id: Option<UimId>) -> Vec<u8> {
    id.map(|i| i.to_bytes().to_vec()).unwrap_or_default()
}

fn properties_to_proto(props: &[(String, String)]) -> Vec<proto::Property> {
    props
        .iter()
        .map(|(name, value)| proto::Property {
            name: name.clone(),
            value: value.clone(),
        })
        .collect()
}

fn build_properties(model: &InkModel) -> proto::Properties {
    proto::Properties {
        properties: properties_to_proto(model.properties()),
    }
}

fn provider_kind_to_proto(kind: InputProviderKind) -> i32 {
    match kind {
        InputProviderKind::Pen => proto::InputProviderKind::Pen as i32,
        InputProviderKind::Touch => proto::InputProviderKind::Touch as i32,
        InputProviderKind::Mouse => proto::InputProviderKind::Mouse as i32,
        InputProviderKind::Controller => proto::InputProviderKind::Controller as i32,
    }
}

fn metric_to_proto(metric: MetricKind) -> i32 {
    match metric {
        MetricKind::Length => proto::MetricKind::Length as i32,
        MetricKind::Time => proto::MetricKind::Time as i32,
        MetricKind::Force => proto::MetricKind::Force as i32,
        MetricKind::Angle => proto::MetricKind::Angle as i32,
        MetricKind::Normalized => proto::MetricKind::Normalized as i32,
    }
}

fn state_to_proto(state: InkState) -> i32 {
    match state {
        InkState::Plane => proto::InkState::Plane as i32,
        InkState::Hovering => proto::InkState::Hovering as i32,
        InkState::InVolume => proto::InkState::InVolume as i32,
        InkState::VolumeHovering => proto::InkState::VolumeHovering as i32,
        InkState::StartTracking => proto::InkState::StartTracking as i32,
        InkState::StopTracking => proto::InkState::StopTracking as i32,
    }
}

fn build_input_data(model: &InkModel) -> Result<proto::InputData, CodecError> {
    let config = model.input_configuration();
    let mut data = proto::InputContextData::default();

    for env in config.environments() {
        data.environments.push(proto::Environment {
            id: id_bytes(env.id()),
            properties: properties_to_proto(env.properties()),
        });
    }
    for provider in config.providers() {
        data.ink_input_providers.push(proto::InkInputProvider {
            id: id_bytes(provider.id()),
            r#type: provider_kind_to_proto(provider.kind()),
            properties: properties_to_proto(provider.properties()),
        });
    }
    for device in config.devices() {
        data.input_devices.push(proto::InputDevice {
            id: id_bytes(device.id()),
            properties: properties_to_proto(device.properties()),
        });
    }
    for ctx in config.input_contexts() {
        data.input_contexts.push(proto::InputContext {
            id: id_bytes(ctx.id()),
            environment_id: opt_id_bytes(ctx.environment_id()),
            sensor_context_id: opt_id_bytes(ctx.sensor_context_id()),
        });
    }
    for sensor_ctx in config.sensor_contexts() {
        let mut out = proto::SensorContext {
            id: id_bytes(sensor_ctx.id()),
            sensor_channels_context: Vec::new(),
        };
        for cc in sensor_ctx.channel_contexts() {
            out.sensor_channels_context.push(proto::SensorChannelsContext {
                id: id_bytes(cc.id()),
                channels: cc
                    .channels()
                    .iter()
                    .map(|c| proto::SensorChannel {
                        id: id_bytes(c.id()),
                        r#type: c.channel_type().uri().to_string(),
                        metric: metric_to_proto(c.metric()),
                        resolution: c.resolution(),
                        min: c.min(),
                        max: c.max(),
                        precision: c.precision(),
                    })
                    .collect(),
                sampling_rate_hint: cc.sampling_rate().unwrap_or(0),
                latency: cc.latency_ms().unwrap_or(0),
                ink_input_provider_id: opt_id_bytes(cc.provider_id()),
                input_device_id: opt_id_bytes(cc.device_id()),
            });
        }
        data.sensor_contexts.push(out);
    }

    let mut input_data = proto::InputData {
        input_context_data: Some(data),
        sensor_data: Vec::new(),
    };

    for frame in model.sensor_data().frames() {
        let input_ctx = config
            .input_context(frame.input_context_id())
            .map_err(|e| CodecError::consistency("INPT", e))?;
        let sensor_ctx = input_ctx
            .sensor_context_id()
            .map(|id| config.sensor_context(id))
            .transpose()
            .map_err(|e| CodecError::consistency("INPT", e))?;

        let mut out = proto::SensorData {
            id: id_bytes(frame.id()),
            input_context_id: id_bytes(frame.input_context_id()),
            state: state_to_proto(frame.state()),
            timestamp: frame.timestamp_ms(),
            data_channels: Vec::new(),
        };
        for channel_data in frame.channels() {
            let channel = sensor_ctx
                .map(|ctx| ctx.channel_by_id(channel_data.sensor_channel_id()))
                .transpose()
                .map_err(|e| CodecError::consistency("INPT", e))?;
            // Timestamp streams are coded with precision zero; the first
            // wire value stays absolute for every channel.
            let (precision, resolution) = channel.map_or((0, 1.0), |c| {
                if c.channel_type() == SensorType::Timestamp {
                    (0, c.resolution())
                } else {
                    (c.precision(), c.resolution())
                }
            });
            out.data_channels.push(proto::ChannelData {
                sensor_channel_id: id_bytes(channel_data.sensor_channel_id()),
                values: delta::encode_stream(channel_data.values(), precision, resolution),
            });
        }
        input_data.sensor_data.push(out);
    }
    Ok(input_data)
}

fn rotation_to_proto(rotation: RotationMode) -> i32 {
    match rotation {
        RotationMode::None => proto::RotationMode::None as i32,
        RotationMode::Random => proto::RotationMode::Random as i32,
        RotationMode::Trajectory => proto::RotationMode::Trajectory as i32,
    }
}

fn blend_to_proto(blend: BlendMode) -> i32 {
    match blend {
        BlendMode::SourceOver => proto::BlendMode::SourceOver as i32,
        BlendMode::DestinationOver => proto::BlendMode::DestinationOver as i32,
        BlendMode::DestinationOut => proto::BlendMode::DestinationOut as i32,
        BlendMode::Lighter => proto::BlendMode::Lighter as i32,
        BlendMode::Copy => proto::BlendMode::Copy as i32,
        BlendMode::Min => proto::BlendMode::Min as i32,
        BlendMode::Max => proto::BlendMode::Max as i32,
    }
}

fn build_brushes(model: &InkModel) -> proto::Brushes {
    let mut out = proto::Brushes::default();
    for brush in model.brushes().vector_brushes() {
        let mut vector = proto::VectorBrush {
            name: brush.name.clone(),
            prototype: Vec::new(),
            spacing: brush.spacing,
        };
        for prototype in &brush.prototypes {
            vector.prototype.push(match prototype {
                BrushPrototype::Polygon {
                    min_scale,
                    points,
                    coords_z,
                    indices,
                } => proto::BrushPrototype {
                    coord_x: points.iter().map(|p| p.0).collect(),
                    coord_y: points.iter().map(|p| p.1).collect(),
                    coord_z: coords_z.clone(),
                    indices: indices.clone(),
                    shape_uri: String::new(),
                    size: *min_scale,
                },
                BrushPrototype::Uri {
                    min_scale,
                    shape_uri,
                } => proto::BrushPrototype {
                    coord_x: Vec::new(),
                    coord_y: Vec::new(),
                    coord_z: Vec::new(),
                    indices: Vec::new(),
                    shape_uri: shape_uri.clone(),
                    size: *min_scale,
                },
            });
        }
        out.vector_brushes.push(vector);
    }
    for brush in model.brushes().raster_brushes() {
        let (shape_texture, shape_texture_uri) = match &brush.shape {
            RasterTexture::None => (Vec::new(), Vec::new()),
            RasterTexture::Inline(blobs) => (blobs.clone(), Vec::new()),
            RasterTexture::Uris(uris) => (Vec::new(), uris.clone()),
        };
        let (fill_texture, fill_texture_uri) = match &brush.fill {
            RasterTexture::None => (Vec::new(), String::new()),
            RasterTexture::Inline(blobs) => {
                (blobs.first().cloned().unwrap_or_default(), String::new())
            }
            RasterTexture::Uris(uris) => (Vec::new(), uris.first().cloned().unwrap_or_default()),
        };
        out.raster_brushes.push(proto::RasterBrush {
            name: brush.name.clone(),
            spacing: brush.spacing,
            scattering: brush.scattering,
            rotation_mode: rotation_to_proto(brush.rotation),
            shape_texture,
            shape_texture_uri,
            fill_texture,
            fill_texture_uri,
            fill_width: brush.fill_width,
            fill_height: brush.fill_height,
            randomize_fill: brush.randomize_fill,
            blend_mode: blend_to_proto(brush.blend_mode),
        });
    }
    out
}

fn pack_color(properties: &uink_model::PathPointProperties) -> i32 {
    let byte = uink_model::color_float_to_byte;
    let packed = (u32::from(byte(properties.red)) << 24)
        | (u32::from(byte(properties.green)) << 16)
        | (u32::from(byte(properties.blue)) << 8)
        | u32::from(byte(properties.alpha));
    packed as i32
}

fn ppp_to_proto(properties: &uink_model::PathPointProperties) -> proto::PathPointProperties {
    proto::PathPointProperties {
        color: pack_color(properties),
        size: properties.size,
        rotation: properties.rotation,
        scale_x: properties.scale_x,
        scale_y: properties.scale_y,
        scale_z: properties.scale_z,
        offset_x: properties.offset_x,
        offset_y: properties.offset_y,
        offset_z: properties.offset_z,
    }
}

fn stroke_to_proto(
    stroke: &Stroke,
    palette: &mut Vec<(u128, proto::PathPointProperties)>,
    brush_uris: &mut Vec<String>,
    render_mode_uris: &mut Vec<String>,
) -> proto::Stroke {
    let colors = |bytes: &[u8]| bytes.iter().map(|&b| u32::from(b)).collect::<Vec<u32>>();

    let (data, precisions) = match stroke.precision_scheme.filter(|s| !s.is_empty()) {
        Some(scheme) => {
            let enc = delta::encode_f32_stream;
            let compressed = proto::SplineCompressed {
                spline_x: enc(&stroke.spline_x, scheme.position()),
                spline_y: enc(&stroke.spline_y, scheme.position()),
                spline_z: enc(&stroke.spline_z, scheme.position()),
                size: enc(&stroke.sizes, scheme.size()),
                rotation: enc(&stroke.rotations, scheme.rotation()),
                red: colors(&stroke.red),
                green: colors(&stroke.green),
                blue: colors(&stroke.blue),
                alpha: colors(&stroke.alpha),
                scale_x: enc(&stroke.scales_x, scheme.scale()),
                scale_y: enc(&stroke.scales_y, scheme.scale()),
                scale_z: enc(&stroke.scales_z, scheme.scale()),
                offset_x: enc(&stroke.offsets_x, scheme.offset()),
                offset_y: enc(&stroke.offsets_y, scheme.offset()),
                offset_z: enc(&stroke.offsets_z, scheme.offset()),
                tangent_x: enc(&stroke.tangents_x, scheme.position()),
                tangent_y: enc(&stroke.tangents_y, scheme.position()),
            };
            (
                proto::stroke::Data::SplineCompressed(compressed),
                scheme.value(),
            )
        }
        None => {
            let plain = proto::SplineData {
                spline_x: stroke.spline_x.clone(),
                spline_y: stroke.spline_y.clone(),
                spline_z: stroke.spline_z.clone(),
                size: stroke.sizes.clone(),
                rotation: stroke.rotations.clone(),
                red: colors(&stroke.red),
                green: colors(&stroke.green),
                blue: colors(&stroke.blue),
                alpha: colors(&stroke.alpha),
                scale_x: stroke.scales_x.clone(),
                scale_y: stroke.scales_y.clone(),
                scale_z: stroke.scales_z.clone(),
                offset_x: stroke.offsets_x.clone(),
                offset_y: stroke.offsets_y.clone(),
                offset_z: stroke.offsets_z.clone(),
                tangent_x: stroke.tangents_x.clone(),
                tangent_y: stroke.tangents_y.clone(),
            };
            (proto::stroke::Data::SplineData(plain), 0)
        }
    };

    // Style palette and URI tables use 1-based indices; 0 means absent.
    let ppp = &stroke.style.properties;
    let properties_index = palette
        .iter()
        .position(|(id, _)| *id == ppp.id().value())
        .unwrap_or_else(|| {
            palette.push((ppp.id().value(), ppp_to_proto(ppp)));
            palette.len() - 1
        });
    let brush_uri_index = stroke.style.brush_uri.as_ref().map_or(0, |uri| {
        table_index(brush_uris, uri)
    });
    let render_mode_uri_index = if stroke.style.render_mode_uri
        == uink_model::DEFAULT_RENDER_MODE_URI
    {
        0
    } else {
        table_index(render_mode_uris, &stroke.style.render_mode_uri)
    };

    let seed = if stroke.style.particles_random_seed != 0 {
        stroke.style.particles_random_seed
    } else {
        stroke.random_seed
    };

    proto::Stroke {
        id: id_bytes(stroke.id()),
        start_parameter: stroke.start_parameter,
        end_parameter: stroke.end_parameter,
        data: Some(data),
        precisions,
        sensor_data_id: opt_id_bytes(stroke.sensor_data_id),
        sensor_data_offset: stroke.sensor_data_offset,
        sensor_data_mapping: stroke.sensor_data_mapping.clone(),
        properties_index: properties_index as u32 + 1,
        brush_uri_index,
        render_mode_uri_index,
        random_seed: seed,
    }
}

fn table_index(table: &mut Vec<String>, uri: &str) -> u32 {
    if let Some(pos) = table.iter().position(|u| u == uri) {
        pos as u32 + 1
    } else {
        table.push(uri.to_string());
        table.len() as u32
    }
}

fn build_ink_data(
    model: &InkModel,
    strokes: &[&Stroke],
    stroke_order: &mut HashMap<u128, u32>,
) -> proto::InkData {
    let mut palette: Vec<(u128, proto::PathPointProperties)> = Vec::new();
    let mut brush_uris: Vec<String> = Vec::new();
    let mut render_mode_uris: Vec<String> = Vec::new();

    let mut out = proto::InkData {
        strokes: Vec::new(),
        properties: Vec::new(),
        brush_uris: Vec::new(),
        render_mode_uris: Vec::new(),
        unit_scale_factor: model.unit_scale_factor(),
        transform: None,
    };
    for (index, stroke) in strokes.iter().enumerate() {
        #[allow(clippy::cast_possible_truncation)]
        stroke_order.insert(stroke.id().value(), index as u32);
        out.strokes
            .push(stroke_to_proto(stroke, &mut palette, &mut brush_uris, &mut render_mode_uris));
    }
    out.properties = palette.into_iter().map(|(_, p)| p).collect();
    out.brush_uris = brush_uris;
    out.render_mode_uris = render_mode_uris;
    if !model.transform().is_identity() {
        let rows = model.transform().rows();
        out.transform = Some(proto::Matrix {
            m00: rows[0][0],
            m01: rows[0][1],
            m02: rows[0][2],
            m03: rows[0][3],
            m10: rows[1][0],
            m11: rows[1][1],
            m12: rows[1][2],
            m13: rows[1][3],
            m20: rows[2][0],
            m21: rows[2][1],
            m22: rows[2][2],
            m23: rows[2][3],
            m30: rows[3][0],
            m31: rows[3][1],
            m32: rows[3][2],
            m33: rows[3][3],
        });
    }
    out
}

fn build_knowledge(model: &InkModel) -> proto::TripleStore {
    proto::TripleStore {
        statements: model
            .knowledge_graph()
            .statements()
            .iter()
            .filter(|s| !s.subject.is_empty() && !s.predicate.is_empty())
            .map(|s| proto::Statement {
                subject: s.subject.clone(),
                predicate: s.predicate.clone(),
                object: s.object.clone(),
            })
            .collect(),
    }
}

fn tree_to_proto(
    tree: &InkTree,
    name: &str,
    stroke_order: &HashMap<u128, u32>,
) -> Result<proto::InkTree, CodecError> {
    let mut out = proto::InkTree {
        name: name.to_string(),
        tree: Vec::new(),
    };
    for (index, depth) in tree.pre_order() {
        let node = tree.node(index).ok_or_else(|| {
            CodecError::consistency(
                "INKS",
                uink_model::ModelError::Consistency("dangling node index".to_string()),
            )
        })?;
        #[allow(clippy::cast_possible_truncation)]
        let mut message = proto::Node {
            depth: depth as u32,
            id: None,
            bounds: None,
            interval: None,
        };
        match node.kind() {
            NodeKind::Group { .. } => {
                message.id = Some(proto::node::Id::GroupId(id_bytes(node.id())));
                if let Some(bounds) = node.bounds() {
                    if !bounds.is_degenerate() {
                        message.bounds = Some(proto::Rectangle {
                            x: bounds.x as f32,
                            y: bounds.y as f32,
                            width: bounds.width as f32,
                            height: bounds.height as f32,
                        });
                    }
                }
            }
            NodeKind::StrokeRef { fragment } => {
                let stroke_index =
                    stroke_order
                        .get(&node.id().value())
                        .copied()
                        .ok_or_else(|| {
                            CodecError::consistency(
                                "INKS",
                                uink_model::ModelError::MissingStrokeInMainTree {
                                    id: node.id().s_form(),
                                    tree: name.to_string(),
                                },
                            )
                        })?;
                message.id = Some(proto::node::Id::Index(stroke_index));
                if let Some(frag) = fragment {
                    message.interval = Some(proto::Interval {
                        from_index: frag.from_point_index,
                        to_index: frag.to_point_index,
                        from_t_value: frag.from_t,
                        to_t_value: frag.to_t,
                    });
                }
            }
        }
        out.tree.push(message);
    }
    Ok(out)
}

fn build_structure(
    model: &InkModel,
    stroke_order: &HashMap<u128, u32>,
) -> Result<proto::InkStructure, CodecError> {
    let mut out = proto::InkStructure {
        ink_tree: None,
        views: Vec::new(),
    };
    if let Some(main) = model.main_tree() {
        // The main tree travels with an empty name.
        out.ink_tree = Some(tree_to_proto(main, "", stroke_order)?);
    }
    for view in model.views() {
        out.views.push(tree_to_proto(view, view.name(), stroke_order)?);
    }
    Ok(out)
}
