// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! v3.1.0 decoder.
//!
//! Chunks are collected first, then processed in dependency order
//! (properties, input data, brushes, ink data, knowledge graph, ink
//! structure) regardless of their order in the file. Unknown chunk ids are
//! skipped over by their declared size. Tree reconstruction follows the
//! pre-order depth markers with an explicit parent stack.

use prost::Message;

use uink_model::{
    BlendMode, BrushPrototype, Brushes, Environment, Fragment, InkInputProvider, InkModel,
    InkState, InkTree, InputContext, InputDevice, InputProviderKind, Matrix4, MetricKind,
    ModelError, PathPointProperties, PrecisionScheme, RasterBrush, RotationMode, SensorChannel,
    SensorChannelsContext, SensorContext, SensorData, SensorType, Stroke, Style, UimId,
    VectorBrush,
};

use crate::error::CodecError;
use crate::head::{
    Compression, CHUNK_BRUSHES, CHUNK_INK_DATA, CHUNK_INK_STRUCTURE, CHUNK_INPUT_DATA,
    CHUNK_KNOWLEDGE, CHUNK_PROPERTIES,
};
use crate::{compression, delta, proto, DecodeOptions};

/// Decodes the section chunks of a 3.1.0 body into a model.
pub(crate) fn decode_body(
    chunks: &[(/* id */ [u8; 4], /* payload */ Vec<u8>)],
    chunk_compression: Compression,
    options: DecodeOptions,
) -> Result<InkModel, CodecError> {
    let mut model = InkModel::new();
    model.set_version(crate::head::CURRENT_VERSION);

    let mut sections: Vec<([u8; 4], Vec<u8>)> = Vec::new();
    for (id, payload) in chunks {
        match *id {
            CHUNK_PROPERTIES | CHUNK_INPUT_DATA | CHUNK_BRUSHES | CHUNK_INK_DATA
            | CHUNK_KNOWLEDGE | CHUNK_INK_STRUCTURE => {
                sections.push((*id, compression::decompress(payload, chunk_compression)?));
            }
            other => {
                tracing::debug!(
                    chunk = %String::from_utf8_lossy(&other),
                    size = payload.len(),
                    "skipping unknown chunk"
                );
            }
        }
    }

    let payload_of = |id: [u8; 4]| {
        sections
            .iter()
            .find(|(chunk_id, _)| *chunk_id == id)
            .map(|(_, payload)| payload.as_slice())
    };

    if let Some(payload) = payload_of(CHUNK_PROPERTIES) {
        let message = proto::Properties::decode(payload).map_err(|e| CodecError::Proto {
            context: "PRPS",
            source: e,
        })?;
        for property in message.properties {
            model.add_property(&property.name, &property.value);
        }
    }

    if let Some(payload) = payload_of(CHUNK_INPUT_DATA) {
        let message = proto::InputData::decode(payload).map_err(|e| CodecError::Proto {
            context: "INPT",
            source: e,
        })?;
        parse_input_data(&mut model, &message, options)?;
    }

    if let Some(payload) = payload_of(CHUNK_BRUSHES) {
        let message = proto::Brushes::decode(payload).map_err(|e| CodecError::Proto {
            context: "BRSH",
            source: e,
        })?;
        parse_brushes(model.brushes_mut(), &message)?;
    }

    let mut stroke_order: Vec<UimId> = Vec::new();
    if let Some(payload) = payload_of(CHUNK_INK_DATA) {
        let message = proto::InkData::decode(payload).map_err(|e| CodecError::Proto {
            context: "INKD",
            source: e,
        })?;
        stroke_order = parse_ink_data(&mut model, &message)?;
    }

    if let Some(payload) = payload_of(CHUNK_KNOWLEDGE) {
        let message = proto::TripleStore::decode(payload).map_err(|e| CodecError::Proto {
            context: "KNWG",
            source: e,
        })?;
        for statement in message.statements {
            model.add_semantic_triple(&statement.subject, &statement.predicate, &statement.object);
        }
    }

    if let Some(payload) = payload_of(CHUNK_INK_STRUCTURE) {
        let message = proto::InkStructure::decode(payload).map_err(|e| CodecError::Proto {
            context: "INKS",
            source: e,
        })?;
        if let Some(tree) = &message.ink_tree {
            let built = build_tree(tree, "main", &stroke_order, options)?;
            model
                .add_tree(built)
                .map_err(|e| CodecError::consistency("INKS", e))?;
        }
        for view in &message.views {
            let name = uink_model::semantics::CommonView::normalize(&view.name).to_string();
            let built = build_tree(view, &name, &stroke_order, options)?;
            model
                .add_tree(built)
                .map_err(|e| CodecError::consistency("INKS", e))?;
        }
    }

    Ok(model)
}

fn parse_id(bytes: &[u8], hashed: bool, context: &'static str) -> Result<UimId, CodecError> {
    let result = if hashed {
        UimId::hashed_from_bytes(bytes)
    } else {
        UimId::random_from_bytes(bytes)
    };
    result.map_err(|e| CodecError::consistency(context, e))
}

fn parse_opt_id(
    bytes: &[u8],
    hashed: bool,
    context: &'static str,
) -> Result<Option<UimId>, CodecError> {
    if bytes.is_empty() {
        return Ok(None);
    }
    parse_id(bytes, hashed, context).map(Some)
}

fn proto_properties(props: &[proto::Property]) -> Vec<(String, String)> {
    props
        .iter()
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect()
}

fn provider_kind_from_proto(value: i32) -> InputProviderKind {
    match proto::InputProviderKind::try_from(value) {
        Ok(proto::InputProviderKind::Touch) => InputProviderKind::Touch,
        Ok(proto::InputProviderKind::Mouse) => InputProviderKind::Mouse,
        Ok(proto::InputProviderKind::Controller) => InputProviderKind::Controller,
        _ => InputProviderKind::Pen,
    }
}

fn metric_from_proto(value: i32) -> MetricKind {
    match proto::MetricKind::try_from(value) {
        Ok(proto::MetricKind::Time) => MetricKind::Time,
        Ok(proto::MetricKind::Force) => MetricKind::Force,
        Ok(proto::MetricKind::Angle) => MetricKind::Angle,
        Ok(proto::MetricKind::Normalized) => MetricKind::Normalized,
        _ => MetricKind::Length,
    }
}

pub(crate) fn state_from_proto(value: i32) -> InkState {
    match proto::InkState::try_from(value) {
        Ok(proto::InkState::Hovering) => InkState::Hovering,
        Ok(proto::InkState::InVolume) => InkState::InVolume,
        Ok(proto::InkState::VolumeHovering) => InkState::VolumeHovering,
        Ok(proto::InkState::StartTracking) => InkState::StartTracking,
        Ok(proto::InkState::StopTracking) => InkState::StopTracking,
        _ => InkState::Plane,
    }
}

fn parse_input_data(
    model: &mut InkModel,
    message: &proto::InputData,
    options: DecodeOptions,
) -> Result<(), CodecError> {
    if let Some(data) = &message.input_context_data {
        for env in &data.environments {
            let id = parse_id(&env.id, true, "INPT")?;
            model
                .input_configuration_mut()
                .add_environment(Environment::with_id(id, proto_properties(&env.properties)));
        }
        for provider in &data.ink_input_providers {
            let id = parse_id(&provider.id, true, "INPT")?;
            model.input_configuration_mut().add_provider(InkInputProvider::with_id(
                id,
                provider_kind_from_proto(provider.r#type),
                proto_properties(&provider.properties),
            ));
        }
        for device in &data.input_devices {
            let id = parse_id(&device.id, true, "INPT")?;
            model
                .input_configuration_mut()
                .add_device(InputDevice::with_id(id, proto_properties(&device.properties)));
        }
        for sensor_ctx in &data.sensor_contexts {
            let mut channel_contexts = Vec::new();
            for cc in &sensor_ctx.sensor_channels_context {
                let provider_id = parse_opt_id(&cc.ink_input_provider_id, true, "INPT")?;
                let device_id = parse_opt_id(&cc.input_device_id, true, "INPT")?;
                let mut channels = Vec::new();
                for channel in &cc.channels {
                    let Some(channel_type) = SensorType::from_uri(&channel.r#type) else {
                        if options.lenient {
                            tracing::warn!(uri = %channel.r#type, "dropping unknown channel type");
                            continue;
                        }
                        return Err(CodecError::consistency(
                            "INPT",
                            ModelError::Format(format!(
                                "unknown sensor channel type {}",
                                channel.r#type
                            )),
                        ));
                    };
                    channels.push(SensorChannel::with_id(
                        parse_id(&channel.id, true, "INPT")?,
                        channel_type,
                        metric_from_proto(channel.metric),
                        channel.resolution,
                        channel.min,
                        channel.max,
                        channel.precision,
                        provider_id,
                        device_id,
                    ));
                }
                channel_contexts.push(SensorChannelsContext::with_id(
                    parse_id(&cc.id, true, "INPT")?,
                    channels,
                    (cc.sampling_rate_hint != 0).then_some(cc.sampling_rate_hint),
                    (cc.latency != 0).then_some(cc.latency),
                    provider_id,
                    device_id,
                ));
            }
            model.input_configuration_mut().add_sensor_context(SensorContext::with_id(
                parse_id(&sensor_ctx.id, true, "INPT")?,
                channel_contexts,
            ));
        }
        for ctx in &data.input_contexts {
            model.input_configuration_mut().add_input_context(InputContext::with_id(
                parse_id(&ctx.id, true, "INPT")?,
                parse_opt_id(&ctx.environment_id, true, "INPT")?,
                parse_opt_id(&ctx.sensor_context_id, true, "INPT")?,
            ));
        }
    }

    for frame in &message.sensor_data {
        let input_context_id = parse_id(&frame.input_context_id, true, "INPT")?;
        let sensor_ctx = model
            .input_configuration()
            .input_context(input_context_id)
            .and_then(|ctx| {
                ctx.sensor_context_id()
                    .map(|id| model.input_configuration().sensor_context(id))
                    .transpose()
            });
        let sensor_ctx = match sensor_ctx {
            Ok(ctx) => ctx.cloned(),
            Err(e) => {
                if options.lenient {
                    tracing::warn!(error = %e, "dropping sensor frame with dangling context");
                    continue;
                }
                return Err(CodecError::consistency("INPT", e));
            }
        };

        let mut out = SensorData::new(
            parse_id(&frame.id, false, "INPT")?,
            input_context_id,
            state_from_proto(frame.state),
        );
        out.set_timestamp_ms(frame.timestamp);
        for channel_data in &frame.data_channels {
            let channel_id = parse_id(&channel_data.sensor_channel_id, true, "INPT")?;
            let channel = sensor_ctx
                .as_ref()
                .map(|ctx| ctx.channel_by_id(channel_id).cloned())
                .transpose();
            let channel = match channel {
                Ok(channel) => channel,
                Err(e) => {
                    if options.lenient {
                        tracing::warn!(error = %e, "dropping channel with dangling id");
                        continue;
                    }
                    return Err(CodecError::consistency("INPT", e));
                }
            };
            let (precision, resolution) = channel.map_or((0, 1.0), |c| {
                if c.channel_type() == SensorType::Timestamp {
                    (0, c.resolution())
                } else {
                    (c.precision(), c.resolution())
                }
            });
            out.push_channel(
                channel_id,
                delta::decode_stream(&channel_data.values, precision, resolution),
            );
        }
        model.sensor_data_mut().add(out);
    }
    Ok(())
}

fn parse_brushes(brushes: &mut Brushes, message: &proto::Brushes) -> Result<(), CodecError> {
    for brush in &message.vector_brushes {
        let mut prototypes = Vec::new();
        for prototype in &brush.prototype {
            if prototype.shape_uri.is_empty() {
                prototypes.push(BrushPrototype::Polygon {
                    min_scale: prototype.size,
                    points: prototype
                        .coord_x
                        .iter()
                        .zip(&prototype.coord_y)
                        .map(|(&x, &y)| (x, y))
                        .collect(),
                    coords_z: prototype.coord_z.clone(),
                    indices: prototype.indices.clone(),
                });
            } else {
                prototypes.push(BrushPrototype::Uri {
                    min_scale: prototype.size,
                    shape_uri: prototype.shape_uri.clone(),
                });
            }
        }
        brushes
            .add_vector_brush(VectorBrush {
                name: brush.name.clone(),
                prototypes,
                spacing: brush.spacing,
            })
            .map_err(|e| CodecError::consistency("BRSH", e))?;
    }
    for brush in &message.raster_brushes {
        let shape =
            RasterBrush::shape_from_wire(&brush.name, brush.shape_texture.clone(), brush.shape_texture_uri.clone())
                .map_err(|e| CodecError::consistency("BRSH", e))?;
        let fill =
            RasterBrush::fill_from_wire(&brush.name, brush.fill_texture.clone(), brush.fill_texture_uri.clone())
                .map_err(|e| CodecError::consistency("BRSH", e))?;
        brushes
            .add_raster_brush(RasterBrush {
                name: brush.name.clone(),
                spacing: brush.spacing,
                scattering: brush.scattering,
                rotation: rotation_from_proto(brush.rotation_mode),
                shape,
                fill,
                fill_width: brush.fill_width,
                fill_height: brush.fill_height,
                randomize_fill: brush.randomize_fill,
                blend_mode: blend_from_proto(brush.blend_mode),
            })
            .map_err(|e| CodecError::consistency("BRSH", e))?;
    }
    Ok(())
}

pub(crate) fn rotation_from_proto(value: i32) -> RotationMode {
    match proto::RotationMode::try_from(value) {
        Ok(proto::RotationMode::Random) => RotationMode::Random,
        Ok(proto::RotationMode::Trajectory) => RotationMode::Trajectory,
        _ => RotationMode::None,
    }
}

pub(crate) fn blend_from_proto(value: i32) -> BlendMode {
    match proto::BlendMode::try_from(value) {
        Ok(proto::BlendMode::DestinationOver) => BlendMode::DestinationOver,
        Ok(proto::BlendMode::DestinationOut) => BlendMode::DestinationOut,
        Ok(proto::BlendMode::Lighter) => BlendMode::Lighter,
        Ok(proto::BlendMode::Copy) => BlendMode::Copy,
        Ok(proto::BlendMode::Min) => BlendMode::Min,
        Ok(proto::BlendMode::Max) => BlendMode::Max,
        _ => BlendMode::SourceOver,
    }
}

/// Unpacks the palette colour integer into float components.
pub(crate) fn unpack_color(color: i32) -> (f32, f32, f32, f32) {
    #[allow(clippy::cast_sign_loss)]
    let packed = color as u32;
    let byte = |shift: u32| uink_model::color_byte_to_float(((packed >> shift) & 0xff) as u8);
    (byte(24), byte(16), byte(8), byte(0))
}

pub(crate) fn ppp_from_proto(message: &proto::PathPointProperties) -> PathPointProperties {
    let (red, green, blue, alpha) = unpack_color(message.color);
    PathPointProperties::from_components(
        message.size,
        red,
        green,
        blue,
        alpha,
        message.rotation,
        message.scale_x,
        message.scale_y,
        message.scale_z,
        message.offset_x,
        message.offset_y,
        message.offset_z,
    )
}

pub(crate) fn matrix_from_proto(message: &proto::Matrix) -> Matrix4 {
    Matrix4::from_rows([
        [message.m00, message.m01, message.m02, message.m03],
        [message.m10, message.m11, message.m12, message.m13],
        [message.m20, message.m21, message.m22, message.m23],
        [message.m30, message.m31, message.m32, message.m33],
    ])
}

fn color_bytes(values: &[u32]) -> Vec<u8> {
    values.iter().map(|&v| v.min(255) as u8).collect()
}

fn parse_ink_data(
    model: &mut InkModel,
    message: &proto::InkData,
) -> Result<Vec<UimId>, CodecError> {
    let palette: Vec<PathPointProperties> =
        message.properties.iter().map(ppp_from_proto).collect();

    let mut order = Vec::with_capacity(message.strokes.len());
    for stroke_message in &message.strokes {
        let mut stroke = Stroke::with_id(parse_id(&stroke_message.id, false, "INKD")?);
        stroke.start_parameter = stroke_message.start_parameter;
        stroke.end_parameter = stroke_message.end_parameter;
        stroke.sensor_data_id = parse_opt_id(&stroke_message.sensor_data_id, false, "INKD")?;
        stroke.sensor_data_offset = stroke_message.sensor_data_offset;
        stroke.sensor_data_mapping = stroke_message.sensor_data_mapping.clone();
        stroke.random_seed = stroke_message.random_seed;
        stroke.properties_index = stroke_message.properties_index;

        match &stroke_message.data {
            Some(proto::stroke::Data::SplineData(data)) => {
                stroke.spline_x = data.spline_x.clone();
                stroke.spline_y = data.spline_y.clone();
                stroke.spline_z = data.spline_z.clone();
                stroke.sizes = data.size.clone();
                stroke.rotations = data.rotation.clone();
                stroke.red = color_bytes(&data.red);
                stroke.green = color_bytes(&data.green);
                stroke.blue = color_bytes(&data.blue);
                stroke.alpha = color_bytes(&data.alpha);
                stroke.scales_x = data.scale_x.clone();
                stroke.scales_y = data.scale_y.clone();
                stroke.scales_z = data.scale_z.clone();
                stroke.offsets_x = data.offset_x.clone();
                stroke.offsets_y = data.offset_y.clone();
                stroke.offsets_z = data.offset_z.clone();
                stroke.tangents_x = data.tangent_x.clone();
                stroke.tangents_y = data.tangent_y.clone();
            }
            Some(proto::stroke::Data::SplineCompressed(data)) => {
                let scheme = PrecisionScheme::from_value(stroke_message.precisions);
                let dec = delta::decode_f32_stream;
                stroke.spline_x = dec(&data.spline_x, scheme.position());
                stroke.spline_y = dec(&data.spline_y, scheme.position());
                stroke.spline_z = dec(&data.spline_z, scheme.position());
                stroke.sizes = dec(&data.size, scheme.size());
                stroke.rotations = dec(&data.rotation, scheme.rotation());
                stroke.red = color_bytes(&data.red);
                stroke.green = color_bytes(&data.green);
                stroke.blue = color_bytes(&data.blue);
                stroke.alpha = color_bytes(&data.alpha);
                stroke.scales_x = dec(&data.scale_x, scheme.scale());
                stroke.scales_y = dec(&data.scale_y, scheme.scale());
                stroke.scales_z = dec(&data.scale_z, scheme.scale());
                stroke.offsets_x = dec(&data.offset_x, scheme.offset());
                stroke.offsets_y = dec(&data.offset_y, scheme.offset());
                stroke.offsets_z = dec(&data.offset_z, scheme.offset());
                stroke.tangents_x = dec(&data.tangent_x, scheme.position());
                stroke.tangents_y = dec(&data.tangent_y, scheme.position());
                stroke.precision_scheme = Some(scheme);
            }
            None => {}
        }

        let mut style = Style::default();
        if stroke_message.properties_index > 0 {
            if let Some(ppp) = palette.get(stroke_message.properties_index as usize - 1) {
                style.properties = ppp.clone();
            }
        }
        if stroke_message.brush_uri_index > 0 {
            style.brush_uri = message
                .brush_uris
                .get(stroke_message.brush_uri_index as usize - 1)
                .cloned();
        }
        if stroke_message.render_mode_uri_index > 0 {
            if let Some(uri) = message
                .render_mode_uris
                .get(stroke_message.render_mode_uri_index as usize - 1)
            {
                style.render_mode_uri = uri.clone();
            }
        }
        style.particles_random_seed = stroke_message.random_seed;
        stroke.style = style;

        order.push(stroke.id());
        model.add_stroke(stroke);
    }

    if message.unit_scale_factor != 0.0 {
        model.set_unit_scale_factor(message.unit_scale_factor);
    }
    if let Some(transform) = &message.transform {
        model.set_transform(matrix_from_proto(transform));
    }
    Ok(order)
}

/// Rebuilds a tree from its pre-order node list.
///
/// The parent stack mirrors the depth markers: a node at depth `d` attaches
/// to the most recent node seen at depth `d - 1`.
fn build_tree(
    message: &proto::InkTree,
    name: &str,
    stroke_order: &[UimId],
    options: DecodeOptions,
) -> Result<InkTree, CodecError> {
    if message.tree.is_empty() {
        return Err(CodecError::format("INKS", "tree node list is empty"));
    }
    if message.tree[0].depth != 0 {
        return Err(CodecError::format("INKS", "tree root depth must be 0"));
    }
    let mut tree = InkTree::new(name);
    // parents[d] is the most recent node at depth d.
    let mut parents: Vec<uink_model::NodeIndex> = Vec::new();

    for (position, node) in message.tree.iter().enumerate() {
        let depth = node.depth as usize;
        if position == 0 {
            let Some(proto::node::Id::GroupId(id)) = &node.id else {
                return Err(CodecError::format("INKS", "tree root must be a group"));
            };
            let root = tree.create_group_with_id(parse_id(id, false, "INKS")?);
            apply_bounds(&mut tree, root, node);
            tree.set_root(root)
                .map_err(|e| CodecError::consistency("INKS", e))?;
            parents.push(root);
            continue;
        }
        if depth == 0 || depth > parents.len() {
            return Err(CodecError::format(
                "INKS",
                format!("node {position} has non-monotonic depth {depth}"),
            ));
        }

        let index = match &node.id {
            Some(proto::node::Id::GroupId(id)) => {
                tree.create_group_with_id(parse_id(id, false, "INKS")?)
            }
            Some(proto::node::Id::Index(stroke_index)) => {
                let Some(stroke_id) = stroke_order.get(*stroke_index as usize) else {
                    if options.lenient {
                        tracing::warn!(
                            stroke_index = *stroke_index,
                            "dropping node referencing unknown stroke"
                        );
                        continue;
                    }
                    return Err(CodecError::format(
                        "INKS",
                        format!("stroke index {stroke_index} does not exist in the ink data"),
                    ));
                };
                let fragment = parse_fragment(node)?;
                tree.create_stroke_ref(*stroke_id, fragment)
            }
            None => {
                return Err(CodecError::format(
                    "INKS",
                    format!("node {position} carries neither group id nor stroke index"),
                ))
            }
        };
        apply_bounds(&mut tree, index, node);
        tree.attach(parents[depth - 1], index)
            .map_err(|e| CodecError::consistency("INKS", e))?;
        parents.truncate(depth);
        parents.push(index);
    }
    Ok(tree)
}

fn apply_bounds(tree: &mut InkTree, index: uink_model::NodeIndex, node: &proto::Node) {
    if let Some(rect) = &node.bounds {
        tree.set_bounds(
            index,
            Some(uink_model::BoundingBox::new(
                f64::from(rect.x),
                f64::from(rect.y),
                f64::from(rect.width),
                f64::from(rect.height),
            )),
        );
    }
}

fn parse_fragment(node: &proto::Node) -> Result<Option<Fragment>, CodecError> {
    let Some(interval) = &node.interval else {
        return Ok(None);
    };
    if interval.to_index == 0 {
        return Ok(None);
    }
    Fragment::new(
        interval.from_index,
        interval.to_index,
        interval.from_t_value,
        interval.to_t_value,
    )
    .map(Some)
    .map_err(|e| CodecError::consistency("INKS", e))
}
