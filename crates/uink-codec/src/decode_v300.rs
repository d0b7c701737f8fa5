// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Legacy v3.0.0 decoder.
//!
//! A 3.0.0 body is one `InkObject` message in the `DATA` chunk. Identifiers
//! travel as S-form strings and stroke styles are inline. Everything is
//! normalized into the 3.1.0 in-memory shape; legacy view names become
//! their short forms and legacy group URIs (`uim:<uuid>/<tree>`) are
//! rewritten to the 3.1.0 form (`uim:<tree>/<uuid>`) across the triple
//! store, subjects and objects alike.

use std::collections::HashMap;

use prost::Message;

use uink_model::semantics::{legacy_group_uri, CommonView};
use uink_model::{
    BrushPrototype, Environment, Fragment, InkInputProvider, InkModel, InkTree, InputContext,
    InputDevice, InputProviderKind, MetricKind, ModelError, NodeKind, PathPointProperties,
    RasterBrush, SensorChannel, SensorChannelsContext, SensorContext, SensorData, SensorType,
    Stroke, Style, UimId, VectorBrush,
};

use crate::error::CodecError;
use crate::head::LEGACY_VERSION;
use crate::proto::legacy;
use crate::{decode_v310, delta, proto, DecodeOptions};

/// Decodes a 3.0.0 `InkObject` payload into the 3.1.0 in-memory shape.
pub(crate) fn decode_body(
    payload: &[u8],
    options: DecodeOptions,
) -> Result<InkModel, CodecError> {
    let document = legacy::InkObject::decode(payload).map_err(|e| CodecError::Proto {
        context: "DATA",
        source: e,
    })?;

    let mut model = InkModel::new();
    model.set_version(LEGACY_VERSION);

    for property in &document.properties {
        model.add_property(&property.name, &property.value);
    }
    if let Some(input_data) = &document.input_data {
        parse_input_data(&mut model, input_data, options)?;
    }
    if let Some(brushes) = &document.brushes {
        parse_brushes(&mut model, brushes)?;
    }

    let mut stroke_order: Vec<UimId> = Vec::new();
    if let Some(ink_data) = &document.ink_data {
        for stroke_message in &ink_data.strokes {
            let stroke = parse_stroke(stroke_message)?;
            stroke_order.push(stroke.id());
            model.add_stroke(stroke);
        }
        if ink_data.unit_scale_factor != 0.0 {
            model.set_unit_scale_factor(ink_data.unit_scale_factor);
        }
        if let Some(transform) = &ink_data.transform {
            model.set_transform(decode_v310::matrix_from_proto(transform));
        }
    }

    if let Some(graph) = &document.knowledge_graph {
        for statement in &graph.statements {
            model.add_semantic_triple(&statement.subject, &statement.predicate, &statement.object);
        }
    }

    if !document.ink_tree.is_empty() {
        let tree = build_tree(&document.ink_tree, "main", &stroke_order, options)?;
        model
            .add_tree(tree)
            .map_err(|e| CodecError::consistency("DATA", e))?;
    }
    for view in &document.views {
        let name = CommonView::normalize(&view.name).to_string();
        let tree = build_tree(&view.tree, &name, &stroke_order, options)?;
        model
            .add_tree(tree)
            .map_err(|e| CodecError::consistency("DATA", e))?;
    }

    upgrade_uris(&mut model);
    Ok(model)
}

fn parse_str_id(text: &str, hashed: bool, context: &'static str) -> Result<UimId, CodecError> {
    let parsed = if hashed {
        UimId::parse_hashed(text)
    } else {
        UimId::parse_random(text)
    };
    parsed.map_err(|e| CodecError::consistency(context, e))
}

fn parse_opt_str_id(
    text: &str,
    hashed: bool,
    context: &'static str,
) -> Result<Option<UimId>, CodecError> {
    if text.is_empty() {
        return Ok(None);
    }
    parse_str_id(text, hashed, context).map(Some)
}

fn proto_properties(props: &[proto::Property]) -> Vec<(String, String)> {
    props
        .iter()
        .map(|p| (p.name.clone(), p.value.clone()))
        .collect()
}

fn parse_input_data(
    model: &mut InkModel,
    message: &legacy::InputData,
    options: DecodeOptions,
) -> Result<(), CodecError> {
    if let Some(data) = &message.input_context_data {
        for env in &data.environments {
            let id = parse_str_id(&env.id, true, "DATA")?;
            model
                .input_configuration_mut()
                .add_environment(Environment::with_id(id, proto_properties(&env.properties)));
        }
        for provider in &data.ink_input_providers {
            let id = parse_str_id(&provider.id, true, "DATA")?;
            let kind = match proto::InputProviderKind::try_from(provider.r#type) {
                Ok(proto::InputProviderKind::Touch) => InputProviderKind::Touch,
                Ok(proto::InputProviderKind::Mouse) => InputProviderKind::Mouse,
                Ok(proto::InputProviderKind::Controller) => InputProviderKind::Controller,
                _ => InputProviderKind::Pen,
            };
            model.input_configuration_mut().add_provider(InkInputProvider::with_id(
                id,
                kind,
                proto_properties(&provider.properties),
            ));
        }
        for device in &data.input_devices {
            let id = parse_str_id(&device.id, true, "DATA")?;
            model
                .input_configuration_mut()
                .add_device(InputDevice::with_id(id, proto_properties(&device.properties)));
        }
        for sensor_ctx in &data.sensor_contexts {
            let mut channel_contexts = Vec::new();
            for cc in &sensor_ctx.sensor_channels_context {
                let provider_id = parse_opt_str_id(&cc.ink_input_provider_id, true, "DATA")?;
                let device_id = parse_opt_str_id(&cc.input_device_id, true, "DATA")?;
                let mut channels = Vec::new();
                for channel in &cc.channels {
                    let Some(channel_type) = SensorType::from_uri(&channel.r#type) else {
                        if options.lenient {
                            tracing::warn!(uri = %channel.r#type, "dropping unknown channel type");
                            continue;
                        }
                        return Err(CodecError::consistency(
                            "DATA",
                            ModelError::Format(format!(
                                "unknown sensor channel type {}",
                                channel.r#type
                            )),
                        ));
                    };
                    let metric = match proto::MetricKind::try_from(channel.metric) {
                        Ok(proto::MetricKind::Time) => MetricKind::Time,
                        Ok(proto::MetricKind::Force) => MetricKind::Force,
                        Ok(proto::MetricKind::Angle) => MetricKind::Angle,
                        Ok(proto::MetricKind::Normalized) => MetricKind::Normalized,
                        _ => MetricKind::Length,
                    };
                    channels.push(SensorChannel::with_id(
                        parse_str_id(&channel.id, true, "DATA")?,
                        channel_type,
                        metric,
                        channel.resolution,
                        channel.min,
                        channel.max,
                        channel.precision,
                        provider_id,
                        device_id,
                    ));
                }
                channel_contexts.push(SensorChannelsContext::with_id(
                    parse_str_id(&cc.id, true, "DATA")?,
                    channels,
                    (cc.sampling_rate_hint != 0).then_some(cc.sampling_rate_hint),
                    (cc.latency != 0).then_some(cc.latency),
                    provider_id,
                    device_id,
                ));
            }
            model.input_configuration_mut().add_sensor_context(SensorContext::with_id(
                parse_str_id(&sensor_ctx.id, true, "DATA")?,
                channel_contexts,
            ));
        }
        for ctx in &data.input_contexts {
            model.input_configuration_mut().add_input_context(InputContext::with_id(
                parse_str_id(&ctx.id, true, "DATA")?,
                parse_opt_str_id(&ctx.environment_id, true, "DATA")?,
                parse_opt_str_id(&ctx.sensor_context_id, true, "DATA")?,
            ));
        }
    }

    for frame in &message.sensor_data {
        let input_context_id = parse_str_id(&frame.input_context_id, true, "DATA")?;
        let sensor_ctx = model
            .input_configuration()
            .input_context(input_context_id)
            .and_then(|ctx| {
                ctx.sensor_context_id()
                    .map(|id| model.input_configuration().sensor_context(id))
                    .transpose()
            })
            .map_err(|e| CodecError::consistency("DATA", e))?
            .cloned();

        let state = decode_v310::state_from_proto(frame.state);
        let mut out = SensorData::new(parse_str_id(&frame.id, false, "DATA")?, input_context_id, state);
        out.set_timestamp_ms(frame.timestamp);
        for channel_data in &frame.data_channels {
            let channel_id = parse_str_id(&channel_data.sensor_channel_id, true, "DATA")?;
            let channel = sensor_ctx
                .as_ref()
                .and_then(|ctx| ctx.channel_by_id(channel_id).ok().cloned());
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

fn parse_brushes(model: &mut InkModel, message: &legacy::Brushes) -> Result<(), CodecError> {
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
        model
            .brushes_mut()
            .add_vector_brush(VectorBrush {
                name: brush.name.clone(),
                prototypes,
                spacing: brush.spacing,
            })
            .map_err(|e| CodecError::consistency("DATA", e))?;
    }
    for brush in &message.raster_brushes {
        let shape = RasterBrush::shape_from_wire(
            &brush.name,
            brush.shape_texture.clone(),
            brush.shape_texture_uri.clone(),
        )
        .map_err(|e| CodecError::consistency("DATA", e))?;
        let fill = RasterBrush::fill_from_wire(
            &brush.name,
            brush.fill_texture.clone(),
            brush.fill_texture_uri.clone(),
        )
        .map_err(|e| CodecError::consistency("DATA", e))?;
        model
            .brushes_mut()
            .add_raster_brush(RasterBrush {
                name: brush.name.clone(),
                spacing: brush.spacing,
                scattering: brush.scattering,
                rotation: decode_v310::rotation_from_proto(brush.rotation_mode),
                shape,
                fill,
                fill_width: brush.fill_width,
                fill_height: brush.fill_height,
                randomize_fill: brush.randomize_fill,
                blend_mode: decode_v310::blend_from_proto(brush.blend_mode),
            })
            .map_err(|e| CodecError::consistency("DATA", e))?;
    }
    Ok(())
}

fn parse_stroke(message: &legacy::Stroke) -> Result<Stroke, CodecError> {
    let mut stroke = Stroke::with_id(parse_str_id(&message.id, false, "DATA")?);
    stroke.start_parameter = message.start_parameter;
    stroke.end_parameter = message.end_parameter;
    stroke.sensor_data_id = parse_opt_str_id(&message.sensor_data_id, false, "DATA")?;
    stroke.sensor_data_offset = message.sensor_data_offset;
    stroke.sensor_data_mapping = message.sensor_data_mapping.clone();

    if let Some(data) = &message.spline_data {
        let bytes = |values: &[u32]| values.iter().map(|&v| v.min(255) as u8).collect::<Vec<u8>>();
        stroke.spline_x = data.spline_x.clone();
        stroke.spline_y = data.spline_y.clone();
        stroke.spline_z = data.spline_z.clone();
        stroke.sizes = data.size.clone();
        stroke.rotations = data.rotation.clone();
        stroke.red = bytes(&data.red);
        stroke.green = bytes(&data.green);
        stroke.blue = bytes(&data.blue);
        stroke.alpha = bytes(&data.alpha);
        stroke.scales_x = data.scale_x.clone();
        stroke.scales_y = data.scale_y.clone();
        stroke.scales_z = data.scale_z.clone();
        stroke.offsets_x = data.offset_x.clone();
        stroke.offsets_y = data.offset_y.clone();
        stroke.offsets_z = data.offset_z.clone();
        stroke.tangents_x = data.tangent_x.clone();
        stroke.tangents_y = data.tangent_y.clone();
    }

    if let Some(style_message) = &message.style {
        let mut style = Style::default();
        if let Some(ppp) = &style_message.properties {
            style.properties = legacy_ppp(ppp);
        }
        if !style_message.brush_uri.is_empty() {
            style.brush_uri = Some(style_message.brush_uri.clone());
        }
        if !style_message.render_mode_uri.is_empty() {
            style.render_mode_uri = style_message.render_mode_uri.clone();
        }
        style.particles_random_seed = style_message.particles_random_seed;
        stroke.random_seed = style_message.particles_random_seed;
        stroke.style = style;
    }
    Ok(stroke)
}

fn legacy_ppp(message: &legacy::PathPointProperties) -> PathPointProperties {
    let (red, green, blue, alpha) = decode_v310::unpack_color(message.color);
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

fn build_tree(
    nodes: &[legacy::Node],
    name: &str,
    stroke_order: &[UimId],
    options: DecodeOptions,
) -> Result<InkTree, CodecError> {
    if nodes.is_empty() {
        return Err(CodecError::format("DATA", "tree node list is empty"));
    }
    if nodes[0].depth != 0 {
        return Err(CodecError::format("DATA", "tree root depth must be 0"));
    }
    let mut tree = InkTree::new(name);
    let mut parents: Vec<uink_model::NodeIndex> = Vec::new();

    for (position, node) in nodes.iter().enumerate() {
        let depth = node.depth as usize;
        if position == 0 {
            let Some(legacy::node::Id::GroupId(id)) = &node.id else {
                return Err(CodecError::format("DATA", "tree root must be a group"));
            };
            let root = tree.create_group_with_id(parse_str_id(id, false, "DATA")?);
            tree.set_root(root)
                .map_err(|e| CodecError::consistency("DATA", e))?;
            parents.push(root);
            continue;
        }
        if depth == 0 || depth > parents.len() {
            return Err(CodecError::format(
                "DATA",
                format!("node {position} has non-monotonic depth {depth}"),
            ));
        }
        let index = match &node.id {
            Some(legacy::node::Id::GroupId(id)) => {
                tree.create_group_with_id(parse_str_id(id, false, "DATA")?)
            }
            Some(legacy::node::Id::Index(stroke_index)) => {
                let Some(stroke_id) = stroke_order.get(*stroke_index as usize) else {
                    if options.lenient {
                        tracing::warn!(
                            stroke_index = *stroke_index,
                            "dropping node referencing unknown stroke"
                        );
                        continue;
                    }
                    return Err(CodecError::format(
                        "DATA",
                        format!("stroke index {stroke_index} does not exist in the ink data"),
                    ));
                };
                let fragment = match &node.interval {
                    Some(interval) if interval.to_index > 0 => Some(
                        Fragment::new(
                            interval.from_index,
                            interval.to_index,
                            interval.from_t_value,
                            interval.to_t_value,
                        )
                        .map_err(|e| CodecError::consistency("DATA", e))?,
                    ),
                    _ => None,
                };
                tree.create_stroke_ref(*stroke_id, fragment)
            }
            None => {
                return Err(CodecError::format(
                    "DATA",
                    format!("node {position} carries neither group id nor stroke index"),
                ))
            }
        };
        tree.attach(parents[depth - 1], index)
            .map_err(|e| CodecError::consistency("DATA", e))?;
        parents.truncate(depth);
        parents.push(index);
    }
    Ok(tree)
}

/// Rewrites legacy group URIs to the 3.1.0 scheme across the triple store.
fn upgrade_uris(model: &mut InkModel) {
    let mut mapping: HashMap<String, String> = HashMap::new();
    for view in model.views() {
        for (index, _) in view.pre_order() {
            let Some(node) = view.node(index) else {
                continue;
            };
            if matches!(node.kind(), NodeKind::Group { .. }) {
                if let Some(new_uri) = model.node_uri(view.name(), index) {
                    mapping.insert(legacy_group_uri(view.name(), node.id()), new_uri);
                }
            }
        }
    }
    if mapping.is_empty() {
        return;
    }
    let rewritten = model
        .knowledge_graph()
        .statements()
        .iter()
        .map(|s| {
            let subject = mapping.get(&s.subject).cloned().unwrap_or_else(|| s.subject.clone());
            let object = mapping.get(&s.object).cloned().unwrap_or_else(|| s.object.clone());
            (subject, s.predicate.clone(), object)
        })
        .collect::<Vec<_>>();
    let graph = model.knowledge_graph_mut();
    graph.clear();
    for (subject, predicate, object) in rewritten {
        graph.add(&subject, &predicate, &object);
    }
}
