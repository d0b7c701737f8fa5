// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs, dead_code)]
//! Shared model builders for the codec integration tests.

use uink_model::{
    BrushPrototype, InkModel, InkState, InkTree, InputContext, InputDevice, InkInputProvider,
    InputProviderKind, LayoutMask, MetricKind, SensorChannel, SensorChannelsContext, SensorContext,
    SensorData, SensorType, Spline, Stroke, Style, UimId, VectorBrush,
};

pub const TRIANGLE_BRUSH: &str = "app://qa-test-app/vector-brush/MyTriangleBrush";

/// Registers a PEN provider, one device, a timestamp-only channel context,
/// and the input context tying them together.
pub fn timestamp_only_context(model: &mut InkModel) -> (UimId, SensorChannel) {
    let provider_id = model
        .input_configuration_mut()
        .add_provider(InkInputProvider::new(InputProviderKind::Pen, vec![]));
    let device_id = model
        .input_configuration_mut()
        .add_device(InputDevice::new(vec![(
            "dev.id".to_string(),
            "123454321".to_string(),
        )]));
    let channel_context = SensorChannelsContext::new(
        vec![SensorChannel::new(
            SensorType::Timestamp,
            MetricKind::Time,
            1.0,
        )],
        None,
        None,
        Some(provider_id),
        Some(device_id),
    );
    let timestamp_channel = channel_context.channels()[0].clone();
    let sensor_context_id = model
        .input_configuration_mut()
        .add_sensor_context(SensorContext::new(vec![channel_context]));
    let input_context_id = model
        .input_configuration_mut()
        .add_input_context(InputContext::new(None, Some(sensor_context_id)));
    (input_context_id, timestamp_channel)
}

/// A triangular X/Y/SIZE stroke with three samples.
pub fn triangle_stroke(style: Style) -> Stroke {
    let mask = LayoutMask::from_bits(LayoutMask::X | LayoutMask::Y | LayoutMask::SIZE);
    let spline = Spline::new(
        mask,
        vec![10.0, 10.0, 1.0, 20.0, 10.0, 1.0, 20.0, 20.0, 1.0],
    );
    Stroke::from_spline(&spline, style).unwrap()
}

/// The single-stroke document: one PEN input chain, one timestamp frame
/// `[100, 107, 115]` ms, one triangle brush, one stroke in the main tree.
pub fn single_stroke_model() -> (InkModel, UimId) {
    let mut model = InkModel::new();
    let (input_context_id, timestamp_channel) = timestamp_only_context(&mut model);

    let mut frame = SensorData::new(UimId::random(), input_context_id, InkState::Plane);
    frame
        .add_timestamp_data(&timestamp_channel, vec![100.0, 107.0, 115.0])
        .unwrap();
    let frame_id = frame.id();
    model.sensor_data_mut().add(frame);

    model
        .brushes_mut()
        .add_vector_brush(VectorBrush::new(
            TRIANGLE_BRUSH,
            vec![BrushPrototype::Polygon {
                min_scale: 0.0,
                points: vec![(10.0, 10.0), (0.0, 10.0), (0.0, 0.0)],
                coords_z: vec![],
                indices: vec![],
            }],
        ))
        .unwrap();

    let mut stroke = triangle_stroke(Style::with_brush(TRIANGLE_BRUSH));
    stroke.sensor_data_id = Some(frame_id);
    let stroke_id = stroke.id();
    model.add_stroke(stroke);

    let mut main = InkTree::new("main");
    let root = main.create_group();
    main.set_root(root).unwrap();
    let node = main.create_stroke_ref(stroke_id, None);
    main.attach(root, node).unwrap();
    model.add_tree(main).unwrap();
    (model, stroke_id)
}

/// A main tree holding `count` plain strokes; returns their ids in order.
pub fn model_with_strokes(count: usize) -> (InkModel, Vec<UimId>) {
    let mut model = InkModel::new();
    let mut ids = Vec::new();
    let mut main = InkTree::new("main");
    let root = main.create_group();
    main.set_root(root).unwrap();
    for i in 0..count {
        let offset = i as f32 * 10.0;
        let mask = LayoutMask::from_bits(LayoutMask::X | LayoutMask::Y);
        let spline = Spline::new(mask, vec![offset, 0.0, offset + 5.0, 5.0]);
        let stroke = Stroke::from_spline(&spline, Style::default()).unwrap();
        ids.push(stroke.id());
        let node = main.create_stroke_ref(stroke.id(), None);
        main.attach(root, node).unwrap();
        model.add_stroke(stroke);
    }
    model.add_tree(main).unwrap();
    (model, ids)
}
