// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Whole-document encode/parse round trips.

mod common;

use prost::Message;
use uink_codec::{encode, parse, ChunkReader, Head, CHUNK_DATA, CHUNK_HEAD, CHUNK_INPUT_DATA};
use uink_model::{
    semantics, InkModel, InkTree, InputDevice, InkInputProvider, InputProviderKind, SensorType,
    UimId,
};

#[test]
fn empty_model_round_trip() {
    let mut model = InkModel::new();
    model.set_unit_scale_factor(1.5);

    let bytes = encode(&model).unwrap();

    // Envelope and header bytes are part of the contract.
    assert_eq!(&bytes[0..4], b"RIFF");
    assert_eq!(&bytes[8..12], b"UINK");
    let body = &bytes[12..];
    let mut reader = ChunkReader::new(body);
    let head_chunk = reader.next_chunk().unwrap();
    assert_eq!(head_chunk.id, CHUNK_HEAD);
    let head = Head::from_bytes(head_chunk.payload).unwrap();
    assert_eq!(head.version(), (3, 1, 0));
    assert_eq!(head.content_type.tag(), 0); // PROTOBUF
    assert_eq!(head.compression.tag(), 0); // NONE
    assert_eq!(reader.next_chunk().unwrap().id, CHUNK_DATA);

    let decoded = parse(&bytes).unwrap();
    assert_eq!(decoded.unit_scale_factor(), 1.5);
    assert!(decoded.input_configuration().is_empty());
    assert!(decoded.brushes().is_empty());
    assert!(decoded.strokes().is_empty());
    assert!(decoded.main_tree().is_none());
    assert!(decoded.knowledge_graph().is_empty());
    assert!(decoded.transform().is_identity());
    assert_eq!(decoded, model);
}

#[test]
fn single_stroke_main_tree() {
    let (model, stroke_id) = common::single_stroke_model();
    let bytes = encode(&model).unwrap();

    // The timestamp stream is delta coded on the wire: absolute first
    // value, positive differences after it.
    let body = &bytes[12..];
    let mut reader = ChunkReader::new(body);
    let _head = reader.next_chunk().unwrap();
    let data = reader.next_chunk().unwrap();
    let mut sections = ChunkReader::new(data.payload);
    let mut wire_timestamps = None;
    while !sections.is_exhausted() {
        let section = sections.next_chunk().unwrap();
        if section.id == CHUNK_INPUT_DATA {
            let message = uink_codec::proto::InputData::decode(section.payload).unwrap();
            wire_timestamps = Some(message.sensor_data[0].data_channels[0].values.clone());
        }
    }
    assert_eq!(wire_timestamps.unwrap(), vec![100, 7, 8]);

    let decoded = parse(&bytes).unwrap();
    assert_eq!(decoded.strokes().len(), 1);
    let stroke = decoded.stroke_by_id(stroke_id).unwrap();
    assert_eq!(stroke.point_count(), 3);
    assert_eq!(stroke.layout_mask().stride(), 3);
    assert_eq!(
        decoded.channel_data_values(stroke, SensorType::Timestamp),
        vec![100.0, 107.0, 115.0]
    );
    assert_eq!(decoded, model);
}

#[test]
fn hwr_view_with_named_entity() {
    let (mut model, stroke_ids) = common::model_with_strokes(4);

    let mut view = InkTree::new("hwr");
    let view_root = view.create_group();
    view.set_root(view_root).unwrap();
    model.add_tree(view).unwrap();
    let view_root = model.view("hwr").unwrap().root().unwrap();
    let word = model.add_group("hwr", view_root).unwrap();
    for id in &stroke_ids {
        model.add_stroke_ref("hwr", word, *id, None).unwrap();
    }

    let word_uri = model.node_uri("hwr", word).unwrap();
    let ne_uri = semantics::named_entity_uri(UimId::random());
    model.add_semantic_triple(&word_uri, semantics::schema::rdf::IS, semantics::schema::segmentation::WORD);
    model.add_semantic_triple(&word_uri, semantics::schema::segmentation::HAS_CONTENT, "ink");
    model.add_semantic_triple(&word_uri, semantics::schema::segmentation::HAS_LANGUAGE, "en_US");
    model.add_semantic_triple(&word_uri, semantics::schema::segmentation::PART_OF_NAMED_ENTITY, &ne_uri);
    model.add_semantic_triple(&ne_uri, semantics::schema::ner::HAS_LABEL, "Ink");
    model.add_semantic_triple(&ne_uri, semantics::schema::ner::HAS_UNIQUE_ID, "Q127418");
    model.add_semantic_triple(&ne_uri, semantics::schema::ner::HAS_SOURCE, "wikidata");
    model.add_semantic_triple(&ne_uri, semantics::schema::ner::HAS_CONFIDENCE, "0.95");
    model.add_semantic_triple(
        &ne_uri,
        semantics::schema::ner::HAS_ARTICLE_URL,
        "https://en.wikipedia.org/wiki/Ink",
    );

    let decoded = parse(&encode(&model).unwrap()).unwrap();

    // Triple order and URIs survive byte-exact.
    let original: Vec<_> = model.knowledge_graph().statements().to_vec();
    let roundtripped: Vec<_> = decoded.knowledge_graph().statements().to_vec();
    assert_eq!(original, roundtripped);
    assert!(decoded.is_registered(&word_uri));
    assert_eq!(decoded.view("hwr").unwrap().stroke_ids().len(), 4);
    assert_eq!(decoded, model);
}

#[test]
fn mixed_providers() {
    let mut model = InkModel::new();
    let mut provider_ids = Vec::new();
    for kind in [
        InputProviderKind::Pen,
        InputProviderKind::Touch,
        InputProviderKind::Mouse,
    ] {
        let provider_id = model
            .input_configuration_mut()
            .add_provider(InkInputProvider::new(kind, vec![]));
        let device_id = model
            .input_configuration_mut()
            .add_device(InputDevice::new(vec![(
                "dev.kind".to_string(),
                format!("{kind:?}"),
            )]));
        let channel_context = uink_model::SensorChannelsContext::new(
            vec![uink_model::SensorChannel::new(
                SensorType::X,
                uink_model::MetricKind::Length,
                1.0,
            )],
            None,
            None,
            Some(provider_id),
            Some(device_id),
        );
        model
            .input_configuration_mut()
            .add_sensor_context(uink_model::SensorContext::new(vec![channel_context]));
        provider_ids.push(provider_id);
    }

    let decoded = parse(&encode(&model).unwrap()).unwrap();
    let config = decoded.input_configuration();
    assert_eq!(config.providers().len(), 3);
    assert_eq!(config.devices().len(), 3);
    assert_eq!(config.sensor_contexts().len(), 3);
    // Provider types differ, so no two providers share a content id.
    assert_ne!(provider_ids[0].value(), provider_ids[1].value());
    assert_ne!(provider_ids[1].value(), provider_ids[2].value());
    for ctx in config.sensor_contexts() {
        for cc in ctx.channel_contexts() {
            let provider = cc.provider_id().unwrap();
            assert!(config.provider(provider).is_ok());
        }
    }
    assert_eq!(decoded, model);
}

#[test]
fn properties_round_trip_in_order() {
    let mut model = InkModel::new();
    model.add_property("Author", "John");
    model.add_property("PrimaryLanguage", "en_US");
    model.add_property("OtherStuff", "Yes");
    let decoded = parse(&encode(&model).unwrap()).unwrap();
    assert_eq!(decoded.properties(), model.properties());
}

#[test]
fn fragments_survive_round_trip() {
    let (mut model, stroke_ids) = common::model_with_strokes(1);
    let mut view = InkTree::new("seg");
    let root = view.create_group();
    view.set_root(root).unwrap();
    model.add_tree(view).unwrap();
    let root = model.view("seg").unwrap().root().unwrap();
    let fragment = uink_model::Fragment::new(0, 1, 0.0, 1.0).unwrap();
    model
        .add_stroke_ref("seg", root, stroke_ids[0], Some(fragment))
        .unwrap();

    let decoded = parse(&encode(&model).unwrap()).unwrap();
    let view = decoded.view("seg").unwrap();
    let fragments: Vec<_> = view
        .pre_order()
        .filter_map(|(i, _)| view.node(i).and_then(uink_model::InkNode::fragment))
        .collect();
    assert_eq!(fragments, vec![fragment]);
    assert_eq!(decoded, model);
}
