// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Legacy 3.0.0 files normalize into the 3.1.0 in-memory shape.

use prost::Message;
use uink_codec::proto::legacy;
use uink_codec::{
    encode, parse, write_chunk, write_envelope, Compression, ContentType, Head, CHUNK_DATA,
    CHUNK_HEAD,
};
use uink_model::{NodeKind, UimId};

fn legacy_file(document: &legacy::InkObject) -> Vec<u8> {
    let head = Head {
        major: 3,
        minor: 0,
        patch: 0,
        content_type: ContentType::Protobuf,
        compression: Compression::None,
    };
    let mut body = Vec::new();
    write_chunk(&mut body, CHUNK_HEAD, &head.to_bytes());
    write_chunk(&mut body, CHUNK_DATA, &document.encode_to_vec());
    write_envelope(&body)
}

fn legacy_stroke(id: &str, offset: f32) -> legacy::Stroke {
    legacy::Stroke {
        id: id.to_string(),
        start_parameter: 0.0,
        end_parameter: 1.0,
        spline_data: Some(uink_codec::proto::SplineData {
            spline_x: vec![offset, offset + 5.0],
            spline_y: vec![0.0, 5.0],
            ..Default::default()
        }),
        style: None,
        sensor_data_id: String::new(),
        sensor_data_offset: 0,
        sensor_data_mapping: vec![],
    }
}

fn group_node(id: &str, depth: u32) -> legacy::Node {
    legacy::Node {
        depth,
        id: Some(legacy::node::Id::GroupId(id.to_string())),
        bounds: None,
        interval: None,
    }
}

fn stroke_node(index: u32, depth: u32) -> legacy::Node {
    legacy::Node {
        depth,
        id: Some(legacy::node::Id::Index(index)),
        bounds: None,
        interval: None,
    }
}

#[test]
fn legacy_hwr_view_uris_are_upgraded() {
    let stroke_ids: Vec<UimId> = (0..4).map(|_| UimId::random()).collect();
    let main_root = UimId::random();
    let view_root = UimId::random();
    let word_group = UimId::random();

    let mut ink_tree = vec![group_node(&main_root.s_form(), 0)];
    for index in 0..4 {
        ink_tree.push(stroke_node(index, 1));
    }
    let mut hwr_tree = vec![group_node(&view_root.s_form(), 0), group_node(&word_group.s_form(), 1)];
    for index in 0..4 {
        hwr_tree.push(stroke_node(index, 2));
    }

    // Subjects use the legacy group form `uim:<uuid>/<tree>`.
    let legacy_word_uri = format!("uim:{}/hwr", word_group.h_form());
    let document = legacy::InkObject {
        properties: vec![],
        input_data: None,
        brushes: None,
        ink_data: Some(legacy::InkData {
            strokes: stroke_ids
                .iter()
                .enumerate()
                .map(|(i, id)| legacy_stroke(&id.s_form(), i as f32 * 10.0))
                .collect(),
            unit_scale_factor: 0.0,
            transform: None,
        }),
        knowledge_graph: Some(legacy::KnowledgeGraph {
            statements: vec![
                uink_codec::proto::Statement {
                    subject: legacy_word_uri.clone(),
                    predicate: "@".to_string(),
                    object: "will:seg/0.3/WordOfStrokes".to_string(),
                },
                uink_codec::proto::Statement {
                    subject: legacy_word_uri,
                    predicate: "hasContent".to_string(),
                    object: "ink".to_string(),
                },
            ],
        }),
        ink_tree,
        views: vec![legacy::View {
            name: "will://views/3.0/HWR".to_string(),
            tree: hwr_tree,
        }],
    };

    let upgraded = parse(&legacy_file(&document)).unwrap();
    assert_eq!(upgraded.version(), Some((3, 0, 0)));

    // Legacy view name normalized; every subject now in 3.1.0 form.
    let view = upgraded.view("hwr").unwrap();
    assert_eq!(view.stroke_ids().len(), 4);
    let expected_word_uri = format!("uim:hwr/{}", word_group.h_form());
    let subjects: Vec<&str> = upgraded
        .knowledge_graph()
        .statements()
        .iter()
        .map(|s| s.subject.as_str())
        .collect();
    assert_eq!(subjects, vec![expected_word_uri.as_str(), expected_word_uri.as_str()]);
    assert!(upgraded.is_registered(&expected_word_uri));
    for statement in upgraded.knowledge_graph().statements() {
        assert!(!statement.subject.ends_with("/hwr"));
    }

    // Group nodes kept their identities through the upgrade.
    let group_ids: Vec<UimId> = view
        .pre_order()
        .filter_map(|(i, _)| view.node(i))
        .filter(|n| matches!(n.kind(), NodeKind::Group { .. }))
        .map(uink_model::InkNode::id)
        .collect();
    assert_eq!(group_ids, vec![view_root, word_group]);

    // Re-encoding yields a 3.1.0 file whose re-parse equals the upgrade.
    let reencoded = encode(&upgraded).unwrap();
    let reparsed = parse(&reencoded).unwrap();
    assert_eq!(reparsed.version(), Some((3, 1, 0)));
    assert_eq!(reparsed, upgraded);
}

#[test]
fn unsupported_version_is_rejected() {
    let head = Head {
        major: 9,
        minor: 0,
        patch: 0,
        content_type: ContentType::Protobuf,
        compression: Compression::None,
    };
    let mut body = Vec::new();
    write_chunk(&mut body, CHUNK_HEAD, &head.to_bytes());
    write_chunk(&mut body, CHUNK_DATA, &[]);
    let err = parse(&write_envelope(&body)).unwrap_err();
    assert!(matches!(
        err,
        uink_codec::CodecError::UnsupportedVersion { major: 9, .. }
    ));
}
