// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! RIFF framing edge cases and the JSON read surface.

mod common;

use prost::Message;
use uink_codec::{
    encode, parse, parse_json_bytes, write_chunk, write_envelope, CodecError, Compression,
    ContentType, Head, CHUNK_DATA, CHUNK_HEAD, CHUNK_PROPERTIES,
};

#[test]
fn malformed_framing_is_a_format_error() {
    // Wrong magic.
    assert!(matches!(
        parse(b"JUNKJUNKJUNKJUNK").unwrap_err(),
        CodecError::Format { .. }
    ));
    // Truncated below the minimum envelope.
    assert!(matches!(
        parse(b"RIFF").unwrap_err(),
        CodecError::Format { .. }
    ));
    // Declared size beyond end of file.
    let mut bytes = encode(&uink_model::InkModel::new()).unwrap();
    bytes[4..8].copy_from_slice(&u32::MAX.to_le_bytes());
    assert!(matches!(
        parse(&bytes).unwrap_err(),
        CodecError::Format { .. }
    ));
}

#[test]
fn truncated_chunk_is_a_format_error() {
    let bytes = encode(&common::single_stroke_model().0).unwrap();
    // Cut the file mid-chunk.
    let err = parse(&bytes[..bytes.len() - 9]).unwrap_err();
    assert!(matches!(err, CodecError::Format { .. }));
}

#[test]
fn unknown_chunks_are_skipped() {
    let properties = uink_codec::proto::Properties {
        properties: vec![uink_codec::proto::Property {
            name: "Author".to_string(),
            value: "John".to_string(),
        }],
    };
    let head = Head {
        major: 3,
        minor: 1,
        patch: 0,
        content_type: ContentType::Protobuf,
        compression: Compression::None,
    };
    let mut data_payload = Vec::new();
    // A chunk id this codec does not know, with an odd payload size so the
    // pad byte is exercised too.
    write_chunk(&mut data_payload, *b"XTRA", &[1, 2, 3]);
    write_chunk(&mut data_payload, CHUNK_PROPERTIES, &properties.encode_to_vec());
    let mut body = Vec::new();
    write_chunk(&mut body, CHUNK_HEAD, &head.to_bytes());
    write_chunk(&mut body, CHUNK_DATA, &data_payload);

    let model = parse(&write_envelope(&body)).unwrap();
    assert_eq!(
        model.properties(),
        &[("Author".to_string(), "John".to_string())]
    );
}

#[test]
fn corrupt_protobuf_payload_names_its_chunk() {
    let head = Head {
        major: 3,
        minor: 1,
        patch: 0,
        content_type: ContentType::Protobuf,
        compression: Compression::None,
    };
    let mut data_payload = Vec::new();
    write_chunk(&mut data_payload, CHUNK_PROPERTIES, &[0xff, 0xff, 0xff]);
    let mut body = Vec::new();
    write_chunk(&mut body, CHUNK_HEAD, &head.to_bytes());
    write_chunk(&mut body, CHUNK_DATA, &data_payload);

    match parse(&write_envelope(&body)).unwrap_err() {
        CodecError::Proto { context, .. } => assert_eq!(context, "PRPS"),
        other => panic!("expected a protobuf error, got {other}"),
    }
}

#[test]
fn json_surface_reads_a_document() {
    let stroke_id = uink_model::UimId::random();
    let group_id = uink_model::UimId::random();
    let document = serde_json::json!({
        "properties": [
            {"name": "Author", "value": "John"}
        ],
        "inkData": {
            "unitScaleFactor": 1.5,
            "strokes": [{
                "id": stroke_id.s_form(),
                "startParameter": 0.0,
                "endParameter": 1.0,
                "splineData": {
                    "splineX": [10.0, 20.0, 20.0],
                    "splineY": [10.0, 10.0, 20.0],
                    "size": [1.0, 1.0, 1.0]
                }
            }]
        },
        "knowledgeGraph": {
            "statements": [
                {"subject": "uim:ne/x", "predicate": "hasLabel", "object": "Ink"}
            ]
        },
        "inkStructure": {
            "inkTree": {
                "name": "",
                "tree": [
                    {"depth": 0, "groupID": group_id.s_form()},
                    {"depth": 1, "index": 0}
                ]
            }
        }
    });

    let model = parse_json_bytes(document.to_string().as_bytes()).unwrap();
    assert_eq!(model.unit_scale_factor(), 1.5);
    assert_eq!(model.strokes().len(), 1);
    let stroke = model.stroke_by_id(stroke_id).unwrap();
    assert_eq!(stroke.point_count(), 3);
    assert_eq!(stroke.layout_mask().stride(), 3);
    assert_eq!(model.knowledge_graph().len(), 1);
    assert_eq!(
        model.properties(),
        &[("Author".to_string(), "John".to_string())]
    );
}

#[test]
fn lenient_decode_drops_dangling_stroke_refs() {
    let group_id = uink_model::UimId::random();
    let structure = uink_codec::proto::InkStructure {
        ink_tree: Some(uink_codec::proto::InkTree {
            name: String::new(),
            tree: vec![
                uink_codec::proto::Node {
                    depth: 0,
                    id: Some(uink_codec::proto::node::Id::GroupId(
                        group_id.to_bytes().to_vec(),
                    )),
                    bounds: None,
                    interval: None,
                },
                // References stroke 7 of an empty ink-data section.
                uink_codec::proto::Node {
                    depth: 1,
                    id: Some(uink_codec::proto::node::Id::Index(7)),
                    bounds: None,
                    interval: None,
                },
            ],
        }),
        views: vec![],
    };
    let head = Head {
        major: 3,
        minor: 1,
        patch: 0,
        content_type: ContentType::Protobuf,
        compression: Compression::None,
    };
    let mut data_payload = Vec::new();
    write_chunk(
        &mut data_payload,
        uink_codec::CHUNK_INK_STRUCTURE,
        &structure.encode_to_vec(),
    );
    let mut body = Vec::new();
    write_chunk(&mut body, CHUNK_HEAD, &head.to_bytes());
    write_chunk(&mut body, CHUNK_DATA, &data_payload);
    let file = write_envelope(&body);

    // Strict mode rejects the dangling reference.
    assert!(parse(&file).is_err());

    // Lenient mode drops it and keeps the rest.
    let model = uink_codec::parse_with(
        &file,
        uink_codec::DecodeOptions { lenient: true },
    )
    .unwrap();
    let main = model.main_tree().unwrap();
    assert_eq!(main.pre_order().count(), 1);
}
