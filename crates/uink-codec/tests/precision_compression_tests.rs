// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>

#![allow(missing_docs)]
//! Fixed-point spline coding under chunk compression.

use uink_codec::{encode, encode_with, parse, ChunkReader, EncodeOptions, Head};
use uink_model::{InkModel, InkTree, PrecisionScheme, Stroke, Style};

fn thousand_sample_model() -> (InkModel, uink_model::UimId) {
    let mut stroke = Stroke::new();
    stroke.spline_x = (0..1000).map(|i| i as f32 * 0.0175).collect();
    stroke.spline_y = (0..1000).map(|i| i as f32 * 0.5).collect();
    stroke.sizes = vec![1.5; 1000];
    stroke.style = Style::default();
    stroke.precision_scheme = Some(PrecisionScheme::new(2, 1, 0, 0, 0));
    let stroke_id = stroke.id();

    let mut model = InkModel::new();
    model.add_stroke(stroke);
    let mut main = InkTree::new("main");
    let root = main.create_group();
    main.set_root(root).unwrap();
    let node = main.create_stroke_ref(stroke_id, None);
    main.attach(root, node).unwrap();
    model.add_tree(main).unwrap();
    (model, stroke_id)
}

#[test]
fn lzma_compressed_precision_round_trip() {
    let (model, stroke_id) = thousand_sample_model();

    let compressed = encode_with(
        &model,
        EncodeOptions {
            compression: uink_codec::Compression::Lzma,
        },
    )
    .unwrap();
    let uncompressed = encode(&model).unwrap();
    assert!(compressed.len() < uncompressed.len());

    let head = Head::from_bytes(ChunkReader::new(&compressed[12..]).next_chunk().unwrap().payload)
        .unwrap();
    assert_eq!(head.compression, uink_codec::Compression::Lzma);

    let decoded = parse(&compressed).unwrap();
    let stroke = decoded.stroke_by_id(stroke_id).unwrap();
    assert_eq!(stroke.point_count(), 1000);
    assert_eq!(stroke.precision_scheme, Some(PrecisionScheme::new(2, 1, 0, 0, 0)));

    // Two decimal digits of position precision bound the error by 0.005.
    for (i, got) in stroke.spline_x.iter().enumerate() {
        let want = i as f32 * 0.0175;
        assert!(
            (got - want).abs() <= 0.005,
            "sample {i}: {got} vs {want}"
        );
    }
    // One decimal digit for sizes.
    for got in &stroke.sizes {
        assert!((got - 1.5).abs() <= 0.05);
    }
}

#[test]
fn zip_compressed_file_round_trips() {
    let (model, _) = thousand_sample_model();
    let bytes = encode_with(
        &model,
        EncodeOptions {
            compression: uink_codec::Compression::Zip,
        },
    )
    .unwrap();
    let decoded = parse(&bytes).unwrap();
    assert_eq!(decoded.strokes().len(), 1);
}

#[test]
fn float_splines_round_trip_exactly_without_scheme() {
    let (mut model, stroke_id) = thousand_sample_model();
    model.stroke_by_id_mut(stroke_id).unwrap().precision_scheme = None;
    let decoded = parse(&encode(&model).unwrap()).unwrap();
    assert_eq!(
        decoded.stroke_by_id(stroke_id).unwrap().spline_x,
        model.stroke_by_id(stroke_id).unwrap().spline_x
    );
    assert_eq!(decoded, model);
}
