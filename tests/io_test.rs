//! PNG decoding and plane output.

mod common;

use common::*;
use feature_channels::ChannelMode;
use hough_features::io::{self, Sidecar};
use hough_features::{BufferAdapter, ImageIoError};
use pretty_assertions::assert_eq;

#[test]
fn test_decode_rgb_round_trip() {
    let image = random_rgb(11, 5, 7);
    let decoded = io::decode_png(&encode_rgb_png(&image)).unwrap();
    assert_eq!(decoded, image);
}

#[test]
fn test_gray_and_rgba_normalise_to_rgb() {
    let gray = encode_png(2, 1, png::ColorType::Grayscale, png::BitDepth::Eight, &[10, 200]);
    let decoded = io::decode_png(&gray).unwrap();
    assert_eq!(decoded.as_slice().unwrap(), &[10, 10, 10, 200, 200, 200]);

    let gray_alpha =
        encode_png(1, 1, png::ColorType::GrayscaleAlpha, png::BitDepth::Eight, &[42, 0]);
    assert_eq!(io::decode_png(&gray_alpha).unwrap().as_slice().unwrap(), &[42, 42, 42]);

    let rgba_samples = [1, 2, 3, 4, 5, 6, 7, 8];
    let rgba = encode_png(1, 2, png::ColorType::Rgba, png::BitDepth::Eight, &rgba_samples);
    assert_eq!(io::decode_png(&rgba).unwrap().as_slice().unwrap(), &[1, 2, 3, 5, 6, 7]);
}

#[test]
fn test_sixteen_bit_gray_is_stripped() {
    let png = encode_png(1, 1, png::ColorType::Grayscale, png::BitDepth::Sixteen, &[0x80, 0x01]);
    assert_eq!(io::decode_png(&png).unwrap().as_slice().unwrap(), &[0x80, 0x80, 0x80]);
}

#[test]
fn test_indexed_png_is_expanded() {
    let mut buf = Vec::new();
    {
        let mut encoder = png::Encoder::new(&mut buf, 2, 1);
        encoder.set_color(png::ColorType::Indexed);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_palette(vec![255, 0, 0, 0, 0, 255]);
        let mut writer = encoder.write_header().unwrap();
        writer.write_image_data(&[1, 0]).unwrap();
    }
    assert_eq!(
        io::decode_png(&buf).unwrap().as_slice().unwrap(),
        &[0, 0, 255, 255, 0, 0]
    );
}

#[test]
fn test_missing_file_is_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let error = io::read_png(&dir.path().join("nope.png")).unwrap_err();
    assert!(matches!(error, ImageIoError::Io(_)));
}

#[test]
fn test_plane_pngs_decode_back_to_planes() {
    let dir = tempfile::tempdir().unwrap();
    let features = BufferAdapter::default()
        .run_image(random_rgb(12, 10, 13).view(), false)
        .unwrap();

    let files = io::write_plane_pngs(dir.path(), features.view()).unwrap();
    assert_eq!(files.len(), 15);
    assert_eq!(files[0].file_name().unwrap(), "plane_00.png");
    assert_eq!(files[14].file_name().unwrap(), "plane_14.png");

    for (index, path) in files.iter().enumerate() {
        let rgb = io::read_png(path).unwrap();
        let gray: Vec<u8> = rgb.iter().step_by(3).copied().collect();
        let expected: Vec<u8> = features
            .index_axis(ndarray::Axis(0), index)
            .iter()
            .copied()
            .collect();
        assert_eq!(gray, expected, "plane {index}");
    }
}

#[test]
fn test_raw_output_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let features = BufferAdapter::default()
        .run_image(random_rgb(13, 6, 9).view(), true)
        .unwrap();

    let written = io::write_raw(dir.path(), features.view(), ChannelMode::Full).unwrap();
    assert_eq!(written, Sidecar::new(ChannelMode::Full, 6, 9));

    let bin = std::fs::read(dir.path().join(io::RAW_FILE)).unwrap();
    assert_eq!(bin.len(), 32 * 6 * 9);

    let (sidecar, read_back) = io::read_raw(dir.path()).unwrap();
    assert_eq!(sidecar.shape, [32, 6, 9]);
    assert_eq!(sidecar.dtype, "u8");
    assert_eq!(sidecar.planes[16], "lab-l/min");
    assert_same_features(&read_back, &features);
}

#[test]
fn test_sidecar_is_readable_json() {
    let dir = tempfile::tempdir().unwrap();
    let features = BufferAdapter::default()
        .run_image(solid_rgb(4, 4, [0, 0, 0]).view(), false)
        .unwrap();
    io::write_raw(dir.path(), features.view(), ChannelMode::Compact).unwrap();

    let json: serde_json::Value =
        serde_json::from_slice(&std::fs::read(dir.path().join(io::SIDECAR_FILE)).unwrap()).unwrap();
    assert_eq!(json["mode"], "compact");
    assert_eq!(json["shape"], serde_json::json!([15, 4, 4]));
    assert_eq!(json["planes"].as_array().unwrap().len(), 15);
}

#[test]
fn test_raw_rejects_mismatched_mode() {
    let dir = tempfile::tempdir().unwrap();
    let features = BufferAdapter::default()
        .run_image(solid_rgb(4, 4, [9, 9, 9]).view(), false)
        .unwrap();
    let error = io::write_raw(dir.path(), features.view(), ChannelMode::Full).unwrap_err();
    assert!(matches!(error, ImageIoError::Sidecar(_)));
}

#[test]
fn test_truncated_raw_file_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let features = BufferAdapter::default()
        .run_image(solid_rgb(4, 4, [9, 9, 9]).view(), false)
        .unwrap();
    io::write_raw(dir.path(), features.view(), ChannelMode::Compact).unwrap();
    std::fs::write(dir.path().join(io::RAW_FILE), [0u8; 10]).unwrap();
    assert!(matches!(io::read_raw(dir.path()), Err(ImageIoError::Sidecar(_))));
}

fn write_sidecar(dir: &std::path::Path, sidecar: &Sidecar) {
    std::fs::write(
        dir.join(io::SIDECAR_FILE),
        serde_json::to_vec(sidecar).unwrap(),
    )
    .unwrap();
}

#[test]
fn test_oversized_sidecar_shape_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    let mut sidecar = Sidecar::new(ChannelMode::Full, 1, 1);
    sidecar.shape = [32, 1 << 32, 1 << 32];
    write_sidecar(dir.path(), &sidecar);
    std::fs::write(dir.path().join(io::RAW_FILE), [0u8; 0]).unwrap();

    match io::read_raw(dir.path()) {
        Err(ImageIoError::Sidecar(message)) => assert!(message.contains("overflows"), "{message}"),
        other => panic!("expected a sidecar error, got {other:?}"),
    }
}

#[test]
fn test_sidecar_shape_must_match_mode() {
    let dir = tempfile::tempdir().unwrap();
    let mut sidecar = Sidecar::new(ChannelMode::Full, 2, 2);
    sidecar.shape = [1, 2, 2];
    write_sidecar(dir.path(), &sidecar);
    std::fs::write(dir.path().join(io::RAW_FILE), [0u8; 4]).unwrap();

    assert!(matches!(io::read_raw(dir.path()), Err(ImageIoError::Sidecar(_))));
}

#[test]
fn test_sidecar_plane_names_must_match_shape() {
    let dir = tempfile::tempdir().unwrap();
    let mut sidecar = Sidecar::new(ChannelMode::Compact, 2, 2);
    sidecar.planes.truncate(3);
    write_sidecar(dir.path(), &sidecar);
    std::fs::write(dir.path().join(io::RAW_FILE), [0u8; 15 * 4]).unwrap();

    assert!(matches!(io::read_raw(dir.path()), Err(ImageIoError::Sidecar(_))));
}
