//! PNG input and feature-plane output.
//!
//! Planes are written either as one 8-bit grayscale PNG per plane
//! (`plane_00.png`, `plane_01.png`, ...) or as a single plane-major
//! `features.bin` next to a `features.json` sidecar describing it.

use std::borrow::Cow;
use std::io::Cursor;
use std::path::{Path, PathBuf};

use feature_channels::ChannelMode;
use ndarray::{Array3, ArrayView2, ArrayView3};
use serde::{Deserialize, Serialize};

use crate::error::ImageIoError;

pub const RAW_FILE: &str = "features.bin";
pub const SIDECAR_FILE: &str = "features.json";

/// How extracted planes are written to disk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One grayscale PNG per plane
    #[default]
    Png,
    /// features.bin + features.json
    Raw,
}

/// Description of a `features.bin` file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Sidecar {
    pub mode: String,
    /// `[planes, height, width]`
    pub shape: [usize; 3],
    pub dtype: String,
    pub planes: Vec<String>,
}

impl Sidecar {
    pub fn new(mode: ChannelMode, height: usize, width: usize) -> Self {
        Self {
            mode: mode.to_string(),
            shape: [mode.plane_count(), height, width],
            dtype: "u8".to_string(),
            planes: mode.layout().iter().map(|id| id.to_string()).collect(),
        }
    }

    /// Size of the described `features.bin` in bytes.
    ///
    /// Fails when `mode` is unknown, when the shape disagrees with the plane
    /// count of `mode` or with the plane names, or when the size does not
    /// fit in `usize`.
    pub fn byte_len(&self) -> Result<usize, ImageIoError> {
        let mode = [ChannelMode::Compact, ChannelMode::Full]
            .into_iter()
            .find(|mode| mode.to_string() == self.mode)
            .ok_or_else(|| ImageIoError::Sidecar(format!("unknown mode {:?}", self.mode)))?;
        let [planes, height, width] = self.shape;
        if planes != mode.plane_count() {
            return Err(ImageIoError::Sidecar(format!(
                "{mode} output has {} planes, sidecar shape lists {planes}",
                mode.plane_count()
            )));
        }
        if self.planes.len() != planes {
            return Err(ImageIoError::Sidecar(format!(
                "sidecar names {} planes, shape lists {planes}",
                self.planes.len()
            )));
        }
        planes
            .checked_mul(height)
            .and_then(|n| n.checked_mul(width))
            .ok_or_else(|| {
                ImageIoError::Sidecar(format!("shape {:?} overflows the address space", self.shape))
            })
    }
}

/// Decode a PNG into an `(H, W, 3)` RGB array.
///
/// Palette and sub-byte images are expanded, 16-bit samples are reduced to
/// 8 bits, alpha is dropped and gray is replicated into R, G and B.
pub fn decode_png(bytes: &[u8]) -> Result<Array3<u8>, ImageIoError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
    let mut reader = decoder
        .read_info()
        .map_err(|e| ImageIoError::PngDecode(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| ImageIoError::PngDecode(e.to_string()))?;

    let samples = match (info.color_type, info.bit_depth) {
        (png::ColorType::Grayscale, png::BitDepth::Eight) => 1,
        (png::ColorType::GrayscaleAlpha, png::BitDepth::Eight) => 2,
        (png::ColorType::Rgb, png::BitDepth::Eight) => 3,
        (png::ColorType::Rgba, png::BitDepth::Eight) => 4,
        (color_type, bit_depth) => {
            return Err(ImageIoError::UnsupportedPixelLayout {
                color_type: format!("{color_type:?}"),
                bit_depth: bit_depth as u8,
            })
        }
    };

    let width = info.width as usize;
    let height = info.height as usize;
    let mut rgb = Vec::with_capacity(width * height * 3);
    for row in buf[..info.buffer_size()].chunks_exact(info.line_size) {
        for px in row[..width * samples].chunks_exact(samples) {
            match samples {
                1 | 2 => rgb.extend_from_slice(&[px[0]; 3]),
                _ => rgb.extend_from_slice(&px[..3]),
            }
        }
    }
    tracing::debug!(width, height, color_type = ?info.color_type, "decoded PNG");

    Array3::from_shape_vec((height, width, 3), rgb)
        .map_err(|e| ImageIoError::PngDecode(e.to_string()))
}

pub fn read_png(path: &Path) -> Result<Array3<u8>, ImageIoError> {
    let bytes = std::fs::read(path)?;
    decode_png(&bytes)
}

/// Encode one plane as an 8-bit grayscale PNG.
pub fn encode_plane_png(plane: ArrayView2<'_, u8>) -> Result<Vec<u8>, ImageIoError> {
    let (height, width) = plane.dim();
    let width = u32::try_from(width).map_err(|e| ImageIoError::PngEncode(e.to_string()))?;
    let height = u32::try_from(height).map_err(|e| ImageIoError::PngEncode(e.to_string()))?;
    let data = packed(plane.to_slice(), || plane.iter().copied().collect());

    let mut buf = Cursor::new(Vec::new());
    {
        let mut encoder = png::Encoder::new(&mut buf, width, height);
        encoder.set_color(png::ColorType::Grayscale);
        encoder.set_depth(png::BitDepth::Eight);
        encoder.set_compression(png::Compression::Fast);
        let mut writer = encoder
            .write_header()
            .map_err(|e| ImageIoError::PngEncode(e.to_string()))?;
        writer
            .write_image_data(&data)
            .map_err(|e| ImageIoError::PngEncode(e.to_string()))?;
    }
    Ok(buf.into_inner())
}

/// Write `features` (`(N, H, W)`) as `plane_NN.png` files in `dir`.
pub fn write_plane_pngs(
    dir: &Path,
    features: ArrayView3<'_, u8>,
) -> Result<Vec<PathBuf>, ImageIoError> {
    std::fs::create_dir_all(dir)?;
    let mut written = Vec::with_capacity(features.len_of(ndarray::Axis(0)));
    for (index, plane) in features.outer_iter().enumerate() {
        let path = dir.join(format!("plane_{index:02}.png"));
        std::fs::write(&path, encode_plane_png(plane)?)?;
        written.push(path);
    }
    tracing::debug!(dir = %dir.display(), planes = written.len(), "wrote plane PNGs");
    Ok(written)
}

/// Write `features` as `features.bin` plus its `features.json` sidecar.
pub fn write_raw(
    dir: &Path,
    features: ArrayView3<'_, u8>,
    mode: ChannelMode,
) -> Result<Sidecar, ImageIoError> {
    let (planes, height, width) = features.dim();
    if planes != mode.plane_count() {
        return Err(ImageIoError::Sidecar(format!(
            "{mode} output needs {} planes, got {planes}",
            mode.plane_count()
        )));
    }
    std::fs::create_dir_all(dir)?;

    let data = packed(features.to_slice(), || features.iter().copied().collect());
    std::fs::write(dir.join(RAW_FILE), &data)?;

    let sidecar = Sidecar::new(mode, height, width);
    std::fs::write(dir.join(SIDECAR_FILE), serde_json::to_string_pretty(&sidecar)?)?;
    Ok(sidecar)
}

/// Read back a directory written by [`write_raw`].
///
/// The sidecar is checked against itself and against the size of
/// `features.bin` before any array is built.
pub fn read_raw(dir: &Path) -> Result<(Sidecar, Array3<u8>), ImageIoError> {
    let sidecar: Sidecar = serde_json::from_slice(&std::fs::read(dir.join(SIDECAR_FILE))?)?;
    let expected = sidecar.byte_len()?;
    let data = std::fs::read(dir.join(RAW_FILE))?;
    if data.len() != expected {
        return Err(ImageIoError::Sidecar(format!(
            "{RAW_FILE} holds {} bytes, sidecar shape requires {expected}",
            data.len()
        )));
    }
    let [planes, height, width] = sidecar.shape;
    let features = Array3::from_shape_vec((planes, height, width), data)
        .map_err(|e| ImageIoError::Sidecar(e.to_string()))?;
    Ok((sidecar, features))
}

fn packed<'a>(slice: Option<&'a [u8]>, copy: impl FnOnce() -> Vec<u8>) -> Cow<'a, [u8]> {
    match slice {
        Some(slice) => Cow::Borrowed(slice),
        None => Cow::Owned(copy()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array2;
    use pretty_assertions::assert_eq;

    fn encode(
        width: u32,
        height: u32,
        color: png::ColorType,
        depth: png::BitDepth,
        data: &[u8],
    ) -> Vec<u8> {
        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, width, height);
            encoder.set_color(color);
            encoder.set_depth(depth);
            let mut writer = encoder.write_header().unwrap();
            writer.write_image_data(data).unwrap();
        }
        buf
    }

    #[test]
    fn test_decode_rgb() {
        let png = encode(2, 1, png::ColorType::Rgb, png::BitDepth::Eight, &[1, 2, 3, 4, 5, 6]);
        let rgb = decode_png(&png).unwrap();
        assert_eq!(rgb.shape(), &[1, 2, 3]);
        assert_eq!(rgb.as_slice().unwrap(), &[1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn test_decode_gray_is_replicated() {
        let png = encode(2, 2, png::ColorType::Grayscale, png::BitDepth::Eight, &[0, 50, 100, 255]);
        let rgb = decode_png(&png).unwrap();
        assert_eq!(rgb.shape(), &[2, 2, 3]);
        assert_eq!(rgb[[1, 0, 0]], 100);
        assert_eq!(rgb[[1, 0, 2]], 100);
        assert_eq!(rgb[[1, 1, 1]], 255);
    }

    #[test]
    fn test_decode_rgba_drops_alpha() {
        let png = encode(1, 1, png::ColorType::Rgba, png::BitDepth::Eight, &[9, 8, 7, 0]);
        assert_eq!(decode_png(&png).unwrap().as_slice().unwrap(), &[9, 8, 7]);
    }

    #[test]
    fn test_decode_sixteen_bit_keeps_high_byte() {
        let samples = [0x12, 0x34, 0xAB, 0xCD, 0xFF, 0x00];
        let png = encode(1, 1, png::ColorType::Rgb, png::BitDepth::Sixteen, &samples);
        assert_eq!(decode_png(&png).unwrap().as_slice().unwrap(), &[0x12, 0xAB, 0xFF]);
    }

    #[test]
    fn test_decode_one_bit_gray_expands() {
        // Two pixels: 1, 0 packed into the high bits of one byte
        let png = encode(2, 1, png::ColorType::Grayscale, png::BitDepth::One, &[0b1000_0000]);
        assert_eq!(decode_png(&png).unwrap().as_slice().unwrap(), &[255, 255, 255, 0, 0, 0]);
    }

    #[test]
    fn test_decode_garbage() {
        assert!(matches!(decode_png(b"not a png"), Err(ImageIoError::PngDecode(_))));
    }

    #[test]
    fn test_plane_png_round_trip() {
        let plane = Array2::from_shape_fn((3, 4), |(y, x)| (y * 4 + x) as u8 * 20);
        let png = encode_plane_png(plane.view()).unwrap();
        let rgb = decode_png(&png).unwrap();
        assert_eq!(rgb.shape(), &[3, 4, 3]);
        assert_eq!(rgb[[2, 3, 1]], 220);
    }

    #[test]
    fn test_sidecar_lists_planes() {
        let sidecar = Sidecar::new(ChannelMode::Compact, 10, 20);
        assert_eq!(sidecar.shape, [15, 10, 20]);
        assert_eq!(sidecar.mode, "compact");
        assert_eq!(sidecar.planes[3], "orientation-0");
    }

    #[test]
    fn test_sidecar_byte_len() {
        assert_eq!(Sidecar::new(ChannelMode::Full, 3, 5).byte_len().unwrap(), 32 * 15);

        let mut unknown = Sidecar::new(ChannelMode::Compact, 3, 5);
        unknown.mode = "huge".to_string();
        assert!(matches!(unknown.byte_len(), Err(ImageIoError::Sidecar(_))));

        let mut mismatched = Sidecar::new(ChannelMode::Compact, 3, 5);
        mismatched.mode = "full".to_string();
        assert!(matches!(mismatched.byte_len(), Err(ImageIoError::Sidecar(_))));
    }
}
