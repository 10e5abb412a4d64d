//! Test images, PNG helpers and an instrumented lock.

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use hough_features::CoordinationLock;
use ndarray::Array3;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

/// Seeded random `(H, W, 3)` image
pub fn random_rgb(seed: u64, height: usize, width: usize) -> Array3<u8> {
    let mut rng = StdRng::seed_from_u64(seed);
    Array3::from_shape_simple_fn((height, width, 3), || rng.gen())
}

/// Constant-color image
pub fn solid_rgb(height: usize, width: usize, rgb: [u8; 3]) -> Array3<u8> {
    Array3::from_shape_fn((height, width, 3), |(_, _, c)| rgb[c])
}

/// Left half black, right half white
pub fn vertical_step(height: usize, width: usize) -> Array3<u8> {
    Array3::from_shape_fn((height, width, 3), |(_, x, _)| if x < width / 2 { 0 } else { 255 })
}

/// Encode an `(H, W, 3)` array as an 8-bit RGB PNG
pub fn encode_rgb_png(image: &Array3<u8>) -> Vec<u8> {
    let (height, width, _) = image.dim();
    let data: Vec<u8> = image.iter().copied().collect();
    encode_png(width as u32, height as u32, png::ColorType::Rgb, png::BitDepth::Eight, &data)
}

pub fn encode_png(
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

/// Write `image` as `dir/name` and return the path
pub fn write_rgb_png(dir: &Path, name: &str, image: &Array3<u8>) -> PathBuf {
    let path = dir.join(name);
    std::fs::write(&path, encode_rgb_png(image)).unwrap();
    path
}

/// Counts release/reacquire calls
#[derive(Debug, Default)]
pub struct CountingLock {
    pub released: AtomicUsize,
    pub reacquired: AtomicUsize,
}

impl CountingLock {
    pub fn counts(&self) -> (usize, usize) {
        (
            self.released.load(Ordering::SeqCst),
            self.reacquired.load(Ordering::SeqCst),
        )
    }
}

impl CoordinationLock for CountingLock {
    fn release(&self) {
        self.released.fetch_add(1, Ordering::SeqCst);
    }

    fn reacquire(&self) {
        self.reacquired.fetch_add(1, Ordering::SeqCst);
    }
}
