//! Assertion helpers for tests.

use ndarray::{Array3, Axis};
use pretty_assertions::assert_eq;

/// Assert a `(N, H, W)` feature array has the expected shape
pub fn assert_feature_shape(features: &Array3<u8>, planes: usize, height: usize, width: usize) {
    assert_eq!(
        features.dim(),
        (planes, height, width),
        "Expected {planes} planes of {height}x{width}"
    );
}

/// Assert two feature arrays are identical, naming the first differing plane
pub fn assert_same_features(actual: &Array3<u8>, expected: &Array3<u8>) {
    assert_eq!(actual.dim(), expected.dim(), "Feature arrays differ in shape");
    for (index, (a, e)) in actual
        .axis_iter(Axis(0))
        .zip(expected.axis_iter(Axis(0)))
        .enumerate()
    {
        assert!(a == e, "Plane {index} differs");
    }
}

/// Assert every value of plane `index` equals `value`
pub fn assert_plane_uniform(features: &Array3<u8>, index: usize, value: u8) {
    let plane = features.index_axis(Axis(0), index);
    if let Some(found) = plane.iter().find(|&&v| v != value) {
        panic!("Plane {index} contains {found}, expected uniform {value}");
    }
}
