//! Normalised Gaussian voting window.

/// Square Gaussian of side `size` with `σ² = 2 · (size / 2)²`, normalised
/// to sum 1, row-major.
pub fn gaussian_window(size: usize) -> Vec<f32> {
    let offset = -((size as f64 - 1.0) / 2.0);
    let sigma2 = 2.0 * (0.5 * size as f64) * (0.5 * size as f64);

    let raw: Vec<f64> = (0..size * size)
        .map(|i| {
            let dx = offset + (i % size) as f64;
            let dy = offset + (i / size) as f64;
            (-(dx * dx + dy * dy) / sigma2).exp()
        })
        .collect();
    let total: f64 = raw.iter().sum();
    raw.iter().map(|w| (w / total) as f32).collect()
}
