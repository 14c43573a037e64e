//! Field generators for creating synthetic radar data.
//!
//! Every generator returns a rays x gates array with values that are easy
//! to predict from the (ray, gate) position.

use ndarray::Array2;

/// Reflectivity-like values in dBZ.
///
/// Rises linearly from -10 dBZ at the first gate to 60 dBZ at the last.
/// The ray index only shifts the value by `ray % 5`.
pub fn reflectivity_pattern(nrays: usize, ngates: usize) -> Array2<f32> {
    let denom = ngates.saturating_sub(1).max(1) as f32;
    Array2::from_shape_fn((nrays, ngates), |(ray, gate)| {
        -10.0 + 70.0 * gate as f32 / denom + (ray % 5) as f32
    })
}

/// Radial velocity of a uniform wind blowing toward the north (m/s).
///
/// Ray `i` is assumed to point at azimuth `i * 360 / rays_per_sweep`.
pub fn velocity_pattern(nrays: usize, ngates: usize, rays_per_sweep: usize) -> Array2<f32> {
    let step = 360.0 / rays_per_sweep.max(1) as f32;
    Array2::from_shape_fn((nrays, ngates), |(ray, _)| {
        let azimuth = ((ray % rays_per_sweep.max(1)) as f32 * step).to_radians();
        15.0 * azimuth.cos()
    })
}

/// The same value at every gate.
pub fn uniform_field(nrays: usize, ngates: usize, value: f32) -> Array2<f32> {
    Array2::from_elem((nrays, ngates), value)
}
