//! Reduction of an extracted grid layer to a 2D image.

use ndarray::{Array2, ArrayD, Ix2};
use radar_common::{RadarError, RadarResult};

/// Coerce `data` to a `rows x cols` image.
///
/// A flat array of `rows * cols` values is reshaped row-major, an array
/// already `rows x cols` is returned unchanged, anything else fails with
/// [`RadarError::ShapeMismatch`].
pub fn ensure_2d(data: ArrayD<f32>, (rows, cols): (usize, usize)) -> RadarResult<Array2<f32>> {
    let actual = data.shape().to_vec();
    let mismatch = || RadarError::ShapeMismatch {
        expected: vec![rows, cols],
        actual: actual.clone(),
    };

    match data.ndim() {
        1 if data.len() == rows * cols => {
            let flat: Vec<f32> = data.iter().copied().collect();
            Array2::from_shape_vec((rows, cols), flat).map_err(|_| mismatch())
        }
        2 if data.shape() == [rows, cols] => data.into_dimensionality::<Ix2>().map_err(|_| mismatch()),
        _ => Err(mismatch()),
    }
}
