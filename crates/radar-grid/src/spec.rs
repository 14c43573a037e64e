//! Grid request: shape and extent of the Cartesian grid.

use serde::{Deserialize, Serialize};

/// Shape `(nz, ny, nx)` and per-axis limits in meters relative to the
/// radar. Grid coordinates are evenly spaced with both endpoints included.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridSpec {
    pub shape: (usize, usize, usize),
    pub z_limits: (f64, f64),
    pub y_limits: (f64, f64),
    pub x_limits: (f64, f64),
}

impl Default for GridSpec {
    fn default() -> Self {
        Self {
            shape: (1, 500, 500),
            z_limits: (0.0, 10_000.0),
            y_limits: (-150_000.0, 150_000.0),
            x_limits: (-150_000.0, 150_000.0),
        }
    }
}

impl GridSpec {
    pub fn z_coords(&self) -> Vec<f64> {
        linspace(self.z_limits, self.shape.0)
    }

    pub fn y_coords(&self) -> Vec<f64> {
        linspace(self.y_limits, self.shape.1)
    }

    pub fn x_coords(&self) -> Vec<f64> {
        linspace(self.x_limits, self.shape.2)
    }

    pub fn cell_count(&self) -> usize {
        self.shape.0 * self.shape.1 * self.shape.2
    }

    /// Extent of one layer in kilometers: `(x_min, x_max, y_min, y_max)`.
    pub fn extent_km(&self) -> (f64, f64, f64, f64) {
        (
            self.x_limits.0 / 1000.0,
            self.x_limits.1 / 1000.0,
            self.y_limits.0 / 1000.0,
            self.y_limits.1 / 1000.0,
        )
    }
}

/// `n` evenly spaced values from `lo` to `hi` inclusive. A single value
/// sits at `lo`.
pub fn linspace((lo, hi): (f64, f64), n: usize) -> Vec<f64> {
    match n {
        0 => Vec::new(),
        1 => vec![lo],
        _ => {
            let step = (hi - lo) / (n - 1) as f64;
            (0..n)
                .map(|i| if i == n - 1 { hi } else { lo + step * i as f64 })
                .collect()
        }
    }
}
