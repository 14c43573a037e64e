//! Image rendering for radar products.
//!
//! Implements the plots produced by the report pipeline:
//! - PPI images of one field and sweep
//! - Frequency histograms
//! - Composite (gridded) images
//!
//! Plots sit behind [`PlotRenderer`]; [`PlottersRenderer`] draws PNGs with
//! the `plotters` bitmap backend.

pub mod colormap;
pub mod error;
pub mod plot;
pub mod style;

use std::path::Path;

use ndarray::ArrayView2;
use radar_common::{Histogram, RadarVolume};

pub use colormap::{Color, Colormap};
pub use error::{RenderError, RenderResult};
pub use plot::PlottersRenderer;
pub use style::FieldStyle;

/// A plan-position image of one sweep.
#[derive(Debug, Clone, PartialEq)]
pub struct PpiPlot {
    pub field: String,
    pub sweep: usize,
    pub title: String,
    pub x_limits_km: (f64, f64),
    pub y_limits_km: (f64, f64),
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramPlot {
    pub title: String,
    pub x_label: String,
    pub y_label: String,
}

/// A gridded image. Row 0 is drawn at the bottom of the extent.
#[derive(Debug, Clone, PartialEq)]
pub struct CompositePlot {
    pub title: String,
    /// `(x_min, x_max, y_min, y_max)` in kilometers
    pub extent_km: (f64, f64, f64, f64),
    pub axis_label: String,
    pub colorbar_label: String,
}

/// Draws plots to image files.
pub trait PlotRenderer {
    fn render_ppi(&self, volume: &RadarVolume, plot: &PpiPlot, path: &Path) -> RenderResult<()>;

    fn render_histogram(&self, histogram: &Histogram, plot: &HistogramPlot, path: &Path) -> RenderResult<()>;

    fn render_composite(&self, image: ArrayView2<'_, f32>, plot: &CompositePlot, path: &Path) -> RenderResult<()>;
}
