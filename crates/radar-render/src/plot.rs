//! PNG rendering with the `plotters` bitmap backend.
//!
//! Images are drawn by inverse mapping: every pixel of the plotting area is
//! converted to plot coordinates and colored from the data found there.
//! Pixels without data stay white.

use std::path::Path;

use ndarray::ArrayView2;
use plotters::coord::Shift;
use plotters::drawing::DrawingArea;
use plotters::prelude::*;
use radar_common::{Histogram, RadarVolume, SweepLocator, REFLECTIVITY};
use tracing::{debug, instrument};

use crate::colormap::Colormap;
use crate::error::{RenderError, RenderResult};
use crate::style::{default_limits, FieldStyle};
use crate::{CompositePlot, HistogramPlot, PlotRenderer, PpiPlot};

pub const PPI_X_LABEL: &str = "East West distance from radar (km)";
pub const PPI_Y_LABEL: &str = "North South distance from radar (km)";

const COLORBAR_WIDTH: i32 = 130;
const COLORBAR_STEPS: usize = 256;

type Area<'a> = DrawingArea<BitMapBackend<'a>, Shift>;

/// Renders plots to PNG files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlottersRenderer {
    pub width: u32,
    pub height: u32,
}

impl Default for PlottersRenderer {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
        }
    }
}

impl PlottersRenderer {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }
}

impl PlotRenderer for PlottersRenderer {
    #[instrument(skip(self, volume, plot), fields(field = %plot.field, sweep = plot.sweep))]
    fn render_ppi(&self, volume: &RadarVolume, plot: &PpiPlot, path: &Path) -> RenderResult<()> {
        let field = volume.require_field(&plot.field)?;
        let locator = SweepLocator::new(volume, plot.sweep)?;
        let style = FieldStyle::for_field(&plot.field, field);

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(RenderError::draw)?;
        let (main, bar) = root.split_horizontally(self.width as i32 - COLORBAR_WIDTH);

        let (x0, x1) = plot.x_limits_km;
        let (y0, y1) = plot.y_limits_km;
        let mut chart = ChartBuilder::on(&main)
            .caption(&plot.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(RenderError::draw)?;
        chart
            .configure_mesh()
            .disable_mesh()
            .x_desc(PPI_X_LABEL)
            .y_desc(PPI_Y_LABEL)
            .draw()
            .map_err(RenderError::draw)?;

        let area = chart.plotting_area().strip_coord_spec();
        let drawn = paint_pixels(&area, plot.x_limits_km, plot.y_limits_km, |x, y| {
            let gate = locator.locate(x * 1000.0, y * 1000.0)?;
            let value = field.value(gate.ray, gate.gate)?;
            value.is_finite().then(|| style.color(value).to_rgb())
        })?;

        draw_colorbar(&bar, &style.colormap, style.vmin, style.vmax, &style.label)?;
        root.present().map_err(RenderError::draw)?;

        debug!(path = %path.display(), pixels = drawn, "Rendered PPI");
        Ok(())
    }

    #[instrument(skip(self, histogram, plot), fields(bins = histogram.counts.len()))]
    fn render_histogram(&self, histogram: &Histogram, plot: &HistogramPlot, path: &Path) -> RenderResult<()> {
        let (Some(&lo), Some(&hi)) = (histogram.edges.first(), histogram.edges.last()) else {
            return Err(RenderError::EmptyData("histogram has no bins".to_string()));
        };
        if histogram.counts.is_empty() {
            return Err(RenderError::EmptyData("histogram has no bins".to_string()));
        }
        let y_max = (histogram.max_count() as f64 * 1.05).max(1.0);

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(RenderError::draw)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&plot.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(70)
            .build_cartesian_2d(lo..hi, 0f64..y_max)
            .map_err(RenderError::draw)?;
        chart
            .configure_mesh()
            .x_desc(&plot.x_label)
            .y_desc(&plot.y_label)
            .draw()
            .map_err(RenderError::draw)?;

        chart
            .draw_series(
                histogram
                    .counts
                    .iter()
                    .zip(histogram.edges.windows(2))
                    .map(|(&count, edge)| {
                        Rectangle::new([(edge[0], 0.0), (edge[1], count as f64)], BLUE.mix(0.7).filled())
                    }),
            )
            .map_err(RenderError::draw)?;
        root.present().map_err(RenderError::draw)?;

        debug!(path = %path.display(), total = histogram.total(), "Rendered histogram");
        Ok(())
    }

    #[instrument(skip(self, image, plot), fields(shape = ?image.dim()))]
    fn render_composite(&self, image: ArrayView2<'_, f32>, plot: &CompositePlot, path: &Path) -> RenderResult<()> {
        let (rows, cols) = image.dim();
        if rows == 0 || cols == 0 {
            return Err(RenderError::EmptyData("composite image is empty".to_string()));
        }
        let colormap = Colormap::reflectivity();
        let (vmin, vmax) = finite_range(image.iter().copied())
            .or_else(|| default_limits(REFLECTIVITY))
            .unwrap_or((0.0, 1.0));

        let root = BitMapBackend::new(path, (self.width, self.height)).into_drawing_area();
        root.fill(&WHITE).map_err(RenderError::draw)?;
        let (main, bar) = root.split_horizontally(self.width as i32 - COLORBAR_WIDTH);

        let (x0, x1, y0, y1) = plot.extent_km;
        let mut chart = ChartBuilder::on(&main)
            .caption(&plot.title, ("sans-serif", 24))
            .margin(15)
            .x_label_area_size(50)
            .y_label_area_size(60)
            .build_cartesian_2d(x0..x1, y0..y1)
            .map_err(RenderError::draw)?;

        let area = chart.plotting_area().strip_coord_spec();
        let drawn = paint_pixels(&area, (x0, x1), (y0, y1), |x, y| {
            let col = cell_index(x, x0, x1, cols)?;
            let row = cell_index(y, y0, y1, rows)?;
            let value = image[[row, col]];
            value.is_finite().then(|| colormap.map(value, vmin, vmax).to_rgb())
        })?;

        // Grid lines go over the image
        chart
            .configure_mesh()
            .x_desc(&plot.axis_label)
            .y_desc(&plot.axis_label)
            .draw()
            .map_err(RenderError::draw)?;

        draw_colorbar(&bar, &colormap, vmin, vmax, &plot.colorbar_label)?;
        root.present().map_err(RenderError::draw)?;

        debug!(path = %path.display(), pixels = drawn, "Rendered composite");
        Ok(())
    }
}

/// Color every pixel of `area` for which `color_at(x, y)` yields a color,
/// where `(x, y)` is the pixel center in plot coordinates. Returns the
/// number of pixels drawn.
fn paint_pixels<F>(area: &Area<'_>, x_limits: (f64, f64), y_limits: (f64, f64), color_at: F) -> RenderResult<usize>
where
    F: Fn(f64, f64) -> Option<RGBColor>,
{
    let (width, height) = area.dim_in_pixel();
    let mut drawn = 0;
    for j in 0..height {
        // Pixel rows run top to bottom
        let y = pixel_center(j, height, y_limits.1, y_limits.0);
        for i in 0..width {
            let x = pixel_center(i, width, x_limits.0, x_limits.1);
            if let Some(color) = color_at(x, y) {
                area.draw_pixel((i as i32, j as i32), &color)
                    .map_err(RenderError::draw)?;
                drawn += 1;
            }
        }
    }
    Ok(drawn)
}

fn draw_colorbar(area: &Area<'_>, colormap: &Colormap, vmin: f32, vmax: f32, label: &str) -> RenderResult<()> {
    let (lo, hi) = if vmax > vmin {
        (vmin as f64, vmax as f64)
    } else {
        (vmin as f64, vmin as f64 + 1.0)
    };

    let mut chart = ChartBuilder::on(area)
        .margin_top(60)
        .margin_bottom(65)
        .margin_right(10)
        .right_y_label_area_size(80)
        .build_cartesian_2d(0f64..1f64, lo..hi)
        .map_err(RenderError::draw)?;
    chart
        .configure_mesh()
        .disable_mesh()
        .disable_x_axis()
        .y_desc(label)
        .label_style(("sans-serif", 12))
        .axis_desc_style(("sans-serif", 14))
        .draw()
        .map_err(RenderError::draw)?;

    let step = (hi - lo) / COLORBAR_STEPS as f64;
    chart
        .draw_series((0..COLORBAR_STEPS).map(|k| {
            let bottom = lo + step * k as f64;
            let color = colormap.map((bottom + step / 2.0) as f32, lo as f32, hi as f32);
            Rectangle::new([(0.0, bottom), (1.0, bottom + step)], color.to_rgb().filled())
        }))
        .map_err(RenderError::draw)?;
    Ok(())
}

/// Center of pixel `index` out of `count`, mapped linearly from `from` to `to`.
pub fn pixel_center(index: u32, count: u32, from: f64, to: f64) -> f64 {
    from + (index as f64 + 0.5) / count as f64 * (to - from)
}

/// Cell of an `n`-cell axis spanning `lo..=hi` that contains `value`.
pub fn cell_index(value: f64, lo: f64, hi: f64, n: usize) -> Option<usize> {
    if n == 0 || !(lo..=hi).contains(&value) || hi <= lo {
        return None;
    }
    let idx = ((value - lo) / (hi - lo) * n as f64).floor() as usize;
    Some(idx.min(n - 1))
}

/// Minimum and maximum of the finite values.
pub fn finite_range<I: IntoIterator<Item = f32>>(values: I) -> Option<(f32, f32)> {
    values
        .into_iter()
        .filter(|v| v.is_finite())
        .fold(None, |acc, v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}
