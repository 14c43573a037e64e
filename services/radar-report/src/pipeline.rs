//! Report pipeline stages.
//!
//! Stages run in order against one read-only [`RadarVolume`]:
//! fetch, read, report, overview image, per-field images, per-sweep images,
//! statistics, histogram, composite. Collaborators are trait objects so
//! tests can substitute fakes.

use std::io::Write;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dataset_fetch::DatasetFetcher;
use radar_common::{FieldStatistics, Histogram, RadarVolume};
use radar_grid::{ensure_2d, Gridder};
use radar_io::RadarReader;
use radar_render::{CompositePlot, HistogramPlot, PlotRenderer, PpiPlot};
use tracing::{debug, info, instrument};

use crate::config::PipelineConfig;
use crate::report::{write_report, write_statistics};

/// Files written by a full run.
#[derive(Debug, Clone)]
pub struct RunSummary {
    pub dataset: PathBuf,
    pub images: Vec<PathBuf>,
    pub statistics: FieldStatistics,
}

pub struct Pipeline<'a> {
    config: &'a PipelineConfig,
    fetcher: &'a dyn DatasetFetcher,
    reader: &'a dyn RadarReader,
    gridder: &'a dyn Gridder,
    renderer: &'a dyn PlotRenderer,
}

impl<'a> Pipeline<'a> {
    pub fn new(
        config: &'a PipelineConfig,
        fetcher: &'a dyn DatasetFetcher,
        reader: &'a dyn RadarReader,
        gridder: &'a dyn Gridder,
        renderer: &'a dyn PlotRenderer,
    ) -> Self {
        Self {
            config,
            fetcher,
            reader,
            gridder,
            renderer,
        }
    }

    /// Run every stage, writing the text report to `out`.
    pub fn run(&self, out: &mut dyn Write) -> Result<RunSummary> {
        let dataset = self.fetch_dataset()?;
        let volume = self.load_volume(&dataset)?;

        write_report(out, &volume).context("Failed to write report")?;

        let mut images = vec![self.render_overview(&volume)?];
        images.extend(self.render_fields(&volume)?);
        images.extend(self.render_sweeps(&volume)?);

        let statistics = self.compute_statistics(&volume)?;
        write_statistics(out, &statistics).context("Failed to write statistics")?;

        images.push(self.render_histogram(&volume)?);
        images.push(self.render_composite(&volume)?);

        info!(
            images = images.len(),
            output_dir = %self.config.output_dir.display(),
            "Report complete"
        );
        Ok(RunSummary {
            dataset,
            images,
            statistics,
        })
    }

    #[instrument(skip(self), fields(dataset = %self.config.dataset.name))]
    pub fn fetch_dataset(&self) -> Result<PathBuf> {
        self.fetcher
            .fetch(&self.config.dataset.name)
            .with_context(|| format!("Failed to fetch {}", self.config.dataset.name))
    }

    #[instrument(skip(self))]
    pub fn load_volume(&self, path: &Path) -> Result<RadarVolume> {
        let volume = self
            .reader
            .read(path)
            .with_context(|| format!("Failed to read radar file {}", path.display()))?;
        if let Some(start) = volume.scan_start() {
            info!(scan_start = %start, "Volume scan start");
        }
        Ok(volume)
    }

    /// The primary field on the first sweep. Fails when the field is absent.
    #[instrument(skip(self, volume))]
    pub fn render_overview(&self, volume: &RadarVolume) -> Result<PathBuf> {
        let field = &self.config.primary_field;
        let path = self.output_path("radar_reflectivity.png")?;
        let plot = self.ppi(field, 0, "Reflectivity Field (First Sweep)".to_string());
        self.renderer
            .render_ppi(volume, &plot, &path)
            .with_context(|| format!("Failed to render overview of {}", field))?;
        Ok(path)
    }

    /// First sweep of each configured field. Absent fields are skipped.
    #[instrument(skip(self, volume))]
    pub fn render_fields(&self, volume: &RadarVolume) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for field in &self.config.fields {
            if volume.field(field).is_none() {
                debug!(field = %field, "Field not in volume, skipping");
                continue;
            }
            let path = self.output_path(&format!("radar_{}.png", field))?;
            let plot = self.ppi(field, 0, format!("{} Field (First Sweep)", capitalize(field)));
            self.renderer
                .render_ppi(volume, &plot, &path)
                .with_context(|| format!("Failed to render {}", field))?;
            written.push(path);
        }
        Ok(written)
    }

    /// The primary field on every sweep.
    #[instrument(skip(self, volume), fields(sweeps = volume.nsweeps()))]
    pub fn render_sweeps(&self, volume: &RadarVolume) -> Result<Vec<PathBuf>> {
        let field = &self.config.primary_field;
        let mut written = Vec::with_capacity(volume.nsweeps());
        for sweep in 0..volume.nsweeps() {
            let path = self.output_path(&format!("radar_reflectivity_sweep_{}.png", sweep))?;
            let plot = self.ppi(field, sweep, format!("Reflectivity Field (Sweep {})", sweep));
            self.renderer
                .render_ppi(volume, &plot, &path)
                .with_context(|| format!("Failed to render sweep {}", sweep))?;
            written.push(path);
        }
        Ok(written)
    }

    /// Statistics over the primary field's raw array. Fails when the field
    /// is absent.
    #[instrument(skip(self, volume))]
    pub fn compute_statistics(&self, volume: &RadarVolume) -> Result<FieldStatistics> {
        let field = volume
            .require_field(&self.config.primary_field)
            .context("Statistics need the reflectivity field")?;
        let stats = FieldStatistics::compute(field.data.view())
            .context("Failed to compute reflectivity statistics")?;
        info!(
            mean = stats.mean,
            max = stats.max,
            min = stats.min,
            std_dev = stats.std_dev,
            "Computed statistics"
        );
        Ok(stats)
    }

    #[instrument(skip(self, volume))]
    pub fn render_histogram(&self, volume: &RadarVolume) -> Result<PathBuf> {
        let field = volume
            .require_field(&self.config.primary_field)
            .context("Histogram needs the reflectivity field")?;
        let histogram = Histogram::compute(field.data.iter().copied(), self.config.histogram_bins)
            .context("Failed to bin reflectivity")?;

        let path = self.output_path("histogram_reflectivity.png")?;
        let plot = HistogramPlot {
            title: "Histogram of Reflectivity".to_string(),
            x_label: "Reflectivity (dBZ)".to_string(),
            y_label: "Frequency".to_string(),
        };
        self.renderer
            .render_histogram(&histogram, &plot, &path)
            .context("Failed to render histogram")?;
        Ok(path)
    }

    /// Grid the primary field, take layer 0 and render it.
    #[instrument(skip(self, volume))]
    pub fn render_composite(&self, volume: &RadarVolume) -> Result<PathBuf> {
        let field = self.config.primary_field.as_str();
        let spec = &self.config.grid;
        let grid = self
            .gridder
            .grid(volume, &[field], spec)
            .context("Failed to grid reflectivity")?;
        let layer = grid.layer(field, 0).context("Failed to extract grid layer 0")?;
        let image = ensure_2d(layer, (spec.shape.1, spec.shape.2))
            .context("Composite layer has an unexpected shape")?;

        let path = self.output_path("composite_reflectivity.png")?;
        let plot = CompositePlot {
            title: "Composite Reflectivity".to_string(),
            extent_km: spec.extent_km(),
            axis_label: "Distance (km)".to_string(),
            colorbar_label: "Reflectivity (dBZ)".to_string(),
        };
        self.renderer
            .render_composite(image.view(), &plot, &path)
            .context("Failed to render composite")?;
        Ok(path)
    }

    fn ppi(&self, field: &str, sweep: usize, title: String) -> PpiPlot {
        PpiPlot {
            field: field.to_string(),
            sweep,
            title,
            x_limits_km: self.config.x_limits_km,
            y_limits_km: self.config.y_limits_km,
        }
    }

    fn output_path(&self, file_name: &str) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.config.output_dir).with_context(|| {
            format!("Failed to create output directory {}", self.config.output_dir.display())
        })?;
        Ok(self.config.output_path(file_name))
    }
}

/// Upper-case the first character and lower-case the rest.
pub fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
