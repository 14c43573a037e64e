//! Pipeline tests with a fake fetcher and a recording renderer.

use std::cell::RefCell;
use std::path::{Path, PathBuf};

use dataset_fetch::{DatasetFetcher, FetchError, FetchResult};
use ndarray::ArrayView2;
use radar_common::{Histogram, RadarVolume, REFLECTIVITY, VELOCITY};
use radar_grid::{GridSpec, NearestGateGridder};
use radar_io::CfRadialReader;
use radar_render::{CompositePlot, HistogramPlot, PlotRenderer, PpiPlot, RenderResult};
use radar_report::{Pipeline, PipelineConfig};
use test_utils::{temp_test_dir, write_cfradial, VolumeFixture};

/// Returns a fixed local path for one dataset name.
struct LocalFetcher {
    name: String,
    path: PathBuf,
}

impl DatasetFetcher for LocalFetcher {
    fn fetch(&self, name: &str) -> FetchResult<PathBuf> {
        if name == self.name {
            Ok(self.path.clone())
        } else {
            Err(FetchError::UnknownDataset(name.to_string()))
        }
    }
}

/// Writes a marker file per plot and remembers every title.
#[derive(Default)]
struct RecordingRenderer {
    titles: RefCell<Vec<String>>,
    composite_shape: RefCell<Option<(usize, usize)>>,
}

impl RecordingRenderer {
    fn touch(&self, path: &Path, title: &str) -> RenderResult<()> {
        std::fs::write(path, title)?;
        self.titles.borrow_mut().push(title.to_string());
        Ok(())
    }
}

impl PlotRenderer for RecordingRenderer {
    fn render_ppi(&self, volume: &RadarVolume, plot: &PpiPlot, path: &Path) -> RenderResult<()> {
        volume.require_field(&plot.field)?;
        volume.sweep(plot.sweep)?;
        self.touch(path, &plot.title)
    }

    fn render_histogram(&self, histogram: &Histogram, plot: &HistogramPlot, path: &Path) -> RenderResult<()> {
        assert_eq!(histogram.counts.len(), 50);
        self.touch(path, &plot.title)
    }

    fn render_composite(&self, image: ArrayView2<'_, f32>, plot: &CompositePlot, path: &Path) -> RenderResult<()> {
        *self.composite_shape.borrow_mut() = Some(image.dim());
        self.touch(path, &plot.title)
    }
}

fn config_for(output_dir: &Path) -> PipelineConfig {
    PipelineConfig {
        output_dir: output_dir.to_path_buf(),
        grid: GridSpec {
            shape: (1, 100, 100),
            ..Default::default()
        },
        ..Default::default()
    }
}

fn file_names(paths: &[PathBuf]) -> Vec<String> {
    paths
        .iter()
        .filter_map(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned())
        .collect()
}

#[test]
fn test_end_to_end_writes_every_image() {
    let dir = temp_test_dir();
    let dataset = dir.path().join("sample_sgp_data.nc");
    let volume = VolumeFixture::default()
        .with_fields(&[REFLECTIVITY, VELOCITY])
        .with_sweeps(&[0.5, 1.5, 2.5])
        .build();
    write_cfradial(&dataset, &volume).unwrap();

    let output_dir = dir.path().join("plots");
    let config = config_for(&output_dir);
    let fetcher = LocalFetcher {
        name: config.dataset.name.clone(),
        path: dataset.clone(),
    };
    let reader = CfRadialReader::default();
    let gridder = NearestGateGridder::default();
    let renderer = RecordingRenderer::default();
    let pipeline = Pipeline::new(&config, &fetcher, &reader, &gridder, &renderer);

    let mut out = Vec::new();
    let summary = pipeline.run(&mut out).unwrap();

    assert_eq!(summary.dataset, dataset);
    assert_eq!(
        file_names(&summary.images),
        vec![
            "radar_reflectivity.png",
            "radar_reflectivity_horizontal.png",
            "radar_velocity.png",
            "radar_reflectivity_sweep_0.png",
            "radar_reflectivity_sweep_1.png",
            "radar_reflectivity_sweep_2.png",
            "histogram_reflectivity.png",
            "composite_reflectivity.png",
        ]
    );
    for image in &summary.images {
        assert!(image.exists(), "{} missing", image.display());
    }
    assert!(!output_dir.join("radar_differential_reflectivity.png").exists());

    let titles = renderer.titles.borrow();
    assert_eq!(titles[0], "Reflectivity Field (First Sweep)");
    assert_eq!(titles[1], "Reflectivity_horizontal Field (First Sweep)");
    assert_eq!(titles[2], "Velocity Field (First Sweep)");
    assert_eq!(titles[5], "Reflectivity Field (Sweep 2)");
    assert_eq!(titles[6], "Histogram of Reflectivity");
    assert_eq!(titles[7], "Composite Reflectivity");
    assert_eq!(*renderer.composite_shape.borrow(), Some((100, 100)));

    let text = String::from_utf8(out).unwrap();
    assert!(text.starts_with("Available fields: ['reflectivity_horizontal', 'velocity']\n"));
    assert!(text.contains("Reflectivity Statistics:\nMean: "));
    assert!(text.contains("\nStandard Deviation: "));
}

#[test]
fn test_absent_fields_are_skipped() {
    let dir = temp_test_dir();
    let config = config_for(dir.path());
    let volume = VolumeFixture::default().with_fields(&[REFLECTIVITY]).build();
    let fetcher = LocalFetcher {
        name: String::new(),
        path: PathBuf::new(),
    };
    let renderer = RecordingRenderer::default();
    let pipeline = Pipeline::new(
        &config,
        &fetcher,
        &CfRadialReader::default(),
        &NearestGateGridder::default(),
        &renderer,
    );

    let written = pipeline.render_fields(&volume).unwrap();
    assert_eq!(file_names(&written), vec!["radar_reflectivity_horizontal.png"]);
    assert!(!dir.path().join("radar_velocity.png").exists());
}

#[test]
fn test_zero_sweeps_render_nothing() {
    let dir = temp_test_dir();
    let config = config_for(dir.path());
    let volume = VolumeFixture::default().with_sweeps(&[]).build();
    let fetcher = LocalFetcher {
        name: String::new(),
        path: PathBuf::new(),
    };
    let renderer = RecordingRenderer::default();
    let pipeline = Pipeline::new(
        &config,
        &fetcher,
        &CfRadialReader::default(),
        &NearestGateGridder::default(),
        &renderer,
    );

    assert!(pipeline.render_sweeps(&volume).unwrap().is_empty());
    assert!(renderer.titles.borrow().is_empty());
}

#[test]
fn test_missing_reflectivity_fails_statistics_only() {
    let dir = temp_test_dir();
    let config = config_for(dir.path());
    let volume = VolumeFixture::default().with_fields(&[VELOCITY]).build();
    let fetcher = LocalFetcher {
        name: String::new(),
        path: PathBuf::new(),
    };
    let renderer = RecordingRenderer::default();
    let pipeline = Pipeline::new(
        &config,
        &fetcher,
        &CfRadialReader::default(),
        &NearestGateGridder::default(),
        &renderer,
    );

    let written = pipeline.render_fields(&volume).unwrap();
    assert_eq!(file_names(&written), vec!["radar_velocity.png"]);

    let err = pipeline.compute_statistics(&volume).unwrap_err();
    assert!(format!("{:#}", err).contains("reflectivity_horizontal"));
}

#[test]
fn test_statistics_known_values() {
    let dir = temp_test_dir();
    let config = config_for(dir.path());
    let volume = VolumeFixture::default()
        .with_fields(&[REFLECTIVITY])
        .with_uniform_value(12.5)
        .build();
    let fetcher = LocalFetcher {
        name: String::new(),
        path: PathBuf::new(),
    };
    let renderer = RecordingRenderer::default();
    let pipeline = Pipeline::new(
        &config,
        &fetcher,
        &CfRadialReader::default(),
        &NearestGateGridder::default(),
        &renderer,
    );

    let stats = pipeline.compute_statistics(&volume).unwrap();
    assert_eq!(stats.mean, 12.5);
    assert_eq!(stats.std_dev, 0.0);
}

#[test]
fn test_fetch_failure_stops_run() {
    let dir = temp_test_dir();
    let config = config_for(dir.path());
    let fetcher = LocalFetcher {
        name: "other.nc".to_string(),
        path: PathBuf::new(),
    };
    let renderer = RecordingRenderer::default();
    let pipeline = Pipeline::new(
        &config,
        &fetcher,
        &CfRadialReader::default(),
        &NearestGateGridder::default(),
        &renderer,
    );

    let mut out = Vec::new();
    let err = pipeline.run(&mut out).unwrap_err();
    assert!(format!("{:#}", err).contains("sample_sgp_data.nc"));
    assert!(out.is_empty());
    assert!(renderer.titles.borrow().is_empty());
}
