//! Radar report CLI.
//!
//! Downloads (or reuses a cached copy of) the configured radar dataset,
//! prints its metadata and reflectivity statistics to stdout, and writes
//! PNG plots to the output directory. Logs go to stderr.

use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;
use dataset_fetch::CachedFetcher;
use radar_grid::NearestGateGridder;
use radar_io::CfRadialReader;
use radar_render::PlottersRenderer;
use radar_report::{Pipeline, PipelineConfig};
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

#[derive(Parser, Debug)]
#[command(name = "radar-report")]
#[command(about = "Report and plot a CF/Radial radar volume")]
struct Args {
    /// YAML pipeline configuration
    #[arg(short, long, env = "RADAR_CONFIG")]
    config: Option<PathBuf>,

    /// Directory for generated images
    #[arg(short, long, env = "RADAR_OUTPUT_DIR")]
    output_dir: Option<PathBuf>,

    /// Dataset cache directory
    #[arg(long, env = "RADAR_CACHE_DIR")]
    cache_dir: Option<PathBuf>,

    /// Registry name of the dataset to fetch
    #[arg(long)]
    dataset: Option<String>,

    /// Log level
    #[arg(long, default_value = "info")]
    log_level: String,

    /// Emit logs as JSON
    #[arg(long)]
    json_logs: bool,
}

fn main() -> Result<()> {
    // Load environment from .env file if present
    dotenvy::dotenv().ok();

    let args = Args::parse();

    // Initialize tracing
    let level = match args.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "warn" => Level::WARN,
        "error" => Level::ERROR,
        _ => Level::INFO,
    };

    let builder = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(true)
        .with_writer(std::io::stderr);
    if args.json_logs {
        tracing::subscriber::set_global_default(builder.json().finish())?;
    } else {
        tracing::subscriber::set_global_default(builder.finish())?;
    }

    let config = PipelineConfig::load_or_default(args.config.as_deref())?.with_overrides(
        args.output_dir,
        args.cache_dir,
        args.dataset,
    );

    info!(
        dataset = %config.dataset.name,
        output_dir = %config.output_dir.display(),
        "Starting radar report"
    );

    let fetcher = CachedFetcher::new(config.dataset.registry()?, config.dataset.cache_dir())?;
    let reader = CfRadialReader::default();
    let gridder = NearestGateGridder::new(config.roi);
    let renderer = PlottersRenderer::new(config.image.width, config.image.height);

    let pipeline = Pipeline::new(&config, &fetcher, &reader, &gridder, &renderer);
    let stdout = std::io::stdout();
    let summary = pipeline.run(&mut stdout.lock())?;

    info!(
        dataset = %summary.dataset.display(),
        images = summary.images.len(),
        "Done"
    );
    Ok(())
}
