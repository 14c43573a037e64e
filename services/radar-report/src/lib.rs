//! Radar report pipeline.
//!
//! Fetches a CF/Radial volume, prints its metadata and reflectivity
//! statistics, and renders PPI, histogram and composite images.

pub mod config;
pub mod pipeline;
pub mod report;

pub use config::PipelineConfig;
pub use pipeline::{capitalize, Pipeline, RunSummary};
pub use report::{write_report, write_statistics};
