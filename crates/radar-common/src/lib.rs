//! Common types and utilities shared across the radar-report workspace.
//!
//! - [`RadarVolume`]: the parsed, read-only radar scan every stage consumes
//! - [`geometry`]: beam propagation and polar/Cartesian gate lookup
//! - [`stats`]: summary statistics and histogram binning over field arrays

pub mod error;
pub mod geometry;
pub mod stats;
pub mod volume;

pub use error::{RadarError, RadarResult};
pub use geometry::{antenna_to_cartesian, GateIndex, SweepLocator};
pub use stats::{FieldStatistics, Histogram};
pub use volume::{Coordinate, Field, RadarVolume, Sweep};

/// Field name of horizontal reflectivity in the sample dataset.
pub const REFLECTIVITY: &str = "reflectivity_horizontal";
/// Field name of mean Doppler velocity.
pub const VELOCITY: &str = "velocity";
/// Field name of differential reflectivity.
pub const DIFFERENTIAL_REFLECTIVITY: &str = "differential_reflectivity";
