//! Radar file readers.
//!
//! The only supported format is CF/Radial NetCDF, read through the `netcdf`
//! crate. Readers sit behind [`RadarReader`] so the pipeline can be driven
//! by an in-memory volume in tests.

pub mod attributes;
pub mod cfradial;
pub mod native;

use std::path::Path;

use radar_common::{RadarResult, RadarVolume};

pub use cfradial::CfRadialReader;
pub use native::silence_hdf5_errors;

/// Parses a file on disk into a [`RadarVolume`].
pub trait RadarReader {
    fn read(&self, path: &Path) -> RadarResult<RadarVolume>;
}

/// Read a CF/Radial file with the default reader settings.
pub fn read<P: AsRef<Path>>(path: P) -> RadarResult<RadarVolume> {
    CfRadialReader::default().read(path.as_ref())
}
