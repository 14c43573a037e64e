//! Cached, checksum-verified dataset downloads.
//!
//! Datasets are named files in a [`Registry`] that maps each name to the
//! hash of its expected content. A [`CachedFetcher`] resolves a name to a
//! verified local path, downloading into its cache directory only when the
//! cached copy is missing or does not match.

pub mod error;
pub mod fetcher;
pub mod hash;
pub mod registry;

use std::path::PathBuf;

pub use error::{FetchError, FetchResult};
pub use fetcher::{default_cache_dir, CachedFetcher};
pub use hash::{FileHash, HashAlgorithm};
pub use registry::{Registry, OPEN_RADAR_DATA_URL, SAMPLE_SGP_DATA, SAMPLE_SGP_HASH};

/// Resolves dataset names to verified local files.
pub trait DatasetFetcher {
    fn fetch(&self, name: &str) -> FetchResult<PathBuf>;
}
