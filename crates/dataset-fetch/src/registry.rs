//! Named datasets and their expected hashes.

use std::collections::BTreeMap;

use crate::error::{FetchError, FetchResult};
use crate::hash::FileHash;

/// Raw-file base URL of the open-radar-data repository.
pub const OPEN_RADAR_DATA_URL: &str = "https://github.com/openradar/open-radar-data/raw/main/data/";

/// ARM SGP X-band sample scan.
pub const SAMPLE_SGP_DATA: &str = "sample_sgp_data.nc";
pub const SAMPLE_SGP_HASH: &str = "md5:64caf070f295534d312fea75b0bcb888";

/// A base URL plus the files it serves, keyed by name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registry {
    pub base_url: String,
    entries: BTreeMap<String, FileHash>,
}

impl Registry {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            entries: BTreeMap::new(),
        }
    }

    /// The open-radar-data registry with the sample dataset.
    pub fn open_radar_data() -> FetchResult<Self> {
        Self::new(OPEN_RADAR_DATA_URL).with_entry(SAMPLE_SGP_DATA, SAMPLE_SGP_HASH)
    }

    pub fn with_entry(mut self, name: &str, hash: &str) -> FetchResult<Self> {
        self.entries.insert(name.to_string(), hash.parse()?);
        Ok(self)
    }

    pub fn hash(&self, name: &str) -> FetchResult<&FileHash> {
        self.entries
            .get(name)
            .ok_or_else(|| FetchError::UnknownDataset(name.to_string()))
    }

    /// Download URL of a file: the base URL joined with its name.
    pub fn url_for(&self, name: &str) -> String {
        format!("{}/{}", self.base_url.trim_end_matches('/'), name)
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}
