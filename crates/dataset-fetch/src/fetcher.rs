//! Cache-backed fetcher.
//!
//! Files are downloaded to `<cache>/<name>.partial`, hashed, and renamed to
//! `<cache>/<name>` only when the hash matches. There is no retry.

use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::time::Duration;

use reqwest::blocking::Client;
use tracing::{debug, info, instrument, warn};

use crate::error::{FetchError, FetchResult};
use crate::registry::Registry;
use crate::DatasetFetcher;

/// Project cache directory name.
pub const CACHE_NAME: &str = "open-radar-data";

/// `$XDG_CACHE_HOME/open-radar-data`, else `$HOME/.cache/open-radar-data`,
/// else a directory under the system temp dir.
pub fn default_cache_dir() -> PathBuf {
    if let Some(cache) = std::env::var_os("XDG_CACHE_HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(cache).join(CACHE_NAME);
    }
    if let Some(home) = std::env::var_os("HOME").filter(|v| !v.is_empty()) {
        return PathBuf::from(home).join(".cache").join(CACHE_NAME);
    }
    std::env::temp_dir().join(CACHE_NAME)
}

pub struct CachedFetcher {
    registry: Registry,
    cache_dir: PathBuf,
    client: Client,
}

impl CachedFetcher {
    pub fn new(registry: Registry, cache_dir: impl Into<PathBuf>) -> FetchResult<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(600))
            .connect_timeout(Duration::from_secs(30))
            .user_agent(concat!("radar-report/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            registry,
            cache_dir: cache_dir.into(),
            client,
        })
    }

    /// Stream `url` into `path`, failing on any non-success status.
    fn download(&self, url: &str, path: &Path) -> FetchResult<u64> {
        let mut response = self.client.get(url).send()?;
        let status = response.status();
        if !status.is_success() {
            return Err(FetchError::Http(format!("GET {} returned {}", url, status)));
        }

        let mut writer = BufWriter::new(File::create(path)?);
        let bytes = response.copy_to(&mut writer)?;
        writer.flush()?;
        Ok(bytes)
    }
}

impl DatasetFetcher for CachedFetcher {
    #[instrument(skip(self), fields(cache = %self.cache_dir.display()))]
    fn fetch(&self, name: &str) -> FetchResult<PathBuf> {
        let expected = self.registry.hash(name)?;
        let final_path = self.cache_dir.join(name);

        if final_path.exists() {
            match expected.verify(&final_path)? {
                Ok(()) => {
                    info!(path = %final_path.display(), "Using cached dataset");
                    return Ok(final_path);
                }
                Err(actual) => {
                    warn!(expected = %expected, actual = %actual, "Cached dataset is stale, downloading again");
                }
            }
        }

        fs::create_dir_all(&self.cache_dir)?;
        let partial_path = self.cache_dir.join(format!("{}.partial", name));
        let url = self.registry.url_for(name);

        info!(url = %url, "Downloading dataset");
        let bytes = match self.download(&url, &partial_path) {
            Ok(bytes) => bytes,
            Err(e) => {
                let _ = fs::remove_file(&partial_path);
                return Err(e);
            }
        };
        debug!(bytes = bytes, "Download finished, verifying");

        if let Err(actual) = expected.verify(&partial_path)? {
            fs::remove_file(&partial_path)?;
            return Err(FetchError::ChecksumMismatch {
                expected: expected.to_string(),
                actual,
            });
        }

        fs::rename(&partial_path, &final_path)?;

        info!(path = %final_path.display(), bytes = bytes, "Dataset cached");
        Ok(final_path)
    }
}
