//! Pipeline configuration.
//!
//! Every constant a stage needs lives here. Defaults reproduce the standard
//! report on the open-radar-data sample scan; a YAML file may override any
//! subset of keys, and command-line flags override the file.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use dataset_fetch::{default_cache_dir, Registry, OPEN_RADAR_DATA_URL, SAMPLE_SGP_DATA, SAMPLE_SGP_HASH};
use radar_common::{DIFFERENTIAL_REFLECTIVITY, REFLECTIVITY, VELOCITY};
use radar_grid::{GridSpec, RadiusOfInfluence};
use serde::{Deserialize, Serialize};
use tracing::info;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub dataset: DatasetConfig,
    /// Directory receiving every image; created when missing
    pub output_dir: PathBuf,
    /// Field used for the overview, sweep images, statistics and composite
    pub primary_field: String,
    /// Fields rendered for the first sweep when present
    pub fields: Vec<String>,
    pub x_limits_km: (f64, f64),
    pub y_limits_km: (f64, f64),
    pub histogram_bins: usize,
    pub grid: GridSpec,
    pub roi: RadiusOfInfluence,
    pub image: ImageConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetConfig::default(),
            output_dir: PathBuf::from("output"),
            primary_field: REFLECTIVITY.to_string(),
            fields: vec![
                REFLECTIVITY.to_string(),
                VELOCITY.to_string(),
                DIFFERENTIAL_REFLECTIVITY.to_string(),
            ],
            x_limits_km: (-150.0, 150.0),
            y_limits_km: (-150.0, 150.0),
            histogram_bins: 50,
            grid: GridSpec::default(),
            roi: RadiusOfInfluence::default(),
            image: ImageConfig::default(),
        }
    }
}

/// Which file to fetch, and from where.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatasetConfig {
    pub name: String,
    /// `md5:<hex>`, `sha256:<hex>` or bare sha256 hex
    pub hash: String,
    pub base_url: String,
    /// Defaults to the user cache directory
    pub cache_dir: Option<PathBuf>,
}

impl Default for DatasetConfig {
    fn default() -> Self {
        Self {
            name: SAMPLE_SGP_DATA.to_string(),
            hash: SAMPLE_SGP_HASH.to_string(),
            base_url: OPEN_RADAR_DATA_URL.to_string(),
            cache_dir: None,
        }
    }
}

impl DatasetConfig {
    pub fn registry(&self) -> Result<Registry> {
        Registry::new(&self.base_url)
            .with_entry(&self.name, &self.hash)
            .with_context(|| format!("Invalid registry entry for {}", self.name))
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.cache_dir.clone().unwrap_or_else(default_cache_dir)
    }
}

/// Output image size in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImageConfig {
    pub width: u32,
    pub height: u32,
}

impl Default for ImageConfig {
    fn default() -> Self {
        Self {
            width: 1000,
            height: 800,
        }
    }
}

impl PipelineConfig {
    pub fn from_yaml_str(yaml: &str) -> Result<Self> {
        serde_yaml::from_str(yaml).context("Failed to parse pipeline config")
    }

    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file {}", path.display()))?;
        let config = Self::from_yaml_str(&content)
            .with_context(|| format!("Invalid config file {}", path.display()))?;
        info!(path = %path.display(), "Loaded pipeline config");
        Ok(config)
    }

    /// Load `path` when given, else use defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    /// Apply command-line overrides, which take precedence over the file.
    pub fn with_overrides(
        mut self,
        output_dir: Option<PathBuf>,
        cache_dir: Option<PathBuf>,
        dataset: Option<String>,
    ) -> Self {
        if let Some(dir) = output_dir {
            self.output_dir = dir;
        }
        if let Some(dir) = cache_dir {
            self.dataset.cache_dir = Some(dir);
        }
        if let Some(name) = dataset {
            self.dataset.name = name;
        }
        self
    }

    pub fn output_path(&self, file_name: &str) -> PathBuf {
        self.output_dir.join(file_name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_standard_report() {
        let config = PipelineConfig::default();
        assert_eq!(config.dataset.name, "sample_sgp_data.nc");
        assert_eq!(config.dataset.hash, "md5:64caf070f295534d312fea75b0bcb888");
        assert_eq!(config.primary_field, "reflectivity_horizontal");
        assert_eq!(config.fields.len(), 3);
        assert_eq!(config.histogram_bins, 50);
        assert_eq!(config.grid.shape, (1, 500, 500));
        assert_eq!(config.x_limits_km, (-150.0, 150.0));
        assert!(config.dataset.registry().is_ok());
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let yaml = r#"
output_dir: /tmp/plots
histogram_bins: 20
grid:
  shape: [1, 100, 100]
image:
  width: 640
"#;
        let config = PipelineConfig::from_yaml_str(yaml).unwrap();
        assert_eq!(config.output_dir, PathBuf::from("/tmp/plots"));
        assert_eq!(config.histogram_bins, 20);
        assert_eq!(config.grid.shape, (1, 100, 100));
        assert_eq!(config.grid.x_limits, (-150_000.0, 150_000.0));
        assert_eq!(config.image.width, 640);
        assert_eq!(config.image.height, 800);
        assert_eq!(config.dataset, DatasetConfig::default());
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = PipelineConfig::from_yaml_str("output_dir: from_file\n")
            .unwrap()
            .with_overrides(Some(PathBuf::from("from_cli")), Some(PathBuf::from("/cache")), None);
        assert_eq!(config.output_dir, PathBuf::from("from_cli"));
        assert_eq!(config.dataset.cache_dir(), PathBuf::from("/cache"));
        assert_eq!(config.dataset.name, SAMPLE_SGP_DATA);
    }

    #[test]
    fn test_invalid_yaml_value_is_error() {
        assert!(PipelineConfig::from_yaml_str("histogram_bins: many\n").is_err());
    }
}
