use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::info;

use crate::errors::AppError;

pub mod defaults;
pub mod duration_serde;

use defaults::*;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub web: WebConfig,
    #[serde(default)]
    pub catalog: CatalogConfig,
    #[serde(default)]
    pub matching: MatchingConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WebConfig {
    #[serde(default = "default_host")]
    pub host: String,
    #[serde(default = "default_port")]
    pub port: u16,
    /// Maximum accepted body size in bytes for POSTed inputs
    #[serde(default = "default_max_request_size")]
    pub max_request_size: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CatalogConfig {
    /// JSON file holding the ordered `{ id, nodepath }` records
    #[serde(default = "default_catalog_path")]
    pub path: PathBuf,
    /// Directory relative nodepaths resolve against (defaults to the catalog file's directory)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub asset_root: Option<PathBuf>,
}

/// What to do when a single catalog entry cannot be rasterized or compared
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryErrorPolicy {
    /// Fail the whole request with the entry's error
    #[default]
    Abort,
    /// Log the failure and leave the entry out of the results
    Skip,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchingConfig {
    /// Width and height every image is resized to before comparison
    #[serde(default = "default_raster_size")]
    pub raster_size: u32,
    /// Per-pixel colour distance threshold in [0, 1]; 0 accepts only exact colours
    #[serde(default = "default_threshold")]
    pub threshold: f64,
    /// Count anti-aliased pixels as differences instead of ignoring them
    #[serde(default = "default_include_aa")]
    pub include_aa: bool,
    /// Matches with a mismatch ratio at or above this are dropped for PNG input
    #[serde(default = "default_png_filter_limit")]
    pub png_filter_limit: f64,
    /// Matches with a mismatch ratio at or above this are dropped for SVG input
    #[serde(default = "default_svg_filter_limit")]
    pub svg_filter_limit: f64,
    /// Maximum number of matches returned
    #[serde(default = "default_slice_limit")]
    pub slice_limit: usize,
    /// Maximum catalog entries processed at once (unbounded when unset)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_concurrency: Option<usize>,
    /// Deadline for a whole matching run (no deadline when unset)
    #[serde(
        default,
        with = "duration_serde::option_duration",
        skip_serializing_if = "Option::is_none"
    )]
    pub timeout: Option<Duration>,
    #[serde(default)]
    pub on_entry_error: EntryErrorPolicy,
}

// Web defaults
fn default_host() -> String {
    DEFAULT_HOST.to_string()
}

fn default_port() -> u16 {
    DEFAULT_PORT
}

fn default_max_request_size() -> usize {
    DEFAULT_MAX_REQUEST_SIZE
}

// Catalog defaults
fn default_catalog_path() -> PathBuf {
    PathBuf::from(DEFAULT_CATALOG_PATH)
}

// Matching defaults
fn default_raster_size() -> u32 {
    DEFAULT_RASTER_SIZE
}

fn default_threshold() -> f64 {
    DEFAULT_THRESHOLD
}

fn default_include_aa() -> bool {
    DEFAULT_INCLUDE_AA
}

fn default_png_filter_limit() -> f64 {
    DEFAULT_PNG_FILTER_LIMIT
}

fn default_svg_filter_limit() -> f64 {
    DEFAULT_SVG_FILTER_LIMIT
}

fn default_slice_limit() -> usize {
    DEFAULT_SLICE_LIMIT
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_request_size: default_max_request_size(),
        }
    }
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            path: default_catalog_path(),
            asset_root: None,
        }
    }
}

impl CatalogConfig {
    /// Directory that relative nodepaths are joined onto
    pub fn resolved_asset_root(&self) -> PathBuf {
        match &self.asset_root {
            Some(root) => root.clone(),
            None => self
                .path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        }
    }
}

impl Default for MatchingConfig {
    fn default() -> Self {
        Self {
            raster_size: default_raster_size(),
            threshold: default_threshold(),
            include_aa: default_include_aa(),
            png_filter_limit: default_png_filter_limit(),
            svg_filter_limit: default_svg_filter_limit(),
            slice_limit: default_slice_limit(),
            max_concurrency: None,
            timeout: None,
            on_entry_error: EntryErrorPolicy::default(),
        }
    }
}

impl MatchingConfig {
    /// Validate matching parameters
    pub fn validate(&self) -> Result<(), String> {
        if self.raster_size == 0 {
            return Err("raster_size must be greater than 0".to_string());
        }
        if !(0.0..=1.0).contains(&self.threshold) {
            return Err(format!(
                "threshold must be within [0, 1], got {}",
                self.threshold
            ));
        }
        for (name, value) in [
            ("png_filter_limit", self.png_filter_limit),
            ("svg_filter_limit", self.svg_filter_limit),
        ] {
            if !(value > 0.0 && value <= 1.0) {
                return Err(format!("{name} must be within (0, 1], got {value}"));
            }
        }
        if self.slice_limit == 0 {
            return Err("slice_limit must be greater than 0".to_string());
        }
        if self.max_concurrency == Some(0) {
            return Err("max_concurrency must be greater than 0 when set".to_string());
        }
        Ok(())
    }

    /// Number of pixels in one raster
    pub fn pixel_count(&self) -> usize {
        (self.raster_size as usize) * (self.raster_size as usize)
    }
}

impl Config {
    /// Load configuration, writing the defaults to `config_file` if it does not exist
    pub fn load_from_file(config_file: &str) -> Result<Self> {
        let config: Self = if Path::new(&config_file).exists() {
            let contents = std::fs::read_to_string(config_file)?;
            toml::from_str(&contents)?
        } else {
            let default_config = Self::default();
            let contents = toml::to_string_pretty(&default_config)?;
            std::fs::write(config_file, contents)?;
            info!("Created default config file: {}", config_file);
            default_config
        };

        config
            .matching
            .validate()
            .map_err(|e| AppError::configuration(format!("invalid [matching] section: {e}")))?;

        Ok(config)
    }
}
