//! Configuration default values
//!
//! This module contains all the default values for configuration options,
//! making them easily changeable in one central location.

// Web server defaults
pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 3000;
pub const DEFAULT_MAX_REQUEST_SIZE: usize = 10 * 1024 * 1024; // 10MB

// Catalog defaults
pub const DEFAULT_CATALOG_PATH: &str = "./data/catalog.json";

// Matching defaults
pub const DEFAULT_RASTER_SIZE: u32 = 28;
pub const DEFAULT_THRESHOLD: f64 = 0.1;
pub const DEFAULT_INCLUDE_AA: bool = false;
pub const DEFAULT_SLICE_LIMIT: usize = 10;

// PNG input is decoded from a user-drawn bitmap and tolerates a larger mismatch
pub const DEFAULT_PNG_FILTER_LIMIT: f64 = 0.25;
pub const DEFAULT_SVG_FILTER_LIMIT: f64 = 0.15;
