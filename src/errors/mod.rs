//! Centralized error handling for the icon matching service
//!
//! This module unifies the error types raised while loading the catalog,
//! decoding user input, rasterizing images and comparing rasters.
//!
//! # Error Categories
//!
//! - **Matching Errors**: input decoding, rasterization and raster comparison
//! - **Catalog Errors**: loading and validating the reference catalog
//! - **Validation Errors**: malformed requests or configuration values
//! - **Timeout Errors**: a matching run exceeded its configured deadline
//!
//! # Usage
//!
//! ```rust
//! use icon_match::errors::{AppError, AppResult};
//!
//! fn example_function() -> AppResult<String> {
//!     Err(AppError::validation("missing userInput"))
//! }
//! ```

pub mod types;

pub use types::*;

/// Convenience type alias for Results using AppError
pub type AppResult<T> = Result<T, AppError>;

/// Convenience type alias for matching pipeline Results
pub type MatchResultOf<T> = Result<T, MatchError>;

/// Convenience type alias for catalog Results
pub type CatalogResult<T> = Result<T, CatalogError>;
