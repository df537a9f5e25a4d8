//! Error type definitions for the icon matching service
//!
//! Request-time failures convert into [`AppError`]. [`CatalogError`] only
//! occurs at startup and reaches `main` through `anyhow`.

use std::path::PathBuf;
use thiserror::Error;

/// Top-level application error type
///
/// Every failure a request can hit converts into this enum. The web layer
/// renders all variants with the same generic failure shape.
#[derive(Error, Debug)]
pub enum AppError {
    /// Matching pipeline errors
    #[error("{0}")]
    Matching(#[from] MatchError),

    /// Validation errors
    #[error("Validation error: {message}")]
    Validation { message: String },

    /// Configuration errors
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// A matching run did not finish in time
    #[error("Matching timed out after {elapsed}")]
    Timeout { elapsed: String },

    /// Generic internal errors
    #[error("Internal error: {message}")]
    Internal { message: String },
}

/// Errors raised by the decode -> rasterize -> compare pipeline
#[derive(Error, Debug)]
pub enum MatchError {
    /// The user input was not valid base64 / data URL content
    #[error("Failed to decode input: {0}")]
    Decode(#[from] base64::DecodeError),

    /// The image backend could not produce a raster
    #[error("Failed to rasterize {origin}: {message}")]
    Rasterization { origin: String, message: String },

    /// Two rasters of different sizes were compared
    #[error("Raster sizes do not match: {expected} bytes vs {actual} bytes")]
    Comparison { expected: usize, actual: usize },
}

/// Errors raised while loading the reference catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// The catalog file could not be read
    #[error("Failed to read catalog {path:?}: {error}")]
    Io {
        path: PathBuf,
        #[source]
        error: std::io::Error,
    },

    /// The catalog file is not a valid record list
    #[error("Failed to parse catalog: {0}")]
    Parse(#[from] serde_json::Error),

    /// A record has an empty image reference
    #[error("Catalog entry {index} has an empty nodepath")]
    EmptyNodepath { index: usize },
}

/// Convenience methods for creating common error types
impl AppError {
    /// Create a validation error with a custom message
    pub fn validation<S: Into<String>>(message: S) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration<S: Into<String>>(message: S) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a timeout error from the deadline that was exceeded
    pub fn timeout(deadline: std::time::Duration) -> Self {
        Self::Timeout {
            elapsed: humantime::format_duration(deadline).to_string(),
        }
    }

    /// Create an internal error
    pub fn internal<S: Into<String>>(message: S) -> Self {
        Self::Internal {
            message: message.into(),
        }
    }
}

impl MatchError {
    /// Create a rasterization error for the named image origin
    pub fn rasterization<O: Into<String>, M: ToString>(origin: O, message: M) -> Self {
        Self::Rasterization {
            origin: origin.into(),
            message: message.to_string(),
        }
    }
}
