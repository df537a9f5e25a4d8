//! HTTP response types
//!
//! Matching endpoints answer with [`MatchResponse`] on success. Every failure,
//! whatever its cause, is rendered as [`FailureResponse`] with status 500.

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use tracing::error;

use crate::errors::AppError;
use crate::models::MatchResult;

/// Generic message sent with every failed request
pub const FAILURE_MESSAGE: &str = "An error occurred while processing your request.";

/// Ranked matches and how long the search took
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatchResponse {
    pub sorted_res: Vec<MatchResult>,
    /// Elapsed wall-clock time in milliseconds
    pub time: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureResponse {
    pub message: String,
    pub error: String,
}

impl FailureResponse {
    pub fn new(error: impl ToString) -> Self {
        Self {
            message: FAILURE_MESSAGE.to_string(),
            error: error.to_string(),
        }
    }
}

impl IntoResponse for FailureResponse {
    fn into_response(self) -> Response {
        (StatusCode::INTERNAL_SERVER_ERROR, Json(self)).into_response()
    }
}

/// Health check response
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub catalog_size: usize,
    pub uptime_seconds: u64,
    pub timestamp: chrono::DateTime<chrono::Utc>,
}

impl HealthResponse {
    pub fn healthy(catalog_size: usize, uptime_seconds: u64) -> Self {
        Self {
            status: "healthy".to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            catalog_size,
            uptime_seconds,
            timestamp: chrono::Utc::now(),
        }
    }
}

/// Convert AppError to the failure response
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        error!("Request failed: {}", self);
        FailureResponse::new(&self).into_response()
    }
}
