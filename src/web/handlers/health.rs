//! Health check HTTP handler

use axum::{Json, extract::State};

use crate::web::{AppState, responses::HealthResponse};

/// Returns service status and the size of the loaded catalog
pub async fn health_check(State(state): State<AppState>) -> Json<HealthResponse> {
    Json(HealthResponse::healthy(
        state.matcher.catalog().len(),
        state.started_at.elapsed().as_secs(),
    ))
}
