//! Icon matching HTTP handlers

use axum::{Json, extract::State};
use std::time::Instant;
use tracing::debug;

use crate::errors::AppResult;
use crate::models::InputKind;
use crate::web::{AppState, extractors::UserInput, responses::MatchResponse};

/// Match a base64 PNG (optionally a `data:image/png;base64,` URL)
pub async fn png_icons(
    State(state): State<AppState>,
    UserInput(raw): UserInput,
) -> AppResult<Json<MatchResponse>> {
    find_icons(&state, InputKind::Png, &raw).await
}

/// Match raw SVG markup
pub async fn svg_icons(
    State(state): State<AppState>,
    UserInput(raw): UserInput,
) -> AppResult<Json<MatchResponse>> {
    find_icons(&state, InputKind::Svg, &raw).await
}

async fn find_icons(state: &AppState, kind: InputKind, raw: &str) -> AppResult<Json<MatchResponse>> {
    let start = Instant::now();
    let sorted_res = state.matcher.find_similar(kind, raw).await?;
    let time = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);

    debug!(
        kind = %kind,
        matches = sorted_res.len(),
        time_ms = time,
        "Icon search finished"
    );

    Ok(Json(MatchResponse { sorted_res, time }))
}
