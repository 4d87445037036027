//! Health check handler

use std::sync::Arc;
use std::time::Instant;

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;
use utoipa::ToSchema;

use crate::domain::SessionStatus;
use crate::infrastructure::storage::Storage;

/// Health check state
#[derive(Clone)]
pub struct HealthState {
    pub storage: Arc<dyn Storage>,
    pub started_at: Arc<Instant>,
}

/// Service health response
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    pub uptime_seconds: u64,
    pub total_slots: u64,
    pub active_sessions: u64,
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is degraded", body = HealthResponse)
    )
)]
pub async fn health_check(State(state): State<HealthState>) -> (StatusCode, Json<HealthResponse>) {
    let uptime = state.started_at.elapsed().as_secs();

    // Storage is in-process; a failed read still means degraded
    let counts = state.storage.slot_counts().await;
    let active = state
        .storage
        .list_sessions_by_status(SessionStatus::Active)
        .await;

    let (status, http_status) = if counts.is_ok() && active.is_ok() {
        ("ok", StatusCode::OK)
    } else {
        ("degraded", StatusCode::SERVICE_UNAVAILABLE)
    };

    (
        http_status,
        Json(HealthResponse {
            status: status.to_string(),
            version: env!("CARGO_PKG_VERSION").to_string(),
            uptime_seconds: uptime,
            total_slots: counts.map(|c| c.total).unwrap_or(0),
            active_sessions: active.map(|s| s.len() as u64).unwrap_or(0),
        }),
    )
}
