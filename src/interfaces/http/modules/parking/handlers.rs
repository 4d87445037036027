//! Parking session API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::dto::{CheckInRequest, SessionView};
use crate::application::ParkingService;
use crate::domain::SessionStatus;
use crate::interfaces::http::common::{
    domain_error_response, ApiError, ApiResponse, ValidatedJson,
};

/// Parking handler state
#[derive(Clone)]
pub struct ParkingHandlerState {
    pub parking: Arc<ParkingService>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SessionListQuery {
    /// ACTIVE, COMPLETED or CANCELLED
    pub status: Option<String>,
}

#[utoipa::path(
    post,
    path = "/api/v1/parking/check-in",
    tag = "Parking",
    security(("bearer_auth" = [])),
    request_body = CheckInRequest,
    responses(
        (status = 201, description = "Session started", body = ApiResponse<SessionView>),
        (status = 409, description = "Plate already parked, requested slot taken, or lot full"),
        (status = 404, description = "Requested slot not found"),
        (status = 422, description = "Validation error")
    )
)]
pub async fn check_in(
    State(state): State<ParkingHandlerState>,
    ValidatedJson(request): ValidatedJson<CheckInRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SessionView>>), ApiError> {
    let session = state
        .parking
        .check_in(&request.plate_number, request.vehicle_type, request.slot_id)
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(session.into())),
    ))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking/check-out/{id}",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session completed with fee", body = ApiResponse<SessionView>),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session already closed")
    )
)]
pub async fn check_out(
    State(state): State<ParkingHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = state
        .parking
        .check_out(id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(session.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/parking/cancel/{id}",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session cancelled without fee", body = ApiResponse<SessionView>),
        (status = 404, description = "Session not found"),
        (status = 409, description = "Session already closed")
    )
)]
pub async fn cancel_session(
    State(state): State<ParkingHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = state
        .parking
        .cancel(id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(session.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking/sessions",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(SessionListQuery),
    responses(
        (status = 200, description = "Session list", body = ApiResponse<Vec<SessionView>>),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_sessions(
    State(state): State<ParkingHandlerState>,
    Query(query): Query<SessionListQuery>,
) -> Result<Json<ApiResponse<Vec<SessionView>>>, ApiError> {
    let status = match query.status.as_deref() {
        Some(s) => Some(SessionStatus::parse(s).map_err(domain_error_response)?),
        None => None,
    };

    let sessions = state
        .parking
        .list_sessions(status)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        sessions.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/parking/sessions/{id}",
    tag = "Parking",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Session ID")),
    responses(
        (status = 200, description = "Session details", body = ApiResponse<SessionView>),
        (status = 404, description = "Session not found")
    )
)]
pub async fn get_session(
    State(state): State<ParkingHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SessionView>>, ApiError> {
    let session = state
        .parking
        .get_session(id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(session.into())))
}
