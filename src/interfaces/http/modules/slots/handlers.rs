//! Slot API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Extension, Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;

use super::dto::{
    AttachSensorRequest, CreateSlotRequest, FloorStatsView, SlotStatsView, SlotView,
    UpdateSensorConditionRequest, UpdateSlotStatusRequest,
};
use crate::application::SlotService;
use crate::domain::SlotStatus;
use crate::interfaces::http::common::{
    domain_error_response, ApiError, ApiResponse, ValidatedJson,
};
use crate::interfaces::http::middleware::Actor;

/// Slots handler state
#[derive(Clone)]
pub struct SlotsHandlerState {
    pub slots: Arc<SlotService>,
}

/// Inventory changes are limited to staff and admin accounts.
fn require_staff(actor: &Actor) -> Result<(), ApiError> {
    if actor.is_staff() {
        Ok(())
    } else {
        Err((
            StatusCode::FORBIDDEN,
            Json(ApiResponse::error("Insufficient permissions")),
        ))
    }
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct SlotListQuery {
    /// Restrict the listing to one floor
    pub floor: Option<i32>,
    /// AVAILABLE, OCCUPIED or BROKEN
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct AvailableSlotsQuery {
    /// Restrict the listing to one floor
    pub floor: Option<i32>,
}

#[utoipa::path(
    post,
    path = "/api/v1/slots",
    tag = "Slots",
    security(("bearer_auth" = [])),
    request_body = CreateSlotRequest,
    responses(
        (status = 201, description = "Slot created", body = ApiResponse<SlotView>),
        (status = 400, description = "Invalid position or sensor type"),
        (status = 403, description = "Staff role required")
    )
)]
pub async fn create_slot(
    State(state): State<SlotsHandlerState>,
    Extension(actor): Extension<Actor>,
    ValidatedJson(request): ValidatedJson<CreateSlotRequest>,
) -> Result<(StatusCode, Json<ApiResponse<SlotView>>), ApiError> {
    require_staff(&actor)?;

    let slot = state
        .slots
        .create_slot(
            request.floor,
            request.x,
            request.y,
            request.capacity.unwrap_or(1),
            request.sensor_type.as_deref(),
            request.note,
        )
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(slot.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/slots",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(SlotListQuery),
    responses(
        (status = 200, description = "Slot list", body = ApiResponse<Vec<SlotView>>),
        (status = 400, description = "Unknown status filter")
    )
)]
pub async fn list_slots(
    State(state): State<SlotsHandlerState>,
    Query(query): Query<SlotListQuery>,
) -> Result<Json<ApiResponse<Vec<SlotView>>>, ApiError> {
    let status = match query.status.as_deref() {
        Some(s) => Some(SlotStatus::parse(s).map_err(domain_error_response)?),
        None => None,
    };
    let slots = state
        .slots
        .find_slots(query.floor, status)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(
        slots.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/slots/available",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(AvailableSlotsQuery),
    responses(
        (status = 200, description = "Available slots", body = ApiResponse<Vec<SlotView>>)
    )
)]
pub async fn list_available_slots(
    State(state): State<SlotsHandlerState>,
    Query(query): Query<AvailableSlotsQuery>,
) -> Result<Json<ApiResponse<Vec<SlotView>>>, ApiError> {
    let slots = state
        .slots
        .list_available_slots(query.floor)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        slots.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/slots/stats",
    tag = "Slots",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Occupancy statistics", body = ApiResponse<SlotStatsView>)
    )
)]
pub async fn get_slot_stats(
    State(state): State<SlotsHandlerState>,
) -> Result<Json<ApiResponse<SlotStatsView>>, ApiError> {
    let stats = state.slots.stats().await.map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(stats.into())))
}

#[utoipa::path(
    get,
    path = "/api/v1/slots/stats/floors",
    tag = "Slots",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Per-floor occupancy", body = ApiResponse<Vec<FloorStatsView>>)
    )
)]
pub async fn get_floor_stats(
    State(state): State<SlotsHandlerState>,
) -> Result<Json<ApiResponse<Vec<FloorStatsView>>>, ApiError> {
    let floors = state
        .slots
        .floor_stats()
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        floors.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/slots/{id}",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Slot details", body = ApiResponse<SlotView>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_slot(
    State(state): State<SlotsHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SlotView>>, ApiError> {
    let slot = state.slots.get_slot(id).await.map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(slot.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/slots/{id}",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Slot deleted"),
        (status = 403, description = "Staff role required"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_slot(
    State(state): State<SlotsHandlerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    require_staff(&actor)?;
    state.slots.delete_slot(id).await.map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success("Slot deleted".to_string())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/slots/{id}/status",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    request_body = UpdateSlotStatusRequest,
    responses(
        (status = 200, description = "Status changed", body = ApiResponse<SlotView>),
        (status = 400, description = "Unknown status"),
        (status = 409, description = "Broken slot cannot be occupied"),
        (status = 404, description = "Not found")
    )
)]
pub async fn update_slot_status(
    State(state): State<SlotsHandlerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateSlotStatusRequest>,
) -> Result<Json<ApiResponse<SlotView>>, ApiError> {
    require_staff(&actor)?;
    let slot = state
        .slots
        .set_slot_status(id, &request.status)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(slot.into())))
}

#[utoipa::path(
    post,
    path = "/api/v1/slots/{id}/sensor",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    request_body = AttachSensorRequest,
    responses(
        (status = 200, description = "Sensor attached", body = ApiResponse<SlotView>),
        (status = 400, description = "Unknown sensor type"),
        (status = 404, description = "Slot not found")
    )
)]
pub async fn attach_sensor(
    State(state): State<SlotsHandlerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AttachSensorRequest>,
) -> Result<Json<ApiResponse<SlotView>>, ApiError> {
    require_staff(&actor)?;
    let slot = state
        .slots
        .attach_sensor(id, &request.sensor_type)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(slot.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/slots/{id}/sensor",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    responses(
        (status = 200, description = "Sensor detached", body = ApiResponse<SlotView>),
        (status = 404, description = "Slot or sensor not found")
    )
)]
pub async fn detach_sensor(
    State(state): State<SlotsHandlerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<SlotView>>, ApiError> {
    require_staff(&actor)?;
    let slot = state
        .slots
        .detach_sensor(id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(slot.into())))
}

#[utoipa::path(
    patch,
    path = "/api/v1/slots/{id}/sensor/condition",
    tag = "Slots",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Slot ID")),
    request_body = UpdateSensorConditionRequest,
    responses(
        (status = 200, description = "Condition updated", body = ApiResponse<SlotView>),
        (status = 404, description = "Slot or sensor not found")
    )
)]
pub async fn update_sensor_condition(
    State(state): State<SlotsHandlerState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<UpdateSensorConditionRequest>,
) -> Result<Json<ApiResponse<SlotView>>, ApiError> {
    require_staff(&actor)?;
    let slot = state
        .slots
        .update_sensor_condition(id, &request.condition, request.is_active)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(slot.into())))
}
