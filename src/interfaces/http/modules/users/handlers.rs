//! User API handlers

use std::sync::Arc;

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use uuid::Uuid;

use super::dto::{
    AddPaymentMethodRequest, AddVehicleRequest, CreateUserRequest, PaymentMethodView, UserView,
    VehicleOwnerView, VehicleView,
};
use crate::application::UserService;
use crate::interfaces::http::common::{
    domain_error_response, ApiError, ApiResponse, ValidatedJson,
};

/// Users handler state
#[derive(Clone)]
pub struct UsersHandlerState {
    pub users: Arc<UserService>,
}

#[utoipa::path(
    post,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    request_body = CreateUserRequest,
    responses(
        (status = 201, description = "User created", body = ApiResponse<UserView>),
        (status = 422, description = "Validation error")
    )
)]
pub async fn create_user(
    State(state): State<UsersHandlerState>,
    ValidatedJson(request): ValidatedJson<CreateUserRequest>,
) -> Result<(StatusCode, Json<ApiResponse<UserView>>), ApiError> {
    let user = state
        .users
        .create_user(&request.name, request.email)
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(user.into())),
    ))
}

#[utoipa::path(
    get,
    path = "/api/v1/users",
    tag = "Users",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "User list", body = ApiResponse<Vec<UserView>>)
    )
)]
pub async fn list_users(
    State(state): State<UsersHandlerState>,
) -> Result<Json<ApiResponse<Vec<UserView>>>, ApiError> {
    let users = state.users.list_users().await.map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(
        users.into_iter().map(Into::into).collect(),
    )))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User details", body = ApiResponse<UserView>),
        (status = 404, description = "Not found")
    )
)]
pub async fn get_user(
    State(state): State<UsersHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    let user = state.users.get_user(id).await.map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(user.into())))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 404, description = "Not found")
    )
)]
pub async fn delete_user(
    State(state): State<UsersHandlerState>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state.users.delete_user(id).await.map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success("User deleted".to_string())))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/vehicles",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AddVehicleRequest,
    responses(
        (status = 201, description = "Vehicle registered", body = ApiResponse<VehicleView>),
        (status = 404, description = "User not found"),
        (status = 409, description = "Plate already registered")
    )
)]
pub async fn add_vehicle(
    State(state): State<UsersHandlerState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AddVehicleRequest>,
) -> Result<(StatusCode, Json<ApiResponse<VehicleView>>), ApiError> {
    let vehicle = state
        .users
        .add_vehicle(id, &request.plate_number, request.vehicle_type)
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(vehicle.into())),
    ))
}

#[utoipa::path(
    delete,
    path = "/api/v1/users/{id}/vehicles/{vehicle_id}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ("vehicle_id" = Uuid, Path, description = "Vehicle ID")
    ),
    responses(
        (status = 200, description = "Vehicle removed"),
        (status = 404, description = "User or vehicle not found")
    )
)]
pub async fn remove_vehicle(
    State(state): State<UsersHandlerState>,
    Path((id, vehicle_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<String>>, ApiError> {
    state
        .users
        .remove_vehicle(id, vehicle_id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success("Vehicle removed".to_string())))
}

#[utoipa::path(
    get,
    path = "/api/v1/users/vehicles/by-plate/{plate}",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("plate" = String, Path, description = "Plate number")),
    responses(
        (status = 200, description = "Owner and vehicle", body = ApiResponse<VehicleOwnerView>),
        (status = 404, description = "Plate not registered")
    )
)]
pub async fn find_vehicle_by_plate(
    State(state): State<UsersHandlerState>,
    Path(plate): Path<String>,
) -> Result<Json<ApiResponse<VehicleOwnerView>>, ApiError> {
    let (owner, vehicle) = state
        .users
        .find_vehicle_by_plate(&plate)
        .await
        .map_err(domain_error_response)?;

    Ok(Json(ApiResponse::success(VehicleOwnerView {
        owner: owner.into(),
        vehicle: vehicle.into(),
    })))
}

#[utoipa::path(
    post,
    path = "/api/v1/users/{id}/payment-methods",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "User ID")),
    request_body = AddPaymentMethodRequest,
    responses(
        (status = 201, description = "Payment method added", body = ApiResponse<PaymentMethodView>),
        (status = 404, description = "User not found")
    )
)]
pub async fn add_payment_method(
    State(state): State<UsersHandlerState>,
    Path(id): Path<Uuid>,
    ValidatedJson(request): ValidatedJson<AddPaymentMethodRequest>,
) -> Result<(StatusCode, Json<ApiResponse<PaymentMethodView>>), ApiError> {
    let method = state
        .users
        .add_payment_method(id, &request.kind, request.provider, request.external_token)
        .await
        .map_err(domain_error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(method.into())),
    ))
}

#[utoipa::path(
    put,
    path = "/api/v1/users/{id}/payment-methods/{method_id}/default",
    tag = "Users",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "User ID"),
        ("method_id" = Uuid, Path, description = "Payment method ID")
    ),
    responses(
        (status = 200, description = "Default changed", body = ApiResponse<UserView>),
        (status = 404, description = "User or method not found")
    )
)]
pub async fn set_default_payment_method(
    State(state): State<UsersHandlerState>,
    Path((id, method_id)): Path<(Uuid, Uuid)>,
) -> Result<Json<ApiResponse<UserView>>, ApiError> {
    let user = state
        .users
        .set_default_payment_method(id, method_id)
        .await
        .map_err(domain_error_response)?;
    Ok(Json(ApiResponse::success(user.into())))
}
