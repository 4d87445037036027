//! API router with Swagger UI

use std::sync::Arc;
use std::time::Instant;

use axum::{
    middleware,
    routing::{delete, get, patch, post, put},
    Router,
};
use metrics_exporter_prometheus::PrometheusHandle;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};
use utoipa_swagger_ui::SwaggerUi;

use crate::application::{AuthService, ParkingService, SlotService, UserService};
use crate::infrastructure::storage::Storage;
use crate::interfaces::http::common::ApiResponse;
use crate::interfaces::http::middleware::{auth_middleware, AuthState};
use crate::interfaces::http::modules::{auth, health, metrics, parking, slots, users};

/// Security scheme modifier for OpenAPI
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("JWT Bearer token"))
                        .build(),
                ),
            );
        }
    }
}

/// OpenAPI documentation
#[derive(OpenApi)]
#[openapi(
    paths(
        // Health
        health::health_check,
        // Auth
        auth::register,
        auth::login,
        auth::get_current_account,
        // Slots
        slots::create_slot,
        slots::list_slots,
        slots::list_available_slots,
        slots::get_slot_stats,
        slots::get_floor_stats,
        slots::get_slot,
        slots::delete_slot,
        slots::update_slot_status,
        slots::attach_sensor,
        slots::detach_sensor,
        slots::update_sensor_condition,
        // Parking
        parking::check_in,
        parking::check_out,
        parking::cancel_session,
        parking::list_sessions,
        parking::get_session,
        // Users
        users::create_user,
        users::list_users,
        users::get_user,
        users::delete_user,
        users::add_vehicle,
        users::remove_vehicle,
        users::find_vehicle_by_plate,
        users::add_payment_method,
        users::set_default_payment_method,
    ),
    components(
        schemas(
            // Common
            ApiResponse<String>,
            // Health
            health::HealthResponse,
            // Auth
            auth::RegisterRequest,
            auth::LoginRequest,
            auth::LoginResponse,
            auth::AccountInfo,
            auth::MeResponse,
            // Slots
            slots::CreateSlotRequest,
            slots::UpdateSlotStatusRequest,
            slots::AttachSensorRequest,
            slots::UpdateSensorConditionRequest,
            slots::SlotView,
            slots::SensorView,
            slots::SlotStatsView,
            slots::FloorStatsView,
            // Parking
            parking::CheckInRequest,
            parking::SessionView,
            parking::FeeView,
            // Users
            users::CreateUserRequest,
            users::AddVehicleRequest,
            users::AddPaymentMethodRequest,
            users::UserView,
            users::VehicleView,
            users::PaymentMethodView,
            users::VehicleOwnerView,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Service health check"),
        (name = "Authentication", description = "Account registration and JWT login"),
        (name = "Slots", description = "Parking slot inventory, sensors and occupancy statistics"),
        (name = "Parking", description = "Parking sessions: check-in, check-out, cancel"),
        (name = "Users", description = "User profiles, vehicles and payment methods"),
    ),
    info(
        title = "Parking Service API",
        version = "0.1.0",
        description = "REST API for parking lot management: slots, sessions, billing and users",
        license(name = "MIT")
    )
)]
pub struct ApiDoc;

/// Create the API router with all routes
pub fn create_api_router(
    storage: Arc<dyn Storage>,
    auth_service: Arc<AuthService>,
    slot_service: Arc<SlotService>,
    parking_service: Arc<ParkingService>,
    user_service: Arc<UserService>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let auth_state = AuthState {
        auth: auth_service.clone(),
    };

    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    // Auth routes (public)
    let auth_public_routes = Router::new()
        .route("/register", post(auth::register))
        .route("/login", post(auth::login))
        .with_state(auth::AuthHandlerState {
            auth: auth_service.clone(),
        });

    // Auth routes (protected)
    let auth_protected_routes = Router::new()
        .route("/me", get(auth::get_current_account))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(auth::AuthHandlerState {
            auth: auth_service.clone(),
        });

    // Slot routes (protected)
    let slot_routes = Router::new()
        .route("/", post(slots::create_slot).get(slots::list_slots))
        .route("/available", get(slots::list_available_slots))
        .route("/stats", get(slots::get_slot_stats))
        .route("/stats/floors", get(slots::get_floor_stats))
        .route("/{id}", get(slots::get_slot).delete(slots::delete_slot))
        .route("/{id}/status", patch(slots::update_slot_status))
        .route(
            "/{id}/sensor",
            post(slots::attach_sensor).delete(slots::detach_sensor),
        )
        .route(
            "/{id}/sensor/condition",
            patch(slots::update_sensor_condition),
        )
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(slots::SlotsHandlerState {
            slots: slot_service,
        });

    // Parking routes (protected)
    let parking_routes = Router::new()
        .route("/check-in", post(parking::check_in))
        .route("/check-out/{id}", post(parking::check_out))
        .route("/cancel/{id}", post(parking::cancel_session))
        .route("/sessions", get(parking::list_sessions))
        .route("/sessions/{id}", get(parking::get_session))
        .layer(middleware::from_fn_with_state(
            auth_state.clone(),
            auth_middleware,
        ))
        .with_state(parking::ParkingHandlerState {
            parking: parking_service,
        });

    // User routes (protected)
    let user_routes = Router::new()
        .route("/", post(users::create_user).get(users::list_users))
        .route("/vehicles/by-plate/{plate}", get(users::find_vehicle_by_plate))
        .route("/{id}", get(users::get_user).delete(users::delete_user))
        .route("/{id}/vehicles", post(users::add_vehicle))
        .route("/{id}/vehicles/{vehicle_id}", delete(users::remove_vehicle))
        .route("/{id}/payment-methods", post(users::add_payment_method))
        .route(
            "/{id}/payment-methods/{method_id}/default",
            put(users::set_default_payment_method),
        )
        .layer(middleware::from_fn_with_state(auth_state, auth_middleware))
        .with_state(users::UsersHandlerState {
            users: user_service,
        });

    let health_state = health::HealthState {
        storage,
        started_at: Arc::new(Instant::now()),
    };

    let metrics_state = metrics::MetricsState {
        handle: metrics_handle,
    };

    let swagger_routes = SwaggerUi::new("/docs").url("/api-doc/openapi.json", ApiDoc::openapi());

    Router::new()
        .merge(swagger_routes)
        .route("/health", get(health::health_check).with_state(health_state))
        .route(
            "/metrics",
            get(metrics::prometheus_metrics).with_state(metrics_state),
        )
        .nest("/api/v1/auth", auth_public_routes)
        .nest("/api/v1/auth", auth_protected_routes)
        .nest("/api/v1/slots", slot_routes)
        .nest("/api/v1/parking", parking_routes)
        .nest("/api/v1/users", user_routes)
        .layer(middleware::from_fn(metrics::http_metrics_middleware))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
