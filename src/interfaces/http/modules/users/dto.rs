//! User DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::{PaymentMethod, User, Vehicle};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateUserRequest {
    #[validate(length(min = 1, max = 100, message = "name is required"))]
    pub name: String,
    #[validate(email(message = "invalid email format"))]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddVehicleRequest {
    #[validate(length(min = 1, max = 12, message = "plate number must be 1-12 characters"))]
    pub plate_number: String,
    /// Free-form vehicle class, e.g. MOBIL or MOTOR
    #[validate(length(max = 30, message = "vehicle type is too long"))]
    pub vehicle_type: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AddPaymentMethodRequest {
    /// Payment kind, e.g. CARD, EWALLET, QRIS
    #[validate(length(min = 1, max = 30, message = "kind is required"))]
    pub kind: String,
    #[validate(length(max = 50, message = "provider is too long"))]
    pub provider: Option<String>,
    /// Opaque provider-side token; never raw card data
    pub external_token: Option<String>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleView {
    pub id: Uuid,
    pub plate_number: String,
    pub vehicle_type: Option<String>,
    pub created_at: DateTime<Utc>,
}

impl From<Vehicle> for VehicleView {
    fn from(vehicle: Vehicle) -> Self {
        Self {
            id: vehicle.id,
            plate_number: vehicle.plate.code,
            vehicle_type: vehicle.plate.vehicle_type,
            created_at: vehicle.created_at,
        }
    }
}

/// The external token stays server-side; only its presence is exposed.
#[derive(Debug, Serialize, ToSchema)]
pub struct PaymentMethodView {
    pub id: Uuid,
    pub kind: String,
    pub provider: Option<String>,
    pub is_default: bool,
    pub has_external_token: bool,
    pub created_at: DateTime<Utc>,
}

impl From<PaymentMethod> for PaymentMethodView {
    fn from(method: PaymentMethod) -> Self {
        Self {
            id: method.id,
            kind: method.kind,
            provider: method.provider,
            is_default: method.is_default,
            has_external_token: method.external_token.is_some(),
            created_at: method.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct UserView {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub account_id: Option<Uuid>,
    pub vehicles: Vec<VehicleView>,
    pub payment_methods: Vec<PaymentMethodView>,
    pub created_at: DateTime<Utc>,
}

impl From<User> for UserView {
    fn from(user: User) -> Self {
        Self {
            id: user.id,
            name: user.name,
            email: user.email,
            account_id: user.account_id,
            vehicles: user.vehicles.into_iter().map(Into::into).collect(),
            payment_methods: user.payment_methods.into_iter().map(Into::into).collect(),
            created_at: user.created_at,
        }
    }
}

/// Owner and vehicle pair for plate lookups
#[derive(Debug, Serialize, ToSchema)]
pub struct VehicleOwnerView {
    pub owner: UserView,
    pub vehicle: VehicleView,
}
