//! Parking session DTOs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::domain::ParkingSession;

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CheckInRequest {
    #[validate(length(min = 1, max = 12, message = "plate number must be 1-12 characters"))]
    pub plate_number: String,
    #[validate(length(max = 30, message = "vehicle type is too long"))]
    pub vehicle_type: Option<String>,
    /// Specific slot to park in; omitted picks any available slot
    pub slot_id: Option<Uuid>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FeeView {
    #[schema(value_type = String)]
    pub amount: Decimal,
    pub currency: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SessionView {
    pub id: Uuid,
    pub plate_number: String,
    pub vehicle_type: Option<String>,
    pub status: String,
    pub checked_in_at: DateTime<Utc>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub duration_minutes: Option<i64>,
    pub final_fee: Option<FeeView>,
    pub owner_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub slot_id: Option<Uuid>,
}

impl From<ParkingSession> for SessionView {
    fn from(session: ParkingSession) -> Self {
        Self {
            id: session.id,
            plate_number: session.plate.code,
            vehicle_type: session.plate.vehicle_type,
            status: session.status.as_str().to_string(),
            checked_in_at: session.checked_in_at,
            checked_out_at: session.checked_out_at,
            duration_minutes: session.duration.map(|d| d.total_minutes),
            final_fee: session.final_fee.map(|f| FeeView {
                amount: f.amount,
                currency: f.currency,
            }),
            owner_id: session.owner_id,
            vehicle_id: session.vehicle_id,
            slot_id: session.slot_id,
        }
    }
}
