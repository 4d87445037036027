//! Slot DTOs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::application::{FloorOccupancy, SlotStats};
use crate::domain::{ParkingSlot, Sensor};

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct CreateSlotRequest {
    /// Floor number, 0 for ground level
    pub floor: i32,
    pub x: f64,
    pub y: f64,
    /// Vehicles the slot can hold; defaults to 1
    #[validate(range(min = 1, max = 10, message = "capacity must be 1-10"))]
    pub capacity: Option<u32>,
    /// CAMERA, ULTRASONIC or INFRARED
    pub sensor_type: Option<String>,
    #[validate(length(max = 200, message = "note is too long"))]
    pub note: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSlotStatusRequest {
    /// AVAILABLE, OCCUPIED or BROKEN
    #[validate(length(min = 1, message = "status is required"))]
    pub status: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct AttachSensorRequest {
    /// CAMERA, ULTRASONIC or INFRARED
    #[validate(length(min = 1, message = "sensor type is required"))]
    pub sensor_type: String,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct UpdateSensorConditionRequest {
    #[validate(length(min = 1, max = 100, message = "condition must be 1-100 characters"))]
    pub condition: String,
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SensorView {
    pub id: Uuid,
    pub sensor_type: String,
    pub condition: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl From<Sensor> for SensorView {
    fn from(sensor: Sensor) -> Self {
        Self {
            id: sensor.id,
            sensor_type: sensor.sensor_type.as_str().to_string(),
            condition: sensor.condition,
            is_active: sensor.is_active,
            created_at: sensor.created_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotView {
    pub id: Uuid,
    pub floor: i32,
    pub x: f64,
    pub y: f64,
    pub capacity: u32,
    pub status: String,
    pub status_updated_at: DateTime<Utc>,
    pub sensor: Option<SensorView>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ParkingSlot> for SlotView {
    fn from(slot: ParkingSlot) -> Self {
        Self {
            id: slot.id,
            floor: slot.position.floor,
            x: slot.position.x,
            y: slot.position.y,
            capacity: slot.capacity,
            status: slot.availability.status.as_str().to_string(),
            status_updated_at: slot.availability.updated_at,
            sensor: slot.sensor.map(Into::into),
            note: slot.note,
            created_at: slot.created_at,
            updated_at: slot.updated_at,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct SlotStatsView {
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
    pub broken: u64,
    /// Occupied share in percent, two decimals
    pub occupancy_pct: f64,
}

impl From<SlotStats> for SlotStatsView {
    fn from(stats: SlotStats) -> Self {
        Self {
            total: stats.counts.total,
            available: stats.counts.available,
            occupied: stats.counts.occupied,
            broken: stats.counts.broken,
            occupancy_pct: stats.occupancy_pct,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct FloorStatsView {
    pub floor: i32,
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
    pub broken: u64,
    pub occupancy_pct: f64,
}

impl From<FloorOccupancy> for FloorStatsView {
    fn from(stats: FloorOccupancy) -> Self {
        Self {
            floor: stats.floor,
            total: stats.counts.total,
            available: stats.counts.available,
            occupied: stats.counts.occupied,
            broken: stats.counts.broken,
            occupancy_pct: stats.occupancy_pct,
        }
    }
}
