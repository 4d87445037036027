//! Parking slot domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{DomainError, DomainResult};

/// Occupancy-detection device type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorType {
    Camera,
    Ultrasonic,
    Infrared,
}

impl SensorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Camera => "CAMERA",
            Self::Ultrasonic => "ULTRASONIC",
            Self::Infrared => "INFRARED",
        }
    }

    /// Case-insensitive parse; unknown strings are a validation error.
    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "CAMERA" => Ok(Self::Camera),
            "ULTRASONIC" => Ok(Self::Ultrasonic),
            "INFRARED" => Ok(Self::Infrared),
            _ => Err(DomainError::Validation(format!(
                "unknown sensor type: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for SensorType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Slot availability status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SlotStatus {
    Available,
    Occupied,
    Broken,
}

impl SlotStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "AVAILABLE",
            Self::Occupied => "OCCUPIED",
            Self::Broken => "BROKEN",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "AVAILABLE" => Ok(Self::Available),
            "OCCUPIED" => Ok(Self::Occupied),
            "BROKEN" => Ok(Self::Broken),
            _ => Err(DomainError::Validation(format!("unknown status: {}", s))),
        }
    }
}

impl std::fmt::Display for SlotStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Physical location of a slot in the structure
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    pub floor: i32,
    pub x: f64,
    pub y: f64,
}

impl Position {
    pub fn new(floor: i32, x: f64, y: f64) -> DomainResult<Self> {
        if floor < 0 {
            return Err(DomainError::Validation(
                "floor must not be negative".to_string(),
            ));
        }
        Ok(Self { floor, x, y })
    }
}

/// Availability status together with the moment it last changed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Availability {
    pub status: SlotStatus,
    pub updated_at: DateTime<Utc>,
}

impl Availability {
    pub fn available() -> Self {
        Self {
            status: SlotStatus::Available,
            updated_at: Utc::now(),
        }
    }

    pub fn occupied() -> Self {
        Self {
            status: SlotStatus::Occupied,
            updated_at: Utc::now(),
        }
    }

    pub fn broken() -> Self {
        Self {
            status: SlotStatus::Broken,
            updated_at: Utc::now(),
        }
    }
}

/// Sensor attached to a slot (at most one per slot)
#[derive(Debug, Clone)]
pub struct Sensor {
    pub id: Uuid,
    pub sensor_type: SensorType,
    pub condition: String,
    pub is_active: bool,
    pub created_at: DateTime<Utc>,
}

impl Sensor {
    pub fn new(sensor_type: SensorType) -> Self {
        Self {
            id: Uuid::new_v4(),
            sensor_type,
            condition: "Normal".to_string(),
            is_active: true,
            created_at: Utc::now(),
        }
    }

    pub fn update_condition(&mut self, condition: impl Into<String>) {
        self.condition = condition.into();
    }

    pub fn activate(&mut self) {
        self.is_active = true;
    }

    pub fn deactivate(&mut self) {
        self.is_active = false;
    }
}

/// Per-status counts over the slot inventory
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SlotCounts {
    pub total: u64,
    pub available: u64,
    pub occupied: u64,
    pub broken: u64,
}

/// A single physical parking space
#[derive(Debug, Clone)]
pub struct ParkingSlot {
    pub id: Uuid,
    pub capacity: u32,
    pub position: Position,
    pub availability: Availability,
    pub sensor: Option<Sensor>,
    pub note: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ParkingSlot {
    pub fn create(
        floor: i32,
        x: f64,
        y: f64,
        capacity: u32,
        sensor: Option<Sensor>,
        note: Option<String>,
    ) -> DomainResult<Self> {
        let position = Position::new(floor, x, y)?;
        let now = Utc::now();
        Ok(Self {
            id: Uuid::new_v4(),
            capacity,
            position,
            availability: Availability::available(),
            sensor,
            note,
            created_at: now,
            updated_at: now,
        })
    }

    pub fn status(&self) -> SlotStatus {
        self.availability.status
    }

    pub fn is_available(&self) -> bool {
        self.availability.status == SlotStatus::Available
    }

    pub fn mark_available(&mut self) {
        self.availability = Availability::available();
        self.updated_at = Utc::now();
    }

    /// A broken slot cannot be occupied; it must be repaired
    /// (marked available) first.
    pub fn mark_occupied(&mut self) -> DomainResult<()> {
        if self.availability.status == SlotStatus::Broken {
            return Err(DomainError::InvalidState(
                "a broken slot cannot be occupied".to_string(),
            ));
        }
        self.availability = Availability::occupied();
        self.updated_at = Utc::now();
        Ok(())
    }

    pub fn mark_broken(&mut self) {
        self.availability = Availability::broken();
        self.updated_at = Utc::now();
    }

    /// Attach a sensor, replacing any existing one.
    pub fn attach_sensor(&mut self, sensor: Sensor) {
        self.sensor = Some(sensor);
        self.updated_at = Utc::now();
    }

    pub fn detach_sensor(&mut self) {
        self.sensor = None;
        self.updated_at = Utc::now();
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_slot() -> ParkingSlot {
        ParkingSlot::create(1, 10.5, 20.3, 1, None, None).unwrap()
    }

    #[test]
    fn new_slot_is_available() {
        let slot = sample_slot();
        assert!(slot.is_available());
        assert_eq!(slot.status(), SlotStatus::Available);
        assert_eq!(slot.position.floor, 1);
        assert!(slot.sensor.is_none());
    }

    #[test]
    fn negative_floor_is_rejected() {
        assert!(matches!(
            ParkingSlot::create(-1, 0.0, 0.0, 1, None, None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn ground_floor_is_valid() {
        assert!(ParkingSlot::create(0, 0.0, 0.0, 1, None, None).is_ok());
    }

    #[test]
    fn occupy_and_free() {
        let mut slot = sample_slot();
        slot.mark_occupied().unwrap();
        assert_eq!(slot.status(), SlotStatus::Occupied);
        slot.mark_available();
        assert!(slot.is_available());
    }

    #[test]
    fn broken_slot_cannot_be_occupied() {
        let mut slot = sample_slot();
        slot.mark_broken();
        assert!(matches!(
            slot.mark_occupied(),
            Err(DomainError::InvalidState(_))
        ));
        assert_eq!(slot.status(), SlotStatus::Broken);
    }

    #[test]
    fn repaired_slot_can_be_occupied_again() {
        let mut slot = sample_slot();
        slot.mark_broken();
        slot.mark_available();
        assert!(slot.mark_occupied().is_ok());
    }

    #[test]
    fn attach_replaces_existing_sensor() {
        let mut slot = sample_slot();
        let first = Sensor::new(SensorType::Camera);
        let first_id = first.id;
        slot.attach_sensor(first);
        slot.attach_sensor(Sensor::new(SensorType::Ultrasonic));

        let sensor = slot.sensor.as_ref().unwrap();
        assert_ne!(sensor.id, first_id);
        assert_eq!(sensor.sensor_type, SensorType::Ultrasonic);
    }

    #[test]
    fn detach_clears_sensor() {
        let mut slot = sample_slot();
        slot.attach_sensor(Sensor::new(SensorType::Infrared));
        slot.detach_sensor();
        assert!(slot.sensor.is_none());
    }

    #[test]
    fn new_sensor_defaults() {
        let sensor = Sensor::new(SensorType::Camera);
        assert_eq!(sensor.condition, "Normal");
        assert!(sensor.is_active);
    }

    #[test]
    fn sensor_type_parse_is_case_insensitive() {
        assert_eq!(SensorType::parse("camera").unwrap(), SensorType::Camera);
        assert_eq!(
            SensorType::parse("ULTRASONIC").unwrap(),
            SensorType::Ultrasonic
        );
        assert!(SensorType::parse("radar").is_err());
    }

    #[test]
    fn slot_status_roundtrip() {
        for status in [SlotStatus::Available, SlotStatus::Occupied, SlotStatus::Broken] {
            assert_eq!(SlotStatus::parse(status.as_str()).unwrap(), status);
        }
        assert!(SlotStatus::parse("FULL").is_err());
    }
}
