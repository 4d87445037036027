//! Slot allocation service: inventory, sensors and occupancy statistics

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{
    DomainError, DomainResult, ParkingSlot, Sensor, SensorType, SlotCounts, SlotStatus,
};
use crate::infrastructure::storage::Storage;

/// Occupancy statistics over the whole inventory
#[derive(Debug, Clone, Copy)]
pub struct SlotStats {
    pub counts: SlotCounts,
    /// Occupied share in percent, rounded to two decimals; 0 for an
    /// empty inventory.
    pub occupancy_pct: f64,
}

/// Occupancy statistics for a single floor
#[derive(Debug, Clone, Copy)]
pub struct FloorOccupancy {
    pub floor: i32,
    pub counts: SlotCounts,
    pub occupancy_pct: f64,
}

fn occupancy_pct(counts: &SlotCounts) -> f64 {
    if counts.total == 0 {
        return 0.0;
    }
    let pct = counts.occupied as f64 / counts.total as f64 * 100.0;
    (pct * 100.0).round() / 100.0
}

/// Service for slot inventory operations
pub struct SlotService {
    storage: Arc<dyn Storage>,
}

impl SlotService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    pub async fn create_slot(
        &self,
        floor: i32,
        x: f64,
        y: f64,
        capacity: u32,
        sensor_type: Option<&str>,
        note: Option<String>,
    ) -> DomainResult<ParkingSlot> {
        let sensor = match sensor_type {
            Some(s) => Some(Sensor::new(SensorType::parse(s)?)),
            None => None,
        };
        let slot = ParkingSlot::create(floor, x, y, capacity, sensor, note)?;
        self.storage.save_slot(slot.clone()).await?;

        info!(slot_id = %slot.id, floor = slot.position.floor, "slot created");
        Ok(slot)
    }

    pub async fn get_slot(&self, id: Uuid) -> DomainResult<ParkingSlot> {
        self.storage
            .get_slot(id)
            .await?
            .ok_or_else(|| DomainError::not_found("slot", id))
    }

    pub async fn list_slots(&self) -> DomainResult<Vec<ParkingSlot>> {
        self.storage.list_slots().await
    }

    pub async fn list_slots_by_floor(&self, floor: i32) -> DomainResult<Vec<ParkingSlot>> {
        self.storage.list_slots_by_floor(floor).await
    }

    /// Inventory listing with optional floor and status filters
    pub async fn find_slots(
        &self,
        floor: Option<i32>,
        status: Option<SlotStatus>,
    ) -> DomainResult<Vec<ParkingSlot>> {
        let slots = match floor {
            Some(f) => self.storage.list_slots_by_floor(f).await?,
            None => self.storage.list_slots().await?,
        };
        Ok(match status {
            Some(wanted) => slots
                .into_iter()
                .filter(|slot| slot.status() == wanted)
                .collect(),
            None => slots,
        })
    }

    pub async fn list_available_slots(&self, floor: Option<i32>) -> DomainResult<Vec<ParkingSlot>> {
        match floor {
            Some(_) => self.find_slots(floor, Some(SlotStatus::Available)).await,
            None => self.storage.list_slots_by_status(SlotStatus::Available).await,
        }
    }

    pub async fn delete_slot(&self, id: Uuid) -> DomainResult<()> {
        self.storage.delete_slot(id).await?;
        info!(slot_id = %id, "slot deleted");
        Ok(())
    }

    /// Apply a manual status change. The broken-to-occupied guard lives in
    /// the domain transition and is enforced here too.
    pub async fn set_slot_status(&self, id: Uuid, status: &str) -> DomainResult<ParkingSlot> {
        let status = SlotStatus::parse(status)?;
        let mut slot = self.get_slot(id).await?;

        match status {
            SlotStatus::Available => slot.mark_available(),
            SlotStatus::Occupied => slot.mark_occupied()?,
            SlotStatus::Broken => slot.mark_broken(),
        }
        self.storage.update_slot(slot.clone()).await?;

        info!(slot_id = %id, status = %status, "slot status changed");
        Ok(slot)
    }

    /// Attach a sensor to a slot, replacing any existing one
    pub async fn attach_sensor(&self, slot_id: Uuid, sensor_type: &str) -> DomainResult<ParkingSlot> {
        let sensor = Sensor::new(SensorType::parse(sensor_type)?);
        let mut slot = self.get_slot(slot_id).await?;
        slot.attach_sensor(sensor);
        self.storage.update_slot(slot.clone()).await?;

        info!(slot_id = %slot_id, "sensor attached");
        Ok(slot)
    }

    pub async fn detach_sensor(&self, slot_id: Uuid) -> DomainResult<ParkingSlot> {
        let mut slot = self.get_slot(slot_id).await?;
        if slot.sensor.is_none() {
            return Err(DomainError::not_found("sensor", slot_id));
        }
        slot.detach_sensor();
        self.storage.update_slot(slot.clone()).await?;

        info!(slot_id = %slot_id, "sensor detached");
        Ok(slot)
    }

    /// Update the condition report of a slot's sensor, optionally toggling
    /// the active flag.
    pub async fn update_sensor_condition(
        &self,
        slot_id: Uuid,
        condition: &str,
        is_active: Option<bool>,
    ) -> DomainResult<ParkingSlot> {
        let mut slot = self.get_slot(slot_id).await?;
        let sensor = slot
            .sensor
            .as_mut()
            .ok_or_else(|| DomainError::not_found("sensor", slot_id))?;

        sensor.update_condition(condition);
        match is_active {
            Some(true) => sensor.activate(),
            Some(false) => sensor.deactivate(),
            None => {}
        }
        self.storage.update_slot(slot.clone()).await?;

        info!(slot_id = %slot_id, condition = condition, "sensor condition updated");
        Ok(slot)
    }

    pub async fn stats(&self) -> DomainResult<SlotStats> {
        let counts = self.storage.slot_counts().await?;
        Ok(SlotStats {
            counts,
            occupancy_pct: occupancy_pct(&counts),
        })
    }

    /// Per-floor occupancy, sorted by floor number
    pub async fn floor_stats(&self) -> DomainResult<Vec<FloorOccupancy>> {
        let slots = self.storage.list_slots().await?;
        let mut floors: std::collections::BTreeMap<i32, SlotCounts> =
            std::collections::BTreeMap::new();

        for slot in &slots {
            let counts = floors.entry(slot.position.floor).or_default();
            counts.total += 1;
            match slot.status() {
                SlotStatus::Available => counts.available += 1,
                SlotStatus::Occupied => counts.occupied += 1,
                SlotStatus::Broken => counts.broken += 1,
            }
        }

        Ok(floors
            .into_iter()
            .map(|(floor, counts)| FloorOccupancy {
                floor,
                counts,
                occupancy_pct: occupancy_pct(&counts),
            })
            .collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;

    fn service() -> SlotService {
        SlotService::new(Arc::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn create_and_fetch_slot() {
        let service = service();
        let slot = service
            .create_slot(2, 1.0, 3.0, 1, Some("camera"), None)
            .await
            .unwrap();

        let fetched = service.get_slot(slot.id).await.unwrap();
        assert_eq!(fetched.position.floor, 2);
        assert_eq!(
            fetched.sensor.unwrap().sensor_type,
            SensorType::Camera
        );
    }

    #[tokio::test]
    async fn create_slot_rejects_unknown_sensor_type() {
        let service = service();
        assert!(matches!(
            service.create_slot(1, 0.0, 0.0, 1, Some("radar"), None).await,
            Err(DomainError::Validation(_))
        ));
    }

    #[tokio::test]
    async fn status_change_guards_broken_slot() {
        let service = service();
        let slot = service.create_slot(1, 0.0, 0.0, 1, None, None).await.unwrap();

        service.set_slot_status(slot.id, "BROKEN").await.unwrap();
        assert!(matches!(
            service.set_slot_status(slot.id, "OCCUPIED").await,
            Err(DomainError::InvalidState(_))
        ));

        // Repair first, then occupy
        service.set_slot_status(slot.id, "AVAILABLE").await.unwrap();
        let slot = service.set_slot_status(slot.id, "occupied").await.unwrap();
        assert_eq!(slot.status(), SlotStatus::Occupied);
    }

    #[tokio::test]
    async fn sensor_condition_requires_a_sensor() {
        let service = service();
        let slot = service.create_slot(1, 0.0, 0.0, 1, None, None).await.unwrap();

        assert!(matches!(
            service
                .update_sensor_condition(slot.id, "Error", None)
                .await,
            Err(DomainError::NotFound { .. })
        ));

        service.attach_sensor(slot.id, "ultrasonic").await.unwrap();
        let slot = service
            .update_sensor_condition(slot.id, "Error", Some(false))
            .await
            .unwrap();

        let sensor = slot.sensor.unwrap();
        assert_eq!(sensor.condition, "Error");
        assert!(!sensor.is_active);
    }

    #[tokio::test]
    async fn stats_on_empty_inventory() {
        let stats = service().stats().await.unwrap();
        assert_eq!(stats.counts.total, 0);
        assert_eq!(stats.occupancy_pct, 0.0);
    }

    #[tokio::test]
    async fn occupancy_is_rounded_to_two_decimals() {
        let service = service();
        let first = service.create_slot(1, 0.0, 0.0, 1, None, None).await.unwrap();
        service.create_slot(1, 1.0, 0.0, 1, None, None).await.unwrap();
        service.create_slot(1, 2.0, 0.0, 1, None, None).await.unwrap();

        // 1 occupied of 3 total -> 33.33
        service.set_slot_status(first.id, "OCCUPIED").await.unwrap();

        let stats = service.stats().await.unwrap();
        assert_eq!(stats.counts.total, 3);
        assert_eq!(stats.occupancy_pct, 33.33);
    }

    #[tokio::test]
    async fn floor_stats_are_grouped_and_sorted() {
        let service = service();
        service.create_slot(2, 0.0, 0.0, 1, None, None).await.unwrap();
        let ground = service.create_slot(0, 0.0, 0.0, 1, None, None).await.unwrap();
        service.create_slot(0, 1.0, 0.0, 1, None, None).await.unwrap();
        service.set_slot_status(ground.id, "OCCUPIED").await.unwrap();

        let floors = service.floor_stats().await.unwrap();
        assert_eq!(floors.len(), 2);
        assert_eq!(floors[0].floor, 0);
        assert_eq!(floors[0].counts.total, 2);
        assert_eq!(floors[0].occupancy_pct, 50.0);
        assert_eq!(floors[1].floor, 2);
        assert_eq!(floors[1].occupancy_pct, 0.0);
    }

    #[tokio::test]
    async fn available_listing_excludes_occupied_and_broken() {
        let service = service();
        let a = service.create_slot(1, 0.0, 0.0, 1, None, None).await.unwrap();
        let b = service.create_slot(1, 1.0, 0.0, 1, None, None).await.unwrap();
        service.create_slot(1, 2.0, 0.0, 1, None, None).await.unwrap();

        service.set_slot_status(a.id, "OCCUPIED").await.unwrap();
        service.set_slot_status(b.id, "BROKEN").await.unwrap();

        let available = service.list_available_slots(None).await.unwrap();
        assert_eq!(available.len(), 1);
    }

    #[tokio::test]
    async fn find_slots_applies_floor_and_status_filters() {
        let service = service();
        let upstairs = service.create_slot(1, 0.0, 0.0, 1, None, None).await.unwrap();
        service.create_slot(1, 1.0, 0.0, 1, None, None).await.unwrap();
        service.create_slot(2, 0.0, 0.0, 1, None, None).await.unwrap();
        service.set_slot_status(upstairs.id, "OCCUPIED").await.unwrap();

        let floor_one = service.find_slots(Some(1), None).await.unwrap();
        assert_eq!(floor_one.len(), 2);

        let occupied_on_one = service
            .find_slots(Some(1), Some(SlotStatus::Occupied))
            .await
            .unwrap();
        assert_eq!(occupied_on_one.len(), 1);
        assert_eq!(occupied_on_one[0].id, upstairs.id);

        let available_on_two = service.list_available_slots(Some(2)).await.unwrap();
        assert_eq!(available_on_two.len(), 1);
    }
}
