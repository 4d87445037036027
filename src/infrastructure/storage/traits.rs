//! Storage trait definitions

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{
    Account, DomainResult, ParkingSession, ParkingSlot, SessionStatus, SlotCounts, SlotStatus,
    User, Vehicle,
};

/// Storage trait for persistence operations
#[async_trait]
pub trait Storage: Send + Sync {
    // Slot operations
    async fn save_slot(&self, slot: ParkingSlot) -> DomainResult<()>;
    async fn get_slot(&self, id: Uuid) -> DomainResult<Option<ParkingSlot>>;
    async fn update_slot(&self, slot: ParkingSlot) -> DomainResult<()>;
    async fn delete_slot(&self, id: Uuid) -> DomainResult<()>;
    async fn list_slots(&self) -> DomainResult<Vec<ParkingSlot>>;
    async fn list_slots_by_floor(&self, floor: i32) -> DomainResult<Vec<ParkingSlot>>;
    async fn list_slots_by_status(&self, status: SlotStatus) -> DomainResult<Vec<ParkingSlot>>;
    async fn slot_counts(&self) -> DomainResult<SlotCounts>;
    /// Atomically claim an available slot. Fails if the slot is occupied
    /// or broken; the status check and the flip happen under one lock.
    async fn reserve_slot(&self, id: Uuid) -> DomainResult<ParkingSlot>;
    /// Atomically return a slot to the available pool.
    async fn release_slot(&self, id: Uuid) -> DomainResult<ParkingSlot>;

    // Session operations
    async fn save_session(&self, session: ParkingSession) -> DomainResult<()>;
    async fn get_session(&self, id: Uuid) -> DomainResult<Option<ParkingSession>>;
    async fn update_session(&self, session: ParkingSession) -> DomainResult<()>;
    async fn list_sessions(&self) -> DomainResult<Vec<ParkingSession>>;
    async fn list_sessions_by_status(
        &self,
        status: SessionStatus,
    ) -> DomainResult<Vec<ParkingSession>>;
    async fn find_active_session_for_plate(
        &self,
        plate_code: &str,
    ) -> DomainResult<Option<ParkingSession>>;

    // User operations
    async fn save_user(&self, user: User) -> DomainResult<()>;
    async fn get_user(&self, id: Uuid) -> DomainResult<Option<User>>;
    async fn update_user(&self, user: User) -> DomainResult<()>;
    async fn delete_user(&self, id: Uuid) -> DomainResult<()>;
    async fn list_users(&self) -> DomainResult<Vec<User>>;
    async fn find_user_by_vehicle_plate(
        &self,
        plate_code: &str,
    ) -> DomainResult<Option<(User, Vehicle)>>;
    async fn get_user_by_account(&self, account_id: Uuid) -> DomainResult<Option<User>>;

    // Account operations
    async fn save_account(&self, account: Account) -> DomainResult<()>;
    async fn get_account(&self, id: Uuid) -> DomainResult<Option<Account>>;
    async fn get_account_by_username(&self, username: &str) -> DomainResult<Option<Account>>;
    async fn update_account(&self, account: Account) -> DomainResult<()>;
    async fn username_exists(&self, username: &str) -> DomainResult<bool>;
    async fn list_accounts(&self) -> DomainResult<Vec<Account>>;
}
