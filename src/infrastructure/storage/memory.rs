//! In-memory storage implementation

use async_trait::async_trait;
use dashmap::DashMap;
use uuid::Uuid;

use super::Storage;
use crate::domain::{
    Account, DomainError, DomainResult, ParkingSession, ParkingSlot, SessionStatus, SlotCounts,
    SlotStatus, User, Vehicle,
};

/// In-memory storage backed by concurrent maps.
///
/// Slot reserve/release run under the per-entry lock of the slot map, so
/// two concurrent check-ins cannot both claim the same slot.
pub struct InMemoryStorage {
    slots: DashMap<Uuid, ParkingSlot>,
    sessions: DashMap<Uuid, ParkingSession>,
    users: DashMap<Uuid, User>,
    accounts: DashMap<Uuid, Account>,
    username_index: DashMap<String, Uuid>,
}

impl InMemoryStorage {
    pub fn new() -> Self {
        Self {
            slots: DashMap::new(),
            sessions: DashMap::new(),
            users: DashMap::new(),
            accounts: DashMap::new(),
            username_index: DashMap::new(),
        }
    }
}

impl Default for InMemoryStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Storage for InMemoryStorage {
    async fn save_slot(&self, slot: ParkingSlot) -> DomainResult<()> {
        self.slots.insert(slot.id, slot);
        Ok(())
    }

    async fn get_slot(&self, id: Uuid) -> DomainResult<Option<ParkingSlot>> {
        Ok(self.slots.get(&id).map(|s| s.clone()))
    }

    async fn update_slot(&self, slot: ParkingSlot) -> DomainResult<()> {
        if !self.slots.contains_key(&slot.id) {
            return Err(DomainError::not_found("slot", slot.id));
        }
        self.slots.insert(slot.id, slot);
        Ok(())
    }

    async fn delete_slot(&self, id: Uuid) -> DomainResult<()> {
        self.slots
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("slot", id))?;
        Ok(())
    }

    async fn list_slots(&self) -> DomainResult<Vec<ParkingSlot>> {
        Ok(self.slots.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_slots_by_floor(&self, floor: i32) -> DomainResult<Vec<ParkingSlot>> {
        Ok(self
            .slots
            .iter()
            .filter(|s| s.position.floor == floor)
            .map(|s| s.clone())
            .collect())
    }

    async fn list_slots_by_status(&self, status: SlotStatus) -> DomainResult<Vec<ParkingSlot>> {
        Ok(self
            .slots
            .iter()
            .filter(|s| s.status() == status)
            .map(|s| s.clone())
            .collect())
    }

    async fn slot_counts(&self) -> DomainResult<SlotCounts> {
        let mut counts = SlotCounts::default();
        for slot in self.slots.iter() {
            counts.total += 1;
            match slot.status() {
                SlotStatus::Available => counts.available += 1,
                SlotStatus::Occupied => counts.occupied += 1,
                SlotStatus::Broken => counts.broken += 1,
            }
        }
        Ok(counts)
    }

    async fn reserve_slot(&self, id: Uuid) -> DomainResult<ParkingSlot> {
        // get_mut holds the shard lock for the whole check-and-flip
        let mut slot = self
            .slots
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("slot", id))?;
        if !slot.is_available() {
            return Err(DomainError::InvalidState(format!(
                "slot {} is not available",
                id
            )));
        }
        slot.mark_occupied()?;
        Ok(slot.clone())
    }

    async fn release_slot(&self, id: Uuid) -> DomainResult<ParkingSlot> {
        let mut slot = self
            .slots
            .get_mut(&id)
            .ok_or_else(|| DomainError::not_found("slot", id))?;
        slot.mark_available();
        Ok(slot.clone())
    }

    async fn save_session(&self, session: ParkingSession) -> DomainResult<()> {
        self.sessions.insert(session.id, session);
        Ok(())
    }

    async fn get_session(&self, id: Uuid) -> DomainResult<Option<ParkingSession>> {
        Ok(self.sessions.get(&id).map(|s| s.clone()))
    }

    async fn update_session(&self, session: ParkingSession) -> DomainResult<()> {
        if !self.sessions.contains_key(&session.id) {
            return Err(DomainError::not_found("session", session.id));
        }
        self.sessions.insert(session.id, session);
        Ok(())
    }

    async fn list_sessions(&self) -> DomainResult<Vec<ParkingSession>> {
        Ok(self.sessions.iter().map(|e| e.value().clone()).collect())
    }

    async fn list_sessions_by_status(
        &self,
        status: SessionStatus,
    ) -> DomainResult<Vec<ParkingSession>> {
        Ok(self
            .sessions
            .iter()
            .filter(|s| s.status == status)
            .map(|s| s.clone())
            .collect())
    }

    async fn find_active_session_for_plate(
        &self,
        plate_code: &str,
    ) -> DomainResult<Option<ParkingSession>> {
        Ok(self
            .sessions
            .iter()
            .find(|s| s.status == SessionStatus::Active && s.plate.code == plate_code)
            .map(|s| s.clone()))
    }

    async fn save_user(&self, user: User) -> DomainResult<()> {
        self.users.insert(user.id, user);
        Ok(())
    }

    async fn get_user(&self, id: Uuid) -> DomainResult<Option<User>> {
        Ok(self.users.get(&id).map(|u| u.clone()))
    }

    async fn update_user(&self, user: User) -> DomainResult<()> {
        if !self.users.contains_key(&user.id) {
            return Err(DomainError::not_found("user", user.id));
        }
        self.users.insert(user.id, user);
        Ok(())
    }

    async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        self.users
            .remove(&id)
            .ok_or_else(|| DomainError::not_found("user", id))?;
        Ok(())
    }

    async fn list_users(&self) -> DomainResult<Vec<User>> {
        Ok(self.users.iter().map(|e| e.value().clone()).collect())
    }

    async fn find_user_by_vehicle_plate(
        &self,
        plate_code: &str,
    ) -> DomainResult<Option<(User, Vehicle)>> {
        for user in self.users.iter() {
            if let Some(vehicle) = user.find_vehicle_by_plate(plate_code) {
                return Ok(Some((user.clone(), vehicle.clone())));
            }
        }
        Ok(None)
    }

    async fn get_user_by_account(&self, account_id: Uuid) -> DomainResult<Option<User>> {
        Ok(self
            .users
            .iter()
            .find(|u| u.account_id == Some(account_id))
            .map(|u| u.clone()))
    }

    async fn save_account(&self, account: Account) -> DomainResult<()> {
        let username = account.credentials.username.clone();
        if self.username_index.contains_key(&username) {
            return Err(DomainError::Conflict(format!(
                "username {} is already taken",
                username
            )));
        }
        self.username_index.insert(username, account.id);
        self.accounts.insert(account.id, account);
        Ok(())
    }

    async fn get_account(&self, id: Uuid) -> DomainResult<Option<Account>> {
        Ok(self.accounts.get(&id).map(|a| a.clone()))
    }

    async fn get_account_by_username(&self, username: &str) -> DomainResult<Option<Account>> {
        let Some(id) = self.username_index.get(username).map(|e| *e.value()) else {
            return Ok(None);
        };
        Ok(self.accounts.get(&id).map(|a| a.clone()))
    }

    async fn update_account(&self, account: Account) -> DomainResult<()> {
        if !self.accounts.contains_key(&account.id) {
            return Err(DomainError::not_found("account", account.id));
        }
        self.accounts.insert(account.id, account);
        Ok(())
    }

    async fn username_exists(&self, username: &str) -> DomainResult<bool> {
        Ok(self.username_index.contains_key(username))
    }

    async fn list_accounts(&self) -> DomainResult<Vec<Account>> {
        Ok(self.accounts.iter().map(|e| e.value().clone()).collect())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{PlateNumber, Role};

    async fn seeded_slot(storage: &InMemoryStorage) -> Uuid {
        let slot = ParkingSlot::create(1, 0.0, 0.0, 1, None, None).unwrap();
        let id = slot.id;
        storage.save_slot(slot).await.unwrap();
        id
    }

    #[tokio::test]
    async fn reserve_claims_available_slot() {
        let storage = InMemoryStorage::new();
        let id = seeded_slot(&storage).await;

        let slot = storage.reserve_slot(id).await.unwrap();
        assert_eq!(slot.status(), SlotStatus::Occupied);

        // Second reserve sees the occupied status
        assert!(matches!(
            storage.reserve_slot(id).await,
            Err(DomainError::InvalidState(_))
        ));
    }

    #[tokio::test]
    async fn release_returns_slot_to_pool() {
        let storage = InMemoryStorage::new();
        let id = seeded_slot(&storage).await;

        storage.reserve_slot(id).await.unwrap();
        let slot = storage.release_slot(id).await.unwrap();
        assert_eq!(slot.status(), SlotStatus::Available);
        assert!(storage.reserve_slot(id).await.is_ok());
    }

    #[tokio::test]
    async fn reserve_refuses_broken_slot() {
        let storage = InMemoryStorage::new();
        let id = seeded_slot(&storage).await;

        let mut slot = storage.get_slot(id).await.unwrap().unwrap();
        slot.mark_broken();
        storage.update_slot(slot).await.unwrap();

        assert!(storage.reserve_slot(id).await.is_err());
    }

    #[tokio::test]
    async fn slot_counts_by_status() {
        let storage = InMemoryStorage::new();
        let a = seeded_slot(&storage).await;
        seeded_slot(&storage).await;
        let c = seeded_slot(&storage).await;

        storage.reserve_slot(a).await.unwrap();
        let mut slot = storage.get_slot(c).await.unwrap().unwrap();
        slot.mark_broken();
        storage.update_slot(slot).await.unwrap();

        let counts = storage.slot_counts().await.unwrap();
        assert_eq!(counts.total, 3);
        assert_eq!(counts.available, 1);
        assert_eq!(counts.occupied, 1);
        assert_eq!(counts.broken, 1);
    }

    #[tokio::test]
    async fn duplicate_username_is_refused() {
        let storage = InMemoryStorage::new();
        let first = Account::create("budi", "hash", Role::User, None).unwrap();
        let second = Account::create("budi", "hash", Role::User, None).unwrap();

        storage.save_account(first).await.unwrap();
        assert!(matches!(
            storage.save_account(second).await,
            Err(DomainError::Conflict(_))
        ));
        assert!(storage.username_exists("budi").await.unwrap());
    }

    #[tokio::test]
    async fn account_lookup_by_username() {
        let storage = InMemoryStorage::new();
        let account = Account::create("siti", "hash", Role::Staff, None).unwrap();
        let id = account.id;
        storage.save_account(account).await.unwrap();

        let found = storage.get_account_by_username("siti").await.unwrap();
        assert_eq!(found.map(|a| a.id), Some(id));
        assert!(storage
            .get_account_by_username("nobody")
            .await
            .unwrap()
            .is_none());
    }

    #[tokio::test]
    async fn active_session_lookup_by_plate() {
        let storage = InMemoryStorage::new();
        let plate = PlateNumber::new("B1234XYZ", None).unwrap();
        let mut session = ParkingSession::new(plate.clone(), None, None, None);
        session.cancel().unwrap();
        storage.save_session(session).await.unwrap();

        // Cancelled session is not "active"
        assert!(storage
            .find_active_session_for_plate("B1234XYZ")
            .await
            .unwrap()
            .is_none());

        let active = ParkingSession::new(plate, None, None, None);
        let active_id = active.id;
        storage.save_session(active).await.unwrap();

        let found = storage
            .find_active_session_for_plate("B1234XYZ")
            .await
            .unwrap();
        assert_eq!(found.map(|s| s.id), Some(active_id));
    }

    #[tokio::test]
    async fn vehicle_plate_lookup_across_users() {
        let storage = InMemoryStorage::new();
        let mut user = User::create("Budi", None, None).unwrap();
        user.add_vehicle(PlateNumber::new("D5678AB", None).unwrap())
            .unwrap();
        let user_id = user.id;
        storage.save_user(user).await.unwrap();

        let found = storage.find_user_by_vehicle_plate("D5678AB").await.unwrap();
        let (owner, vehicle) = found.unwrap();
        assert_eq!(owner.id, user_id);
        assert_eq!(vehicle.plate.code, "D5678AB");

        assert!(storage
            .find_user_by_vehicle_plate("Z0000ZZ")
            .await
            .unwrap()
            .is_none());
    }
}
