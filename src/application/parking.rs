//! Parking service: check-in, check-out and session lifecycle

use std::sync::Arc;

use metrics::counter;
use tracing::{info, warn};
use uuid::Uuid;

use crate::domain::{
    DomainError, DomainResult, ParkingSession, ParkingSlot, ParkingTariff, PlateNumber,
    SessionStatus, SlotStatus,
};
use crate::infrastructure::storage::Storage;

/// Service coupling the session lifecycle to slot occupancy.
///
/// This is the only code path that flips slots between available and
/// occupied during normal operation; slot reservation goes through the
/// storage layer's atomic reserve/release so two concurrent check-ins
/// cannot share a slot.
pub struct ParkingService {
    storage: Arc<dyn Storage>,
    tariff: ParkingTariff,
}

impl ParkingService {
    pub fn new(storage: Arc<dyn Storage>, tariff: ParkingTariff) -> Self {
        Self { storage, tariff }
    }

    pub fn tariff(&self) -> &ParkingTariff {
        &self.tariff
    }

    /// Start a session for a plate, claiming a slot.
    ///
    /// A specific slot may be requested; otherwise the first available
    /// slot is taken. A plate with an active session cannot check in
    /// again.
    pub async fn check_in(
        &self,
        plate_code: &str,
        vehicle_type: Option<String>,
        slot_id: Option<Uuid>,
    ) -> DomainResult<ParkingSession> {
        let plate = PlateNumber::new(plate_code, vehicle_type)?;

        if let Some(existing) = self
            .storage
            .find_active_session_for_plate(&plate.code)
            .await?
        {
            return Err(DomainError::Conflict(format!(
                "plate {} already has an active session ({})",
                plate.code, existing.id
            )));
        }

        // Link the session to a registered owner when the plate is known
        let owner = self.storage.find_user_by_vehicle_plate(&plate.code).await?;
        let (owner_id, vehicle_id) = match &owner {
            Some((user, vehicle)) => (Some(user.id), Some(vehicle.id)),
            None => (None, None),
        };

        let slot = self.claim_slot(slot_id).await?;
        let session = ParkingSession::new(plate, owner_id, vehicle_id, Some(slot.id));

        if let Err(err) = self.storage.save_session(session.clone()).await {
            // Roll the slot back so a failed save does not leak occupancy
            if let Err(release_err) = self.storage.release_slot(slot.id).await {
                warn!(slot_id = %slot.id, error = %release_err, "slot release failed during check-in rollback");
            }
            return Err(err);
        }

        counter!("parking_checkins_total").increment(1);
        info!(session_id = %session.id, plate = %session.plate.code, slot_id = %slot.id, "vehicle checked in");
        Ok(session)
    }

    async fn claim_slot(&self, slot_id: Option<Uuid>) -> DomainResult<ParkingSlot> {
        match slot_id {
            Some(id) => self.storage.reserve_slot(id).await,
            None => {
                let candidates = self
                    .storage
                    .list_slots_by_status(SlotStatus::Available)
                    .await?;
                for candidate in candidates {
                    // Another check-in may win the race; move on to the next
                    match self.storage.reserve_slot(candidate.id).await {
                        Ok(slot) => return Ok(slot),
                        Err(DomainError::InvalidState(_)) | Err(DomainError::NotFound { .. }) => {
                            continue
                        }
                        Err(err) => return Err(err),
                    }
                }
                Err(DomainError::InvalidState(
                    "no available slot".to_string(),
                ))
            }
        }
    }

    /// Complete a session: bill it and free its slot.
    pub async fn check_out(&self, session_id: Uuid) -> DomainResult<ParkingSession> {
        let mut session = self.get_session(session_id).await?;
        session.check_out(&self.tariff)?;
        self.storage.update_session(session.clone()).await?;
        self.free_slot(&session).await;

        counter!("parking_checkouts_total").increment(1);
        info!(
            session_id = %session.id,
            plate = %session.plate.code,
            fee = %session.final_fee.as_ref().map(|f| f.to_string()).unwrap_or_default(),
            "vehicle checked out"
        );
        Ok(session)
    }

    /// Abort an active session without billing, freeing its slot.
    pub async fn cancel(&self, session_id: Uuid) -> DomainResult<ParkingSession> {
        let mut session = self.get_session(session_id).await?;
        session.cancel()?;
        self.storage.update_session(session.clone()).await?;
        self.free_slot(&session).await;

        info!(session_id = %session.id, plate = %session.plate.code, "session cancelled");
        Ok(session)
    }

    async fn free_slot(&self, session: &ParkingSession) {
        let Some(slot_id) = session.slot_id else {
            return;
        };
        // The slot may have been deleted or repaired in the meantime;
        // the session close stands either way.
        if let Err(err) = self.storage.release_slot(slot_id).await {
            warn!(session_id = %session.id, slot_id = %slot_id, error = %err, "slot release failed");
        }
    }

    pub async fn get_session(&self, session_id: Uuid) -> DomainResult<ParkingSession> {
        self.storage
            .get_session(session_id)
            .await?
            .ok_or_else(|| DomainError::not_found("session", session_id))
    }

    pub async fn list_sessions(
        &self,
        status: Option<SessionStatus>,
    ) -> DomainResult<Vec<ParkingSession>> {
        match status {
            Some(status) => self.storage.list_sessions_by_status(status).await,
            None => self.storage.list_sessions().await,
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────
