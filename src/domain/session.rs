//! Parking session domain entity

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{DomainError, DomainResult};
use super::tariff::ParkingTariff;
use super::value_objects::{Duration, FinalFee, PlateNumber};

/// Session status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionStatus {
    /// Vehicle is currently parked
    Active,
    /// Checked out; duration and fee are final
    Completed,
    /// Aborted before check-out; no fee
    Cancelled,
}

impl SessionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Active => "ACTIVE",
            Self::Completed => "COMPLETED",
            Self::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> DomainResult<Self> {
        match s.to_ascii_uppercase().as_str() {
            "ACTIVE" => Ok(Self::Active),
            "COMPLETED" => Ok(Self::Completed),
            "CANCELLED" => Ok(Self::Cancelled),
            _ => Err(DomainError::Validation(format!(
                "unknown session status: {}",
                s
            ))),
        }
    }
}

impl std::fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One vehicle's occupancy of the lot from check-in to check-out.
///
/// The owner/vehicle/slot ids are back-references into other stores, not
/// ownership; the session stays valid if those records disappear.
#[derive(Debug, Clone)]
pub struct ParkingSession {
    pub id: Uuid,
    pub plate: PlateNumber,
    pub checked_in_at: DateTime<Utc>,
    pub checked_out_at: Option<DateTime<Utc>>,
    pub status: SessionStatus,
    pub duration: Option<Duration>,
    pub final_fee: Option<FinalFee>,
    pub owner_id: Option<Uuid>,
    pub vehicle_id: Option<Uuid>,
    pub slot_id: Option<Uuid>,
}

impl ParkingSession {
    pub fn new(
        plate: PlateNumber,
        owner_id: Option<Uuid>,
        vehicle_id: Option<Uuid>,
        slot_id: Option<Uuid>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            plate,
            checked_in_at: Utc::now(),
            checked_out_at: None,
            status: SessionStatus::Active,
            duration: None,
            final_fee: None,
            owner_id,
            vehicle_id,
            slot_id,
        }
    }

    pub fn is_active(&self) -> bool {
        self.status == SessionStatus::Active
    }

    /// Close the session: stamp check-out time, compute duration and fee.
    ///
    /// Valid only from `Active`; a completed session's fee and duration are
    /// immutable afterwards.
    pub fn check_out(&mut self, tariff: &ParkingTariff) -> DomainResult<()> {
        if self.status != SessionStatus::Active {
            return Err(DomainError::InvalidState(
                "session is already completed or cancelled".to_string(),
            ));
        }
        let now = Utc::now();
        self.duration = Some(Duration::between(self.checked_in_at, now)?);
        self.final_fee = Some(tariff.calculate(self.checked_in_at, now));
        self.checked_out_at = Some(now);
        self.status = SessionStatus::Completed;
        Ok(())
    }

    /// Abort an active session without billing.
    pub fn cancel(&mut self) -> DomainResult<()> {
        if self.status != SessionStatus::Active {
            return Err(DomainError::InvalidState(
                "only an active session can be cancelled".to_string(),
            ));
        }
        self.checked_out_at = Some(Utc::now());
        self.status = SessionStatus::Cancelled;
        Ok(())
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DEFAULT_CURRENCY;
    use rust_decimal::Decimal;

    fn sample_session() -> ParkingSession {
        let plate = PlateNumber::new("B1234XYZ", Some("MOBIL".into())).unwrap();
        ParkingSession::new(plate, None, None, None)
    }

    fn sample_tariff() -> ParkingTariff {
        ParkingTariff::new(Decimal::from(5000), None, DEFAULT_CURRENCY).unwrap()
    }

    #[test]
    fn new_session_is_active() {
        let session = sample_session();
        assert!(session.is_active());
        assert!(session.checked_out_at.is_none());
        assert!(session.duration.is_none());
        assert!(session.final_fee.is_none());
    }

    #[test]
    fn check_out_completes_and_bills_minimum_hour() {
        let mut session = sample_session();
        session.check_out(&sample_tariff()).unwrap();

        assert_eq!(session.status, SessionStatus::Completed);
        assert!(session.checked_out_at.is_some());
        assert!(session.duration.is_some());
        assert_eq!(
            session.final_fee.as_ref().unwrap().amount,
            Decimal::from(5000)
        );
    }

    #[test]
    fn second_check_out_is_refused() {
        let mut session = sample_session();
        session.check_out(&sample_tariff()).unwrap();
        let fee = session.final_fee.clone();
        let duration = session.duration;

        assert!(matches!(
            session.check_out(&sample_tariff()),
            Err(DomainError::InvalidState(_))
        ));
        // First check-out's result is untouched
        assert_eq!(session.final_fee, fee);
        assert_eq!(session.duration, duration);
    }

    #[test]
    fn cancel_is_terminal() {
        let mut session = sample_session();
        session.cancel().unwrap();
        assert_eq!(session.status, SessionStatus::Cancelled);
        assert!(session.final_fee.is_none());

        assert!(session.check_out(&sample_tariff()).is_err());
        assert!(session.cancel().is_err());
    }

    #[test]
    fn check_out_on_cancelled_session_is_refused() {
        let mut session = sample_session();
        session.cancel().unwrap();
        assert!(matches!(
            session.check_out(&sample_tariff()),
            Err(DomainError::InvalidState(_))
        ));
    }

    #[test]
    fn session_status_display() {
        assert_eq!(SessionStatus::Active.to_string(), "ACTIVE");
        assert_eq!(SessionStatus::Completed.to_string(), "COMPLETED");
        assert_eq!(SessionStatus::Cancelled.to_string(), "CANCELLED");
    }
}
