//! Shared value objects for the parking domain

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::{DomainError, DomainResult};

/// Default currency for all fees (single-currency design)
pub const DEFAULT_CURRENCY: &str = "IDR";

/// License plate identifying a vehicle within a session.
///
/// The value itself carries no uniqueness; the one-active-session-per-plate
/// rule is enforced at check-in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlateNumber {
    pub code: String,
    pub vehicle_type: Option<String>,
}

impl PlateNumber {
    pub fn new(code: impl Into<String>, vehicle_type: Option<String>) -> DomainResult<Self> {
        let code = code.into();
        if code.trim().is_empty() {
            return Err(DomainError::Validation(
                "plate code must not be empty".to_string(),
            ));
        }
        Ok(Self { code, vehicle_type })
    }
}

/// Elapsed parking time, kept in whole minutes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Duration {
    pub total_minutes: i64,
}

impl Duration {
    pub fn from_minutes(total_minutes: i64) -> Self {
        Self { total_minutes }
    }

    /// Elapsed time between two timestamps. Rejects negative intervals.
    pub fn between(checkin: DateTime<Utc>, checkout: DateTime<Utc>) -> DomainResult<Self> {
        if checkout < checkin {
            return Err(DomainError::Validation(
                "check-out time must not precede check-in time".to_string(),
            ));
        }
        let total_minutes = (checkout - checkin).num_seconds() / 60;
        Ok(Self { total_minutes })
    }

    /// Hours rounded up for billing, never less than 1.
    pub fn billable_hours(&self) -> i64 {
        let hours = (self.total_minutes + 59) / 60;
        hours.max(1)
    }
}

impl std::fmt::Display for Duration {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{}h {}m",
            self.total_minutes / 60,
            self.total_minutes % 60
        )
    }
}

/// Final fee for a completed session. Amount is never negative.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FinalFee {
    pub amount: Decimal,
    pub currency: String,
}

impl FinalFee {
    pub fn new(amount: Decimal, currency: impl Into<String>) -> DomainResult<Self> {
        if amount < Decimal::ZERO {
            return Err(DomainError::Validation(
                "fee amount must not be negative".to_string(),
            ));
        }
        Ok(Self {
            amount,
            currency: currency.into(),
        })
    }
}

impl std::fmt::Display for FinalFee {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.amount, self.currency)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn plate_number_holds_code_and_type() {
        let plate = PlateNumber::new("B1234XYZ", Some("MOBIL".into())).unwrap();
        assert_eq!(plate.code, "B1234XYZ");
        assert_eq!(plate.vehicle_type.as_deref(), Some("MOBIL"));
    }

    #[test]
    fn plate_number_without_type() {
        let plate = PlateNumber::new("B1234XYZ", None).unwrap();
        assert!(plate.vehicle_type.is_none());
    }

    #[test]
    fn empty_plate_code_is_rejected() {
        assert!(matches!(
            PlateNumber::new("  ", None),
            Err(DomainError::Validation(_))
        ));
    }

    #[test]
    fn duration_between_timestamps() {
        let checkin = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        let checkout = Utc.with_ymd_and_hms(2024, 1, 1, 12, 30, 0).unwrap();
        let d = Duration::between(checkin, checkout).unwrap();
        assert_eq!(d.total_minutes, 150);
        assert_eq!(d.billable_hours(), 3);
    }

    #[test]
    fn duration_rejects_negative_interval() {
        let checkin = Utc.with_ymd_and_hms(2024, 1, 1, 12, 0, 0).unwrap();
        let checkout = Utc.with_ymd_and_hms(2024, 1, 1, 10, 0, 0).unwrap();
        assert!(Duration::between(checkin, checkout).is_err());
    }

    #[test]
    fn billable_hours_round_up() {
        assert_eq!(Duration::from_minutes(120).billable_hours(), 2);
        assert_eq!(Duration::from_minutes(121).billable_hours(), 3);
    }

    #[test]
    fn billable_hours_minimum_is_one() {
        assert_eq!(Duration::from_minutes(0).billable_hours(), 1);
        assert_eq!(Duration::from_minutes(5).billable_hours(), 1);
    }

    #[test]
    fn duration_display() {
        assert_eq!(Duration::from_minutes(150).to_string(), "2h 30m");
    }

    #[test]
    fn final_fee_rejects_negative_amount() {
        assert!(FinalFee::new(Decimal::from(-1000), DEFAULT_CURRENCY).is_err());
    }

    #[test]
    fn final_fee_display() {
        let fee = FinalFee::new(Decimal::from(15000), DEFAULT_CURRENCY).unwrap();
        assert_eq!(fee.to_string(), "15000 IDR");
    }
}
