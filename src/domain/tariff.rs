//! Parking tariff: converts elapsed time into a fee

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

use super::error::{DomainError, DomainResult};
use super::value_objects::FinalFee;

/// Pricing rule for parking sessions.
///
/// Billing is per started hour with a one-hour minimum; an optional daily
/// cap clamps the fee of long stays to `days * max_daily`.
#[derive(Debug, Clone)]
pub struct ParkingTariff {
    /// Price per started hour
    pub price_per_hour: Decimal,
    /// Maximum fee per calendar day (None = no cap)
    pub max_daily: Option<Decimal>,
    /// Currency code (ISO 4217)
    pub currency: String,
}

impl ParkingTariff {
    pub fn new(
        price_per_hour: Decimal,
        max_daily: Option<Decimal>,
        currency: impl Into<String>,
    ) -> DomainResult<Self> {
        if price_per_hour < Decimal::ZERO {
            return Err(DomainError::Validation(
                "price per hour must not be negative".to_string(),
            ));
        }
        if let Some(cap) = max_daily {
            if cap < price_per_hour {
                return Err(DomainError::Validation(
                    "daily cap must not be lower than the hourly price".to_string(),
                ));
            }
        }
        Ok(Self {
            price_per_hour,
            max_daily,
            currency: currency.into(),
        })
    }

    /// Calculate the fee for a stay from `checkin` to `checkout`.
    ///
    /// Billed hours are `ceil(elapsed / 1h)` with a floor of one hour, so
    /// even a near-zero stay pays the hourly minimum. Callers are expected
    /// to pass `checkout >= checkin`; an inverted interval still bills the
    /// one-hour minimum.
    pub fn calculate(&self, checkin: DateTime<Utc>, checkout: DateTime<Utc>) -> FinalFee {
        let seconds = (checkout - checkin).num_seconds();
        let hours = if seconds <= 0 { 1 } else { (seconds + 3599) / 3600 };
        let mut fee = self.price_per_hour * Decimal::from(hours.max(1));

        if let Some(cap) = self.max_daily {
            let day_span = (checkout.date_naive() - checkin.date_naive()).num_days() + 1;
            let cap_total = cap * Decimal::from(day_span.max(1));
            fee = fee.min(cap_total);
        }

        FinalFee {
            amount: fee,
            currency: self.currency.clone(),
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::value_objects::DEFAULT_CURRENCY;
    use chrono::TimeZone;

    fn at(h: u32, m: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 1, 1, h, m, 0).unwrap()
    }

    fn tariff(rate: i64, cap: Option<i64>) -> ParkingTariff {
        ParkingTariff::new(
            Decimal::from(rate),
            cap.map(Decimal::from),
            DEFAULT_CURRENCY,
        )
        .unwrap()
    }

    #[test]
    fn partial_hour_rounds_up() {
        // 2.5 hours -> 3 billed hours
        let fee = tariff(5000, None).calculate(at(10, 0), at(12, 30));
        assert_eq!(fee.amount, Decimal::from(15000));
    }

    #[test]
    fn short_stay_bills_minimum_one_hour() {
        let fee = tariff(5000, None).calculate(at(10, 0), at(10, 5));
        assert_eq!(fee.amount, Decimal::from(5000));
    }

    #[test]
    fn exact_hours_are_not_rounded() {
        let fee = tariff(3000, None).calculate(at(10, 0), at(12, 0));
        assert_eq!(fee.amount, Decimal::from(6000));
    }

    #[test]
    fn daily_cap_clamps_long_stay() {
        // 12 hours at 5000/h = 60000, capped at 20000 for one day
        let fee = tariff(5000, Some(20000)).calculate(at(10, 0), at(22, 0));
        assert_eq!(fee.amount, Decimal::from(20000));
    }

    #[test]
    fn cap_scales_with_calendar_days() {
        let checkin = Utc.with_ymd_and_hms(2024, 1, 1, 8, 0, 0).unwrap();
        let checkout = Utc.with_ymd_and_hms(2024, 1, 3, 8, 0, 0).unwrap();
        // 48 hours * 3000 = 144000; span covers 3 calendar days -> cap 3 * 50000
        let fee = tariff(3000, Some(50000)).calculate(checkin, checkout);
        assert_eq!(fee.amount, Decimal::from(144000));

        let fee = tariff(5000, Some(50000)).calculate(checkin, checkout);
        // 48 * 5000 = 240000 > 150000 cap
        assert_eq!(fee.amount, Decimal::from(150000));
    }

    #[test]
    fn fee_below_cap_is_untouched() {
        let fee = tariff(5000, Some(50000)).calculate(at(10, 0), at(12, 0));
        assert_eq!(fee.amount, Decimal::from(10000));
    }

    #[test]
    fn negative_price_is_rejected() {
        assert!(ParkingTariff::new(Decimal::from(-5000), None, DEFAULT_CURRENCY).is_err());
    }

    #[test]
    fn cap_below_hourly_price_is_rejected() {
        assert!(ParkingTariff::new(
            Decimal::from(10000),
            Some(Decimal::from(5000)),
            DEFAULT_CURRENCY
        )
        .is_err());
    }

    #[test]
    fn fee_carries_tariff_currency() {
        let fee = tariff(5000, None).calculate(at(10, 0), at(11, 0));
        assert_eq!(fee.currency, DEFAULT_CURRENCY);
    }
}
