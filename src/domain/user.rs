//! User aggregate: profile, vehicles and payment methods

use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::error::{DomainError, DomainResult};
use super::value_objects::PlateNumber;

/// Registered vehicle belonging to a user
#[derive(Debug, Clone)]
pub struct Vehicle {
    pub id: Uuid,
    pub plate: PlateNumber,
    pub created_at: DateTime<Utc>,
}

impl Vehicle {
    pub fn new(plate: PlateNumber) -> Self {
        Self {
            id: Uuid::new_v4(),
            plate,
            created_at: Utc::now(),
        }
    }
}

/// Stored payment method. The external token is an opaque reference
/// into the payment provider, never raw card data.
#[derive(Debug, Clone)]
pub struct PaymentMethod {
    pub id: Uuid,
    pub kind: String,
    pub provider: Option<String>,
    pub external_token: Option<String>,
    pub is_default: bool,
    pub created_at: DateTime<Utc>,
}

impl PaymentMethod {
    pub fn new(
        kind: impl Into<String>,
        provider: Option<String>,
        external_token: Option<String>,
    ) -> DomainResult<Self> {
        let kind = kind.into();
        if kind.trim().is_empty() {
            return Err(DomainError::Validation(
                "payment method kind must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            kind,
            provider,
            external_token,
            is_default: false,
            created_at: Utc::now(),
        })
    }
}

/// User profile aggregate.
///
/// Invariant: at most one payment method is marked default at any time.
#[derive(Debug, Clone)]
pub struct User {
    pub id: Uuid,
    pub name: String,
    pub email: Option<String>,
    pub account_id: Option<Uuid>,
    pub vehicles: Vec<Vehicle>,
    pub payment_methods: Vec<PaymentMethod>,
    pub created_at: DateTime<Utc>,
}

impl User {
    pub fn create(
        name: impl Into<String>,
        email: Option<String>,
        account_id: Option<Uuid>,
    ) -> DomainResult<Self> {
        let name = name.into();
        if name.trim().is_empty() {
            return Err(DomainError::Validation(
                "user name must not be empty".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            name,
            email,
            account_id,
            vehicles: Vec::new(),
            payment_methods: Vec::new(),
            created_at: Utc::now(),
        })
    }

    pub fn add_vehicle(&mut self, plate: PlateNumber) -> DomainResult<Vehicle> {
        if self.vehicles.iter().any(|v| v.plate.code == plate.code) {
            return Err(DomainError::Conflict(format!(
                "vehicle with plate {} is already registered",
                plate.code
            )));
        }
        let vehicle = Vehicle::new(plate);
        self.vehicles.push(vehicle.clone());
        Ok(vehicle)
    }

    pub fn remove_vehicle(&mut self, vehicle_id: Uuid) -> DomainResult<()> {
        let before = self.vehicles.len();
        self.vehicles.retain(|v| v.id != vehicle_id);
        if self.vehicles.len() == before {
            return Err(DomainError::not_found("vehicle", vehicle_id));
        }
        Ok(())
    }

    /// Add a payment method. The first one added becomes the default.
    pub fn add_payment_method(&mut self, mut method: PaymentMethod) -> PaymentMethod {
        if self.payment_methods.is_empty() {
            method.is_default = true;
        }
        self.payment_methods.push(method.clone());
        method
    }

    /// Make `method_id` the default, clearing the flag on all others.
    pub fn set_default_payment_method(&mut self, method_id: Uuid) -> DomainResult<()> {
        if !self.payment_methods.iter().any(|m| m.id == method_id) {
            return Err(DomainError::not_found("payment method", method_id));
        }
        for method in &mut self.payment_methods {
            method.is_default = method.id == method_id;
        }
        Ok(())
    }

    pub fn default_payment_method(&self) -> Option<&PaymentMethod> {
        self.payment_methods.iter().find(|m| m.is_default)
    }

    pub fn find_vehicle_by_plate(&self, code: &str) -> Option<&Vehicle> {
        self.vehicles.iter().find(|v| v.plate.code == code)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;

    fn plate(code: &str) -> PlateNumber {
        PlateNumber::new(code, None).unwrap()
    }

    fn sample_user() -> User {
        User::create("Budi", Some("budi@example.com".into()), None).unwrap()
    }

    #[test]
    fn empty_name_is_rejected() {
        assert!(User::create("  ", None, None).is_err());
    }

    #[test]
    fn add_vehicle_rejects_duplicate_plate() {
        let mut user = sample_user();
        user.add_vehicle(plate("B1234XYZ")).unwrap();
        assert!(matches!(
            user.add_vehicle(plate("B1234XYZ")),
            Err(DomainError::Conflict(_))
        ));
        assert_eq!(user.vehicles.len(), 1);
    }

    #[test]
    fn remove_vehicle() {
        let mut user = sample_user();
        let id = user.add_vehicle(plate("B1234XYZ")).unwrap().id;
        user.remove_vehicle(id).unwrap();
        assert!(user.vehicles.is_empty());
        assert!(user.remove_vehicle(id).is_err());
    }

    #[test]
    fn first_payment_method_becomes_default() {
        let mut user = sample_user();
        user.add_payment_method(PaymentMethod::new("CARD", None, None).unwrap());
        assert!(user.default_payment_method().is_some());
    }

    #[test]
    fn only_one_default_payment_method() {
        let mut user = sample_user();
        user.add_payment_method(PaymentMethod::new("CARD", None, None).unwrap());
        let ewallet_id = user
            .add_payment_method(PaymentMethod::new("EWALLET", Some("gopay".into()), None).unwrap())
            .id;

        user.set_default_payment_method(ewallet_id).unwrap();

        let defaults: Vec<_> = user
            .payment_methods
            .iter()
            .filter(|m| m.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, ewallet_id);
    }

    #[test]
    fn set_default_on_unknown_method_fails() {
        let mut user = sample_user();
        assert!(matches!(
            user.set_default_payment_method(Uuid::new_v4()),
            Err(DomainError::NotFound { .. })
        ));
    }

    #[test]
    fn empty_payment_kind_is_rejected() {
        assert!(PaymentMethod::new("", None, None).is_err());
    }

    #[test]
    fn find_vehicle_by_plate() {
        let mut user = sample_user();
        user.add_vehicle(plate("B1234XYZ")).unwrap();
        assert!(user.find_vehicle_by_plate("B1234XYZ").is_some());
        assert!(user.find_vehicle_by_plate("D5678AB").is_none());
    }
}
