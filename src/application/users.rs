//! User profile service: vehicles and payment methods

use std::sync::Arc;

use tracing::info;
use uuid::Uuid;

use crate::domain::{
    DomainError, DomainResult, PaymentMethod, PlateNumber, User, Vehicle,
};
use crate::infrastructure::storage::Storage;

/// Service for user profile management
pub struct UserService {
    storage: Arc<dyn Storage>,
}

impl UserService {
    pub fn new(storage: Arc<dyn Storage>) -> Self {
        Self { storage }
    }

    /// Create a standalone profile, not linked to a login account.
    pub async fn create_user(&self, name: &str, email: Option<String>) -> DomainResult<User> {
        let user = User::create(name, email, None)?;
        self.storage.save_user(user.clone()).await?;

        info!(user_id = %user.id, "user created");
        Ok(user)
    }

    pub async fn get_user(&self, id: Uuid) -> DomainResult<User> {
        self.storage
            .get_user(id)
            .await?
            .ok_or_else(|| DomainError::not_found("user", id))
    }

    pub async fn list_users(&self) -> DomainResult<Vec<User>> {
        self.storage.list_users().await
    }

    pub async fn delete_user(&self, id: Uuid) -> DomainResult<()> {
        self.storage.delete_user(id).await?;
        info!(user_id = %id, "user deleted");
        Ok(())
    }

    /// Register a vehicle under a user. Plates are unique across all
    /// users, not just within one profile.
    pub async fn add_vehicle(
        &self,
        user_id: Uuid,
        plate_code: &str,
        vehicle_type: Option<String>,
    ) -> DomainResult<Vehicle> {
        let plate = PlateNumber::new(plate_code, vehicle_type)?;
        if self
            .storage
            .find_user_by_vehicle_plate(&plate.code)
            .await?
            .is_some()
        {
            return Err(DomainError::Conflict(format!(
                "vehicle with plate {} is already registered",
                plate.code
            )));
        }

        let mut user = self.get_user(user_id).await?;
        let vehicle = user.add_vehicle(plate)?;
        self.storage.update_user(user).await?;

        info!(user_id = %user_id, vehicle_id = %vehicle.id, plate = %vehicle.plate.code, "vehicle registered");
        Ok(vehicle)
    }

    pub async fn remove_vehicle(&self, user_id: Uuid, vehicle_id: Uuid) -> DomainResult<()> {
        let mut user = self.get_user(user_id).await?;
        user.remove_vehicle(vehicle_id)?;
        self.storage.update_user(user).await?;

        info!(user_id = %user_id, vehicle_id = %vehicle_id, "vehicle removed");
        Ok(())
    }

    pub async fn find_vehicle_by_plate(
        &self,
        plate_code: &str,
    ) -> DomainResult<(User, Vehicle)> {
        self.storage
            .find_user_by_vehicle_plate(plate_code)
            .await?
            .ok_or_else(|| DomainError::not_found("vehicle", plate_code))
    }

    pub async fn add_payment_method(
        &self,
        user_id: Uuid,
        kind: &str,
        provider: Option<String>,
        external_token: Option<String>,
    ) -> DomainResult<PaymentMethod> {
        let method = PaymentMethod::new(kind, provider, external_token)?;
        let mut user = self.get_user(user_id).await?;
        let method = user.add_payment_method(method);
        self.storage.update_user(user).await?;

        info!(user_id = %user_id, method_id = %method.id, kind = %method.kind, "payment method added");
        Ok(method)
    }

    pub async fn set_default_payment_method(
        &self,
        user_id: Uuid,
        method_id: Uuid,
    ) -> DomainResult<User> {
        let mut user = self.get_user(user_id).await?;
        user.set_default_payment_method(method_id)?;
        self.storage.update_user(user.clone()).await?;

        info!(user_id = %user_id, method_id = %method_id, "default payment method changed");
        Ok(user)
    }
}

// ── Tests ──────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::storage::InMemoryStorage;

    fn service() -> UserService {
        UserService::new(Arc::new(InMemoryStorage::new()))
    }

    #[tokio::test]
    async fn create_and_fetch_user() {
        let service = service();
        let user = service.create_user("Budi", None).await.unwrap();
        let fetched = service.get_user(user.id).await.unwrap();
        assert_eq!(fetched.name, "Budi");
        assert!(fetched.vehicles.is_empty());
    }

    #[tokio::test]
    async fn plate_is_unique_across_users() {
        let service = service();
        let first = service.create_user("Budi", None).await.unwrap();
        let second = service.create_user("Siti", None).await.unwrap();

        service.add_vehicle(first.id, "B1234XYZ", None).await.unwrap();
        assert!(matches!(
            service.add_vehicle(second.id, "B1234XYZ", None).await,
            Err(DomainError::Conflict(_))
        ));
    }

    #[tokio::test]
    async fn vehicle_lookup_by_plate() {
        let service = service();
        let user = service.create_user("Budi", None).await.unwrap();
        service
            .add_vehicle(user.id, "D5678AB", Some("MOTOR".into()))
            .await
            .unwrap();

        let (owner, vehicle) = service.find_vehicle_by_plate("D5678AB").await.unwrap();
        assert_eq!(owner.id, user.id);
        assert_eq!(vehicle.plate.vehicle_type.as_deref(), Some("MOTOR"));

        assert!(matches!(
            service.find_vehicle_by_plate("Z0000ZZ").await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn remove_vehicle_persists() {
        let service = service();
        let user = service.create_user("Budi", None).await.unwrap();
        let vehicle = service.add_vehicle(user.id, "B1234XYZ", None).await.unwrap();

        service.remove_vehicle(user.id, vehicle.id).await.unwrap();
        assert!(service.get_user(user.id).await.unwrap().vehicles.is_empty());

        // Plate becomes free again
        assert!(service.add_vehicle(user.id, "B1234XYZ", None).await.is_ok());
    }

    #[tokio::test]
    async fn default_payment_method_is_exclusive() {
        let service = service();
        let user = service.create_user("Budi", None).await.unwrap();

        let card = service
            .add_payment_method(user.id, "CARD", None, Some("tok_123".into()))
            .await
            .unwrap();
        assert!(card.is_default);

        let ewallet = service
            .add_payment_method(user.id, "EWALLET", Some("gopay".into()), None)
            .await
            .unwrap();
        assert!(!ewallet.is_default);

        let user = service
            .set_default_payment_method(user.id, ewallet.id)
            .await
            .unwrap();
        let defaults: Vec<_> = user
            .payment_methods
            .iter()
            .filter(|m| m.is_default)
            .collect();
        assert_eq!(defaults.len(), 1);
        assert_eq!(defaults[0].id, ewallet.id);
    }

    #[tokio::test]
    async fn default_on_unknown_method_is_not_found() {
        let service = service();
        let user = service.create_user("Budi", None).await.unwrap();
        assert!(matches!(
            service.set_default_payment_method(user.id, Uuid::new_v4()).await,
            Err(DomainError::NotFound { .. })
        ));
    }

    #[tokio::test]
    async fn delete_user() {
        let service = service();
        let user = service.create_user("Budi", None).await.unwrap();
        service.delete_user(user.id).await.unwrap();
        assert!(service.get_user(user.id).await.is_err());
        assert!(service.delete_user(user.id).await.is_err());
    }
}
