//! Domain layer: entities, value objects and business rules.
//!
//! Everything here is persistence- and transport-agnostic; the HTTP and
//! storage layers depend on this module, never the other way around.

pub mod account;
pub mod error;
pub mod session;
pub mod slot;
pub mod tariff;
pub mod user;
pub mod value_objects;

pub use account::{AccessToken, Account, Credentials, Role};
pub use error::{DomainError, DomainResult};
pub use session::{ParkingSession, SessionStatus};
pub use slot::{
    Availability, ParkingSlot, Position, Sensor, SensorType, SlotCounts, SlotStatus,
};
pub use tariff::ParkingTariff;
pub use user::{PaymentMethod, User, Vehicle};
pub use value_objects::{Duration, FinalFee, PlateNumber, DEFAULT_CURRENCY};
