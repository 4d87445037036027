//! Application layer: use-case services on top of the domain

pub mod auth;
pub mod parking;
pub mod slots;
pub mod users;

pub use auth::AuthService;
pub use parking::ParkingService;
pub use slots::{FloorOccupancy, SlotService, SlotStats};
pub use users::UserService;
