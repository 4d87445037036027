//! Per-resource HTTP modules

pub mod auth;
pub mod health;
pub mod metrics;
pub mod parking;
pub mod slots;
pub mod users;
