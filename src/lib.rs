//! # Parking Service
//!
//! REST backend for parking lot management: slot inventory with sensors,
//! parking sessions with hourly billing, user profiles and JWT auth.
//!
//! ## Architecture
//!
//! The project follows Clean Architecture principles:
//!
//! - **domain**: Core business entities, value objects and rules
//! - **application**: Use-case services (parking, slots, auth, users)
//! - **infrastructure**: Storage backends and crypto utilities
//! - **interfaces**: REST API with Swagger documentation

pub mod application;
pub mod config;
pub mod domain;
pub mod infrastructure;
pub mod interfaces;

pub use config::{default_config_path, AppConfig};
pub use interfaces::http::create_api_router;
