//! HTTP REST API
//!
//! - `common`: response envelope and shared extractors
//! - `middleware`: bearer-token authentication
//! - `modules`: per-resource DTOs and handlers
//! - `router`: API router with Swagger documentation

pub mod common;
pub mod middleware;
pub mod modules;
pub mod router;

pub use router::create_api_router;
