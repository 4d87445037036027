//! User profile module: vehicles and payment methods

pub mod dto;
pub mod handlers;

pub use dto::*;
pub use handlers::*;
