//! Infrastructure layer: storage backends and crypto utilities

pub mod crypto;
pub mod storage;
