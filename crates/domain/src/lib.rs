//! Domain layer for the inventory backend.
//!
//! This crate contains:
//! - Domain models (Asset, CurrentAssignment, Reception, Movement)
//! - Business rules for the assignment ledger and receptions
//! - Domain error types

pub mod errors;
pub mod models;
pub mod services;

pub use errors::{FieldViolation, InventoryError};
