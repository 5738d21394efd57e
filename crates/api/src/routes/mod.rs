//! HTTP route handlers.

pub mod assets;
pub mod assignments;
pub mod directory;
pub mod health;
pub mod movements;
pub mod receptions;
