//! Shared utilities and common types for the inventory backend.
//!
//! This crate provides common functionality used across all other crates:
//! - Free-text normalization
//! - Field validators used by request DTOs
//! - Page-based pagination helpers

pub mod pagination;
pub mod validation;
