//! HTTP service for the inventory backend.
//!
//! Exposes the assignment ledger, receptions, the asset registry and the
//! movement log under `/api/v1`.

pub mod app;
pub mod config;
pub mod error;
pub mod extractors;
pub mod middleware;
pub mod routes;
pub mod services;
