//! Application services.
//!
//! Each service owns the transaction boundary of its operations and appends
//! the movement log entry once the transaction has committed.

pub mod assets;
pub mod assignment;
pub mod ledger;
pub mod reception;

pub use assets::AssetRegistry;
pub use assignment::AssignmentProcessor;
pub use reception::ReceptionProcessor;
