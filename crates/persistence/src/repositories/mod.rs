//! Repository implementations for database operations.

pub mod asset;
pub mod assignment;
pub mod directory;
pub mod movement;
pub mod reception;

pub use asset::AssetRepository;
pub use assignment::AssignmentRepository;
pub use directory::DirectoryRepository;
pub use movement::MovementRepository;
pub use reception::ReceptionRepository;
