//! Database entity definitions.
//!
//! Entities are direct mappings to database rows.

pub mod asset;
pub mod assignment;
pub mod directory;
pub mod movement;
pub mod reception;

pub use asset::{AssetCategoryDb, AssetEntity, AssetStatusDb, BatchAssetEntity, LockedAssetEntity};
pub use assignment::{
    AssignmentRowEntity, CurrentAssignmentEntity, CurrentHolderEntity, CurrentHoldingEntity,
};
pub use directory::{AreaEntity, ResponsibleEntity};
pub use movement::MovementEntity;
pub use reception::ReceptionRowEntity;
