//! Asset entity (database row mapping).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::{Asset, AssetCategory, AssetStatus, AssetSummary};
use domain::services::LockedAsset;
use sqlx::FromRow;

/// Database enum for asset_category that maps to PostgreSQL enum type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "asset_category", rename_all = "snake_case")]
pub enum AssetCategoryDb {
    ComputerEquipment,
    OfficeEquipment,
    FurnitureAndFixtures,
    FacilitiesMachineryTools,
}

impl From<AssetCategoryDb> for AssetCategory {
    fn from(db: AssetCategoryDb) -> Self {
        match db {
            AssetCategoryDb::ComputerEquipment => AssetCategory::ComputerEquipment,
            AssetCategoryDb::OfficeEquipment => AssetCategory::OfficeEquipment,
            AssetCategoryDb::FurnitureAndFixtures => AssetCategory::FurnitureAndFixtures,
            AssetCategoryDb::FacilitiesMachineryTools => AssetCategory::FacilitiesMachineryTools,
        }
    }
}

impl From<AssetCategory> for AssetCategoryDb {
    fn from(category: AssetCategory) -> Self {
        match category {
            AssetCategory::ComputerEquipment => AssetCategoryDb::ComputerEquipment,
            AssetCategory::OfficeEquipment => AssetCategoryDb::OfficeEquipment,
            AssetCategory::FurnitureAndFixtures => AssetCategoryDb::FurnitureAndFixtures,
            AssetCategory::FacilitiesMachineryTools => AssetCategoryDb::FacilitiesMachineryTools,
        }
    }
}

/// Database enum for asset_status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, sqlx::Type)]
#[sqlx(type_name = "asset_status", rename_all = "lowercase")]
pub enum AssetStatusDb {
    Active,
    Inactive,
}

impl From<AssetStatusDb> for AssetStatus {
    fn from(db: AssetStatusDb) -> Self {
        match db {
            AssetStatusDb::Active => AssetStatus::Active,
            AssetStatusDb::Inactive => AssetStatus::Inactive,
        }
    }
}

impl From<AssetStatus> for AssetStatusDb {
    fn from(status: AssetStatus) -> Self {
        match status {
            AssetStatus::Active => AssetStatusDb::Active,
            AssetStatus::Inactive => AssetStatusDb::Inactive,
        }
    }
}

/// Database row mapping for the assets table.
#[derive(Debug, Clone, FromRow)]
pub struct AssetEntity {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: AssetCategoryDb,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub dimensions: Option<String>,
    pub color: Option<String>,
    pub is_donated: bool,
    pub status: AssetStatusDb,
    pub decommission_reason: Option<String>,
    pub intake_date: Option<NaiveDate>,
    pub decommissioned_at: Option<DateTime<Utc>>,
    pub location_area_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AssetEntity> for Asset {
    fn from(entity: AssetEntity) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            name: entity.name,
            description: entity.description,
            category: entity.category.into(),
            brand: entity.brand,
            model: entity.model,
            serial_number: entity.serial_number,
            dimensions: entity.dimensions,
            color: entity.color,
            is_donated: entity.is_donated,
            status: entity.status.into(),
            decommission_reason: entity.decommission_reason,
            intake_date: entity.intake_date,
            decommissioned_at: entity.decommissioned_at,
            location_area_id: entity.location_area_id,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

/// Asset columns read while holding the row lock.
#[derive(Debug, Clone, FromRow)]
pub struct LockedAssetEntity {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub status: AssetStatusDb,
}

impl From<LockedAssetEntity> for LockedAsset {
    fn from(entity: LockedAssetEntity) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            name: entity.name,
            status: entity.status.into(),
        }
    }
}

/// An asset listed on a reception or assignment, with its position in the batch.
#[derive(Debug, Clone, FromRow)]
pub struct BatchAssetEntity {
    pub batch_id: i64,
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl From<BatchAssetEntity> for AssetSummary {
    fn from(entity: BatchAssetEntity) -> Self {
        Self {
            id: entity.id,
            code: entity.code,
            name: entity.name,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_category_conversion_is_total() {
        for category in AssetCategory::ALL {
            let db: AssetCategoryDb = category.into();
            assert_eq!(AssetCategory::from(db), category);
        }
    }

    #[test]
    fn test_status_conversion() {
        assert_eq!(AssetStatus::from(AssetStatusDb::Inactive), AssetStatus::Inactive);
        assert_eq!(AssetStatusDb::from(AssetStatus::Active), AssetStatusDb::Active);
    }
}
