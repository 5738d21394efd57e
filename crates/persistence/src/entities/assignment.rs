//! Assignment ledger entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::directory::display_name;
use domain::models::{
    AreaRef, AssetSummary, AssignmentView, CurrentAssignment, CurrentHolding, PartyRef,
};
use sqlx::FromRow;

/// Database row mapping for the current_assignments table.
#[derive(Debug, Clone, FromRow)]
pub struct CurrentAssignmentEntity {
    pub asset_id: i64,
    pub responsible_id: i64,
    pub assignment_id: Option<i64>,
    pub assigned_at: DateTime<Utc>,
}

impl From<CurrentAssignmentEntity> for CurrentAssignment {
    fn from(entity: CurrentAssignmentEntity) -> Self {
        Self {
            asset_id: entity.asset_id,
            responsible_id: entity.responsible_id,
            assignment_id: entity.assignment_id,
            assigned_at: entity.assigned_at,
        }
    }
}

/// Current holder of a locked asset.
#[derive(Debug, Clone, FromRow)]
pub struct CurrentHolderEntity {
    pub asset_id: i64,
    pub responsible_id: i64,
    pub first_name: String,
    pub last_name: String,
}

impl CurrentHolderEntity {
    pub fn into_entry(self) -> (i64, PartyRef) {
        (
            self.asset_id,
            PartyRef {
                id: self.responsible_id,
                display_name: display_name(&self.first_name, &self.last_name),
            },
        )
    }
}

/// A current assignment joined with its asset and holder.
#[derive(Debug, Clone, FromRow)]
pub struct CurrentHoldingEntity {
    pub asset_id: i64,
    pub code: String,
    pub name: String,
    pub responsible_id: i64,
    pub first_name: String,
    pub last_name: String,
    pub assignment_id: Option<i64>,
    pub assigned_at: DateTime<Utc>,
}

impl From<CurrentHoldingEntity> for CurrentHolding {
    fn from(entity: CurrentHoldingEntity) -> Self {
        Self {
            asset: AssetSummary {
                id: entity.asset_id,
                code: entity.code,
                name: entity.name,
            },
            responsible: PartyRef {
                id: entity.responsible_id,
                display_name: display_name(&entity.first_name, &entity.last_name),
            },
            assignment_id: entity.assignment_id,
            assigned_at: entity.assigned_at,
        }
    }
}

/// An assignment batch joined with its responsible and area.
#[derive(Debug, Clone, FromRow)]
pub struct AssignmentRowEntity {
    pub id: i64,
    pub responsible_id: i64,
    pub responsible_first_name: String,
    pub responsible_last_name: String,
    pub area_id: i64,
    pub area_name: String,
    pub assigned_on: NaiveDate,
    pub category: String,
    pub created_at: DateTime<Utc>,
}

impl AssignmentRowEntity {
    pub fn into_view(self, assets: Vec<AssetSummary>) -> AssignmentView {
        AssignmentView {
            id: self.id,
            responsible: PartyRef {
                id: self.responsible_id,
                display_name: display_name(
                    &self.responsible_first_name,
                    &self.responsible_last_name,
                ),
            },
            area: AreaRef {
                id: self.area_id,
                name: self.area_name,
            },
            assigned_on: self.assigned_on,
            category: self.category,
            assets,
            created_at: self.created_at,
        }
    }
}
