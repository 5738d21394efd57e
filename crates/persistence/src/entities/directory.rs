//! Area and responsible entities (database row mappings).

use chrono::{DateTime, Utc};
use domain::models::directory::display_name;
use domain::models::{Area, AreaRef, PartyRef, Responsible};
use sqlx::FromRow;

/// Database row mapping for the areas table.
#[derive(Debug, Clone, FromRow)]
pub struct AreaEntity {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<AreaEntity> for Area {
    fn from(entity: AreaEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<AreaEntity> for AreaRef {
    fn from(entity: AreaEntity) -> Self {
        Self {
            id: entity.id,
            name: entity.name,
        }
    }
}

/// Database row mapping for the responsibles table.
#[derive(Debug, Clone, FromRow)]
pub struct ResponsibleEntity {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<ResponsibleEntity> for Responsible {
    fn from(entity: ResponsibleEntity) -> Self {
        Self {
            display_name: display_name(&entity.first_name, &entity.last_name),
            id: entity.id,
            first_name: entity.first_name,
            last_name: entity.last_name,
            created_at: entity.created_at,
            updated_at: entity.updated_at,
        }
    }
}

impl From<ResponsibleEntity> for PartyRef {
    fn from(entity: ResponsibleEntity) -> Self {
        Self {
            id: entity.id,
            display_name: display_name(&entity.first_name, &entity.last_name),
        }
    }
}
