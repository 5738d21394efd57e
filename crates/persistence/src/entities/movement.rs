//! Movement entity (database row mapping).

use chrono::{DateTime, Utc};
use domain::models::Movement;
use sqlx::FromRow;

/// Database row mapping for the movements table.
#[derive(Debug, Clone, FromRow)]
pub struct MovementEntity {
    pub id: i64,
    pub action: String,
    pub description: String,
    pub actor: String,
    pub occurred_at: DateTime<Utc>,
}

impl From<MovementEntity> for Movement {
    fn from(entity: MovementEntity) -> Self {
        Self {
            id: entity.id,
            action: entity.action,
            description: entity.description,
            actor: entity.actor,
            occurred_at: entity.occurred_at,
        }
    }
}
