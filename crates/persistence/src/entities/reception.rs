//! Reception entities (database row mappings).

use chrono::{DateTime, NaiveDate, Utc};
use domain::models::directory::display_name;
use domain::models::{AreaRef, AssetSummary, PartyRef, ReceptionView};
use sqlx::FromRow;

/// A reception row joined with its responsible and area.
#[derive(Debug, Clone, FromRow)]
pub struct ReceptionRowEntity {
    pub id: i64,
    pub responsible_id: i64,
    pub responsible_first_name: String,
    pub responsible_last_name: String,
    pub area_id: i64,
    pub area_name: String,
    pub returned_on: NaiveDate,
    pub category: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ReceptionRowEntity {
    pub fn into_view(self, assets: Vec<AssetSummary>) -> ReceptionView {
        ReceptionView {
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
            returned_on: self.returned_on,
            category: self.category,
            assets,
            created_at: self.created_at,
            updated_at: self.updated_at,
        }
    }
}
