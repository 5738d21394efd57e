//! Reception (asset return) domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::asset::AssetSummary;
use super::directory::{AreaRef, PartyRef};

/// Editable metadata of a reception. The asset set is not part of it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceptionMetadata {
    pub responsible_id: i64,
    pub area_id: i64,
    pub returned_on: NaiveDate,
    pub category: Option<String>,
}

/// A reception with its responsible, area and assets resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ReceptionView {
    pub id: i64,
    pub responsible: PartyRef,
    pub area: AreaRef,
    pub returned_on: NaiveDate,
    pub category: Option<String>,
    pub assets: Vec<AssetSummary>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Request payload for creating a reception.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateReceptionRequest {
    pub responsible_id: i64,
    pub area_id: i64,
    pub returned_on: NaiveDate,

    #[validate(length(max = 255, message = "Category must be at most 255 characters"))]
    pub category: Option<String>,

    #[validate(length(min = 1, message = "At least one asset is required"))]
    pub assets: Vec<i64>,
}

impl CreateReceptionRequest {
    pub fn metadata(&self) -> ReceptionMetadata {
        ReceptionMetadata {
            responsible_id: self.responsible_id,
            area_id: self.area_id,
            returned_on: self.returned_on,
            category: self.category.clone(),
        }
    }
}

/// Request payload for updating a reception.
///
/// `assets` must resubmit exactly the set recorded at creation.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateReceptionRequest {
    pub responsible_id: i64,
    pub area_id: i64,
    pub returned_on: NaiveDate,

    #[validate(length(max = 255, message = "Category must be at most 255 characters"))]
    pub category: Option<String>,

    #[validate(length(min = 1, message = "At least one asset is required"))]
    pub assets: Vec<i64>,
}

impl UpdateReceptionRequest {
    pub fn metadata(&self) -> ReceptionMetadata {
        ReceptionMetadata {
            responsible_id: self.responsible_id,
            area_id: self.area_id,
            returned_on: self.returned_on,
            category: self.category.clone(),
        }
    }
}

/// Response for listing receptions.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListReceptionsResponse {
    pub data: Vec<ReceptionView>,
    pub count: usize,
}

/// Response for deleting a reception.
#[derive(Debug, Clone, Serialize)]
pub struct DeleteReceptionResponse {
    pub message: String,
}
