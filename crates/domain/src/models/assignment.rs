//! Assignment ledger domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

use super::asset::AssetSummary;
use super::directory::{AreaRef, PartyRef};

/// The single active holder of an asset.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CurrentAssignment {
    pub asset_id: i64,
    pub responsible_id: i64,
    pub assignment_id: Option<i64>,
    pub assigned_at: DateTime<Utc>,
}

/// A current assignment with the asset and holder resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CurrentHolding {
    pub asset: AssetSummary,
    pub responsible: PartyRef,
    pub assignment_id: Option<i64>,
    pub assigned_at: DateTime<Utc>,
}

/// An assignment batch with its responsible, area and assets resolved.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AssignmentView {
    pub id: i64,
    pub responsible: PartyRef,
    pub area: AreaRef,
    pub assigned_on: NaiveDate,
    pub category: String,
    pub assets: Vec<AssetSummary>,
    pub created_at: DateTime<Utc>,
}

/// Request payload for assigning a batch of assets.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateAssignmentRequest {
    pub responsible_id: i64,
    pub area_id: i64,
    pub assigned_on: NaiveDate,

    #[validate(length(
        min = 1,
        max = 255,
        message = "Category must be between 1 and 255 characters"
    ))]
    pub category: String,

    #[validate(length(min = 1, message = "At least one asset is required"))]
    pub assets: Vec<i64>,
}

/// Query parameters for listing current holdings.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CurrentHoldingsQuery {
    pub responsible_id: Option<i64>,
}

/// Response for listing assignment batches.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListAssignmentsResponse {
    pub data: Vec<AssignmentView>,
    pub count: usize,
}

/// Response for listing current holdings.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListCurrentHoldingsResponse {
    pub data: Vec<CurrentHolding>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_assignment_request_validation() {
        let request = CreateAssignmentRequest {
            responsible_id: 1,
            area_id: 1,
            assigned_on: NaiveDate::from_ymd_opt(2025, 10, 27).unwrap(),
            category: "Equipo de Oficina".into(),
            assets: vec![3],
        };
        assert!(request.validate().is_ok());

        let empty = CreateAssignmentRequest {
            category: String::new(),
            assets: vec![],
            ..request
        };
        let errors = empty.validate().unwrap_err();
        assert!(errors.field_errors().contains_key("category"));
        assert!(errors.field_errors().contains_key("assets"));
    }
}
