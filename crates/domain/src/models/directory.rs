//! Responsible parties and areas.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use validator::Validate;

/// A department or physical area of the institution.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Area {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// A staff member who can hold assets.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Responsible {
    pub id: i64,
    pub first_name: String,
    pub last_name: String,
    pub display_name: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Resolved reference to a responsible party.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct PartyRef {
    pub id: i64,
    pub display_name: String,
}

/// Resolved reference to an area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AreaRef {
    pub id: i64,
    pub name: String,
}

/// Request payload for creating an area.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateAreaRequest {
    #[validate(length(min = 1, max = 120, message = "Name must be between 1 and 120 characters"))]
    pub name: String,
}

/// Request payload for creating a responsible party.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateResponsibleRequest {
    #[validate(length(
        min = 1,
        max = 80,
        message = "First name must be between 1 and 80 characters"
    ))]
    pub first_name: String,

    #[validate(length(max = 80, message = "Last name must be at most 80 characters"))]
    pub last_name: Option<String>,
}

/// Response for listing areas.
#[derive(Debug, Clone, Serialize)]
pub struct ListAreasResponse {
    pub data: Vec<Area>,
    pub count: usize,
}

/// Response for listing responsibles.
#[derive(Debug, Clone, Serialize)]
pub struct ListResponsiblesResponse {
    pub data: Vec<Responsible>,
    pub count: usize,
}

/// Joins first and last name, dropping empty parts.
pub fn display_name(first_name: &str, last_name: &str) -> String {
    format!("{} {}", first_name.trim(), last_name.trim())
        .trim()
        .to_string()
}
