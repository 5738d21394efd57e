//! Asset domain models.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use shared::validation::{
    normalize_text, validate_char_length, validate_dimensions, validate_not_after,
    validate_serial_number,
};
use std::fmt;
use std::str::FromStr;
use validator::{Validate, ValidationError};

use crate::errors::{FieldViolation, InventoryError};

/// Fixed asset categories of the institution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AssetCategory {
    ComputerEquipment,
    OfficeEquipment,
    FurnitureAndFixtures,
    FacilitiesMachineryTools,
}

impl AssetCategory {
    pub const ALL: [AssetCategory; 4] = [
        AssetCategory::ComputerEquipment,
        AssetCategory::OfficeEquipment,
        AssetCategory::FurnitureAndFixtures,
        AssetCategory::FacilitiesMachineryTools,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            AssetCategory::ComputerEquipment => "computer_equipment",
            AssetCategory::OfficeEquipment => "office_equipment",
            AssetCategory::FurnitureAndFixtures => "furniture_and_fixtures",
            AssetCategory::FacilitiesMachineryTools => "facilities_machinery_tools",
        }
    }

    /// Label used on printed inventories and in the movement log.
    pub fn label(&self) -> &'static str {
        match self {
            AssetCategory::ComputerEquipment => "Equipo de Computo",
            AssetCategory::OfficeEquipment => "Equipo de Oficina",
            AssetCategory::FurnitureAndFixtures => "Muebles y Enseres",
            AssetCategory::FacilitiesMachineryTools => "Instalaciones, Maquinarias y Herramientas",
        }
    }

    /// Prefix of generated asset codes.
    pub fn code_prefix(&self) -> &'static str {
        match self {
            AssetCategory::ComputerEquipment => "E-EC",
            AssetCategory::OfficeEquipment => "E-EO",
            AssetCategory::FurnitureAndFixtures => "E-ME",
            AssetCategory::FacilitiesMachineryTools => "E-IM",
        }
    }

    /// Brand, model and serial number are mandatory.
    pub fn requires_serial(&self) -> bool {
        matches!(
            self,
            AssetCategory::ComputerEquipment | AssetCategory::OfficeEquipment
        )
    }

    /// Dimensions and colour are mandatory.
    pub fn requires_furniture_details(&self) -> bool {
        matches!(self, AssetCategory::FurnitureAndFixtures)
    }
}

impl FromStr for AssetCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AssetCategory::ALL
            .into_iter()
            .find(|c| c.as_str() == s.to_lowercase())
            .ok_or_else(|| format!("Invalid asset category: {}", s))
    }
}

impl fmt::Display for AssetCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Lifecycle status of an asset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetStatus {
    Active,
    Inactive,
}

impl AssetStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AssetStatus::Active => "active",
            AssetStatus::Inactive => "inactive",
        }
    }
}

impl FromStr for AssetStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "active" => Ok(AssetStatus::Active),
            "inactive" => Ok(AssetStatus::Inactive),
            _ => Err(format!("Invalid asset status: {}", s)),
        }
    }
}

impl fmt::Display for AssetStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A physical asset.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Asset {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub description: String,
    pub category: AssetCategory,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub dimensions: Option<String>,
    pub color: Option<String>,
    pub is_donated: bool,
    pub status: AssetStatus,
    pub decommission_reason: Option<String>,
    pub intake_date: Option<NaiveDate>,
    pub decommissioned_at: Option<DateTime<Utc>>,
    pub location_area_id: Option<i64>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Code and name of an asset, as listed on receptions and in audit text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct AssetSummary {
    pub id: i64,
    pub code: String,
    pub name: String,
}

impl AssetSummary {
    /// `CODE - Name`, trimmed of a missing side.
    pub fn label(&self) -> String {
        format!("{} - {}", self.code, self.name)
            .trim_matches(|c: char| c == ' ' || c == '-')
            .to_string()
    }
}

/// Category-dependent fields.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryDetails {
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub dimensions: Option<String>,
    pub color: Option<String>,
}

impl CategoryDetails {
    /// Requires the fields the category needs and clears the ones it does not use.
    pub fn conform_to(self, category: AssetCategory) -> Result<Self, Vec<FieldViolation>> {
        let mut violations = Vec::new();
        let mut out = CategoryDetails::default();

        if category.requires_serial() {
            out.brand = required_text(self.brand, "brand", 2, 60, &mut violations);
            out.model = required_text(self.model, "model", 2, 60, &mut violations);
            out.serial_number = match self.serial_number {
                Some(serial) => match validate_serial_number(&serial) {
                    Ok(()) => Some(serial),
                    Err(e) => {
                        violations.push(violation_from("serial_number", &e));
                        None
                    }
                },
                None => {
                    violations.push(missing("serial_number", category));
                    None
                }
            };
        }

        if category.requires_furniture_details() {
            out.dimensions = match self.dimensions {
                Some(dimensions) => match validate_dimensions(&dimensions) {
                    Ok(()) => Some(dimensions),
                    Err(e) => {
                        violations.push(violation_from("dimensions", &e));
                        None
                    }
                },
                None => {
                    violations.push(missing("dimensions", category));
                    None
                }
            };
            out.color = required_text(self.color, "color", 3, 30, &mut violations);
        }

        if violations.is_empty() {
            Ok(out)
        } else {
            Err(violations)
        }
    }
}

fn required_text(
    value: Option<String>,
    field: &'static str,
    min: usize,
    max: usize,
    violations: &mut Vec<FieldViolation>,
) -> Option<String> {
    let Some(value) = value else {
        violations.push(FieldViolation::new(
            field,
            format!("{} is required for this category", field),
        ));
        return None;
    };
    let message = format!("{} must be between {} and {} characters", field, min, max);
    match validate_char_length(&value, min, max, "length", &message) {
        Ok(()) => Some(value),
        Err(e) => {
            violations.push(violation_from(field, &e));
            None
        }
    }
}

fn missing(field: &str, category: AssetCategory) -> FieldViolation {
    FieldViolation::new(
        field,
        format!("{} is required for category {}", field, category.label()),
    )
}

fn violation_from(field: &str, err: &ValidationError) -> FieldViolation {
    let message = err
        .message
        .as_ref()
        .map(|m| m.to_string())
        .unwrap_or_else(|| err.code.to_string());
    FieldViolation::new(field, message)
}

fn into_validation(violations: Vec<FieldViolation>) -> InventoryError {
    let message = if violations.len() == 1 {
        violations[0].message.clone()
    } else {
        format!("{} validation errors", violations.len())
    };
    InventoryError::Validation {
        message,
        violations,
    }
}

/// Effect of a status change on the decommission fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTransition {
    Unchanged,
    Decommissioned,
    Reactivated,
}

impl StatusTransition {
    pub fn between(previous: AssetStatus, next: AssetStatus) -> Self {
        match (previous, next) {
            (AssetStatus::Active, AssetStatus::Inactive) => StatusTransition::Decommissioned,
            (AssetStatus::Inactive, AssetStatus::Active) => StatusTransition::Reactivated,
            _ => StatusTransition::Unchanged,
        }
    }
}

/// Request payload for registering an asset.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct CreateAssetRequest {
    #[validate(length(min = 3, max = 80, message = "Name must be between 3 and 80 characters"))]
    pub name: String,

    #[validate(length(
        min = 3,
        max = 255,
        message = "Description must be between 3 and 255 characters"
    ))]
    pub description: String,

    pub category: AssetCategory,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub dimensions: Option<String>,
    pub color: Option<String>,
    pub is_donated: Option<bool>,
    pub intake_date: Option<NaiveDate>,
    pub location_area_id: Option<i64>,
}

/// A validated asset ready to be inserted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRegistration {
    pub name: String,
    pub description: String,
    pub category: AssetCategory,
    pub details: CategoryDetails,
    pub is_donated: bool,
    pub intake_date: Option<NaiveDate>,
    pub location_area_id: Option<i64>,
}

impl CreateAssetRequest {
    /// Normalizes free text and applies the registration rules.
    pub fn into_registration(self, today: NaiveDate) -> Result<AssetRegistration, InventoryError> {
        let request = CreateAssetRequest {
            name: normalize_text(Some(&self.name)).unwrap_or_default(),
            description: normalize_text(Some(&self.description)).unwrap_or_default(),
            brand: normalize_text(self.brand.as_deref()),
            model: normalize_text(self.model.as_deref()),
            serial_number: normalize_text(self.serial_number.as_deref()),
            dimensions: normalize_text(self.dimensions.as_deref()),
            color: normalize_text(self.color.as_deref()),
            ..self
        };
        request.validate()?;

        if let Some(date) = request.intake_date {
            validate_not_after(date, today)
                .map_err(|e| into_validation(vec![violation_from("intake_date", &e)]))?;
        }

        let details = CategoryDetails {
            brand: request.brand,
            model: request.model,
            serial_number: request.serial_number,
            dimensions: request.dimensions,
            color: request.color,
        }
        .conform_to(request.category)
        .map_err(into_validation)?;

        Ok(AssetRegistration {
            name: request.name,
            description: request.description,
            category: request.category,
            details,
            is_donated: request.is_donated.unwrap_or(false),
            intake_date: request.intake_date,
            location_area_id: request.location_area_id,
        })
    }
}

/// Request payload for updating an asset. Absent fields keep their value.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "snake_case")]
pub struct UpdateAssetRequest {
    #[validate(length(min = 3, max = 80, message = "Name must be between 3 and 80 characters"))]
    pub name: Option<String>,

    #[validate(length(
        min = 3,
        max = 255,
        message = "Description must be between 3 and 255 characters"
    ))]
    pub description: Option<String>,

    pub category: Option<AssetCategory>,
    pub brand: Option<String>,
    pub model: Option<String>,
    pub serial_number: Option<String>,
    pub dimensions: Option<String>,
    pub color: Option<String>,
    pub is_donated: Option<bool>,
    pub intake_date: Option<NaiveDate>,
    pub location_area_id: Option<i64>,
    pub status: Option<AssetStatus>,

    #[validate(length(max = 500, message = "Decommission reason must be at most 500 characters"))]
    pub decommission_reason: Option<String>,
}

/// The full next state of an asset after an update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRevision {
    pub name: String,
    pub description: String,
    pub category: AssetCategory,
    pub details: CategoryDetails,
    pub is_donated: bool,
    pub intake_date: Option<NaiveDate>,
    pub location_area_id: Option<i64>,
    pub status: AssetStatus,
    pub decommission_reason: Option<String>,
    pub decommissioned_at: Option<DateTime<Utc>>,
    pub transition: StatusTransition,
    pub category_changed: bool,
}

impl UpdateAssetRequest {
    /// Merges the request over `current` and applies the registration and status rules.
    pub fn revise(
        self,
        current: &Asset,
        now: DateTime<Utc>,
    ) -> Result<AssetRevision, InventoryError> {
        let request = UpdateAssetRequest {
            name: normalize_text(self.name.as_deref()),
            description: normalize_text(self.description.as_deref()),
            brand: normalize_text(self.brand.as_deref()),
            model: normalize_text(self.model.as_deref()),
            serial_number: normalize_text(self.serial_number.as_deref()),
            dimensions: normalize_text(self.dimensions.as_deref()),
            color: normalize_text(self.color.as_deref()),
            decommission_reason: normalize_text(self.decommission_reason.as_deref()),
            ..self
        };
        request.validate()?;

        if let Some(date) = request.intake_date {
            validate_not_after(date, now.date_naive())
                .map_err(|e| into_validation(vec![violation_from("intake_date", &e)]))?;
        }

        let category = request.category.unwrap_or(current.category);
        let details = CategoryDetails {
            brand: request.brand.or_else(|| current.brand.clone()),
            model: request.model.or_else(|| current.model.clone()),
            serial_number: request.serial_number.or_else(|| current.serial_number.clone()),
            dimensions: request.dimensions.or_else(|| current.dimensions.clone()),
            color: request.color.or_else(|| current.color.clone()),
        }
        .conform_to(category)
        .map_err(into_validation)?;

        let status = request.status.unwrap_or(current.status);
        let transition = StatusTransition::between(current.status, status);
        if transition == StatusTransition::Decommissioned && request.decommission_reason.is_none()
        {
            return Err(InventoryError::invalid(
                "decommission_reason",
                "A reason is required to decommission an asset",
            ));
        }

        let decommissioned_at = match transition {
            StatusTransition::Decommissioned => Some(now),
            StatusTransition::Reactivated => None,
            StatusTransition::Unchanged => current.decommissioned_at,
        };

        Ok(AssetRevision {
            name: request.name.unwrap_or_else(|| current.name.clone()),
            description: request
                .description
                .unwrap_or_else(|| current.description.clone()),
            category,
            details,
            is_donated: request.is_donated.unwrap_or(current.is_donated),
            intake_date: request.intake_date.or(current.intake_date),
            location_area_id: request.location_area_id.or(current.location_area_id),
            status,
            decommission_reason: request
                .decommission_reason
                .or_else(|| current.decommission_reason.clone()),
            decommissioned_at,
            transition,
            category_changed: category != current.category,
        })
    }
}

/// Query parameters for listing assets.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct ListAssetsQuery {
    pub category: Option<AssetCategory>,
    pub status: Option<AssetStatus>,
    /// Free-text search over code, name, brand, model and serial number.
    pub q: Option<String>,
}

/// Response for listing assets.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "snake_case")]
pub struct ListAssetsResponse {
    pub data: Vec<Asset>,
    pub count: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 12, 3).unwrap()
    }

    fn laptop_request() -> CreateAssetRequest {
        CreateAssetRequest {
            name: "  Laptop   Dell ".into(),
            description: "Latitude 5420 for accounting".into(),
            category: AssetCategory::ComputerEquipment,
            brand: Some("Dell".into()),
            model: Some("Latitude 5420".into()),
            serial_number: Some("SN-5420-001".into()),
            dimensions: Some("40x30".into()),
            color: Some("Black".into()),
            is_donated: None,
            intake_date: Some(today()),
            location_area_id: None,
        }
    }

    fn stored_asset() -> Asset {
        let now = Utc::now();
        Asset {
            id: 7,
            code: "E-EC-2025-007".into(),
            name: "Laptop Dell".into(),
            description: "Latitude 5420".into(),
            category: AssetCategory::ComputerEquipment,
            brand: Some("Dell".into()),
            model: Some("Latitude".into()),
            serial_number: Some("SN-1".into()),
            dimensions: None,
            color: None,
            is_donated: false,
            status: AssetStatus::Active,
            decommission_reason: None,
            intake_date: None,
            decommissioned_at: None,
            location_area_id: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_category_round_trip_and_prefixes() {
        for category in AssetCategory::ALL {
            assert_eq!(category.as_str().parse::<AssetCategory>().unwrap(), category);
        }
        assert_eq!(AssetCategory::OfficeEquipment.code_prefix(), "E-EO");
        assert!("vehicles".parse::<AssetCategory>().is_err());
    }

    #[test]
    fn test_status_from_str() {
        assert_eq!("Inactive".parse::<AssetStatus>().unwrap(), AssetStatus::Inactive);
        assert!("retired".parse::<AssetStatus>().is_err());
    }

    #[test]
    fn test_summary_label() {
        let summary = AssetSummary {
            id: 1,
            code: "E-EC-2025-001".into(),
            name: "Laptop".into(),
        };
        assert_eq!(summary.label(), "E-EC-2025-001 - Laptop");
    }

    #[test]
    fn test_registration_normalizes_and_clears_furniture_fields() {
        let registration = laptop_request().into_registration(today()).unwrap();
        assert_eq!(registration.name, "Laptop Dell");
        assert_eq!(registration.details.serial_number.as_deref(), Some("SN-5420-001"));
        assert_eq!(registration.details.dimensions, None);
        assert_eq!(registration.details.color, None);
        assert!(!registration.is_donated);
    }

    #[test]
    fn test_registration_requires_serial_for_computers() {
        let request = CreateAssetRequest {
            serial_number: None,
            brand: Some(" ".into()),
            ..laptop_request()
        };
        let err = request.into_registration(today()).unwrap_err();
        let fields: Vec<String> = err.violations().into_iter().map(|v| v.field).collect();
        assert!(fields.contains(&"serial_number".to_string()));
        assert!(fields.contains(&"brand".to_string()));
    }

    #[test]
    fn test_registration_furniture_rules() {
        let request = CreateAssetRequest {
            name: "Desk".into(),
            category: AssetCategory::FurnitureAndFixtures,
            dimensions: Some("120 by 60".into()),
            ..laptop_request()
        };
        let err = request.into_registration(today()).unwrap_err();
        assert_eq!(err.violations()[0].field, "dimensions");

        let request = CreateAssetRequest {
            name: "Desk".into(),
            category: AssetCategory::FurnitureAndFixtures,
            dimensions: Some("120x60".into()),
            ..laptop_request()
        };
        let registration = request.into_registration(today()).unwrap();
        assert_eq!(registration.details.serial_number, None);
        assert_eq!(registration.details.color.as_deref(), Some("Black"));
    }

    #[test]
    fn test_registration_rejects_future_intake_date() {
        let request = CreateAssetRequest {
            intake_date: today().succ_opt(),
            ..laptop_request()
        };
        let err = request.into_registration(today()).unwrap_err();
        assert_eq!(err.violations()[0].field, "intake_date");
    }

    #[test]
    fn test_registration_rejects_short_name() {
        let request = CreateAssetRequest {
            name: " a ".into(),
            ..laptop_request()
        };
        assert!(matches!(
            request.into_registration(today()),
            Err(InventoryError::Validation { .. })
        ));
    }

    #[test]
    fn test_status_transition() {
        use AssetStatus::*;
        assert_eq!(StatusTransition::between(Active, Inactive), StatusTransition::Decommissioned);
        assert_eq!(StatusTransition::between(Inactive, Active), StatusTransition::Reactivated);
        assert_eq!(StatusTransition::between(Active, Active), StatusTransition::Unchanged);
        assert_eq!(StatusTransition::between(Inactive, Inactive), StatusTransition::Unchanged);
    }

    #[test]
    fn test_revise_decommission_requires_reason() {
        let request = UpdateAssetRequest {
            status: Some(AssetStatus::Inactive),
            ..Default::default()
        };
        let err = request.revise(&stored_asset(), Utc::now()).unwrap_err();
        assert_eq!(err.violations()[0].field, "decommission_reason");
    }

    #[test]
    fn test_revise_decommission_stamps_time() {
        let now = Utc::now();
        let request = UpdateAssetRequest {
            status: Some(AssetStatus::Inactive),
            decommission_reason: Some("Screen broken".into()),
            ..Default::default()
        };
        let revision = request.revise(&stored_asset(), now).unwrap();
        assert_eq!(revision.transition, StatusTransition::Decommissioned);
        assert_eq!(revision.decommissioned_at, Some(now));
        assert_eq!(revision.decommission_reason.as_deref(), Some("Screen broken"));
        assert_eq!(revision.name, "Laptop Dell");
        assert!(!revision.category_changed);
    }

    #[test]
    fn test_revise_reactivation_clears_time() {
        let mut asset = stored_asset();
        asset.status = AssetStatus::Inactive;
        asset.decommissioned_at = Some(Utc::now());
        let request = UpdateAssetRequest {
            status: Some(AssetStatus::Active),
            ..Default::default()
        };
        let revision = request.revise(&asset, Utc::now()).unwrap();
        assert_eq!(revision.transition, StatusTransition::Reactivated);
        assert_eq!(revision.decommissioned_at, None);
    }

    #[test]
    fn test_revise_category_change_applies_new_rules() {
        let request = UpdateAssetRequest {
            category: Some(AssetCategory::FacilitiesMachineryTools),
            ..Default::default()
        };
        let revision = request.revise(&stored_asset(), Utc::now()).unwrap();
        assert!(revision.category_changed);
        assert_eq!(revision.details, CategoryDetails::default());

        let request = UpdateAssetRequest {
            category: Some(AssetCategory::FurnitureAndFixtures),
            ..Default::default()
        };
        let err = request.revise(&stored_asset(), Utc::now()).unwrap_err();
        let fields: Vec<String> = err.violations().into_iter().map(|v| v.field).collect();
        assert_eq!(fields, vec!["dimensions".to_string(), "color".to_string()]);
    }
}
