//! Assignment ledger rules.
//!
//! These checks run on rows already locked by the caller's transaction, so
//! their outcome holds until that transaction commits or rolls back.

use std::collections::{HashMap, HashSet};

use crate::errors::{join_ids, FieldViolation, InventoryError};
use crate::models::{AssetStatus, AssetSummary, PartyRef};

/// An asset row read under `FOR UPDATE`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LockedAsset {
    pub id: i64,
    pub code: String,
    pub name: String,
    pub status: AssetStatus,
}

impl LockedAsset {
    pub fn summary(&self) -> AssetSummary {
        AssetSummary {
            id: self.id,
            code: self.code.clone(),
            name: self.name.clone(),
        }
    }

    fn describe(&self) -> String {
        format!("Asset {} ({})", self.id, self.summary().label())
    }
}

/// Current holders keyed by asset id. Absent ids are unassigned.
pub type HolderMap = HashMap<i64, PartyRef>;

/// Why an asset cannot take part in a ledger operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HolderViolation {
    NotAssigned { asset: LockedAsset },
    HeldByOther { asset: LockedAsset, holder: PartyRef, claimed: PartyRef },
    AlreadyAssigned { asset: LockedAsset, holder: PartyRef },
    Inactive { asset: LockedAsset },
}

impl HolderViolation {
    pub fn asset_id(&self) -> i64 {
        match self {
            HolderViolation::NotAssigned { asset }
            | HolderViolation::HeldByOther { asset, .. }
            | HolderViolation::AlreadyAssigned { asset, .. }
            | HolderViolation::Inactive { asset } => asset.id,
        }
    }

    pub fn message(&self) -> String {
        match self {
            HolderViolation::NotAssigned { asset } => {
                format!("{} is not currently assigned", asset.describe())
            }
            HolderViolation::HeldByOther {
                asset,
                holder,
                claimed,
            } => format!(
                "{} is assigned to {}, not {}",
                asset.describe(),
                holder.display_name,
                claimed.display_name
            ),
            HolderViolation::AlreadyAssigned { asset, holder } => format!(
                "{} is already assigned to {}",
                asset.describe(),
                holder.display_name
            ),
            HolderViolation::Inactive { asset } => {
                format!("{} is inactive and cannot be assigned", asset.describe())
            }
        }
    }
}

/// Folds violations into one validation error on the `assets` field.
pub fn into_error(violations: Vec<HolderViolation>, headline: &str) -> InventoryError {
    let ids: Vec<i64> = violations.iter().map(HolderViolation::asset_id).collect();
    let message = if violations.len() == 1 {
        violations[0].message()
    } else {
        format!("{}: {}", headline, join_ids(&ids))
    };
    InventoryError::Validation {
        message,
        violations: violations
            .iter()
            .map(|v| FieldViolation::new("assets", v.message()))
            .collect(),
    }
}

/// Removes repeated ids, keeping the first occurrence order.
pub fn dedupe_asset_ids(ids: &[i64]) -> Vec<i64> {
    let mut seen = HashSet::with_capacity(ids.len());
    ids.iter().copied().filter(|id| seen.insert(*id)).collect()
}

/// Rejects an empty batch or one larger than `max`.
pub fn ensure_batch_size(ids: &[i64], max: usize) -> Result<(), InventoryError> {
    if ids.is_empty() {
        return Err(InventoryError::invalid(
            "assets",
            "At least one asset is required",
        ));
    }
    if ids.len() > max {
        return Err(InventoryError::invalid(
            "assets",
            format!("At most {} assets can be processed at once", max),
        ));
    }
    Ok(())
}

/// Orders `locked` as `requested`, failing with every id that does not exist.
pub fn resolve_requested(
    requested: &[i64],
    locked: Vec<LockedAsset>,
) -> Result<Vec<LockedAsset>, InventoryError> {
    let mut by_id: HashMap<i64, LockedAsset> = locked.into_iter().map(|a| (a.id, a)).collect();
    let mut missing = Vec::new();
    let mut ordered = Vec::with_capacity(requested.len());

    for id in requested {
        match by_id.remove(id) {
            Some(asset) => ordered.push(asset),
            None => missing.push(*id),
        }
    }

    match missing.len() {
        0 => Ok(ordered),
        1 => Err(InventoryError::NotFound(format!("Asset {}", missing[0]))),
        _ => Err(InventoryError::NotFound(format!(
            "Assets {}",
            join_ids(&missing)
        ))),
    }
}

/// Every asset must currently be held by `claimed`.
///
/// All offending assets are reported together.
pub fn check_reception_holders(
    claimed: &PartyRef,
    assets: &[LockedAsset],
    holders: &HolderMap,
) -> Result<(), InventoryError> {
    let violations: Vec<HolderViolation> = assets
        .iter()
        .filter_map(|asset| match holders.get(&asset.id) {
            None => Some(HolderViolation::NotAssigned {
                asset: asset.clone(),
            }),
            Some(holder) if holder.id != claimed.id => Some(HolderViolation::HeldByOther {
                asset: asset.clone(),
                holder: holder.clone(),
                claimed: claimed.clone(),
            }),
            Some(_) => None,
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(into_error(violations, "These assets cannot be received"))
    }
}

/// Every asset must be active and currently unassigned.
pub fn check_assignable(assets: &[LockedAsset], holders: &HolderMap) -> Result<(), InventoryError> {
    let violations: Vec<HolderViolation> = assets
        .iter()
        .filter_map(|asset| {
            if asset.status == AssetStatus::Inactive {
                return Some(HolderViolation::Inactive {
                    asset: asset.clone(),
                });
            }
            holders
                .get(&asset.id)
                .map(|holder| HolderViolation::AlreadyAssigned {
                    asset: asset.clone(),
                    holder: holder.clone(),
                })
        })
        .collect();

    if violations.is_empty() {
        Ok(())
    } else {
        Err(into_error(violations, "These assets cannot be assigned"))
    }
}
