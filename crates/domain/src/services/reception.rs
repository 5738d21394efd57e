//! Reception rules: asset-set immutability and metadata diffs.

use std::collections::BTreeSet;
use std::fmt;

use crate::errors::InventoryError;
use crate::models::ReceptionView;
use crate::services::audit::NOT_AVAILABLE;

/// Rejects a resubmitted asset set that differs from the stored one.
///
/// Order and repetition are ignored.
pub fn ensure_asset_set_unchanged(
    reception_id: i64,
    stored: &[i64],
    submitted: &[i64],
) -> Result<(), InventoryError> {
    let stored: BTreeSet<i64> = stored.iter().copied().collect();
    let submitted: BTreeSet<i64> = submitted.iter().copied().collect();

    if stored == submitted {
        return Ok(());
    }

    Err(InventoryError::ImmutableAssetSet {
        reception_id,
        added: submitted.difference(&stored).copied().collect(),
        removed: stored.difference(&submitted).copied().collect(),
    })
}

/// One changed metadata field, rendered as `Field: before → after`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MetadataChange {
    pub field: &'static str,
    pub before: String,
    pub after: String,
}

impl fmt::Display for MetadataChange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {} → {}", self.field, self.before, self.after)
    }
}

fn category_text(category: Option<&str>) -> String {
    category
        .filter(|c| !c.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

/// Field-by-field differences between two states of the same reception.
pub fn diff_metadata(before: &ReceptionView, after: &ReceptionView) -> Vec<MetadataChange> {
    let mut changes = Vec::new();

    if before.responsible.id != after.responsible.id {
        changes.push(MetadataChange {
            field: "Responsible",
            before: before.responsible.display_name.clone(),
            after: after.responsible.display_name.clone(),
        });
    }
    if before.area.id != after.area.id {
        changes.push(MetadataChange {
            field: "Area",
            before: before.area.name.clone(),
            after: after.area.name.clone(),
        });
    }
    if before.returned_on != after.returned_on {
        changes.push(MetadataChange {
            field: "Date",
            before: before.returned_on.to_string(),
            after: after.returned_on.to_string(),
        });
    }

    let (old_category, new_category) = (
        category_text(before.category.as_deref()),
        category_text(after.category.as_deref()),
    );
    if old_category != new_category {
        changes.push(MetadataChange {
            field: "Category",
            before: old_category,
            after: new_category,
        });
    }

    changes
}
