//! Transaction plumbing shared by the ledger processors.

use domain::models::{AreaRef, PartyRef, ReceptionMetadata};
use domain::services::{resolve_requested, LockedAsset};
use domain::InventoryError;
use persistence::db::set_lock_timeout;
use persistence::repositories::{AssetRepository, DirectoryRepository};
use shared::validation::normalize_text;
use sqlx::{PgConnection, PgPool, Postgres, Transaction};

use crate::config::LedgerConfig;
use crate::middleware::metrics::{record_ledger_operation, record_ledger_rejection};

/// Open a transaction whose lock waits are bounded by `lock_timeout_ms`.
pub async fn begin(
    pool: &PgPool,
    config: &LedgerConfig,
) -> Result<Transaction<'static, Postgres>, InventoryError> {
    let mut tx = pool.begin().await?;
    set_lock_timeout(&mut *tx, config.lock_timeout_ms).await?;
    Ok(tx)
}

/// Resolve the responsible and area named by a batch.
pub async fn resolve_parties(
    directory: &DirectoryRepository,
    conn: &mut PgConnection,
    responsible_id: i64,
    area_id: i64,
) -> Result<(PartyRef, AreaRef), InventoryError> {
    let responsible = directory
        .find_responsible(&mut *conn, responsible_id)
        .await?
        .ok_or_else(|| InventoryError::NotFound(format!("Responsible {}", responsible_id)))?;
    let area = directory
        .find_area(&mut *conn, area_id)
        .await?
        .ok_or_else(|| InventoryError::NotFound(format!("Area {}", area_id)))?;
    Ok((responsible, area))
}

/// Lock the asset rows for `ids` and return them in request order.
pub async fn lock_requested(
    assets: &AssetRepository,
    conn: &mut PgConnection,
    ids: &[i64],
) -> Result<Vec<LockedAsset>, InventoryError> {
    let locked = assets
        .lock_assets(conn, ids)
        .await?
        .into_iter()
        .map(LockedAsset::from)
        .collect();
    resolve_requested(ids, locked)
}

/// Trim the free-text category; blank becomes absent.
pub fn normalize_metadata(mut metadata: ReceptionMetadata) -> ReceptionMetadata {
    metadata.category = normalize_text(metadata.category.as_deref());
    metadata
}

fn rejection_reason(err: &InventoryError) -> &'static str {
    match err {
        InventoryError::Validation { .. } => "validation",
        InventoryError::ImmutableAssetSet { .. } => "immutable_asset_set",
        InventoryError::NotFound(_) => "not_found",
        InventoryError::Conflict(_) => "conflict",
        InventoryError::Transient(_) => "transient",
        InventoryError::Database(_) => "database",
    }
}

/// Count the outcome of a ledger operation.
pub fn observe<T>(
    operation: &'static str,
    result: &Result<T, InventoryError>,
    asset_count: impl Fn(&T) -> usize,
) {
    match result {
        Ok(value) => record_ledger_operation(operation, asset_count(value)),
        Err(err) => {
            tracing::info!(operation, error = %err, "Ledger operation rejected");
            record_ledger_rejection(operation, rejection_reason(err));
        }
    }
}
