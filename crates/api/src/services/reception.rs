//! Reception processor.
//!
//! A reception records assets returned by their current holder. Each mutation
//! runs in one transaction that:
//! 1. Locks the asset rows (by ascending id), then the current-holder rows
//! 2. Checks every asset against the claimed holder
//! 3. Writes the reception and clears the holders
//!
//! The movement entry is appended after commit and never changes the outcome.

use std::sync::Arc;

use domain::models::{
    CreateReceptionRequest, DeleteReceptionResponse, ReceptionView, UpdateReceptionRequest,
};
use domain::services::{
    append_best_effort, audit_helpers, check_reception_holders, dedupe_asset_ids, diff_metadata,
    ensure_asset_set_unchanged, ensure_batch_size, AuditSink,
};
use domain::InventoryError;
use persistence::repositories::{
    AssetRepository, AssignmentRepository, DirectoryRepository, ReceptionRepository,
};
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::config::LedgerConfig;
use crate::services::ledger::{begin, lock_requested, normalize_metadata, observe, resolve_parties};

/// Creates, edits and removes receptions against the assignment ledger.
pub struct ReceptionProcessor {
    pool: PgPool,
    config: LedgerConfig,
    audit: Arc<dyn AuditSink>,
    receptions: ReceptionRepository,
    assignments: AssignmentRepository,
    assets: AssetRepository,
    directory: DirectoryRepository,
}

fn reception_not_found(id: i64) -> InventoryError {
    InventoryError::NotFound(format!("Reception {}", id))
}

impl ReceptionProcessor {
    pub fn new(pool: PgPool, config: &LedgerConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            receptions: ReceptionRepository::new(pool.clone()),
            assignments: AssignmentRepository::new(pool.clone()),
            assets: AssetRepository::new(pool.clone()),
            directory: DirectoryRepository::new(pool.clone()),
            config: config.clone(),
            audit,
            pool,
        }
    }

    /// Register the return of assets held by the request's responsible.
    ///
    /// Either every asset is received and unassigned, or nothing changes.
    pub async fn create(
        &self,
        request: CreateReceptionRequest,
        actor: &str,
    ) -> Result<ReceptionView, InventoryError> {
        let result = self.create_in_tx(request).await;
        observe("reception.create", &result, |view| view.assets.len());
        let view = result?;

        info!(
            reception_id = view.id,
            responsible_id = view.responsible.id,
            assets = view.assets.len(),
            "Reception created"
        );
        append_best_effort(
            self.audit.as_ref(),
            audit_helpers::reception_created(&view, actor),
        )
        .await;

        Ok(view)
    }

    async fn create_in_tx(
        &self,
        request: CreateReceptionRequest,
    ) -> Result<ReceptionView, InventoryError> {
        request.validate()?;
        let ids = dedupe_asset_ids(&request.assets);
        ensure_batch_size(&ids, self.config.max_assets_per_batch)?;
        let metadata = normalize_metadata(request.metadata());

        let mut tx = begin(&self.pool, &self.config).await?;

        let (responsible, _area) = resolve_parties(
            &self.directory,
            &mut *tx,
            metadata.responsible_id,
            metadata.area_id,
        )
        .await?;

        let locked = lock_requested(&self.assets, &mut *tx, &ids).await?;
        let holders = self
            .assignments
            .lookup_current_holders(&mut *tx, &ids)
            .await?;
        check_reception_holders(&responsible, &locked, &holders)?;

        let reception_id = self.receptions.insert(&mut *tx, &metadata).await?;
        self.receptions
            .attach_assets(&mut *tx, reception_id, &ids)
            .await?;
        self.assignments.clear_assignments(&mut *tx, &ids).await?;

        let view = self
            .receptions
            .find_view(&mut *tx, reception_id)
            .await?
            .ok_or_else(|| reception_not_found(reception_id))?;

        tx.commit().await?;
        Ok(view)
    }

    /// Edit the metadata of a reception.
    ///
    /// The request must resubmit exactly the stored asset set; order and
    /// repetition are ignored.
    pub async fn update(
        &self,
        id: i64,
        request: UpdateReceptionRequest,
        actor: &str,
    ) -> Result<ReceptionView, InventoryError> {
        let result = self.update_in_tx(id, request).await;
        observe("reception.update", &result, |(_, after)| after.assets.len());
        let (before, after) = result?;

        let changes = diff_metadata(&before, &after);
        info!(reception_id = id, changes = changes.len(), "Reception updated");
        append_best_effort(
            self.audit.as_ref(),
            audit_helpers::reception_updated(&after, &changes, actor),
        )
        .await;

        Ok(after)
    }

    async fn update_in_tx(
        &self,
        id: i64,
        request: UpdateReceptionRequest,
    ) -> Result<(ReceptionView, ReceptionView), InventoryError> {
        request.validate()?;
        let submitted = dedupe_asset_ids(&request.assets);
        let metadata = normalize_metadata(request.metadata());

        let mut tx = begin(&self.pool, &self.config).await?;

        if !self.receptions.lock_by_id(&mut *tx, id).await? {
            return Err(reception_not_found(id));
        }
        let stored = self.receptions.asset_ids(&mut *tx, id).await?;
        ensure_asset_set_unchanged(id, &stored, &submitted)?;

        resolve_parties(
            &self.directory,
            &mut *tx,
            metadata.responsible_id,
            metadata.area_id,
        )
        .await?;

        let before = self
            .receptions
            .find_view(&mut *tx, id)
            .await?
            .ok_or_else(|| reception_not_found(id))?;

        self.assets.lock_assets(&mut *tx, &stored).await?;
        self.receptions
            .update_metadata(&mut *tx, id, &metadata)
            .await?;

        let after = self
            .receptions
            .find_view(&mut *tx, id)
            .await?
            .ok_or_else(|| reception_not_found(id))?;

        tx.commit().await?;
        Ok((before, after))
    }

    /// Remove a reception. Its assets stay unassigned.
    pub async fn delete(
        &self,
        id: i64,
        actor: &str,
    ) -> Result<DeleteReceptionResponse, InventoryError> {
        let result = self.delete_in_tx(id).await;
        observe("reception.delete", &result, |view| view.assets.len());
        let view = result?;

        info!(reception_id = id, "Reception deleted");
        append_best_effort(
            self.audit.as_ref(),
            audit_helpers::reception_deleted(&view, actor),
        )
        .await;

        Ok(DeleteReceptionResponse {
            message: format!("Reception {} deleted", id),
        })
    }

    async fn delete_in_tx(&self, id: i64) -> Result<ReceptionView, InventoryError> {
        let mut tx = begin(&self.pool, &self.config).await?;

        if !self.receptions.lock_by_id(&mut *tx, id).await? {
            return Err(reception_not_found(id));
        }
        let stored = self.receptions.asset_ids(&mut *tx, id).await?;
        self.assets.lock_assets(&mut *tx, &stored).await?;

        let view = self
            .receptions
            .find_view(&mut *tx, id)
            .await?
            .ok_or_else(|| reception_not_found(id))?;

        if self.receptions.delete(&mut *tx, id).await? == 0 {
            return Err(reception_not_found(id));
        }

        tx.commit().await?;
        Ok(view)
    }

    /// All receptions, latest return date first.
    pub async fn list(&self) -> Result<Vec<ReceptionView>, InventoryError> {
        Ok(self.receptions.list().await?)
    }

    pub async fn get(&self, id: i64) -> Result<ReceptionView, InventoryError> {
        self.receptions
            .get(id)
            .await?
            .ok_or_else(|| reception_not_found(id))
    }
}
