//! Assignment processor.
//!
//! Hands a batch of unassigned, active assets to one responsible. Locks are
//! taken in the same order as receptions so overlapping batches queue instead
//! of deadlocking.

use std::sync::Arc;

use domain::models::{AssignmentView, CreateAssignmentRequest, CurrentHolding};
use domain::services::{
    append_best_effort, audit_helpers, check_assignable, dedupe_asset_ids, ensure_batch_size,
    AuditSink,
};
use domain::InventoryError;
use persistence::repositories::{AssetRepository, AssignmentRepository, DirectoryRepository};
use shared::validation::normalize_text;
use sqlx::PgPool;
use tracing::info;
use validator::Validate;

use crate::config::LedgerConfig;
use crate::services::ledger::{begin, lock_requested, observe, resolve_parties};

pub struct AssignmentProcessor {
    pool: PgPool,
    config: LedgerConfig,
    audit: Arc<dyn AuditSink>,
    assignments: AssignmentRepository,
    assets: AssetRepository,
    directory: DirectoryRepository,
}

impl AssignmentProcessor {
    pub fn new(pool: PgPool, config: &LedgerConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            assignments: AssignmentRepository::new(pool.clone()),
            assets: AssetRepository::new(pool.clone()),
            directory: DirectoryRepository::new(pool.clone()),
            config: config.clone(),
            audit,
            pool,
        }
    }

    /// Assign every requested asset to the responsible, or none of them.
    pub async fn create(
        &self,
        request: CreateAssignmentRequest,
        actor: &str,
    ) -> Result<AssignmentView, InventoryError> {
        let result = self.create_in_tx(request).await;
        observe("assignment.create", &result, |view| view.assets.len());
        let view = result?;

        info!(
            assignment_id = view.id,
            responsible_id = view.responsible.id,
            assets = view.assets.len(),
            "Assignment created"
        );
        append_best_effort(
            self.audit.as_ref(),
            audit_helpers::assignment_created(&view, actor),
        )
        .await;

        Ok(view)
    }

    async fn create_in_tx(
        &self,
        request: CreateAssignmentRequest,
    ) -> Result<AssignmentView, InventoryError> {
        let request = CreateAssignmentRequest {
            category: normalize_text(Some(&request.category)).unwrap_or_default(),
            ..request
        };
        request.validate()?;
        let ids = dedupe_asset_ids(&request.assets);
        ensure_batch_size(&ids, self.config.max_assets_per_batch)?;

        let mut tx = begin(&self.pool, &self.config).await?;

        resolve_parties(
            &self.directory,
            &mut *tx,
            request.responsible_id,
            request.area_id,
        )
        .await?;

        let locked = lock_requested(&self.assets, &mut *tx, &ids).await?;
        let holders = self
            .assignments
            .lookup_current_holders(&mut *tx, &ids)
            .await?;
        check_assignable(&locked, &holders)?;

        let assignment_id = self
            .assignments
            .create_batch(
                &mut *tx,
                request.responsible_id,
                request.area_id,
                request.assigned_on,
                &request.category,
                &ids,
            )
            .await?;
        self.assignments
            .assign(&mut *tx, &ids, request.responsible_id, assignment_id)
            .await?;

        let view = self
            .assignments
            .load_views(&mut *tx, Some(assignment_id))
            .await?
            .pop()
            .ok_or_else(|| InventoryError::NotFound(format!("Assignment {}", assignment_id)))?;

        tx.commit().await?;
        Ok(view)
    }

    /// Assignment batches, latest date first.
    pub async fn list(&self) -> Result<Vec<AssignmentView>, InventoryError> {
        Ok(self.assignments.list().await?)
    }

    /// Who holds what right now.
    pub async fn current_holdings(
        &self,
        responsible_id: Option<i64>,
    ) -> Result<Vec<CurrentHolding>, InventoryError> {
        Ok(self
            .assignments
            .current_holdings(responsible_id)
            .await?
            .into_iter()
            .map(CurrentHolding::from)
            .collect())
    }
}
