//! Asset registry.

use std::sync::Arc;

use chrono::{Datelike, Utc};
use domain::models::{Asset, AssetCategory, CreateAssetRequest, ListAssetsQuery, UpdateAssetRequest};
use domain::services::{append_best_effort, audit_helpers, AuditSink};
use domain::InventoryError;
use persistence::repositories::AssetRepository;
use sqlx::{PgConnection, PgPool};
use tracing::info;

use crate::config::LedgerConfig;
use crate::services::ledger::begin;

fn asset_not_found(id: i64) -> InventoryError {
    InventoryError::NotFound(format!("Asset {}", id))
}

pub struct AssetRegistry {
    pool: PgPool,
    config: LedgerConfig,
    audit: Arc<dyn AuditSink>,
    assets: AssetRepository,
}

impl AssetRegistry {
    pub fn new(pool: PgPool, config: &LedgerConfig, audit: Arc<dyn AuditSink>) -> Self {
        Self {
            assets: AssetRepository::new(pool.clone()),
            config: config.clone(),
            audit,
            pool,
        }
    }

    async fn ensure_serial_free(
        &self,
        conn: &mut PgConnection,
        category: AssetCategory,
        serial_number: Option<&str>,
        exclude_id: Option<i64>,
    ) -> Result<(), InventoryError> {
        let Some(serial) = serial_number else {
            return Ok(());
        };
        if self
            .assets
            .serial_taken(conn, category, serial, exclude_id)
            .await?
        {
            return Err(InventoryError::Conflict(format!(
                "Serial number {} is already registered for {}",
                serial,
                category.label()
            )));
        }
        Ok(())
    }

    /// Register an asset and give it the next code of its category.
    pub async fn register(
        &self,
        request: CreateAssetRequest,
        actor: &str,
    ) -> Result<Asset, InventoryError> {
        let now = Utc::now();
        let registration = request.into_registration(now.date_naive())?;

        let mut tx = begin(&self.pool, &self.config).await?;
        self.ensure_serial_free(
            &mut *tx,
            registration.category,
            registration.details.serial_number.as_deref(),
            None,
        )
        .await?;

        let code = self
            .assets
            .allocate_code(&mut *tx, registration.category, now.year())
            .await?;
        let asset: Asset = self
            .assets
            .create(&mut *tx, &registration, &code)
            .await?
            .into();
        tx.commit().await?;

        info!(asset_id = asset.id, code = %asset.code, "Asset registered");
        append_best_effort(
            self.audit.as_ref(),
            audit_helpers::asset_registered(&asset, actor),
        )
        .await;

        Ok(asset)
    }

    /// Apply a partial update. A new category means a new code.
    pub async fn update(
        &self,
        id: i64,
        request: UpdateAssetRequest,
        actor: &str,
    ) -> Result<Asset, InventoryError> {
        let now = Utc::now();
        let mut tx = begin(&self.pool, &self.config).await?;

        let current: Asset = self
            .assets
            .lock_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| asset_not_found(id))?
            .into();
        let revision = request.revise(&current, now)?;

        self.ensure_serial_free(
            &mut *tx,
            revision.category,
            revision.details.serial_number.as_deref(),
            Some(id),
        )
        .await?;

        let code = if revision.category_changed {
            self.assets
                .allocate_code(&mut *tx, revision.category, now.year())
                .await?
        } else {
            current.code.clone()
        };

        let asset: Asset = self
            .assets
            .update(&mut *tx, id, &code, &revision)
            .await?
            .into();
        tx.commit().await?;

        info!(
            asset_id = id,
            code = %asset.code,
            status = %asset.status,
            "Asset updated"
        );
        append_best_effort(
            self.audit.as_ref(),
            audit_helpers::asset_updated(&asset, revision.transition, actor),
        )
        .await;

        Ok(asset)
    }

    pub async fn get(&self, id: i64) -> Result<Asset, InventoryError> {
        self.assets
            .find_by_id(id)
            .await?
            .map(Asset::from)
            .ok_or_else(|| asset_not_found(id))
    }

    pub async fn list(&self, query: &ListAssetsQuery) -> Result<Vec<Asset>, InventoryError> {
        Ok(self
            .assets
            .list(query)
            .await?
            .into_iter()
            .map(Asset::from)
            .collect())
    }

    /// Decommissioned assets, most recent first.
    pub async fn list_inactive(&self) -> Result<Vec<Asset>, InventoryError> {
        Ok(self
            .assets
            .list_inactive()
            .await?
            .into_iter()
            .map(Asset::from)
            .collect())
    }

    /// Delete an asset that never entered the ledger.
    pub async fn delete(&self, id: i64, actor: &str) -> Result<Asset, InventoryError> {
        let mut tx = begin(&self.pool, &self.config).await?;

        let asset: Asset = self
            .assets
            .lock_by_id(&mut *tx, id)
            .await?
            .ok_or_else(|| asset_not_found(id))?
            .into();

        if self.assets.is_referenced(&mut *tx, id).await? {
            return Err(InventoryError::Conflict(format!(
                "Asset {} has assignment or reception history and cannot be deleted",
                asset.code
            )));
        }
        self.assets.delete(&mut *tx, id).await?;
        tx.commit().await?;

        info!(asset_id = id, code = %asset.code, "Asset deleted");
        append_best_effort(
            self.audit.as_ref(),
            audit_helpers::asset_deleted(&asset, actor),
        )
        .await;

        Ok(asset)
    }
}
