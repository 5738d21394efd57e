//! Asset repository for database operations.

use std::collections::HashMap;

use chrono::Utc;
use domain::models::{AssetCategory, AssetRegistration, AssetRevision, AssetStatus, AssetSummary, ListAssetsQuery};
use domain::services::{code_pattern, next_asset_code};
use sqlx::{PgConnection, PgPool};

use crate::entities::{AssetCategoryDb, AssetEntity, AssetStatusDb, BatchAssetEntity, LockedAssetEntity};
use crate::metrics::QueryTimer;

const ASSET_COLUMNS: &str = r#"
    id, code, name, description, category, brand, model, serial_number, dimensions, color,
    is_donated, status, decommission_reason, intake_date, decommissioned_at, location_area_id,
    created_at, updated_at
"#;

/// Builds the WHERE clause for asset listings, tracking parameter positions.
struct AssetFilterBuilder {
    conditions: Vec<String>,
}

impl AssetFilterBuilder {
    fn build(query: &ListAssetsQuery) -> Self {
        let mut conditions = vec!["TRUE".to_string()];
        let mut param_count = 0;

        if query.category.is_some() {
            param_count += 1;
            conditions.push(format!("category = ${}", param_count));
        }

        if query.status.is_some() {
            param_count += 1;
            conditions.push(format!("status = ${}", param_count));
        }

        if search_term(query).is_some() {
            param_count += 1;
            conditions.push(format!(
                "(code ILIKE ${p} OR name ILIKE ${p} OR brand ILIKE ${p} \
                 OR model ILIKE ${p} OR serial_number ILIKE ${p})",
                p = param_count
            ));
        }

        Self { conditions }
    }

    fn where_clause(&self) -> String {
        self.conditions.join(" AND ")
    }
}

fn search_term(query: &ListAssetsQuery) -> Option<String> {
    query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(|q| format!("%{}%", q))
}

/// Groups batch asset rows by batch id, keeping row order.
pub(crate) fn group_by_batch(rows: Vec<BatchAssetEntity>) -> HashMap<i64, Vec<AssetSummary>> {
    let mut grouped: HashMap<i64, Vec<AssetSummary>> = HashMap::new();
    for row in rows {
        grouped.entry(row.batch_id).or_default().push(row.into());
    }
    grouped
}

/// Repository for asset registry database operations.
#[derive(Clone)]
pub struct AssetRepository {
    pool: PgPool,
}

impl AssetRepository {
    /// Creates a new AssetRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Reserves the next code for `category` in `year`.
    ///
    /// Takes a transaction-scoped advisory lock on `<prefix>-<year>`, so
    /// concurrent registrations of the same category and year are serialized
    /// until commit.
    pub async fn allocate_code(
        &self,
        conn: &mut PgConnection,
        category: AssetCategory,
        year: i32,
    ) -> Result<String, sqlx::Error> {
        let timer = QueryTimer::new("allocate_asset_code");

        sqlx::query("SELECT pg_advisory_xact_lock(hashtext($1))")
            .bind(format!("{}-{}", category.code_prefix(), year))
            .execute(&mut *conn)
            .await?;

        let last: Option<i32> = sqlx::query_scalar(
            r#"
            SELECT MAX(CAST(split_part(code, '-', 4) AS INTEGER))
            FROM assets
            WHERE code LIKE $1 AND split_part(code, '-', 4) ~ '^[0-9]+$'
            "#,
        )
        .bind(code_pattern(category, year))
        .fetch_one(&mut *conn)
        .await?;

        timer.record();
        Ok(next_asset_code(category, year, last))
    }

    /// Whether another asset of `category` already uses `serial_number`.
    pub async fn serial_taken(
        &self,
        conn: &mut PgConnection,
        category: AssetCategory,
        serial_number: &str,
        exclude_id: Option<i64>,
    ) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (
                SELECT 1 FROM assets
                WHERE category = $1 AND serial_number = $2 AND ($3::bigint IS NULL OR id <> $3)
            )
            "#,
        )
        .bind(AssetCategoryDb::from(category))
        .bind(serial_number)
        .bind(exclude_id)
        .fetch_one(conn)
        .await
    }

    /// Insert a registered asset with its generated code.
    pub async fn create(
        &self,
        conn: &mut PgConnection,
        asset: &AssetRegistration,
        code: &str,
    ) -> Result<AssetEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_asset");
        let query = format!(
            r#"
            INSERT INTO assets (
                code, name, description, category, brand, model, serial_number, dimensions,
                color, is_donated, status, intake_date, location_area_id
            )
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'active', $11, $12)
            RETURNING {}
            "#,
            ASSET_COLUMNS
        );
        let result = sqlx::query_as::<_, AssetEntity>(&query)
            .bind(code)
            .bind(&asset.name)
            .bind(&asset.description)
            .bind(AssetCategoryDb::from(asset.category))
            .bind(&asset.details.brand)
            .bind(&asset.details.model)
            .bind(&asset.details.serial_number)
            .bind(&asset.details.dimensions)
            .bind(&asset.details.color)
            .bind(asset.is_donated)
            .bind(asset.intake_date)
            .bind(asset.location_area_id)
            .fetch_one(conn)
            .await;
        timer.record();
        result
    }

    /// Lock the asset rows for `ids`, ordered by id.
    ///
    /// Ids with no row are simply absent from the result.
    pub async fn lock_assets(
        &self,
        conn: &mut PgConnection,
        ids: &[i64],
    ) -> Result<Vec<LockedAssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("lock_assets");
        let result = sqlx::query_as::<_, LockedAssetEntity>(
            r#"
            SELECT id, code, name, status
            FROM assets
            WHERE id = ANY($1)
            ORDER BY id
            FOR UPDATE
            "#,
        )
        .bind(ids)
        .fetch_all(conn)
        .await;
        timer.record();
        result
    }

    /// Lock one asset row and read all of it.
    pub async fn lock_by_id(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<AssetEntity>, sqlx::Error> {
        let query = format!("SELECT {} FROM assets WHERE id = $1 FOR UPDATE", ASSET_COLUMNS);
        sqlx::query_as::<_, AssetEntity>(&query)
            .bind(id)
            .fetch_optional(conn)
            .await
    }

    /// Find an asset by ID.
    pub async fn find_by_id(&self, id: i64) -> Result<Option<AssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("find_asset_by_id");
        let query = format!("SELECT {} FROM assets WHERE id = $1", ASSET_COLUMNS);
        let result = sqlx::query_as::<_, AssetEntity>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await;
        timer.record();
        result
    }

    /// List assets matching the filters, newest first.
    pub async fn list(&self, query: &ListAssetsQuery) -> Result<Vec<AssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_assets");
        let filter = AssetFilterBuilder::build(query);
        let sql = format!(
            "SELECT {} FROM assets WHERE {} ORDER BY id DESC",
            ASSET_COLUMNS,
            filter.where_clause()
        );

        let mut builder = sqlx::query_as::<_, AssetEntity>(&sql);
        if let Some(category) = query.category {
            builder = builder.bind(AssetCategoryDb::from(category));
        }
        if let Some(status) = query.status {
            builder = builder.bind(AssetStatusDb::from(status));
        }
        if let Some(term) = search_term(query) {
            builder = builder.bind(term);
        }

        let result = builder.fetch_all(&self.pool).await;
        timer.record();
        result
    }

    /// Inactive assets, most recently decommissioned first.
    pub async fn list_inactive(&self) -> Result<Vec<AssetEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_inactive_assets");
        let query = format!(
            r#"
            SELECT {} FROM assets
            WHERE status = $1
            ORDER BY decommissioned_at DESC NULLS LAST, id DESC
            "#,
            ASSET_COLUMNS
        );
        let result = sqlx::query_as::<_, AssetEntity>(&query)
            .bind(AssetStatusDb::from(AssetStatus::Inactive))
            .fetch_all(&self.pool)
            .await;
        timer.record();
        result
    }

    /// Write the full revised state of a locked asset.
    pub async fn update(
        &self,
        conn: &mut PgConnection,
        id: i64,
        code: &str,
        revision: &AssetRevision,
    ) -> Result<AssetEntity, sqlx::Error> {
        let timer = QueryTimer::new("update_asset");
        let query = format!(
            r#"
            UPDATE assets SET
                code = $2, name = $3, description = $4, category = $5, brand = $6, model = $7,
                serial_number = $8, dimensions = $9, color = $10, is_donated = $11,
                intake_date = $12, location_area_id = $13, status = $14,
                decommission_reason = $15, decommissioned_at = $16, updated_at = $17
            WHERE id = $1
            RETURNING {}
            "#,
            ASSET_COLUMNS
        );
        let result = sqlx::query_as::<_, AssetEntity>(&query)
            .bind(id)
            .bind(code)
            .bind(&revision.name)
            .bind(&revision.description)
            .bind(AssetCategoryDb::from(revision.category))
            .bind(&revision.details.brand)
            .bind(&revision.details.model)
            .bind(&revision.details.serial_number)
            .bind(&revision.details.dimensions)
            .bind(&revision.details.color)
            .bind(revision.is_donated)
            .bind(revision.intake_date)
            .bind(revision.location_area_id)
            .bind(AssetStatusDb::from(revision.status))
            .bind(&revision.decommission_reason)
            .bind(revision.decommissioned_at)
            .bind(Utc::now())
            .fetch_one(conn)
            .await;
        timer.record();
        result
    }

    /// Whether the asset is held or appears in any assignment or reception.
    pub async fn is_referenced(&self, conn: &mut PgConnection, id: i64) -> Result<bool, sqlx::Error> {
        sqlx::query_scalar(
            r#"
            SELECT EXISTS (SELECT 1 FROM current_assignments WHERE asset_id = $1)
                OR EXISTS (SELECT 1 FROM assignment_assets WHERE asset_id = $1)
                OR EXISTS (SELECT 1 FROM reception_assets WHERE asset_id = $1)
            "#,
        )
        .bind(id)
        .fetch_one(conn)
        .await
    }

    /// Delete an asset. Returns the number of rows removed.
    pub async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_asset");
        let result = sqlx::query("DELETE FROM assets WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }
}
