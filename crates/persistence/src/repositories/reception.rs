//! Reception repository for database operations.

use chrono::Utc;
use domain::models::{ReceptionMetadata, ReceptionView};
use sqlx::{PgConnection, PgPool};

use crate::entities::{BatchAssetEntity, ReceptionRowEntity};
use crate::metrics::QueryTimer;
use crate::repositories::asset::group_by_batch;
use crate::repositories::assignment::positions;

/// Repository for reception database operations.
#[derive(Clone)]
pub struct ReceptionRepository {
    pool: PgPool,
}

impl ReceptionRepository {
    /// Creates a new ReceptionRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a reception. Returns its id.
    pub async fn insert(
        &self,
        conn: &mut PgConnection,
        metadata: &ReceptionMetadata,
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("insert_reception");
        let result: Result<i64, sqlx::Error> = sqlx::query_scalar(
            r#"
            INSERT INTO receptions (responsible_id, area_id, returned_on, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(metadata.responsible_id)
        .bind(metadata.area_id)
        .bind(metadata.returned_on)
        .bind(&metadata.category)
        .fetch_one(conn)
        .await;
        timer.record();
        result
    }

    /// Attach the ordered asset list to a new reception.
    pub async fn attach_assets(
        &self,
        conn: &mut PgConnection,
        reception_id: i64,
        ids: &[i64],
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO reception_assets (reception_id, asset_id, position)
            SELECT $1, a.asset_id, a.position
            FROM UNNEST($2::bigint[], $3::int[]) AS a(asset_id, position)
            "#,
        )
        .bind(reception_id)
        .bind(ids)
        .bind(positions(ids))
        .execute(conn)
        .await?;
        Ok(())
    }

    /// Lock a reception row. Returns false if it does not exist.
    pub async fn lock_by_id(&self, conn: &mut PgConnection, id: i64) -> Result<bool, sqlx::Error> {
        let found: Option<i64> =
            sqlx::query_scalar("SELECT id FROM receptions WHERE id = $1 FOR UPDATE")
                .bind(id)
                .fetch_optional(conn)
                .await?;
        Ok(found.is_some())
    }

    /// Asset ids attached to a reception, in batch order.
    pub async fn asset_ids(
        &self,
        conn: &mut PgConnection,
        reception_id: i64,
    ) -> Result<Vec<i64>, sqlx::Error> {
        sqlx::query_scalar(
            "SELECT asset_id FROM reception_assets WHERE reception_id = $1 ORDER BY position",
        )
        .bind(reception_id)
        .fetch_all(conn)
        .await
    }

    /// Overwrite the editable metadata. The asset list is left untouched.
    pub async fn update_metadata(
        &self,
        conn: &mut PgConnection,
        id: i64,
        metadata: &ReceptionMetadata,
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("update_reception");
        let result = sqlx::query(
            r#"
            UPDATE receptions
            SET responsible_id = $2, area_id = $3, returned_on = $4, category = $5, updated_at = $6
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(metadata.responsible_id)
        .bind(metadata.area_id)
        .bind(metadata.returned_on)
        .bind(&metadata.category)
        .bind(Utc::now())
        .execute(conn)
        .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Delete a reception; its asset list goes with it.
    pub async fn delete(&self, conn: &mut PgConnection, id: i64) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("delete_reception");
        let result = sqlx::query("DELETE FROM receptions WHERE id = $1")
            .bind(id)
            .execute(conn)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Load receptions resolved with names and assets, latest return first.
    ///
    /// With `id`, only that reception is loaded.
    pub async fn load_views(
        &self,
        conn: &mut PgConnection,
        id: Option<i64>,
    ) -> Result<Vec<ReceptionView>, sqlx::Error> {
        let timer = QueryTimer::new("load_reception_views");

        let rows = sqlx::query_as::<_, ReceptionRowEntity>(
            r#"
            SELECT rc.id, rc.responsible_id,
                   r.first_name AS responsible_first_name, r.last_name AS responsible_last_name,
                   rc.area_id, ar.name AS area_name, rc.returned_on, rc.category,
                   rc.created_at, rc.updated_at
            FROM receptions rc
            JOIN responsibles r ON r.id = rc.responsible_id
            JOIN areas ar ON ar.id = rc.area_id
            WHERE ($1::bigint IS NULL OR rc.id = $1)
            ORDER BY rc.returned_on DESC, rc.id DESC
            "#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        let reception_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let assets = sqlx::query_as::<_, BatchAssetEntity>(
            r#"
            SELECT ra.reception_id AS batch_id, s.id, s.code, s.name
            FROM reception_assets ra
            JOIN assets s ON s.id = ra.asset_id
            WHERE ra.reception_id = ANY($1)
            ORDER BY ra.reception_id, ra.position
            "#,
        )
        .bind(&reception_ids)
        .fetch_all(&mut *conn)
        .await?;

        let mut grouped = group_by_batch(assets);
        timer.record();

        Ok(rows
            .into_iter()
            .map(|row| {
                let assets = grouped.remove(&row.id).unwrap_or_default();
                row.into_view(assets)
            })
            .collect())
    }

    /// Load one resolved reception.
    pub async fn find_view(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<ReceptionView>, sqlx::Error> {
        Ok(self.load_views(conn, Some(id)).await?.pop())
    }

    /// List all receptions.
    pub async fn list(&self) -> Result<Vec<ReceptionView>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        self.load_views(&mut conn, None).await
    }

    /// Get one reception outside any transaction.
    pub async fn get(&self, id: i64) -> Result<Option<ReceptionView>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        self.find_view(&mut conn, id).await
    }
}
