//! Assignment ledger repository.
//!
//! `current_assignments` holds at most one row per asset. Every method that
//! takes a connection expects to run inside the caller's transaction, after the
//! asset rows have been locked.

use chrono::NaiveDate;
use domain::models::AssignmentView;
use domain::services::HolderMap;
use sqlx::{PgConnection, PgPool};

use crate::entities::{
    AssignmentRowEntity, BatchAssetEntity, CurrentAssignmentEntity, CurrentHolderEntity,
    CurrentHoldingEntity,
};
use crate::metrics::QueryTimer;
use crate::repositories::asset::group_by_batch;

/// Positions 0..n for a batch of asset ids.
pub(crate) fn positions(ids: &[i64]) -> Vec<i32> {
    (0..ids.len() as i32).collect()
}

/// Repository for the assignment ledger.
#[derive(Clone)]
pub struct AssignmentRepository {
    pool: PgPool,
}

impl AssignmentRepository {
    /// Creates a new AssignmentRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Lock and read the current holder of each asset in `ids`.
    ///
    /// Assets missing from the map are unassigned.
    pub async fn lookup_current_holders(
        &self,
        conn: &mut PgConnection,
        ids: &[i64],
    ) -> Result<HolderMap, sqlx::Error> {
        let timer = QueryTimer::new("lookup_current_holders");
        let rows = sqlx::query_as::<_, CurrentHolderEntity>(
            r#"
            SELECT ca.asset_id, ca.responsible_id, r.first_name, r.last_name
            FROM current_assignments ca
            JOIN responsibles r ON r.id = ca.responsible_id
            WHERE ca.asset_id = ANY($1)
            ORDER BY ca.asset_id
            FOR UPDATE OF ca
            "#,
        )
        .bind(ids)
        .fetch_all(conn)
        .await;
        timer.record();

        Ok(rows?
            .into_iter()
            .map(CurrentHolderEntity::into_entry)
            .collect())
    }

    /// Remove the current holder of each asset in `ids`.
    pub async fn clear_assignments(
        &self,
        conn: &mut PgConnection,
        ids: &[i64],
    ) -> Result<u64, sqlx::Error> {
        let timer = QueryTimer::new("clear_assignments");
        let result = sqlx::query("DELETE FROM current_assignments WHERE asset_id = ANY($1)")
            .bind(ids)
            .execute(conn)
            .await;
        timer.record();
        Ok(result?.rows_affected())
    }

    /// Record `responsible_id` as the holder of every asset in `ids`.
    ///
    /// Fails with a unique violation if any asset already has a holder.
    pub async fn assign(
        &self,
        conn: &mut PgConnection,
        ids: &[i64],
        responsible_id: i64,
        assignment_id: i64,
    ) -> Result<Vec<CurrentAssignmentEntity>, sqlx::Error> {
        let timer = QueryTimer::new("assign_assets");
        let result = sqlx::query_as::<_, CurrentAssignmentEntity>(
            r#"
            INSERT INTO current_assignments (asset_id, responsible_id, assignment_id)
            SELECT asset_id, $2, $3 FROM UNNEST($1::bigint[]) AS a(asset_id)
            RETURNING asset_id, responsible_id, assignment_id, assigned_at
            "#,
        )
        .bind(ids)
        .bind(responsible_id)
        .bind(assignment_id)
        .fetch_all(conn)
        .await;
        timer.record();
        result
    }

    /// Insert an assignment batch and its ordered asset list. Returns the batch id.
    pub async fn create_batch(
        &self,
        conn: &mut PgConnection,
        responsible_id: i64,
        area_id: i64,
        assigned_on: NaiveDate,
        category: &str,
        ids: &[i64],
    ) -> Result<i64, sqlx::Error> {
        let timer = QueryTimer::new("create_assignment");

        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO assignments (responsible_id, area_id, assigned_on, category)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(responsible_id)
        .bind(area_id)
        .bind(assigned_on)
        .bind(category)
        .fetch_one(&mut *conn)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO assignment_assets (assignment_id, asset_id, position)
            SELECT $1, a.asset_id, a.position
            FROM UNNEST($2::bigint[], $3::int[]) AS a(asset_id, position)
            "#,
        )
        .bind(id)
        .bind(ids)
        .bind(positions(ids))
        .execute(&mut *conn)
        .await?;

        timer.record();
        Ok(id)
    }

    /// Load assignment batches resolved with names and assets, newest first.
    ///
    /// With `id`, only that batch is loaded.
    pub async fn load_views(
        &self,
        conn: &mut PgConnection,
        id: Option<i64>,
    ) -> Result<Vec<AssignmentView>, sqlx::Error> {
        let timer = QueryTimer::new("load_assignment_views");

        let rows = sqlx::query_as::<_, AssignmentRowEntity>(
            r#"
            SELECT a.id, a.responsible_id,
                   r.first_name AS responsible_first_name, r.last_name AS responsible_last_name,
                   a.area_id, ar.name AS area_name, a.assigned_on, a.category, a.created_at
            FROM assignments a
            JOIN responsibles r ON r.id = a.responsible_id
            JOIN areas ar ON ar.id = a.area_id
            WHERE ($1::bigint IS NULL OR a.id = $1)
            ORDER BY a.assigned_on DESC, a.id DESC
            "#,
        )
        .bind(id)
        .fetch_all(&mut *conn)
        .await?;

        let batch_ids: Vec<i64> = rows.iter().map(|r| r.id).collect();
        let assets = sqlx::query_as::<_, BatchAssetEntity>(
            r#"
            SELECT aa.assignment_id AS batch_id, s.id, s.code, s.name
            FROM assignment_assets aa
            JOIN assets s ON s.id = aa.asset_id
            WHERE aa.assignment_id = ANY($1)
            ORDER BY aa.assignment_id, aa.position
            "#,
        )
        .bind(&batch_ids)
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

    /// List assignment batches.
    pub async fn list(&self) -> Result<Vec<AssignmentView>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        self.load_views(&mut conn, None).await
    }

    /// Current holdings, optionally only those of one responsible.
    pub async fn current_holdings(
        &self,
        responsible_id: Option<i64>,
    ) -> Result<Vec<CurrentHoldingEntity>, sqlx::Error> {
        let timer = QueryTimer::new("list_current_holdings");
        let result = sqlx::query_as::<_, CurrentHoldingEntity>(
            r#"
            SELECT ca.asset_id, s.code, s.name, ca.responsible_id, r.first_name, r.last_name,
                   ca.assignment_id, ca.assigned_at
            FROM current_assignments ca
            JOIN assets s ON s.id = ca.asset_id
            JOIN responsibles r ON r.id = ca.responsible_id
            WHERE ($1::bigint IS NULL OR ca.responsible_id = $1)
            ORDER BY ca.assigned_at DESC, ca.asset_id
            "#,
        )
        .bind(responsible_id)
        .fetch_all(&self.pool)
        .await;
        timer.record();
        result
    }
}
