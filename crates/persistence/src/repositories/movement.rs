//! Movement log repository.
//!
//! Also the production [`AuditSink`]: entries are appended on the pool, outside
//! the transaction that produced them.

use domain::models::{ListMovementsQuery, NewMovement};
use domain::services::{AuditError, AuditSink};
use shared::pagination::PageRequest;
use sqlx::PgPool;

use crate::entities::MovementEntity;
use crate::metrics::QueryTimer;

/// Repository for movement log operations.
#[derive(Clone)]
pub struct MovementRepository {
    pool: PgPool,
}

impl MovementRepository {
    /// Create a new repository instance.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Insert a movement.
    pub async fn insert(&self, entry: &NewMovement) -> Result<MovementEntity, sqlx::Error> {
        let timer = QueryTimer::new("insert_movement");
        let result = sqlx::query_as::<_, MovementEntity>(
            r#"
            INSERT INTO movements (action, description, actor, occurred_at)
            VALUES ($1, $2, $3, $4)
            RETURNING id, action, description, actor, occurred_at
            "#,
        )
        .bind(entry.action.as_str())
        .bind(&entry.description)
        .bind(&entry.actor)
        .bind(entry.occurred_at)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List movements newest first. Returns the page and the total count.
    pub async fn list(
        &self,
        query: &ListMovementsQuery,
        page: &PageRequest,
    ) -> Result<(Vec<MovementEntity>, i64), sqlx::Error> {
        let timer = QueryTimer::new("list_movements");
        let action = query.action.as_deref().filter(|a| !a.is_empty());

        let total: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM movements WHERE ($1::text IS NULL OR action = $1)",
        )
        .bind(action)
        .fetch_one(&self.pool)
        .await?;

        let entities = sqlx::query_as::<_, MovementEntity>(
            r#"
            SELECT id, action, description, actor, occurred_at
            FROM movements
            WHERE ($1::text IS NULL OR action = $1)
            ORDER BY occurred_at DESC, id DESC
            LIMIT $2 OFFSET $3
            "#,
        )
        .bind(action)
        .bind(page.limit())
        .bind(page.offset())
        .fetch_all(&self.pool)
        .await?;

        timer.record();
        Ok((entities, total))
    }
}

#[async_trait::async_trait]
impl AuditSink for MovementRepository {
    async fn append(&self, entry: NewMovement) -> Result<(), AuditError> {
        self.insert(&entry)
            .await
            .map(|_| ())
            .map_err(|e| AuditError::Storage(e.to_string()))
    }
}
