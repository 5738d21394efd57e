//! Directory repository: responsible parties and areas.

use domain::models::{AreaRef, PartyRef};
use sqlx::{PgConnection, PgPool};

use crate::entities::{AreaEntity, ResponsibleEntity};
use crate::metrics::QueryTimer;

/// Repository for responsibles and areas.
#[derive(Clone)]
pub struct DirectoryRepository {
    pool: PgPool,
}

impl DirectoryRepository {
    /// Creates a new DirectoryRepository with the given connection pool.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Create an area.
    pub async fn create_area(&self, name: &str) -> Result<AreaEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_area");
        let result = sqlx::query_as::<_, AreaEntity>(
            r#"
            INSERT INTO areas (name)
            VALUES ($1)
            RETURNING id, name, created_at, updated_at
            "#,
        )
        .bind(name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List areas by name.
    pub async fn list_areas(&self) -> Result<Vec<AreaEntity>, sqlx::Error> {
        sqlx::query_as::<_, AreaEntity>(
            "SELECT id, name, created_at, updated_at FROM areas ORDER BY name, id",
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Create a responsible party.
    pub async fn create_responsible(
        &self,
        first_name: &str,
        last_name: &str,
    ) -> Result<ResponsibleEntity, sqlx::Error> {
        let timer = QueryTimer::new("create_responsible");
        let result = sqlx::query_as::<_, ResponsibleEntity>(
            r#"
            INSERT INTO responsibles (first_name, last_name)
            VALUES ($1, $2)
            RETURNING id, first_name, last_name, created_at, updated_at
            "#,
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&self.pool)
        .await;
        timer.record();
        result
    }

    /// List responsibles by last name, then first name.
    pub async fn list_responsibles(&self) -> Result<Vec<ResponsibleEntity>, sqlx::Error> {
        sqlx::query_as::<_, ResponsibleEntity>(
            r#"
            SELECT id, first_name, last_name, created_at, updated_at
            FROM responsibles
            ORDER BY last_name, first_name, id
            "#,
        )
        .fetch_all(&self.pool)
        .await
    }

    /// Resolve a responsible's display name.
    pub async fn find_responsible(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<PartyRef>, sqlx::Error> {
        let entity = sqlx::query_as::<_, ResponsibleEntity>(
            "SELECT id, first_name, last_name, created_at, updated_at FROM responsibles WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(entity.map(PartyRef::from))
    }

    /// Resolve an area's name.
    pub async fn find_area(
        &self,
        conn: &mut PgConnection,
        id: i64,
    ) -> Result<Option<AreaRef>, sqlx::Error> {
        let entity = sqlx::query_as::<_, AreaEntity>(
            "SELECT id, name, created_at, updated_at FROM areas WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(conn)
        .await?;
        Ok(entity.map(AreaRef::from))
    }
}
