use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use rivals_core::error::AppError;
use rivals_core::models::{Competitor, InsertOutcome, NewCompetitor, Platform};
use rivals_core::traits::CompetitorStore;

/// PostgreSQL-backed competitor roster.
///
/// Capped inserts serialise per project on a transaction-scoped advisory
/// lock, so two requests racing for the last slot cannot both commit.
#[derive(Clone)]
pub struct CompetitorRepository {
    pool: Pool<Postgres>,
}

impl CompetitorRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

// -- Internal row type for sqlx deserialization --

#[derive(sqlx::FromRow)]
struct CompetitorRow {
    id: Uuid,
    project_id: String,
    store_url: String,
    platform: String,
    bundle_id: String,
    name: String,
    developer_name: Option<String>,
    rating: Option<f64>,
    ratings_count: i64,
    icon_url: Option<String>,
    created_at: DateTime<Utc>,
    active: bool,
}

impl TryFrom<CompetitorRow> for Competitor {
    type Error = AppError;

    fn try_from(row: CompetitorRow) -> Result<Self, Self::Error> {
        let platform = row
            .platform
            .parse::<Platform>()
            .map_err(|e| AppError::PersistenceFailed(format!("competitor {}: {e}", row.id)))?;

        Ok(Competitor {
            id: row.id,
            project_id: row.project_id,
            store_url: row.store_url,
            platform,
            bundle_id: row.bundle_id,
            name: row.name,
            developer_name: row.developer_name,
            rating: row.rating,
            ratings_count: row.ratings_count.max(0) as u64,
            icon_url: row.icon_url,
            created_at: row.created_at,
            active: row.active,
        })
    }
}

impl CompetitorStore for CompetitorRepository {
    async fn count_active(&self, project_id: &str) -> Result<u64, AppError> {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM competitors WHERE project_id = $1 AND active",
        )
        .bind(project_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        Ok(count as u64)
    }

    async fn insert_within_cap(
        &self,
        competitor: &NewCompetitor,
        max: u32,
    ) -> Result<InsertOutcome, AppError> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        // Released automatically on commit or rollback.
        sqlx::query("SELECT pg_advisory_xact_lock(hashtextextended($1, 0))")
            .bind(&competitor.project_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        let active: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM competitors WHERE project_id = $1 AND active",
        )
        .bind(&competitor.project_id)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        if active >= i64::from(max) {
            tx.rollback()
                .await
                .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;
            return Ok(InsertOutcome::RosterFull);
        }

        let metadata = &competitor.metadata;
        let row = sqlx::query_as::<_, CompetitorRow>(
            r#"
            INSERT INTO competitors
                (project_id, store_url, platform, bundle_id, name,
                 developer_name, rating, ratings_count, icon_url)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)
            RETURNING *
            "#,
        )
        .bind(&competitor.project_id)
        .bind(&competitor.store_url)
        .bind(competitor.platform.as_str())
        .bind(&competitor.bundle_id)
        .bind(&metadata.name)
        .bind(&metadata.developer_name)
        .bind(metadata.rating)
        .bind(i64::try_from(metadata.ratings_count).unwrap_or(i64::MAX))
        .bind(&metadata.icon_url)
        .fetch_one(&mut *tx)
        .await
        .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        tx.commit()
            .await
            .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        Ok(InsertOutcome::Inserted(Competitor::try_from(row)?))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Competitor>, AppError> {
        let row = sqlx::query_as::<_, CompetitorRow>("SELECT * FROM competitors WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        row.map(Competitor::try_from).transpose()
    }

    async fn list_active(&self, project_id: &str) -> Result<Vec<Competitor>, AppError> {
        let rows = sqlx::query_as::<_, CompetitorRow>(
            r#"
            SELECT * FROM competitors
            WHERE project_id = $1 AND active
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(project_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        rows.into_iter().map(Competitor::try_from).collect()
    }

    async fn deactivate(&self, project_id: &str, id: Uuid) -> Result<Option<Competitor>, AppError> {
        let row = sqlx::query_as::<_, CompetitorRow>(
            r#"
            UPDATE competitors
            SET active = FALSE
            WHERE id = $1 AND project_id = $2 AND active
            RETURNING *
            "#,
        )
        .bind(id)
        .bind(project_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        row.map(Competitor::try_from).transpose()
    }
}
