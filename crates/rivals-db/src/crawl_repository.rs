use chrono::{DateTime, Utc};
use sqlx::{PgPool, Pool, Postgres};
use uuid::Uuid;

use rivals_core::crawl::{CrawlJob, CrawlJobStatus};
use rivals_core::error::AppError;
use rivals_core::traits::CrawlScheduler;

/// PostgreSQL-backed crawl-job table.
///
/// Only scheduling and cancellation live here; running the crawls is the
/// job of a separate worker.
#[derive(Clone)]
pub struct CrawlJobRepository {
    pool: Pool<Postgres>,
}

impl CrawlJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Schedule a pending crawl of `competitor_id`.
    pub async fn enqueue(
        &self,
        competitor_id: Uuid,
        scheduled_at: DateTime<Utc>,
    ) -> Result<CrawlJob, AppError> {
        let row = sqlx::query_as::<_, CrawlJobRow>(
            r#"
            INSERT INTO crawl_jobs (competitor_id, scheduled_at)
            VALUES ($1, $2)
            RETURNING *
            "#,
        )
        .bind(competitor_id)
        .bind(scheduled_at)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        Ok(row.into())
    }

    /// Move a job to `status`. Returns `false` if the job does not exist.
    pub async fn set_status(&self, job_id: Uuid, status: CrawlJobStatus) -> Result<bool, AppError> {
        let result = sqlx::query(
            "UPDATE crawl_jobs SET status = $2, updated_at = NOW() WHERE id = $1",
        )
        .bind(job_id)
        .bind(status.as_str())
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// All jobs for a competitor, oldest first.
    pub async fn list_for_competitor(&self, competitor_id: Uuid) -> Result<Vec<CrawlJob>, AppError> {
        let rows = sqlx::query_as::<_, CrawlJobRow>(
            r#"
            SELECT * FROM crawl_jobs
            WHERE competitor_id = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(competitor_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        Ok(rows.into_iter().map(Into::into).collect())
    }
}

#[derive(sqlx::FromRow)]
struct CrawlJobRow {
    id: Uuid,
    competitor_id: Uuid,
    status: String,
    scheduled_at: DateTime<Utc>,
    created_at: DateTime<Utc>,
    updated_at: DateTime<Utc>,
}

impl From<CrawlJobRow> for CrawlJob {
    fn from(row: CrawlJobRow) -> Self {
        CrawlJob {
            id: row.id,
            competitor_id: row.competitor_id,
            status: row.status.parse().unwrap_or(CrawlJobStatus::Pending),
            scheduled_at: row.scheduled_at,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}

impl CrawlScheduler for CrawlJobRepository {
    async fn cancel_for_competitor(&self, competitor_id: Uuid) -> Result<u64, AppError> {
        let result = sqlx::query(
            r#"
            UPDATE crawl_jobs
            SET status = 'cancelled', updated_at = NOW()
            WHERE competitor_id = $1 AND status IN ('pending', 'running')
            "#,
        )
        .bind(competitor_id)
        .execute(&self.pool)
        .await
        .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;

        Ok(result.rows_affected())
    }
}
