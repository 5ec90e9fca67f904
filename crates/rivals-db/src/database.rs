use rivals_core::AppError;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::competitor_repository::CompetitorRepository;
use crate::config::DatabaseConfig;
use crate::crawl_repository::CrawlJobRepository;

/// Central database facade — owns the connection pool, runs migrations,
/// and vends repository instances.
#[derive(Clone)]
pub struct Database {
    pool: PgPool,
}

impl Database {
    /// Connect to PostgreSQL with the given configuration.
    pub async fn connect(config: &DatabaseConfig) -> Result<Self, AppError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .connect(&config.url)
            .await
            .map_err(|e| AppError::PersistenceFailed(format!("Failed to connect: {e}")))?;

        Ok(Self { pool })
    }

    /// Create a `Database` from an existing pool (useful for testing).
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Run all pending migrations.
    pub async fn migrate(&self) -> Result<(), AppError> {
        sqlx::migrate!("../../migrations")
            .run(&self.pool)
            .await
            .map_err(|e| AppError::PersistenceFailed(format!("Migration failed: {e}")))?;
        Ok(())
    }

    /// Get a [`CompetitorRepository`] backed by this pool.
    pub fn competitor_repo(&self) -> CompetitorRepository {
        CompetitorRepository::new(self.pool.clone())
    }

    /// Get a [`CrawlJobRepository`] backed by this pool.
    pub fn crawl_repo(&self) -> CrawlJobRepository {
        CrawlJobRepository::new(self.pool.clone())
    }

    /// Check database connectivity.
    pub async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::PersistenceFailed(e.to_string()))?;
        Ok(())
    }
}
