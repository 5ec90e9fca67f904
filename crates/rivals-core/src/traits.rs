use std::future::Future;

use uuid::Uuid;

use crate::error::AppError;
use crate::models::{AppRef, Competitor, InsertOutcome, NewCompetitor, RawMetadata};

/// Looks up store metadata for an app.
pub trait MetadataProvider: Send + Sync + Clone {
    fn lookup(&self, app: &AppRef) -> impl Future<Output = Result<RawMetadata, AppError>> + Send;
}

/// Persists competitors and enforces the per-project roster cap.
///
/// Implementations must make `insert_within_cap` atomic per project: two
/// concurrent inserts into a project with `max - 1` active competitors must
/// produce exactly one `Inserted`. Inserts into different projects must not
/// block each other.
pub trait CompetitorStore: Send + Sync + Clone {
    /// Number of active competitors in a project.
    fn count_active(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<u64, AppError>> + Send;

    /// Insert unless the project already has `max` active competitors.
    fn insert_within_cap(
        &self,
        competitor: &NewCompetitor,
        max: u32,
    ) -> impl Future<Output = Result<InsertOutcome, AppError>> + Send;

    fn get(&self, id: Uuid) -> impl Future<Output = Result<Option<Competitor>, AppError>> + Send;

    /// Active competitors of a project, oldest first.
    fn list_active(
        &self,
        project_id: &str,
    ) -> impl Future<Output = Result<Vec<Competitor>, AppError>> + Send;

    /// Flip an active competitor of `project_id` to inactive.
    ///
    /// Returns `None` when no row changed: unknown id, another project's
    /// competitor, or one that was already removed.
    fn deactivate(
        &self,
        project_id: &str,
        id: Uuid,
    ) -> impl Future<Output = Result<Option<Competitor>, AppError>> + Send;
}

/// The crawl subsystem, seen from removal.
pub trait CrawlScheduler: Send + Sync + Clone {
    /// Cancel pending and running crawls for a competitor. Returns how many
    /// jobs were cancelled; zero is not an error.
    fn cancel_for_competitor(
        &self,
        competitor_id: Uuid,
    ) -> impl Future<Output = Result<u64, AppError>> + Send;
}
