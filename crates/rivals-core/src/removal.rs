use uuid::Uuid;

use crate::error::AppError;
use crate::models::Removal;
use crate::traits::{CompetitorStore, CrawlScheduler};

/// Soft-deletes competitors and asks the crawl subsystem to stop work on them.
///
/// The store update decides the outcome. Crawl cancellation is best-effort:
/// its failure is logged and the removal still succeeds.
pub struct RemovalService<S, C>
where
    S: CompetitorStore,
    C: CrawlScheduler,
{
    store: S,
    crawl: C,
}

impl<S, C> RemovalService<S, C>
where
    S: CompetitorStore,
    C: CrawlScheduler,
{
    pub fn new(store: S, crawl: C) -> Self {
        Self { store, crawl }
    }

    /// Remove `competitor_id` from `project_id`'s roster.
    ///
    /// Unknown ids, ids of another project and already-removed competitors
    /// all yield [`AppError::NotFound`].
    pub async fn remove(&self, project_id: &str, competitor_id: Uuid) -> Result<Removal, AppError> {
        let removed = self
            .store
            .deactivate(project_id, competitor_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("Competitor not found: {competitor_id}")))?;
        tracing::info!(%project_id, id = %removed.id, "Competitor deactivated");

        let crawl_jobs_cancelled = match self.crawl.cancel_for_competitor(removed.id).await {
            Ok(cancelled) => {
                tracing::info!(id = %removed.id, cancelled, "Crawl jobs cancelled");
                Some(cancelled)
            }
            Err(e) => {
                tracing::warn!(id = %removed.id, error = %e, "Crawl cancellation failed");
                None
            }
        };

        Ok(Removal {
            competitor_id: removed.id,
            crawl_jobs_cancelled,
        })
    }
}
