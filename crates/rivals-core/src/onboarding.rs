use crate::classify::classify;
use crate::config::OnboardingConfig;
use crate::error::AppError;
use crate::metadata::MetadataFetcher;
use crate::models::{InsertOutcome, NewCompetitor, Onboarded};
use crate::roster::RosterGuard;
use crate::traits::{CompetitorStore, MetadataProvider};

/// Orchestrates competitor creation: classify → check roster → fetch metadata → persist.
///
/// Generic over the store and the metadata provider so the pipeline can be
/// exercised without a database or network.
pub struct OnboardingService<S, P>
where
    S: CompetitorStore,
    P: MetadataProvider,
{
    store: S,
    fetcher: MetadataFetcher<P>,
    guard: RosterGuard,
}

impl<S, P> OnboardingService<S, P>
where
    S: CompetitorStore,
    P: MetadataProvider,
{
    pub fn new(store: S, provider: P, config: &OnboardingConfig) -> Self {
        Self {
            store,
            fetcher: MetadataFetcher::new(provider, config.metadata_timeout),
            guard: RosterGuard::new(config.max_competitors),
        }
    }

    pub fn max_competitors(&self) -> u32 {
        self.guard.max()
    }

    /// Run the onboarding pipeline for one store URL.
    ///
    /// 1. Classify the URL
    /// 2. Check the roster cap against the current active count
    /// 3. Fetch metadata within the configured deadline
    /// 4. Persist through the store's capped insert
    ///
    /// Nothing is persisted unless every earlier step succeeds.
    pub async fn create(&self, project_id: &str, store_url: &str) -> Result<Onboarded, AppError> {
        // 1. Classify
        let classification = classify(store_url)?;
        tracing::info!(
            %project_id,
            platform = %classification.platform,
            bundle_id = %classification.bundle_id,
            "Classified store URL"
        );

        // 2. Roster check
        let current = self.store.count_active(project_id).await?;
        if let Err(e) = self.guard.admit(current) {
            tracing::info!(%project_id, current, max = self.guard.max(), "Roster full");
            return Err(e);
        }

        // 3. Metadata
        let app = classification.into_app_ref(store_url);
        let metadata = self.fetcher.fetch(&app).await?;
        tracing::info!(%project_id, name = %metadata.name, "Fetched app metadata");

        // 4. Persist
        let new_competitor = NewCompetitor::new(project_id, app, metadata);
        match self
            .store
            .insert_within_cap(&new_competitor, self.guard.max())
            .await?
        {
            InsertOutcome::Inserted(competitor) => {
                tracing::info!(%project_id, id = %competitor.id, "Competitor created");
                Ok(Onboarded {
                    competitor,
                    discovered_channels: Vec::new(),
                })
            }
            InsertOutcome::RosterFull => {
                tracing::info!(%project_id, "Roster filled up while fetching metadata");
                Err(AppError::MaxCompetitorsReached {
                    limit: self.guard.max(),
                })
            }
        }
    }
}
