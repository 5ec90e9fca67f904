use rivals_client::SearchApiProvider;
use rivals_core::OnboardingConfig;
use rivals_db::Database;

/// Shared application state, available to all route handlers via `State<Arc<AppState>>`.
pub struct AppState {
    pub db: Database,
    pub provider: SearchApiProvider,
    /// Roster cap and metadata deadline applied to every onboarding.
    pub config: OnboardingConfig,
}
