pub mod classify;
pub mod config;
pub mod crawl;
pub mod error;
pub mod metadata;
pub mod models;
pub mod onboarding;
pub mod removal;
pub mod roster;
pub mod traits;

#[cfg(test)]
mod testutil;

pub use classify::{Classification, classify};
pub use config::OnboardingConfig;
pub use error::AppError;
pub use metadata::MetadataFetcher;
pub use models::{AppMetadata, AppRef, Competitor, NewCompetitor, Platform, RawMetadata};
pub use onboarding::OnboardingService;
pub use removal::RemovalService;
pub use roster::RosterGuard;
pub use traits::{CompetitorStore, CrawlScheduler, MetadataProvider};
