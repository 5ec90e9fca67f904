//! Bounded metadata lookups.
//!
//! [`MetadataFetcher`] wraps a [`MetadataProvider`] with a hard deadline and
//! turns the provider's loose output into a validated [`AppMetadata`].
//! A single attempt is made per call.

use std::time::Duration;

use crate::error::AppError;
use crate::models::{AppMetadata, AppRef, RawMetadata};
use crate::traits::MetadataProvider;

pub const MISSING_NAME: &str = "missing-name";

#[derive(Clone)]
pub struct MetadataFetcher<P: MetadataProvider> {
    provider: P,
    timeout: Duration,
}

impl<P: MetadataProvider> MetadataFetcher<P> {
    pub fn new(provider: P, timeout: Duration) -> Self {
        Self { provider, timeout }
    }

    /// Fetch metadata for `app`, failing with
    /// [`AppError::MetadataFetchTimeout`] once the deadline passes.
    pub async fn fetch(&self, app: &AppRef) -> Result<AppMetadata, AppError> {
        let raw = match tokio::time::timeout(self.timeout, self.provider.lookup(app)).await {
            Err(_elapsed) => {
                tracing::warn!(
                    platform = %app.platform,
                    bundle_id = %app.bundle_id,
                    timeout_ms = self.timeout.as_millis() as u64,
                    "Metadata lookup abandoned at deadline"
                );
                return Err(AppError::MetadataFetchTimeout(self.timeout.as_millis() as u64));
            }
            Ok(Err(e)) => return Err(into_fetch_error(e)),
            Ok(Ok(raw)) => raw,
        };

        normalize(raw)
    }
}

/// Fold any provider error into the metadata error family.
fn into_fetch_error(err: AppError) -> AppError {
    if err.is_metadata_failure() {
        err
    } else {
        AppError::MetadataFetchFailed(err.to_string())
    }
}

/// Apply per-field fallbacks. Only a missing `name` fails the fetch.
pub fn normalize(raw: RawMetadata) -> Result<AppMetadata, AppError> {
    let name = non_blank(raw.name)
        .ok_or_else(|| AppError::MetadataFetchFailed(MISSING_NAME.to_string()))?;

    Ok(AppMetadata {
        name,
        developer_name: non_blank(raw.developer_name),
        rating: raw
            .rating
            .filter(|r| r.is_finite() && (0.0..=5.0).contains(r)),
        ratings_count: raw.ratings_count.map_or(0, |c| c.max(0) as u64),
        icon_url: non_blank(raw.icon_url),
    })
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
