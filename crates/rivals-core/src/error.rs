use thiserror::Error;

/// Application-wide error types for competitor onboarding.
#[derive(Error, Debug)]
pub enum AppError {
    /// The submitted URL is not a recognised App Store or Google Play URL.
    #[error("Invalid app store URL")]
    InvalidStoreUrl,

    /// The project's roster is already at its configured cap.
    #[error("Maximum competitors reached (limit: {limit})")]
    MaxCompetitorsReached { limit: u32 },

    /// The metadata provider did not answer within the deadline.
    #[error("Metadata fetch timed out after {0} ms")]
    MetadataFetchTimeout(u64),

    /// The metadata provider answered with an error or an unusable payload.
    #[error("Metadata fetch failed: {0}")]
    MetadataFetchFailed(String),

    /// The competitor store rejected or failed the operation.
    #[error("Persistence failed: {0}")]
    PersistenceFailed(String),

    /// Unknown, foreign, or already-removed competitor.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid or missing configuration.
    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl AppError {
    /// Returns true if the caller must change its input for the request to succeed.
    pub fn is_client_fault(&self) -> bool {
        matches!(
            self,
            AppError::InvalidStoreUrl
                | AppError::MaxCompetitorsReached { .. }
                | AppError::NotFound(_)
        )
    }

    /// Returns true if this error came out of the metadata fetch step.
    pub fn is_metadata_failure(&self) -> bool {
        matches!(
            self,
            AppError::MetadataFetchTimeout(_) | AppError::MetadataFetchFailed(_)
        )
    }
}
