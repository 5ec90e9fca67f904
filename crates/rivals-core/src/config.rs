use std::time::Duration;

use crate::error::AppError;

pub const DEFAULT_MAX_COMPETITORS: u32 = 10;
pub const DEFAULT_METADATA_TIMEOUT: Duration = Duration::from_secs(5);

/// Tunables for the onboarding pipeline.
#[derive(Debug, Clone)]
pub struct OnboardingConfig {
    /// Maximum number of active competitors per project.
    pub max_competitors: u32,
    /// Hard deadline for a single metadata lookup.
    pub metadata_timeout: Duration,
}

impl Default for OnboardingConfig {
    fn default() -> Self {
        Self {
            max_competitors: DEFAULT_MAX_COMPETITORS,
            metadata_timeout: DEFAULT_METADATA_TIMEOUT,
        }
    }
}

impl OnboardingConfig {
    /// Read configuration from environment variables.
    ///
    /// - `RIVALS_MAX_COMPETITORS` (optional, defaults to 10)
    /// - `RIVALS_METADATA_TIMEOUT_MS` (optional, defaults to 5000)
    pub fn from_env() -> Result<Self, AppError> {
        let max_competitors = match std::env::var("RIVALS_MAX_COMPETITORS") {
            Err(_) => DEFAULT_MAX_COMPETITORS,
            Ok(raw) => parse_positive("RIVALS_MAX_COMPETITORS", &raw)?,
        };

        let metadata_timeout = match std::env::var("RIVALS_METADATA_TIMEOUT_MS") {
            Err(_) => DEFAULT_METADATA_TIMEOUT,
            Ok(raw) => {
                Duration::from_millis(parse_positive::<u64>("RIVALS_METADATA_TIMEOUT_MS", &raw)?)
            }
        };

        Ok(Self {
            max_competitors,
            metadata_timeout,
        })
    }

    pub fn with_max_competitors(mut self, max: u32) -> Self {
        self.max_competitors = max;
        self
    }

    pub fn with_metadata_timeout(mut self, timeout: Duration) -> Self {
        self.metadata_timeout = timeout;
        self
    }
}

fn parse_positive<T>(name: &str, raw: &str) -> Result<T, AppError>
where
    T: std::str::FromStr + PartialOrd + Default,
{
    let parsed: T = raw.trim().parse().map_err(|_| {
        AppError::ConfigError(format!("Invalid {name} '{raw}': must be a positive integer"))
    })?;
    if parsed <= T::default() {
        return Err(AppError::ConfigError(format!("{name} must be at least 1")));
    }
    Ok(parsed)
}
