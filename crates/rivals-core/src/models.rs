use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Store a competitor app is published on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    Ios,
    Android,
}

impl Platform {
    pub fn as_str(&self) -> &'static str {
        match self {
            Platform::Ios => "ios",
            Platform::Android => "android",
        }
    }

    /// Whether `bundle_id` fits this platform's identifier grammar.
    ///
    /// iOS ids are the numeric App Store id; Android ids are lower-cased
    /// package names made of letters, digits, dots and underscores.
    pub fn is_valid_bundle_id(&self, bundle_id: &str) -> bool {
        if bundle_id.is_empty() {
            return false;
        }
        match self {
            Platform::Ios => bundle_id.bytes().all(|b| b.is_ascii_digit()),
            Platform::Android => bundle_id
                .bytes()
                .all(|b| b.is_ascii_lowercase() || b.is_ascii_digit() || b == b'.' || b == b'_'),
        }
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for Platform {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "ios" => Ok(Platform::Ios),
            "android" => Ok(Platform::Android),
            _ => Err(format!("Unknown platform: {}", s)),
        }
    }
}

/// Identifies one app on one store, as handed to a metadata provider.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AppRef {
    /// The URL exactly as the caller submitted it.
    pub store_url: String,
    pub platform: Platform,
    pub bundle_id: String,
}

/// Metadata exactly as a provider returned it. Every field may be missing.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawMetadata {
    pub name: Option<String>,
    pub developer_name: Option<String>,
    pub rating: Option<f64>,
    pub ratings_count: Option<i64>,
    pub icon_url: Option<String>,
}

/// Validated metadata snapshot attached to a competitor.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct AppMetadata {
    pub name: String,
    pub developer_name: Option<String>,
    /// 0.0 to 5.0 inclusive.
    pub rating: Option<f64>,
    pub ratings_count: u64,
    pub icon_url: Option<String>,
}

/// A tracked rival app.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Competitor {
    pub id: Uuid,
    pub project_id: String,
    pub store_url: String,
    pub platform: Platform,
    pub bundle_id: String,
    pub name: String,
    pub developer_name: Option<String>,
    pub rating: Option<f64>,
    pub ratings_count: u64,
    pub icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

/// DTO for inserting a new competitor. The store assigns `id` and `created_at`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewCompetitor {
    pub project_id: String,
    pub store_url: String,
    pub platform: Platform,
    pub bundle_id: String,
    pub metadata: AppMetadata,
}

impl NewCompetitor {
    pub fn new(project_id: impl Into<String>, app: AppRef, metadata: AppMetadata) -> Self {
        Self {
            project_id: project_id.into(),
            store_url: app.store_url,
            platform: app.platform,
            bundle_id: app.bundle_id,
            metadata,
        }
    }
}

/// Result of a capped insert.
#[derive(Debug, Clone, PartialEq)]
pub enum InsertOutcome {
    Inserted(Competitor),
    /// The project already had `max` active competitors at commit time.
    RosterFull,
}

/// A social channel found for a competitor by the discovery subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiscoveredChannel {
    pub kind: String,
    pub url: String,
}

/// Result of a successful onboarding.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Onboarded {
    pub competitor: Competitor,
    /// Filled post-hoc by channel discovery; always empty at creation.
    pub discovered_channels: Vec<DiscoveredChannel>,
}

/// Result of a successful removal.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Removal {
    pub competitor_id: Uuid,
    /// Crawl jobs cancelled, or `None` if the cancellation request failed.
    pub crawl_jobs_cancelled: Option<u64>,
}
