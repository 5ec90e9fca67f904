use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use rivals_core::models::{Competitor, DiscoveredChannel, Onboarded};

// ---------------------------------------------------------------------------
// Competitors
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompetitorRequest {
    /// App Store or Google Play listing URL
    #[serde(default)]
    pub store_url: String,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CompetitorResponse {
    pub id: Uuid,
    pub project_id: String,
    pub store_url: String,
    /// `ios` or `android`
    pub platform: String,
    pub bundle_id: String,
    pub name: String,
    pub developer_name: Option<String>,
    pub rating: Option<f64>,
    pub ratings_count: u64,
    pub icon_url: Option<String>,
    pub created_at: DateTime<Utc>,
    pub active: bool,
}

impl From<Competitor> for CompetitorResponse {
    fn from(c: Competitor) -> Self {
        Self {
            id: c.id,
            project_id: c.project_id,
            store_url: c.store_url,
            platform: c.platform.to_string(),
            bundle_id: c.bundle_id,
            name: c.name,
            developer_name: c.developer_name,
            rating: c.rating,
            ratings_count: c.ratings_count,
            icon_url: c.icon_url,
            created_at: c.created_at,
            active: c.active,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct DiscoveredChannelResponse {
    pub kind: String,
    pub url: String,
}

impl From<DiscoveredChannel> for DiscoveredChannelResponse {
    fn from(ch: DiscoveredChannel) -> Self {
        Self {
            kind: ch.kind,
            url: ch.url,
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCompetitorResponse {
    pub competitor: CompetitorResponse,
    pub discovered_channels: Vec<DiscoveredChannelResponse>,
}

impl From<Onboarded> for CreateCompetitorResponse {
    fn from(o: Onboarded) -> Self {
        Self {
            competitor: o.competitor.into(),
            discovered_channels: o.discovered_channels.into_iter().map(Into::into).collect(),
        }
    }
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct CompetitorListResponse {
    pub competitors: Vec<CompetitorResponse>,
    pub total: usize,
    /// Configured roster cap for the project
    pub limit: u32,
}

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct RemoveCompetitorResponse {
    pub message: String,
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct HealthResponse {
    pub status: &'static str,
    pub database: &'static str,
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, utoipa::ToSchema)]
pub struct ErrorResponse {
    /// Machine-readable error kind, e.g. `invalid_store_url`
    pub error: String,
    pub message: String,
}
