use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Status of a scheduled crawl for a competitor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CrawlJobStatus {
    Pending,
    Running,
    Completed,
    Failed,
    Cancelled,
}

impl CrawlJobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            CrawlJobStatus::Pending => "pending",
            CrawlJobStatus::Running => "running",
            CrawlJobStatus::Completed => "completed",
            CrawlJobStatus::Failed => "failed",
            CrawlJobStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for CrawlJobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for CrawlJobStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(CrawlJobStatus::Pending),
            "running" => Ok(CrawlJobStatus::Running),
            "completed" => Ok(CrawlJobStatus::Completed),
            "failed" => Ok(CrawlJobStatus::Failed),
            "cancelled" => Ok(CrawlJobStatus::Cancelled),
            _ => Err(format!("Unknown crawl job status: {}", s)),
        }
    }
}

/// A crawl of one competitor's store listing and channels.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CrawlJob {
    pub id: Uuid,
    pub competitor_id: Uuid,
    pub status: CrawlJobStatus,
    pub scheduled_at: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
