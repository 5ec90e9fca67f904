//! Test utilities: mock implementations of all core traits.
//!
//! Handwritten mocks for dependency injection in unit tests.
//! All mocks use `Arc<Mutex<_>>` for interior mutability, allowing
//! test assertions on recorded calls.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use chrono::Utc;
use uuid::Uuid;

use crate::error::AppError;
use crate::models::{
    AppRef, Competitor, InsertOutcome, NewCompetitor, Platform, RawMetadata,
};
use crate::traits::{CompetitorStore, CrawlScheduler, MetadataProvider};

// ---------------------------------------------------------------------------
// MockProvider
// ---------------------------------------------------------------------------

/// Mock metadata provider with a queue of responses and an optional delay.
#[derive(Clone)]
pub struct MockProvider {
    /// Queue of responses. Each call pops the first element.
    /// If empty, returns metadata named "Default App".
    responses: Arc<Mutex<Vec<Result<RawMetadata, AppError>>>>,
    delay: Option<Duration>,
    pub calls: Arc<Mutex<Vec<AppRef>>>,
}

impl MockProvider {
    pub fn new(raw: RawMetadata) -> Self {
        Self::with_responses(vec![Ok(raw)])
    }

    pub fn with_error(error: AppError) -> Self {
        Self::with_responses(vec![Err(error)])
    }

    pub fn with_responses(responses: Vec<Result<RawMetadata, AppError>>) -> Self {
        Self {
            responses: Arc::new(Mutex::new(responses)),
            delay: None,
            calls: Arc::new(Mutex::new(Vec::new())),
        }
    }

    /// Sleep this long before answering each lookup.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }
}

impl MetadataProvider for MockProvider {
    async fn lookup(&self, app: &AppRef) -> Result<RawMetadata, AppError> {
        self.calls.lock().unwrap().push(app.clone());

        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }

        let mut responses = self.responses.lock().unwrap();
        if responses.is_empty() {
            Ok(make_raw_metadata("Default App"))
        } else {
            responses.remove(0)
        }
    }
}

// ---------------------------------------------------------------------------
// MockStore
// ---------------------------------------------------------------------------

/// In-memory competitor store. The capped insert checks and inserts under
/// one lock, matching the atomicity the trait requires.
#[derive(Clone)]
pub struct MockStore {
    rows: Arc<Mutex<Vec<Competitor>>>,
    pub inserted: Arc<Mutex<Vec<NewCompetitor>>>,
    pub count_calls: Arc<Mutex<usize>>,
    pub insert_calls: Arc<Mutex<usize>>,
    count_error: Arc<Mutex<Option<AppError>>>,
    insert_error: Arc<Mutex<Option<AppError>>>,
    deactivate_error: Arc<Mutex<Option<AppError>>>,
    /// Rows slipped in right before the next capped insert, as if another
    /// request had committed first.
    fill_on_insert: Arc<Mutex<Option<(String, usize)>>>,
}

impl MockStore {
    /// Empty store with no competitors in any project.
    pub fn empty() -> Self {
        Self {
            rows: Arc::new(Mutex::new(Vec::new())),
            inserted: Arc::new(Mutex::new(Vec::new())),
            count_calls: Arc::new(Mutex::new(0)),
            insert_calls: Arc::new(Mutex::new(0)),
            count_error: Arc::new(Mutex::new(None)),
            insert_error: Arc::new(Mutex::new(None)),
            deactivate_error: Arc::new(Mutex::new(None)),
            fill_on_insert: Arc::new(Mutex::new(None)),
        }
    }

    /// Store with `n` active competitors in `project_id`.
    pub fn with_active(project_id: &str, n: usize) -> Self {
        let store = Self::empty();
        store.seed(project_id, n);
        store
    }

    pub fn with_count_error(error: AppError) -> Self {
        let store = Self::empty();
        *store.count_error.lock().unwrap() = Some(error);
        store
    }

    pub fn with_insert_error(error: AppError) -> Self {
        let store = Self::empty();
        *store.insert_error.lock().unwrap() = Some(error);
        store
    }

    pub fn with_deactivate_error(error: AppError) -> Self {
        let store = Self::empty();
        *store.deactivate_error.lock().unwrap() = Some(error);
        store
    }

    pub fn fill_on_insert(self, project_id: &str, n: usize) -> Self {
        *self.fill_on_insert.lock().unwrap() = Some((project_id.to_string(), n));
        self
    }

    pub fn active_count(&self, project_id: &str) -> usize {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .filter(|c| c.project_id == project_id && c.active)
            .count()
    }

    /// Ids of every competitor in `project_id`, active or not, in insertion order.
    pub fn ids(&self, project_id: &str) -> Vec<Uuid> {
        let rows = self.rows.lock().unwrap();
        rows.iter()
            .filter(|c| c.project_id == project_id)
            .map(|c| c.id)
            .collect()
    }

    fn seed(&self, project_id: &str, n: usize) {
        let mut rows = self.rows.lock().unwrap();
        for _ in 0..n {
            rows.push(make_test_competitor(project_id));
        }
    }
}

impl CompetitorStore for MockStore {
    async fn count_active(&self, project_id: &str) -> Result<u64, AppError> {
        *self.count_calls.lock().unwrap() += 1;
        if let Some(e) = self.count_error.lock().unwrap().take() {
            return Err(e);
        }
        Ok(self.active_count(project_id) as u64)
    }

    async fn insert_within_cap(
        &self,
        competitor: &NewCompetitor,
        max: u32,
    ) -> Result<InsertOutcome, AppError> {
        *self.insert_calls.lock().unwrap() += 1;
        if let Some(e) = self.insert_error.lock().unwrap().take() {
            return Err(e);
        }
        if let Some((project_id, n)) = self.fill_on_insert.lock().unwrap().take() {
            self.seed(&project_id, n);
        }

        let mut rows = self.rows.lock().unwrap();
        let active = rows
            .iter()
            .filter(|c| c.project_id == competitor.project_id && c.active)
            .count();
        if active >= max as usize {
            return Ok(InsertOutcome::RosterFull);
        }

        let row = Competitor {
            id: Uuid::new_v4(),
            project_id: competitor.project_id.clone(),
            store_url: competitor.store_url.clone(),
            platform: competitor.platform,
            bundle_id: competitor.bundle_id.clone(),
            name: competitor.metadata.name.clone(),
            developer_name: competitor.metadata.developer_name.clone(),
            rating: competitor.metadata.rating,
            ratings_count: competitor.metadata.ratings_count,
            icon_url: competitor.metadata.icon_url.clone(),
            created_at: Utc::now(),
            active: true,
        };
        rows.push(row.clone());
        self.inserted.lock().unwrap().push(competitor.clone());
        Ok(InsertOutcome::Inserted(row))
    }

    async fn get(&self, id: Uuid) -> Result<Option<Competitor>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows.iter().find(|c| c.id == id).cloned())
    }

    async fn list_active(&self, project_id: &str) -> Result<Vec<Competitor>, AppError> {
        let rows = self.rows.lock().unwrap();
        Ok(rows
            .iter()
            .filter(|c| c.project_id == project_id && c.active)
            .cloned()
            .collect())
    }

    async fn deactivate(&self, project_id: &str, id: Uuid) -> Result<Option<Competitor>, AppError> {
        if let Some(e) = self.deactivate_error.lock().unwrap().take() {
            return Err(e);
        }
        let mut rows = self.rows.lock().unwrap();
        match rows
            .iter_mut()
            .find(|c| c.id == id && c.project_id == project_id && c.active)
        {
            Some(row) => {
                row.active = false;
                Ok(Some(row.clone()))
            }
            None => Ok(None),
        }
    }
}

// ---------------------------------------------------------------------------
// MockCrawlScheduler
// ---------------------------------------------------------------------------

/// Mock crawl scheduler that records cancellation requests.
#[derive(Clone)]
pub struct MockCrawlScheduler {
    pub cancelled: Arc<Mutex<Vec<Uuid>>>,
    jobs_per_cancel: u64,
    error: Arc<Mutex<Option<AppError>>>,
}

impl MockCrawlScheduler {
    pub fn new() -> Self {
        Self::with_cancelled(0)
    }

    /// Every cancellation reports `n` cancelled jobs.
    pub fn with_cancelled(n: u64) -> Self {
        Self {
            cancelled: Arc::new(Mutex::new(Vec::new())),
            jobs_per_cancel: n,
            error: Arc::new(Mutex::new(None)),
        }
    }

    pub fn with_error(error: AppError) -> Self {
        let scheduler = Self::new();
        *scheduler.error.lock().unwrap() = Some(error);
        scheduler
    }
}

impl CrawlScheduler for MockCrawlScheduler {
    async fn cancel_for_competitor(&self, competitor_id: Uuid) -> Result<u64, AppError> {
        if let Some(e) = self.error.lock().unwrap().take() {
            return Err(e);
        }
        self.cancelled.lock().unwrap().push(competitor_id);
        Ok(self.jobs_per_cancel)
    }
}

// ---------------------------------------------------------------------------
// Test helpers
// ---------------------------------------------------------------------------

/// Provider output with every field populated.
pub fn make_raw_metadata(name: &str) -> RawMetadata {
    RawMetadata {
        name: Some(name.to_string()),
        developer_name: Some("Sample Developer".to_string()),
        rating: Some(4.5),
        ratings_count: Some(12345),
        icon_url: Some("https://example.com/icon.png".to_string()),
    }
}

/// Create an active iOS competitor for `project_id` with a random store id.
pub fn make_test_competitor(project_id: &str) -> Competitor {
    let id = Uuid::new_v4();
    let store_id = id.as_u128() % 1_000_000_000;
    Competitor {
        id,
        project_id: project_id.to_string(),
        store_url: format!("https://apps.apple.com/us/app/test/id{store_id}"),
        platform: Platform::Ios,
        bundle_id: store_id.to_string(),
        name: "Test App".to_string(),
        developer_name: Some("Test Developer".to_string()),
        rating: Some(4.0),
        ratings_count: 100,
        icon_url: None,
        created_at: Utc::now(),
        active: true,
    }
}
