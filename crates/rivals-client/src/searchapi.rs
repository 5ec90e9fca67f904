use std::time::Duration;

use reqwest::{Client, StatusCode};
use rivals_core::error::AppError;
use rivals_core::models::{AppRef, Platform, RawMetadata};
use rivals_core::traits::MetadataProvider;
use serde::Deserialize;
use serde_json::Value;
use url::Url;

const DEFAULT_BASE_URL: &str = "https://www.searchapi.io";
const SEARCH_PATH: &str = "/api/v1/search";
/// Backstop only; the onboarding deadline is enforced by `MetadataFetcher`.
const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Configuration for [`SearchApiProvider`].
#[derive(Debug, Clone)]
pub struct SearchApiConfig {
    pub api_key: String,
    pub base_url: String,
}

impl SearchApiConfig {
    /// Read configuration from environment variables.
    ///
    /// - `SEARCHAPI_API_KEY` (required)
    /// - `SEARCHAPI_BASE_URL` (optional, defaults to `https://www.searchapi.io`)
    pub fn from_env() -> Result<Self, AppError> {
        let api_key = std::env::var("SEARCHAPI_API_KEY").map_err(|_| {
            AppError::ConfigError("SEARCHAPI_API_KEY not set. Required for metadata lookups.".into())
        })?;
        let base_url =
            std::env::var("SEARCHAPI_BASE_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());

        Ok(Self { api_key, base_url })
    }
}

/// App-store product lookups through a SearchAPI-compatible endpoint.
///
/// Issues `GET {base}/api/v1/search?engine=...&product_id=...` with the key
/// in an `Authorization: Bearer` header and reads the `product` object of
/// the response. The key never appears in the URL, so reqwest errors cannot
/// carry it.
#[derive(Clone)]
pub struct SearchApiProvider {
    client: Client,
    base_url: String,
    api_key: String,
    timeout_ms: u64,
}

impl SearchApiProvider {
    pub fn with_base_url(api_key: &str, base_url: &str) -> Result<Self, AppError> {
        Self::build(api_key, base_url, DEFAULT_HTTP_TIMEOUT)
    }

    pub fn from_config(config: &SearchApiConfig) -> Result<Self, AppError> {
        Self::with_base_url(&config.api_key, &config.base_url)
    }

    pub fn with_timeout(self, timeout: Duration) -> Result<Self, AppError> {
        Self::build(&self.api_key, &self.base_url, timeout)
    }

    fn build(api_key: &str, base_url: &str, timeout: Duration) -> Result<Self, AppError> {
        let client = Client::builder()
            .user_agent("rivals/0.1 (competitor tracking)")
            .timeout(timeout)
            .build()
            .map_err(|e| AppError::ConfigError(format!("Failed to build HTTP client: {e}")))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
            timeout_ms: timeout.as_millis() as u64,
        })
    }

    fn search_url(&self, app: &AppRef) -> Result<Url, AppError> {
        Url::parse_with_params(
            &format!("{}{SEARCH_PATH}", self.base_url),
            [
                ("engine", engine_for(app.platform)),
                ("product_id", app.bundle_id.as_str()),
            ],
        )
        .map_err(|e| AppError::ConfigError(format!("Invalid metadata base URL: {e}")))
    }
}

fn engine_for(platform: Platform) -> &'static str {
    match platform {
        Platform::Ios => "apple_product",
        Platform::Android => "google_play_product",
    }
}

// ---- SearchAPI response types ----

#[derive(Deserialize)]
struct SearchResponse {
    product: Option<Value>,
    error: Option<String>,
}

impl MetadataProvider for SearchApiProvider {
    async fn lookup(&self, app: &AppRef) -> Result<RawMetadata, AppError> {
        let url = self.search_url(app)?;
        tracing::debug!(platform = %app.platform, bundle_id = %app.bundle_id, "Looking up app metadata");

        let response = self
            .client
            .get(url)
            .header("Authorization", format!("Bearer {}", self.api_key))
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AppError::MetadataFetchTimeout(self.timeout_ms)
                } else {
                    AppError::MetadataFetchFailed(format!("network: {}", e.without_url()))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::MetadataFetchFailed(status_reason(status)));
        }

        let body: SearchResponse = response
            .json()
            .await
            .map_err(|e| {
                AppError::MetadataFetchFailed(format!("invalid-response: {}", e.without_url()))
            })?;

        if let Some(error) = body.error {
            return Err(AppError::MetadataFetchFailed(error));
        }

        match body.product {
            Some(product) if product.is_object() => Ok(extract_raw(&product)),
            _ => Err(AppError::MetadataFetchFailed("not-found".to_string())),
        }
    }
}

fn status_reason(status: StatusCode) -> String {
    match status {
        StatusCode::NOT_FOUND => "not-found".to_string(),
        StatusCode::TOO_MANY_REQUESTS => "rate-limited".to_string(),
        other => format!("http-{}", other.as_u16()),
    }
}

/// Pick the fields we care about out of a product object.
///
/// The two store engines name things differently; every field is optional.
fn extract_raw(product: &Value) -> RawMetadata {
    RawMetadata {
        name: first_str(product, &["title", "name"]),
        developer_name: first_str(product, &["developer", "author", "seller"]).or_else(|| {
            ["developer", "author"]
                .iter()
                .find_map(|key| product.get(key).and_then(|v| first_str(v, &["name"])))
        }),
        rating: first_f64(product, &["rating", "average_rating"]),
        ratings_count: first_i64(product, &["reviews", "ratings_count", "rating_count"]),
        icon_url: first_str(product, &["thumbnail", "icon"]),
    }
}

fn first_str(value: &Value, keys: &[&str]) -> Option<String> {
    keys.iter()
        .find_map(|key| value.get(key).and_then(Value::as_str))
        .map(str::to_string)
}

fn first_f64(value: &Value, keys: &[&str]) -> Option<f64> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    })
}

fn first_i64(value: &Value, keys: &[&str]) -> Option<i64> {
    keys.iter().find_map(|key| match value.get(key)? {
        Value::Number(n) => n.as_i64().or_else(|| n.as_f64().map(|f| f as i64)),
        Value::String(s) => s.replace([',', '_'], "").trim().parse().ok(),
        _ => None,
    })
}
