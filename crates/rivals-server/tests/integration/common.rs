use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use testcontainers::core::{ContainerPort, WaitFor};
use testcontainers::runners::AsyncRunner;
use testcontainers::{ContainerAsync, GenericImage, ImageExt};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use rivals_client::SearchApiProvider;
use rivals_core::OnboardingConfig;
use rivals_db::Database;
use rivals_server::routes;
use rivals_server::state::AppState;

pub const TEST_API_KEY: &str = "test-searchapi-key";

/// Everything a test needs: the router, direct database access, and the
/// stubbed metadata provider.
pub struct TestApp {
    pub router: Router,
    pub db: Database,
    pub provider: MockServer,
    _container: ContainerAsync<GenericImage>,
}

/// Spin up PostgreSQL and a stub metadata provider with the default config.
pub async fn setup_test_app() -> TestApp {
    setup_test_app_with(OnboardingConfig::default()).await
}

pub async fn setup_test_app_with(config: OnboardingConfig) -> TestApp {
    let container = GenericImage::new("postgres", "16")
        .with_exposed_port(ContainerPort::Tcp(5432))
        .with_wait_for(WaitFor::message_on_stderr(
            "database system is ready to accept connections",
        ))
        .with_env_var("POSTGRES_PASSWORD", "postgres")
        .with_env_var("POSTGRES_DB", "rivals_test")
        .start()
        .await
        .expect("Failed to start PostgreSQL container");

    let host = container.get_host().await.expect("Failed to get host");
    let port = container
        .get_host_port_ipv4(5432)
        .await
        .expect("Failed to get port");

    let url = format!("postgresql://postgres:postgres@{host}:{port}/rivals_test");
    let pool = retry_connect(&url).await;

    let db = Database::from_pool(pool);
    db.migrate().await.expect("Failed to run migrations");

    let provider = MockServer::start().await;
    let client = SearchApiProvider::with_base_url(TEST_API_KEY, &provider.uri())
        .expect("Failed to build provider client");

    let state = Arc::new(AppState {
        db: db.clone(),
        provider: client,
        config,
    });

    TestApp {
        router: routes::router(state),
        db,
        provider,
        _container: container,
    }
}

/// Answer every `engine` lookup with a product named `name`.
pub async fn stub_product(server: &MockServer, engine: &str, name: &str) {
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .and(query_param("engine", engine))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "product": {
                "title": name,
                "developer": "Example Studio",
                "rating": 4.6,
                "reviews": 1200,
                "thumbnail": "https://cdn.example.com/icon.png"
            }
        })))
        .mount(server)
        .await;
}

/// Answer every lookup with the given HTTP status.
pub async fn stub_status(server: &MockServer, status: u16) {
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(ResponseTemplate::new(status))
        .mount(server)
        .await;
}

/// Answer every lookup only after `delay`.
pub async fn stub_slow(server: &MockServer, delay: Duration) {
    Mock::given(method("GET"))
        .and(path("/api/v1/search"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(serde_json::json!({ "product": { "title": "Slow App" } }))
                .set_delay(delay),
        )
        .mount(server)
        .await;
}

async fn retry_connect(url: &str) -> PgPool {
    for _ in 0..30 {
        if let Ok(pool) = PgPoolOptions::new().max_connections(5).connect(url).await {
            return pool;
        }
        tokio::time::sleep(Duration::from_millis(100)).await;
    }
    panic!("Failed to connect to test database");
}
