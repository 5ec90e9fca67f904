use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use rivals_client::{SearchApiConfig, SearchApiProvider};
use rivals_core::OnboardingConfig;
use rivals_db::{Database, DatabaseConfig};
use rivals_server::routes;
use rivals_server::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let _ = dotenvy::dotenv();

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("rivals=info".parse()?))
        .with_target(false)
        .init();

    let port = std::env::var("RIVALS_SERVER_PORT").unwrap_or_else(|_| "3000".to_string());
    let addr = format!("0.0.0.0:{port}");

    let config = OnboardingConfig::from_env()?;
    // The HTTP client gives up shortly after the onboarding deadline.
    let provider = SearchApiProvider::from_config(&SearchApiConfig::from_env()?)?
        .with_timeout(config.metadata_timeout + Duration::from_secs(1))?;

    let db = Database::connect(&DatabaseConfig::from_env()?).await?;
    db.migrate().await?;

    tracing::info!(
        max_competitors = config.max_competitors,
        metadata_timeout_ms = config.metadata_timeout.as_millis() as u64,
        "Onboarding configured"
    );

    let state = Arc::new(AppState {
        db,
        provider,
        config,
    });

    let app = routes::router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    tracing::info!("Starting server on {addr}");
    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to install CTRL+C handler");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
