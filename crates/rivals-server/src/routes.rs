use std::sync::Arc;

use axum::Router;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::routing::{delete, get};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;
use uuid::Uuid;

use rivals_core::traits::CompetitorStore;
use rivals_core::{AppError, OnboardingService, RemovalService};

use crate::dto::{
    CompetitorListResponse, CreateCompetitorRequest, CreateCompetitorResponse, HealthResponse,
    RemoveCompetitorResponse,
};
use crate::error::ApiError;
use crate::openapi::ApiDoc;
use crate::state::AppState;

/// Build the full router with all routes.
pub fn router(state: Arc<AppState>) -> Router {
    let api = Router::new()
        .route(
            "/projects/{project_id}/competitors",
            get(list_competitors).post(create_competitor),
        )
        .route(
            "/projects/{project_id}/competitors/{id}",
            delete(remove_competitor),
        );

    let public = Router::new()
        .route("/health", get(health))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()));

    public.merge(api).with_state(state)
}

// ---------------------------------------------------------------------------
// Competitors
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/projects/{project_id}/competitors",
    params(("project_id" = String, Path, description = "Owning project")),
    request_body = CreateCompetitorRequest,
    responses(
        (status = 201, description = "Competitor onboarded", body = CreateCompetitorResponse),
        (status = 400, description = "Invalid store URL, unreadable body, or roster full", body = crate::dto::ErrorResponse),
        (status = 502, description = "Metadata lookup failed or timed out", body = crate::dto::ErrorResponse),
        (status = 500, description = "Storage failure", body = crate::dto::ErrorResponse),
    ),
    tag = "competitors"
)]
pub async fn create_competitor(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
    body: Result<axum::Json<CreateCompetitorRequest>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError> {
    // A body we cannot read carries no usable store URL.
    let axum::Json(body) = body.map_err(|rejection| {
        tracing::debug!(error = %rejection.body_text(), "Rejected competitor request body");
        AppError::InvalidStoreUrl
    })?;

    let service = OnboardingService::new(
        state.db.competitor_repo(),
        state.provider.clone(),
        &state.config,
    );

    let onboarded = service.create(&project_id, &body.store_url).await?;

    Ok((
        StatusCode::CREATED,
        axum::Json(CreateCompetitorResponse::from(onboarded)),
    ))
}

#[utoipa::path(
    get,
    path = "/projects/{project_id}/competitors",
    params(("project_id" = String, Path, description = "Owning project")),
    responses(
        (status = 200, description = "Active competitors, oldest first", body = CompetitorListResponse),
        (status = 500, description = "Storage failure", body = crate::dto::ErrorResponse),
    ),
    tag = "competitors"
)]
pub async fn list_competitors(
    State(state): State<Arc<AppState>>,
    Path(project_id): Path<String>,
) -> Result<impl IntoResponse, ApiError> {
    let competitors = state.db.competitor_repo().list_active(&project_id).await?;

    let response = CompetitorListResponse {
        total: competitors.len(),
        limit: state.config.max_competitors,
        competitors: competitors.into_iter().map(Into::into).collect(),
    };

    Ok(axum::Json(response))
}

#[utoipa::path(
    delete,
    path = "/projects/{project_id}/competitors/{id}",
    params(
        ("project_id" = String, Path, description = "Owning project"),
        ("id" = String, Path, description = "Competitor UUID"),
    ),
    responses(
        (status = 200, description = "Competitor removed", body = RemoveCompetitorResponse),
        (status = 404, description = "No active competitor with this id in the project", body = crate::dto::ErrorResponse),
    ),
    tag = "competitors"
)]
pub async fn remove_competitor(
    State(state): State<Arc<AppState>>,
    Path((project_id, id)): Path<(String, String)>,
) -> Result<impl IntoResponse, ApiError> {
    // A malformed id cannot name an existing competitor.
    let competitor_id: Uuid = id
        .parse()
        .map_err(|_| AppError::NotFound(format!("Competitor not found: {id}")))?;

    let service = RemovalService::new(state.db.competitor_repo(), state.db.crawl_repo());
    service.remove(&project_id, competitor_id).await?;

    Ok(axum::Json(RemoveCompetitorResponse {
        message: "Competitor removed".to_string(),
    }))
}

// ---------------------------------------------------------------------------
// Health
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse),
    ),
    tag = "system"
)]
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    match state.db.health_check().await {
        Ok(()) => (
            StatusCode::OK,
            axum::Json(HealthResponse {
                status: "healthy",
                database: "ok",
            }),
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            (
                StatusCode::SERVICE_UNAVAILABLE,
                axum::Json(HealthResponse {
                    status: "unhealthy",
                    database: "error",
                }),
            )
        }
    }
}
