use utoipa::OpenApi;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Rivals API",
        version = "0.1.0",
        description = "Onboard and remove tracked competitor apps per project."
    ),
    paths(
        crate::routes::create_competitor,
        crate::routes::list_competitors,
        crate::routes::remove_competitor,
        crate::routes::health,
    ),
    components(schemas(
        crate::dto::CreateCompetitorRequest,
        crate::dto::CreateCompetitorResponse,
        crate::dto::CompetitorResponse,
        crate::dto::DiscoveredChannelResponse,
        crate::dto::CompetitorListResponse,
        crate::dto::RemoveCompetitorResponse,
        crate::dto::HealthResponse,
        crate::dto::ErrorResponse,
    )),
    tags(
        (name = "competitors", description = "Competitor roster management"),
        (name = "system", description = "Health and system status"),
    )
)]
pub struct ApiDoc;
