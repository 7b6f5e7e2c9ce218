use utoipa::OpenApi;

/// Main OpenAPI documentation for the Search v1 API
#[derive(OpenApi)]
#[openapi(
    paths(
        crate::history_api::core::v1::history::record::handler::handler,
        crate::history_api::core::v1::history::recent::handler::handler,
    ),
    info(
        title = "Search History API",
        version = "1.0.0",
        description = "REST API for recording search queries and reading back the most recent history",
        license(name = "Apache-2.0")
    ),
    servers(
        (url = "/api/search/v1", description = "API v1")
    ),
    tags(
        (name = "search", description = "Search history recording and retrieval")
    )
)]
pub struct SearchV1ApiDoc;
