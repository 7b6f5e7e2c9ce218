//! # Search History API Server
//!
use crate::metrics::ServerMetrics;
use crate::shutdown::ShutdownCoordinator;
use std::sync::Arc;
// Private API modules - internal implementation details
mod history_api;

// OpenAPI documentation module
pub mod openapi;

// Public modules - shared utilities and middleware
// These provide common functionality that can be used across the application
pub mod health;
pub mod metrics;
pub mod shared;
pub mod shutdown;

pub const VERSION: Option<&'static str> = option_env!("VERSION");

// Public API surface - only expose route registration functions
// This provides a clean API boundary where external code can only access
// the route registration functions without depending on internal module structure

pub use history_api::core::v1::get_routes as get_search_api_v1_routes;

/// Returns the OpenAPI documentation routes for the Search v1 API
/// (Swagger UI plus the OpenAPI JSON spec)
pub fn get_openapi_routes() -> axum::Router {
    use utoipa::OpenApi;
    use utoipa_swagger_ui::SwaggerUi;

    axum::Router::new().without_v07_checks().merge(
        SwaggerUi::new("/swagger-ui")
            .url("/api-docs/openapi.json", openapi::SearchV1ApiDoc::openapi()),
    )
}

async fn fallback_handler()
-> (axum::http::StatusCode, axum::Json<serde_json::Value>) {
    (
        axum::http::StatusCode::NOT_FOUND,
        axum::Json(serde_json::json!({
            "error": "Not Found",
            "message": "The requested endpoint does not exist",
            "status": 404
        })),
    )
}

/// Assemble the full application router: domain routes under
/// `/api/search/v1`, the health/version/metrics endpoints, the 404
/// fallback, and the layer stack.
///
/// Kept separate from `main` so integration tests drive the exact router
/// the binary serves.
pub fn app(state: AppState) -> axum::Router {
    use axum::http::{Method, StatusCode, header};
    use std::time::Duration;
    use tower_http::{
        catch_panic::CatchPanicLayer, compression::CompressionLayer,
        cors::Any, cors::CorsLayer, trace::TraceLayer,
    };

    // The browser contract: any origin, the three advertised methods,
    // Content-Type only, preflight cached for a day.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([header::CONTENT_TYPE])
        .max_age(Duration::from_secs(86400));

    axum::Router::new()
        .without_v07_checks()
        .route("/health", {
            let state = state.clone();
            axum::routing::get(move || {
                let state = state.clone();
                async move { health::handler(state).await }
            })
        })
        .route(
            "/version",
            axum::routing::get(|| async { VERSION.unwrap_or("unknown") }),
        )
        .route("/metrics", {
            let metrics = state.metrics.clone();
            axum::routing::get(move || {
                let metrics = metrics.clone();
                async move {
                    (
                        StatusCode::OK,
                        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
                        metrics.render(),
                    )
                }
            })
        })
        .nest("/api/search/v1", get_search_api_v1_routes(state))
        .fallback(fallback_handler)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .layer(CompressionLayer::new())
        .layer(CatchPanicLayer::new())
        .merge(get_openapi_routes())
}

#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<ServerMetrics>,
    pub pool: postgres_models::connection::Pool,
    pub config: Arc<Config>,
    pub shutdown: Arc<ShutdownCoordinator>,
}

impl axum::extract::FromRef<AppState> for postgres_models::connection::Pool {
    fn from_ref(state: &AppState) -> Self {
        state.pool.clone()
    }
}

#[derive(Debug, serde::Deserialize)]
pub struct Config {
    // Service port
    #[serde(default = "default_api_service_port")]
    pub api_service_port: String,

    // Loggers
    #[serde(default = "default_rust_log")]
    pub rust_log: String,
    #[serde(default)]
    pub log_format: String,

    // Db configs
    #[serde(default)]
    pub database_url: String,
}

fn default_api_service_port() -> String {
    "3000".to_string()
}

fn default_rust_log() -> String {
    "info".to_string()
}

impl Config {
    pub fn load() -> anyhow::Result<Self> {
        // Load .env file if present (useful when running outside docker-compose)
        match dotenv::dotenv() {
            Ok(path) => eprintln!("Loaded .env from: {}", path.display()),
            Err(e) => eprintln!("dotenv warning: {e}"),
        }

        envy::from_env::<Config>()?.validate()
    }

    /// The connection string is the one piece of configuration without a
    /// usable default; refuse to boot without it.
    pub fn validate(self) -> anyhow::Result<Self> {
        if self.database_url.is_empty() {
            anyhow::bail!("Database URL not configured");
        }
        Ok(self)
    }
}
