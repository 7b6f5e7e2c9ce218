use axum::Router;
use axum::http::{StatusCode, header};
use axum::response::IntoResponse;

use crate::history_api::wire_error::ApiError;

pub mod recent;
pub mod record;

pub fn get_routes(state: crate::AppState) -> Router {
    Router::new()
        .route(
            "/",
            axum::routing::get(recent::handler::handler)
                .post(record::handler::handler)
                .options(preflight)
                .fallback(method_not_allowed),
        )
        .with_state(state)
}

/// Answer a bare OPTIONS request (a browser preflight that carries the
/// `Access-Control-Request-Method` header is short-circuited by the CORS
/// layer before it reaches this handler): 200, empty body, no
/// content-type, and the method advertisement headers. The
/// `Access-Control-Allow-Origin` header is attached by the CORS layer.
async fn preflight() -> impl IntoResponse {
    (
        StatusCode::OK,
        [
            (header::ACCESS_CONTROL_ALLOW_METHODS, "GET, POST, OPTIONS"),
            (header::ACCESS_CONTROL_ALLOW_HEADERS, "Content-Type"),
            (header::ACCESS_CONTROL_MAX_AGE, "86400"),
        ],
    )
}

async fn method_not_allowed() -> ApiError {
    ApiError::method_not_allowed("Method not allowed".to_string())
}
