use axum::Router;

pub(crate) mod history;

pub fn get_routes(state: crate::AppState) -> Router {
    Router::new().nest("/history", history::get_routes(state))
}
