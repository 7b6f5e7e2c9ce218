//! Integration tests driving the full application router.
//!
//! The HTTP contract (CORS, 405, 404, payload rejection, limit parsing) is
//! exercised against a router whose pool never connects. The end-to-end
//! history flow needs a real PostgreSQL instance and runs only when
//! `TEST_DATABASE_URL` is set; it is skipped otherwise.

use std::sync::Arc;

use axum::http::{HeaderValue, Method, StatusCode, header};
use axum_test::TestServer;
use diesel_async::AsyncPgConnection;
use diesel_async::pooled_connection::{AsyncDieselConnectionManager, bb8};
use serde_json::{Value, json};

use history_api::metrics::ServerMetrics;
use history_api::shutdown::ShutdownCoordinator;
use history_api::{AppState, Config};

const MIGRATIONS: diesel_migrations::EmbeddedMigrations =
    diesel_migrations::embed_migrations!("./../../../db/migrations");

const HISTORY_ROUTE: &str = "/api/search/v1/history";

fn test_config(database_url: &str) -> Config {
    Config {
        api_service_port: "3000".to_string(),
        rust_log: "info".to_string(),
        log_format: String::new(),
        database_url: database_url.to_string(),
    }
}

fn state_with_pool(
    pool: postgres_models::connection::Pool,
    database_url: &str,
) -> AppState {
    AppState {
        metrics: Arc::new(ServerMetrics::new().unwrap()),
        pool: pool.clone(),
        config: Arc::new(test_config(database_url)),
        shutdown: Arc::new(ShutdownCoordinator::new(pool)),
    }
}

/// Router backed by a pool that never connects. Good enough for every
/// route that fails or finishes before touching the database.
fn build_test_server() -> TestServer {
    let url = "postgresql://localhost:5432/unused";
    let manager = AsyncDieselConnectionManager::<AsyncPgConnection>::new(url);
    let pool = bb8::Pool::builder().build_unchecked(manager);
    TestServer::new(history_api::app(state_with_pool(pool, url))).unwrap()
}

/// Router backed by the database named in `TEST_DATABASE_URL`, with
/// migrations applied and the history table emptied. `None` when the
/// variable is not set.
async fn build_db_test_server() -> Option<TestServer> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) => url,
        Err(_) => {
            eprintln!("TEST_DATABASE_URL not set, skipping database test");
            return None;
        }
    };

    let pool = postgres_models::connection::establish_connection(url.clone())
        .await
        .expect("failed to connect to the test database");

    let conn = pool
        .get_owned()
        .await
        .expect("failed to get a connection for migrations");
    postgres_models::connection::run_migrations(conn, MIGRATIONS)
        .await
        .expect("failed to run migrations");

    {
        use diesel_async::RunQueryDsl;

        let mut conn = pool.get_owned().await.expect("cleanup connection");
        diesel::delete(postgres_models::schema::search_history::table)
            .execute(&mut conn)
            .await
            .expect("failed to empty search_history");
    }

    let server =
        TestServer::new(history_api::app(state_with_pool(pool, &url)))
            .unwrap();
    Some(server)
}

#[tokio::test]
async fn test_bare_options_returns_cors_contract() {
    let server = build_test_server();

    let response = server
        .method(Method::OPTIONS, HISTORY_ROUTE)
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost"))
        .await;

    response.assert_status_ok();
    assert_eq!(response.text(), "");

    let headers = response.headers();
    assert_eq!(
        headers.get("access-control-allow-origin").unwrap(),
        "*"
    );
    assert_eq!(
        headers.get("access-control-allow-methods").unwrap(),
        "GET, POST, OPTIONS"
    );
    assert_eq!(
        headers.get("access-control-allow-headers").unwrap(),
        "Content-Type"
    );
    assert_eq!(headers.get("access-control-max-age").unwrap(), "86400");
    assert!(headers.get(header::CONTENT_TYPE).is_none());
}

#[tokio::test]
async fn test_browser_preflight_is_answered_by_the_cors_layer() {
    let server = build_test_server();

    let response = server
        .method(Method::OPTIONS, HISTORY_ROUTE)
        .add_header(header::ORIGIN, HeaderValue::from_static("http://localhost"))
        .add_header(
            header::ACCESS_CONTROL_REQUEST_METHOD,
            HeaderValue::from_static("POST"),
        )
        .await;

    response.assert_status_ok();

    let headers = response.headers();
    assert_eq!(headers.get("access-control-allow-origin").unwrap(), "*");
    let allow_methods = headers
        .get("access-control-allow-methods")
        .unwrap()
        .to_str()
        .unwrap()
        .to_string();
    assert!(allow_methods.contains("POST"));
    assert_eq!(headers.get("access-control-max-age").unwrap(), "86400");
}

#[tokio::test]
async fn test_unsupported_method_returns_405_envelope() {
    let server = build_test_server();

    let response = server.method(Method::DELETE, HISTORY_ROUTE).await;

    response.assert_status(StatusCode::METHOD_NOT_ALLOWED);
    let body: Value = response.json();
    assert_eq!(body, json!({ "error": "Method not allowed" }));
    assert_eq!(
        response.headers().get("access-control-allow-origin").unwrap(),
        "*"
    );
}

#[tokio::test]
async fn test_unknown_path_returns_404_envelope() {
    let server = build_test_server();

    let response = server.get("/api/search/v1/nope").await;

    response.assert_status(StatusCode::NOT_FOUND);
    let body: Value = response.json();
    assert_eq!(body["error"], "Not Found");
    assert_eq!(body["status"], 404);
}

#[tokio::test]
async fn test_non_numeric_limit_returns_400() {
    let server = build_test_server();

    let response = server
        .get(HISTORY_ROUTE)
        .add_query_param("limit", "abc")
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(body["error"], "Invalid limit value: abc");
}

#[tokio::test]
async fn test_malformed_json_body_returns_400() {
    let server = build_test_server();

    let response = server
        .post(HISTORY_ROUTE)
        .content_type("application/json")
        .bytes("{not json".into())
        .await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["error"].is_string());
}

#[tokio::test]
async fn test_missing_json_content_type_returns_400() {
    let server = build_test_server();

    let response = server.post(HISTORY_ROUTE).text("query=cats").await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert_eq!(
        body["error"],
        "Content-Type header must be application/json"
    );
}

#[tokio::test]
async fn test_version_route() {
    let server = build_test_server();

    let response = server.get("/version").await;

    response.assert_status_ok();
    assert!(!response.text().is_empty());
}

#[tokio::test]
async fn test_metrics_route_exposes_domain_counters() {
    let server = build_test_server();

    let response = server.get("/metrics").await;

    response.assert_status_ok();
    let body = response.text();
    assert!(body.contains("searches_recorded"));
    assert!(body.contains("history_reads"));
}

#[tokio::test]
async fn test_openapi_spec_is_served() {
    let server = build_test_server();

    let response = server.get("/api-docs/openapi.json").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["info"]["title"], "Search History API");
}

#[tokio::test]
async fn test_history_flow_round_trip() {
    let Some(server) = build_db_test_server().await else {
        return;
    };

    // Record one search and read it straight back.
    let response = server
        .post(HISTORY_ROUTE)
        .json(&json!({ "query": "cats" }))
        .await;
    response.assert_status(StatusCode::CREATED);
    let body: Value = response.json();
    assert_eq!(body, json!({ "success": true, "message": "Search saved" }));

    let response = server
        .get(HISTORY_ROUTE)
        .add_query_param("limit", "1")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0]["query"], "cats");
    assert!(history[0]["id"].is_i64());
    assert!(history[0]["search_time"].is_string());
    assert!(history[0]["results_count"].is_null());

    // A missing query field is stored as the empty string.
    let response = server.post(HISTORY_ROUTE).json(&json!({})).await;
    response.assert_status(StatusCode::CREATED);

    // Fill the table up to 12 entries.
    for i in 0..10 {
        let response = server
            .post(HISTORY_ROUTE)
            .json(&json!({ "query": format!("query-{i}") }))
            .await;
        response.assert_status(StatusCode::CREATED);
    }

    // A limit below the row count truncates, newest first.
    let response = server
        .get(HISTORY_ROUTE)
        .add_query_param("limit", "3")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 3);
    assert_eq!(history[0]["query"], "query-9");
    assert_eq!(history[1]["query"], "query-8");
    assert_eq!(history[2]["query"], "query-7");

    // A limit above the row count returns everything.
    let response = server
        .get(HISTORY_ROUTE)
        .add_query_param("limit", "50")
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    let history = body["history"].as_array().unwrap();
    assert_eq!(history.len(), 12);
    let empty_query = history
        .iter()
        .filter(|entry| entry["query"] == "")
        .count();
    assert_eq!(empty_query, 1);
}
