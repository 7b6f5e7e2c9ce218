use std::time::{Duration, Instant};

use axum::Json;
use axum::http::StatusCode;
use diesel_async::RunQueryDsl;
use serde::Serialize;

use crate::AppState;

const POSTGRES_TIMEOUT: Duration = Duration::from_secs(5);

#[derive(Serialize, Clone, Copy, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum HealthStatus {
    Healthy,
    Unhealthy,
}

#[derive(Serialize)]
pub struct ComponentHealth {
    pub status: HealthStatus,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Serialize)]
pub struct HealthResponse {
    pub status: HealthStatus,
    pub postgres: ComponentHealth,
}

pub async fn handler(state: AppState) -> (StatusCode, Json<HealthResponse>) {
    let postgres = check_postgres(&state.pool).await;

    let overall = if state.shutdown.is_shutting_down()
        || postgres.status == HealthStatus::Unhealthy
    {
        HealthStatus::Unhealthy
    } else {
        HealthStatus::Healthy
    };

    let status_code = if overall == HealthStatus::Unhealthy {
        StatusCode::SERVICE_UNAVAILABLE
    } else {
        StatusCode::OK
    };

    (
        status_code,
        Json(HealthResponse {
            status: overall,
            postgres,
        }),
    )
}

async fn check_postgres(
    pool: &postgres_models::connection::Pool,
) -> ComponentHealth {
    let start = Instant::now();
    let result = tokio::time::timeout(POSTGRES_TIMEOUT, async {
        let mut conn = pool.get_owned().await.map_err(|e| e.to_string())?;
        diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map_err(|e| e.to_string())?;
        Ok::<(), String>(())
    })
    .await;

    let latency_ms = start.elapsed().as_millis() as u64;

    match result {
        Ok(Ok(())) => ComponentHealth {
            status: HealthStatus::Healthy,
            latency_ms: Some(latency_ms),
            error: None,
        },
        Ok(Err(e)) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            latency_ms: Some(latency_ms),
            error: Some(e),
        },
        Err(_) => ComponentHealth {
            status: HealthStatus::Unhealthy,
            latency_ms: Some(latency_ms),
            error: Some("timeout".to_string()),
        },
    }
}
