use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use postgres_models::connection::{WithConnectionError, with_connection};
use postgres_models::models::search_history::{NewSearchHistory, SearchHistory};

use crate::AppState;
use crate::history_api::error_recorder::ErrorRecorder;
use crate::shared::extractors::client_ip::ClientIp;
use crate::shared::extractors::payload::Payload;
use crate::shared::extractors::request_id::RequestId;

use super::errors::{self, HandlerResult};
use super::models::{RecordSearchRequest, RecordSearchResponse};

const HANDLER_NAME: &str = "search_record";

/// Record a search query
///
/// Stores the submitted query together with the client IP. The id and the
/// timestamp are assigned by the database; an absent query field is stored
/// as the empty string.
#[utoipa::path(
    post,
    path = "/history",
    request_body = RecordSearchRequest,
    responses(
        (status = 201, description = "Search saved", body = RecordSearchResponse),
        (status = 400, description = "Malformed request body"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "search",
)]
#[tracing::instrument(skip_all, name = "search_record")]
pub async fn handler(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    ClientIp(user_ip): ClientIp,
    Payload(payload): Payload<RecordSearchRequest>,
) -> HandlerResult<(StatusCode, Json<RecordSearchResponse>)> {
    tracing::info!(
        query = %payload.query,
        user_ip = %user_ip,
        request_id = %request_id,
        "Record search request",
    );

    let recorder =
        ErrorRecorder::new(&state.metrics, HANDLER_NAME, &request_id);

    let entry = NewSearchHistory {
        query: payload.query,
        user_ip,
    };
    with_connection(&state.pool, |mut conn| async move {
        SearchHistory::create(entry, &mut conn).await
    })
    .await
    .map_err(|e| match e {
        WithConnectionError::Pool(e) => recorder
            .record("pool_error", errors::Error::PoolError(e.to_string())),
        WithConnectionError::Operation(e) => {
            recorder.record("database_error", errors::Error::DatabaseError(e))
        }
    })?;

    state.metrics.searches_recorded.inc();

    Ok((
        StatusCode::CREATED,
        Json(RecordSearchResponse {
            success: true,
            message: "Search saved".to_string(),
        }),
    ))
}
