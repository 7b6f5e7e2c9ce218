use axum::Json;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use postgres_models::connection::{WithConnectionError, with_connection};
use postgres_models::models::search_history::SearchHistory;

use crate::AppState;
use crate::history_api::error_recorder::ErrorRecorder;
use crate::shared::extractors::request_id::RequestId;

use super::errors::{self, HandlerResult};
use super::models::{HistoryParams, HistoryResponse, SearchHistoryEntry};

const HANDLER_NAME: &str = "search_recent";
const DEFAULT_LIMIT: i64 = 10;
const MAX_LIMIT: i64 = 100;

/// Parse the raw limit parameter. Absent means 10; a numeric value is
/// clamped to [1, 100]; anything else is rejected.
fn parse_limit(raw: Option<&str>) -> Result<i64, errors::Error> {
    let limit = match raw {
        None => DEFAULT_LIMIT,
        Some(s) => s
            .trim()
            .parse::<i64>()
            .map_err(|_| errors::Error::InvalidLimit(s.to_string()))?,
    };

    Ok(limit.clamp(1, MAX_LIMIT))
}

/// Get the most recent searches
///
/// Returns up to `limit` history entries ordered by search time
/// descending.
#[utoipa::path(
    get,
    path = "/history",
    params(
        ("limit" = Option<String>, Query,
            description = "Maximum number of entries to return (default 10, clamped to 1-100)"),
    ),
    responses(
        (status = 200, description = "Most recent searches", body = HistoryResponse),
        (status = 400, description = "Non-numeric limit"),
        (status = 500, description = "Internal server error"),
    ),
    tag = "search",
)]
#[tracing::instrument(skip_all, name = "search_recent")]
pub async fn handler(
    State(state): State<AppState>,
    RequestId(request_id): RequestId,
    Query(params): Query<HistoryParams>,
) -> HandlerResult<(StatusCode, Json<HistoryResponse>)> {
    let recorder =
        ErrorRecorder::new(&state.metrics, HANDLER_NAME, &request_id);

    let limit = parse_limit(params.limit.as_deref())
        .map_err(|e| recorder.record("invalid_limit", e))?;

    let entries = with_connection(&state.pool, |mut conn| async move {
        SearchHistory::get_latest(limit, &mut conn).await
    })
    .await
    .map_err(|e| match e {
        WithConnectionError::Pool(e) => recorder
            .record("pool_error", errors::Error::PoolError(e.to_string())),
        WithConnectionError::Operation(e) => {
            recorder.record("database_error", errors::Error::DatabaseError(e))
        }
    })?;

    state.metrics.history_reads.inc();

    let history = entries
        .into_iter()
        .map(|e| SearchHistoryEntry {
            id: e.id,
            query: e.query,
            search_time: e.search_time,
            results_count: e.results_count,
        })
        .collect();

    Ok((StatusCode::OK, Json(HistoryResponse { history })))
}

#[cfg(test)]
mod tests {
    use super::{DEFAULT_LIMIT, MAX_LIMIT, parse_limit};
    use pretty_assertions::assert_eq;

    #[test]
    fn absent_limit_defaults_to_ten() {
        assert_eq!(parse_limit(None).unwrap(), DEFAULT_LIMIT);
    }

    #[test]
    fn numeric_limit_is_parsed() {
        assert_eq!(parse_limit(Some("3")).unwrap(), 3);
        assert_eq!(parse_limit(Some(" 42 ")).unwrap(), 42);
    }

    #[test]
    fn limit_is_clamped_to_bounds() {
        assert_eq!(parse_limit(Some("0")).unwrap(), 1);
        assert_eq!(parse_limit(Some("-7")).unwrap(), 1);
        assert_eq!(parse_limit(Some("1000")).unwrap(), MAX_LIMIT);
    }

    #[test]
    fn non_numeric_limit_is_rejected() {
        assert!(parse_limit(Some("abc")).is_err());
        assert!(parse_limit(Some("")).is_err());
        assert!(parse_limit(Some("1.5")).is_err());
    }
}
