use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Wire-level error envelope.
///
/// Every error response carries the same stable JSON shape:
/// `{"error": "<message>"}`; the HTTP status code drives failure
/// signaling.
#[derive(Debug, Clone)]
pub struct ApiError {
    pub(crate) status_code: StatusCode,
    pub(crate) message: String,
}

impl ApiError {
    pub fn bad_request(message: String) -> Self {
        Self {
            status_code: StatusCode::BAD_REQUEST,
            message,
        }
    }

    pub fn method_not_allowed(message: String) -> Self {
        Self {
            status_code: StatusCode::METHOD_NOT_ALLOWED,
            message,
        }
    }

    pub fn internal_server_error(message: String) -> Self {
        Self {
            status_code: StatusCode::INTERNAL_SERVER_ERROR,
            message,
        }
    }

    pub fn service_unavailable(message: String) -> Self {
        Self {
            status_code: StatusCode::SERVICE_UNAVAILABLE,
            message,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status_code, Json(json!({ "error": self.message })))
            .into_response()
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.status_code, self.message)
    }
}

impl std::error::Error for ApiError {}

#[cfg(test)]
mod tests {
    use super::ApiError;
    use axum::http::StatusCode;
    use axum::response::IntoResponse;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn renders_the_error_envelope() {
        let response =
            ApiError::method_not_allowed("Method not allowed".to_string())
                .into_response();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(
            response
                .headers()
                .get(axum::http::header::CONTENT_TYPE)
                .unwrap(),
            "application/json"
        );

        let bytes =
            axum::body::to_bytes(response.into_body(), usize::MAX).await.unwrap();
        let body: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(
            body,
            serde_json::json!({ "error": "Method not allowed" })
        );
    }
}
