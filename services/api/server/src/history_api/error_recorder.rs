use std::sync::Arc;

use uuid::Uuid;

use crate::history_api::wire_error::ApiError;
use crate::metrics::ServerMetrics;

/// Trait for handler error types that can be converted to [`ApiError`].
pub trait IntoApiError {
    fn into_api_error(self) -> ApiError;
}

/// Records error metrics and converts handler errors to [`ApiError`].
///
/// Replaces per-handler `record_err` closures with a single reusable type.
pub struct ErrorRecorder<'a> {
    metrics: &'a Arc<ServerMetrics>,
    handler_name: &'a str,
    request_id: &'a Uuid,
}

impl<'a> ErrorRecorder<'a> {
    pub fn new(
        metrics: &'a Arc<ServerMetrics>,
        handler_name: &'a str,
        request_id: &'a Uuid,
    ) -> Self {
        Self {
            metrics,
            handler_name,
            request_id,
        }
    }

    pub fn record<E>(&self, code: &str, e: E) -> ApiError
    where
        E: IntoApiError + std::fmt::Display,
    {
        self.metrics.record_error(self.handler_name, code);
        tracing::error!(
            handler = self.handler_name,
            error_code = code,
            request_id = %self.request_id,
            "{e}",
        );
        e.into_api_error()
    }
}
