use crate::history_api::wire_error::ApiError;

pub type HandlerResult<T> = Result<T, ApiError>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),

    #[error("Failed to get database connection: {0}")]
    PoolError(String),
}

impl Error {
    pub fn to_api_error(self) -> ApiError {
        match self {
            Error::DatabaseError(e) => ApiError::internal_server_error(
                format!("Failed to save search: {e}"),
            ),
            Error::PoolError(e) => ApiError::service_unavailable(format!(
                "Service temporarily unavailable: {e}"
            )),
        }
    }
}

impl crate::history_api::error_recorder::IntoApiError for Error {
    fn into_api_error(self) -> ApiError {
        self.to_api_error()
    }
}
