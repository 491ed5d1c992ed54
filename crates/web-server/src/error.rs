use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Database error: {0}")]
    Database(#[from] database::DbError),
    #[error("Invalid to-do: {0}")]
    Core(#[from] core_types::CoreError),
    #[error("Invalid input: {0}")]
    InvalidInput(String),
    #[error("Not found: {0}")]
    NotFound(String),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Bodies are plain text. The htmx client does not swap error responses, so they
/// only matter to someone reading the network log.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::Database(db_err) => {
                tracing::error!(error = ?db_err, "Database error.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "An internal database error occurred".to_string(),
                )
            }
            // Empty content is treated as an unrecoverable handler failure.
            AppError::Core(core_err) => {
                tracing::error!(error = %core_err, "Rejected to-do.");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal Server Error".to_string(),
                )
            }
            AppError::InvalidInput(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
        };

        (status, error_message).into_response()
    }
}
