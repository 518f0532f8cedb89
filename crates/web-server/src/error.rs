use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use catalog::ServiceError;
use serde_json::json;
use thiserror::Error;

pub const INTERNAL_SERVER_ERROR: &str = "internal server error";
pub const SONG_NOT_FOUND: &str = "song not found";
pub const INVALID_RELEASE_DATE: &str = "invalid release_date";

#[derive(Error, Debug)]
pub enum AppError {
    /// The body could not be read as JSON of the expected shape.
    #[error("Bad request: {0}")]
    BadRequest(&'static str),
    /// Input was well-formed but failed validation.
    #[error("Validation failed: {0}")]
    Validation(&'static str),
    #[error("Not found: {0}")]
    NotFound(&'static str),
    #[error("Service error: {0}")]
    Service(#[from] ServiceError),
    /// A service failure that is always the server's fault, whatever its kind.
    #[error("Internal error: {0}")]
    Internal(ServiceError),
}

/// Converts our custom `AppError` into an HTTP response.
///
/// Every error body is `{"error": "<fixed message>"}`; the underlying cause
/// is only ever logged.
impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::Validation(message) => (StatusCode::UNPROCESSABLE_ENTITY, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Service(ServiceError::NotFound) => (StatusCode::NOT_FOUND, SONG_NOT_FOUND),
            AppError::Service(ServiceError::DateParse(_)) => {
                (StatusCode::UNPROCESSABLE_ENTITY, INVALID_RELEASE_DATE)
            }
            AppError::Service(service_err) | AppError::Internal(service_err) => {
                tracing::error!(error = %service_err, "Request failed.");
                (StatusCode::INTERNAL_SERVER_ERROR, INTERNAL_SERVER_ERROR)
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::CoreError;

    #[test]
    fn service_errors_map_to_statuses() {
        let cases = [
            (AppError::Service(ServiceError::NotFound), StatusCode::NOT_FOUND),
            (
                AppError::Service(ServiceError::DateParse(CoreError::InvalidReleaseDate(
                    "x".into(),
                ))),
                StatusCode::UNPROCESSABLE_ENTITY,
            ),
            (
                AppError::Internal(ServiceError::DateParse(CoreError::InvalidReleaseDate(
                    "x".into(),
                ))),
                StatusCode::INTERNAL_SERVER_ERROR,
            ),
            (AppError::Validation("invalid id"), StatusCode::UNPROCESSABLE_ENTITY),
            (AppError::BadRequest("invalid data"), StatusCode::BAD_REQUEST),
        ];
        for (error, status) in cases {
            assert_eq!(error.into_response().status(), status);
        }
    }
}
