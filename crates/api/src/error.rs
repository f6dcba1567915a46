//! HTTP mapping for application errors.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::debug;

use bucketfront_shared::AppError;

/// An [`AppError`] on its way out as an HTTP response.
///
/// The status comes from the error kind and the body is the plain-text
/// caller-facing message.
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        Self(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.0.status_code())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        debug!(status = %status, code = self.0.error_code(), "Responding with error");

        (status, self.0.message().to_string()).into_response()
    }
}
