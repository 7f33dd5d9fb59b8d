//! HTTP error response conversion
//!
//! Two renderings of the same `AppError`:
//! - `HttpAppError`: plain-text body with the client message (form and file routes)
//! - `ApiError`: `{status, data: {link: null}, error, code, recoverable}` JSON body (API route)
//!
//! Both pick the status code from `ErrorMetadata` and log at the error's level.
//! Sensitive errors only ever expose their generic client message.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use picdrop_core::{AppError, ErrorMetadata, LogLevel, UploadPayload};
use picdrop_storage::StorageError;

/// Wrapper type for AppError to implement IntoResponse
/// This is necessary because of Rust's orphan rules - we can't implement
/// IntoResponse (external trait) for AppError (external type from picdrop-core)
#[derive(Debug)]
pub struct HttpAppError(pub AppError);

impl From<AppError> for HttpAppError {
    fn from(err: AppError) -> Self {
        HttpAppError(err)
    }
}

impl From<StorageError> for HttpAppError {
    fn from(err: StorageError) -> Self {
        HttpAppError(AppError::from(err))
    }
}

/// AppError rendered as the JSON upload payload
#[derive(Debug)]
pub struct ApiError(pub AppError);

impl From<AppError> for ApiError {
    fn from(err: AppError) -> Self {
        ApiError(err)
    }
}

fn log_error(error: &AppError) {
    let error_type = error.error_type();
    let error_code = error.error_code();
    match error.log_level() {
        LogLevel::Debug => {
            tracing::debug!(error = %error, error_type, error_code, "Error occurred");
        }
        LogLevel::Warn => {
            tracing::warn!(error = %error, error_type, error_code, "Error occurred");
        }
        LogLevel::Error => {
            tracing::error!(
                error = %error,
                error_type,
                error_code,
                recoverable = error.is_recoverable(),
                details = %error.detailed_message(),
                "Error occurred"
            );
        }
    }
}

fn status_of(error: &AppError) -> StatusCode {
    StatusCode::from_u16(error.http_status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

impl IntoResponse for HttpAppError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        log_error(app_error);

        (status_of(app_error), app_error.client_message()).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let app_error = &self.0;
        log_error(app_error);

        let status = status_of(app_error);
        let payload = UploadPayload::failure(status.as_u16(), Some(app_error.client_message()))
            .with_error_code(app_error.error_code(), app_error.is_recoverable());

        (status, Json(payload)).into_response()
    }
}
