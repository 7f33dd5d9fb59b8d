//! Read-only access to stored uploads

use crate::error::HttpAppError;
use crate::state::AppState;
use axum::{
    body::Body,
    extract::{Path, State},
    http::{header, StatusCode},
    response::Response,
};
use futures::StreamExt;
use picdrop_core::{validation::content_type_for, AppError};
use std::sync::Arc;

/// Stored names never change content, so clients may cache them indefinitely.
const IMMUTABLE_CACHE_CONTROL: &str = "public, max-age=31536000, immutable";

/// Serve a stored file by name.
#[tracing::instrument(skip(state), fields(operation = "get_upload"))]
pub async fn get_upload(
    Path(stored_name): Path<String>,
    State(state): State<Arc<AppState>>,
) -> Result<Response, HttpAppError> {
    let object = state.storage.open(&stored_name).await?;

    let body_stream = object.stream.map(|result| {
        result.map_err(|e| std::io::Error::other(format!("Storage stream error: {}", e)))
    });

    let response = Response::builder()
        .status(StatusCode::OK)
        .header(header::CONTENT_TYPE, content_type_for(&object.stored_name))
        .header(header::CONTENT_LENGTH, object.byte_size)
        .header(header::CACHE_CONTROL, IMMUTABLE_CACHE_CONTROL)
        .body(Body::from_stream(body_stream))
        .map_err(|e| {
            tracing::error!(error = %e, "Failed to build response");
            HttpAppError::from(AppError::Internal(e.to_string()))
        })?;

    Ok(response)
}
