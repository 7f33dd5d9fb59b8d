//! Upload handlers: the HTML form target and the JSON API

use crate::error::{ApiError, HttpAppError};
use crate::state::AppState;
use crate::utils::{extract_image_field, request_base_url};
use axum::{
    extract::{multipart::MultipartRejection, Multipart, State},
    http::{HeaderMap, Uri},
    response::Html,
    Json,
};
use picdrop_core::{public_url, AppError, StoredAsset, UploadPayload, PUBLIC_PREFIX};
use std::sync::Arc;

/// Validate and persist the `image` field of the request.
async fn receive_upload(
    state: &AppState,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<StoredAsset, AppError> {
    let multipart = multipart.map_err(|rejection| {
        tracing::debug!(rejection = %rejection, "Request body is not a multipart form");
        AppError::NoFileProvided
    })?;

    let upload = extract_image_field(multipart, state.config.max_file_size_bytes()).await?;

    let asset = state
        .storage
        .store(&upload.original_name, upload.data)
        .await?;

    tracing::info!(
        original_name = %upload.original_name,
        stored_name = %asset.stored_name,
        size_bytes = asset.byte_size,
        "Upload stored"
    );

    Ok(asset)
}

/// Form upload: answers with an HTML link to the stored file.
#[tracing::instrument(skip(state, multipart), fields(operation = "upload_form"))]
pub async fn upload_form(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Html<String>, HttpAppError> {
    let asset = receive_upload(&state, multipart).await?;

    Ok(Html(format!(
        "Файл загружен: <a href=\"{}\">{}</a>",
        asset.public_path(),
        asset.stored_name
    )))
}

/// API upload: answers with `{status, data: {link}}` carrying an absolute URL.
#[tracing::instrument(skip(state, headers, multipart), fields(operation = "upload_api"))]
pub async fn upload_api(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    uri: Uri,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<UploadPayload>, ApiError> {
    let asset = receive_upload(&state, multipart).await?;

    let base = request_base_url(&headers, &uri, &state.config);
    let link = public_url(&base, PUBLIC_PREFIX, &asset.stored_name);

    Ok(Json(UploadPayload::success(link)))
}
