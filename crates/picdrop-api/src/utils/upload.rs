//! Multipart extraction for the upload handlers

use axum::extract::multipart::{Multipart, MultipartError};
use axum::http::StatusCode;
use bytes::Bytes;
use picdrop_core::{validate, AppError};

/// Name of the multipart field carrying the upload.
pub const IMAGE_FIELD: &str = "image";

/// An accepted upload read from the request body
#[derive(Debug)]
pub struct ImageUpload {
    pub original_name: String,
    pub data: Bytes,
}

fn map_multipart_error(err: MultipartError, max_size: usize) -> AppError {
    if err.status() == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge(format!(
            "File size exceeds maximum allowed size of {} MB",
            max_size / 1024 / 1024
        ))
    } else {
        AppError::InvalidInput(format!("Failed to read multipart: {}", err.body_text()))
    }
}

/// Extract the single `image` file field from a multipart form.
///
/// The filename is validated before the field body is read, so a rejected upload
/// never reaches storage. Other fields are skipped. A second `image` file field
/// is an error.
pub async fn extract_image_field(
    mut multipart: Multipart,
    max_size: usize,
) -> Result<ImageUpload, AppError> {
    let mut upload: Option<ImageUpload> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| map_multipart_error(e, max_size))?
    {
        if field.name() != Some(IMAGE_FIELD) {
            continue;
        }

        let original_name = match field.file_name() {
            Some(name) if !name.is_empty() => name.to_string(),
            _ => continue,
        };

        if upload.is_some() {
            return Err(AppError::UnexpectedField(IMAGE_FIELD.to_string()));
        }

        validate(&original_name).into_result()?;

        let data = field
            .bytes()
            .await
            .map_err(|e| map_multipart_error(e, max_size))?;

        tracing::debug!(
            original_name = %original_name,
            size_bytes = data.len(),
            "Received image field"
        );

        upload = Some(ImageUpload {
            original_name,
            data,
        });
    }

    upload.ok_or(AppError::NoFileProvided)
}
