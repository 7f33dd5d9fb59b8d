//! Intake validation for uploaded files.
//!
//! The verdict depends only on the client-declared filename extension. File content
//! is not inspected.

use crate::error::AppError;

/// Extensions accepted as images (compared case-insensitively).
pub const ALLOWED_EXTENSIONS: [&str; 4] = ["jpeg", "jpg", "png", "bmp"];

/// User-facing rejection reason naming the allowed set.
pub const REJECTION_REASON: &str = "Только изображения в формате jpeg, jpg, png, bmp";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ValidationVerdict {
    Accepted,
    Rejected(String),
}

impl ValidationVerdict {
    pub fn is_accepted(&self) -> bool {
        matches!(self, ValidationVerdict::Accepted)
    }

    pub fn into_result(self) -> Result<(), AppError> {
        match self {
            ValidationVerdict::Accepted => Ok(()),
            ValidationVerdict::Rejected(reason) => Err(AppError::ValidationRejected(reason)),
        }
    }
}

/// Extension of `filename`: the text after the last `.`, or `None` when there is
/// no dot or nothing follows it.
pub fn extension_of(filename: &str) -> Option<&str> {
    filename
        .rsplit_once('.')
        .map(|(_, ext)| ext)
        .filter(|ext| !ext.is_empty())
}

/// Decide whether a file with this client-supplied name may be stored.
pub fn validate(original_name: &str) -> ValidationVerdict {
    let allowed = extension_of(original_name)
        .map(|ext| ext.to_lowercase())
        .is_some_and(|ext| ALLOWED_EXTENSIONS.contains(&ext.as_str()));

    if allowed {
        ValidationVerdict::Accepted
    } else {
        ValidationVerdict::Rejected(REJECTION_REASON.to_string())
    }
}

/// Content type used when serving a stored file back.
pub fn content_type_for(stored_name: &str) -> &'static str {
    match extension_of(stored_name).map(|e| e.to_lowercase()).as_deref() {
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("png") => "image/png",
        Some("bmp") => "image/bmp",
        _ => "application/octet-stream",
    }
}
