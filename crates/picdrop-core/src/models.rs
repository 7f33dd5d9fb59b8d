//! Domain models shared by storage and the HTTP layer.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::path::PathBuf;

/// URL path segment under which the storage directory is served read-only.
pub const PUBLIC_PREFIX: &str = "uploads";

/// A file persisted by a successful upload. Never mutated after creation.
#[derive(Debug, Clone, Serialize)]
pub struct StoredAsset {
    /// Generated name plus the original extension, unique in the storage root.
    pub stored_name: String,
    pub path: PathBuf,
    pub byte_size: u64,
    pub stored_at: DateTime<Utc>,
}

impl StoredAsset {
    /// Path portion of the public URL, e.g. `/uploads/1a2b3c.png`.
    pub fn public_path(&self) -> String {
        format!("/{}/{}", PUBLIC_PREFIX, self.stored_name)
    }
}

/// Compose `{base}/{prefix}/{stored_name}`, where `base` is `{scheme}://{host}`.
pub fn public_url(base: &str, prefix: &str, stored_name: &str) -> String {
    format!(
        "{}/{}/{}",
        base.trim_end_matches('/'),
        prefix.trim_matches('/'),
        stored_name
    )
}

/// JSON body of the API upload endpoint: `{status, data: {link}}`.
///
/// Failures add the client message, a machine-readable `code` and whether the
/// same request may succeed when retried.
#[derive(Debug, Clone, Serialize)]
pub struct UploadPayload {
    pub status: u16,
    pub data: UploadData,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recoverable: Option<bool>,
}

#[derive(Debug, Clone, Serialize)]
pub struct UploadData {
    pub link: Option<String>,
}

impl UploadPayload {
    pub fn success(link: String) -> Self {
        Self {
            status: 200,
            data: UploadData { link: Some(link) },
            error: None,
            code: None,
            recoverable: None,
        }
    }

    pub fn failure(status: u16, message: Option<String>) -> Self {
        Self {
            status,
            data: UploadData { link: None },
            error: message,
            code: None,
            recoverable: None,
        }
    }

    pub fn with_error_code(mut self, code: &str, recoverable: bool) -> Self {
        self.code = Some(code.to_string());
        self.recoverable = Some(recoverable);
        self
    }
}
