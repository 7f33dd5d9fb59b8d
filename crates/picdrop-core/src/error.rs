//! Error types module
//!
//! All failures of the upload pipeline are unified under `AppError`. Client errors
//! (rejected or missing files) carry their user-facing text verbatim; storage faults
//! keep their details for logs and show a generic message to the caller.

use crate::validation::REJECTION_REASON;

/// Message returned when the request carries no `image` file.
pub const NO_FILE_MESSAGE: &str = "Файл не загружен";

/// Log level for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LogLevel {
    /// Debug level - for expected errors like validation failures
    Debug,
    /// Warning level - for recoverable issues like an oversized body
    Warn,
    /// Error level - for unexpected failures
    Error,
}

/// Metadata for error responses - defines how an error should be presented
pub trait ErrorMetadata {
    /// HTTP status code to return
    fn http_status_code(&self) -> u16;

    /// Machine-readable error code (e.g., "WRITE_FAILED")
    fn error_code(&self) -> &'static str;

    /// Whether the caller may retry the same request
    fn is_recoverable(&self) -> bool;

    /// Client-facing message (may differ from internal error message)
    fn client_message(&self) -> String;

    /// Whether details should be hidden from the caller
    fn is_sensitive(&self) -> bool;

    /// Log level for this error
    fn log_level(&self) -> LogLevel;
}

#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Validation rejected: {0}")]
    ValidationRejected(String),

    #[error("No file provided")]
    NoFileProvided,

    #[error("Unexpected field: {0}")]
    UnexpectedField(String),

    #[error("File too large: {0}")]
    PayloadTooLarge(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Storage directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("Internal error: {0}")]
    Internal(String),

    #[error("Internal error with source")]
    InternalWithSource {
        message: String,
        #[source]
        source: anyhow::Error,
    },
}

impl AppError {
    /// Rejection produced by the intake validator.
    pub fn rejected() -> Self {
        AppError::ValidationRejected(REJECTION_REASON.to_string())
    }

    /// Get the error type name for detailed error responses
    pub fn error_type(&self) -> &str {
        match self {
            AppError::ValidationRejected(_) => "ValidationRejected",
            AppError::NoFileProvided => "NoFileProvided",
            AppError::UnexpectedField(_) => "UnexpectedField",
            AppError::PayloadTooLarge(_) => "PayloadTooLarge",
            AppError::InvalidInput(_) => "InvalidInput",
            AppError::NotFound(_) => "NotFound",
            AppError::DirectoryUnavailable(_) => "DirectoryUnavailable",
            AppError::WriteFailed(_) => "WriteFailed",
            AppError::Internal(_) | AppError::InternalWithSource { .. } => "Internal",
        }
    }

    /// Get detailed error information including error chain
    pub fn detailed_message(&self) -> String {
        use std::error::Error;

        let mut details = self.to_string();

        let mut source = self.source();
        let mut depth = 0;
        while let Some(err) = source {
            depth += 1;
            if depth > 5 {
                details.push_str("\n  ... (truncated)");
                break;
            }
            details.push_str(&format!("\n  Caused by: {}", err));
            source = err.source();
        }

        details
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::InternalWithSource {
            message: err.to_string(),
            source: err,
        }
    }
}

/// Static metadata for each variant: (http_status, error_code, recoverable, sensitive, log_level).
fn app_error_static_metadata(err: &AppError) -> (u16, &'static str, bool, bool, LogLevel) {
    match err {
        AppError::ValidationRejected(_) => (400, "VALIDATION_REJECTED", false, false, LogLevel::Debug),
        AppError::NoFileProvided => (400, "NO_FILE_PROVIDED", false, false, LogLevel::Debug),
        AppError::UnexpectedField(_) => (400, "UNEXPECTED_FIELD", false, false, LogLevel::Debug),
        AppError::InvalidInput(_) => (400, "INVALID_INPUT", false, false, LogLevel::Debug),
        AppError::NotFound(_) => (404, "NOT_FOUND", false, false, LogLevel::Debug),
        AppError::PayloadTooLarge(_) => (413, "PAYLOAD_TOO_LARGE", false, false, LogLevel::Warn),
        AppError::DirectoryUnavailable(_) => {
            (503, "DIRECTORY_UNAVAILABLE", true, true, LogLevel::Error)
        }
        AppError::WriteFailed(_) => (500, "WRITE_FAILED", true, true, LogLevel::Error),
        AppError::Internal(_) | AppError::InternalWithSource { .. } => {
            (500, "INTERNAL_ERROR", true, true, LogLevel::Error)
        }
    }
}

impl ErrorMetadata for AppError {
    fn http_status_code(&self) -> u16 {
        app_error_static_metadata(self).0
    }

    fn error_code(&self) -> &'static str {
        app_error_static_metadata(self).1
    }

    fn is_recoverable(&self) -> bool {
        app_error_static_metadata(self).2
    }

    fn is_sensitive(&self) -> bool {
        app_error_static_metadata(self).3
    }

    fn log_level(&self) -> LogLevel {
        app_error_static_metadata(self).4
    }

    fn client_message(&self) -> String {
        if self.is_sensitive() {
            return match self {
                AppError::DirectoryUnavailable(_) => "Storage temporarily unavailable",
                AppError::WriteFailed(_) => "Failed to store file",
                _ => "Internal server error",
            }
            .to_string();
        }

        match self {
            AppError::ValidationRejected(ref reason) => reason.clone(),
            AppError::NoFileProvided => NO_FILE_MESSAGE.to_string(),
            AppError::UnexpectedField(_) => "Unexpected field".to_string(),
            AppError::NotFound(_) => "Not Found".to_string(),
            AppError::PayloadTooLarge(ref msg) | AppError::InvalidInput(ref msg) => msg.clone(),
            other => other.to_string(),
        }
    }
}
