//! Picdrop Core Library
//!
//! This crate provides the configuration, error taxonomy, upload validation and
//! domain models shared by the storage and HTTP crates.

pub mod config;
pub mod error;
pub mod models;
pub mod validation;

// Re-export commonly used types
pub use config::Config;
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use models::{public_url, StoredAsset, UploadData, UploadPayload, PUBLIC_PREFIX};
pub use validation::{validate, ValidationVerdict, ALLOWED_EXTENSIONS, REJECTION_REASON};
