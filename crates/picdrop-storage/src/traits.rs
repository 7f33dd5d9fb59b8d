//! Storage abstraction trait
//!
//! This module defines the Storage trait that backs the upload pipeline.

use async_trait::async_trait;
use bytes::Bytes;
use futures::Stream;
use picdrop_core::{AppError, StoredAsset};
use std::pin::Pin;
use thiserror::Error;
use tokio::io::AsyncRead;

/// Storage operation errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage directory unavailable: {0}")]
    DirectoryUnavailable(String),

    #[error("Write failed: {0}")]
    WriteFailed(String),

    #[error("No free name after {attempts} attempts")]
    NameCollision { attempts: u32 },

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("Invalid stored name: {0}")]
    InvalidName(String),

    #[error("Read failed: {0}")]
    ReadFailed(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

/// Result type for storage operations
pub type StorageResult<T> = Result<T, StorageError>;

impl From<StorageError> for AppError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::DirectoryUnavailable(msg) => AppError::DirectoryUnavailable(msg),
            StorageError::WriteFailed(msg) => AppError::WriteFailed(msg),
            err @ StorageError::NameCollision { .. } => AppError::WriteFailed(err.to_string()),
            StorageError::NotFound(name) => AppError::NotFound(name),
            StorageError::InvalidName(name) => AppError::NotFound(name),
            err @ (StorageError::ReadFailed(_) | StorageError::ConfigError(_)) => {
                AppError::from(anyhow::Error::new(err).context("Storage operation failed"))
            }
        }
    }
}

/// Byte stream of a stored file
pub type ByteStream = Pin<Box<dyn Stream<Item = Result<Bytes, StorageError>> + Send>>;

/// A stored file opened for reading
pub struct StoredObject {
    pub stored_name: String,
    pub byte_size: u64,
    pub stream: ByteStream,
}

/// Storage abstraction trait
///
/// Stored names are flat: they never contain path separators and are resolved
/// directly under the storage root.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Persist an upload under a freshly generated name that keeps the extension
    /// of `original_name`.
    ///
    /// The file is only visible under its final name once every byte has been
    /// written and synced. An existing file is never overwritten: if the generated
    /// name is taken, a new one is drawn, and when the configured attempts run out
    /// the call fails with `NameCollision`. Nothing is retried on I/O failure.
    async fn store_stream<'a>(
        &self,
        original_name: &str,
        reader: Pin<Box<dyn AsyncRead + Send + 'a>>,
    ) -> StorageResult<StoredAsset>;

    /// Persist an in-memory upload. See [`Storage::store_stream`].
    async fn store(&self, original_name: &str, data: Bytes) -> StorageResult<StoredAsset> {
        let reader = Box::pin(std::io::Cursor::new(data));
        self.store_stream(original_name, reader).await
    }

    /// Open a stored file as a stream of chunks
    async fn open(&self, stored_name: &str) -> StorageResult<StoredObject>;

    /// Check if a stored file exists
    async fn exists(&self, stored_name: &str) -> StorageResult<bool>;

    /// Check that the storage root is usable
    async fn check_ready(&self) -> StorageResult<()>;
}
