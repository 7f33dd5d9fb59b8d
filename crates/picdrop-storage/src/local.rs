use crate::keys::{self, NameGenerator, RandomHexNames};
use crate::traits::{Storage, StorageError, StorageResult, StoredObject};
use async_trait::async_trait;
use chrono::Utc;
use futures::StreamExt;
use picdrop_core::StoredAsset;
use std::io;
use std::path::{Path, PathBuf};
use std::pin::Pin;
use std::sync::Arc;
use tempfile::NamedTempFile;
use tokio::fs;
use tokio::io::{AsyncRead, AsyncWriteExt};

const INCOMING_PREFIX: &str = ".incoming-";
const INCOMING_SUFFIX: &str = ".part";

/// Local filesystem storage implementation
#[derive(Clone)]
pub struct LocalStorage {
    base_path: PathBuf,
    names: Arc<dyn NameGenerator>,
    name_attempts: u32,
}

impl LocalStorage {
    /// Create a new LocalStorage instance, creating the root directory if absent
    ///
    /// # Arguments
    /// * `base_path` - Root directory for stored files (e.g., "uploads")
    pub async fn new(base_path: impl Into<PathBuf>) -> StorageResult<Self> {
        let base_path = base_path.into();

        fs::create_dir_all(&base_path).await.map_err(|e| {
            StorageError::ConfigError(format!(
                "Failed to create storage directory {}: {}",
                base_path.display(),
                e
            ))
        })?;

        Ok(LocalStorage {
            base_path,
            names: Arc::new(RandomHexNames::default()),
            name_attempts: 1,
        })
    }

    /// Use a different source of stored-name identifiers
    pub fn with_name_generator(mut self, names: Arc<dyn NameGenerator>) -> Self {
        self.names = names;
        self
    }

    /// Number of generated names tried before giving up on a collision
    pub fn with_name_attempts(mut self, attempts: u32) -> Self {
        self.name_attempts = attempts.max(1);
        self
    }

    pub fn base_path(&self) -> &Path {
        &self.base_path
    }

    /// Resolve a stored name to its path, rejecting anything that could escape
    /// the storage root or address a temporary file
    fn name_to_path(&self, stored_name: &str) -> StorageResult<PathBuf> {
        if !keys::is_valid_stored_name(stored_name) {
            return Err(StorageError::InvalidName(stored_name.to_string()));
        }
        Ok(self.base_path.join(stored_name))
    }

    /// Create the temporary file that receives the upload body
    async fn create_incoming(&self) -> StorageResult<NamedTempFile> {
        let base_path = self.base_path.clone();
        tokio::task::spawn_blocking(move || {
            tempfile::Builder::new()
                .prefix(INCOMING_PREFIX)
                .suffix(INCOMING_SUFFIX)
                .tempfile_in(&base_path)
                .map_err(|e| classify_create_error(&base_path, e))
        })
        .await
        .map_err(|e| StorageError::WriteFailed(format!("Temporary file task failed: {}", e)))?
    }

    /// Move a fully written temporary file to a fresh name without replacing
    /// any existing file
    async fn persist(
        &self,
        mut incoming: NamedTempFile,
        original_name: &str,
    ) -> StorageResult<(String, PathBuf)> {
        for attempt in 1..=self.name_attempts {
            let stored_name = keys::stored_name(&self.names.generate(), original_name);
            let path = self.name_to_path(&stored_name)?;

            let target = path.clone();
            let result = tokio::task::spawn_blocking(move || incoming.persist_noclobber(&target))
                .await
                .map_err(|e| StorageError::WriteFailed(format!("Persist task failed: {}", e)))?;

            match result {
                Ok(_) => return Ok((stored_name, path)),
                Err(e) if e.error.kind() == io::ErrorKind::AlreadyExists => {
                    tracing::warn!(
                        stored_name = %stored_name,
                        attempt,
                        max_attempts = self.name_attempts,
                        "Generated name already taken"
                    );
                    incoming = e.file;
                }
                Err(e) => {
                    return Err(StorageError::WriteFailed(format!(
                        "Failed to move upload into {}: {}",
                        path.display(),
                        e.error
                    )));
                }
            }
        }

        Err(StorageError::NameCollision {
            attempts: self.name_attempts,
        })
    }
}

fn classify_create_error(base_path: &Path, err: io::Error) -> StorageError {
    match err.kind() {
        io::ErrorKind::NotFound | io::ErrorKind::PermissionDenied => {
            StorageError::DirectoryUnavailable(format!("{}: {}", base_path.display(), err))
        }
        _ => StorageError::WriteFailed(format!(
            "Failed to create file in {}: {}",
            base_path.display(),
            err
        )),
    }
}

#[async_trait]
impl Storage for LocalStorage {
    async fn store_stream<'a>(
        &self,
        original_name: &str,
        mut reader: Pin<Box<dyn AsyncRead + Send + 'a>>,
    ) -> StorageResult<StoredAsset> {
        let start = std::time::Instant::now();

        let extension = keys::extension_suffix(original_name);
        if !keys::is_valid_stored_name(&format!("x{}", extension)) {
            return Err(StorageError::InvalidName(original_name.to_string()));
        }

        // Dropping `incoming` on any error path removes the partial file.
        let incoming = self.create_incoming().await?;
        let temp_path = incoming.path().to_path_buf();

        let handle = incoming.as_file().try_clone().map_err(|e| {
            StorageError::WriteFailed(format!("Failed to open {}: {}", temp_path.display(), e))
        })?;
        let mut file = fs::File::from_std(handle);

        let byte_size = tokio::io::copy(&mut reader, &mut file).await.map_err(|e| {
            StorageError::WriteFailed(format!(
                "Failed to write stream to file {}: {}",
                temp_path.display(),
                e
            ))
        })?;

        file.flush().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to flush file {}: {}", temp_path.display(), e))
        })?;
        file.sync_all().await.map_err(|e| {
            StorageError::WriteFailed(format!("Failed to sync file {}: {}", temp_path.display(), e))
        })?;
        drop(file);

        let (stored_name, path) = self.persist(incoming, original_name).await?;

        tracing::info!(
            path = %path.display(),
            stored_name = %stored_name,
            size_bytes = byte_size,
            duration_ms = start.elapsed().as_secs_f64() * 1000.0,
            "Local storage upload successful"
        );

        Ok(StoredAsset {
            stored_name,
            path,
            byte_size,
            stored_at: Utc::now(),
        })
    }

    async fn open(&self, stored_name: &str) -> StorageResult<StoredObject> {
        let path = self.name_to_path(stored_name)?;

        let file = match fs::File::open(&path).await {
            Ok(file) => file,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(StorageError::NotFound(stored_name.to_string()));
            }
            Err(e) => {
                return Err(StorageError::ReadFailed(format!(
                    "Failed to open file {}: {}",
                    path.display(),
                    e
                )));
            }
        };

        let metadata = file.metadata().await.map_err(|e| {
            StorageError::ReadFailed(format!("Failed to stat file {}: {}", path.display(), e))
        })?;
        if !metadata.is_file() {
            return Err(StorageError::NotFound(stored_name.to_string()));
        }

        let name = stored_name.to_string();
        let stream = tokio_util::io::ReaderStream::new(file).map(move |result| {
            result.map_err(|e| {
                tracing::error!(stored_name = %name, error = %e, "Local storage stream read error");
                StorageError::ReadFailed(format!("Failed to read chunk: {}", e))
            })
        });

        Ok(StoredObject {
            stored_name: stored_name.to_string(),
            byte_size: metadata.len(),
            stream: Box::pin(stream),
        })
    }

    async fn exists(&self, stored_name: &str) -> StorageResult<bool> {
        let path = self.name_to_path(stored_name)?;
        match fs::metadata(&path).await {
            Ok(meta) => Ok(meta.is_file()),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(StorageError::ReadFailed(format!(
                "Failed to stat file {}: {}",
                path.display(),
                e
            ))),
        }
    }

    async fn check_ready(&self) -> StorageResult<()> {
        match fs::metadata(&self.base_path).await {
            Ok(meta) if meta.is_dir() => Ok(()),
            Ok(_) => Err(StorageError::DirectoryUnavailable(format!(
                "{} is not a directory",
                self.base_path.display()
            ))),
            Err(e) => Err(StorageError::DirectoryUnavailable(format!(
                "{}: {}",
                self.base_path.display(),
                e
            ))),
        }
    }
}
