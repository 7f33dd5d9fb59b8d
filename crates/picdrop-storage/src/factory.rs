use crate::{LocalStorage, RandomHexNames, Storage, StorageResult};
use picdrop_core::Config;
use std::sync::Arc;

/// Create the storage backend described by the configuration
pub async fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    let storage = LocalStorage::new(config.upload_dir())
        .await?
        .with_name_generator(Arc::new(RandomHexNames::new(config.name_bytes())))
        .with_name_attempts(config.name_attempts());

    Ok(Arc::new(storage))
}
