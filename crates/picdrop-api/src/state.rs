//! Application state shared by all handlers.

use picdrop_core::Config;
use picdrop_storage::Storage;
use std::sync::Arc;

#[derive(Clone)]
pub struct AppState {
    pub config: Config,
    pub storage: Arc<dyn Storage>,
}

impl AppState {
    pub fn new(config: Config, storage: Arc<dyn Storage>) -> Self {
        Self { config, storage }
    }
}
