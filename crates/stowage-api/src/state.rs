//! Shared application state handed to every handler.

use std::sync::Arc;
use stowage_core::Config;
use stowage_storage::Uploader;

pub struct AppState {
    pub config: Config,
    pub uploader: Uploader,
}

impl AppState {
    pub fn new(config: Config, uploader: Uploader) -> Arc<Self> {
        Arc::new(AppState { config, uploader })
    }
}
