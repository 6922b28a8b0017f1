use crate::config::{AuthConfig, Config};
use crate::services::DataStore;
use crate::views::Views;

/// Shared by every handler.
#[derive(Clone)]
pub struct AppState {
    pub store: DataStore,
    pub views: Views,
    pub auth: AuthConfig,
}

impl AppState {
    pub fn from_config(config: &Config) -> Self {
        Self {
            store: DataStore::new(config.storage.clone()),
            views: Views::new(config.server.templates_dir.clone(), config.refresh.interval_ms),
            auth: config.auth.clone(),
        }
    }
}
