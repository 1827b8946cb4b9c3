//! Application state for the API service.

use common::config::AppConfig;
use common::errors::AppResult;

use crate::stores::{PrimaryStore, SecondaryStore};

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub primary: PrimaryStore,
    pub secondary: SecondaryStore,
}

impl AppState {
    /// Creates the state, opening the secondary store eagerly.
    pub async fn new(config: AppConfig) -> AppResult<Self> {
        let secondary = SecondaryStore::connect(&config.secondary).await?;
        Ok(Self {
            primary: PrimaryStore::new(config.primary.clone()),
            secondary,
            config,
        })
    }
}
