use std::sync::Arc;

use tasker_db::repositories::TaskRepo;
use tasker_db::{Store, StoreError};

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc`).
#[derive(Clone)]
pub struct AppState {
    /// The single shared database connection owner.
    pub store: Arc<Store>,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
}

impl AppState {
    pub fn new(store: Arc<Store>, config: ServerConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }

    /// A fresh task repository bound to the shared store.
    ///
    /// Connects first if the store currently holds no connection.
    pub async fn tasks(&self) -> Result<TaskRepo<'_>, StoreError> {
        self.store.connect().await?;
        Ok(TaskRepo::new(&self.store))
    }
}
