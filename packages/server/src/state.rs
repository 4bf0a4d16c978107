use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use store::Store;

use crate::config::AppConfig;
use crate::error::AppError;

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<RwLock<Store>>,
    pub config: AppConfig,
}

impl AppState {
    pub fn new(store: Store, config: AppConfig) -> Self {
        Self {
            store: Arc::new(RwLock::new(store)),
            config,
        }
    }

    /// Shared read access to the store. Guards must not be held across
    /// await points; store operations are synchronous.
    pub fn read_store(&self) -> Result<RwLockReadGuard<'_, Store>, AppError> {
        self.store
            .read()
            .map_err(|_| AppError::Internal("Store lock poisoned".into()))
    }

    pub fn write_store(&self) -> Result<RwLockWriteGuard<'_, Store>, AppError> {
        self.store
            .write()
            .map_err(|_| AppError::Internal("Store lock poisoned".into()))
    }
}
