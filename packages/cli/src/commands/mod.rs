pub mod auth;
pub mod crop;
pub mod data;
pub mod insights;
pub mod scan;
pub mod supplier;

use std::path::PathBuf;

use anyhow::{Context, Result};
use common::UserProfile;
use store::Store;
use tracing::debug;

use crate::api::{ApiClient, ApiError};
use crate::config::CliConfig;

/// Everything a command needs: the API client, the persisted client config,
/// and where to write that config back.
pub struct Ctx {
    pub api: ApiClient,
    pub config: CliConfig,
    pub config_path: PathBuf,
}

impl Ctx {
    pub fn open_store(&self) -> Result<Store> {
        let path = self.config.store_path()?;
        Store::open(path).context("Failed to open the local store")
    }

    pub fn save_config(&self) -> Result<()> {
        self.config.save(&self.config_path)
    }
}

/// The local session recorded by the last sign-in.
pub fn require_local_user(store: &Store) -> Result<UserProfile> {
    store
        .current_user()
        .cloned()
        .context("Not signed in. Run `farmchainx signin` first")
}

/// Remote-first execution: try the API, and only when it is unreachable
/// serve the request from the local store. Application errors from the API
/// (wrong password, missing crop) are returned to the caller untouched.
pub fn remote_or<T>(
    remote: impl FnOnce() -> Result<T, ApiError>,
    local: impl FnOnce() -> Result<T>,
) -> Result<T> {
    match remote() {
        Ok(value) => Ok(value),
        Err(ApiError::Network(err)) => {
            debug!("API unreachable, serving locally: {}", err);
            local()
        }
        Err(err) => Err(err.into()),
    }
}
