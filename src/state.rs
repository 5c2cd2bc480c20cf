use std::sync::Arc;

use anyhow::Result;
use reqwest::Client;

use crate::config::Config;
use crate::http_client;
use crate::store::UserStore;

/// Everything a request handler needs, passed through axum state. No
/// module-level singletons: tests build one of these around an in-memory
/// store and throwaway config.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub users: Arc<UserStore>,
    pub http: Client,
}

impl AppState {
    pub fn new(config: Config) -> Result<Self> {
        let users = UserStore::open(&config.database_path)?;
        Self::with_store(config, users)
    }

    pub fn with_store(config: Config, users: UserStore) -> Result<Self> {
        Ok(Self {
            config: Arc::new(config),
            users: Arc::new(users),
            http: http_client::build_client()?,
        })
    }
}
