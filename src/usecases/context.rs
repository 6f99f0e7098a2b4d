use crate::{infra::config::AppConfig, store::StoreBackend};

/// Result of reading the credentials document at startup.
#[derive(Debug, Clone)]
pub enum StoreConnection {
    Ready(StoreBackend),
    /// Shown on the blocking error screen.
    Failed(String),
}

#[derive(Debug)]
pub struct AppContext {
    pub config: AppConfig,
    pub store: StoreConnection,
}

impl AppContext {
    pub fn new(config: AppConfig, store: StoreConnection) -> Self {
        Self { config, store }
    }
}
