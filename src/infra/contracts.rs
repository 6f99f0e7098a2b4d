use anyhow::Result;

use crate::infra::{config::AppConfig, credentials::StoreCredentials, error::AppError};

pub trait ConfigAdapter {
    fn load(&self) -> Result<AppConfig>;
}

/// Source of the store connection parameters, read once at startup.
pub trait CredentialsAdapter {
    fn load(&self) -> Result<StoreCredentials, AppError>;
}
