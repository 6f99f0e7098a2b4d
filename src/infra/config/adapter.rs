use std::path::{Path, PathBuf};

use anyhow::Result;

use crate::infra::{
    config::{load, AppConfig},
    contracts::ConfigAdapter,
};

/// Reads `config.toml` and applies command-line overrides on top.
#[derive(Debug, Clone, Default)]
pub struct FileConfigAdapter {
    path: Option<PathBuf>,
    credentials_override: Option<PathBuf>,
}

impl FileConfigAdapter {
    pub fn new(path: Option<&Path>) -> Self {
        Self {
            path: path.map(Path::to_path_buf),
            credentials_override: None,
        }
    }

    pub fn with_credentials(mut self, credentials: Option<&Path>) -> Self {
        self.credentials_override = credentials.map(Path::to_path_buf);
        self
    }
}

impl ConfigAdapter for FileConfigAdapter {
    fn load(&self) -> Result<AppConfig> {
        let mut config = load(self.path.as_deref())?;
        if let Some(credentials) = &self.credentials_override {
            config.store.credentials = credentials.clone();
        }
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn credentials_override_wins_over_file_value() {
        let adapter = FileConfigAdapter::new(Some(Path::new("./missing-config.toml")))
            .with_credentials(Some(Path::new("other-creds.json")));

        let config = adapter.load().expect("config must load");

        assert_eq!(config.store.credentials, PathBuf::from("other-creds.json"));
    }
}
