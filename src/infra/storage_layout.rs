use std::{env, fs, path::PathBuf};

use crate::infra::error::AppError;

const APP_DIR_NAME: &str = "messx";
const HOME_OVERRIDE_ENV: &str = "MESSX_HOME";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StorageLayout {
    pub state_dir: PathBuf,
    pub log_dir: PathBuf,
}

impl StorageLayout {
    /// `$MESSX_HOME` when set, otherwise the platform local data directory.
    pub fn resolve() -> Result<Self, AppError> {
        let state_dir = env::var_os(HOME_OVERRIDE_ENV)
            .map(PathBuf::from)
            .or_else(|| dirs::data_local_dir().map(|base| base.join(APP_DIR_NAME)))
            .ok_or_else(|| AppError::StoragePathResolution {
                details: "unable to resolve local data directory (MESSX_HOME/HOME)".into(),
            })?;

        let log_dir = state_dir.join("logs");

        Ok(Self { state_dir, log_dir })
    }

    pub fn ensure_dirs(&self) -> Result<(), AppError> {
        for dir in [&self.state_dir, &self.log_dir] {
            fs::create_dir_all(dir).map_err(|source| AppError::StorageDirCreate {
                path: dir.clone(),
                source,
            })?;
        }

        Ok(())
    }
}
