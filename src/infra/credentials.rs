//! Store connection parameters kept in a JSON document next to the config.

use std::{
    fs,
    path::{Path, PathBuf},
};

use serde::{Deserialize, Serialize};

use crate::infra::{contracts::CredentialsAdapter, error::AppError};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "lowercase")]
pub enum StoreCredentials {
    /// A `messx serve` host at `host:port`.
    Remote { endpoint: String },
    /// Private in-process store; nothing is shared with other clients.
    Memory,
}

#[derive(Debug, Clone)]
pub struct FileCredentialsAdapter {
    path: PathBuf,
}

impl FileCredentialsAdapter {
    pub fn new(path: &Path) -> Self {
        Self {
            path: path.to_path_buf(),
        }
    }
}

impl CredentialsAdapter for FileCredentialsAdapter {
    fn load(&self) -> Result<StoreCredentials, AppError> {
        load(&self.path)
    }
}

pub fn load(path: &Path) -> Result<StoreCredentials, AppError> {
    let raw = fs::read_to_string(path).map_err(|source| AppError::CredentialsRead {
        path: path.to_path_buf(),
        source,
    })?;

    let credentials: StoreCredentials =
        serde_json::from_str(&raw).map_err(|source| AppError::CredentialsParse {
            path: path.to_path_buf(),
            source,
        })?;

    if let StoreCredentials::Remote { endpoint } = &credentials {
        if endpoint.trim().is_empty() {
            return Err(AppError::CredentialsInvalid {
                path: path.to_path_buf(),
                details: "endpoint must not be empty".to_owned(),
            });
        }
    }

    Ok(credentials)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_fixture(contents: &str) -> (tempfile::TempDir, PathBuf) {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("creds.json");
        fs::write(&path, contents).expect("fixture should be writable");
        (dir, path)
    }

    #[test]
    fn loads_remote_endpoint() {
        let (_dir, path) = write_fixture(r#"{"kind":"remote","endpoint":"10.0.0.2:9000"}"#);

        assert_eq!(
            load(&path).expect("credentials"),
            StoreCredentials::Remote {
                endpoint: "10.0.0.2:9000".to_owned()
            }
        );
    }

    #[test]
    fn loads_memory_kind() {
        let (_dir, path) = write_fixture(r#"{"kind":"memory"}"#);

        assert_eq!(load(&path).expect("credentials"), StoreCredentials::Memory);
    }

    #[test]
    fn missing_file_is_a_read_error() {
        let result = load(Path::new("./definitely-missing-creds.json"));

        assert!(matches!(result, Err(AppError::CredentialsRead { .. })));
    }

    #[test]
    fn unknown_kind_is_a_parse_error() {
        let (_dir, path) = write_fixture(r#"{"kind":"firestore"}"#);

        assert!(matches!(load(&path), Err(AppError::CredentialsParse { .. })));
    }

    #[test]
    fn blank_endpoint_is_rejected() {
        let (_dir, path) = write_fixture(r#"{"kind":"remote","endpoint":"  "}"#);

        assert!(matches!(
            load(&path),
            Err(AppError::CredentialsInvalid { .. })
        ));
    }
}
