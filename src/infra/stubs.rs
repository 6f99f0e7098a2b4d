use crate::infra::{contracts::CredentialsAdapter, credentials::StoreCredentials, error::AppError};

/// Returns fixed credentials, or a read failure when built with `failing`.
#[derive(Debug, Clone)]
pub struct StubCredentialsAdapter {
    credentials: Option<StoreCredentials>,
}

impl StubCredentialsAdapter {
    pub fn memory() -> Self {
        Self {
            credentials: Some(StoreCredentials::Memory),
        }
    }

    pub fn failing() -> Self {
        Self { credentials: None }
    }
}

impl CredentialsAdapter for StubCredentialsAdapter {
    fn load(&self) -> Result<StoreCredentials, AppError> {
        self.credentials
            .clone()
            .ok_or_else(|| AppError::CredentialsRead {
                path: "stub-creds.json".into(),
                source: std::io::Error::new(std::io::ErrorKind::NotFound, "stub"),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn failing_credentials_stub_reports_read_error() {
        let result = StubCredentialsAdapter::failing().load();

        assert!(matches!(result, Err(AppError::CredentialsRead { .. })));
    }
}
