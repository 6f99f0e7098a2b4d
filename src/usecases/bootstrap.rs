use std::path::Path;

use tracing_appender::non_blocking::WorkerGuard;

use crate::{
    infra::{
        self,
        config::{AppConfig, FileConfigAdapter},
        contracts::{ConfigAdapter, CredentialsAdapter},
        credentials::{FileCredentialsAdapter, StoreCredentials},
        error::AppError,
        logging::LogSink,
        storage_layout::StorageLayout,
    },
    store::{MemoryStore, RemoteStore, StoreBackend},
    ui::CrosstermEventSource,
    usecases::{
        context::{AppContext, StoreConnection},
        contracts::{AppEventSource, ShellOrchestrator},
        shell::DefaultShellOrchestrator,
    },
};

const STORE_CREDENTIALS_FAILED: &str = "STORE_CREDENTIALS_FAILED";
const STORE_CONNECT_FAILED: &str = "STORE_CONNECT_FAILED";

const CREDENTIALS_ERROR_PREFIX: &str =
    "Error loading store configuration. Please check your credentials file.";

pub struct ShellComposition {
    pub event_source: Box<dyn AppEventSource>,
    pub orchestrator: Box<dyn ShellOrchestrator>,
}

/// Loads config, starts file logging and picks the store for a TUI run.
pub fn bootstrap(
    config_path: Option<&Path>,
    credentials_path: Option<&Path>,
) -> Result<(AppContext, WorkerGuard), AppError> {
    let config = load_config(config_path, credentials_path)?;
    let guard = init_logging(&config, LogSink::FileOnly)?;

    let credentials = FileCredentialsAdapter::new(&config.store.credentials);
    let store = connect_store(&credentials);

    Ok((AppContext::new(config, store), guard))
}

pub fn load_config(
    config_path: Option<&Path>,
    credentials_path: Option<&Path>,
) -> Result<AppConfig, AppError> {
    FileConfigAdapter::new(config_path)
        .with_credentials(credentials_path)
        .load()
        .map_err(AppError::Other)
}

pub fn init_logging(config: &AppConfig, sink: LogSink) -> Result<WorkerGuard, AppError> {
    let layout = StorageLayout::resolve()?;
    infra::logging::init(&config.logging, &layout, sink)
}

/// Never fails: a broken credentials document becomes the blocking screen.
pub fn connect_store(adapter: &dyn CredentialsAdapter) -> StoreConnection {
    let credentials = match adapter.load() {
        Ok(credentials) => credentials,
        Err(error) => {
            tracing::error!(code = STORE_CREDENTIALS_FAILED, error = %error, "credentials load failed");
            return StoreConnection::Failed(format!("{CREDENTIALS_ERROR_PREFIX}\n{error}"));
        }
    };

    let backend = match credentials {
        StoreCredentials::Memory => StoreBackend::Memory(MemoryStore::new()),
        StoreCredentials::Remote { endpoint } => match RemoteStore::connect(endpoint) {
            Ok(remote) => StoreBackend::Remote(remote),
            Err(error) => {
                tracing::error!(code = STORE_CONNECT_FAILED, error = %error, "store adapter failed to start");
                return StoreConnection::Failed(format!("{CREDENTIALS_ERROR_PREFIX}\n{error}"));
            }
        },
    };

    tracing::info!(store = %backend.describe(), "store adapter ready");
    StoreConnection::Ready(backend)
}

pub fn compose_shell(context: &AppContext) -> ShellComposition {
    let history_limit = context.config.chat.normalized_history_limit();
    let orchestrator: Box<dyn ShellOrchestrator> = match &context.store {
        StoreConnection::Ready(store) => {
            Box::new(DefaultShellOrchestrator::new(store.clone(), history_limit))
        }
        StoreConnection::Failed(reason) => {
            Box::new(DefaultShellOrchestrator::<StoreBackend>::blocked(reason.clone()))
        }
    };

    ShellComposition {
        event_source: Box::new(CrosstermEventSource),
        orchestrator,
    }
}
