use anyhow::Result;
use tokio::sync::watch;

use crate::{
    cli::{Cli, Command},
    domain,
    infra::{self, config::AppConfig, error::AppError, logging::LogSink},
    store::{self, server::StoreHost, MemoryStore},
    ui,
    usecases::{self, bootstrap},
};

const SERVE_SHUTDOWN_REQUESTED: &str = "SERVE_SHUTDOWN_REQUESTED";
const SERVE_SIGNAL_UNAVAILABLE: &str = "SERVE_SIGNAL_UNAVAILABLE";

pub fn run(cli: Cli) -> Result<()> {
    match cli.command_or_default() {
        Command::Run => run_client(&cli),
        Command::Serve { bind } => serve(&cli, bind),
    }
}

fn run_client(cli: &Cli) -> Result<()> {
    let (context, _log_guard) =
        bootstrap::bootstrap(cli.config.as_deref(), cli.credentials.as_deref())?;
    log_module_boundaries();

    let mut shell = bootstrap::compose_shell(&context);
    ui::shell::start(
        &context,
        shell.event_source.as_mut(),
        shell.orchestrator.as_mut(),
    )
}

fn serve(cli: &Cli, bind: Option<String>) -> Result<()> {
    let config = bootstrap::load_config(cli.config.as_deref(), cli.credentials.as_deref())?;
    let _log_guard = bootstrap::init_logging(&config, LogSink::FileAndStdout)?;
    log_module_boundaries();

    let addr = bind_address(bind, &config);
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .thread_name("messx-serve")
        .build()
        .map_err(AppError::RuntimeInit)?;

    runtime.block_on(async {
        let host = StoreHost::bind(&addr, MemoryStore::new())
            .await
            .map_err(|source| AppError::ServerBind {
                addr: addr.clone(),
                source,
            })?;

        let (stop_tx, stop_rx) = watch::channel(false);
        tokio::spawn(async move {
            match tokio::signal::ctrl_c().await {
                Ok(()) => {
                    tracing::info!(code = SERVE_SHUTDOWN_REQUESTED, "shutting down store host");
                    let _ = stop_tx.send(true);
                }
                Err(error) => {
                    tracing::warn!(
                        code = SERVE_SIGNAL_UNAVAILABLE,
                        error = %error,
                        "ctrl-c handler unavailable; stop the process to shut down"
                    );
                    std::future::pending::<()>().await;
                }
            }
        });

        host.run(stop_rx).await;
        Ok::<(), AppError>(())
    })?;

    Ok(())
}

fn bind_address(cli_bind: Option<String>, config: &AppConfig) -> String {
    cli_bind.unwrap_or_else(|| config.server.bind.clone())
}

fn log_module_boundaries() {
    tracing::debug!(
        ui = ui::module_name(),
        domain = domain::module_name(),
        store = store::module_name(),
        usecases = usecases::module_name(),
        infra = infra::module_name(),
        "module boundaries loaded"
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_flag_overrides_config() {
        let config = AppConfig::default();

        assert_eq!(
            bind_address(Some("127.0.0.1:7000".to_owned()), &config),
            "127.0.0.1:7000"
        );
        assert_eq!(bind_address(None, &config), config.server.bind);
    }
}
