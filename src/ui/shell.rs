use anyhow::Result;

use crate::usecases::{
    context::{AppContext, StoreConnection},
    contracts::{AppEventSource, ShellOrchestrator},
};

use super::{terminal::TerminalSession, view};

pub fn start(
    context: &AppContext,
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
) -> Result<()> {
    let store = match &context.store {
        StoreConnection::Ready(store) => store.describe(),
        StoreConnection::Failed(_) => "unavailable".to_owned(),
    };
    tracing::info!(
        log_level = %context.config.logging.level,
        store = %store,
        "starting TUI shell"
    );

    let mut terminal = TerminalSession::enter()?;
    run_loop(event_source, orchestrator, |orchestrator| {
        terminal.draw(|frame| view::render(frame, orchestrator.state()))
    })?;
    terminal.restore()?;

    tracing::info!("TUI shell stopped");
    Ok(())
}

/// Draws, then waits for one event, until the orchestrator stops running.
fn run_loop<D>(
    event_source: &mut dyn AppEventSource,
    orchestrator: &mut dyn ShellOrchestrator,
    mut draw: D,
) -> Result<()>
where
    D: FnMut(&dyn ShellOrchestrator) -> Result<()>,
{
    while orchestrator.state().is_running() {
        draw(&*orchestrator)?;

        match event_source.next_event()? {
            Some(event) => orchestrator.handle_event(event)?,
            None => continue,
        }
    }

    Ok(())
}
