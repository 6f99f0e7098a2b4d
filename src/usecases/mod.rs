//! Use case layer: application workflows and orchestration.

pub mod bootstrap;
pub mod context;
pub mod contracts;
pub mod enter_group;
pub mod interpreter;
pub mod presence;
pub mod send_message;
pub mod shell;
pub mod show_history;
pub mod world_clock;

/// Returns the usecases module name for smoke checks.
pub fn module_name() -> &'static str {
    "usecases"
}
