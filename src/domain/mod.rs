//! Domain layer: core entities and business rules.

pub mod command;
pub mod events;
pub mod feed;
pub mod group;
pub mod line_input;
pub mod message;
pub mod session;
pub mod shell_state;
pub mod subscription;
pub mod transcript;

/// Returns the domain module name for smoke checks.
pub fn module_name() -> &'static str {
    "domain"
}
