use std::{io, panic};

use crossterm::{
    execute,
    terminal::{disable_raw_mode, LeaveAlternateScreen},
};

/// Restores the terminal before reporting a panic, so the message is readable
/// even when the TUI was in raw mode on the alternate screen.
pub fn install_terminal_restore_hook() {
    panic::set_hook(Box::new(|panic_info| {
        let _ = disable_raw_mode();
        let _ = execute!(io::stdout(), LeaveAlternateScreen);

        let payload = panic_info
            .payload()
            .downcast_ref::<&str>()
            .map(ToString::to_string)
            .or_else(|| panic_info.payload().downcast_ref::<String>().cloned())
            .unwrap_or_else(|| "panic payload omitted".to_owned());

        tracing::error!(payload = %payload, "messx panicked");

        if let Some(location) = panic_info.location() {
            eprintln!(
                "messx panic: {} at {}:{}:{}",
                payload,
                location.file(),
                location.line(),
                location.column()
            );
        } else {
            eprintln!("messx panic: {}", payload);
        }
    }));
}
