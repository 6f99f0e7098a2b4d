//! Style definitions for the UI components.

use ratatui::style::{Color, Modifier, Style};

use crate::domain::transcript::LineKind;

// =============================================================================
// Transcript styles
// =============================================================================

/// Style for chat lines from users.
pub fn normal_line_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for hints, banners and command output.
pub fn system_line_style() -> Style {
    Style::default().fg(Color::Cyan)
}

/// Style for inline errors (red, bold).
pub fn error_line_style() -> Style {
    Style::default()
        .fg(Color::Red)
        .add_modifier(Modifier::BOLD)
}

pub fn line_style(kind: LineKind) -> Style {
    match kind {
        LineKind::Normal => normal_line_style(),
        LineKind::System => system_line_style(),
        LineKind::Error => error_line_style(),
    }
}

// =============================================================================
// Frame and input styles
// =============================================================================

/// Style for the block title that names the current group.
pub fn title_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub fn active_border_style() -> Style {
    Style::default().fg(Color::Green)
}

pub fn inactive_border_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for the `user> ` prompt.
pub fn prompt_style() -> Style {
    Style::default()
        .fg(Color::Green)
        .add_modifier(Modifier::BOLD)
}

pub fn input_text_style() -> Style {
    Style::default().fg(Color::White)
}

/// Style for hint text under the login fields.
pub fn hint_style() -> Style {
    Style::default().fg(Color::DarkGray)
}

/// Style for the highlighted entry of the group listing.
pub fn selected_group_style() -> Style {
    Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD)
}
