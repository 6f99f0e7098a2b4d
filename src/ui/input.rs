//! Single-line input field rendering.

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use crate::domain::line_input::LineInput;

use super::styles;

pub struct InputField<'a> {
    pub title: &'a str,
    pub prompt: &'a str,
    pub input: &'a LineInput,
    pub focused: bool,
}

pub fn render_input(frame: &mut Frame<'_>, area: Rect, field: &InputField<'_>) {
    let border_style = if field.focused {
        styles::active_border_style()
    } else {
        styles::inactive_border_style()
    };

    let inner_width = area.width.saturating_sub(2) as usize;
    let (line, cursor_column) = build_input_line(field.prompt, field.input, inner_width);

    let paragraph = Paragraph::new(line).block(
        Block::default()
            .title(field.title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );
    frame.render_widget(paragraph, area);

    if field.focused {
        let cursor_x = area
            .x
            .saturating_add(1)
            .saturating_add(cursor_column.min(u16::MAX as usize) as u16);
        let cursor_y = area.y.saturating_add(1);
        frame.set_cursor_position((cursor_x, cursor_y));
    }
}

/// Builds the prompt and text, scrolled horizontally so the cursor stays
/// inside `width` columns. Returns the line and the cursor column.
fn build_input_line(prompt: &str, input: &LineInput, width: usize) -> (Line<'static>, usize) {
    let prompt_width = UnicodeWidthStr::width(prompt);
    let room = width.saturating_sub(prompt_width).max(1);

    let chars: Vec<char> = input.text().chars().collect();
    let cursor = input.cursor().min(chars.len());

    // Drop leading characters until the text before the cursor fits.
    let mut start = 0;
    while start < cursor && columns(&chars[start..cursor]) >= room {
        start += 1;
    }

    let visible: String = chars[start..].iter().collect();
    let cursor_column = prompt_width + columns(&chars[start..cursor]);

    let line = Line::from(vec![
        Span::styled(prompt.to_owned(), styles::prompt_style()),
        Span::styled(visible, styles::input_text_style()),
    ]);
    (line, cursor_column)
}

fn columns(chars: &[char]) -> usize {
    let text: String = chars.iter().collect();
    UnicodeWidthStr::width(text.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line_text(line: &Line<'_>) -> String {
        line.spans.iter().map(|s| s.content.as_ref()).collect()
    }

    fn input_with(text: &str) -> LineInput {
        let mut input = LineInput::default();
        input.set_text(text);
        input
    }

    #[test]
    fn prompt_precedes_text_and_cursor_sits_after_it() {
        let input = input_with("hi");

        let (line, cursor) = build_input_line("bob> ", &input, 40);

        assert_eq!(line_text(&line), "bob> hi");
        assert_eq!(cursor, 7);
    }

    #[test]
    fn wide_characters_count_two_columns() {
        let input = input_with("日本");

        let (_, cursor) = build_input_line("> ", &input, 40);

        assert_eq!(cursor, 6);
    }

    #[test]
    fn long_text_scrolls_to_keep_cursor_visible() {
        let input = input_with(&"x".repeat(50));

        let (line, cursor) = build_input_line("> ", &input, 20);

        assert!(cursor < 20);
        assert!(line_text(&line).len() < 52);
    }
}
