use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use unicode_width::UnicodeWidthChar;

use crate::domain::{
    shell_state::{GroupListing, LoginStep, Screen, ShellState},
    transcript::{Transcript, TranscriptLine},
};

use super::{
    input::{render_input, InputField},
    styles,
};

const APP_TITLE: &str = "messx";
const USER_STEP_HINT: &str = "Enter your name and press Enter.";
const GROUP_STEP_HINT: &str = "Enter a group name to join or create it, or 'list' to see existing groups.";
const QUIT_HINT: &str = "Ctrl+C or Ctrl+Q quits.";

pub fn render(frame: &mut Frame<'_>, state: &ShellState) {
    match state.screen() {
        Screen::Login(step) => render_login(frame, state, *step),
        Screen::Chat => render_chat(frame, state),
        Screen::Blocked(reason) => render_blocked(frame, reason),
    }
}

fn render_login(frame: &mut Frame<'_>, state: &ShellState, step: LoginStep) {
    let [header_area, user_area, group_area, notice_area, listing_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2),
            Constraint::Length(3),
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(1),
        ])
        .areas(frame.area());

    frame.render_widget(Paragraph::new(login_header(step)), header_area);

    render_input(
        frame,
        user_area,
        &InputField {
            title: "Name",
            prompt: "> ",
            input: state.user_input(),
            focused: step == LoginStep::UserName,
        },
    );

    if step == LoginStep::GroupName {
        render_input(
            frame,
            group_area,
            &InputField {
                title: "Group",
                prompt: "> ",
                input: state.group_input(),
                focused: true,
            },
        );
    }

    if let Some(notice) = state.login_notice() {
        frame.render_widget(Paragraph::new(transcript_line(notice)), notice_area);
    }

    if let Some(listing) = state.group_listing() {
        render_group_listing(frame, listing_area, listing);
    }
}

fn login_header(step: LoginStep) -> Vec<Line<'static>> {
    let hint = match step {
        LoginStep::UserName => USER_STEP_HINT,
        LoginStep::GroupName => GROUP_STEP_HINT,
    };

    vec![
        Line::from(Span::styled(APP_TITLE, styles::title_style())),
        Line::from(vec![
            Span::styled(hint, styles::hint_style()),
            Span::styled(format!(" {QUIT_HINT}"), styles::hint_style()),
        ]),
    ]
}

fn render_group_listing(frame: &mut Frame<'_>, area: Rect, listing: &GroupListing) {
    let items: Vec<ListItem<'_>> = listing
        .names()
        .iter()
        .map(|name| ListItem::new(name.as_str()))
        .collect();
    let title = format!("Groups ({})", listing.names().len());

    let list = List::new(items)
        .block(
            Block::default()
                .title(title)
                .borders(Borders::ALL)
                .border_style(styles::inactive_border_style()),
        )
        .highlight_style(styles::selected_group_style());

    let mut list_state = ListState::default();
    list_state.select(listing.selected_index());
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn render_chat(frame: &mut Frame<'_>, state: &ShellState) {
    let [transcript_area, input_area] = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(1), Constraint::Length(3)])
        .areas(frame.area());

    let inner_width = transcript_area.width.saturating_sub(2) as usize;
    let inner_height = transcript_area.height.saturating_sub(2) as usize;
    let rows = transcript_rows(state.transcript(), inner_width, inner_height);
    let transcript = Paragraph::new(rows).block(
        Block::default()
            .title(Span::styled(
                chat_title(state.current_group()),
                styles::title_style(),
            ))
            .borders(Borders::ALL)
            .border_style(styles::active_border_style()),
    );
    frame.render_widget(transcript, transcript_area);

    let prompt = chat_prompt(state.prompt_user());
    render_input(
        frame,
        input_area,
        &InputField {
            title: "",
            prompt: &prompt,
            input: state.message_input(),
            focused: true,
        },
    );
}

fn chat_title(group: &str) -> String {
    format!("{APP_TITLE} - {group}")
}

fn chat_prompt(user: &str) -> String {
    format!("{user}> ")
}

/// The newest screen rows that fit, so the view follows appends.
///
/// Lines longer than `width` are wrapped onto further rows. Every line takes
/// at least one row, so the newest `height` lines always cover the view.
fn transcript_rows(transcript: &Transcript, width: usize, height: usize) -> Vec<Line<'static>> {
    let mut rows: Vec<Line<'static>> = transcript
        .tail(height)
        .iter()
        .flat_map(|line| {
            let style = styles::line_style(line.kind);
            wrap_columns(&line.text, width)
                .into_iter()
                .map(move |row| Line::from(Span::styled(row, style)))
        })
        .collect();

    let overflow = rows.len().saturating_sub(height);
    rows.drain(..overflow);
    rows
}

/// Splits `text` into rows of at most `width` display columns.
fn wrap_columns(text: &str, width: usize) -> Vec<String> {
    let width = width.max(1);
    let mut rows = Vec::new();
    let mut row = String::new();
    let mut used = 0;

    for ch in text.chars() {
        let columns = UnicodeWidthChar::width(ch).unwrap_or(0);
        if used + columns > width && !row.is_empty() {
            rows.push(std::mem::take(&mut row));
            used = 0;
        }
        row.push(ch);
        used += columns;
    }

    rows.push(row);
    rows
}

fn transcript_line(line: &TranscriptLine) -> Line<'static> {
    Line::from(Span::styled(line.text.clone(), styles::line_style(line.kind)))
}

fn render_blocked(frame: &mut Frame<'_>, reason: &str) {
    let mut lines: Vec<Line<'static>> = reason
        .lines()
        .map(|line| Line::from(Span::styled(line.to_owned(), styles::error_line_style())))
        .collect();
    lines.push(Line::default());
    lines.push(Line::from(Span::styled(QUIT_HINT, styles::hint_style())));

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false }).block(
        Block::default()
            .title(APP_TITLE)
            .borders(Borders::ALL)
            .border_style(styles::error_line_style()),
    );
    frame.render_widget(paragraph, frame.area());
}
