//! Use case behind `@showmess`.

use chrono::{Local, TimeZone};

use crate::{
    domain::{
        message::Message,
        session::SessionState,
        transcript::{LineKind, TranscriptLine},
    },
    store::{ChatStore, StoreError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShowHistoryError {
    StoreUnavailable,
    GroupNotSet,
    Store(StoreError),
}

impl ShowHistoryError {
    pub fn user_message(&self) -> String {
        match self {
            Self::StoreUnavailable => "Error: not connected to the message store.".to_owned(),
            Self::GroupNotSet => "Error: group not set. Use @exit and join a group.".to_owned(),
            Self::Store(error) => format!("Error loading messages: {error}"),
        }
    }
}

/// Fetches the newest `limit` messages and returns them oldest first.
pub fn load_history(
    store: Option<&dyn ChatStore>,
    session: &SessionState,
    limit: usize,
) -> Result<Vec<Message>, ShowHistoryError> {
    let store = store.ok_or(ShowHistoryError::StoreUnavailable)?;
    let group = session.group().ok_or(ShowHistoryError::GroupNotSet)?;

    let mut messages = store
        .recent_messages(group, limit)
        .map_err(ShowHistoryError::Store)?;
    messages.reverse();
    Ok(messages)
}

/// Renders the history block, timestamps in the local zone.
pub fn history_lines(group: &str, messages: &[Message]) -> Vec<TranscriptLine> {
    history_lines_in(group, messages, &Local)
}

fn history_lines_in<Tz>(group: &str, messages: &[Message], zone: &Tz) -> Vec<TranscriptLine>
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    let mut lines = Vec::with_capacity(messages.len() + 2);
    lines.push(TranscriptLine {
        kind: LineKind::System,
        text: format!("--- Last {} messages in {} ---", messages.len(), group),
    });

    lines.extend(messages.iter().map(|message| TranscriptLine {
        kind: LineKind::Normal,
        text: format!(
            "[{}] {}",
            format_timestamp(message.timestamp_ms, zone),
            message.display_line()
        ),
    }));

    lines.push(TranscriptLine {
        kind: LineKind::System,
        text: "--- End of history ---".to_owned(),
    });
    lines
}

fn format_timestamp<Tz>(timestamp_ms: i64, zone: &Tz) -> String
where
    Tz: TimeZone,
    Tz::Offset: std::fmt::Display,
{
    zone.timestamp_millis_opt(timestamp_ms)
        .earliest()
        .map(|dt| dt.format("%Y-%m-%d %H:%M:%S").to_string())
        .unwrap_or_else(|| "????-??-?? ??:??:??".to_owned())
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::{domain::message::NewMessage, store::MemoryStore};

    fn joined(store: &MemoryStore, group: &str) -> SessionState {
        let lookup = store.ensure_group(group).expect("group");
        let mut session = SessionState::default();
        session.set_user("bob");
        session
            .join(group, |name| store.subscribe(name, "bob", lookup.server_time_ms))
            .expect("join");
        session
    }

    #[test]
    fn history_is_chronological_and_limited() {
        let store = MemoryStore::new();
        let session = joined(&store, "ops");
        for index in 0..40 {
            store
                .add_message("ops", NewMessage::new("carol", format!("m{index}")))
                .expect("write");
        }

        let messages = load_history(Some(&store), &session, 30).expect("history");

        assert_eq!(messages.len(), 30);
        assert_eq!(messages.first().map(|m| m.body.as_str()), Some("m10"));
        assert_eq!(messages.last().map(|m| m.body.as_str()), Some("m39"));
        assert!(messages
            .windows(2)
            .all(|pair| pair[0].timestamp_ms < pair[1].timestamp_ms));
    }

    #[test]
    fn history_requires_group() {
        let store = MemoryStore::new();
        let session = SessionState::default();

        assert_eq!(
            load_history(Some(&store), &session, 30),
            Err(ShowHistoryError::GroupNotSet)
        );
    }

    #[test]
    fn rendered_block_is_bracketed_by_banners() {
        let messages = vec![Message {
            group: "ops".to_owned(),
            user: "bob".to_owned(),
            body: "ping".to_owned(),
            timestamp_ms: 1_767_225_600_000,
        }];

        let lines = history_lines_in("ops", &messages, &Utc);

        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].kind, LineKind::System);
        assert!(lines[0].text.contains("ops"));
        assert_eq!(lines[1].text, "[2026-01-01 00:00:00] [bob] ping");
        assert_eq!(lines[2].text, "--- End of history ---");
    }
}
