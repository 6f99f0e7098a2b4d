use serde::{Deserialize, Serialize};

use super::{
    message::Message,
    transcript::{LineKind, TranscriptLine},
};

/// One delivery on a group feed: a new message or a presence change.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum FeedEvent {
    Message { message: Message },
    Joined { user: String },
    Left { user: String },
}

impl FeedEvent {
    pub fn to_line(&self) -> TranscriptLine {
        match self {
            Self::Message { message } => TranscriptLine {
                kind: LineKind::Normal,
                text: message.display_line(),
            },
            Self::Joined { user } => TranscriptLine {
                kind: LineKind::System,
                text: format!("** {user} is joining the chat **"),
            },
            Self::Left { user } => TranscriptLine {
                kind: LineKind::System,
                text: format!("** {user} is leaving the chat **"),
            },
        }
    }

    pub fn message(&self) -> Option<&Message> {
        match self {
            Self::Message { message } => Some(message),
            Self::Joined { .. } | Self::Left { .. } => None,
        }
    }
}

impl From<Message> for FeedEvent {
    fn from(message: Message) -> Self {
        Self::Message { message }
    }
}
