//! Wire format between `RemoteStore` and the store host.
//!
//! Every frame is one JSON object on its own line with a `{type, payload}`
//! envelope. A connection carries request/response pairs until it sends
//! `subscribe`; from then on the host only writes `event` frames.

use std::io;

use serde::{de::DeserializeOwned, Deserialize, Serialize};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncReadExt};

use crate::domain::{
    feed::FeedEvent,
    message::{Message, NewMessage},
};

use super::StoreError;

const CODE_UNAVAILABLE: &str = "UNAVAILABLE";
const CODE_PROTOCOL: &str = "PROTOCOL";

/// Longest request line the host accepts.
pub const MAX_REQUEST_BYTES: usize = 64 * 1024;
/// Longest response line a client accepts; history pages are the largest frames.
pub const MAX_RESPONSE_BYTES: usize = 8 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Request {
    EnsureGroup { group: String },
    ListGroups,
    AddMessage { group: String, message: NewMessage },
    RecentMessages { group: String, limit: usize },
    Subscribe {
        group: String,
        user: String,
        since_ms: i64,
    },
    OnlineUsers { group: String },
}

impl Request {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::EnsureGroup { .. } => "ensureGroup",
            Self::ListGroups => "listGroups",
            Self::AddMessage { .. } => "addMessage",
            Self::RecentMessages { .. } => "recentMessages",
            Self::Subscribe { .. } => "subscribe",
            Self::OnlineUsers { .. } => "onlineUsers",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(
    tag = "type",
    content = "payload",
    rename_all = "camelCase",
    rename_all_fields = "camelCase"
)]
pub enum Response {
    GroupReady { created: bool, server_time_ms: i64 },
    Groups { names: Vec<String> },
    MessageAdded { message: Message },
    Messages { messages: Vec<Message> },
    Users { names: Vec<String> },
    Subscribed,
    Event { event: FeedEvent },
    Error { code: String, message: String },
}

impl Response {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::GroupReady { .. } => "groupReady",
            Self::Groups { .. } => "groups",
            Self::MessageAdded { .. } => "messageAdded",
            Self::Messages { .. } => "messages",
            Self::Users { .. } => "users",
            Self::Subscribed => "subscribed",
            Self::Event { .. } => "event",
            Self::Error { .. } => "error",
        }
    }

    /// Turns an `error` frame into the store error it carries.
    pub fn into_result(self) -> Result<Self, StoreError> {
        match self {
            Self::Error { code, message } => Err(StoreError::Rejected { code, message }),
            other => Ok(other),
        }
    }
}

impl From<StoreError> for Response {
    fn from(error: StoreError) -> Self {
        match error {
            StoreError::Unavailable(message) => Self::Error {
                code: CODE_UNAVAILABLE.to_owned(),
                message,
            },
            StoreError::Rejected { code, message } => Self::Error { code, message },
            StoreError::Protocol(message) => Self::Error {
                code: CODE_PROTOCOL.to_owned(),
                message,
            },
        }
    }
}

/// Serializes one frame, newline included.
pub fn encode_line<T: Serialize>(frame: &T) -> Result<String, StoreError> {
    let mut line = serde_json::to_string(frame)
        .map_err(|error| StoreError::Protocol(format!("encode failed: {error}")))?;
    line.push('\n');
    Ok(line)
}

pub fn decode_line<T: DeserializeOwned>(line: &str) -> Result<T, StoreError> {
    serde_json::from_str(line.trim_end())
        .map_err(|error| StoreError::Protocol(format!("decode failed: {error}")))
}

/// Reads one newline-terminated frame of at most `max_bytes`, without the
/// line ending. `None` at end of stream. A longer line fails with
/// `InvalidData` before the rest of it is buffered.
pub async fn read_frame_line<R>(reader: &mut R, max_bytes: usize) -> io::Result<Option<String>>
where
    R: AsyncBufRead + Unpin,
{
    let mut line = String::new();
    let limit = u64::try_from(max_bytes).unwrap_or(u64::MAX).saturating_add(1);
    let read = (&mut *reader).take(limit).read_line(&mut line).await?;
    if read == 0 {
        return Ok(None);
    }

    if !line.ends_with('\n') && read > max_bytes {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("frame exceeds {max_bytes} bytes"),
        ));
    }

    let content = line.trim_end_matches(['\r', '\n']).len();
    line.truncate(content);
    Ok(Some(line))
}

/// Fails with a protocol error naming the frame the caller did not expect.
pub fn unexpected(expected: &str, got: &Response) -> StoreError {
    StoreError::Protocol(format!("expected {expected}, got {}", got.kind()))
}
