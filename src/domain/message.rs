use serde::{Deserialize, Serialize};

/// A stored chat message. The timestamp is assigned by the store, never by the sender.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Message {
    pub group: String,
    pub user: String,
    #[serde(rename = "message")]
    pub body: String,
    pub timestamp_ms: i64,
}

impl Message {
    /// Returns the line shown for a live delivery: `[user] body`.
    pub fn display_line(&self) -> String {
        format!("[{}] {}", self.user, self.body)
    }
}

/// Message fields supplied by the sender; the store adds the timestamp.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub user: String,
    #[serde(rename = "message")]
    pub body: String,
}

impl NewMessage {
    pub fn new(user: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            user: user.into(),
            body: body.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_line_prefixes_sender() {
        let message = Message {
            group: "ops".to_owned(),
            user: "bob".to_owned(),
            body: "ping".to_owned(),
            timestamp_ms: 1,
        };

        assert_eq!(message.display_line(), "[bob] ping");
    }

    #[test]
    fn body_is_serialized_under_message_key() {
        let value = serde_json::to_value(NewMessage::new("alice", "hello")).expect("serialize");

        assert_eq!(value["user"], "alice");
        assert_eq!(value["message"], "hello");
    }
}
