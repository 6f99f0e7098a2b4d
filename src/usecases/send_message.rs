//! Use case for posting a chat line to the current group.

use crate::{
    domain::{
        message::{Message, NewMessage},
        session::SessionState,
    },
    store::{ChatStore, StoreError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SendMessageError {
    /// No store adapter was configured for this run.
    StoreUnavailable,
    UserNotSet,
    GroupNotSet,
    /// The store refused or failed the write. Not retried.
    Store(StoreError),
}

impl SendMessageError {
    pub fn user_message(&self) -> String {
        match self {
            Self::StoreUnavailable => "Error: not connected to the message store.".to_owned(),
            Self::UserNotSet => "Error: user name not set. Use @exit to log in again.".to_owned(),
            Self::GroupNotSet => "Error: group not set. Use @exit and join a group.".to_owned(),
            Self::Store(error) => format!("Error sending message: {error}"),
        }
    }
}

/// Writes `text` as the session user into the session group.
///
/// Preconditions are checked in order: store, user, group. The first one
/// missing aborts the send before anything reaches the store.
pub fn send_message(
    store: Option<&dyn ChatStore>,
    session: &SessionState,
    text: &str,
) -> Result<Message, SendMessageError> {
    let store = store.ok_or(SendMessageError::StoreUnavailable)?;
    let user = session.user().ok_or(SendMessageError::UserNotSet)?;
    let group = session.group().ok_or(SendMessageError::GroupNotSet)?;

    store
        .add_message(group, NewMessage::new(user, text))
        .map_err(SendMessageError::Store)
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;
    use crate::{
        domain::{group::GroupLookup, subscription::Subscription},
        store::MemoryStore,
    };

    /// Records writes and fails them all with the configured error.
    struct RecordingStore {
        writes: RefCell<Vec<(String, NewMessage)>>,
        failure: Option<StoreError>,
    }

    impl RecordingStore {
        fn failing_with(failure: StoreError) -> Self {
            Self {
                writes: RefCell::new(Vec::new()),
                failure: Some(failure),
            }
        }

        fn accepting() -> Self {
            Self {
                writes: RefCell::new(Vec::new()),
                failure: None,
            }
        }
    }

    impl ChatStore for RecordingStore {
        fn ensure_group(&self, _group: &str) -> Result<GroupLookup, StoreError> {
            Ok(GroupLookup {
                created: false,
                server_time_ms: 0,
            })
        }

        fn list_groups(&self) -> Result<Vec<String>, StoreError> {
            Ok(vec![])
        }

        fn add_message(&self, group: &str, message: NewMessage) -> Result<Message, StoreError> {
            self.writes
                .borrow_mut()
                .push((group.to_owned(), message.clone()));
            match &self.failure {
                Some(error) => Err(error.clone()),
                None => Ok(Message {
                    group: group.to_owned(),
                    user: message.user,
                    body: message.body,
                    timestamp_ms: 1,
                }),
            }
        }

        fn recent_messages(&self, _group: &str, _limit: usize) -> Result<Vec<Message>, StoreError> {
            Ok(vec![])
        }

        fn subscribe(
            &self,
            group: &str,
            _user: &str,
            _since_ms: i64,
        ) -> Result<Subscription, StoreError> {
            let (_tx, subscription) = Subscription::channel(group, || {});
            Ok(subscription)
        }

        fn online_users(&self, _group: &str) -> Result<Vec<String>, StoreError> {
            Ok(vec![])
        }
    }

    fn joined_session(store: &dyn ChatStore, user: &str, group: &str) -> SessionState {
        let mut session = SessionState::default();
        session.set_user(user);
        session
            .join(group, |name| store.subscribe(name, user, 0))
            .expect("join should succeed");
        session
    }

    #[test]
    fn missing_store_is_reported_first() {
        let session = SessionState::default();

        assert_eq!(
            send_message(None, &session, "hi"),
            Err(SendMessageError::StoreUnavailable)
        );
    }

    #[test]
    fn missing_user_aborts_without_write() {
        let store = RecordingStore::accepting();
        let session = SessionState::default();

        let result = send_message(Some(&store), &session, "hi");

        assert_eq!(result, Err(SendMessageError::UserNotSet));
        assert!(store.writes.borrow().is_empty());
    }

    #[test]
    fn missing_group_aborts_without_write() {
        let store = RecordingStore::accepting();
        let mut session = SessionState::default();
        session.set_user("alice");

        let result = send_message(Some(&store), &session, "hi");

        assert_eq!(result, Err(SendMessageError::GroupNotSet));
        assert!(store.writes.borrow().is_empty());
        assert!(result
            .unwrap_err()
            .user_message()
            .contains("group not set"));
    }

    #[test]
    fn writes_user_and_body_into_current_group() {
        let store = RecordingStore::accepting();
        let session = joined_session(&store, "alice", "ops");

        let message = send_message(Some(&store), &session, "hello").expect("send");

        assert_eq!(message.user, "alice");
        let writes = store.writes.borrow();
        assert_eq!(writes.len(), 1);
        assert_eq!(writes[0].0, "ops");
        assert_eq!(writes[0].1, NewMessage::new("alice", "hello"));
    }

    #[test]
    fn store_failure_is_reported_with_detail_and_not_retried() {
        let store = RecordingStore::failing_with(StoreError::Unavailable("timed out".to_owned()));
        let session = joined_session(&store, "alice", "ops");

        let error = send_message(Some(&store), &session, "hello").expect_err("must fail");

        assert_eq!(store.writes.borrow().len(), 1);
        assert!(error.user_message().starts_with("Error sending message:"));
        assert!(error.user_message().contains("timed out"));
    }

    #[test]
    fn server_assigns_the_timestamp() {
        let store = MemoryStore::new();
        let lookup = store.ensure_group("ops").expect("group");
        let mut session = SessionState::default();
        session.set_user("bob");
        session
            .join("ops", |name| store.subscribe(name, "bob", lookup.server_time_ms))
            .expect("join");

        let message = send_message(Some(&store), &session, "ping").expect("send");

        assert!(message.timestamp_ms > lookup.server_time_ms);
    }
}
