//! Use case for the group field of the login screen.

use crate::{
    domain::{group::GroupRequest, session::SessionState},
    store::{ChatStore, StoreError},
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterGroupOutcome {
    /// Blank input; nothing happened.
    Ignored,
    /// The `list` keyword was entered; these are the existing groups.
    Listed(Vec<String>),
    Joined { group: String, created: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EnterGroupError {
    StoreUnavailable,
    UserNotSet,
    Store(StoreError),
}

impl EnterGroupError {
    pub fn user_message(&self) -> String {
        match self {
            Self::StoreUnavailable => "Error: not connected to the message store.".to_owned(),
            Self::UserNotSet => "Error: enter a user name before joining a group.".to_owned(),
            Self::Store(error) => format!("Error joining group: {error}"),
        }
    }
}

/// Lists groups or joins one.
///
/// Joining resolves the group (creating it if needed) and replaces the live
/// feed with one that only carries messages stamped after the lookup. The
/// feed is opened under the session's user name, which announces them.
pub fn enter_group(
    store: Option<&dyn ChatStore>,
    session: &mut SessionState,
    input: &str,
) -> Result<EnterGroupOutcome, EnterGroupError> {
    let request = GroupRequest::parse(input);
    if request == GroupRequest::Empty {
        return Ok(EnterGroupOutcome::Ignored);
    }

    let store = store.ok_or(EnterGroupError::StoreUnavailable)?;

    match request {
        GroupRequest::Empty => Ok(EnterGroupOutcome::Ignored),
        GroupRequest::List => store
            .list_groups()
            .map(EnterGroupOutcome::Listed)
            .map_err(EnterGroupError::Store),
        GroupRequest::Join(group) => {
            let user = session
                .user()
                .map(str::to_owned)
                .ok_or(EnterGroupError::UserNotSet)?;
            let lookup = store.ensure_group(&group).map_err(EnterGroupError::Store)?;
            session
                .join(&group, |name| store.subscribe(name, &user, lookup.server_time_ms))
                .map_err(EnterGroupError::Store)?;

            tracing::info!(
                group = %group,
                created = lookup.created,
                since_ms = lookup.server_time_ms,
                "joined group"
            );

            Ok(EnterGroupOutcome::Joined {
                group,
                created: lookup.created,
            })
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        domain::{feed::FeedEvent, message::NewMessage},
        store::MemoryStore,
    };

    fn session_for(user: &str) -> SessionState {
        let mut session = SessionState::default();
        session.set_user(user);
        session
    }

    #[test]
    fn list_keyword_lists_instead_of_joining() {
        let store = MemoryStore::new();
        store.ensure_group("dev").expect("group");
        let mut session = session_for("alice");

        let outcome = enter_group(Some(&store), &mut session, "LIST").expect("list");

        assert_eq!(outcome, EnterGroupOutcome::Listed(vec!["dev".to_owned()]));
        assert_eq!(session.group(), None);
        assert_eq!(store.live_subscriptions(), 0);
    }

    #[test]
    fn joining_a_new_group_creates_it() {
        let store = MemoryStore::new();
        let mut session = session_for("bob");

        let outcome = enter_group(Some(&store), &mut session, " ops ").expect("join");

        assert_eq!(
            outcome,
            EnterGroupOutcome::Joined {
                group: "ops".to_owned(),
                created: true
            }
        );
        assert_eq!(session.group(), Some("ops"));
    }

    #[test]
    fn switching_groups_keeps_exactly_one_feed_on_the_new_group() {
        let store = MemoryStore::new();
        let mut session = session_for("bob");

        enter_group(Some(&store), &mut session, "a").expect("join a");
        enter_group(Some(&store), &mut session, "b").expect("join b");

        assert_eq!(store.live_subscriptions(), 1);
        assert_eq!(session.subscription().map(|s| s.group()), Some("b"));

        store
            .add_message("a", NewMessage::new("carol", "in a"))
            .expect("write a");
        store
            .add_message("b", NewMessage::new("carol", "in b"))
            .expect("write b");
        let bodies: Vec<_> = session
            .drain_deliveries()
            .iter()
            .filter_map(FeedEvent::message)
            .map(|message| message.body.clone())
            .collect();
        assert_eq!(bodies, vec!["in b"]);
    }

    #[test]
    fn joining_skips_earlier_messages() {
        let store = MemoryStore::new();
        store.ensure_group("ops").expect("group");
        store
            .add_message("ops", NewMessage::new("carol", "before"))
            .expect("write");
        let mut session = session_for("bob");

        enter_group(Some(&store), &mut session, "ops").expect("join");

        assert_eq!(
            session.drain_deliveries(),
            vec![FeedEvent::Joined {
                user: "bob".to_owned()
            }]
        );
    }

    #[test]
    fn joining_without_a_user_name_is_refused() {
        let store = MemoryStore::new();
        let mut session = SessionState::default();

        assert_eq!(
            enter_group(Some(&store), &mut session, "ops"),
            Err(EnterGroupError::UserNotSet)
        );
        assert_eq!(store.live_subscriptions(), 0);
    }

    #[test]
    fn joining_announces_the_user_to_members() {
        let store = MemoryStore::new();
        let mut alice = session_for("alice");
        let mut bob = session_for("bob");
        enter_group(Some(&store), &mut alice, "ops").expect("alice joins");
        alice.drain_deliveries();

        enter_group(Some(&store), &mut bob, "ops").expect("bob joins");
        enter_group(Some(&store), &mut bob, "dev").expect("bob moves");

        assert_eq!(
            alice.drain_deliveries(),
            vec![
                FeedEvent::Joined {
                    user: "bob".to_owned()
                },
                FeedEvent::Left {
                    user: "bob".to_owned()
                },
            ]
        );
        assert_eq!(
            store.online_users("ops").expect("users"),
            vec!["alice".to_owned()]
        );
    }

    #[test]
    fn blank_input_is_ignored_even_without_store() {
        let mut session = session_for("bob");

        assert_eq!(
            enter_group(None, &mut session, "  "),
            Ok(EnterGroupOutcome::Ignored)
        );
    }

    #[test]
    fn missing_store_is_reported() {
        let mut session = session_for("bob");

        assert_eq!(
            enter_group(None, &mut session, "ops"),
            Err(EnterGroupError::StoreUnavailable)
        );
    }
}
