//! Store layer: the document store contract and its adapters.

pub mod memory;
pub mod protocol;
pub mod remote;
pub mod server;

use thiserror::Error;

use crate::domain::{
    group::GroupLookup,
    message::{Message, NewMessage},
    subscription::Subscription,
};

pub use memory::MemoryStore;
pub use remote::RemoteStore;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum StoreError {
    #[error("store unavailable: {0}")]
    Unavailable(String),
    #[error("{message} ({code})")]
    Rejected { code: String, message: String },
    #[error("unexpected store response: {0}")]
    Protocol(String),
}

/// Operations the chat client needs from the document store.
///
/// Timestamps are always assigned by the store so every client sees one order.
pub trait ChatStore {
    /// Looks the group up and creates it when absent.
    fn ensure_group(&self, group: &str) -> Result<GroupLookup, StoreError>;

    /// Names of every group, sorted.
    fn list_groups(&self) -> Result<Vec<String>, StoreError>;

    fn add_message(&self, group: &str, message: NewMessage) -> Result<Message, StoreError>;

    /// Newest `limit` messages of the group, newest first.
    fn recent_messages(&self, group: &str, limit: usize) -> Result<Vec<Message>, StoreError>;

    /// Live feed for `user`: messages stamped after `since_ms`, oldest first,
    /// then presence changes as they happen, until cancelled.
    ///
    /// Opening the feed announces `user` to the group, the new member included.
    /// Cancelling it announces the departure to everyone left.
    fn subscribe(
        &self,
        group: &str,
        user: &str,
        since_ms: i64,
    ) -> Result<Subscription, StoreError>;

    /// Users holding a live feed on the group, sorted, each named once.
    fn online_users(&self, group: &str) -> Result<Vec<String>, StoreError>;
}

impl<T> ChatStore for &T
where
    T: ChatStore + ?Sized,
{
    fn ensure_group(&self, group: &str) -> Result<GroupLookup, StoreError> {
        (*self).ensure_group(group)
    }

    fn list_groups(&self) -> Result<Vec<String>, StoreError> {
        (*self).list_groups()
    }

    fn add_message(&self, group: &str, message: NewMessage) -> Result<Message, StoreError> {
        (*self).add_message(group, message)
    }

    fn recent_messages(&self, group: &str, limit: usize) -> Result<Vec<Message>, StoreError> {
        (*self).recent_messages(group, limit)
    }

    fn subscribe(
        &self,
        group: &str,
        user: &str,
        since_ms: i64,
    ) -> Result<Subscription, StoreError> {
        (*self).subscribe(group, user, since_ms)
    }

    fn online_users(&self, group: &str) -> Result<Vec<String>, StoreError> {
        (*self).online_users(group)
    }
}

/// The adapter selected by the credentials document.
#[derive(Debug, Clone)]
pub enum StoreBackend {
    Memory(MemoryStore),
    Remote(RemoteStore),
}

impl StoreBackend {
    pub fn describe(&self) -> String {
        match self {
            Self::Memory(_) => "memory".to_owned(),
            Self::Remote(remote) => format!("remote {}", remote.endpoint()),
        }
    }

    fn inner(&self) -> &dyn ChatStore {
        match self {
            Self::Memory(store) => store,
            Self::Remote(store) => store,
        }
    }
}

impl ChatStore for StoreBackend {
    fn ensure_group(&self, group: &str) -> Result<GroupLookup, StoreError> {
        self.inner().ensure_group(group)
    }

    fn list_groups(&self) -> Result<Vec<String>, StoreError> {
        self.inner().list_groups()
    }

    fn add_message(&self, group: &str, message: NewMessage) -> Result<Message, StoreError> {
        self.inner().add_message(group, message)
    }

    fn recent_messages(&self, group: &str, limit: usize) -> Result<Vec<Message>, StoreError> {
        self.inner().recent_messages(group, limit)
    }

    fn subscribe(
        &self,
        group: &str,
        user: &str,
        since_ms: i64,
    ) -> Result<Subscription, StoreError> {
        self.inner().subscribe(group, user, since_ms)
    }

    fn online_users(&self, group: &str) -> Result<Vec<String>, StoreError> {
        self.inner().online_users(group)
    }
}

/// Returns the store module name for smoke checks.
pub fn module_name() -> &'static str {
    "store"
}
