//! In-process document store. Backs local sessions and the `serve` host.

use std::{
    collections::{BTreeMap, BTreeSet},
    sync::{Arc, Mutex, MutexGuard, Weak},
};

use chrono::Utc;
use tokio::sync::mpsc::UnboundedSender;

use crate::domain::{
    feed::FeedEvent,
    group::GroupLookup,
    message::{Message, NewMessage},
    subscription::Subscription,
};

use super::{ChatStore, StoreError};

const GROUP_NOT_FOUND: &str = "GROUP_NOT_FOUND";

#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    documents: Arc<Mutex<Documents>>,
}

#[derive(Debug, Default)]
struct Documents {
    groups: BTreeMap<String, GroupDocument>,
    last_timestamp_ms: i64,
    next_subscriber_id: u64,
    subscribers: Vec<Subscriber>,
}

#[derive(Debug)]
struct GroupDocument {
    created_at_ms: i64,
    messages: Vec<Message>,
}

#[derive(Debug)]
struct Subscriber {
    id: u64,
    group: String,
    user: String,
    tx: UnboundedSender<FeedEvent>,
}

impl Documents {
    /// Server clock: wall time in milliseconds, forced strictly increasing.
    fn stamp(&mut self) -> i64 {
        let now = Utc::now().timestamp_millis();
        self.last_timestamp_ms = now.max(self.last_timestamp_ms + 1);
        self.last_timestamp_ms
    }

    /// Sends `event` to every feed on `group`. Closed feeds are removed by
    /// their canceller, which also announces the departure.
    fn publish(&self, group: &str, event: &FeedEvent) {
        for subscriber in self
            .subscribers
            .iter()
            .filter(|subscriber| subscriber.group == group)
        {
            let _ = subscriber.tx.send(event.clone());
        }
    }

    fn unsubscribe(&mut self, id: u64) {
        let Some(index) = self
            .subscribers
            .iter()
            .position(|subscriber| subscriber.id == id)
        else {
            return;
        };

        let subscriber = self.subscribers.remove(index);
        tracing::debug!(
            group = %subscriber.group,
            user = %subscriber.user,
            subscriber = id,
            "subscription removed"
        );
        self.publish(
            &subscriber.group,
            &FeedEvent::Left {
                user: subscriber.user,
            },
        );
    }
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of feeds currently registered.
    pub fn live_subscriptions(&self) -> usize {
        self.lock()
            .map(|documents| documents.subscribers.len())
            .unwrap_or_default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Documents>, StoreError> {
        self.documents
            .lock()
            .map_err(|_| StoreError::Unavailable("document lock poisoned".to_owned()))
    }
}

impl ChatStore for MemoryStore {
    fn ensure_group(&self, group: &str) -> Result<GroupLookup, StoreError> {
        let mut documents = self.lock()?;
        let server_time_ms = documents.stamp();

        let created = match documents.groups.get(group) {
            Some(document) => {
                tracing::debug!(group, created_at_ms = document.created_at_ms, "group resolved");
                false
            }
            None => {
                documents.groups.insert(
                    group.to_owned(),
                    GroupDocument {
                        created_at_ms: server_time_ms,
                        messages: Vec::new(),
                    },
                );
                tracing::info!(group, "group created");
                true
            }
        };

        Ok(GroupLookup {
            created,
            server_time_ms,
        })
    }

    fn list_groups(&self) -> Result<Vec<String>, StoreError> {
        Ok(self.lock()?.groups.keys().cloned().collect())
    }

    fn add_message(&self, group: &str, message: NewMessage) -> Result<Message, StoreError> {
        let mut documents = self.lock()?;
        if !documents.groups.contains_key(group) {
            return Err(StoreError::Rejected {
                code: GROUP_NOT_FOUND.to_owned(),
                message: format!("group {group} does not exist"),
            });
        }

        let stored = Message {
            group: group.to_owned(),
            user: message.user,
            body: message.body,
            timestamp_ms: documents.stamp(),
        };

        if let Some(document) = documents.groups.get_mut(group) {
            document.messages.push(stored.clone());
        }
        documents.publish(group, &FeedEvent::from(stored.clone()));

        Ok(stored)
    }

    fn recent_messages(&self, group: &str, limit: usize) -> Result<Vec<Message>, StoreError> {
        let documents = self.lock()?;
        let messages = documents
            .groups
            .get(group)
            .map(|document| {
                document
                    .messages
                    .iter()
                    .rev()
                    .take(limit)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default();

        Ok(messages)
    }

    fn subscribe(
        &self,
        group: &str,
        user: &str,
        since_ms: i64,
    ) -> Result<Subscription, StoreError> {
        let mut documents = self.lock()?;
        let id = documents.next_subscriber_id;
        documents.next_subscriber_id += 1;

        let registry: Weak<Mutex<Documents>> = Arc::downgrade(&self.documents);
        let (tx, subscription) = Subscription::channel(group, move || {
            if let Some(documents) = registry.upgrade() {
                if let Ok(mut documents) = documents.lock() {
                    documents.unsubscribe(id);
                }
            }
        });

        // Replay what landed between the lookup and now while holding the lock,
        // so later publishes cannot overtake it.
        if let Some(document) = documents.groups.get(group) {
            for message in document
                .messages
                .iter()
                .filter(|message| message.timestamp_ms > since_ms)
            {
                let _ = tx.send(FeedEvent::from(message.clone()));
            }
        }

        documents.subscribers.push(Subscriber {
            id,
            group: group.to_owned(),
            user: user.to_owned(),
            tx,
        });
        documents.publish(
            group,
            &FeedEvent::Joined {
                user: user.to_owned(),
            },
        );
        tracing::debug!(group, user, subscriber = id, since_ms, "subscription registered");

        Ok(subscription)
    }

    fn online_users(&self, group: &str) -> Result<Vec<String>, StoreError> {
        let documents = self.lock()?;
        let users: BTreeSet<&str> = documents
            .subscribers
            .iter()
            .filter(|subscriber| subscriber.group == group)
            .map(|subscriber| subscriber.user.as_str())
            .collect();

        Ok(users.into_iter().map(str::to_owned).collect())
    }
}
