//! Owned handle for a live feed of one group: new messages and presence changes.

use std::fmt;

use tokio::sync::mpsc::{self, error::TryRecvError, UnboundedReceiver, UnboundedSender};

use super::feed::FeedEvent;

type Canceller = Box<dyn FnOnce() + Send + 'static>;

/// A live subscription. Dropping the handle cancels it.
pub struct Subscription {
    group: String,
    events: UnboundedReceiver<FeedEvent>,
    cancel: Option<Canceller>,
}

impl Subscription {
    pub fn new<F>(group: impl Into<String>, events: UnboundedReceiver<FeedEvent>, cancel: F) -> Self
    where
        F: FnOnce() + Send + 'static,
    {
        Self {
            group: group.into(),
            events,
            cancel: Some(Box::new(cancel)),
        }
    }

    /// Creates a sender/handle pair; the canceller runs once on cancel or drop.
    pub fn channel<F>(group: impl Into<String>, cancel: F) -> (UnboundedSender<FeedEvent>, Self)
    where
        F: FnOnce() + Send + 'static,
    {
        let (tx, rx) = mpsc::unbounded_channel();
        (tx, Self::new(group, rx, cancel))
    }

    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns every event delivered since the last call without blocking.
    pub fn drain(&mut self) -> Vec<FeedEvent> {
        let mut delivered = Vec::new();
        loop {
            match self.events.try_recv() {
                Ok(event) => delivered.push(event),
                Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => break,
            }
        }
        delivered
    }

    /// Waits for the next delivery; `None` once the feed is closed.
    pub async fn recv(&mut self) -> Option<FeedEvent> {
        self.events.recv().await
    }

    pub fn cancel(mut self) {
        self.run_canceller();
    }

    fn run_canceller(&mut self) {
        if let Some(cancel) = self.cancel.take() {
            self.events.close();
            cancel();
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.run_canceller();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("group", &self.group)
            .field("live", &self.cancel.is_some())
            .finish()
    }
}
