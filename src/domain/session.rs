//! Who is chatting, where, and the single live feed that goes with it.

use super::{feed::FeedEvent, subscription::Subscription};

#[derive(Debug, Default)]
pub struct SessionState {
    user: Option<String>,
    group: Option<String>,
    subscription: Option<Subscription>,
}

impl SessionState {
    pub fn user(&self) -> Option<&str> {
        self.user.as_deref()
    }

    pub fn group(&self) -> Option<&str> {
        self.group.as_deref()
    }

    #[cfg(test)]
    pub fn subscription(&self) -> Option<&Subscription> {
        self.subscription.as_ref()
    }

    /// Records the display name. Blank input leaves the session unchanged.
    pub fn set_user(&mut self, name: &str) -> bool {
        let name = name.trim();
        if name.is_empty() {
            return false;
        }

        self.user = Some(name.to_owned());
        true
    }

    /// Switches to `group`, replacing the live feed.
    ///
    /// The current subscription is cancelled before `subscribe` runs, so two
    /// feeds never overlap. On failure the session is left without a group.
    pub fn join<F, E>(&mut self, group: &str, subscribe: F) -> Result<(), E>
    where
        F: FnOnce(&str) -> Result<Subscription, E>,
    {
        self.cancel_subscription();
        self.group = None;

        let subscription = subscribe(group)?;
        self.group = Some(group.to_owned());
        self.subscription = Some(subscription);
        Ok(())
    }

    /// Returns events delivered by the live feed since the last call.
    pub fn drain_deliveries(&mut self) -> Vec<FeedEvent> {
        self.subscription
            .as_mut()
            .map(Subscription::drain)
            .unwrap_or_default()
    }

    /// Cancels the feed and forgets user and group. Safe to call repeatedly.
    pub fn exit(&mut self) -> bool {
        let cancelled = self.cancel_subscription();
        self.user = None;
        self.group = None;
        cancelled
    }

    fn cancel_subscription(&mut self) -> bool {
        match self.subscription.take() {
            Some(subscription) => {
                subscription.cancel();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    use super::*;

    fn counted_subscription(group: &str, live: &Arc<AtomicUsize>) -> Subscription {
        live.fetch_add(1, Ordering::SeqCst);
        let counter = Arc::clone(live);
        let (_tx, subscription) = Subscription::channel(group, move || {
            counter.fetch_sub(1, Ordering::SeqCst);
        });
        subscription
    }

    #[test]
    fn set_user_trims_and_rejects_blank() {
        let mut session = SessionState::default();

        assert!(!session.set_user("   "));
        assert_eq!(session.user(), None);

        assert!(session.set_user("  alice "));
        assert_eq!(session.user(), Some("alice"));
    }

    #[test]
    fn switching_groups_leaves_one_live_subscription() {
        let live = Arc::new(AtomicUsize::new(0));
        let mut session = SessionState::default();

        session
            .join::<_, ()>("a", |group| Ok(counted_subscription(group, &live)))
            .expect("join a");
        session
            .join::<_, ()>("b", |group| {
                assert_eq!(live.load(Ordering::SeqCst), 0, "old feed must be gone first");
                Ok(counted_subscription(group, &live))
            })
            .expect("join b");

        assert_eq!(live.load(Ordering::SeqCst), 1);
        assert_eq!(session.group(), Some("b"));
        assert_eq!(session.subscription().map(Subscription::group), Some("b"));
    }

    #[test]
    fn failed_join_clears_previous_group() {
        let live = Arc::new(AtomicUsize::new(0));
        let mut session = SessionState::default();
        session
            .join::<_, ()>("a", |group| Ok(counted_subscription(group, &live)))
            .expect("join a");

        let result = session.join("b", |_| Err("offline"));

        assert_eq!(result, Err("offline"));
        assert_eq!(session.group(), None);
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn exit_is_idempotent() {
        let live = Arc::new(AtomicUsize::new(0));
        let mut session = SessionState::default();
        session.set_user("alice");
        session
            .join::<_, ()>("ops", |group| Ok(counted_subscription(group, &live)))
            .expect("join");

        assert!(session.exit());
        assert!(!session.exit());
        assert_eq!(session.user(), None);
        assert_eq!(session.group(), None);
        assert_eq!(live.load(Ordering::SeqCst), 0);
    }
}
