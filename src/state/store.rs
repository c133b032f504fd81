//! Observable state container
//!
//! A [`Store`] owns one state value and funnels every mutation through
//! [`Store::update`]. After the mutation it diffs the old and new state into
//! channels (logical groupings such as "playback status" or "stem vocals")
//! and calls only the listeners subscribed to a channel that changed. An
//! update that leaves the state equal notifies nobody.

use std::fmt::Debug;

/// State that can report which logical groupings differ between two values
pub trait Observable: Clone {
    /// Logical grouping a listener can subscribe to
    type Channel: Clone + PartialEq + Debug;

    /// Channels whose observable fields differ between `before` and `after`
    fn changed_channels(before: &Self, after: &Self) -> Vec<Self::Channel>;
}

/// Handle returned by `subscribe*`, used to unsubscribe
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Box<dyn FnMut(&S) + Send>;

struct Subscription<S: Observable> {
    id: SubscriptionId,
    /// `None` listens to every channel
    channels: Option<Vec<S::Channel>>,
    listener: Listener<S>,
}

impl<S: Observable> Subscription<S> {
    fn wants(&self, changed: &[S::Channel]) -> bool {
        match &self.channels {
            None => true,
            Some(channels) => channels.iter().any(|channel| changed.contains(channel)),
        }
    }
}

/// Single-writer container with channel-keyed change notification
pub struct Store<S: Observable> {
    state: S,
    subscriptions: Vec<Subscription<S>>,
    next_id: u64,
}

impl<S: Observable + Default> Default for Store<S> {
    fn default() -> Self {
        Self::new(S::default())
    }
}

impl<S: Observable + Debug> Debug for Store<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("subscriptions", &self.subscriptions.len())
            .finish()
    }
}

impl<S: Observable> Store<S> {
    /// Store holding `state`, with no listeners
    pub fn new(state: S) -> Self {
        Self {
            state,
            subscriptions: Vec::new(),
            next_id: 0,
        }
    }

    /// Current state (read-only)
    pub fn state(&self) -> &S {
        &self.state
    }

    /// Apply a mutation and notify listeners of the channels it changed
    ///
    /// # Example
    /// ```
    /// use musicverse::engine::PlaybackState;
    /// use musicverse::state::{PlaybackChannel, Store};
    /// use std::sync::atomic::{AtomicUsize, Ordering};
    /// use std::sync::Arc;
    ///
    /// let hits = Arc::new(AtomicUsize::new(0));
    /// let counter = Arc::clone(&hits);
    ///
    /// let mut store = Store::new(PlaybackState::new());
    /// store.subscribe(PlaybackChannel::Status, move |_| {
    ///     counter.fetch_add(1, Ordering::SeqCst);
    /// });
    ///
    /// store.update(|playback| playback.play());
    /// store.update(|playback| playback.play()); // unchanged, no callback
    /// assert_eq!(hits.load(Ordering::SeqCst), 1);
    /// ```
    pub fn update<R>(&mut self, mutate: impl FnOnce(&mut S) -> R) -> R {
        if self.subscriptions.is_empty() {
            return mutate(&mut self.state);
        }

        let before = self.state.clone();
        let result = mutate(&mut self.state);
        let changed = S::changed_channels(&before, &self.state);
        if !changed.is_empty() {
            self.notify(&changed);
        }
        result
    }

    /// Replace the whole state, notifying as for any other update
    pub fn replace(&mut self, state: S) {
        self.update(|current| *current = state);
    }

    /// Listen to a single channel
    pub fn subscribe(
        &mut self,
        channel: S::Channel,
        listener: impl FnMut(&S) + Send + 'static,
    ) -> SubscriptionId {
        self.add_subscription(Some(vec![channel]), Box::new(listener))
    }

    /// Listen to several channels; the listener runs at most once per update
    pub fn subscribe_many(
        &mut self,
        channels: Vec<S::Channel>,
        listener: impl FnMut(&S) + Send + 'static,
    ) -> SubscriptionId {
        self.add_subscription(Some(channels), Box::new(listener))
    }

    /// Listen to every change
    pub fn subscribe_all(&mut self, listener: impl FnMut(&S) + Send + 'static) -> SubscriptionId {
        self.add_subscription(None, Box::new(listener))
    }

    /// Remove a listener. Returns false if the id was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.subscriptions.len();
        self.subscriptions.retain(|subscription| subscription.id != id);
        self.subscriptions.len() != before
    }

    /// Number of registered listeners
    pub fn subscriber_count(&self) -> usize {
        self.subscriptions.len()
    }

    fn add_subscription(
        &mut self,
        channels: Option<Vec<S::Channel>>,
        listener: Listener<S>,
    ) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscriptions.push(Subscription {
            id,
            channels,
            listener,
        });
        id
    }

    fn notify(&mut self, changed: &[S::Channel]) {
        for subscription in &mut self.subscriptions {
            if subscription.wants(changed) {
                (subscription.listener)(&self.state);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    #[derive(Debug, Clone, Default, PartialEq)]
    struct Counter {
        left: u32,
        right: u32,
    }

    #[derive(Debug, Clone, PartialEq)]
    enum Side {
        Left,
        Right,
    }

    impl Observable for Counter {
        type Channel = Side;

        fn changed_channels(before: &Self, after: &Self) -> Vec<Side> {
            let mut changed = Vec::new();
            if before.left != after.left {
                changed.push(Side::Left);
            }
            if before.right != after.right {
                changed.push(Side::Right);
            }
            changed
        }
    }

    fn counting() -> (Arc<AtomicUsize>, impl FnMut(&Counter) + Send + 'static) {
        let hits = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&hits);
        (hits, move |_: &Counter| {
            counter.fetch_add(1, Ordering::SeqCst);
        })
    }

    #[test]
    fn test_update_returns_closure_result() {
        let mut store = Store::new(Counter::default());
        let value = store.update(|counter| {
            counter.left += 2;
            counter.left
        });
        assert_eq!(value, 2);
        assert_eq!(store.state().left, 2);
    }

    #[test]
    fn test_only_changed_channel_notified() {
        let mut store = Store::new(Counter::default());
        let (left_hits, left) = counting();
        let (right_hits, right) = counting();
        store.subscribe(Side::Left, left);
        store.subscribe(Side::Right, right);

        store.update(|counter| counter.left += 1);

        assert_eq!(left_hits.load(Ordering::SeqCst), 1);
        assert_eq!(right_hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_no_change_no_notification() {
        let mut store = Store::new(Counter::default());
        let (hits, listener) = counting();
        store.subscribe_all(listener);

        store.update(|counter| counter.left = 0);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_subscribe_many_fires_once() {
        let mut store = Store::new(Counter::default());
        let (hits, listener) = counting();
        store.subscribe_many(vec![Side::Left, Side::Right], listener);

        store.update(|counter| {
            counter.left = 1;
            counter.right = 1;
        });
        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_unsubscribe() {
        let mut store = Store::new(Counter::default());
        let (hits, listener) = counting();
        let id = store.subscribe_all(listener);

        assert!(store.unsubscribe(id));
        assert!(!store.unsubscribe(id));
        assert_eq!(store.subscriber_count(), 0);

        store.update(|counter| counter.right = 5);
        assert_eq!(hits.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn test_listener_sees_new_state() {
        let mut store = Store::new(Counter::default());
        let seen = Arc::new(AtomicUsize::new(0));
        let sink = Arc::clone(&seen);
        store.subscribe(Side::Right, move |counter| {
            sink.store(counter.right as usize, Ordering::SeqCst);
        });

        store.replace(Counter { left: 0, right: 7 });
        assert_eq!(seen.load(Ordering::SeqCst), 7);
    }
}
