//! # Favorites Broadcast Channel
//!
//! A single observable value holding the favorite-movie IDs of the active
//! session. Readers call [`FavoritesChannel::current`]; views that must
//! re-render on change hold a [`Subscription`].

use std::sync::{Arc, Mutex, MutexGuard, Weak};

/// Type alias for favorites listeners to reduce complexity
pub type FavoritesListener = Arc<dyn Fn(&[String]) + Send + Sync>;

#[derive(Default)]
struct ChannelInner {
    value: Vec<String>,
    listeners: Vec<(u64, FavoritesListener)>,
    next_id: u64,
}

/// Publish/subscribe cell distributing favorites-set changes to views
#[derive(Clone, Default)]
pub struct FavoritesChannel {
    inner: Arc<Mutex<ChannelInner>>,
}

impl std::fmt::Debug for FavoritesChannel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let inner = self.lock();
        f.debug_struct("FavoritesChannel")
            .field("value", &inner.value)
            .field("subscribers", &inner.listeners.len())
            .finish()
    }
}

impl FavoritesChannel {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> MutexGuard<'_, ChannelInner> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Replace the held value and notify every subscriber in subscription order.
    ///
    /// Listeners run after the lock is released, so they may read the channel.
    pub fn publish(&self, favorites: Vec<String>) {
        let (snapshot, listeners) = {
            let mut inner = self.lock();
            inner.value = favorites;
            let listeners: Vec<FavoritesListener> =
                inner.listeners.iter().map(|(_, l)| l.clone()).collect();
            (inner.value.clone(), listeners)
        };

        tracing::debug!(
            "Publishing {} favorites to {} subscribers",
            snapshot.len(),
            listeners.len()
        );
        for listener in listeners {
            listener(&snapshot);
        }
    }

    /// Drop all favorites, notifying subscribers
    pub fn reset(&self) {
        self.publish(Vec::new());
    }

    /// Register a listener. It is called right away with the current value,
    /// then with every later published value until the subscription ends.
    pub fn subscribe<F>(&self, listener: F) -> Subscription
    where
        F: Fn(&[String]) + Send + Sync + 'static,
    {
        let listener: FavoritesListener = Arc::new(listener);
        let (id, current) = {
            let mut inner = self.lock();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.listeners.push((id, listener.clone()));
            (id, inner.value.clone())
        };

        listener(&current);

        Subscription {
            id,
            channel: Arc::downgrade(&self.inner),
        }
    }

    /// Synchronous read without subscribing
    pub fn current(&self) -> Vec<String> {
        self.lock().value.clone()
    }

    pub fn contains(&self, movie_id: &str) -> bool {
        self.lock().value.iter().any(|id| id == movie_id)
    }

    pub fn subscriber_count(&self) -> usize {
        self.lock().listeners.len()
    }
}

/// Handle keeping a listener registered; dropping it unsubscribes
#[must_use = "dropping a Subscription unsubscribes its listener"]
pub struct Subscription {
    id: u64,
    channel: Weak<Mutex<ChannelInner>>,
}

impl Subscription {
    pub fn unsubscribe(self) {
        // Removal happens in Drop
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        if let Some(channel) = self.channel.upgrade() {
            let mut inner = channel.lock().unwrap_or_else(|e| e.into_inner());
            inner.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl std::fmt::Debug for Subscription {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Subscription").field("id", &self.id).finish()
    }
}
