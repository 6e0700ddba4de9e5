//! Core Event Bus Implementation
//!
//! A typed publish/subscribe channel:
//! - Subscription lifecycle management (subscribe/unsubscribe)
//! - Optional per-subscriber filters
//! - Delivery statistics
//!
//! Callbacks run outside the bus lock, so a callback may unsubscribe
//! itself, subscribe others, or publish again. A listener removed while a
//! publish is in flight may still receive that one event.

use std::sync::{
    Arc, Mutex, MutexGuard,
    atomic::{AtomicU64, Ordering},
};

/// Unique identifier for event subscriptions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    fn next() -> Self {
        static COUNTER: AtomicU64 = AtomicU64::new(1);
        Self(COUNTER.fetch_add(1, Ordering::Relaxed))
    }
}

/// Statistics for event bus monitoring
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventBusStats {
    pub events_published: usize,
    pub events_delivered: usize,
    pub active_subscriptions: usize,
    pub total_subscriptions: usize,
}

type Callback<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;
type Filter<T> = Arc<dyn Fn(&T) -> bool + Send + Sync>;

struct Listener<T> {
    id: SubscriptionId,
    callback: Callback<T>,
    filter: Option<Filter<T>>,
}

impl<T> Listener<T> {
    fn wants(&self, event: &T) -> bool {
        self.filter.as_ref().is_none_or(|filter| filter(event))
    }
}

/// Listener registry. Holds no lock itself; see [`EventBusContainer`].
pub struct EventBus<T> {
    listeners: Vec<Listener<T>>,
    stats: EventBusStats,
}

impl<T> EventBus<T> {
    pub fn new() -> Self {
        Self {
            listeners: Vec::new(),
            stats: EventBusStats::default(),
        }
    }

    /// Register a listener.
    ///
    /// The callback returns `true` to stay subscribed or `false` to be
    /// removed after this delivery.
    pub fn subscribe<F>(&mut self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.insert(Arc::new(callback), None)
    }

    /// Register a listener that only sees events accepted by `filter`
    pub fn subscribe_with_filter<F, P>(&mut self, callback: F, filter: P) -> SubscriptionId
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.insert(Arc::new(callback), Some(Arc::new(filter)))
    }

    fn insert(&mut self, callback: Callback<T>, filter: Option<Filter<T>>) -> SubscriptionId {
        let id = SubscriptionId::next();
        self.listeners.push(Listener {
            id,
            callback,
            filter,
        });
        self.stats.active_subscriptions = self.listeners.len();
        self.stats.total_subscriptions += 1;

        log::trace!("[EventBus] New subscription: {:?}", id);
        id
    }

    /// Remove a listener. Returns true if it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|listener| listener.id != id);
        self.stats.active_subscriptions = self.listeners.len();

        let removed = self.listeners.len() != before;
        if removed {
            log::trace!("[EventBus] Unsubscribed: {:?}", id);
        } else {
            log::debug!("[EventBus] Subscription not found: {:?}", id);
        }
        removed
    }

    /// Callbacks that want `event`, counted as one publish
    fn begin_publish(&mut self, event: &T) -> Vec<(SubscriptionId, Callback<T>)> {
        self.stats.events_published += 1;
        let targets: Vec<_> = self
            .listeners
            .iter()
            .filter(|listener| listener.wants(event))
            .map(|listener| (listener.id, listener.callback.clone()))
            .collect();
        self.stats.events_delivered += targets.len();
        targets
    }

    /// Deliver `event` to every matching listener
    pub fn publish(&mut self, event: T) {
        let targets = self.begin_publish(&event);
        for (id, callback) in targets {
            if !callback(&event) {
                self.unsubscribe(id);
            }
        }
    }

    pub fn stats(&self) -> EventBusStats {
        self.stats.clone()
    }

    pub fn subscriber_count(&self) -> usize {
        self.listeners.len()
    }

    pub fn clear(&mut self) {
        let count = self.listeners.len();
        self.listeners.clear();
        self.stats.active_subscriptions = 0;
        log::info!("[EventBus] Cleared {} subscriptions", count);
    }
}

impl<T> Default for EventBus<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// Thread-safe, cloneable handle to a shared [`EventBus`]
pub struct EventBusContainer<T> {
    inner: Arc<Mutex<EventBus<T>>>,
}

impl<T> Clone for EventBusContainer<T> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<T> EventBusContainer<T> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(EventBus::new())),
        }
    }

    fn bus(&self) -> MutexGuard<'_, EventBus<T>> {
        // Callbacks never run under this lock, so a poisoned guard still
        // holds a consistent listener list.
        self.inner.lock().unwrap_or_else(|e| e.into_inner())
    }

    pub fn subscribe<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.bus().subscribe(callback)
    }

    pub fn subscribe_with_filter<F, P>(&self, callback: F, filter: P) -> SubscriptionId
    where
        F: Fn(&T) -> bool + Send + Sync + 'static,
        P: Fn(&T) -> bool + Send + Sync + 'static,
    {
        self.bus().subscribe_with_filter(callback, filter)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.bus().unsubscribe(id)
    }

    /// Deliver `event` to every matching listener, outside the lock
    pub fn publish(&self, event: T) {
        let targets = self.bus().begin_publish(&event);
        let count = targets.len();

        let finished: Vec<SubscriptionId> = targets
            .into_iter()
            .filter_map(|(id, callback)| (!callback(&event)).then_some(id))
            .collect();

        if !finished.is_empty() {
            let mut bus = self.bus();
            for id in finished {
                bus.unsubscribe(id);
            }
        }

        log::trace!("[EventBus] Published event to {} subscribers", count);
    }

    pub fn stats(&self) -> EventBusStats {
        self.bus().stats()
    }

    pub fn subscriber_count(&self) -> usize {
        self.bus().subscriber_count()
    }

    pub fn clear(&self) {
        self.bus().clear();
    }
}

impl<T> Default for EventBusContainer<T> {
    fn default() -> Self {
        Self::new()
    }
}
