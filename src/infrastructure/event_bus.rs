use crate::domain::event::Event;
use crate::domain::ports::{ObserverRef, SubscriptionId};
use parking_lot::RwLock;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

/// Synchronous multi-subscriber broadcast.
///
/// The subscriber list is copy-on-write: `publish` clones the current
/// `Arc` snapshot and iterates it without holding any lock, so subscribing
/// concurrently with a publish never races delivery. Observer failures are
/// logged and swallowed; they never reach the publisher or the remaining
/// observers.
#[derive(Default)]
pub struct EventBus {
    subscribers: RwLock<Arc<Vec<(SubscriptionId, ObserverRef)>>>,
    next_id: AtomicU64,
}

impl EventBus {
    /// Creates a bus with no subscribers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `observer`. It receives only events published after this
    /// call returns.
    pub fn subscribe(&self, observer: ObserverRef) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        let mut subscribers = self.subscribers.write();
        let mut next = subscribers.as_ref().clone();
        next.push((id, observer));
        *subscribers = Arc::new(next);
        id
    }

    /// Removes the subscription. A publish already iterating an older
    /// snapshot may still deliver to the removed observer once.
    pub fn unsubscribe(&self, id: SubscriptionId) {
        let mut subscribers = self.subscribers.write();
        let next: Vec<_> = subscribers
            .iter()
            .filter(|(subscription, _)| *subscription != id)
            .cloned()
            .collect();
        *subscribers = Arc::new(next);
    }

    /// Delivers `event` to every current subscriber, in subscription
    /// order, on the calling task.
    pub fn publish(&self, event: &Event) {
        let snapshot = Arc::clone(&*self.subscribers.read());
        for (id, observer) in snapshot.iter() {
            if let Err(err) = observer.on_event(event) {
                tracing::warn!("observer {} failed on event: {err}", id.0);
            }
        }
    }
}
