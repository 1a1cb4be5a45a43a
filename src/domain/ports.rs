use super::event::Event;
use std::sync::Arc;

/// Receives every event published on the bus.
///
/// Called synchronously on whichever task publishes, so implementations
/// should return quickly. Errors are logged by the bus and never reach the
/// publisher.
pub trait Observer: Send + Sync {
    fn on_event(&self, event: &Event) -> anyhow::Result<()>;
}

/// Shared handle under which an observer is subscribed.
pub type ObserverRef = Arc<dyn Observer>;

/// Identifies one subscription, for later removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(pub(crate) u64);
