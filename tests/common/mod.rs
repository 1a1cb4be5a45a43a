use cashdesk::domain::event::Event;
use cashdesk::domain::ports::Observer;
use parking_lot::Mutex;
use std::sync::Arc;
use std::time::Duration;

/// Observer that records every event it sees.
pub struct CollectingObserver {
    events: Mutex<Vec<Event>>,
}

impl CollectingObserver {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            events: Mutex::new(Vec::new()),
        })
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().clone()
    }
}

impl Observer for CollectingObserver {
    fn on_event(&self, event: &Event) -> anyhow::Result<()> {
        self.events.lock().push(event.clone());
        Ok(())
    }
}

/// Counts committed-or-declined events: exactly one is published per
/// processed request.
pub fn terminal_count(events: &[Event]) -> usize {
    events
        .iter()
        .filter(|event| {
            matches!(
                event,
                Event::Deposited { .. }
                    | Event::Withdrew { .. }
                    | Event::Transferred { .. }
                    | Event::Exchanged { .. }
                    | Event::Declined { .. }
            )
        })
        .count()
}

/// Polls until `predicate` holds or `timeout` elapses; returns the final
/// predicate value.
pub async fn wait_until(predicate: impl Fn() -> bool, timeout: Duration) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if predicate() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    predicate()
}
