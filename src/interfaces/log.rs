use crate::domain::event::Event;
use crate::domain::ports::Observer;

/// Observer that forwards every event's text rendering to the tracing
/// subscriber at info level.
pub struct LogObserver;

impl Observer for LogObserver {
    fn on_event(&self, event: &Event) -> anyhow::Result<()> {
        tracing::info!("{event}");
        Ok(())
    }
}
