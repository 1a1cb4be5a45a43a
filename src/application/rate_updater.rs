use crate::domain::event::Event;
use crate::domain::rate::drift;
use crate::infrastructure::event_bus::EventBus;
use crate::infrastructure::rate_table::RateTable;
use rand::SeedableRng;
use rand::rngs::StdRng;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::watch;
use tokio::time::{self, MissedTickBehavior};

/// Periodic task that drifts every seeded rate by a bounded random step
/// and publishes each change.
pub struct RateUpdater {
    rates: Arc<RateTable>,
    bus: Arc<EventBus>,
    interval: Duration,
}

impl RateUpdater {
    pub fn new(rates: Arc<RateTable>, bus: Arc<EventBus>, interval: Duration) -> Self {
        Self {
            rates,
            bus,
            interval,
        }
    }

    /// Runs update passes until `stop` flips, finishing a pass already in
    /// progress. The first pass fires one full interval after start, so
    /// freshly seeded rates survive untouched for at least one period.
    pub async fn run(self, mut stop: watch::Receiver<bool>) {
        let mut rng = StdRng::from_entropy();
        let mut ticker = time::interval_at(time::Instant::now() + self.interval, self.interval);
        // Delayed ticks catch up instead of being dropped.
        ticker.set_missed_tick_behavior(MissedTickBehavior::Burst);
        loop {
            tokio::select! {
                _ = ticker.tick() => self.run_pass(&mut rng),
                _ = stop.changed() => break,
            }
        }
        tracing::debug!("rate updater stopped");
    }

    /// One full pass over every seeded pair.
    pub fn run_pass(&self, rng: &mut impl rand::Rng) {
        for pair in self.rates.pairs() {
            let old = self.rates.get(&pair);
            let new = drift(old, rng);
            // drift() floors at a positive minimum, so the write sticks.
            if self.rates.set(pair.clone(), new).is_ok() {
                self.bus.publish(&Event::RateUpdated { pair, old, new });
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::Observer;
    use crate::domain::rate::CurrencyPair;
    use parking_lot::Mutex;
    use rust_decimal_macros::dec;

    struct Recording {
        events: Mutex<Vec<Event>>,
    }

    impl Observer for Recording {
        fn on_event(&self, event: &Event) -> anyhow::Result<()> {
            self.events.lock().push(event.clone());
            Ok(())
        }
    }

    fn seeded_table() -> Arc<RateTable> {
        let rates = Arc::new(RateTable::new());
        rates
            .set(CurrencyPair::new("USD", "EUR"), dec!(0.92))
            .unwrap();
        rates
            .set(CurrencyPair::new("RUB", "USD"), dec!(0.0105))
            .unwrap();
        rates
    }

    #[test]
    fn test_pass_keeps_rates_within_one_percent() {
        let rates = seeded_table();
        let bus = Arc::new(EventBus::new());
        let updater = RateUpdater::new(Arc::clone(&rates), bus, Duration::from_secs(1));

        let mut rng = StdRng::seed_from_u64(42);
        for _ in 0..50 {
            let before: Vec<_> = rates
                .pairs()
                .into_iter()
                .map(|pair| (pair.clone(), rates.get(&pair)))
                .collect();
            updater.run_pass(&mut rng);
            for (pair, old) in before {
                let new = rates.get(&pair);
                assert!(new >= old * dec!(0.99), "{pair} drifted below -1%");
                assert!(new <= old * dec!(1.01), "{pair} drifted above +1%");
                assert!(new > dec!(0));
            }
        }
    }

    #[test]
    fn test_pass_publishes_one_event_per_pair() {
        let rates = seeded_table();
        let bus = Arc::new(EventBus::new());
        let recording = Arc::new(Recording {
            events: Mutex::new(Vec::new()),
        });
        bus.subscribe(recording.clone());

        let updater = RateUpdater::new(rates, bus, Duration::from_secs(1));
        let mut rng = StdRng::seed_from_u64(7);
        updater.run_pass(&mut rng);

        let events = recording.events.lock();
        assert_eq!(events.len(), 2);
        assert!(
            events
                .iter()
                .all(|event| matches!(event, Event::RateUpdated { .. }))
        );
    }

    #[test]
    fn test_pass_on_empty_table_publishes_nothing() {
        let bus = Arc::new(EventBus::new());
        let recording = Arc::new(Recording {
            events: Mutex::new(Vec::new()),
        });
        bus.subscribe(recording.clone());

        let updater = RateUpdater::new(Arc::new(RateTable::new()), bus, Duration::from_secs(1));
        let mut rng = StdRng::seed_from_u64(7);
        updater.run_pass(&mut rng);

        assert!(recording.events.lock().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn test_run_ticks_once_per_interval_and_stops() {
        let rates = seeded_table();
        let bus = Arc::new(EventBus::new());
        let recording = Arc::new(Recording {
            events: Mutex::new(Vec::new()),
        });
        bus.subscribe(recording.clone());

        let updater = RateUpdater::new(rates, bus, Duration::from_millis(100));
        let (stop_tx, stop_rx) = watch::channel(false);
        let handle = tokio::spawn(updater.run(stop_rx));

        // One interval elapses: exactly one pass over the two pairs.
        tokio::time::sleep(Duration::from_millis(150)).await;
        stop_tx.send(true).unwrap();
        handle.await.unwrap();

        assert_eq!(recording.events.lock().len(), 2);
    }
}
