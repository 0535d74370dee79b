use netmon_core::{MonitorError, MonitorEvent, RenderSink};
use parking_lot::Mutex;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tracing::warn;

/// Handle returned by [`Subscribers::subscribe`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Registered render sinks, notified in subscription order.
#[derive(Default)]
pub struct Subscribers {
    next_id: AtomicU64,
    sinks:   Mutex<Vec<(SubscriptionId, Arc<dyn RenderSink>)>>,
}

impl Subscribers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self, sink: Arc<dyn RenderSink>) -> SubscriptionId {
        let id = SubscriptionId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.sinks.lock().push((id, sink));
        id
    }

    /// Returns `false` if `id` was not subscribed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        let mut sinks = self.sinks.lock();
        let before = sinks.len();
        sinks.retain(|(sid, _)| *sid != id);
        sinks.len() != before
    }

    pub fn len(&self) -> usize {
        self.sinks.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.sinks.lock().is_empty()
    }

    /// Deliver `event` to every sink. A sink that errors or panics is logged
    /// and skipped; the rest still receive the event. Returns the number of
    /// sinks that failed.
    pub fn publish(&self, event: &MonitorEvent) -> usize {
        // Snapshot so sinks may (un)subscribe from inside `notify`.
        let sinks: Vec<Arc<dyn RenderSink>> =
            self.sinks.lock().iter().map(|(_, sink)| Arc::clone(sink)).collect();

        let mut failures = 0;
        for sink in sinks {
            match catch_unwind(AssertUnwindSafe(|| sink.notify(event))) {
                Ok(Ok(())) => {}
                Ok(Err(e)) => {
                    failures += 1;
                    warn!("{}", MonitorError::TickConsumption(e.to_string()));
                }
                Err(_) => {
                    failures += 1;
                    warn!("{}", MonitorError::TickConsumption("render sink panicked".into()));
                }
            }
        }
        failures
    }
}
