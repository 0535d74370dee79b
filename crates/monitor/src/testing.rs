//! In-memory counter provider for resolver and session tests.

use netmon_core::{
    CounterPair, CounterProvider, InterfaceInfo, InterfaceKind, OperStatus, RateCounter, Result,
};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

pub fn iface(description: &str, status: OperStatus, kind: InterfaceKind) -> InterfaceInfo {
    InterfaceInfo {
        name: description.to_lowercase(),
        description: description.to_string(),
        status,
        kind,
    }
}

pub struct FakeProvider {
    interfaces: Vec<InterfaceInfo>,
    names: Vec<String>,
    sent_rate: f64,
    received_rate: f64,
    enumerate_delay: Duration,
    /// Number of successful `open_counters` calls.
    pub opened: Arc<AtomicUsize>,
    /// Counters currently alive (opened and not yet dropped).
    pub live: Arc<AtomicUsize>,
}

impl FakeProvider {
    pub fn new(interfaces: Vec<InterfaceInfo>, names: &[&str]) -> Self {
        Self {
            interfaces,
            names: names.iter().map(|n| n.to_string()).collect(),
            sent_rate: 0.0,
            received_rate: 0.0,
            enumerate_delay: Duration::ZERO,
            opened: Arc::new(AtomicUsize::new(0)),
            live: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Constant rates in bytes/second.
    pub fn with_rates(mut self, sent: f64, received: f64) -> Self {
        self.sent_rate = sent;
        self.received_rate = received;
        self
    }

    /// Make every enumeration call block for `delay`.
    pub fn with_enumerate_delay(mut self, delay: Duration) -> Self {
        self.enumerate_delay = delay;
        self
    }

    fn counter(&self, rate: f64) -> Box<dyn RateCounter> {
        self.live.fetch_add(1, Ordering::SeqCst);
        Box::new(FakeCounter { rate, live: Arc::clone(&self.live) })
    }
}

impl CounterProvider for FakeProvider {
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        std::thread::sleep(self.enumerate_delay);
        Ok(self.interfaces.clone())
    }

    fn counter_names(&self) -> Result<Vec<String>> {
        std::thread::sleep(self.enumerate_delay);
        Ok(self.names.clone())
    }

    fn open_counters(&self, _name: &str) -> Result<CounterPair> {
        self.opened.fetch_add(1, Ordering::SeqCst);
        Ok((self.counter(self.sent_rate), self.counter(self.received_rate)))
    }
}

struct FakeCounter {
    rate: f64,
    live: Arc<AtomicUsize>,
}

impl RateCounter for FakeCounter {
    fn next_value(&mut self) -> f64 {
        self.rate
    }
}

impl Drop for FakeCounter {
    fn drop(&mut self) {
        self.live.fetch_sub(1, Ordering::SeqCst);
    }
}
