use crate::interfaces::SysfsInterfaces;
use netmon_core::{CounterPair, CounterProvider, InterfaceInfo, MonitorError, RateCounter, Result};
use std::time::Instant;
use sysinfo::Networks;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Sent,
    Received,
}

/// Per-interface byte rate backed by `sysinfo`.
///
/// `received()` / `transmitted()` are deltas since the last refresh; dividing
/// by the time since that refresh gives bytes/second.
pub struct SysinfoCounter {
    networks:  Networks,
    interface: String,
    direction: Direction,
    last:      Instant,
}

impl SysinfoCounter {
    pub fn new(interface: impl Into<String>, direction: Direction) -> Self {
        Self {
            networks:  Networks::new_with_refreshed_list(),
            interface: interface.into(),
            direction,
            last:      Instant::now(),
        }
    }
}

impl RateCounter for SysinfoCounter {
    fn next_value(&mut self) -> f64 {
        self.networks.refresh(false); // false = keep existing interfaces list
        let now = Instant::now();
        let elapsed = now.duration_since(self.last).as_secs_f64();
        self.last = now;

        let Some((_, data)) = self.networks.iter().find(|(name, _)| **name == self.interface) else {
            tracing::debug!("Interface '{}' disappeared; reading 0", self.interface);
            return 0.0;
        };

        let bytes = match self.direction {
            Direction::Sent     => data.transmitted(),
            Direction::Received => data.received(),
        };

        if elapsed <= 0.0 {
            0.0
        } else {
            bytes as f64 / elapsed
        }
    }
}

/// Host counter provider: sysfs for interface metadata, `sysinfo` for rates.
#[derive(Debug, Clone, Default)]
pub struct SystemProvider {
    sysfs: SysfsInterfaces,
}

impl SystemProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sysfs(sysfs: SysfsInterfaces) -> Self {
        Self { sysfs }
    }
}

impl CounterProvider for SystemProvider {
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>> {
        self.sysfs.list()
    }

    fn counter_names(&self) -> Result<Vec<String>> {
        let networks = Networks::new_with_refreshed_list();
        let mut names: Vec<String> = networks.iter().map(|(name, _)| name.clone()).collect();
        names.sort();
        Ok(names)
    }

    fn open_counters(&self, name: &str) -> Result<CounterPair> {
        let networks = Networks::new_with_refreshed_list();
        if !networks.iter().any(|(n, _)| n == name) {
            return Err(MonitorError::System(format!("no counters for interface '{name}'")));
        }

        Ok((
            Box::new(SysinfoCounter::new(name, Direction::Sent)),
            Box::new(SysinfoCounter::new(name, Direction::Received)),
        ))
    }
}
