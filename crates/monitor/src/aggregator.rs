//! Sliding-window series behind the throughput chart.

use netmon_core::{DisplayState, Sample, StackedSeries, Throughput};
use std::collections::VecDeque;

/// Axis ceilings (Mbps) the chart snaps to, ascending.
pub const SCALE_TIERS: [f64; 6] = [10.0, 50.0, 100.0, 250.0, 500.0, 1000.0];

/// Smallest tier strictly above `peak`, saturating at the largest tier.
#[must_use]
pub fn select_tier(peak: f64) -> f64 {
    SCALE_TIERS
        .iter()
        .copied()
        .find(|tier| peak < *tier)
        .unwrap_or(SCALE_TIERS[SCALE_TIERS.len() - 1])
}

/// Bounded FIFO of samples plus the display state derived from it.
///
/// Only the sampling job mutates it, so it carries no locking of its own.
#[derive(Debug, Clone)]
pub struct SeriesAggregator {
    window:     VecDeque<Sample>,
    capacity:   usize,
    next_index: u64,
    last:       DisplayState,
}

impl SeriesAggregator {
    /// Create an aggregator keeping at most `time_line` samples (minimum 1).
    pub fn new(time_line: usize) -> Self {
        let capacity = time_line.max(1);
        Self {
            window:     VecDeque::with_capacity(capacity + 1),
            capacity,
            next_index: 0,
            last:       DisplayState::idle(SCALE_TIERS[0]),
        }
    }

    /// Append one reading, rescale, evict the oldest sample if over capacity,
    /// and return the state the renderer should draw.
    pub fn tick(&mut self, reading: Throughput) -> DisplayState {
        let sample = Sample::new(self.next_index, reading);
        self.next_index += 1;
        self.window.push_back(sample);

        let tier = select_tier(self.peak());

        if self.window.len() > self.capacity {
            self.window.pop_front();
        }

        let (received, sent) = self.series();
        self.last = DisplayState {
            scale_label: format!("{tier:.1} Mbps"),
            scale_mbps: tier,
            received_label: format!("R: {:.1}", sample.received_mbps),
            sent_label: format!("S: {:.1} Mbps", sample.sent_mbps),
            received,
            sent,
        };
        self.last.clone()
    }

    /// Highest combined (sent + received) value currently in the window.
    #[must_use]
    pub fn peak(&self) -> f64 {
        self.window.iter().map(Sample::combined).fold(0.0, f64::max)
    }

    /// `(received, sent)` stacked bands over the current window.
    fn series(&self) -> (StackedSeries, StackedSeries) {
        let mut received = StackedSeries::with_capacity(self.window.len());
        let mut sent = StackedSeries::with_capacity(self.window.len());
        for s in &self.window {
            sent.push(s.time_index, 0.0, s.sent_mbps);
            received.push(s.time_index, s.sent_mbps, s.combined());
        }
        (received, sent)
    }

    /// Samples in arrival order, oldest first.
    pub fn samples(&self) -> impl Iterator<Item = &Sample> {
        self.window.iter()
    }

    /// The state returned by the most recent tick.
    #[must_use]
    pub fn snapshot(&self) -> &DisplayState {
        &self.last
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.window.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.window.is_empty()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.capacity
    }
}
