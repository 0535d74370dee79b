/// Bytes per megabit, as used by the display (binary mega).
const BYTES_PER_MEGABIT: f64 = 1_048_576.0 / 8.0;

/// Convert a raw `bytes/second` reading into megabits/second.
///
/// Negative and non-finite readings are treated as zero.
#[must_use]
pub fn bytes_to_mbps(bytes_per_sec: f64) -> f64 {
    if !bytes_per_sec.is_finite() {
        return 0.0;
    }
    bytes_per_sec.max(0.0) / BYTES_PER_MEGABIT
}

/// One tick's unstamped throughput reading, in megabits/second.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Throughput {
    pub sent_mbps: f64,
    pub received_mbps: f64,
}

impl Throughput {
    #[must_use]
    pub fn new(sent_mbps: f64, received_mbps: f64) -> Self {
        Self {
            sent_mbps: sent_mbps.max(0.0),
            received_mbps: received_mbps.max(0.0),
        }
    }

    /// Build from raw counter values in bytes/second.
    #[must_use]
    pub fn from_bytes_per_sec(sent: f64, received: f64) -> Self {
        Self {
            sent_mbps: bytes_to_mbps(sent),
            received_mbps: bytes_to_mbps(received),
        }
    }

    /// Height of the stacked chart at this reading.
    #[must_use]
    pub fn combined(&self) -> f64 {
        self.sent_mbps + self.received_mbps
    }
}

/// A reading stamped with its position in the time series.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Sample {
    pub time_index: u64,
    pub sent_mbps: f64,
    pub received_mbps: f64,
}

impl Sample {
    #[must_use]
    pub fn new(time_index: u64, reading: Throughput) -> Self {
        Self {
            time_index,
            sent_mbps: reading.sent_mbps,
            received_mbps: reading.received_mbps,
        }
    }

    #[must_use]
    pub fn combined(&self) -> f64 {
        self.sent_mbps + self.received_mbps
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    pub x: u64,
    pub y: f64,
}

/// A filled band between `lower` and `upper`. Both edges always have equal length.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct StackedSeries {
    pub lower: Vec<SeriesPoint>,
    pub upper: Vec<SeriesPoint>,
}

impl StackedSeries {
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            lower: Vec::with_capacity(capacity),
            upper: Vec::with_capacity(capacity),
        }
    }

    pub fn push(&mut self, x: u64, lower: f64, upper: f64) {
        self.lower.push(SeriesPoint { x, y: lower });
        self.upper.push(SeriesPoint { x, y: upper });
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.upper.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.upper.is_empty()
    }
}

/// Everything a renderer needs to redraw the chart after a tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DisplayState {
    /// Selected scale tier, e.g. `"100.0 Mbps"`.
    pub scale_label: String,
    /// Axis ceiling in Mbps.
    pub scale_mbps: f64,
    /// Latest received rate, e.g. `"R: 12.3"`.
    pub received_label: String,
    /// Latest sent rate, e.g. `"S: 1.2 Mbps"`.
    pub sent_label: String,
    /// Band from the sent rate up to sent + received.
    pub received: StackedSeries,
    /// Band from zero up to the sent rate.
    pub sent: StackedSeries,
}

impl DisplayState {
    /// State shown before the first tick, with the axis at `scale_mbps`.
    #[must_use]
    pub fn idle(scale_mbps: f64) -> Self {
        Self {
            scale_label: "0 Mbps".to_string(),
            scale_mbps,
            received_label: "R: 0.0".to_string(),
            sent_label: "S: 0.0 Mbps".to_string(),
            received: StackedSeries::default(),
            sent: StackedSeries::default(),
        }
    }
}

/// Lifecycle of a monitor session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SessionState {
    #[default]
    Idle,
    Resolving,
    Active,
    Stopped,
    Failed,
}

impl std::fmt::Display for SessionState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Self::Idle      => "idle",
            Self::Resolving => "resolving",
            Self::Active    => "active",
            Self::Stopped   => "stopped",
            Self::Failed    => "failed",
        };
        f.write_str(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn converts_bytes_to_megabits() {
        assert_eq!(bytes_to_mbps(1_048_576.0 / 8.0), 1.0);
        assert_eq!(bytes_to_mbps(1_048_576.0), 8.0);
    }

    #[test]
    fn clamps_invalid_readings() {
        assert_eq!(bytes_to_mbps(-42.0), 0.0);
        assert_eq!(bytes_to_mbps(f64::NAN), 0.0);
        assert_eq!(bytes_to_mbps(f64::INFINITY), 0.0);
    }

    #[test]
    fn stacked_series_edges_stay_paired() {
        let mut series = StackedSeries::default();
        series.push(0, 1.0, 3.0);
        series.push(1, 2.0, 5.0);
        assert_eq!(series.lower.len(), series.upper.len());
        assert_eq!(series.len(), 2);
        assert_eq!(series.upper[1], SeriesPoint { x: 1, y: 5.0 });
    }
}
