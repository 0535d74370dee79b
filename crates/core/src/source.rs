use crate::error::Result;

/// Operational status of a network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OperStatus {
    Up,
    Down,
    Dormant,
    LowerLayerDown,
    NotPresent,
    Testing,
    Unknown,
}

/// Link type of a network interface.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InterfaceKind {
    Ethernet,
    Wireless80211,
    Ppp,
    Wwanpp,
    Wwanpp2,
    Tunnel,
    Loopback,
    Other,
}

impl InterfaceKind {
    /// Link types that carry user traffic worth charting.
    pub const MONITORABLE: [Self; 6] = [
        Self::Ethernet,
        Self::Wireless80211,
        Self::Ppp,
        Self::Wwanpp,
        Self::Wwanpp2,
        Self::Tunnel,
    ];

    #[must_use]
    pub fn is_monitorable(self) -> bool {
        Self::MONITORABLE.contains(&self)
    }
}

/// One entry of the host's interface list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InterfaceInfo {
    /// Kernel name, e.g. `"wlp3s0"`.
    pub name: String,
    /// Human-readable description matched against counter-source names.
    pub description: String,
    pub status: OperStatus,
    pub kind: InterfaceKind,
}

/// A live throughput counter. Each read returns the current rate in bytes/second.
pub trait RateCounter: Send {
    fn next_value(&mut self) -> f64;
}

/// `(sent, received)` counter handles bound to a single source.
pub type CounterPair = (Box<dyn RateCounter>, Box<dyn RateCounter>);

/// Enumerates interfaces and counter sources, and opens counters on demand.
///
/// Every method may block on system enumeration; callers run them off any
/// latency-sensitive thread.
pub trait CounterProvider: Send + Sync {
    /// All interfaces known to the host, in enumeration order.
    fn interfaces(&self) -> Result<Vec<InterfaceInfo>>;

    /// Names of every source a counter pair can be opened on.
    fn counter_names(&self) -> Result<Vec<String>>;

    /// Open the sent / received counters for `name`.
    fn open_counters(&self, name: &str) -> Result<CounterPair>;
}
