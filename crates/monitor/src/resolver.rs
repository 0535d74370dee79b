//! Picks the counter source a session samples and opens its counters.

use netmon_config::AdaptorSelector;
use netmon_core::{CounterProvider, MonitorError, RateCounter, Result, Throughput};
use tokio_util::sync::CancellationToken;
use tracing::{debug, info};

/// Resolved sent / received counters for one source.
///
/// Dropping the binding releases both handles.
pub struct AdaptorBinding {
    name:     String,
    sent:     Box<dyn RateCounter>,
    received: Box<dyn RateCounter>,
}

impl AdaptorBinding {
    /// Counter-source name the handles were opened on.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Read both counters and convert to Mbps.
    pub fn read(&mut self) -> Throughput {
        let sent = self.sent.next_value();
        let received = self.received.next_value();
        Throughput::from_bytes_per_sec(sent, received)
    }
}

impl std::fmt::Debug for AdaptorBinding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AdaptorBinding").field("name", &self.name).finish_non_exhaustive()
    }
}

/// Keep ASCII letters, digits, spaces and underscores; drop everything else.
pub fn normalize_adaptor_name(raw: &str) -> String {
    raw.chars()
        .filter(|c| c.is_ascii_alphanumeric() || *c == ' ' || *c == '_')
        .collect()
}

/// Resolve `selector` against `provider`.
///
/// Blocking; run it on the blocking pool. `cancel` is checked around every
/// enumeration step, and a cancelled resolution never returns a binding.
pub fn resolve(
    provider: &dyn CounterProvider,
    selector: AdaptorSelector,
    cancel: &CancellationToken,
) -> Result<AdaptorBinding> {
    checkpoint(cancel)?;

    let name = match selector {
        AdaptorSelector::ExplicitIndex(index) => by_index(provider, index, cancel)?,
        AdaptorSelector::AutoDetect           => auto_detect(provider, cancel)?,
    };

    let (sent, received) = provider.open_counters(&name)?;
    let binding = AdaptorBinding { name, sent, received };

    // Dropping `binding` here releases the freshly opened handles.
    checkpoint(cancel)?;

    info!("Bound adaptor '{}'", binding.name);
    Ok(binding)
}

fn by_index(provider: &dyn CounterProvider, index: usize, cancel: &CancellationToken) -> Result<String> {
    let names = provider.counter_names()?;
    checkpoint(cancel)?;

    names.into_iter().nth(index).ok_or_else(|| {
        MonitorError::AdaptorNotFound(format!("no counter source at index {index}"))
    })
}

fn auto_detect(provider: &dyn CounterProvider, cancel: &CancellationToken) -> Result<String> {
    let interfaces = provider.interfaces()?;
    checkpoint(cancel)?;

    let candidate = interfaces
        .iter()
        .find(|iface| iface.status == netmon_core::OperStatus::Up && iface.kind.is_monitorable())
        .ok_or_else(|| MonitorError::AdaptorNotFound("no active network interface".into()))?;
    debug!("Auto-detect candidate: {} ({:?})", candidate.name, candidate.kind);

    let wanted = normalize_adaptor_name(&candidate.description);
    let names = provider.counter_names()?;
    checkpoint(cancel)?;

    names
        .into_iter()
        .find(|name| normalize_adaptor_name(name) == wanted)
        .ok_or_else(|| {
            MonitorError::AdaptorNotFound(format!(
                "no counter source matches interface '{}'",
                candidate.description
            ))
        })
}

fn checkpoint(cancel: &CancellationToken) -> Result<()> {
    if cancel.is_cancelled() {
        return Err(MonitorError::CancelledDuringResolution);
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::{iface, FakeProvider};
    use netmon_core::{InterfaceKind, OperStatus};
    use std::sync::atomic::Ordering;

    #[test]
    fn normalization_strips_punctuation() {
        assert_eq!(normalize_adaptor_name("Intel(R) Wi-Fi_6"), "IntelR WiFi_6");
        assert_eq!(normalize_adaptor_name("Realtek PCIe GbE #2"), "Realtek PCIe GbE 2");
    }

    #[test]
    fn normalization_is_idempotent() {
        for raw in ["Intel(R) Wi-Fi_6 AX201 160MHz", "eth0", "été-[x]", ""] {
            let once = normalize_adaptor_name(raw);
            assert_eq!(normalize_adaptor_name(&once), once);
        }
    }

    #[test]
    fn index_binds_without_filtering() {
        let provider = FakeProvider::new(vec![], &["lo", "eth0", "wlan0"]);
        let binding = resolve(&provider, AdaptorSelector::ExplicitIndex(1), &CancellationToken::new()).unwrap();
        assert_eq!(binding.name(), "eth0");
        assert_eq!(provider.opened.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn index_out_of_bounds_is_not_found() {
        let provider = FakeProvider::new(vec![], &["eth0"]);
        let err = resolve(&provider, AdaptorSelector::ExplicitIndex(3), &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, MonitorError::AdaptorNotFound(_)));
    }

    #[test]
    fn auto_detect_picks_first_up_monitorable_interface() {
        let provider = FakeProvider::new(
            vec![
                iface("Loopback Pseudo-Interface 1", OperStatus::Up, InterfaceKind::Loopback),
                iface("Realtek PCIe GbE", OperStatus::Down, InterfaceKind::Ethernet),
                iface("Intel(R) Wi-Fi 6 AX201", OperStatus::Up, InterfaceKind::Wireless80211),
                iface("Cellular Modem", OperStatus::Up, InterfaceKind::Wwanpp),
            ],
            &["Realtek PCIe GbE", "Intel[R] Wi-Fi 6 AX201", "Cellular Modem"],
        );

        let binding = resolve(&provider, AdaptorSelector::AutoDetect, &CancellationToken::new()).unwrap();
        assert_eq!(binding.name(), "Intel[R] Wi-Fi 6 AX201");
    }

    #[test]
    fn auto_detect_without_up_interface_is_not_found() {
        let provider = FakeProvider::new(
            vec![
                iface("Realtek PCIe GbE", OperStatus::Down, InterfaceKind::Ethernet),
                iface("lo", OperStatus::Up, InterfaceKind::Loopback),
            ],
            &["Realtek PCIe GbE", "lo"],
        );
        let err = resolve(&provider, AdaptorSelector::AutoDetect, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, MonitorError::AdaptorNotFound(_)));
        assert_eq!(provider.opened.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn auto_detect_without_name_match_is_not_found() {
        let provider = FakeProvider::new(
            vec![iface("eth0", OperStatus::Up, InterfaceKind::Ethernet)],
            &["eth1"],
        );
        let err = resolve(&provider, AdaptorSelector::AutoDetect, &CancellationToken::new()).unwrap_err();
        assert!(matches!(err, MonitorError::AdaptorNotFound(_)));
    }

    #[test]
    fn cancelled_resolution_opens_nothing() {
        let provider = FakeProvider::new(vec![], &["eth0"]);
        let cancel = CancellationToken::new();
        cancel.cancel();

        let err = resolve(&provider, AdaptorSelector::ExplicitIndex(0), &cancel).unwrap_err();
        assert!(matches!(err, MonitorError::CancelledDuringResolution));
        assert!(!err.is_reportable());
        assert_eq!(provider.opened.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn binding_reads_in_mbps() {
        let provider = FakeProvider::new(vec![], &["eth0"]).with_rates(131_072.0, 262_144.0);
        let mut binding = resolve(&provider, AdaptorSelector::ExplicitIndex(0), &CancellationToken::new()).unwrap();
        let reading = binding.read();
        assert_eq!(reading.sent_mbps, 1.0);
        assert_eq!(reading.received_mbps, 2.0);
    }
}
