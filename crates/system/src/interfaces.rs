use netmon_core::{InterfaceInfo, InterfaceKind, OperStatus, Result};
use std::path::{Path, PathBuf};

/// Default location of the kernel's per-interface attributes.
pub const SYSFS_NET: &str = "/sys/class/net";

// ARPHRD_* link types from <linux/if_arp.h>.
const ARPHRD_ETHER: u32 = 1;
const ARPHRD_PPP: u32 = 512;
const ARPHRD_TUNNEL: u32 = 768;
const ARPHRD_TUNNEL6: u32 = 769;
const ARPHRD_SIT: u32 = 776;
const ARPHRD_IPGRE: u32 = 778;
const ARPHRD_LOOPBACK: u32 = 772;
const ARPHRD_NONE: u32 = 65534;

/// Enumerate network interfaces from the Linux sysfs tree.
#[derive(Debug, Clone)]
pub struct SysfsInterfaces {
    root: PathBuf,
}

impl Default for SysfsInterfaces {
    fn default() -> Self {
        Self::with_root(SYSFS_NET)
    }
}

impl SysfsInterfaces {
    /// Read interfaces from `root` instead of `/sys/class/net`.
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    /// All interfaces under the root, sorted by name. A missing root (non-Linux
    /// hosts, minimal containers) yields an empty list.
    pub fn list(&self) -> Result<Vec<InterfaceInfo>> {
        if !self.root.exists() {
            tracing::debug!("'{}' not present; no interfaces", self.root.display());
            return Ok(Vec::new());
        }

        let mut names: Vec<String> = std::fs::read_dir(&self.root)?
            .filter_map(|entry| entry.ok())
            .map(|entry| entry.file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();

        Ok(names.into_iter().map(|name| self.read_interface(name)).collect())
    }

    fn read_interface(&self, name: String) -> InterfaceInfo {
        let base = self.root.join(&name);

        // Counter sources are keyed by kernel name, so that is the description.
        let description = name.clone();
        let status = read_attr(&base, "operstate")
            .map(|s| parse_operstate(&s))
            .unwrap_or(OperStatus::Unknown);
        let arphrd = read_attr(&base, "type").and_then(|s| s.parse::<u32>().ok());
        let kind = classify(&name, arphrd, base.join("wireless").exists());

        InterfaceInfo { name, description, status, kind }
    }
}

fn read_attr(base: &Path, attr: &str) -> Option<String> {
    std::fs::read_to_string(base.join(attr))
        .ok()
        .map(|s| s.trim().to_string())
}

fn parse_operstate(raw: &str) -> OperStatus {
    match raw {
        "up"             => OperStatus::Up,
        "down"           => OperStatus::Down,
        "dormant"        => OperStatus::Dormant,
        "lowerlayerdown" => OperStatus::LowerLayerDown,
        "notpresent"     => OperStatus::NotPresent,
        "testing"        => OperStatus::Testing,
        _                => OperStatus::Unknown,
    }
}

fn classify(name: &str, arphrd: Option<u32>, wireless: bool) -> InterfaceKind {
    if wireless {
        return InterfaceKind::Wireless80211;
    }
    match arphrd {
        Some(ARPHRD_LOOPBACK) => InterfaceKind::Loopback,
        Some(ARPHRD_PPP) => InterfaceKind::Ppp,
        Some(ARPHRD_TUNNEL | ARPHRD_TUNNEL6 | ARPHRD_SIT | ARPHRD_IPGRE) => InterfaceKind::Tunnel,
        // Raw-IP links: mobile broadband modems and tun devices.
        Some(ARPHRD_NONE) if name.starts_with("wwan") => InterfaceKind::Wwanpp,
        Some(ARPHRD_NONE) if name.starts_with("tun") || name.starts_with("wg") => InterfaceKind::Tunnel,
        Some(ARPHRD_ETHER) if name.starts_with("wwan") => InterfaceKind::Wwanpp2,
        Some(ARPHRD_ETHER) => InterfaceKind::Ethernet,
        _ => InterfaceKind::Other,
    }
}
