use netmon_core::{MonitorError, Result};
use serde::{Deserialize, Serialize};

/// Root configuration structure parsed from `netmon.toml`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct NetmonConfig {
    /// Sampling and adaptor settings.
    pub monitor: MonitorConfig,
    /// Chart colors.
    pub theme: ThemeConfig,
}

impl NetmonConfig {
    /// Reject values the session cannot run with.
    pub fn validate(&self) -> Result<()> {
        self.monitor.validate()
    }
}

/// Sampling settings, read once when a session is constructed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MonitorConfig {
    /// Maximum number of samples kept in the scrolling window.
    pub time_line: usize,
    /// Sampling cadence in milliseconds.
    pub interval_ms: u64,
    /// Which counter source to bind.
    pub adaptor: AdaptorSelector,
}

impl Default for MonitorConfig {
    fn default() -> Self {
        Self {
            time_line:   200,
            interval_ms: 1_000,
            adaptor:     AdaptorSelector::AutoDetect,
        }
    }
}

impl MonitorConfig {
    pub fn validate(&self) -> Result<()> {
        if self.time_line == 0 {
            return Err(MonitorError::Config("monitor.time_line must be at least 1".into()));
        }
        if self.interval_ms == 0 {
            return Err(MonitorError::Config("monitor.interval_ms must be at least 1".into()));
        }
        Ok(())
    }
}

/// How the session picks its counter source.
///
/// In TOML: `adaptor = "auto_detect"` or `adaptor = { explicit_index = 2 }`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum AdaptorSelector {
    /// Bind the n-th counter source as enumerated, without filtering.
    ExplicitIndex(usize),
    /// Bind the first up interface of a monitorable type, matched by name.
    #[default]
    AutoDetect,
}

/// Chart colors as hex strings; parsed by `netmon-theme`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeConfig {
    /// Received band color.
    pub received_color: String,
    /// Sent band color.
    pub sent_color: String,
}

impl Default for ThemeConfig {
    fn default() -> Self {
        Self {
            received_color: "#9D0A0A".to_string(),
            sent_color:     "#fc8403".to_string(),
        }
    }
}
