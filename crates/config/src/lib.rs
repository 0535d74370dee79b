pub mod schema;

pub use schema::{AdaptorSelector, MonitorConfig, NetmonConfig, ThemeConfig};

use netmon_core::{MonitorError, Result};
use std::path::{Path, PathBuf};

/// Load configuration from a TOML file.  Returns `NetmonConfig::default()` if
/// the file doesn't exist so the monitor always has sensible defaults.
pub fn load(path: impl AsRef<Path>) -> Result<NetmonConfig> {
    let path = path.as_ref();
    if !path.exists() {
        tracing::warn!(
            "Config file not found at '{}'; using defaults.",
            path.display()
        );
        return Ok(NetmonConfig::default());
    }

    let raw = std::fs::read_to_string(path)
        .map_err(|e| MonitorError::Config(format!("cannot read '{}': {e}", path.display())))?;

    let config: NetmonConfig =
        toml::from_str(&raw).map_err(|e| MonitorError::Config(format!("TOML parse error: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Like [`load`], but writes the defaults to `path` when no file exists yet so
/// there is something on disk for the user to edit.
pub fn load_or_init(path: impl AsRef<Path>) -> Result<NetmonConfig> {
    let path = path.as_ref();
    if path.exists() {
        return load(path);
    }

    let config = NetmonConfig::default();
    save(path, &config)?;
    tracing::info!("Wrote default config to '{}'", path.display());
    Ok(config)
}

/// Serialize `config` to `path`, creating parent directories as needed.
pub fn save(path: impl AsRef<Path>, config: &NetmonConfig) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let raw = toml::to_string_pretty(config)
        .map_err(|e| MonitorError::Config(format!("TOML serialize error: {e}")))?;
    std::fs::write(path, raw)?;
    Ok(())
}

/// Return the default config path, honouring `$XDG_CONFIG_HOME`.
pub fn default_path() -> PathBuf {
    let base = std::env::var("XDG_CONFIG_HOME")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            let home = std::env::var("HOME").unwrap_or_else(|_| ".".to_string());
            PathBuf::from(home).join(".config")
        });
    base.join("netmon").join("netmon.toml")
}
