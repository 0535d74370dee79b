pub mod colors;

pub use colors::{Color, ANSI_RESET};

use netmon_config::ThemeConfig;

/// Chart colours derived from [`ThemeConfig`].
///
/// Calling [`Palette::from_config`] is infallible — invalid color strings fall
/// back to the defaults.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub received: Color,
    pub sent:     Color,
}

impl Palette {
    /// Build a [`Palette`] from the config file's `[theme]` section.
    pub fn from_config(cfg: &ThemeConfig) -> Self {
        Self {
            received: parse_or(&cfg.received_color, Color::CRIMSON, "received_color"),
            sent:     parse_or(&cfg.sent_color, Color::ORANGE, "sent_color"),
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::from_config(&ThemeConfig::default())
    }
}

fn parse_or(hex: &str, fallback: Color, field: &str) -> Color {
    Color::from_hex(hex).unwrap_or_else(|| {
        tracing::warn!("Invalid theme.{field} '{hex}'; using default.");
        fallback
    })
}
