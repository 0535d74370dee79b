/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const CRIMSON: Self = Self { r: 0x9d, g: 0x0a, b: 0x0a, a: 0xff }; // #9D0A0A
    pub const ORANGE:  Self = Self { r: 0xfc, g: 0x84, b: 0x03, a: 0xff }; // #fc8403

    /// Parse a CSS-style hex color string (`#RRGGBB` or `#RRGGBBAA`).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }

        let byte = |s: &str| -> Option<u8> { u8::from_str_radix(s, 16).ok() };

        match hex.len() {
            6 => Some(Self {
                r: byte(&hex[0..2])?,
                g: byte(&hex[2..4])?,
                b: byte(&hex[4..6])?,
                a: 0xff,
            }),
            8 => Some(Self {
                r: byte(&hex[0..2])?,
                g: byte(&hex[2..4])?,
                b: byte(&hex[4..6])?,
                a: byte(&hex[6..8])?,
            }),
            _ => None,
        }
    }

    /// 24-bit ANSI escape that sets this colour as the terminal foreground.
    /// Alpha is ignored.
    #[must_use]
    pub fn ansi_fg(self) -> String {
        format!("\x1b[38;2;{};{};{}m", self.r, self.g, self.b)
    }
}

/// ANSI escape that restores the default terminal colours.
pub const ANSI_RESET: &str = "\x1b[0m";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_rgb_and_rgba() {
        assert_eq!(Color::from_hex("#9D0A0A"), Some(Color::CRIMSON));
        assert_eq!(Color::from_hex("fc8403"), Some(Color::ORANGE));
        assert_eq!(
            Color::from_hex("#10203040"),
            Some(Color { r: 0x10, g: 0x20, b: 0x30, a: 0x40 })
        );
    }

    #[test]
    fn rejects_bad_hex() {
        assert_eq!(Color::from_hex("#12345"), None);
        assert_eq!(Color::from_hex("#gg0000"), None);
        assert_eq!(Color::from_hex("#ééé"), None);
    }

    #[test]
    fn ansi_escape_uses_rgb_channels() {
        assert_eq!(Color::ORANGE.ansi_fg(), "\x1b[38;2;252;132;3m");
    }
}
