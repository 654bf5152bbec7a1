//! Color resolution.
//!
//! Detected colors arrive as loosely formatted strings. They are resolved to
//! a 6-digit RGB value; anything unparseable becomes black instead of an
//! error, because a styling defect must never abort element placement.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::LazyLock;

use crate::config::ColorSnap;

/// `#abc`, `abc`, `#aabbcc` or `aabbcc`.
static HEX_COLOR_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^#?([0-9a-fA-F]{3}|[0-9a-fA-F]{6})$").unwrap());

/// `rgb(1, 2, 3)` or `rgba(1, 2, 3, 0.5)`; alpha is ignored.
static RGB_FUNCTION_REGEX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^rgba?\(\s*(\d{1,3})\s*,\s*(\d{1,3})\s*,\s*(\d{1,3})\s*(?:,\s*[\d.]+%?\s*)?\)$")
        .unwrap()
});

/// A normalized 24-bit RGB color. Displays as uppercase `RRGGBB`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct HexColor([u8; 3]);

impl HexColor {
    pub const BLACK: HexColor = HexColor([0x00, 0x00, 0x00]);
    pub const WHITE: HexColor = HexColor([0xFF, 0xFF, 0xFF]);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self([r, g, b])
    }

    pub fn channels(&self) -> [u8; 3] {
        self.0
    }

    /// Parse a color, returning `None` for malformed input.
    pub fn parse(input: &str) -> Option<Self> {
        let input = input.trim();

        if let Some(caps) = HEX_COLOR_REGEX.captures(input) {
            let digits = caps.get(1)?.as_str();
            let expanded: String = if digits.len() == 3 {
                digits.chars().flat_map(|c| [c, c]).collect()
            } else {
                digits.to_string()
            };
            let value = u32::from_str_radix(&expanded, 16).ok()?;
            return Some(Self([
                (value >> 16) as u8,
                (value >> 8) as u8,
                value as u8,
            ]));
        }

        if let Some(caps) = RGB_FUNCTION_REGEX.captures(input) {
            let channel = |i: usize| -> Option<u8> { caps.get(i)?.as_str().parse::<u8>().ok() };
            return Some(Self([channel(1)?, channel(2)?, channel(3)?]));
        }

        None
    }

    /// Snap near-white to white and near-black to black when enabled.
    pub fn snapped(self, snap: &ColorSnap) -> Self {
        if !snap.enabled {
            return self;
        }
        if self.0.iter().all(|&c| c >= snap.white_threshold) {
            Self::WHITE
        } else if self.0.iter().all(|&c| c <= snap.black_threshold) {
            Self::BLACK
        } else {
            self
        }
    }
}

impl fmt::Display for HexColor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let [r, g, b] = self.0;
        write!(f, "{:02X}{:02X}{:02X}", r, g, b)
    }
}

impl From<String> for HexColor {
    fn from(s: String) -> Self {
        resolve_color(&s)
    }
}

impl From<HexColor> for String {
    fn from(c: HexColor) -> Self {
        c.to_string()
    }
}

/// Resolve a color string, falling back to black when it cannot be parsed.
pub fn resolve_color(input: &str) -> HexColor {
    match HexColor::parse(input) {
        Some(color) => color,
        None => {
            log::debug!("Malformed color {:?}, using black", input);
            HexColor::BLACK
        }
    }
}

/// Resolve an optional color, using `default` when it is absent.
pub fn resolve_color_or(input: Option<&str>, default: HexColor) -> HexColor {
    match input {
        Some(s) => resolve_color(s),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_six_digit_hex() {
        assert_eq!(resolve_color("#1A2B3C").to_string(), "1A2B3C");
        assert_eq!(resolve_color("1a2b3c").to_string(), "1A2B3C");
    }

    #[test]
    fn test_shorthand_expands() {
        assert_eq!(resolve_color("abc"), resolve_color("aabbcc"));
        assert_eq!(resolve_color("#FFF").to_string(), "FFFFFF");
        assert_eq!(resolve_color("#f00"), HexColor::rgb(0xFF, 0, 0));
    }

    #[test]
    fn test_resolution_is_idempotent() {
        for input in ["#123456", "abc", "rgb(10, 20, 30)", "garbage"] {
            let once = resolve_color(input);
            let twice = resolve_color(&once.to_string());
            assert_eq!(once, twice);
        }
    }

    #[test]
    fn test_malformed_input_is_black() {
        for input in ["", "#", "#12", "#12345", "#1234567", "zzzzzz", "red", "#ggg"] {
            assert_eq!(resolve_color(input).to_string(), "000000", "input {:?}", input);
        }
    }

    #[test]
    fn test_rgb_function() {
        assert_eq!(resolve_color("rgb(255, 128, 0)").to_string(), "FF8000");
        assert_eq!(resolve_color("RGBA(1,2,3,0.5)").to_string(), "010203");
        assert_eq!(resolve_color("rgb(300, 0, 0)"), HexColor::BLACK);
    }

    #[test]
    fn test_whitespace_is_trimmed() {
        assert_eq!(resolve_color("  #abc \n").to_string(), "AABBCC");
    }

    #[test]
    fn test_snapping_disabled_by_default() {
        let snap = ColorSnap::default();
        let c = HexColor::rgb(0xFA, 0xFA, 0xFA);
        assert_eq!(c.snapped(&snap), c);
    }

    #[test]
    fn test_snapping_enabled() {
        let snap = ColorSnap {
            enabled: true,
            ..ColorSnap::default()
        };
        assert_eq!(HexColor::rgb(0xF5, 0xFA, 0xFF).snapped(&snap), HexColor::WHITE);
        assert_eq!(HexColor::rgb(0x05, 0x0A, 0x00).snapped(&snap), HexColor::BLACK);
        let mid = HexColor::rgb(0x80, 0x10, 0xF0);
        assert_eq!(mid.snapped(&snap), mid);
    }

    #[test]
    fn test_optional_default() {
        assert_eq!(resolve_color_or(None, HexColor::WHITE), HexColor::WHITE);
        assert_eq!(resolve_color_or(Some("#000"), HexColor::WHITE), HexColor::BLACK);
        assert_eq!(resolve_color_or(Some("nope"), HexColor::WHITE), HexColor::BLACK);
    }
}
