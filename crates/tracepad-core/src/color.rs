//! Straight-alpha RGBA colors with `#RRGGBB` / `#RRGGBBAA` parsing.

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::str::FromStr;

/// An 8-bit straight-alpha color.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const WHITE: Rgba = Rgba::rgb(255, 255, 255);
    pub const BLACK: Rgba = Rgba::rgb(0, 0, 0);
    pub const RED: Rgba = Rgba::rgb(255, 0, 0);
    pub const GREEN: Rgba = Rgba::rgb(0, 255, 0);
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);

    /// Creates a color from all four channels.
    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Creates an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::new(r, g, b, 255)
    }

    /// Returns the same color with alpha scaled to `alpha` in `0.0..=1.0`.
    pub fn with_alpha(self, alpha: f64) -> Self {
        let a = (alpha.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self { a, ..self }
    }

    /// Formats as `#RRGGBB`, or `#RRGGBBAA` when not opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

impl Default for Rgba {
    fn default() -> Self {
        Self::RED
    }
}

/// Error returned when a color string is not `#RRGGBB` or `#RRGGBBAA`.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("Invalid color '{0}': expected #RRGGBB or #RRGGBBAA")]
pub struct ParseColorError(pub String);

impl FromStr for Rgba {
    type Err = ParseColorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let err = || ParseColorError(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(err)?;
        if !hex.is_ascii() || (hex.len() != 6 && hex.len() != 8) {
            return Err(err());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| err());
        let a = if hex.len() == 8 { channel(6)? } else { 255 };
        Ok(Rgba::new(channel(0)?, channel(2)?, channel(4)?, a))
    }
}

impl std::fmt::Display for Rgba {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl Serialize for Rgba {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Rgba {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        s.parse().map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex() {
        assert_eq!("#FF0000".parse::<Rgba>().unwrap(), Rgba::RED);
        assert_eq!("#00ff00".parse::<Rgba>().unwrap(), Rgba::GREEN);
        assert_eq!(
            "#00000033".parse::<Rgba>().unwrap(),
            Rgba::new(0, 0, 0, 0x33)
        );
    }

    #[test]
    fn test_parse_rejects_garbage() {
        assert!("red".parse::<Rgba>().is_err());
        assert!("#FFF".parse::<Rgba>().is_err());
        assert!("#GG0000".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_serde_as_hex_string() {
        let json = serde_json::to_string(&Rgba::new(1, 2, 3, 4)).unwrap();
        assert_eq!(json, "\"#01020304\"");
        let back: Rgba = serde_json::from_str("\"#0000FF\"").unwrap();
        assert_eq!(back, Rgba::rgb(0, 0, 255));
    }

    #[test]
    fn test_with_alpha() {
        assert_eq!(Rgba::BLACK.with_alpha(0.2).a, 51);
        assert_eq!(Rgba::BLACK.with_alpha(7.0).a, 255);
    }
}
