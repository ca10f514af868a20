//! sRGB color type with hex parsing.
//!
//! Palettes arrive from the mood generator as `"#rrggbb"` strings, and the
//! rendering collaborator wants normalised channels, so [`Srgb`] stores
//! `f32` components in [0, 1] and serializes back to hex.

use crate::error::EngineError;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// sRGB color with components in [0, 1].
///
/// The hex round-trip has 8-bit quantization, which is exact for colors that
/// were parsed from hex in the first place.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Srgb {
    pub r: f32,
    pub g: f32,
    pub b: f32,
}

impl Srgb {
    /// Opaque white, used where a color is needed before any palette exists.
    pub const WHITE: Srgb = Srgb {
        r: 1.0,
        g: 1.0,
        b: 1.0,
    };

    /// Parses a hex color string like "#ff00aa" or "ff00aa" (case insensitive).
    ///
    /// Surrounding whitespace is ignored. Returns `EngineError::InvalidColor`
    /// if the input is not a 6-digit hex color.
    pub fn from_hex(hex: &str) -> Result<Srgb, EngineError> {
        let trimmed = hex.trim();
        let digits = trimmed.strip_prefix('#').unwrap_or(trimmed);
        if digits.len() != 6 || !digits.is_ascii() {
            return Err(EngineError::InvalidColor(format!(
                "expected 6 hex digits, got {hex:?}"
            )));
        }
        let channel = |range: std::ops::Range<usize>, name: &str| {
            u8::from_str_radix(&digits[range], 16)
                .map(|v| v as f32 / 255.0)
                .map_err(|e| EngineError::InvalidColor(format!("invalid {name} component: {e}")))
        };
        Ok(Srgb {
            r: channel(0..2, "red")?,
            g: channel(2..4, "green")?,
            b: channel(4..6, "blue")?,
        })
    }

    /// Converts the color to a lowercase hex string like `"#rrggbb"`.
    pub fn to_hex(self) -> String {
        let [r, g, b] = self.to_rgb8();
        format!("#{r:02x}{g:02x}{b:02x}")
    }

    /// Quantizes to 8-bit channels, clamping out-of-range components.
    pub fn to_rgb8(self) -> [u8; 3] {
        let q = |c: f32| (c.clamp(0.0, 1.0) * 255.0).round() as u8;
        [q(self.r), q(self.g), q(self.b)]
    }
}

impl Serialize for Srgb {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_hex())
    }
}

impl<'de> Deserialize<'de> for Srgb {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Srgb::from_hex(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_hex_parses_with_and_without_hash() {
        let a = Srgb::from_hex("#ff8000").unwrap();
        let b = Srgb::from_hex("FF8000").unwrap();
        assert_eq!(a, b);
        assert_eq!(a.r, 1.0);
        assert!((a.g - 128.0 / 255.0).abs() < 1e-6);
        assert_eq!(a.b, 0.0);
    }

    #[test]
    fn from_hex_ignores_surrounding_whitespace() {
        assert!(Srgb::from_hex("  #00ff00 ").is_ok());
    }

    #[test]
    fn from_hex_rejects_wrong_length() {
        assert!(matches!(
            Srgb::from_hex("#fff"),
            Err(EngineError::InvalidColor(_))
        ));
    }

    #[test]
    fn from_hex_rejects_non_hex_digits() {
        assert!(Srgb::from_hex("#zzzzzz").is_err());
    }

    #[test]
    fn from_hex_rejects_multibyte_input_without_panicking() {
        // Six bytes but not six characters; slicing must not split a char.
        assert!(Srgb::from_hex("ééé").is_err());
    }

    #[test]
    fn to_hex_round_trips_parsed_colors() {
        for hex in ["#000000", "#ffffff", "#1a2b3c", "#ff00aa"] {
            assert_eq!(Srgb::from_hex(hex).unwrap().to_hex(), hex);
        }
    }

    #[test]
    fn to_rgb8_clamps_out_of_range_components() {
        let c = Srgb {
            r: -0.5,
            g: 2.0,
            b: 0.5,
        };
        assert_eq!(c.to_rgb8(), [0, 255, 128]);
    }

    #[test]
    fn serializes_as_hex_string() {
        let c = Srgb::from_hex("#336699").unwrap();
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"#336699\"");
        let back: Srgb = serde_json::from_str("\"#336699\"").unwrap();
        assert_eq!(back, c);
    }
}
