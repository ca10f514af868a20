//! Ordered list of colors a scene draws particle colors from.
//!
//! Palettes are not interpolated: each particle picks one entry, so a
//! [`Palette`] is just a validated, non-empty `Vec<Srgb>` plus a handful of
//! named built-ins for the CLI and for fallback when a mood bundle arrives
//! without any usable colors.

use crate::color::Srgb;
use crate::error::EngineError;
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Names accepted by [`Palette::from_name`].
const PALETTE_NAMES: &[&str] = &["aurora", "ember", "lagoon", "meadow", "dusk", "mono"];

/// A non-empty ordered list of colors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "Vec<Srgb>", into = "Vec<Srgb>")]
pub struct Palette {
    colors: Vec<Srgb>,
}

impl Palette {
    /// Creates a palette from a vector of colors. Requires at least one color.
    pub fn new(colors: Vec<Srgb>) -> Result<Self, EngineError> {
        if colors.is_empty() {
            return Err(EngineError::InvalidPalette(
                "palette requires at least 1 color".to_string(),
            ));
        }
        Ok(Self { colors })
    }

    /// Creates a palette by parsing hex color strings. Any invalid entry is an error.
    pub fn from_hex<S: AsRef<str>>(hexes: &[S]) -> Result<Self, EngineError> {
        let colors = hexes
            .iter()
            .map(|h| Srgb::from_hex(h.as_ref()))
            .collect::<Result<Vec<_>, _>>()?;
        Self::new(colors)
    }

    /// Parses hex color strings, skipping entries that do not parse.
    ///
    /// Falls back to [`Palette::default`] when nothing usable remains.
    pub fn from_hex_lenient<S: AsRef<str>>(hexes: &[S]) -> Self {
        let colors: Vec<Srgb> = hexes
            .iter()
            .filter_map(|h| match Srgb::from_hex(h.as_ref()) {
                Ok(c) => Some(c),
                Err(e) => {
                    warn!(color = h.as_ref(), error = %e, "skipping palette entry");
                    None
                }
            })
            .collect();
        Self::new(colors).unwrap_or_else(|_| {
            warn!("palette has no usable colors, using default");
            Self::default()
        })
    }

    /// Number of colors in this palette.
    pub fn len(&self) -> usize {
        self.colors.len()
    }

    /// Always false for a constructed palette.
    pub fn is_empty(&self) -> bool {
        self.colors.is_empty()
    }

    /// Color at `index`, wrapping around the palette length.
    pub fn get(&self, index: usize) -> Srgb {
        self.colors[index % self.colors.len()]
    }

    /// All colors in order.
    pub fn colors(&self) -> &[Srgb] {
        &self.colors
    }

    /// Colors as `"#rrggbb"` strings.
    pub fn to_hex(&self) -> Vec<String> {
        self.colors.iter().map(|c| c.to_hex()).collect()
    }

    /// Looks up a built-in palette by name.
    pub fn from_name(name: &str) -> Result<Self, EngineError> {
        match name {
            "aurora" => Ok(Self::aurora()),
            "ember" => Ok(Self::ember()),
            "lagoon" => Ok(Self::lagoon()),
            "meadow" => Ok(Self::meadow()),
            "dusk" => Ok(Self::dusk()),
            "mono" => Ok(Self::mono()),
            other => Err(EngineError::InvalidPalette(format!(
                "unknown palette '{other}', expected one of: {}",
                PALETTE_NAMES.join(", ")
            ))),
        }
    }

    /// Names of all built-in palettes.
    pub fn list_names() -> &'static [&'static str] {
        PALETTE_NAMES
    }

    // -- Built-in palettes --

    /// Greens and violets.
    pub fn aurora() -> Self {
        builtin(&["#00ffa3", "#03e1ff", "#7b2ff7", "#f107a3"])
    }

    /// Reds through gold.
    pub fn ember() -> Self {
        builtin(&["#7f0000", "#d00000", "#ff5400", "#ffbd00"])
    }

    /// Deep blue to pale cyan.
    pub fn lagoon() -> Self {
        builtin(&["#03045e", "#0077b6", "#00b4d8", "#90e0ef", "#caf0f8"])
    }

    /// Leaf greens and pollen yellow.
    pub fn meadow() -> Self {
        builtin(&["#2d6a4f", "#52b788", "#b7e4c7", "#ffd166"])
    }

    /// Evening purples and pinks.
    pub fn dusk() -> Self {
        builtin(&["#22223b", "#4a4e69", "#9a8c98", "#f2a7c3"])
    }

    /// Single white entry.
    pub fn mono() -> Self {
        Self {
            colors: vec![Srgb::WHITE],
        }
    }
}

impl Default for Palette {
    fn default() -> Self {
        Self::aurora()
    }
}

impl TryFrom<Vec<Srgb>> for Palette {
    type Error = EngineError;

    fn try_from(colors: Vec<Srgb>) -> Result<Self, Self::Error> {
        Self::new(colors)
    }
}

impl From<Palette> for Vec<Srgb> {
    fn from(p: Palette) -> Self {
        p.colors
    }
}

/// Parses a hard-coded palette; entries that fail to parse are dropped.
fn builtin(hexes: &[&str]) -> Palette {
    Palette {
        colors: hexes.iter().filter_map(|h| Srgb::from_hex(h).ok()).collect(),
    }
}
